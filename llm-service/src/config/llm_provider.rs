/// Backend used for chat-completions inference.
///
/// Both variants speak the OpenAI chat-completions wire format; only the
/// endpoint and attribution headers differ. Future providers with a different
/// wire format get their own service module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenRouter aggregation gateway (`https://openrouter.ai/api/v1`).
    OpenRouter,
    /// A plain OpenAI-compatible endpoint (`https://api.openai.com/v1`).
    OpenAi,
}
