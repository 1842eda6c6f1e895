//! Prompt catalog for the four analysis kinds.
//!
//! System prompts pin the role, the focus areas, and the exact JSON schema
//! each kind must return; the per-kind request instruction is appended after
//! the fenced code in the user message. The schemas here are what
//! [`crate::parse`] and the bucket types in [`crate::types`] expect.

use crate::types::AnalysisKind;

const SYSTEM_SECURITY: &str = "\
ROLE: You are a world-class application security engineer and code reviewer.\n\
OUTPUT: When the user prompt requests a structured result, return ONLY a single JSON object — no prose, no markdown, no code fences.\n\
SCOPE: Analyze only the provided code/context; avoid assumptions about external config or infrastructure.\n\
PRIORITIES: (1) correctness (low false positives), (2) actionable fixes, (3) clear evidence and exact lines.\n\
CHECKLIST: Input validation, authN/authZ, crypto, secret management, data protection, deserialization, SSRF/RCE, path traversal, injections (SQL/XSS/Command), insecure dependencies, misconfig, error handling and logging, insecure defaults.\n\
SCHEMA: {\"findings\": [{\"SEVERITY\": \"Critical|High|Medium|Low|Info\", \"LINE_NUMBER\": \"n or n-m or null\", \"VULNERABILITY_TYPE\": \"...\", \"DESCRIPTION\": \"...\", \"IMPACT\": \"...\", \"REMEDIATION\": \"...\", \"CWE_ID\": \"CWE-### or null\", \"CONFIDENCE\": \"High|Medium|Low\"}]}\n\
RULES: Cite exact evidence from the code. If uncertain about lines, set LINE_NUMBER=null and explain briefly. Prefer practical, least-invasive fixes with secure defaults. Reference OWASP Top 10/ASVS where relevant.";

const SYSTEM_PERFORMANCE: &str = "\
ROLE: You are a senior performance engineer.\n\
OUTPUT: If the user prompt asks for a structured result, return ONLY one JSON object.\n\
SCOPE: Focus on time/space complexity, I/O, database access, concurrency, caching, batching, and algorithmic choices.\n\
SCHEMA: {\"suggestions\": [{\"location\": {\"lines\": \"n or n-m or null\"}, \"issue\": \"...\", \"recommendation\": \"...\", \"impact\": \"high|medium|low\", \"snippet\": \"minimal code showing the change\"}]}\n\
RULES: Provide concrete, local changes with rationale. Use \"impact\" exactly as high|medium|low to indicate expected benefit. Avoid speculative system-wide assumptions.";

const SYSTEM_ARCHITECTURE: &str = "\
ROLE: You are an experienced software architect.\n\
OUTPUT: Prefer a structured JSON response when requested.\n\
FOCUS: Cohesion/coupling, layering and boundaries, domain modeling, error handling/observability, configuration/secrets, testing strategy, scalability and maintainability.\n\
SCHEMA: {\"issues\": [{\"category\": \"coupling|cohesion|boundary|config|error-handling|testing|scalability|other\", \"description\": \"...\", \"evidence\": \"...\", \"severity\": \"high|medium|low\"}], \"recommendations\": [{\"title\": \"...\", \"description\": \"...\", \"rationale\": \"...\", \"steps\": [\"step 1\", \"step 2\"], \"effort\": \"S|M|L\", \"impact\": \"high|medium|low\"}]}\n\
RULES: Propose incremental, low-risk refactors with clear steps, avoiding rewrites unless necessary.";

const SYSTEM_STYLE: &str = "\
ROLE: You are a code quality reviewer focused on readability, maintainability, and idiomatic style.\n\
OUTPUT: Return ONLY JSON when requested.\n\
GUIDELINES: Naming, formatting, dead code, duplication, long functions, magic numbers, error handling, logging clarity, idiomatic patterns.\n\
SCHEMA: {\"issues\": [{\"SEVERITY\": \"High|Medium|Low|Info\", \"lines\": \"n or n-m or null\", \"description\": \"...\", \"recommendation\": \"...\", \"rule\": \"lint rule or pattern if applicable\"}]}\n\
RULES: Prefer small, mechanical edits with before/after snippets when impactful. Avoid subjective nits unless they improve clarity.";

/// System prompt for one analysis kind.
pub fn system_prompt(kind: AnalysisKind) -> &'static str {
    match kind {
        AnalysisKind::Security => SYSTEM_SECURITY,
        AnalysisKind::Performance => SYSTEM_PERFORMANCE,
        AnalysisKind::Architecture => SYSTEM_ARCHITECTURE,
        AnalysisKind::Style => SYSTEM_STYLE,
    }
}

fn instruction(kind: AnalysisKind) -> &'static str {
    match kind {
        AnalysisKind::Security => {
            "Perform a comprehensive security analysis. Return JSON with severity, lines, description, remediation, and CWE."
        }
        AnalysisKind::Performance => {
            "Analyze this code for performance issues. Return JSON with location, issue, recommendation, and estimated impact."
        }
        AnalysisKind::Architecture => {
            "Analyze architecture: SOLID, patterns, separation of concerns, coupling/cohesion, testing, scalability. Return JSON with issues and recommendations."
        }
        AnalysisKind::Style => {
            "Review code style and maintainability. Return JSON with issues list including SEVERITY, lines, description, and recommendation."
        }
    }
}

/// User message for one per-file analysis call over a single chunk.
pub fn render_request(path: &str, code: &str, kind: AnalysisKind) -> String {
    format!(
        "File: {path}\n\nAnalyze this code:\n\n```\n{code}\n```\n\n{}",
        instruction(kind)
    )
}

/// User message for the whole-codebase architecture pass: project flavor,
/// (possibly elided) structure listing, and a few prioritized snippets.
pub fn render_architecture_request(
    project_type: &str,
    structure: &str,
    snippets: &[(String, String)],
) -> String {
    let mut out = format!(
        "Project type: {project_type}\n\nProject structure:\n{structure}\n\nKey files:\n"
    );
    for (path, content) in snippets {
        out.push_str(&format!("\n--- {path} ---\n```\n{content}\n```\n"));
    }
    out.push_str(&format!("\n{}", instruction(AnalysisKind::Architecture)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_schema_bearing_prompt() {
        for kind in [
            AnalysisKind::Security,
            AnalysisKind::Performance,
            AnalysisKind::Architecture,
            AnalysisKind::Style,
        ] {
            assert!(system_prompt(kind).contains("SCHEMA"));
        }
    }

    #[test]
    fn request_embeds_path_and_code() {
        let req = render_request("src/app.py", "print(1)", AnalysisKind::Security);
        assert!(req.contains("File: src/app.py"));
        assert!(req.contains("print(1)"));
    }
}
