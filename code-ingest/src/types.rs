/// One ingested source file, immutable once produced by the ingestor.
///
/// `path` is unique within a single ingestion run (archive entry name or
/// path relative to the walked root, `/`-separated). `size` is the original
/// byte length before UTF-8 decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Base name of the file (no directory part).
    pub name: String,
    /// Run-unique path, `/`-separated.
    pub path: String,
    /// Decoded text content (invalid sequences replaced).
    pub content: String,
    /// Language tag from the classifier (e.g. `"python"`).
    pub language: &'static str,
    /// Original size in bytes.
    pub size: u64,
}
