//! Path → language classification and the text/binary heuristic.

/// Maps a file path to a language tag, or `None` for unsupported files.
///
/// `Dockerfile` is special-cased by basename; everything else goes through
/// the extension table. Tags are stable lowercase strings consumed by the
/// report and the analysis prompts.
pub fn classify(path: &str) -> Option<&'static str> {
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    if base == "Dockerfile" {
        return Some("docker");
    }
    let (_, ext) = base.rsplit_once('.')?;
    match ext {
        "py" => Some("python"),
        "js" => Some("javascript"),
        "ts" => Some("typescript"),
        "java" => Some("java"),
        "cpp" => Some("cpp"),
        "c" => Some("c"),
        "go" => Some("go"),
        "rs" => Some("rust"),
        "php" => Some("php"),
        "rb" => Some("ruby"),
        "cs" => Some("csharp"),
        "swift" => Some("swift"),
        "kt" => Some("kotlin"),
        "scala" => Some("scala"),
        "html" => Some("html"),
        "css" => Some("css"),
        "sql" => Some("sql"),
        "yaml" | "yml" => Some("yaml"),
        "json" => Some("json"),
        "xml" => Some("xml"),
        "sh" => Some("bash"),
        "dockerfile" => Some("docker"),
        _ => None,
    }
}

/// Heuristic binary check over raw bytes.
///
/// True if a NUL byte is present, or if more than 30% of the bytes fall
/// outside the printable range plus common whitespace/control characters.
/// Empty input is never binary. Boundary misclassifications are acceptable.
pub fn is_probably_binary(raw: &[u8]) -> bool {
    if raw.is_empty() {
        return false;
    }
    if raw.contains(&0) {
        return true;
    }
    let nontext = raw.iter().filter(|&&b| !is_text_byte(b)).count();
    nontext as f64 / raw.len() as f64 > 0.30
}

// BEL, BS, TAB, LF, FF, CR, ESC plus everything from 0x20 up (high bytes
// included so UTF-8 continuation bytes do not count as "non-text").
fn is_text_byte(b: u8) -> bool {
    b >= 0x20 || matches!(b, 7 | 8 | 9 | 10 | 12 | 13 | 27)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_extension() {
        assert_eq!(classify("src/app.py"), Some("python"));
        assert_eq!(classify("a/b/server.rs"), Some("rust"));
        assert_eq!(classify("deploy.yml"), Some("yaml"));
        assert_eq!(classify("notes.txt"), None);
        assert_eq!(classify("LICENSE"), None);
    }

    #[test]
    fn classify_dockerfile_by_basename() {
        assert_eq!(classify("Dockerfile"), Some("docker"));
        assert_eq!(classify("deploy/Dockerfile"), Some("docker"));
        assert_eq!(classify("base.dockerfile"), Some("docker"));
    }

    #[test]
    fn empty_input_is_text() {
        assert!(!is_probably_binary(b""));
    }

    #[test]
    fn nul_byte_is_binary() {
        assert!(is_probably_binary(b"abc\x00def"));
    }

    #[test]
    fn plain_source_is_text() {
        assert!(!is_probably_binary(b"fn main() {\n\tprintln!(\"ok\");\n}\n"));
    }

    #[test]
    fn mostly_control_bytes_is_binary() {
        let raw: Vec<u8> = (1u8..=6).cycle().take(100).collect();
        assert!(is_probably_binary(&raw));
    }
}
