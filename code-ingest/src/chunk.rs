//! Line-aligned chunking for oversized file content.

/// Splits `content` into segments of at most `max_chars` characters, never
/// breaking inside a line.
///
/// Content that already fits is returned as a single unchanged segment. A
/// single line longer than `max_chars` stays intact in its own segment, so
/// the bound is soft. Joining the returned segments with `\n` reconstructs
/// the input exactly.
pub fn chunk_lines(content: &str, max_chars: usize) -> Vec<String> {
    if content.chars().count() <= max_chars {
        return vec![content.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;
    let mut first = true;

    for line in content.split('\n') {
        let line_chars = line.chars().count();
        // +1 accounts for the newline that joining re-inserts.
        if !current.is_empty() && current_chars + line_chars + 1 > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
            first = true;
        }
        if !first {
            current.push('\n');
            current_chars += 1;
        }
        current.push_str(line);
        current_chars += line_chars;
        first = false;
    }
    chunks.push(current);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_content_is_a_single_segment() {
        let content = "line one\nline two";
        assert_eq!(chunk_lines(content, 1000), vec![content.to_string()]);
    }

    #[test]
    fn exact_fit_is_a_single_segment() {
        let content = "abcdef";
        assert_eq!(chunk_lines(content, 6), vec![content.to_string()]);
    }

    #[test]
    fn rejoining_reconstructs_input() {
        let content = (0..50)
            .map(|i| format!("line number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = chunk_lines(&content, 64);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= 64));
        assert_eq!(chunks.join("\n"), content);
    }

    #[test]
    fn trailing_newline_survives_rejoin() {
        let content = "aaaa\nbbbb\ncccc\n";
        let chunks = chunk_lines(&content, 9);
        assert_eq!(chunks.join("\n"), content);
    }

    #[test]
    fn bound_counts_characters_not_bytes() {
        // Each line is 5 chars but 10 bytes; two lines plus the joining
        // newline are 11 chars and must share one segment.
        let content = "ééééé\nééééé\nééééé";
        let chunks = chunk_lines(content, 11);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.chars().count() <= 11));
        assert_eq!(chunks.join("\n"), content);
    }

    #[test]
    fn oversized_line_is_kept_intact() {
        let long = "x".repeat(100);
        let content = format!("short\n{long}\ntail");
        let chunks = chunk_lines(&content, 20);
        assert!(chunks.iter().any(|c| c == &long));
        assert_eq!(chunks.join("\n"), content);
    }

    #[test]
    fn lines_are_never_split() {
        let content = (0..40).map(|_| "0123456789").collect::<Vec<_>>().join("\n");
        for chunk in chunk_lines(&content, 35) {
            for line in chunk.split('\n') {
                assert_eq!(line, "0123456789");
            }
        }
    }
}
