// WHY: whitespace differences between methods are not boundary disagreements, so every
// comparison runs over normalized text

/// Collapse every whitespace run (including `\r\n` and bare line breaks) into one space and trim
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_whitespace_into(text, &mut result);
    result
}

/// Normalize into a caller-owned buffer, clearing it first
pub fn normalize_whitespace_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !buffer.is_empty();
        } else {
            if pending_space {
                buffer.push(' ');
                pending_space = false;
            }
            buffer.push(ch);
        }
    }
}

/// Normalize each sentence and join them with single spaces
pub fn join_normalized<S: AsRef<str>>(sentences: &[S]) -> String {
    let mut joined = String::new();
    let mut buffer = String::new();

    for sentence in sentences {
        normalize_whitespace_into(sentence.as_ref(), &mut buffer);
        if buffer.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(&buffer);
    }

    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_breaks() {
        let input = "This is a\nsentence with\r\nline breaks.";
        assert_eq!(normalize_whitespace(input), "This is a sentence with line breaks.");
    }

    #[test]
    fn test_normalize_buffer_reuse() {
        let mut buffer = String::new();

        normalize_whitespace_into("Line one.\nLine two.", &mut buffer);
        assert_eq!(buffer, "Line one. Line two.");

        normalize_whitespace_into("Different\r\ncontent.", &mut buffer);
        assert_eq!(buffer, "Different content.");
    }

    #[test]
    fn test_normalize_trims_and_collapses() {
        assert_eq!(normalize_whitespace("  Multiple\n\n\nspaces\t\there.  "), "Multiple spaces here.");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \r\n\t "), "");
    }

    #[test]
    fn test_normalize_unicode() {
        assert_eq!(normalize_whitespace("Unicode\n世界\r\nwith émojis 🦀."), "Unicode 世界 with émojis 🦀.");
    }

    #[test]
    fn test_join_normalized_skips_blank_entries() {
        let sentences = ["  He said, \"Hi.\"", "", "She\nleft. "];
        assert_eq!(join_normalized(&sentences), "He said, \"Hi.\" She left.");
    }
}
