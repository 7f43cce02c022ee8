/// Iterator over the lines of a document, each slice keeping its own terminator.
///
/// Line boundaries are the universal-newline set: `\n`, `\r\n`, `\r`, vertical
/// tab, form feed, the file/group/record separators, NEL, and the Unicode line
/// and paragraph separators. The final line may have no terminator.
pub struct LinesInclusive<'a> {
    rest: &'a str,
}

pub fn lines_inclusive(text: &str) -> LinesInclusive<'_> {
    LinesInclusive { rest: text }
}

impl<'a> Iterator for LinesInclusive<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        let end = match self.rest.char_indices().find(|&(_, c)| is_line_break(c)) {
            Some((i, '\r')) if self.rest[i + 1..].starts_with('\n') => i + 2,
            Some((i, c)) => i + c.len_utf8(),
            None => self.rest.len(),
        };

        let (line, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(line)
    }
}

pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Splits a line into its text and its terminator.
pub fn split_terminator(line: &str) -> (&str, &str) {
    let text = line.trim_end_matches(is_line_break);
    line.split_at(text.len())
}

// Unicode White_Space plus the ASCII information separators.
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

pub fn trim_space(line: &str) -> &str {
    line.trim_matches(is_space)
}

pub fn is_blank(line: &str) -> bool {
    trim_space(line).is_empty()
}

/// Bullet (`- `, `* `, `+ `) or ordered (`1.`) list marker at the start of the trimmed line.
pub fn is_list_item(line: &str) -> bool {
    let trimmed = trim_space(line);
    if trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("+ ") {
        return true;
    }

    let mut chars = trimmed.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(first), Some('.')) if first.is_ascii_digit()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_keep_terminators() {
        let lines: Vec<&str> = lines_inclusive("a\nb\r\nc\rd").collect();
        assert_eq!(lines, vec!["a\n", "b\r\n", "c\r", "d"]);
    }

    #[test]
    fn test_lines_empty_input() {
        assert_eq!(lines_inclusive("").count(), 0);
    }

    #[test]
    fn test_lines_blank_runs() {
        let lines: Vec<&str> = lines_inclusive("\n\n\n").collect();
        assert_eq!(lines, vec!["\n", "\n", "\n"]);
    }

    #[test]
    fn test_lines_unicode_separators() {
        let lines: Vec<&str> = lines_inclusive("a\u{2028}b\x0cc").collect();
        assert_eq!(lines, vec!["a\u{2028}", "b\x0c", "c"]);
    }

    #[test]
    fn test_split_terminator() {
        assert_eq!(split_terminator("key: v\r\n"), ("key: v", "\r\n"));
        assert_eq!(split_terminator("last"), ("last", ""));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   \t\n"));
        assert!(is_blank("\u{3000}\r\n"));
        assert!(is_blank("\x1f\n"));
        assert!(!is_blank("  x  \n"));
    }

    #[test]
    fn test_list_item_markers() {
        assert!(is_list_item("- item\n"));
        assert!(is_list_item("  * item"));
        assert!(is_list_item("+ item"));
        assert!(is_list_item("1. first"));
        assert!(is_list_item("9.no space needed"));
    }

    #[test]
    fn test_not_list_items() {
        assert!(!is_list_item("-item"));
        assert!(!is_list_item("---"));
        assert!(!is_list_item("**bold**"));
        assert!(!is_list_item("10. two digits"));
        assert!(!is_list_item("1"));
        assert!(!is_list_item("½. x"));
        assert!(!is_list_item("Ⅷ. x"));
        assert!(!is_list_item(""));
    }
}
