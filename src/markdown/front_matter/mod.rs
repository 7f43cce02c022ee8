mod meta;
mod value;

pub use meta::{ArticleMeta, REQUIRED_FIELDS, validate_fields};

use crate::markdown::common::{lines_inclusive, split_terminator, trim_space};
use anyhow::{Result, anyhow};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

const DELIMITERS: [&str; 2] = ["---", "+++"];

static ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s*=\s*(.*?)\s*$").unwrap());

static COLON_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\w+):\s*(.*)$").unwrap());

/// A front matter block at the top of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    pub delimiter: &'static str,
    /// Raw field lines between the delimiters, terminators included.
    pub fields: &'a str,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
    fields_start: usize,
}

impl FrontMatter<'_> {
    /// Line number of the first field line (the opening delimiter is line 1).
    pub const FIRST_FIELD_LINE: usize = 2;

    pub fn parse_fields(&self) -> Map<String, Value> {
        parse_fields(self.fields)
    }
}

/// Finds a `---` or `+++` delimited block starting on the first line.
pub fn locate(content: &str) -> Option<FrontMatter<'_>> {
    let mut lines = lines_inclusive(content);
    let open = lines.next()?;
    let delimiter = DELIMITERS
        .into_iter()
        .find(|d| trim_space(open) == *d)?;

    let fields_start = open.len();
    let mut offset = fields_start;
    for line in lines {
        if trim_space(line) == delimiter {
            return Some(FrontMatter {
                delimiter,
                fields: &content[fields_start..offset],
                body: &content[offset + line.len()..],
                fields_start,
            });
        }
        offset += line.len();
    }

    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldLine<'a> {
    Assign { key: &'a str, raw: &'a str },
    Colon { key: &'a str, raw: &'a str },
    Other,
}

impl<'a> FieldLine<'a> {
    fn parse(text: &'a str) -> Self {
        if let Some(caps) = ASSIGN_RE.captures(text) {
            let (_, [key, raw]) = caps.extract();
            return Self::Assign { key, raw };
        }
        if let Some(caps) = COLON_RE.captures(text) {
            let (_, [key, raw]) = caps.extract();
            return Self::Colon { key, raw };
        }
        Self::Other
    }
}

/// Parses `key="value"`, `key=[..]`, `key={..}`, `key=bare` and `key: value`
/// lines. Blank and unrecognized lines are skipped.
pub fn parse_fields(block: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    for line in lines_inclusive(block) {
        let (text, _) = split_terminator(line);
        match FieldLine::parse(text) {
            FieldLine::Assign { key, raw } => {
                fields.insert(key.to_string(), value::parse_assigned(raw));
            }
            FieldLine::Colon { key, raw } => {
                fields.insert(key.to_string(), value::parse_colon(raw));
            }
            FieldLine::Other => {}
        }
    }
    fields
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatViolation {
    pub line_number: usize,
    pub message: String,
}

/// Reports front matter lines that are not in `key="value"` form.
pub fn check_format(content: &str) -> Vec<FormatViolation> {
    let Some(front_matter) = locate(content) else {
        return vec![FormatViolation {
            line_number: 1,
            message: "Missing front matter: expected a '---' delimited block".to_string(),
        }];
    };

    lines_inclusive(front_matter.fields)
        .enumerate()
        .filter_map(|(i, line)| {
            let (text, _) = split_terminator(line);
            matches!(FieldLine::parse(text), FieldLine::Colon { .. }).then(|| FormatViolation {
                line_number: FrontMatter::FIRST_FIELD_LINE + i,
                message: format!("Mixed format: '{}' should use key=\"value\"", text),
            })
        })
        .collect()
}

/// Rewrites `key: value` front matter lines into `key="value"` form.
///
/// Every other byte of the document, line terminators included, is kept.
pub fn standardize(content: &str) -> Result<String> {
    let front_matter = locate(content).ok_or_else(|| anyhow!("Missing front matter"))?;

    let mut out = String::with_capacity(content.len() + 16);
    out.push_str(&content[..front_matter.fields_start]);

    for line in lines_inclusive(front_matter.fields) {
        let (text, ending) = split_terminator(line);
        match FieldLine::parse(text) {
            FieldLine::Colon { key, raw } => {
                out.push_str(key);
                out.push('=');
                out.push_str(&value::render(&value::parse_colon(raw)));
                out.push_str(ending);
            }
            _ => out.push_str(line),
        }
    }

    out.push_str(&content[front_matter.fields_start + front_matter.fields.len()..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locate() {
        let content = "---\ntitle=\"T\"\n---\n# Body\n";
        let fm = locate(content).unwrap();
        assert_eq!(fm.delimiter, "---");
        assert_eq!(fm.fields, "title=\"T\"\n");
        assert_eq!(fm.body, "# Body\n");
    }

    #[test]
    fn test_locate_toml_delimiter() {
        let content = "+++\ntitle=\"T\"\n+++\nBody";
        let fm = locate(content).unwrap();
        assert_eq!(fm.delimiter, "+++");
        assert_eq!(fm.body, "Body");
    }

    #[test]
    fn test_locate_missing() {
        assert!(locate("# Just content\n").is_none());
        assert!(locate("").is_none());
        assert!(locate("---\ntitle=\"unterminated\"\n").is_none());
        assert!(locate("---\ntitle=\"T\"\n+++\n").is_none());
    }

    #[test]
    fn test_locate_empty_block() {
        let fm = locate("---\n---\n# Just content").unwrap();
        assert_eq!(fm.fields, "");
        assert!(fm.parse_fields().is_empty());
        assert_eq!(fm.body, "# Just content");
    }

    #[test]
    fn test_parse_key_value_format() {
        let fields = parse_fields(
            "title=\"Test Article\"\nsubtitle=\"A test article\"\ntags=[\"test\", \"example\"]\ncategories=[\"Test\"]\n",
        );
        assert_eq!(fields["title"], json!("Test Article"));
        assert_eq!(fields["subtitle"], json!("A test article"));
        assert_eq!(fields["tags"], json!(["test", "example"]));
        assert_eq!(fields["categories"], json!(["Test"]));
    }

    #[test]
    fn test_parse_colon_format() {
        let fields = parse_fields(
            "title: Test Article\nsubtitle: A test article\ntags: [test, example]\ncategories: [Test]\n",
        );
        assert_eq!(fields["title"], json!("Test Article"));
        assert_eq!(fields["subtitle"], json!("A test article"));
        assert_eq!(fields["tags"], json!(["test", "example"]));
        assert_eq!(fields["categories"], json!(["Test"]));
    }

    #[test]
    fn test_parse_mixed_lists() {
        let fields =
            parse_fields("tags=[\"test\"]\ncategories: [Test, Demo]\nmixed=[1, \"two\", 3]\n");
        assert_eq!(fields["tags"], json!(["test"]));
        assert_eq!(fields["categories"], json!(["Test", "Demo"]));
        assert_eq!(fields["mixed"], json!([1, "two", 3]));
    }

    #[test]
    fn test_parse_invalid_list() {
        let fields = parse_fields("tags=[invalid list]\n");
        assert_eq!(fields["tags"], json!(["invalid", "list"]));
    }

    #[test]
    fn test_parse_keeps_field_order() {
        let fields = parse_fields("zeta=\"1\"\nalpha=\"2\"\n");
        let keys: Vec<&String> = fields.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_check_format_consistent() {
        let content = "---\ntitle=\"Test Article\"\ndescription=\"A test article\"\ndate=\"2024-04-04\"\n---\n# Content here\n";
        assert!(check_format(content).is_empty());
    }

    #[test]
    fn test_check_format_mixed() {
        let content = "---\ntitle=\"Test Article\"\ndescription: A test article\ndate=\"2024-04-04\"\n---\n# Content here\n";
        let violations = check_format(content);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line_number, 3);
        assert!(violations[0].message.contains("Mixed format"));
        assert!(violations[0].message.contains("description: A test article"));
    }

    #[test]
    fn test_check_format_missing_front_matter() {
        let violations = check_format("# Just content\nNo front matter here\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line_number, 1);
        assert!(violations[0].message.contains("Missing front matter"));
    }

    #[test]
    fn test_standardize_mixed_formats() {
        let content = "---\n\
                       title=\"Test Article\"\n\
                       description: A test article\n\
                       date=\"2024-04-04\"\n\
                       tags: [\"tag1\", \"tag2\"]\n\
                       categories: [cat1, cat2]\n\
                       ---\n\
                       # Content here\n";
        let expected = "---\n\
                        title=\"Test Article\"\n\
                        description=\"A test article\"\n\
                        date=\"2024-04-04\"\n\
                        tags=[\"tag1\", \"tag2\"]\n\
                        categories=[\"cat1\", \"cat2\"]\n\
                        ---\n\
                        # Content here\n";
        assert_eq!(standardize(content).unwrap(), expected);
    }

    #[test]
    fn test_standardize_already_standard() {
        let content = "---\ntitle=\"Test Article\"\ndescription=\"A test article\"\ndate=\"2024-04-04\"\n---\n# Content here\n";
        assert_eq!(standardize(content).unwrap(), content);
    }

    #[test]
    fn test_standardize_complex_values() {
        let content = "---\n\
                       title: \"Article with: colon\"\n\
                       description: Article about \"quotes\" and stuff\n\
                       date: 2024-04-04 15:30:00\n\
                       list: [1, 2, 3]\n\
                       nested: {key: value, other: stuff}\n\
                       ---\n\
                       # Content here\n";
        let expected = "---\n\
                        title=\"Article with: colon\"\n\
                        description=\"Article about \\\"quotes\\\" and stuff\"\n\
                        date=\"2024-04-04 15:30:00\"\n\
                        list=[1, 2, 3]\n\
                        nested={\"key\": \"value\", \"other\": \"stuff\"}\n\
                        ---\n\
                        # Content here\n";
        assert_eq!(standardize(content).unwrap(), expected);
    }

    #[test]
    fn test_standardize_keeps_body_and_crlf() {
        let content = "---\r\ntitle: Test\r\n---\r\nkey: not front matter\r\n";
        assert_eq!(
            standardize(content).unwrap(),
            "---\r\ntitle=\"Test\"\r\n---\r\nkey: not front matter\r\n"
        );
    }

    #[test]
    fn test_standardize_missing_front_matter() {
        let err = standardize("# Just content\nNo front matter here\n").unwrap_err();
        assert!(err.to_string().contains("Missing front matter"));
    }

    #[test]
    fn test_standardized_fields_parse_the_same() {
        let content = "---\ntitle: Test\ntags: [a, b]\n---\n";
        let before = locate(content).unwrap().parse_fields();
        let standardized = standardize(content).unwrap();
        let after = locate(&standardized).unwrap().parse_fields();
        assert_eq!(before, after);
    }
}
