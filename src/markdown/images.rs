use regex::Regex;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

static HTML_IMG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)<img\s[^>]*>"#).unwrap());

static SRC_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

static ALT_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\salt\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

static MARKDOWN_IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// The full matched text, `![..](..)` or `<img ..>`.
    pub original_text: String,
    pub path: String,
    pub alt_text: String,
    pub is_html: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    External,
    Found(PathBuf),
    Missing(PathBuf),
    Unsupported(PathBuf),
}

impl ImageReference {
    pub fn is_external(&self) -> bool {
        is_external(&self.path)
    }

    /// Checks a reference against the article's directory.
    pub fn resolve(&self, source_dir: &Path, extensions: &[String]) -> ImageStatus {
        resolve_path(&self.path, source_dir, extensions)
    }
}

pub fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

pub fn resolve_path(path: &str, source_dir: &Path, extensions: &[String]) -> ImageStatus {
    if is_external(path) {
        return ImageStatus::External;
    }

    let local = source_dir.join(path.trim_start_matches("./"));
    if !local.is_file() {
        return ImageStatus::Missing(local);
    }

    let supported = local
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));

    if supported {
        ImageStatus::Found(local)
    } else {
        ImageStatus::Unsupported(local)
    }
}

fn first_group(caps: &regex::Captures<'_>) -> String {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Finds HTML `<img>` tags and Markdown `![alt](path)` images, in document order.
///
/// References with an empty path are skipped, as are Markdown images that sit
/// inside an HTML tag.
pub fn extract_image_references(content: &str) -> Vec<ImageReference> {
    let mut found: Vec<(usize, ImageReference)> = Vec::new();
    let mut html_spans: Vec<Range<usize>> = Vec::new();

    for tag in HTML_IMG_RE.find_iter(content) {
        html_spans.push(tag.range());

        let Some(src) = SRC_ATTR_RE.captures(tag.as_str()) else {
            continue;
        };
        let path = first_group(&src);
        if path.is_empty() {
            continue;
        }

        let alt_text = ALT_ATTR_RE
            .captures(tag.as_str())
            .map(|alt| first_group(&alt))
            .unwrap_or_default();

        found.push((
            tag.start(),
            ImageReference {
                original_text: tag.as_str().to_string(),
                path,
                alt_text,
                is_html: true,
            },
        ));
    }

    for caps in MARKDOWN_IMG_RE.captures_iter(content) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if html_spans.iter().any(|span| span.contains(&whole.start())) {
            continue;
        }

        let (_, [alt_text, path]) = caps.extract();
        if path.is_empty() {
            continue;
        }

        found.push((
            whole.start(),
            ImageReference {
                original_text: whole.as_str().to_string(),
                path: path.to_string(),
                alt_text: alt_text.to_string(),
                is_html: false,
            },
        ));
    }

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, reference)| reference).collect()
}
