mod check;
mod format;

pub use check::{MissingImages, find_missing_images};
pub use format::{
    FormatOptions, FormatOutcome, FormatSummary, format_content, format_file, format_paths,
};

use crate::markdown::{ArticleMeta, ImageReference, extract_image_references};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed article: metadata, body, and every image it references.
#[derive(Debug, Clone)]
pub struct Article {
    pub path: PathBuf,
    pub meta: ArticleMeta,
    pub body: String,
    /// Banner first when the front matter names one, then body images in order.
    pub images: Vec<ImageReference>,
}

impl Article {
    pub fn source_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }
}

pub fn load_article(path: &Path) -> Result<Article> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    parse_article(path, &content)
}

pub fn parse_article(path: &Path, content: &str) -> Result<Article> {
    let (meta, body) =
        ArticleMeta::from_content(content).with_context(|| format!("Invalid article {:?}", path))?;

    let mut images = Vec::new();
    if let Some(banner) = &meta.banner {
        images.push(ImageReference {
            original_text: banner.clone(),
            path: banner.clone(),
            alt_text: "banner".to_string(),
            is_html: false,
        });
    }
    images.extend(extract_image_references(body));

    Ok(Article {
        path: path.to_path_buf(),
        body: body.to_string(),
        meta,
        images,
    })
}

/// All `*.md` files below `dir`, sorted.
pub fn scan_markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("Directory does not exist: {:?}", dir);
    }

    let mut files = Vec::new();
    scan_directory_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read directory {:?}", dir))?;

    for entry in entries {
        let path = entry?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }

    Ok(())
}
