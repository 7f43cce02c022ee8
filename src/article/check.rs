use super::{load_article, scan_markdown_files};
use crate::markdown::ImageStatus;
use anyhow::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingImages {
    pub file: PathBuf,
    /// Paths as written in the article.
    pub missing: Vec<String>,
}

/// Local images that are absent or have an unsupported extension, per article.
///
/// Files that fail to parse are logged and skipped.
pub fn find_missing_images(dir: &Path, extensions: &[String]) -> Result<Vec<MissingImages>> {
    let mut report = Vec::new();

    for file in scan_markdown_files(dir)? {
        let article = match load_article(&file) {
            Ok(article) => article,
            Err(e) => {
                tracing::warn!("Skipping {:?}: {:#}", file, e);
                continue;
            }
        };

        let missing: Vec<String> = article
            .images
            .iter()
            .filter(|image| {
                match image.resolve(article.source_dir(), extensions) {
                    ImageStatus::External | ImageStatus::Found(_) => false,
                    ImageStatus::Missing(path) => {
                        tracing::debug!("Missing image {:?} in {:?}", path, file);
                        true
                    }
                    ImageStatus::Unsupported(path) => {
                        tracing::debug!("Unsupported image {:?} in {:?}", path, file);
                        true
                    }
                }
            })
            .map(|image| image.path.clone())
            .collect();

        if !missing.is_empty() {
            report.push(MissingImages { file, missing });
        }
    }

    Ok(report)
}
