use super::scan_markdown_files;
use crate::markdown::{front_matter, normalize_empty_lines};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub standardize_front_matter: bool,
    /// Report what would change without writing.
    pub check: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            standardize_front_matter: true,
            check: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    Unchanged,
    Reformatted,
    WouldReformat,
}

#[derive(Debug, Clone, Default)]
pub struct FormatSummary {
    pub unchanged: Vec<PathBuf>,
    pub changed: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Front matter standardization followed by blank-line normalization.
pub fn format_content(content: &str, opts: &FormatOptions) -> Result<String> {
    if !opts.standardize_front_matter {
        return Ok(normalize_empty_lines(content));
    }

    if front_matter::locate(content).is_none() {
        tracing::warn!("No front matter found, only normalizing blank lines");
        return Ok(normalize_empty_lines(content));
    }

    let standardized = front_matter::standardize(content)?;
    Ok(normalize_empty_lines(&standardized))
}

pub fn format_file(path: &Path, opts: &FormatOptions) -> Result<FormatOutcome> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    let formatted = format_content(&content, opts)
        .with_context(|| format!("Failed to format {:?}", path))?;

    if formatted == content {
        tracing::debug!("Unchanged: {:?}", path);
        return Ok(FormatOutcome::Unchanged);
    }

    if opts.check {
        tracing::info!("Would reformat: {:?}", path);
        return Ok(FormatOutcome::WouldReformat);
    }

    fs::write(path, formatted).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::info!("Reformatted: {:?}", path);
    Ok(FormatOutcome::Reformatted)
}

/// Formats files and every `*.md` below directories. A failing file is logged
/// and recorded; the rest are still processed.
pub fn format_paths(paths: &[PathBuf], opts: &FormatOptions) -> Result<FormatSummary> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(scan_markdown_files(path)?);
        } else {
            files.push(path.clone());
        }
    }

    let mut summary = FormatSummary::default();
    for file in files {
        match format_file(&file, opts) {
            Ok(FormatOutcome::Unchanged) => summary.unchanged.push(file),
            Ok(FormatOutcome::Reformatted | FormatOutcome::WouldReformat) => {
                summary.changed.push(file)
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                summary.failed.push(file);
            }
        }
    }

    Ok(summary)
}
