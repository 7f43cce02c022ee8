//! Prepares Markdown articles for WeChat official accounts and Hugo sites:
//! front matter standardization, blank-line normalization, image reference
//! checks and HTML rendering.

pub mod article;
pub mod config;
pub mod markdown;

pub use config::Config;
pub use markdown::normalize_empty_lines;
