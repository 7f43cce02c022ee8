pub mod common;
pub mod empty_lines;
pub mod front_matter;
pub mod html;
pub mod images;

pub use empty_lines::normalize_empty_lines;
pub use front_matter::{ArticleMeta, FormatViolation};
pub use html::render_html;
pub use images::{ImageReference, ImageStatus, extract_image_references};
