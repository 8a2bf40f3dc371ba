pub mod render;
pub mod settings;

pub use settings::{SiteError, SiteResult, SiteSettings};
