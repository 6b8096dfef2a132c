//! Configuration module

mod site;

pub use site::HiddenNavigation;
pub use site::HighlightConfig;
pub use site::MarkdownConfig;
pub use site::MenuItem;
pub use site::SiteConfig;
