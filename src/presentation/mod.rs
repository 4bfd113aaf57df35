// Presentation layer - HTTP routes, extractors and error rendering
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod helpers;
pub mod router;
