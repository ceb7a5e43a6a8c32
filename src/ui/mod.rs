//! Terminal rendering.
//!
//! Each page is drawn as a header, a tab strip, the page body and a status
//! bar. Renderers only read from [`App`](crate::App); they never touch files.

pub mod common;
pub mod module;
pub mod summary;
pub mod theme;

pub use theme::Theme;
