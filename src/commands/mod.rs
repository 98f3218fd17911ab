//! Command implementations for the sheetsync CLI

pub mod completions;
pub mod rewrite_svg;
pub mod sync;
pub mod version;
