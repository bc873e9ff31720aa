//! Terminal output: message styling and result formatting.

pub mod output_format;
pub mod theme;
