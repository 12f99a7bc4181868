//! Output rendering: plain text blocks, or one JSON document per run.

pub mod json;
pub mod text;

pub use json::{TraitReport, render_json};
pub use text::render_text;
