//! Rendering module for converting document trees to output formats.

mod json;
mod markdown;
mod options;
mod stats;
mod text;

pub use json::{from_json, to_json, JsonContent, JsonDocument, JsonFormat, JsonPage, JsonSection};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::{PageSelection, RenderOptions};
pub use stats::StructureStats;
pub use text::to_text;
