//! Document model types.
//!
//! This module defines both ends of the engine: the raw primitives handed
//! over by the extractors, and the section tree produced from them. The
//! model is independent of any particular output format.

mod content;
mod document;
mod geometry;
mod primitives;
mod section;

pub use content::{ContentItem, ContentKind, TableContent, TextContent};
pub use document::{Document, Metadata, PageStatus, PageTree};
pub use geometry::BoundingBox;
pub use primitives::{
    load_primitives, FigureRegion, PagePrimitives, PrimitiveSet, TableRegion, TextRun,
};
pub use section::{HierarchyLevel, SectionChild, SectionNode};
