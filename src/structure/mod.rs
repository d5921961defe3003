//! Hierarchy reconstruction pipeline.
//!
//! Pages flow through four stages:
//!
//! 1. [`normalizer`] merges raw primitives into reading-ordered content items
//! 2. [`classifier`] assigns heading levels from document-wide font statistics
//! 3. [`builder`] folds a page's classified items into a section tree
//! 4. [`assembler`] runs the stages for every page and collects a [`Document`](crate::Document)

pub mod assembler;
pub mod builder;
pub mod classifier;
pub mod normalizer;
mod options;

pub use assembler::DocumentAssembler;
pub use builder::HierarchyBuilder;
pub use classifier::{
    classify, cluster_font_sizes, prepare, ClassifiedItem, FontCluster, FontHistogram, Thresholds,
};
pub use normalizer::{normalize_page, reading_order, shares_line, NormalizeReport, NormalizedPage};
pub use options::{BuildOptions, ClassifierConfig, ErrorMode, NormalizeOptions};
