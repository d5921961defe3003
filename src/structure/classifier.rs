//! Heading classification from document-wide font statistics.
//!
//! Classification is two-phase: [`prepare`] builds a font-size histogram over
//! every page and derives [`Thresholds`] once, then [`classify`] applies those
//! thresholds to each page. Pages never recalibrate on their own.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{ContentItem, HierarchyLevel, PagePrimitives, TextContent};

use super::ClassifierConfig;

/// Multiset of font sizes, bucketed at 0.1pt precision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontHistogram {
    sizes: BTreeMap<u32, usize>,
}

impl FontHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the histogram from every visible text run of every page.
    pub fn from_pages<'a>(pages: impl IntoIterator<Item = &'a PagePrimitives>) -> Self {
        let mut histogram = Self::new();
        for run in pages.into_iter().flat_map(|p| &p.text_runs) {
            if !run.text.trim().is_empty() {
                histogram.add(run.font_size);
            }
        }
        histogram
    }

    /// Build a histogram from raw sizes.
    pub fn from_sizes(sizes: impl IntoIterator<Item = f32>) -> Self {
        let mut histogram = Self::new();
        for size in sizes {
            histogram.add(size);
        }
        histogram
    }

    /// Add a font size observation. Non-positive or non-finite sizes are ignored.
    pub fn add(&mut self, size: f32) {
        if size.is_finite() && size > 0.0 {
            *self.sizes.entry(size_key(size)).or_insert(0) += 1;
        }
    }

    /// Total number of observations.
    pub fn total(&self) -> usize {
        self.sizes.values().sum()
    }

    /// Number of distinct sizes.
    pub fn distinct(&self) -> usize {
        self.sizes.len()
    }

    /// Check if the histogram has no observations.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Iterate over `(size, count)` in ascending size order.
    pub fn iter(&self) -> impl Iterator<Item = (f32, usize)> + '_ {
        self.sizes.iter().map(|(k, c)| (key_size(*k), *c))
    }
}

/// A group of font sizes treated as one typographic level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontCluster {
    /// Smallest size in the cluster
    pub min: f32,
    /// Largest size in the cluster
    pub max: f32,
    /// Count-weighted mean size
    pub mean: f32,
    /// Number of runs in the cluster
    pub count: usize,
}

impl FontCluster {
    /// Check if a font size belongs to this cluster.
    pub fn contains(&self, size: f32) -> bool {
        let key = size_key(size);
        key >= size_key(self.min) && key <= size_key(self.max)
    }
}

/// Group font sizes that differ by less than `tolerance` (relative).
///
/// Sizes are swept in ascending order; a size joins the current cluster when
/// it lies within `tolerance` of the cluster's running mean. The result is
/// sorted by mean size, largest first.
pub fn cluster_font_sizes(histogram: &FontHistogram, tolerance: f32) -> Vec<FontCluster> {
    let mut clusters: Vec<FontCluster> = Vec::new();

    for (size, count) in histogram.iter() {
        match clusters.last_mut() {
            Some(current) if size - current.mean < tolerance * size => {
                let total = current.count + count;
                current.mean = (current.mean * current.count as f32 + size * count as f32)
                    / total as f32;
                current.max = size;
                current.count = total;
            }
            _ => clusters.push(FontCluster {
                min: size,
                max: size,
                mean: size,
                count,
            }),
        }
    }

    clusters.reverse();
    clusters
}

/// Document-wide classification thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    clusters: Vec<FontCluster>,
    body: Option<FontCluster>,
    bands: Vec<(HierarchyLevel, FontCluster)>,
    config: ClassifierConfig,
}

impl Thresholds {
    /// Derive thresholds from a histogram.
    ///
    /// The most populated cluster is body text. Up to three clusters above it
    /// become Title, Section and SubSection, largest first. When the most
    /// populated cluster is also the largest (headings outnumber body runs),
    /// the smallest cluster is body instead, so any two clusters yield at
    /// least one heading level.
    pub fn from_histogram(histogram: &FontHistogram, config: &ClassifierConfig) -> Self {
        let clusters = cluster_font_sizes(histogram, config.cluster_tolerance);

        // Ties go to the smaller size
        let modal = clusters
            .iter()
            .copied()
            .max_by(|a, b| a.count.cmp(&b.count).then(b.mean.total_cmp(&a.mean)));

        let mut body = modal;
        let mut bands = heading_bands(&clusters, body);
        if bands.is_empty() && clusters.len() >= 2 {
            body = clusters.last().copied();
            bands = heading_bands(&clusters, body);
            log::debug!(
                "Modal font cluster {:?} has nothing above it; using smallest cluster as body",
                modal.map(|c| c.mean)
            );
        }

        let thresholds = Self {
            clusters,
            body,
            bands,
            config: *config,
        };

        log::debug!(
            "Font clusters: {:?}; body {:?}; {} heading level(s)",
            thresholds
                .clusters
                .iter()
                .map(|c| (c.mean, c.count))
                .collect::<Vec<_>>(),
            thresholds.body.map(|b| b.mean),
            thresholds.bands.len()
        );

        thresholds
    }

    /// All clusters, largest first.
    pub fn clusters(&self) -> &[FontCluster] {
        &self.clusters
    }

    /// The body-text cluster.
    pub fn body_cluster(&self) -> Option<&FontCluster> {
        self.body.as_ref()
    }

    /// The size band assigned to a heading level.
    pub fn band(&self, level: HierarchyLevel) -> Option<&FontCluster> {
        self.bands
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, cluster)| cluster)
    }

    /// Number of heading levels in use (0-3).
    pub fn heading_levels(&self) -> usize {
        self.bands.len()
    }

    /// Check if classification degrades to body text only.
    pub fn is_degraded(&self) -> bool {
        self.bands.is_empty()
    }

    /// Report [`Error::InsufficientSignal`] when no heading level exists.
    ///
    /// This is a soft condition; callers log it and keep going.
    pub fn check_signal(&self) -> Result<()> {
        if self.is_degraded() {
            return Err(Error::InsufficientSignal {
                clusters: self.clusters.len(),
            });
        }
        Ok(())
    }

    /// Classify a single text payload.
    pub fn level_for(&self, text: &TextContent) -> HierarchyLevel {
        if text.char_count() > self.config.max_heading_chars {
            return HierarchyLevel::Body;
        }
        if self.config.require_emphasis && !(text.bold || text.is_uppercase()) {
            return HierarchyLevel::Body;
        }
        self.bands
            .iter()
            .find(|(_, cluster)| cluster.contains(text.font_size))
            .map(|(level, _)| *level)
            .unwrap_or(HierarchyLevel::Body)
    }
}

/// Clusters strictly larger than `body`, paired with heading levels.
fn heading_bands(
    clusters: &[FontCluster],
    body: Option<FontCluster>,
) -> Vec<(HierarchyLevel, FontCluster)> {
    let Some(body) = body else {
        return Vec::new();
    };
    clusters
        .iter()
        .filter(|c| c.mean > body.mean)
        .zip(HierarchyLevel::HEADINGS)
        .map(|(cluster, level)| (level, *cluster))
        .collect()
}

/// A content item with its assigned level.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedItem {
    /// The content item
    pub item: ContentItem,

    /// Level for text runs; `None` for tables and figures
    pub level: Option<HierarchyLevel>,
}

impl ClassifiedItem {
    /// Check if the item opens a section.
    pub fn is_heading(&self) -> bool {
        self.level.is_some_and(HierarchyLevel::is_heading)
    }
}

/// Phase one: derive thresholds from every page of the document.
pub fn prepare<'a>(
    pages: impl IntoIterator<Item = &'a PagePrimitives>,
    config: &ClassifierConfig,
) -> Thresholds {
    let histogram = FontHistogram::from_pages(pages);
    log::debug!(
        "Font histogram: {} runs, {} distinct sizes",
        histogram.total(),
        histogram.distinct()
    );
    Thresholds::from_histogram(&histogram, config)
}

/// Phase two: assign levels to one page's items.
pub fn classify(items: Vec<ContentItem>, thresholds: &Thresholds) -> Vec<ClassifiedItem> {
    items
        .into_iter()
        .map(|item| {
            let level = item.as_text().map(|text| thresholds.level_for(text));
            ClassifiedItem { item, level }
        })
        .collect()
}

fn size_key(size: f32) -> u32 {
    (size * 10.0).round() as u32
}

fn key_size(key: u32) -> f32 {
    key as f32 / 10.0
}
