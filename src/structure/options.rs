//! Build options and configuration.

use crate::render::PageSelection;

/// Options for building a document tree.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Error handling mode for malformed pages
    pub error_mode: ErrorMode,

    /// Whether to build pages in parallel
    pub parallel: bool,

    /// Page selection (which pages to build)
    pub pages: PageSelection,

    /// Primitive normalization settings
    pub normalize: NormalizeOptions,

    /// Heading classification settings
    pub classifier: ClassifierConfig,

    /// Append numeric-only body runs to the preceding paragraph
    pub merge_numeric_runs: bool,
}

impl BuildOptions {
    /// Create new build options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Abort on the first malformed page.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Replace malformed pages with failure markers (default).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set normalization options.
    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set classifier configuration.
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Enable or disable merging of numeric-only runs.
    pub fn with_numeric_merge(mut self, merge: bool) -> Self {
        self.merge_numeric_runs = merge;
        self
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            parallel: true,
            pages: PageSelection::All,
            normalize: NormalizeOptions::default(),
            classifier: ClassifierConfig::default(),
            merge_numeric_runs: false,
        }
    }
}

/// Error handling mode for page-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the whole document on the first malformed page
    Strict,
    /// Keep going and mark the page as failed
    #[default]
    Lenient,
}

/// Options for the primitive normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Trim and NFC-normalize text runs
    pub normalize_text: bool,

    /// Drop figures whose bounding box repeats an earlier figure
    pub dedupe_figures: bool,

    /// Drop short all-caps runs (running headers such as "CHAPTER 2")
    pub skip_running_headers: bool,
}

impl NormalizeOptions {
    /// Create normalization options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable Unicode normalization.
    pub fn with_text_normalization(mut self, enabled: bool) -> Self {
        self.normalize_text = enabled;
        self
    }

    /// Enable or disable figure de-duplication.
    pub fn with_figure_dedup(mut self, enabled: bool) -> Self {
        self.dedupe_figures = enabled;
        self
    }

    /// Enable or disable dropping of running headers.
    pub fn with_running_header_skip(mut self, enabled: bool) -> Self {
        self.skip_running_headers = enabled;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            normalize_text: true,
            dedupe_figures: true,
            skip_running_headers: false,
        }
    }
}

/// Configuration for heading classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    /// Relative tolerance for grouping font sizes into one cluster
    pub cluster_tolerance: f32,

    /// Runs longer than this many characters are always body text
    pub max_heading_chars: usize,

    /// Only bold or all-caps runs may become headings
    pub require_emphasis: bool,
}

impl ClassifierConfig {
    /// Create classifier configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the clustering tolerance (clamped to `0.0..=1.0`).
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.cluster_tolerance = tolerance.clamp(0.0, 1.0);
        self
    }

    /// Set the heading length threshold.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Require bold or all-caps for headings.
    pub fn with_required_emphasis(mut self, required: bool) -> Self {
        self.require_emphasis = required;
        self
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            cluster_tolerance: 0.05,
            max_heading_chars: 80,
            require_emphasis: false,
        }
    }
}
