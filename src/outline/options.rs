//! Outline inference options.

/// Tunable policy for outline inference.
///
/// Defaults reproduce the published behavior; they are exposed as options
/// rather than buried constants so callers can tune per corpus.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// A span classifies at a level when its size reaches this fraction of
    /// the level threshold
    pub size_tolerance: f32,

    /// Lower bound applied to the smallest observed font size
    pub min_size_floor: f32,

    /// Spans longer than this many characters never classify
    pub max_heading_chars: usize,

    /// Case-insensitive substrings that disqualify a span (form-field noise)
    pub denylist: Vec<String>,

    /// A heading shorter than this many characters may be absorbed as a
    /// fragment continuation
    pub fragment_max_chars: usize,

    /// All-caps candidates must be strictly longer than this many characters
    pub caps_min_chars: usize,

    /// All-caps candidates need an uppercase ratio strictly above this
    pub caps_ratio: f32,

    /// All-caps candidates need a font size strictly above this
    pub caps_min_size: f32,

    /// Resolved titles must be strictly longer than this many characters
    pub min_title_chars: usize,
}

impl OutlineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size tolerance fraction.
    pub fn with_size_tolerance(mut self, tolerance: f32) -> Self {
        self.size_tolerance = tolerance;
        self
    }

    /// Set the minimum-size floor.
    pub fn with_min_size_floor(mut self, floor: f32) -> Self {
        self.min_size_floor = floor;
        self
    }

    /// Set the maximum classifiable span length.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Replace the denylist tokens.
    pub fn with_denylist<S: Into<String>>(mut self, tokens: impl IntoIterator<Item = S>) -> Self {
        self.denylist = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fragment-continuation length cutoff.
    pub fn with_fragment_max_chars(mut self, chars: usize) -> Self {
        self.fragment_max_chars = chars;
        self
    }

    /// Set the all-caps length, ratio, and size thresholds.
    pub fn with_caps_thresholds(mut self, min_chars: usize, ratio: f32, min_size: f32) -> Self {
        self.caps_min_chars = min_chars;
        self.caps_ratio = ratio;
        self.caps_min_size = min_size;
        self
    }

    /// Set the minimum accepted title length.
    pub fn with_min_title_chars(mut self, chars: usize) -> Self {
        self.min_title_chars = chars;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            size_tolerance: 0.9,
            min_size_floor: 8.0,
            max_heading_chars: 100,
            denylist: vec![
                "s.no".to_string(),
                "rs.".to_string(),
                "signature".to_string(),
            ],
            fragment_max_chars: 15,
            caps_min_chars: 3,
            caps_ratio: 0.7,
            caps_min_size: 12.0,
            min_title_chars: 3,
        }
    }
}
