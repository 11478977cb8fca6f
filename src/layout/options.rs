//! Layout extraction options.

/// Options controlling header/footer cropping and line grouping.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Vertical tolerance for grouping characters into one line.
    pub y_tolerance: f32,
    /// Header height assumed when no qualifying rule is found.
    pub default_header_height: f32,
    /// Search window from the top of a non-first page for the header rule.
    pub max_header_height: f32,
    /// Search window from the bottom of any page for the footer rule.
    pub max_footer_height: f32,
}

impl LayoutOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line-grouping vertical tolerance.
    pub fn with_y_tolerance(mut self, tol: f32) -> Self {
        self.y_tolerance = tol;
        self
    }

    /// Set the fallback header height used when no rule qualifies.
    pub fn with_default_header_height(mut self, height: f32) -> Self {
        self.default_header_height = height;
        self
    }

    /// Set the header-rule search window for non-first pages.
    pub fn with_max_header_height(mut self, height: f32) -> Self {
        self.max_header_height = height;
        self
    }

    /// Set the footer-rule search window.
    pub fn with_max_footer_height(mut self, height: f32) -> Self {
        self.max_footer_height = height;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            y_tolerance: 2.0,
            default_header_height: 30.0,
            max_header_height: 200.0,
            max_footer_height: 200.0,
        }
    }
}
