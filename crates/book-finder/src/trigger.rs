//! Scroll-proximity helper for hosts that track a scrollable viewport.
//!
//! The finder only consumes a boolean "near bottom" signal; this is one way
//! of producing it.

/// Distance from the bottom, in pixels, that counts as "near"
pub const NEAR_BOTTOM_THRESHOLD: f64 = 100.0;

/// Viewport and document measurements at the time of a scroll event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub viewport_height: f64,
    pub scroll_y: f64,
    pub page_height: f64,
}

impl ScrollMetrics {
    pub fn is_near_bottom(&self) -> bool {
        self.is_within(NEAR_BOTTOM_THRESHOLD)
    }

    pub fn is_within(&self, threshold: f64) -> bool {
        self.viewport_height + self.scroll_y >= self.page_height - threshold
    }
}
