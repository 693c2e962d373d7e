//! Horizontal drag to save/skip translation.

use crate::types::Decision;

/// Minimum horizontal travel, in pointer units, that counts as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 100.0;

/// Travel at which the card starts tilting toward a decision.
pub const HINT_THRESHOLD: f32 = 50.0;

/// Tracks one drag from press to release.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeTracker {
    threshold: f32,
    start_x: Option<f32>,
    current_x: Option<f32>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.abs(),
            start_x: None,
            current_x: None,
        }
    }

    pub fn start(&mut self, x: f32) {
        self.start_x = Some(x);
        self.current_x = None;
    }

    /// Records pointer movement; ignored unless a drag is active.
    pub fn update(&mut self, x: f32) {
        if self.start_x.is_some() {
            self.current_x = Some(x);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.start_x.is_some()
    }

    /// Signed travel since `start`; zero before the first move.
    pub fn displacement(&self) -> f32 {
        match (self.start_x, self.current_x) {
            (Some(start), Some(current)) => current - start,
            _ => 0.0,
        }
    }

    /// Direction the card should lean while still dragging.
    pub fn hint(&self) -> Option<Decision> {
        let dx = self.displacement();
        if !self.is_dragging() || dx.abs() < HINT_THRESHOLD {
            return None;
        }
        Some(if dx > 0.0 { Decision::Save } else { Decision::Skip })
    }

    /// Ends the drag. Travel strictly beyond the threshold decides; anything
    /// shorter snaps the card back and yields `None`.
    pub fn end(&mut self) -> Option<Decision> {
        let dx = self.displacement();
        self.start_x = None;
        self.current_x = None;

        if dx > self.threshold {
            Some(Decision::Save)
        } else if dx < -self.threshold {
            Some(Decision::Skip)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
        self.current_x = None;
    }
}
