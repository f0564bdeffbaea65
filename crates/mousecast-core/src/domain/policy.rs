//! Button-message framing and pacing policy.
//!
//! The two observed revisions of the original program disagree on whether
//! button-transition messages carry the cursor position.  Rather than
//! silently picking one, the choice is an explicit, configurable policy:
//!
//! - [`ButtonFraming::Split`]: press sends a bare button message followed by
//!   a separate position message; release sends a bare button message and
//!   does not resample the pointer.
//! - [`ButtonFraming::Combined`]: press and release each send a single
//!   button message with the position appended (release resamples first).
//!
//! [`ButtonPacing`] captures the downstream receiver's timing sensitivity:
//! closely-spaced button transitions may be missed, so consecutive button
//! messages are kept a minimum interval apart.  Position messages are never
//! paced.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default minimum spacing between consecutive button-transition messages.
pub const DEFAULT_BUTTON_INTERVAL_MS: u64 = 25;

/// What button-transition messages carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonFraming {
    /// Button messages are bare; press is followed by a separate position
    /// message, release is not resampled.
    Split,
    /// Button messages carry the position; release resamples the pointer.
    Combined,
}

impl ButtonFraming {
    /// Whether release events resample the pointer position.
    pub fn resamples_on_release(self) -> bool {
        matches!(self, ButtonFraming::Combined)
    }
}

impl Default for ButtonFraming {
    fn default() -> Self {
        // The later revision of the original carries position on release.
        ButtonFraming::Combined
    }
}

/// Minimum-interval policy for button-transition messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonPacing {
    /// Minimum spacing between two consecutive button messages, in ms.
    /// Zero disables pacing.
    pub min_interval_ms: u64,
}

impl ButtonPacing {
    /// Pacing disabled entirely.
    pub fn disabled() -> Self {
        Self { min_interval_ms: 0 }
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn is_enabled(&self) -> bool {
        self.min_interval_ms > 0
    }
}

impl Default for ButtonPacing {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_BUTTON_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_framing_is_combined() {
        assert_eq!(ButtonFraming::default(), ButtonFraming::Combined);
    }

    #[test]
    fn test_only_combined_framing_resamples_on_release() {
        assert!(ButtonFraming::Combined.resamples_on_release());
        assert!(!ButtonFraming::Split.resamples_on_release());
    }

    #[test]
    fn test_default_pacing_is_twenty_five_ms() {
        let pacing = ButtonPacing::default();
        assert_eq!(pacing.min_interval(), Duration::from_millis(25));
        assert!(pacing.is_enabled());
    }

    #[test]
    fn test_disabled_pacing_has_zero_interval() {
        let pacing = ButtonPacing::disabled();
        assert!(!pacing.is_enabled());
        assert_eq!(pacing.min_interval(), Duration::ZERO);
    }

}
