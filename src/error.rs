//! Error types for the picker core and the race arithmetic.

use thiserror::Error;

/// Contract violations when building or driving a [`crate::picker::ValuePicker`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PickerError {
    /// The ordered domain has no items.
    #[error("picker domain must contain at least one item")]
    EmptyDomain,

    /// The number of visible rows must be odd so the selection has a center.
    #[error("visible count must be odd and at least 1, got {count}")]
    InvalidVisibleCount { count: usize },

    /// The host supplied a selected index outside the domain.
    #[error("selected index {index} out of range for {len} items")]
    SelectedOutOfRange { index: usize, len: usize },

    /// Item height must be a positive, finite number of units.
    #[error("item height must be positive and finite, got {height}")]
    InvalidItemHeight { height: f64 },
}

/// Errors raised by the race time and handicap calculations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaceError {
    /// Hour, minute or second outside its clock range.
    #[error("invalid time of day {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },

    /// `550 + rating` must be positive for the correction formula.
    #[error("rating {rating} is out of range, it must be greater than -550")]
    InvalidRating { rating: i32 },

    /// Text that does not look like `HH:MM` or `HH:MM:SS`.
    #[error("cannot parse '{input}' as a time of day (expected HH:MM or HH:MM:SS)")]
    ParseTime { input: String },
}
