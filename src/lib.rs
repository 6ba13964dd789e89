// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod logging;
pub mod picker;
pub mod pickers;
pub mod race;
pub mod runtime;
pub mod summary;
pub mod ui;
pub mod util;

pub use error::{PickerError, RaceError};
pub use picker::ValuePicker;
pub use pickers::{RatingPicker, TimePicker};
pub use race::{
    corrected_seconds, determine_winner, elapsed_seconds, equalizing_finish_time_for_boat2,
    time_difference_seconds, BoatData, RaceComparisonData, RaceTime, Winner,
};

pub const TICK_RATE_MS: u64 = 250;
