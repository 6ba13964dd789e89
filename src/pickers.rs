//! Time and rating pickers built from [`ValuePicker`] columns.

use tracing::warn;

use crate::error::PickerError;
use crate::picker::ValuePicker;
use crate::race::RaceTime;

pub const RATING_MIN: i32 = -201;
pub const RATING_MAX: i32 = 399;
pub const RATING_STEP: usize = 3;

/// One wheel of a [`TimePicker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum TimeColumn {
    Hour,
    Minute,
    Second,
}

/// Hours, minutes and (optionally shown) seconds as three independent wheels.
///
/// Every column change is turned back into a whole [`RaceTime`] using the
/// other columns' current selection.
#[derive(Debug, Clone)]
pub struct TimePicker {
    hour: ValuePicker<u32>,
    minute: ValuePicker<u32>,
    second: ValuePicker<u32>,
    show_seconds: bool,
    frozen: bool,
}

impl TimePicker {
    pub fn new(
        time: RaceTime,
        show_seconds: bool,
        visible_count: usize,
    ) -> Result<Self, PickerError> {
        Ok(Self {
            hour: ValuePicker::new((0..24).collect::<Vec<u32>>(), time.hour() as usize, visible_count)?,
            minute: ValuePicker::new(
                (0..60).collect::<Vec<u32>>(),
                time.minute() as usize,
                visible_count,
            )?,
            second: ValuePicker::new(
                (0..60).collect::<Vec<u32>>(),
                time.second() as usize,
                visible_count,
            )?,
            show_seconds,
            frozen: false,
        })
    }

    pub fn with_item_height(self, item_height: f64) -> Result<Self, PickerError> {
        Ok(Self {
            hour: self.hour.with_item_height(item_height)?,
            minute: self.minute.with_item_height(item_height)?,
            second: self.second.with_item_height(item_height)?,
            ..self
        })
    }

    pub fn with_frozen(mut self, frozen: bool) -> Self {
        self.set_frozen(frozen);
        self
    }

    /// The time the host last reported.
    pub fn time(&self) -> RaceTime {
        RaceTime::from_seconds(
            *self.hour.selected_item() * 3600
                + *self.minute.selected_item() * 60
                + *self.second.selected_item(),
        )
    }

    /// Host-side update of the shown time.
    pub fn set_time(&mut self, time: RaceTime) -> Result<(), PickerError> {
        self.hour.set_selected(time.hour() as usize)?;
        self.minute.set_selected(time.minute() as usize)?;
        self.second.set_selected(time.second() as usize)?;
        Ok(())
    }

    pub fn show_seconds(&self) -> bool {
        self.show_seconds
    }

    pub fn set_show_seconds(&mut self, show_seconds: bool) {
        if !show_seconds {
            self.second.cancel_drag();
        }
        self.show_seconds = show_seconds;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        self.hour.set_frozen(frozen);
        self.minute.set_frozen(frozen);
        self.second.set_frozen(frozen);
        self.frozen = frozen;
    }

    /// Columns currently shown, left to right.
    pub fn columns(&self) -> &'static [TimeColumn] {
        if self.show_seconds {
            &[TimeColumn::Hour, TimeColumn::Minute, TimeColumn::Second]
        } else {
            &[TimeColumn::Hour, TimeColumn::Minute]
        }
    }

    pub fn column(&self, column: TimeColumn) -> &ValuePicker<u32> {
        match column {
            TimeColumn::Hour => &self.hour,
            TimeColumn::Minute => &self.minute,
            TimeColumn::Second => &self.second,
        }
    }

    fn column_mut(&mut self, column: TimeColumn) -> &mut ValuePicker<u32> {
        match column {
            TimeColumn::Hour => &mut self.hour,
            TimeColumn::Minute => &mut self.minute,
            TimeColumn::Second => &mut self.second,
        }
    }

    /// Column with a drag in progress, if any.
    pub fn active_column(&self) -> Option<TimeColumn> {
        [TimeColumn::Hour, TimeColumn::Minute, TimeColumn::Second]
            .into_iter()
            .find(|column| self.column(*column).is_dragging())
    }

    /// Rebuild the full time with `column` set to the item at `index`.
    fn compose(&self, column: TimeColumn, index: usize) -> Option<RaceTime> {
        let value = *self.column(column).items().get(index)?;
        let current = self.time();
        match column {
            TimeColumn::Hour => current.with_hour(value),
            TimeColumn::Minute => current.with_minute(value),
            TimeColumn::Second => current.with_second(value),
        }
        .ok()
    }

    pub fn begin_drag(&mut self, column: TimeColumn) -> bool {
        if column == TimeColumn::Second && !self.show_seconds {
            return false;
        }
        self.column_mut(column).begin_drag()
    }

    pub fn drag_by(&mut self, column: TimeColumn, dy: f64) -> Option<RaceTime> {
        let index = self.column_mut(column).drag_by(dy)?;
        self.compose(column, index)
    }

    pub fn end_drag(&mut self, column: TimeColumn) -> Option<RaceTime> {
        let index = self.column_mut(column).end_drag()?;
        self.compose(column, index)
    }

    pub fn cancel_drag(&mut self, column: TimeColumn) -> bool {
        self.column_mut(column).cancel_drag()
    }
}

/// Ratings selectable in the UI: -201, -198, ..., 399.
pub fn rating_lattice() -> Vec<i32> {
    (RATING_MIN..=RATING_MAX).step_by(RATING_STEP).collect()
}

/// Position of `rating` in `lattice`, or 0 when it is not a lattice value.
pub fn rating_index(lattice: &[i32], rating: i32) -> usize {
    lattice
        .iter()
        .position(|value| *value == rating)
        .unwrap_or_else(|| {
            warn!(
                rating,
                fallback = lattice.first().copied().unwrap_or_default(),
                "rating is not on the picker lattice, falling back to first entry"
            );
            0
        })
}

/// A single wheel over the rating lattice.
#[derive(Debug, Clone)]
pub struct RatingPicker {
    picker: ValuePicker<i32>,
}

impl RatingPicker {
    pub fn new(rating: i32, visible_count: usize) -> Result<Self, PickerError> {
        let lattice = rating_lattice();
        let index = rating_index(&lattice, rating);
        Ok(Self {
            picker: ValuePicker::new(lattice, index, visible_count)?,
        })
    }

    pub fn with_item_height(self, item_height: f64) -> Result<Self, PickerError> {
        Ok(Self {
            picker: self.picker.with_item_height(item_height)?,
        })
    }

    pub fn picker(&self) -> &ValuePicker<i32> {
        &self.picker
    }

    pub fn rating(&self) -> i32 {
        *self.picker.selected_item()
    }

    pub fn set_rating(&mut self, rating: i32) -> Result<(), PickerError> {
        let index = rating_index(self.picker.items(), rating);
        self.picker.set_selected(index)
    }

    pub fn is_frozen(&self) -> bool {
        self.picker.is_frozen()
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        self.picker.set_frozen(frozen);
    }

    pub fn is_dragging(&self) -> bool {
        self.picker.is_dragging()
    }

    pub fn begin_drag(&mut self) -> bool {
        self.picker.begin_drag()
    }

    pub fn drag_by(&mut self, dy: f64) -> Option<i32> {
        let index = self.picker.drag_by(dy)?;
        self.picker.items().get(index).copied()
    }

    pub fn end_drag(&mut self) -> Option<i32> {
        let index = self.picker.end_drag()?;
        self.picker.items().get(index).copied()
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.picker.cancel_drag()
    }
}
