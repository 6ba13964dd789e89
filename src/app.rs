//! Host state: owns the race snapshot and routes gestures to the wheels.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{PickerError, RaceError};
use crate::pickers::{RatingPicker, TimeColumn, TimePicker};
use crate::race::{Boat, RaceComparisonData, RaceTime};
use crate::summary::RaceSummary;
use crate::ui::layout::{PickerSlot, RaceLayout, TimeField};
use crate::util::odd_at_least_one;

/// Preferences that shape the wheels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppSettings {
    pub show_seconds: bool,
    pub visible_count: usize,
    pub rows_per_item: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for AppSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            show_seconds: cfg.show_seconds,
            visible_count: odd_at_least_one(cfg.visible_count),
            rows_per_item: cfg.rows_per_item,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Pointer gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Gesture {
    slot: PickerSlot,
    last_row: Option<u16>,
}

#[derive(Debug)]
pub struct App {
    race: RaceComparisonData,
    summary: Result<RaceSummary, RaceError>,
    frozen: bool,
    settings: AppSettings,
    start_pickers: [TimePicker; 2],
    finish_pickers: [TimePicker; 2],
    rating_pickers: [RatingPicker; 2],
    gesture: Option<Gesture>,
    pub status: Option<String>,
}

impl App {
    pub fn new(race: RaceComparisonData, settings: AppSettings) -> Result<Self, PickerError> {
        let time_picker = |time: RaceTime| {
            TimePicker::new(time, settings.show_seconds, settings.visible_count)?
                .with_item_height(settings.rows_per_item)
        };
        let rating_picker = |rating: i32| {
            RatingPicker::new(rating, settings.visible_count)?
                .with_item_height(settings.rows_per_item)
        };

        let rating_pickers = [
            rating_picker(race.boat1.rating)?,
            rating_picker(race.boat2.rating)?,
        ];
        // ratings off the lattice were snapped by the pickers; the snapshot
        // follows so what is shown is what is computed
        let race = race
            .with_boat(Boat::One, |b| b.with_rating(rating_pickers[0].rating()))
            .with_boat(Boat::Two, |b| b.with_rating(rating_pickers[1].rating()));

        Ok(Self {
            summary: RaceSummary::derive(&race),
            start_pickers: [time_picker(race.boat1.start)?, time_picker(race.boat2.start)?],
            finish_pickers: [
                time_picker(race.boat1.finish)?,
                time_picker(race.boat2.finish)?,
            ],
            rating_pickers,
            race,
            frozen: false,
            settings,
            gesture: None,
            status: None,
        })
    }

    pub fn race(&self) -> &RaceComparisonData {
        &self.race
    }

    pub fn summary(&self) -> &Result<RaceSummary, RaceError> {
        &self.summary
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn active_slot(&self) -> Option<PickerSlot> {
        self.gesture.map(|g| g.slot)
    }

    pub fn time_picker(&self, boat: Boat, field: TimeField) -> &TimePicker {
        match field {
            TimeField::Start => &self.start_pickers[boat.index()],
            TimeField::Finish => &self.finish_pickers[boat.index()],
        }
    }

    fn time_picker_mut(&mut self, boat: Boat, field: TimeField) -> &mut TimePicker {
        match field {
            TimeField::Start => &mut self.start_pickers[boat.index()],
            TimeField::Finish => &mut self.finish_pickers[boat.index()],
        }
    }

    pub fn rating_picker(&self, boat: Boat) -> &RatingPicker {
        &self.rating_pickers[boat.index()]
    }

    pub fn layout(&self, area: Rect) -> RaceLayout {
        RaceLayout::compute(area, self.settings.visible_count, self.settings.show_seconds)
    }

    /// Replace the snapshot and bring every wheel in line with it.
    pub fn apply(&mut self, race: RaceComparisonData) -> Result<(), PickerError> {
        if race == self.race {
            return Ok(());
        }
        debug!(?race, "race snapshot replaced");
        self.race = race;
        self.summary = RaceSummary::derive(&race);
        if let Err(err) = &self.summary {
            warn!(%err, "race summary unavailable");
        }

        for boat in Boat::ALL {
            let data = *race.boat(boat);
            self.start_pickers[boat.index()].set_time(data.start)?;
            self.finish_pickers[boat.index()].set_time(data.finish)?;
            self.rating_pickers[boat.index()].set_rating(data.rating)?;
        }
        Ok(())
    }

    fn apply_time(
        &mut self,
        boat: Boat,
        field: TimeField,
        time: RaceTime,
    ) -> Result<(), PickerError> {
        let race = self.race.with_boat(boat, |b| match field {
            TimeField::Start => b.with_start(time),
            TimeField::Finish => b.with_finish(time),
        });
        self.apply(race)
    }

    fn apply_rating(&mut self, boat: Boat, rating: i32) -> Result<(), PickerError> {
        let race = self.race.with_boat(boat, |b| b.with_rating(rating));
        self.apply(race)
    }

    /// Pointer down on a wheel. Returns whether a gesture started.
    pub fn pointer_down(&mut self, slot: PickerSlot, row: Option<u16>) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        let started = match slot {
            PickerSlot::Time {
                boat,
                field,
                column,
            } => self.time_picker_mut(boat, field).begin_drag(column),
            PickerSlot::Rating { boat } => self.rating_pickers[boat.index()].begin_drag(),
        };
        if started {
            self.gesture = Some(Gesture {
                slot,
                last_row: row,
            });
        }
        started
    }

    /// Pointer moved `dy` rows since the last move.
    pub fn pointer_move(&mut self, dy: f64) -> Result<(), PickerError> {
        let Some(gesture) = self.gesture else {
            return Ok(());
        };
        match gesture.slot {
            PickerSlot::Time {
                boat,
                field,
                column,
            } => {
                if let Some(time) = self.time_picker_mut(boat, field).drag_by(column, dy) {
                    self.apply_time(boat, field, time)?;
                }
            }
            PickerSlot::Rating { boat } => {
                if let Some(rating) = self.rating_pickers[boat.index()].drag_by(dy) {
                    self.apply_rating(boat, rating)?;
                }
            }
        }
        Ok(())
    }

    pub fn pointer_up(&mut self) -> Result<(), PickerError> {
        let Some(gesture) = self.gesture.take() else {
            return Ok(());
        };
        match gesture.slot {
            PickerSlot::Time {
                boat,
                field,
                column,
            } => {
                if let Some(time) = self.time_picker_mut(boat, field).end_drag(column) {
                    self.apply_time(boat, field, time)?;
                }
            }
            PickerSlot::Rating { boat } => {
                if let Some(rating) = self.rating_pickers[boat.index()].end_drag() {
                    self.apply_rating(boat, rating)?;
                }
            }
        }
        Ok(())
    }

    /// Abandon the gesture without committing the wheel's last position.
    pub fn pointer_cancel(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        match gesture.slot {
            PickerSlot::Time {
                boat,
                field,
                column,
            } => self.time_picker_mut(boat, field).cancel_drag(column),
            PickerSlot::Rating { boat } => self.rating_pickers[boat.index()].cancel_drag(),
        }
    }

    /// Translate a terminal mouse event using the current screen layout.
    pub fn on_mouse(&mut self, event: MouseEvent, layout: &RaceLayout) -> Result<(), PickerError> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(slot) = layout.hit(event.column, event.row) {
                    self.pointer_down(slot, Some(event.row));
                }
                Ok(())
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(gesture) = self.gesture.as_mut() else {
                    return Ok(());
                };
                let dy = gesture
                    .last_row
                    .map(|last| event.row as f64 - last as f64)
                    .unwrap_or(0.0);
                gesture.last_row = Some(event.row);
                if dy != 0.0 {
                    self.pointer_move(dy)?;
                }
                Ok(())
            }
            MouseEventKind::Up(MouseButton::Left) => self.pointer_up(),
            _ => Ok(()),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Result<KeyOutcome, PickerError> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(KeyOutcome::Quit);
        }
        match key.code {
            KeyCode::Esc => {
                if !self.pointer_cancel() {
                    return Ok(KeyOutcome::Quit);
                }
            }
            KeyCode::Char('q') => return Ok(KeyOutcome::Quit),
            KeyCode::Char('f') => self.toggle_freeze(),
            KeyCode::Char('s') => self.toggle_seconds(),
            KeyCode::Char('1') => self.stamp_finish(Boat::One, RaceTime::now())?,
            KeyCode::Char('2') => self.stamp_finish(Boat::Two, RaceTime::now())?,
            KeyCode::Char('e') => self.apply_equalizing_finish()?,
            _ => {}
        }
        Ok(KeyOutcome::Continue)
    }

    /// Lock or unlock the start times.
    pub fn toggle_freeze(&mut self) {
        self.frozen = !self.frozen;
        if self.frozen {
            if let Some(PickerSlot::Time {
                field: TimeField::Start,
                ..
            }) = self.active_slot()
            {
                self.gesture = None;
            }
        }
        for picker in &mut self.start_pickers {
            picker.set_frozen(self.frozen);
        }
        info!(frozen = self.frozen, "start times {}", if self.frozen { "frozen" } else { "unfrozen" });
    }

    pub fn toggle_seconds(&mut self) {
        let show = !self.settings.show_seconds;
        if !show {
            if let Some(PickerSlot::Time {
                column: TimeColumn::Second,
                ..
            }) = self.active_slot()
            {
                self.gesture = None;
            }
        }
        self.settings.show_seconds = show;
        for picker in self.start_pickers.iter_mut().chain(self.finish_pickers.iter_mut()) {
            picker.set_show_seconds(show);
        }
    }

    /// Set `boat`'s finish time, e.g. from the wall clock.
    pub fn stamp_finish(&mut self, boat: Boat, time: RaceTime) -> Result<(), PickerError> {
        if let Some(PickerSlot::Time {
            boat: active,
            field: TimeField::Finish,
            ..
        }) = self.active_slot()
        {
            if active == boat {
                self.pointer_cancel();
            }
        }
        info!(%boat, %time, "finish stamped");
        self.status = Some(format!("{boat} finished at {time}"));
        self.apply_time(boat, TimeField::Finish, time)
    }

    /// Move boat 2's finish to the time that ties it with boat 1.
    pub fn apply_equalizing_finish(&mut self) -> Result<(), PickerError> {
        let finish = match &self.summary {
            Ok(summary) => summary.equalizing_finish,
            Err(err) => {
                self.status = Some(err.to_string());
                return Ok(());
            }
        };
        self.stamp_finish(Boat::Two, finish)?;
        self.status = Some(format!("{} needs {finish} to tie", Boat::Two));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::{BoatData, Winner};

    fn t(h: u32, m: u32, s: u32) -> RaceTime {
        RaceTime::new(h, m, s).unwrap()
    }

    fn app() -> App {
        let race = RaceComparisonData::new(
            BoatData::new(t(12, 0, 0), t(14, 0, 0), -39),
            BoatData::new(t(12, 0, 0), t(14, 0, 0), 39),
        );
        App::new(race, AppSettings::default()).unwrap()
    }

    const BOAT1_FINISH_HOUR: PickerSlot = PickerSlot::Time {
        boat: Boat::One,
        field: TimeField::Finish,
        column: TimeColumn::Hour,
    };

    #[test]
    fn test_live_preview_updates_race() {
        let mut app = app();
        assert!(app.pointer_down(BOAT1_FINISH_HOUR, None));
        app.pointer_move(-1.0).unwrap();
        assert_eq!(app.race().boat1.finish, t(15, 0, 0));

        app.pointer_move(-1.0).unwrap();
        assert_eq!(app.race().boat1.finish, t(16, 0, 0));

        app.pointer_up().unwrap();
        assert_eq!(app.race().boat1.finish, t(16, 0, 0));
        assert_eq!(app.active_slot(), None);
    }

    #[test]
    fn test_cancel_keeps_live_updates_but_commits_nothing_more() {
        let mut app = app();
        app.pointer_down(BOAT1_FINISH_HOUR, None);
        app.pointer_move(-1.0).unwrap();
        assert!(app.pointer_cancel());
        assert_eq!(app.race().boat1.finish, t(15, 0, 0));
        assert!(!app.pointer_cancel());
    }

    #[test]
    fn test_freeze_locks_start_times_only() {
        let mut app = app();
        app.toggle_freeze();
        let start = PickerSlot::Time {
            boat: Boat::One,
            field: TimeField::Start,
            column: TimeColumn::Minute,
        };
        assert!(!app.pointer_down(start, None));
        assert!(app.pointer_down(BOAT1_FINISH_HOUR, None));
    }

    #[test]
    fn test_freeze_mid_drag_drops_gesture() {
        let mut app = app();
        let start = PickerSlot::Time {
            boat: Boat::Two,
            field: TimeField::Start,
            column: TimeColumn::Hour,
        };
        app.pointer_down(start, None);
        app.toggle_freeze();
        assert_eq!(app.active_slot(), None);
        assert!(!app.time_picker(Boat::Two, TimeField::Start).column(TimeColumn::Hour).is_dragging());
    }

    #[test]
    fn test_rating_drag_changes_winner() {
        let mut app = app();
        assert_eq!(app.summary().as_ref().unwrap().winner, Winner::Boat2);
        assert!(app.pointer_down(PickerSlot::Rating { boat: Boat::One }, None));
        // -39 -> 39 is 26 lattice steps
        app.pointer_move(-26.0).unwrap();
        app.pointer_up().unwrap();
        assert_eq!(app.race().boat1.rating, 39);
        assert_eq!(app.summary().as_ref().unwrap().winner, Winner::Tie);
    }

    #[test]
    fn test_equalizing_finish_produces_near_tie() {
        let mut app = app();
        app.apply_equalizing_finish().unwrap();
        assert_eq!(app.race().boat2.finish, t(14, 18, 19));
        assert_eq!(
            app.time_picker(Boat::Two, TimeField::Finish).time(),
            t(14, 18, 19)
        );
        assert!(app.summary().as_ref().unwrap().difference <= 1);
    }

    #[test]
    fn test_stamp_finish_updates_picker() {
        let mut app = app();
        app.stamp_finish(Boat::One, t(13, 5, 7)).unwrap();
        assert_eq!(app.race().boat1.finish, t(13, 5, 7));
        assert_eq!(
            app.time_picker(Boat::One, TimeField::Finish).time(),
            t(13, 5, 7)
        );
        assert!(app.status.as_deref().unwrap().contains("13:05:07"));
    }

    #[test]
    fn test_off_lattice_rating_snaps_snapshot() {
        let race = RaceComparisonData::new(
            BoatData::new(t(12, 0, 0), t(14, 0, 0), 1),
            BoatData::new(t(12, 0, 0), t(14, 0, 0), 0),
        );
        let app = App::new(race, AppSettings::default()).unwrap();
        assert_eq!(app.race().boat1.rating, -201);
    }

    #[test]
    fn test_esc_cancels_before_quitting() {
        let mut app = app();
        app.pointer_down(BOAT1_FINISH_HOUR, None);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.on_key(esc).unwrap(), KeyOutcome::Continue);
        assert_eq!(app.on_key(esc).unwrap(), KeyOutcome::Quit);
    }

    #[test]
    fn test_toggle_seconds_changes_layout() {
        let mut app = app();
        let area = Rect::new(0, 0, 120, 30);
        assert_eq!(app.layout(area).wheels.len(), 10);
        app.toggle_seconds();
        assert!(app.settings().show_seconds);
        assert_eq!(app.layout(area).wheels.len(), 14);
    }
}
