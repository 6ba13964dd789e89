//! Screen geometry shared by rendering and mouse hit-testing.

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    widgets::{Block, Borders},
};

use crate::pickers::TimeColumn;
use crate::race::Boat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum TimeField {
    Start,
    Finish,
}

/// Address of one draggable wheel on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerSlot {
    Time {
        boat: Boat,
        field: TimeField,
        column: TimeColumn,
    },
    Rating {
        boat: Boat,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoatLayout {
    pub block: Rect,
    pub start: Rect,
    pub finish: Rect,
    pub rating: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceLayout {
    pub title: Rect,
    pub boats: [BoatLayout; 2],
    pub summary: Rect,
    pub help: Rect,
    pub wheels: Vec<(PickerSlot, Rect)>,
}

impl RaceLayout {
    pub fn compute(area: Rect, visible_count: usize, show_seconds: bool) -> Self {
        let wheel_height = visible_count.min(u16::MAX as usize) as u16;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),                // title
                Constraint::Length(wheel_height.saturating_add(4)), // boats
                Constraint::Length(7),                // results
                Constraint::Min(0),
                Constraint::Length(1), // help
            ])
            .split(area);

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(rows[1]);

        let mut wheels = Vec::new();
        let boats = [
            boat_layout(Boat::One, halves[0], show_seconds, &mut wheels),
            boat_layout(Boat::Two, halves[1], show_seconds, &mut wheels),
        ];

        Self {
            title: rows[0],
            boats,
            summary: rows[2],
            help: rows[4],
            wheels,
        }
    }

    /// Wheel under the given terminal cell.
    pub fn hit(&self, column: u16, row: u16) -> Option<PickerSlot> {
        let position = Position::new(column, row);
        self.wheels
            .iter()
            .find(|(_, rect)| rect.contains(position))
            .map(|(slot, _)| *slot)
    }

    pub fn wheel(&self, slot: PickerSlot) -> Option<Rect> {
        self.wheels
            .iter()
            .find(|(candidate, _)| *candidate == slot)
            .map(|(_, rect)| *rect)
    }
}

fn boat_layout(
    boat: Boat,
    area: Rect,
    show_seconds: bool,
    wheels: &mut Vec<(PickerSlot, Rect)>,
) -> BoatLayout {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let sections = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(2, 5),
            Constraint::Ratio(2, 5),
            Constraint::Ratio(1, 5),
        ])
        .split(inner);

    for (field, section) in [(TimeField::Start, sections[0]), (TimeField::Finish, sections[1])] {
        let columns: &[TimeColumn] = if show_seconds {
            &[TimeColumn::Hour, TimeColumn::Minute, TimeColumn::Second]
        } else {
            &[TimeColumn::Hour, TimeColumn::Minute]
        };
        let section_inner = Block::default().borders(Borders::ALL).inner(section);
        let rects = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, columns.len() as u32);
                columns.len()
            ])
            .split(section_inner);
        for (column, rect) in columns.iter().zip(rects.iter()) {
            wheels.push((
                PickerSlot::Time {
                    boat,
                    field,
                    column: *column,
                },
                *rect,
            ));
        }
    }

    wheels.push((
        PickerSlot::Rating { boat },
        Block::default().borders(Borders::ALL).inner(sections[2]),
    ));

    BoatLayout {
        block: area,
        start: sections[0],
        finish: sections[1],
        rating: sections[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_count_follows_seconds_toggle() {
        let area = Rect::new(0, 0, 120, 30);
        assert_eq!(RaceLayout::compute(area, 5, false).wheels.len(), 10);
        assert_eq!(RaceLayout::compute(area, 5, true).wheels.len(), 14);
    }

    #[test]
    fn test_wheels_have_visible_count_rows() {
        let layout = RaceLayout::compute(Rect::new(0, 0, 120, 30), 5, false);
        assert!(layout.wheels.iter().all(|(_, rect)| rect.height == 5));
    }

    #[test]
    fn test_hit_finds_wheel_under_cell() {
        let layout = RaceLayout::compute(Rect::new(0, 0, 120, 30), 5, false);
        let slot = PickerSlot::Rating { boat: Boat::Two };
        let rect = layout.wheel(slot).unwrap();
        assert_eq!(layout.hit(rect.x, rect.y + 2), Some(slot));
        assert_eq!(layout.hit(0, 0), None);
    }

    #[test]
    fn test_huge_visible_count_fits_area() {
        let area = Rect::new(0, 0, 120, 30);
        for count in [u16::MAX as usize, usize::MAX] {
            let layout = RaceLayout::compute(area, count, true);
            assert_eq!(layout.wheels.len(), 14);
            assert!(layout
                .wheels
                .iter()
                .all(|(_, rect)| rect.bottom() <= area.bottom()));
        }
    }
}
