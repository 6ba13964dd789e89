use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::picker::ValuePicker;

/// Draws a [`ValuePicker`] as a column of centered labels.
///
/// Cells cannot shrink, so a slot's opacity is mapped onto terminal
/// modifiers instead of its scale.
pub struct WheelView<'a, T, F> {
    picker: &'a ValuePicker<T>,
    label: F,
    active: bool,
    locked: bool,
}

impl<'a, T, F> WheelView<'a, T, F>
where
    F: Fn(&T) -> String,
{
    pub fn new(picker: &'a ValuePicker<T>, label: F) -> Self {
        Self {
            picker,
            label,
            active: false,
            locked: false,
        }
    }

    /// Highlight as the wheel under an active drag.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Render as not accepting input.
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }
}

pub fn slot_style(opacity: f64, is_selected: bool, active: bool, locked: bool) -> Style {
    let mut style = if is_selected {
        let color = if active { Color::Yellow } else { Color::Cyan };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else if opacity >= 0.7 {
        Style::default()
    } else if opacity >= 0.4 {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if locked {
        style = style.add_modifier(Modifier::DIM);
    }
    style
}

impl<T, F> Widget for WheelView<'_, T, F>
where
    F: Fn(&T) -> String,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let center = area.y as i32 + area.height as i32 / 2;
        let item_height = self.picker.item_height();

        let rendered = self.picker.render(|item, is_selected| {
            let label = (self.label)(item);
            if is_selected {
                format!("‹{label}›")
            } else {
                label
            }
        });

        for (slot, text) in rendered {
            let row = center + (slot.y_offset / item_height).round() as i32;
            if row < area.y as i32 || row >= area.bottom() as i32 {
                continue;
            }
            let width = text.width().min(area.width as usize) as u16;
            let x = area.x + (area.width - width) / 2;
            let style = slot_style(slot.opacity, slot.is_selected, self.active, self.locked);
            buf.set_stringn(x, row as u16, &text, area.width as usize, style);
        }
    }
}
