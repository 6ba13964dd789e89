pub mod layout;
pub mod wheel;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::{
    app::App,
    pickers::TimeColumn,
    race::{Boat, RaceTime, Winner},
    ui::{
        layout::{PickerSlot, TimeField},
        wheel::WheelView,
    },
    util::format_duration,
};

const HELP: &str =
    "drag wheels with the mouse | (f)reeze starts | (1)/(2) finish now | (e)qualize boat 2 | (s)econds | (q)uit";

fn winner_boat(winner: Winner) -> Option<Boat> {
    match winner {
        Winner::Boat1 => Some(Boat::One),
        Winner::Boat2 => Some(Boat::Two),
        Winner::Tie => None,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.layout(area);
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        // title
        let mut title = vec![
            Span::styled("racewheel", bold_style.fg(Color::Cyan)),
            Span::raw(format!("  {}", RaceTime::now())),
        ];
        if self.is_frozen() {
            title.push(Span::styled(
                "  START FROZEN",
                bold_style.fg(Color::Blue),
            ));
        }
        Paragraph::new(Line::from(title))
            .alignment(Alignment::Center)
            .render(layout.title, buf);

        let leader = self
            .summary()
            .as_ref()
            .ok()
            .and_then(|summary| winner_boat(summary.winner));

        for boat in Boat::ALL {
            let boat_layout = &layout.boats[boat.index()];
            let border_style = if leader == Some(boat) {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(format!(" {boat} "), bold_style))
                .render(boat_layout.block, buf);

            let start_title = if self.is_frozen() {
                "Start (frozen)"
            } else {
                "Start"
            };
            for (rect, title) in [
                (boat_layout.start, start_title),
                (boat_layout.finish, "Finish"),
                (boat_layout.rating, "Rating"),
            ] {
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .render(rect, buf);
            }
        }

        for (slot, rect) in &layout.wheels {
            let active = self.active_slot() == Some(*slot);
            match *slot {
                PickerSlot::Time {
                    boat,
                    field,
                    column,
                } => {
                    let picker = self.time_picker(boat, field);
                    let locked = field == TimeField::Start && picker.is_frozen();
                    let label = |v: &u32| match column {
                        TimeColumn::Hour => format!("{v:02}h"),
                        TimeColumn::Minute => format!("{v:02}m"),
                        TimeColumn::Second => format!("{v:02}s"),
                    };
                    WheelView::new(picker.column(column), label)
                        .active(active)
                        .locked(locked)
                        .render(*rect, buf);
                }
                PickerSlot::Rating { boat } => {
                    WheelView::new(self.rating_picker(boat).picker(), |v: &i32| v.to_string())
                        .active(active)
                        .render(*rect, buf);
                }
            }
        }

        // results
        let mut lines = match self.summary() {
            Ok(summary) => {
                let mut lines: Vec<Line> = Boat::ALL
                    .iter()
                    .map(|boat| {
                        let stats = summary.boat(*boat);
                        let style = if leader == Some(*boat) {
                            Style::default().fg(Color::Green)
                        } else {
                            Style::default()
                        };
                        Line::from(vec![
                            Span::styled(format!("{boat}  "), bold_style),
                            Span::raw("elapsed "),
                            Span::styled(format_duration(stats.elapsed), style),
                            Span::raw("  corrected "),
                            Span::styled(format_duration(stats.corrected), style),
                        ])
                    })
                    .collect();
                lines.push(Line::from(Span::styled(
                    summary.headline(),
                    bold_style.fg(Color::Green),
                )));
                lines.push(Line::from(Span::styled(
                    format!(
                        "{} ties by finishing at {}",
                        Boat::Two,
                        summary.equalizing_finish
                    ),
                    dim_style,
                )));
                lines
            }
            Err(err) => vec![Line::from(Span::styled(
                err.to_string(),
                bold_style.fg(Color::Red),
            ))],
        };
        if let Some(status) = &self.status {
            lines.push(Line::from(Span::styled(
                status.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            )));
        }
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Results"))
            .render(layout.summary, buf);

        Paragraph::new(HELP)
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center)
            .render(layout.help, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppSettings;
    use crate::race::{BoatData, RaceComparisonData};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(app: &App) -> String {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(app, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        let t = |h, m, s| RaceTime::new(h, m, s).unwrap();
        let race = RaceComparisonData::new(
            BoatData::new(t(12, 0, 0), t(14, 0, 0), -39),
            BoatData::new(t(12, 0, 0), t(14, 0, 0), 39),
        );
        App::new(race, AppSettings::default()).unwrap()
    }

    #[test]
    fn test_renders_boats_and_results() {
        let text = screen_text(&app());
        assert!(text.contains("Boat 1"));
        assert!(text.contains("Boat 2"));
        assert!(text.contains("Boat 2 wins by 0:20:13"));
        assert!(text.contains("14:18:19"));
        assert!(text.contains("‹14h›"));
        assert!(text.contains("‹-39›"));
    }

    #[test]
    fn test_renders_frozen_marker() {
        let mut app = app();
        app.toggle_freeze();
        let text = screen_text(&app);
        assert!(text.contains("START FROZEN"));
        assert!(text.contains("Start (frozen)"));
    }
}
