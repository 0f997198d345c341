use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::prayer_times::PrayerWindow;
use crate::tui::labels::Labels;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    window: Option<&PrayerWindow>,
    error: Option<&str>,
    labels: &Labels,
) {
    let block = Block::default()
        .title(Span::styled(labels.next_prayer, theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let content: Vec<Line> = match (window, error) {
        (_, Some(err)) => vec![
            Line::from(""),
            Line::from(Span::styled(format!("  ✗ {}", err), theme::red())),
        ],
        (None, None) => vec![
            Line::from(""),
            Line::from(Span::styled("  No data", theme::dim())),
        ],
        (Some(w), None) => {
            let name = w.next.name.display_name().to_uppercase();
            let when = if w.next.tomorrow {
                format!("  {} · {}", w.next.time, labels.tomorrow)
            } else {
                format!("  {}", w.next.time)
            };
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  {}", name),
                    theme::gold().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(when, theme::dim())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("  in  ", theme::dim()),
                    Span::styled(w.next.countdown(), theme::amber().add_modifier(Modifier::BOLD)),
                ]),
            ]
        }
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
