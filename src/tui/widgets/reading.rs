use chrono::Local;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::config::settings::ThemeColor;
use crate::models::{ReadingLocation, ReadingPosition};
use crate::tui::labels::Labels;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    last_read: Option<&ReadingPosition>,
    bookmark_count: i64,
    labels: &Labels,
    accent: ThemeColor,
) {
    let block = Block::default()
        .title(Span::styled(labels.last_read, theme::accent(accent)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let mut lines = vec![Line::from("")];
    match last_read {
        None => lines.push(Line::from(Span::styled(
            format!("  {}", labels.no_reading),
            theme::dim(),
        ))),
        Some(pos) => {
            lines.push(Line::from(Span::styled(
                format!("  {}", pos.label),
                theme::bold().add_modifier(Modifier::BOLD),
            )));
            let where_ = match pos.location {
                ReadingLocation::Surah { surah, ayah } => format!("  {}:{}", surah, ayah),
                ReadingLocation::Juz { juz, surah, ayah } => {
                    format!("  Juz {}  ·  {}:{}", juz, surah, ayah)
                }
            };
            lines.push(Line::from(Span::styled(where_, theme::accent(accent))));
            let when = pos.updated_at.with_timezone(&Local).format("%b %d, %H:%M");
            lines.push(Line::from(Span::styled(format!("  {}", when), theme::dim())));
        }
    }
    lines.push(Line::from(Span::styled(
        format!("  {} {}", bookmark_count, labels.bookmarks),
        theme::dim(),
    )));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
