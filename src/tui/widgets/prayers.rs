use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::config::settings::ThemeColor;
use crate::models::PrayerTimes;
use crate::prayer_times::PrayerWindow;
use crate::tui::labels::Labels;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    times: Option<&PrayerTimes>,
    window: Option<&PrayerWindow>,
    labels: &Labels,
    accent: ThemeColor,
) {
    let block = Block::default()
        .title(Span::styled(labels.prayers, theme::accent(accent)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let Some(times) = times else {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("  --:--", theme::dim())),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let items: Vec<ListItem> = times
        .entries()
        .into_iter()
        .map(|(name, time)| {
            let is_current = window.is_some_and(|w| w.current.name == name);
            let is_next = window.is_some_and(|w| w.next.name == name);

            let (icon, icon_style) = if is_current {
                ("●", theme::accent(accent).add_modifier(Modifier::BOLD))
            } else if is_next {
                ("›", theme::amber())
            } else {
                ("○", theme::dim())
            };

            let name_style = if is_current {
                theme::accent(accent).add_modifier(Modifier::BOLD)
            } else if is_next {
                theme::bold()
            } else {
                theme::dim()
            };

            let tag = if is_current { labels.now } else { "" };

            let line = Line::from(vec![
                Span::styled("  ", theme::dim()),
                Span::styled(icon, icon_style),
                Span::styled(format!("  {:<9}", name.display_name()), name_style),
                Span::styled(format!("{:<7}", time), theme::dim()),
                Span::styled(tag, theme::dim()),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
