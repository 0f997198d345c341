use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{KhatamPlan, MUSHAF_PAGES};
use crate::tui::labels::Labels;
use crate::tui::theme;
use crate::utils::format::progress_bar;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    plan: Option<&KhatamPlan>,
    now: DateTime<Utc>,
    labels: &Labels,
) {
    let block = Block::default()
        .title(Span::styled(labels.khatam, theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let Some(plan) = plan else {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", labels.no_plan), theme::dim())),
        ])
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let bar_width = (area.width.saturating_sub(6) as usize).min(30);
    let progress_style = if plan.is_finished() {
        theme::green()
    } else {
        theme::amber()
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "  {} {} / {}  ·  {} {} {}",
                labels.day,
                plan.day_number(now),
                plan.target_days,
                plan.daily_target_pages(),
                labels.pages,
                labels.per_day
            ),
            theme::bold(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", theme::dim()),
            Span::styled(progress_bar(plan.progress_ratio(), bar_width), progress_style),
        ]),
        Line::from(Span::styled(
            format!(
                "  {} / {} {}  ·  juz {}",
                plan.pages_read.min(MUSHAF_PAGES),
                MUSHAF_PAGES,
                labels.pages,
                plan.current_juz()
            ),
            theme::dim(),
        )),
    ];

    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}
