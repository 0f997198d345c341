use chrono::NaiveTime;
use unicode_width::UnicodeWidthStr;

/// Format a countdown in minutes to "Xh Ym" or "Ym"
pub fn format_countdown(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Format a NaiveTime to "HH:MM"
pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Create a simple progress bar
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let ratio = ratio.clamp(0.0, 1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Pad to a display width; Arabic and wide glyphs count by terminal columns.
pub fn pad_display(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_hour_boundary() {
        assert_eq!(format_countdown(60), "1h 0m");
        assert_eq!(format_countdown(59), "59m");
        assert_eq!(format_countdown(0), "0m");
        assert_eq!(format_countdown(510), "8h 30m");
    }

    #[test]
    fn time_is_zero_padded() {
        let t = NaiveTime::from_hms_opt(4, 5, 59).unwrap();
        assert_eq!(format_time(t), "04:05");
    }

    #[test]
    fn progress_bar_fill() {
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(2.0, 3), "███");
        assert_eq!(progress_bar(-1.0, 2), "░░");
    }

    #[test]
    fn pad_display_counts_columns() {
        assert_eq!(pad_display("Asr", 6), "Asr   ");
        assert_eq!(pad_display("Maghrib", 3), "Maghrib");
    }
}
