use std::cmp::min;

use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;

use crate::models::MarksTier;

const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

/// Colour used for a marks badge and its progress bar.
pub(crate) fn tier_color(tier: MarksTier) -> Color {
    match tier {
        MarksTier::Excellent => Color::Green,
        MarksTier::Good => Color::Blue,
        MarksTier::Fair => Color::Yellow,
        MarksTier::Poor => Color::Red,
    }
}

/// Text progress bar `width` cells wide, filled in proportion to `marks`
/// (clamped to 0..=100).
pub(crate) fn marks_bar(marks: i64, width: usize) -> String {
    let pct = marks.clamp(0, 100) as usize;
    let filled = width * pct / 100;
    let mut bar = String::with_capacity(width * BAR_FILLED.len_utf8());
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(width - filled));
    bar
}

/// Range of card indices to draw so that `selected` stays on screen when only
/// `capacity` cards fit.
pub(crate) fn card_window(selected: usize, len: usize, capacity: usize) -> (usize, usize) {
    let capacity = capacity.max(1);
    let mut start = if selected >= capacity {
        selected + 1 - capacity
    } else {
        0
    };
    if start + capacity > len {
        start = len.saturating_sub(capacity);
    }
    (start, min(start + capacity, len))
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the loading and failure panels.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn marks_bar_fills_proportionally() {
        assert_eq!(marks_bar(50, 10), "█████░░░░░");
        assert_eq!(marks_bar(0, 4), "░░░░");
        assert_eq!(marks_bar(100, 4), "████");
        assert_eq!(marks_bar(250, 3), "███");
        assert_eq!(marks_bar(-5, 3), "░░░");
        assert_eq!(marks_bar(88, 0), "");
    }

    #[test]
    fn card_window_follows_selection() {
        assert_eq!(card_window(0, 12, 4), (0, 4));
        assert_eq!(card_window(3, 12, 4), (0, 4));
        assert_eq!(card_window(4, 12, 4), (1, 5));
        assert_eq!(card_window(11, 12, 4), (8, 12));
        assert_eq!(card_window(0, 2, 4), (0, 2));
        assert_eq!(card_window(0, 0, 4), (0, 0));
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 20);
        assert!(rect.x >= area.x && rect.right() <= area.right());
    }

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = anyhow!("disk gone").context("failed to load roster");
        assert_eq!(surface_error(&err), "disk gone");
    }

    #[test]
    fn tiers_have_distinct_colors() {
        assert_eq!(tier_color(MarksTier::Excellent), Color::Green);
        assert_ne!(tier_color(MarksTier::Fair), tier_color(MarksTier::Poor));
    }
}
