//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width and height of the help popup
const POPUP_WIDTH: u16 = 50;
const POPUP_HEIGHT: u16 = 20;

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }
}

/// Keybinding sections shown in the popup, in order
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("Tab / Shift+Tab", "Switch view"),
            ("1 / 2", "Overview / Models"),
            ("3 / 4", "Recommendations / Insights"),
            ("Up/Down or j/k", "Scroll list"),
        ],
    ),
    (
        "Data",
        &[("r", "Refresh now")],
    ),
    (
        "General",
        &[("q / Esc", "Quit"), ("?", "Toggle help")],
    ),
];

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear the area first (for overlay effect)
        Clear.render(area, buf);

        let title = format!(" optiboard v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        let header_style = Style::default()
            .fg(self.theme.date())
            .add_modifier(Modifier::BOLD);
        let sep = "─".repeat(inner.width as usize);

        let mut lines: Vec<Line> = Vec::new();
        for (i, (header, bindings)) in SECTIONS.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(*header, header_style)));
            lines.push(Line::from(Span::styled(
                sep.clone(),
                Style::default().fg(self.theme.muted()),
            )));
            for (key, desc) in bindings.iter() {
                lines.push(keybinding_line(key, desc, self.theme));
            }
        }

        // Close hint pinned to the bottom row
        let body_height = inner.height.saturating_sub(1);
        Paragraph::new(lines).render(
            Rect {
                height: body_height,
                ..inner
            },
            buf,
        );
        if inner.height > 0 {
            Paragraph::new(Line::from(Span::styled(
                "Press ? to close",
                Style::default().fg(self.theme.muted()),
            )))
            .alignment(Alignment::Center)
            .render(
                Rect {
                    y: inner.y + body_height,
                    height: 1,
                    ..inner
                },
                buf,
            );
        }
    }
}

fn keybinding_line(key: &'static str, desc: &'static str, theme: Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<18}", key), Style::default().fg(theme.accent())),
        Span::styled(desc, Style::default().fg(theme.text())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_popup_centered_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup_area = HelpPopup::centered_area(area);

        assert_eq!(popup_area.width, POPUP_WIDTH);
        assert_eq!(popup_area.height, POPUP_HEIGHT);
        assert_eq!(popup_area.x, (100 - POPUP_WIDTH) / 2);
        assert_eq!(popup_area.y, (50 - POPUP_HEIGHT) / 2);
    }

    #[test]
    fn test_help_popup_small_terminal() {
        let area = Rect::new(0, 0, 30, 10);
        let popup_area = HelpPopup::centered_area(area);

        assert_eq!(popup_area.width, 30);
        assert_eq!(popup_area.height, 10);
    }

    #[test]
    fn test_popup_fits_all_sections() {
        let rows: usize = SECTIONS
            .iter()
            .map(|(_, bindings)| bindings.len() + 2)
            .sum::<usize>()
            + SECTIONS.len() - 1 // blank lines between sections
            + 1; // close hint
        // borders take two rows
        assert!(rows <= (POPUP_HEIGHT - 2) as usize);
    }

    #[test]
    fn test_help_popup_lists_refresh() {
        let area = HelpPopup::centered_area(Rect::new(0, 0, 80, 30));
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 30));
        HelpPopup::new(Theme::Dark).render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("optiboard v"));
        assert!(text.contains("Refresh now"));
        assert!(text.contains("Press ? to close"));
    }
}
