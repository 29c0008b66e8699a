//! View tabs and the bar that shows them

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Views in display order; the digit keys 1-4 follow this order
const VIEWS: [Tab; 4] = [Tab::Overview, Tab::Models, Tab::Recommendations, Tab::Insights];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Models,
    Recommendations,
    Insights,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Models => "Models",
            Self::Recommendations => "Recommendations",
            Self::Insights => "Insights",
        }
    }

    /// Heading shown above the view
    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Optimization Overview",
            Self::Models => "Models & Strategies",
            Self::Recommendations => "Recommendations",
            Self::Insights => "Insights",
        }
    }

    fn position(self) -> usize {
        VIEWS.iter().position(|&t| t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        VIEWS[(self.position() + 1) % VIEWS.len()]
    }

    pub fn prev(self) -> Self {
        VIEWS[(self.position() + VIEWS.len() - 1) % VIEWS.len()]
    }

    /// View bound to a digit key, if any
    pub fn from_key(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| VIEWS.get(i).copied())
    }
}

/// One-line bar naming every view, with the current one bracketed
pub struct TabBar {
    selected: Tab,
    theme: Theme,
}

impl TabBar {
    pub fn new(selected: Tab, theme: Theme) -> Self {
        Self { selected, theme }
    }
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::with_capacity(VIEWS.len() * 2);
        for (i, tab) in VIEWS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            if *tab == self.selected {
                spans.push(Span::styled(
                    format!("[{}]", tab.label()),
                    Style::default()
                        .fg(self.theme.accent())
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(
                    tab.label(),
                    Style::default().fg(self.theme.muted()),
                ));
            }
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
