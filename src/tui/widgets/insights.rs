//! Insights view widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::services::{insights, InsightLevel};
use crate::tui::theme::Theme;
use crate::types::OptimizationStatsResult;

fn marker(level: InsightLevel) -> &'static str {
    match level {
        InsightLevel::Positive => "✔",
        InsightLevel::Info => "•",
        InsightLevel::Warning => "▲",
    }
}

pub struct InsightsView<'a> {
    stats: &'a OptimizationStatsResult,
    theme: Theme,
}

impl<'a> InsightsView<'a> {
    pub fn new(stats: &'a OptimizationStatsResult, theme: Theme) -> Self {
        Self { stats, theme }
    }
}

impl Widget for InsightsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines: Vec<Line> = Vec::new();
        for insight in insights(self.stats) {
            let color = self.theme.insight_color(insight.level);
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", marker(insight.level)), Style::default().fg(color)),
                Span::styled(insight.message, Style::default().fg(self.theme.text())),
            ]));
            lines.push(Line::default());
        }

        let width = area.width.min(90);
        let inner = Rect {
            x: area.x + (area.width - width) / 2,
            width,
            ..area
        };
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
