//! Recommendations view - summary counts and the recommendation list

use std::cmp::Ordering;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::format::{format_usd, truncate};
use crate::tui::theme::Theme;
use crate::types::{OptimizationRecommendation, RecommendationsSummary};

/// Recommendation rows shown at once; the rest scrolls
pub const VISIBLE_ROWS: usize = 12;

/// Table width: Priority(10) + Type(12) + Savings(12) + gap(2) + Title(60)
const TABLE_WIDTH: u16 = 96;
const TITLE_WIDTH: usize = 60;

/// High priority first, then larger potential savings first
pub fn sorted_recommendations(
    recommendations: &[OptimizationRecommendation],
) -> Vec<&OptimizationRecommendation> {
    let mut sorted: Vec<&OptimizationRecommendation> = recommendations.iter().collect();
    sorted.sort_by(|a, b| {
        a.priority.cmp(&b.priority).then_with(|| {
            b.potential_savings
                .partial_cmp(&a.potential_savings)
                .unwrap_or(Ordering::Equal)
        })
    });
    sorted
}

/// Title, falling back to description, then id
fn headline(rec: &OptimizationRecommendation) -> &str {
    if !rec.title.is_empty() {
        &rec.title
    } else if !rec.description.is_empty() {
        &rec.description
    } else {
        &rec.id
    }
}

pub struct RecommendationsView<'a> {
    recommendations: &'a [OptimizationRecommendation],
    summary: &'a RecommendationsSummary,
    scroll: usize,
    theme: Theme,
}

impl<'a> RecommendationsView<'a> {
    pub fn new(
        recommendations: &'a [OptimizationRecommendation],
        summary: &'a RecommendationsSummary,
        theme: Theme,
    ) -> Self {
        Self {
            recommendations,
            summary,
            scroll: 0,
            theme,
        }
    }

    pub fn with_scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn max_scroll_offset(len: usize) -> usize {
        len.saturating_sub(VISIBLE_ROWS)
    }
}

impl Widget for RecommendationsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::vertical([
            Constraint::Length(1), // Totals
            Constraint::Length(1), // Categories
            Constraint::Length(1), // Blank
            Constraint::Min(0),    // List
        ])
        .split(area);

        self.render_totals(chunks[0], buf);
        self.render_categories(chunks[1], buf);

        if self.recommendations.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No open recommendations",
                Style::default().fg(self.theme.muted()),
            )))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
            return;
        }
        self.render_list(chunks[3], buf);
    }
}

impl RecommendationsView<'_> {
    fn render_totals(&self, area: Rect, buf: &mut Buffer) {
        let muted = Style::default().fg(self.theme.muted());
        let line = Line::from(vec![
            Span::styled(
                self.summary.total.to_string(),
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" total   ", muted),
            Span::styled(
                self.summary.high_priority.to_string(),
                Style::default()
                    .fg(self.theme.error())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" high priority   ", muted),
            Span::styled(
                format_usd(self.summary.potential_savings),
                Style::default()
                    .fg(self.theme.cost())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" potential savings", muted),
        ]);
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_categories(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, (kind, count)) in self.summary.categories.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                format!("{}: ", kind.label()),
                Style::default().fg(self.theme.muted()),
            ));
            spans.push(Span::styled(
                count.to_string(),
                Style::default().fg(self.theme.accent()),
            ));
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let offset = area.width.saturating_sub(TABLE_WIDTH) / 2;
        let rows = sorted_recommendations(self.recommendations);

        for (i, rec) in rows
            .iter()
            .skip(self.scroll)
            .take((area.height as usize).min(VISIBLE_ROWS))
            .enumerate()
        {
            let line = Line::from(vec![
                Span::styled(
                    format!("{:<10}", format!("[{}]", rec.priority.label())),
                    Style::default().fg(self.theme.priority_color(rec.priority)),
                ),
                Span::styled(
                    format!("{:<12}", rec.kind.label()),
                    Style::default().fg(self.theme.accent()),
                ),
                Span::styled(
                    format!("{:>12}", format_usd(rec.potential_savings)),
                    Style::default().fg(self.theme.cost()),
                ),
                Span::raw("  "),
                Span::styled(
                    truncate(headline(rec), TITLE_WIDTH),
                    Style::default().fg(self.theme.text()),
                ),
            ]);

            Paragraph::new(line).render(
                Rect {
                    x: area.x + offset,
                    y: area.y + i as u16,
                    width: TABLE_WIDTH.min(area.width),
                    height: 1,
                },
                buf,
            );
        }
    }
}
