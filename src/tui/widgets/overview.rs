//! Overview view - derived scores in a card grid plus the raw dashboard summary

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::format::{format_number, format_percent, format_score, format_usd};
use crate::services::optimization::performance_score;
use crate::tui::theme::Theme;
use crate::types::{DashboardSummary, OptimizationStatsResult};

/// Card dimensions
const CARD_WIDTH: u16 = 28;
const CARD_HEIGHT: u16 = 5;

/// Fixed number of columns for balanced 2x3 grid
const FIXED_COLS: usize = 3;

const CARD_COUNT: usize = 6;

/// Calculate number of cards per row based on available width (max 3 for balanced grid)
fn cards_per_row(width: u16) -> usize {
    let usable_width = width.saturating_sub(4); // padding
    let cards = (usable_width / (CARD_WIDTH + 2)) as usize; // +2 for spacing
    cards.clamp(1, FIXED_COLS)
}

pub struct OverviewView<'a> {
    stats: &'a OptimizationStatsResult,
    summary: &'a DashboardSummary,
    theme: Theme,
}

impl<'a> OverviewView<'a> {
    pub fn new(
        stats: &'a OptimizationStatsResult,
        summary: &'a DashboardSummary,
        theme: Theme,
    ) -> Self {
        Self {
            stats,
            summary,
            theme,
        }
    }
}

impl Widget for OverviewView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = cards_per_row(area.width);
        let rows = CARD_COUNT.div_ceil(cols);
        let grid_height = (rows as u16) * (CARD_HEIGHT + 1); // +1 for spacing

        let chunks = Layout::vertical([
            Constraint::Length(grid_height), // Card grid
            Constraint::Min(0),              // Details
        ])
        .split(area);

        self.render_card_grid(chunks[0], buf, cols);
        Paragraph::new(self.detail_lines())
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }
}

impl OverviewView<'_> {
    fn render_card_grid(&self, area: Rect, buf: &mut Buffer, cols: usize) {
        let cards = self.build_cards();

        let total_cards_width = (cols as u16) * CARD_WIDTH + ((cols - 1) as u16) * 2; // 2 = spacing
        let start_x = area.x + (area.width.saturating_sub(total_cards_width)) / 2;

        for (i, card) in cards.iter().enumerate() {
            let row = i / cols;
            let col = i % cols;

            let card_x = start_x + (col as u16) * (CARD_WIDTH + 2);
            let card_y = area.y + (row as u16) * (CARD_HEIGHT + 1);

            if card_y + CARD_HEIGHT > area.y + area.height {
                continue;
            }

            let card_area = Rect {
                x: card_x,
                y: card_y,
                width: CARD_WIDTH.min(area.width),
                height: CARD_HEIGHT,
            };

            self.render_card(card_area, buf, card);
        }
    }

    fn build_cards(&self) -> Vec<StatCard> {
        let metrics = &self.stats.performance_metrics;
        let recs = &self.stats.recommendations_summary;
        let score_color = self.theme.score_color(self.stats.optimization_score);

        vec![
            StatCard {
                title: "Optimization Score",
                value: format_score(self.stats.optimization_score),
                value_color: score_color,
                border_color: score_color,
            },
            StatCard {
                title: "Model Diversity",
                value: format_score(self.stats.model_diversity_score),
                value_color: self.theme.stat_blue(),
                border_color: self.theme.stat_blue(),
            },
            StatCard {
                title: "Cost Reduction",
                value: format_percent(metrics.cost_reduction),
                value_color: self.theme.bar(),
                border_color: self.theme.bar(),
            },
            StatCard {
                title: "Avg Success Rate",
                value: format_percent(metrics.avg_success_rate),
                value_color: self.theme.accent(),
                border_color: self.theme.accent(),
            },
            StatCard {
                title: "Optimized Requests",
                value: format!(
                    "{} / {}",
                    format_number(metrics.optimized_requests),
                    format_number(metrics.total_requests)
                ),
                value_color: self.theme.date(),
                border_color: self.theme.date(),
            },
            StatCard {
                title: "Potential Savings",
                value: format_usd(recs.potential_savings),
                value_color: self.theme.stat_warm(),
                border_color: self.theme.cost(),
            },
        ]
    }

    fn render_card(&self, area: Rect, buf: &mut Buffer, card: &StatCard) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(card.border_color));
        block.render(area, buf);

        if area.height > 2 {
            let title_y = area.y + 1;
            let title_x = area.x + (area.width.saturating_sub(card.title.len() as u16)) / 2;
            buf.set_string(
                title_x,
                title_y,
                card.title,
                Style::default().fg(card.border_color),
            );
        }

        if area.height > 3 {
            let value_y = area.y + 3;
            let value_x = area.x + (area.width.saturating_sub(card.value.len() as u16)) / 2;
            buf.set_string(
                value_x,
                value_y,
                &card.value,
                Style::default()
                    .fg(card.value_color)
                    .add_modifier(Modifier::BOLD),
            );
        }
    }

    fn detail_lines(&self) -> Vec<Line<'static>> {
        let label = Style::default().fg(self.theme.muted());
        let value = Style::default().fg(self.theme.text());

        let top_model = self
            .stats
            .top_performing_model
            .as_ref()
            .map(|m| {
                format!(
                    "{} (score {})",
                    m.model_name,
                    format_score(performance_score(m))
                )
            })
            .unwrap_or_else(|| "-".to_string());
        let strategy = self
            .stats
            .most_efficient_strategy
            .as_ref()
            .map(|s| {
                format!(
                    "{} (avg savings {})",
                    s.strategy_name.label(),
                    format_percent(s.avg_savings)
                )
            })
            .unwrap_or_else(|| "-".to_string());

        let cost = &self.summary.cost_summary;
        let keys = &self.summary.key_health;
        let usage = &self.summary.usage_summary;

        let change_color = if cost.cost_change_percentage > 0.0 {
            self.theme.error()
        } else {
            self.theme.bar()
        };

        vec![
            Line::from(vec![
                Span::styled("Top model  ", label),
                Span::styled(top_model, Style::default().fg(self.theme.accent())),
                Span::styled("   Most efficient strategy  ", label),
                Span::styled(strategy, Style::default().fg(self.theme.accent())),
            ]),
            Line::default(),
            Line::from(vec![
                Span::styled("Spend  ", label),
                Span::styled(format_usd(cost.total_cost), Style::default().fg(self.theme.cost())),
                Span::styled("   Saved  ", label),
                Span::styled(format_usd(cost.total_savings), Style::default().fg(self.theme.bar())),
                Span::styled("   Daily avg  ", label),
                Span::styled(format_usd(cost.daily_average), value),
                Span::styled("   Change  ", label),
                Span::styled(
                    format!("{:+.1}%", cost.cost_change_percentage),
                    Style::default().fg(change_color),
                ),
            ]),
            Line::from(vec![
                Span::styled("Keys  ", label),
                Span::styled(format!("{}/{} active", keys.active_keys, keys.total_keys), value),
                Span::styled("   Expiring  ", label),
                Span::styled(keys.expiring_soon.to_string(), Style::default().fg(self.theme.warn())),
                Span::styled("   Failing  ", label),
                Span::styled(
                    keys.failing_keys.to_string(),
                    Style::default().fg(if keys.failing_keys > 0 {
                        self.theme.error()
                    } else {
                        self.theme.text()
                    }),
                ),
            ]),
            Line::from(vec![
                Span::styled("Requests  ", label),
                Span::styled(format_number(usage.total_requests), value),
                Span::styled("   Tokens  ", label),
                Span::styled(format_number(usage.total_tokens), value),
                Span::styled("   Latency  ", label),
                Span::styled(format!("{:.0} ms", usage.avg_latency_ms), value),
            ]),
        ]
    }
}

/// Internal card representation
struct StatCard {
    title: &'static str,
    value: String,
    value_color: Color,
    border_color: Color,
}
