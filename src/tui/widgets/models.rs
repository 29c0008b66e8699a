//! Models view widget - per-model breakdown and strategy usage tables

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::format::{format_number, format_percent, format_score, format_usd, truncate};
use crate::services::optimization::performance_score;
use crate::tui::theme::Theme;
use crate::types::{ModelBreakdown, OptimizationStatsResult, StrategyUsage};

/// Model rows shown at once; the rest scrolls
pub const VISIBLE_MODEL_ROWS: usize = 10;

/// Table width: Marker(2) + Model(28) + Usage(18) + Cost(12) + Savings(10) + Success(10) + Requests(12) + Score(8)
const TABLE_WIDTH: u16 = 100;

const STRATEGY_TABLE_WIDTH: u16 = 62;

/// Format a percentage bar with filled/empty blocks
/// Example: 50.0% with width 10 → "█████░░░░░"
pub fn format_percentage_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

pub struct ModelsView<'a> {
    models: &'a [ModelBreakdown],
    strategies: &'a [StrategyUsage],
    stats: &'a OptimizationStatsResult,
    scroll: usize,
    theme: Theme,
}

impl<'a> ModelsView<'a> {
    pub fn new(
        models: &'a [ModelBreakdown],
        strategies: &'a [StrategyUsage],
        stats: &'a OptimizationStatsResult,
        theme: Theme,
    ) -> Self {
        Self {
            models,
            strategies,
            stats,
            scroll: 0,
            theme,
        }
    }

    pub fn with_scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Largest useful scroll offset for `len` model rows
    pub fn max_scroll_offset(len: usize) -> usize {
        len.saturating_sub(VISIBLE_MODEL_ROWS)
    }

    fn is_top(&self, model: &ModelBreakdown) -> bool {
        self.stats
            .top_performing_model
            .as_ref()
            .is_some_and(|top| top.model_name == model.model_name)
    }

    fn is_most_efficient(&self, strategy: &StrategyUsage) -> bool {
        self.stats
            .most_efficient_strategy
            .as_ref()
            .is_some_and(|best| best.strategy_name == strategy.strategy_name)
    }
}

impl Widget for ModelsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.models.is_empty() && self.strategies.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No model or strategy data in this summary",
                Style::default().fg(self.theme.muted()),
            )))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let model_rows = self
            .models
            .len()
            .saturating_sub(self.scroll)
            .min(VISIBLE_MODEL_ROWS) as u16;
        let strategy_rows = self.strategies.len() as u16;

        let chunks = Layout::vertical([
            Constraint::Length(1),             // Models header
            Constraint::Length(model_rows),    // Model rows
            Constraint::Length(1),             // Scroll hint
            Constraint::Length(1),             // Strategies header
            Constraint::Length(strategy_rows), // Strategy rows
            Constraint::Min(0),
        ])
        .split(area);

        self.render_model_header(chunks[0], buf);
        self.render_models(chunks[1], buf);
        self.render_scroll_hint(chunks[2], buf);
        self.render_strategy_header(chunks[3], buf);
        self.render_strategies(chunks[4], buf);
    }
}

impl ModelsView<'_> {
    fn table_area(area: Rect, width: u16, y: u16) -> Rect {
        let offset = area.width.saturating_sub(width) / 2;
        Rect {
            x: area.x + offset,
            y,
            width: width.min(area.width),
            height: 1,
        }
    }

    fn header_style(&self) -> Style {
        Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD)
    }

    fn render_model_header(&self, area: Rect, buf: &mut Buffer) {
        let header = Line::from(Span::styled(
            format!(
                "  {:<28}{:>18}{:>12}{:>10}{:>10}{:>12}{:>8}",
                "Model", "Usage", "Avg cost", "Savings", "Success", "Requests", "Score"
            ),
            self.header_style(),
        ));
        Paragraph::new(header).render(Self::table_area(area, TABLE_WIDTH, area.y), buf);
    }

    fn render_models(&self, area: Rect, buf: &mut Buffer) {
        for (i, model) in self
            .models
            .iter()
            .skip(self.scroll)
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            let top = self.is_top(model);
            let (marker, name_style) = if top {
                (
                    "★ ",
                    Style::default()
                        .fg(self.theme.accent())
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().fg(self.theme.text()))
            };
            let score = performance_score(model);

            let row = Line::from(vec![
                Span::styled(marker, Style::default().fg(self.theme.accent())),
                Span::styled(format!("{:<28}", truncate(&model.model_name, 27)), name_style),
                Span::styled(
                    format!(
                        "{:>18}",
                        format!(
                            "{} {}",
                            format_percentage_bar(model.usage_percentage, 10),
                            format_percent(model.usage_percentage)
                        )
                    ),
                    Style::default().fg(self.theme.bar()),
                ),
                Span::styled(
                    format!("{:>12}", format_usd(model.avg_cost)),
                    Style::default().fg(self.theme.cost()),
                ),
                Span::styled(
                    format!("{:>10}", format_percent(model.savings_percentage)),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:>10}", format_percent(model.success_rate)),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:>12}", format_number(model.total_requests)),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:>8}", format_score(score)),
                    Style::default().fg(self.theme.score_color(score)),
                ),
            ]);

            Paragraph::new(row).render(Self::table_area(area, TABLE_WIDTH, y), buf);
        }
    }

    fn render_scroll_hint(&self, area: Rect, buf: &mut Buffer) {
        if self.models.len() <= VISIBLE_MODEL_ROWS {
            return;
        }
        let last = (self.scroll + VISIBLE_MODEL_ROWS).min(self.models.len());
        let hint = format!("{}-{} of {} models", self.scroll + 1, last, self.models.len());
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(self.theme.muted()),
        )))
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn render_strategy_header(&self, area: Rect, buf: &mut Buffer) {
        if self.strategies.is_empty() {
            return;
        }
        let header = Line::from(Span::styled(
            format!(
                "  {:<18}{:>14}{:>14}{:>14}",
                "Strategy", "Requests", "Avg savings", "Avg cost"
            ),
            self.header_style(),
        ));
        Paragraph::new(header).render(Self::table_area(area, STRATEGY_TABLE_WIDTH, area.y), buf);
    }

    fn render_strategies(&self, area: Rect, buf: &mut Buffer) {
        for (i, strategy) in self.strategies.iter().take(area.height as usize).enumerate() {
            let y = area.y + i as u16;
            let best = self.is_most_efficient(strategy);
            let marker = if best { "★ " } else { "  " };
            let name_color = if best {
                self.theme.accent()
            } else {
                self.theme.text()
            };

            let row = Line::from(vec![
                Span::styled(marker, Style::default().fg(self.theme.accent())),
                Span::styled(
                    format!("{:<18}", strategy.strategy_name.label()),
                    Style::default().fg(name_color),
                ),
                Span::styled(
                    format!("{:>14}", format_number(strategy.requests)),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:>14}", format_percent(strategy.avg_savings)),
                    Style::default().fg(self.theme.bar()),
                ),
                Span::styled(
                    format!("{:>14}", format_usd(strategy.avg_cost)),
                    Style::default().fg(self.theme.cost()),
                ),
            ]);

            Paragraph::new(row).render(Self::table_area(area, STRATEGY_TABLE_WIDTH, y), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StrategyName;

    fn model(name: &str, savings: f64, success: f64) -> ModelBreakdown {
        ModelBreakdown {
            model_name: name.into(),
            usage_percentage: 50.0,
            avg_cost: 0.01,
            savings_percentage: savings,
            success_rate: success,
            total_requests: 100,
        }
    }

    fn render_to_lines(view: ModelsView<'_>, area: Rect) -> Vec<String> {
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        buf.content()
            .chunks(area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    // ========== format_percentage_bar tests ==========

    #[test]
    fn test_format_percentage_bar() {
        assert_eq!(format_percentage_bar(0.0, 10), "░░░░░░░░░░");
        assert_eq!(format_percentage_bar(50.0, 10), "█████░░░░░");
        assert_eq!(format_percentage_bar(100.0, 10), "██████████");
    }

    #[test]
    fn test_format_percentage_bar_out_of_range() {
        assert_eq!(format_percentage_bar(150.0, 4), "████");
        assert_eq!(format_percentage_bar(-5.0, 4), "░░░░");
    }

    #[test]
    fn test_max_scroll_offset() {
        assert_eq!(ModelsView::max_scroll_offset(3), 0);
        assert_eq!(ModelsView::max_scroll_offset(VISIBLE_MODEL_ROWS + 4), 4);
    }

    // ========== Rendering tests ==========

    #[test]
    fn test_top_model_is_marked() {
        let models = vec![model("cheap", 90.0, 80.0), model("steady", 40.0, 99.0)];
        let stats = OptimizationStatsResult {
            top_performing_model: Some(models[0].clone()),
            ..Default::default()
        };
        let lines = render_to_lines(
            ModelsView::new(&models, &[], &stats, Theme::Dark),
            Rect::new(0, 0, 110, 6),
        );
        let cheap = lines.iter().find(|l| l.contains("cheap")).unwrap();
        let steady = lines.iter().find(|l| l.contains("steady")).unwrap();
        assert!(cheap.contains("★"));
        assert!(!steady.contains("★"));
        // 0.6*90 + 0.4*80
        assert!(cheap.contains("86.0"));
    }

    #[test]
    fn test_scroll_skips_rows() {
        let models: Vec<ModelBreakdown> = (0..12)
            .map(|i| model(&format!("model-{:02}", i), 10.0, 10.0))
            .collect();
        let stats = OptimizationStatsResult::default();
        let lines = render_to_lines(
            ModelsView::new(&models, &[], &stats, Theme::Dark).with_scroll(2),
            Rect::new(0, 0, 110, 14),
        );
        let text = lines.concat();
        assert!(!text.contains("model-01"));
        assert!(text.contains("model-02"));
        assert!(text.contains("model-11"));
        assert!(text.contains("3-12 of 12 models"));
    }

    #[test]
    fn test_strategy_table_marks_most_efficient() {
        let strategies = vec![
            StrategyUsage {
                strategy_name: StrategyName::CostFirst,
                requests: 10,
                avg_savings: 50.0,
                avg_cost: 0.01,
            },
            StrategyUsage {
                strategy_name: StrategyName::Balanced,
                requests: 20,
                avg_savings: 30.0,
                avg_cost: 0.02,
            },
        ];
        let stats = OptimizationStatsResult {
            most_efficient_strategy: Some(strategies[0].clone()),
            ..Default::default()
        };
        let lines = render_to_lines(
            ModelsView::new(&[], &strategies, &stats, Theme::Dark),
            Rect::new(0, 0, 80, 8),
        );
        let best = lines.iter().find(|l| l.contains("Cost first")).unwrap();
        assert!(best.contains("★"));
        assert!(best.contains("50.0%"));
        assert!(!lines.iter().find(|l| l.contains("Balanced")).unwrap().contains("★"));
    }

    #[test]
    fn test_empty_view_message() {
        let stats = OptimizationStatsResult::default();
        let lines = render_to_lines(
            ModelsView::new(&[], &[], &stats, Theme::Dark),
            Rect::new(0, 0, 60, 3),
        );
        assert!(lines[0].contains("No model or strategy data"));
    }
}
