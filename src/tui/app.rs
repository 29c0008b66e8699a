//! Application state and event loop

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};

use crate::config::Settings;
use crate::services::{DataLoaderService, LoadResult, OptimizationAggregator, StatsMemo};
use crate::types::{ModelBreakdown, OptimizationRecommendation, OptimizationStatsResult, StrategyUsage};

use super::theme::Theme;
use super::widgets::{
    help::HelpPopup,
    insights::InsightsView,
    models::ModelsView,
    overview::OverviewView,
    recommendations::RecommendationsView,
    spinner::Spinner,
    tabs::{Tab, TabBar},
};

/// Maximum content width (keeps layout clean on wide terminals)
const MAX_CONTENT_WIDTH: u16 = 170;

/// Application state
pub enum AppState {
    /// First load in progress
    Loading,
    /// A summary is on screen; later refreshes keep it until they succeed
    Ready { data: Box<LoadResult> },
    /// First load failed
    Error { message: String },
}

/// Main application
pub struct App {
    state: AppState,
    memo: StatsMemo,
    source_name: String,
    theme: Theme,
    should_quit: bool,
    current_tab: Tab,
    models_scroll: usize,
    recommendations_scroll: usize,
    show_help: bool,
    spinner_frame: usize,
    refresh_interval: Duration,
    refresh_requested: bool,
    loading: bool,
    last_loaded: Option<Instant>,
    refresh_error: Option<String>,
}

impl App {
    /// Create a new app that wants its first load immediately
    pub fn new(
        aggregator: OptimizationAggregator,
        source_name: impl Into<String>,
        theme: Theme,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            state: AppState::Loading,
            memo: StatsMemo::new(aggregator),
            source_name: source_name.into(),
            theme,
            should_quit: false,
            current_tab: Tab::Overview,
            models_scroll: 0,
            recommendations_scroll: 0,
            show_help: false,
            spinner_frame: 0,
            refresh_interval,
            refresh_requested: true,
            loading: false,
            last_loaded: None,
            refresh_error: None,
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    KeyCode::Tab => {
                        self.current_tab = self.current_tab.next();
                    }
                    KeyCode::BackTab => {
                        self.current_tab = self.current_tab.prev();
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.scroll_up();
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.scroll_down();
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        self.refresh_requested = true;
                    }
                    KeyCode::Char('?') => {
                        self.show_help = !self.show_help;
                    }
                    KeyCode::Char(c) => {
                        if let Some(tab) = Tab::from_key(c) {
                            self.current_tab = tab;
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Whether a background load should start now
    pub fn wants_load(&self, now: Instant) -> bool {
        if self.loading {
            return false;
        }
        if self.refresh_requested {
            return true;
        }
        !self.refresh_interval.is_zero()
            && self
                .last_loaded
                .is_some_and(|at| now.duration_since(at) >= self.refresh_interval)
    }

    /// Mark a background load as started
    pub fn start_load(&mut self) {
        self.loading = true;
        self.refresh_requested = false;
        if matches!(self.state, AppState::Error { .. }) {
            self.state = AppState::Loading;
        }
    }

    /// Apply a finished background load
    pub fn apply_load_result(&mut self, result: Result<LoadResult, String>, now: Instant) {
        self.loading = false;
        self.last_loaded = Some(now);

        match result {
            Ok(loaded) => {
                self.refresh_error = None;
                self.state = AppState::Ready {
                    data: Box::new(loaded),
                };
                if let AppState::Ready { data } = &self.state {
                    self.memo.get(Some(&data.summary));
                }
                self.clamp_scroll();
            }
            Err(message) => match self.state {
                AppState::Ready { .. } => self.refresh_error = Some(message),
                _ => self.state = AppState::Error { message },
            },
        }
    }

    /// Derived statistics for the summary on screen
    pub fn stats(&self) -> &OptimizationStatsResult {
        self.memo.current()
    }

    fn models(&self) -> &[ModelBreakdown] {
        match &self.state {
            AppState::Ready { data } => data
                .summary
                .optimization_stats
                .as_ref()
                .map(|o| o.models_breakdown.as_slice())
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    fn strategies(&self) -> &[StrategyUsage] {
        match &self.state {
            AppState::Ready { data } => data
                .summary
                .optimization_stats
                .as_ref()
                .map(|o| o.strategies_used.as_slice())
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    fn recommendations(&self) -> &[OptimizationRecommendation] {
        match &self.state {
            AppState::Ready { data } => data
                .summary
                .optimization_stats
                .as_ref()
                .map(|o| o.recommendations.as_slice())
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    fn max_scroll(&self) -> usize {
        match self.current_tab {
            Tab::Models => ModelsView::max_scroll_offset(self.models().len()),
            Tab::Recommendations => {
                RecommendationsView::max_scroll_offset(self.recommendations().len())
            }
            Tab::Overview | Tab::Insights => 0,
        }
    }

    fn active_scroll_mut(&mut self) -> Option<&mut usize> {
        match self.current_tab {
            Tab::Models => Some(&mut self.models_scroll),
            Tab::Recommendations => Some(&mut self.recommendations_scroll),
            Tab::Overview | Tab::Insights => None,
        }
    }

    /// Scroll up in the current view
    fn scroll_up(&mut self) {
        if let Some(scroll) = self.active_scroll_mut() {
            *scroll = scroll.saturating_sub(1);
        }
    }

    /// Scroll down in the current view
    fn scroll_down(&mut self) {
        let max = self.max_scroll();
        if let Some(scroll) = self.active_scroll_mut() {
            *scroll = (*scroll + 1).min(max);
        }
    }

    /// Refreshed data may be shorter than the old list
    fn clamp_scroll(&mut self) {
        self.models_scroll = self
            .models_scroll
            .min(ModelsView::max_scroll_offset(self.models().len()));
        self.recommendations_scroll = self
            .recommendations_scroll
            .min(RecommendationsView::max_scroll_offset(self.recommendations().len()));
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if self.loading {
            self.spinner_frame = Spinner::next_frame(self.spinner_frame);
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Loading => {
                Spinner::new(self.spinner_frame, &self.source_name, self.theme).render(area, buf);
            }
            AppState::Ready { data } => self.render_ready(data, area, buf),
            AppState::Error { message } => {
                let y = area.y + area.height / 2;
                let text = format!("Error: {}", message);
                let x = area.x + (area.width.saturating_sub(text.chars().count() as u16)) / 2;
                buf.set_string(x, y, &text, Style::default().fg(self.theme.error()));

                let hint = "r: Retry  ?: Help  q: Quit";
                let hint_x = area.x + (area.width.saturating_sub(hint.len() as u16)) / 2;
                if y + 2 < area.y + area.height {
                    buf.set_string(hint_x, y + 2, hint, Style::default().fg(self.theme.muted()));
                }
            }
        }

        // Help overlays whatever is on screen once loading is done
        if self.show_help && !matches!(self.state, AppState::Loading) {
            HelpPopup::new(self.theme).render(HelpPopup::centered_area(area), buf);
        }
    }
}

impl App {
    fn render_ready(&self, data: &LoadResult, area: Rect, buf: &mut Buffer) {
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let centered_area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let chunks = Layout::vertical([
            Constraint::Length(1), // Top padding
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Title
            Constraint::Length(1), // Blank
            Constraint::Min(0),    // View
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Status
            Constraint::Length(1), // Keybindings
        ])
        .split(centered_area);

        TabBar::new(self.current_tab, self.theme).render(chunks[1], buf);
        self.render_separator(chunks[2], buf);
        self.render_title(chunks[3], buf);

        let stats = self.stats();
        match self.current_tab {
            Tab::Overview => {
                OverviewView::new(stats, &data.summary, self.theme).render(chunks[5], buf);
            }
            Tab::Models => {
                ModelsView::new(self.models(), self.strategies(), stats, self.theme)
                    .with_scroll(self.models_scroll)
                    .render(chunks[5], buf);
            }
            Tab::Recommendations => {
                RecommendationsView::new(
                    self.recommendations(),
                    &stats.recommendations_summary,
                    self.theme,
                )
                .with_scroll(self.recommendations_scroll)
                .render(chunks[5], buf);
            }
            Tab::Insights => {
                InsightsView::new(stats, self.theme).render(chunks[5], buf);
            }
        }

        self.render_separator(chunks[6], buf);
        Paragraph::new(self.status_line(data))
            .alignment(Alignment::Center)
            .render(chunks[7], buf);
        self.render_keybindings(chunks[8], buf);
    }

    fn render_separator(&self, area: Rect, buf: &mut Buffer) {
        let line = "─".repeat(area.width as usize);
        buf.set_string(
            area.x,
            area.y,
            &line,
            Style::default().fg(self.theme.muted()),
        );
    }

    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            self.current_tab.title(),
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn status_line(&self, data: &LoadResult) -> Line<'static> {
        let mut spans = vec![Span::styled(
            data.source.clone(),
            Style::default().fg(self.theme.muted()),
        )];
        if data.stale {
            spans.push(Span::styled(
                "  [cached]",
                Style::default().fg(self.theme.warn()),
            ));
        }
        if let Some(warning) = &data.cache_warning {
            spans.push(Span::styled(
                format!("  {}", warning),
                Style::default().fg(self.theme.warn()),
            ));
        }
        if self.loading {
            spans.push(Span::styled(
                format!(
                    "  {} refreshing",
                    Spinner::new(self.spinner_frame, "", self.theme).current_char()
                ),
                Style::default().fg(self.theme.accent()),
            ));
        } else if let Some(err) = &self.refresh_error {
            spans.push(Span::styled(
                format!("  refresh failed: {}", err),
                Style::default().fg(self.theme.error()),
            ));
        }
        Line::from(spans)
    }

    fn render_keybindings(&self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(self.theme.accent());
        let desc = Style::default().fg(self.theme.muted());
        let bindings = Paragraph::new(Line::from(vec![
            Span::styled("q", key),
            Span::styled(": Quit", desc),
            Span::raw("  "),
            Span::styled("Tab", key),
            Span::styled(": Switch view", desc),
            Span::raw("  "),
            Span::styled("r", key),
            Span::styled(": Refresh", desc),
            Span::raw("  "),
            Span::styled("?", key),
            Span::styled(": Help", desc),
        ]))
        .alignment(Alignment::Center);

        bindings.render(area, buf);
    }
}

/// Run the TUI application
pub fn run(settings: Settings) -> anyhow::Result<()> {
    // Config errors surface before the terminal switches to raw mode
    let loader = Arc::new(settings.data_loader()?);
    let theme = Theme::detect();

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &settings, loader, theme);
    ratatui::restore();
    result
}

fn run_app(
    terminal: &mut DefaultTerminal,
    settings: &Settings,
    loader: Arc<DataLoaderService>,
    theme: Theme,
) -> anyhow::Result<()> {
    let mut app = App::new(
        settings.aggregator(),
        loader.source_name(),
        theme,
        settings.refresh_interval,
    );
    let (data_tx, data_rx) = mpsc::channel();

    loop {
        if app.wants_load(Instant::now()) {
            app.start_load();
            let loader = Arc::clone(&loader);
            let data_tx = data_tx.clone();
            thread::spawn(move || {
                let result = loader.load().map_err(|e| e.to_string());
                let _ = data_tx.send(result);
            });
        }

        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Check for load completion (non-blocking)
        if let Ok(result) = data_rx.try_recv() {
            app.apply_load_result(result, Instant::now());
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DashboardSummary, ModelBreakdown, OptimizationStats};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn make_app() -> App {
        App::new(
            OptimizationAggregator::default(),
            "summary.json",
            Theme::Dark,
            Duration::from_secs(60),
        )
    }

    fn make_load(model_count: usize) -> LoadResult {
        let models = (0..model_count)
            .map(|i| ModelBreakdown {
                model_name: format!("model-{}", i),
                usage_percentage: 100.0 / model_count as f64,
                avg_cost: 0.01,
                savings_percentage: 50.0,
                success_rate: 97.0,
                total_requests: 100,
            })
            .collect();
        LoadResult {
            summary: Arc::new(DashboardSummary {
                optimization_stats: Some(OptimizationStats {
                    savings_percentage: 50.0,
                    optimization_rate: 80.0,
                    total_savings: 0.0,
                    models_breakdown: models,
                    strategies_used: Vec::new(),
                    recommendations: Vec::new(),
                }),
                ..Default::default()
            }),
            source: "summary.json".into(),
            stale: false,
            cache_warning: None,
        }
    }

    fn render_to_string(app: &App, area: Rect) -> String {
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    // ========== State tests ==========

    #[test]
    fn test_app_initial_state() {
        let app = make_app();
        assert!(matches!(app.state, AppState::Loading));
        assert!(!app.should_quit());
        assert!(app.wants_load(Instant::now()));
    }

    #[test]
    fn test_load_success_becomes_ready() {
        let mut app = make_app();
        app.start_load();
        assert!(!app.wants_load(Instant::now()));

        app.apply_load_result(Ok(make_load(2)), Instant::now());
        assert!(matches!(app.state, AppState::Ready { .. }));
        assert_eq!(app.memo.computations(), 1);
        // 0.4*50 + 0.3*80 + 0.3*97
        assert!((app.stats().optimization_score - 73.1).abs() < 1e-9);
    }

    #[test]
    fn test_first_load_failure_is_error() {
        let mut app = make_app();
        app.start_load();
        app.apply_load_result(Err("http error: refused".into()), Instant::now());
        assert!(matches!(app.state, AppState::Error { .. }));

        // r retries from the error screen
        app.handle_event(key(KeyCode::Char('r')));
        assert!(app.wants_load(Instant::now()));
        app.start_load();
        assert!(matches!(app.state, AppState::Loading));
    }

    #[test]
    fn test_refresh_failure_keeps_data() {
        let mut app = make_app();
        app.start_load();
        app.apply_load_result(Ok(make_load(1)), Instant::now());

        app.handle_event(key(KeyCode::Char('r')));
        app.start_load();
        app.apply_load_result(Err("http error: timeout".into()), Instant::now());

        assert!(matches!(app.state, AppState::Ready { .. }));
        assert_eq!(app.refresh_error.as_deref(), Some("http error: timeout"));
    }

    #[test]
    fn test_each_new_summary_recomputes() {
        let mut app = make_app();
        app.start_load();
        app.apply_load_result(Ok(make_load(1)), Instant::now());
        app.start_load();
        app.apply_load_result(Ok(make_load(1)), Instant::now());
        assert_eq!(app.memo.computations(), 2);
    }

    // ========== Refresh timing tests ==========

    #[test]
    fn test_auto_refresh_after_interval() {
        let mut app = make_app();
        let loaded_at = Instant::now();
        app.start_load();
        app.apply_load_result(Ok(make_load(1)), loaded_at);

        assert!(!app.wants_load(loaded_at + Duration::from_secs(59)));
        assert!(app.wants_load(loaded_at + Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_interval_disables_auto_refresh() {
        let mut app = App::new(
            OptimizationAggregator::default(),
            "api",
            Theme::Dark,
            Duration::ZERO,
        );
        let loaded_at = Instant::now();
        app.start_load();
        app.apply_load_result(Ok(make_load(1)), loaded_at);
        assert!(!app.wants_load(loaded_at + Duration::from_secs(3600)));

        app.handle_event(key(KeyCode::Char('r')));
        assert!(app.wants_load(loaded_at));
    }

    // ========== Key handling tests ==========

    #[test]
    fn test_app_quit_on_q_and_esc() {
        let mut app = make_app();
        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());

        let mut app = make_app();
        app.handle_event(key(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn test_app_tab_navigation() {
        let mut app = make_app();
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.current_tab, Tab::Models);
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)));
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)));
        assert_eq!(app.current_tab, Tab::Insights);
        app.handle_event(key(KeyCode::Char('3')));
        assert_eq!(app.current_tab, Tab::Recommendations);
    }

    #[test]
    fn test_app_tick_only_spins_while_loading() {
        let mut app = make_app();
        app.tick();
        assert_eq!(app.spinner_frame, 0);

        app.start_load();
        app.tick();
        assert_eq!(app.spinner_frame, 1);
    }

    #[test]
    fn test_models_scroll_bounded() {
        let mut app = make_app();
        app.start_load();
        app.apply_load_result(Ok(make_load(12)), Instant::now());
        app.handle_event(key(KeyCode::Char('2')));

        for _ in 0..5 {
            app.handle_event(key(KeyCode::Down));
        }
        assert_eq!(app.models_scroll, 2);

        app.handle_event(key(KeyCode::Char('k')));
        assert_eq!(app.models_scroll, 1);
    }

    #[test]
    fn test_scroll_clamped_after_refresh() {
        let mut app = make_app();
        app.start_load();
        app.apply_load_result(Ok(make_load(15)), Instant::now());
        app.models_scroll = 5;

        app.start_load();
        app.apply_load_result(Ok(make_load(3)), Instant::now());
        assert_eq!(app.models_scroll, 0);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = make_app();
        app.handle_event(key(KeyCode::Char('?')));
        assert!(app.show_help);
        app.handle_event(key(KeyCode::Char('?')));
        assert!(!app.show_help);
    }

    #[test]
    fn test_help_drawn_over_error_screen() {
        let mut app = make_app();
        app.start_load();
        app.apply_load_result(Err("connection refused".into()), Instant::now());
        let area = Rect::new(0, 0, 80, 30);
        assert!(!render_to_string(&app, area).contains("Refresh now"));

        app.handle_event(key(KeyCode::Char('?')));
        let text = render_to_string(&app, area);
        assert!(text.contains("Refresh now"));
        assert!(text.contains("Press ? to close"));
    }

    // ========== Rendering tests ==========

    #[test]
    fn test_render_loading_names_source() {
        let app = make_app();
        let text = render_to_string(&app, Rect::new(0, 0, 80, 20));
        assert!(text.contains("optiboard"));
        assert!(text.contains("Loading from summary.json..."));
    }

    #[test]
    fn test_render_ready_status_marks_cached() {
        let mut app = make_app();
        let mut load = make_load(1);
        load.stale = true;
        load.source = "http://localhost:8000 (cached 2025-03-01 08:00 UTC)".into();
        app.start_load();
        app.apply_load_result(Ok(load), Instant::now());

        let text = render_to_string(&app, Rect::new(0, 0, 120, 30));
        assert!(text.contains("[Overview]"));
        assert!(text.contains("Optimization Overview"));
        assert!(text.contains("[cached]"));
    }

    #[test]
    fn test_render_error() {
        let mut app = make_app();
        app.start_load();
        app.apply_load_result(Err("config error: missing url".into()), Instant::now());
        let text = render_to_string(&app, Rect::new(0, 0, 80, 10));
        assert!(text.contains("Error: config error: missing url"));
        assert!(text.contains("r: Retry"));
    }
}
