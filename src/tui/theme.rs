//! Terminal theme detection and color definitions

use ratatui::style::Color;

use crate::services::InsightLevel;
use crate::types::Priority;

/// Score at or above which a score renders as healthy
const SCORE_GOOD: f64 = 80.0;
/// Score at or above which a score renders as a warning rather than an error
const SCORE_FAIR: f64 = 60.0;

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color (headers, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (selected tabs, keybinding keys, top performer)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (separators, inactive tabs, hints)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Section headers and timestamps
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Cost/money text color
    pub fn cost(self) -> Color {
        match self {
            Self::Dark => Color::Magenta,
            Self::Light => Color::Indexed(90), // dark magenta (ANSI 256)
        }
    }

    /// Bar/positive indicator color
    pub fn bar(self) -> Color {
        match self {
            Self::Dark => Color::Green,
            Self::Light => Color::Indexed(22), // dark green (ANSI 256)
        }
    }

    /// Error/negative indicator color
    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// Warning color, distinct from the yellow header color
    pub fn warn(self) -> Color {
        match self {
            Self::Dark => Color::Indexed(208),  // orange (ANSI 256)
            Self::Light => Color::Indexed(166), // dark orange (ANSI 256)
        }
    }

    /// Stats accent color (diversity card)
    pub fn stat_blue(self) -> Color {
        match self {
            Self::Dark => Color::Blue,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Stats warm highlight (savings card)
    pub fn stat_warm(self) -> Color {
        match self {
            Self::Dark => Color::LightRed,
            Self::Light => Color::Red,
        }
    }

    /// Color for a 0-100 score; NaN renders muted
    pub fn score_color(self, score: f64) -> Color {
        if score.is_nan() {
            self.muted()
        } else if score >= SCORE_GOOD {
            self.bar()
        } else if score >= SCORE_FAIR {
            self.warn()
        } else {
            self.error()
        }
    }

    pub fn priority_color(self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.error(),
            Priority::Medium => self.warn(),
            Priority::Low => self.muted(),
        }
    }

    pub fn insight_color(self, level: InsightLevel) -> Color {
        match level {
            InsightLevel::Positive => self.bar(),
            InsightLevel::Info => self.accent(),
            InsightLevel::Warning => self.warn(),
        }
    }
}
