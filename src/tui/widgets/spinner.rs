//! Loading spinner widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// App branding
const APP_NAME: &str = "optiboard";
const TAGLINE: &str = "AI cost-optimization dashboard";

/// Loading spinner widget
pub struct Spinner<'a> {
    frame: usize,
    source: &'a str,
    theme: Theme,
}

impl<'a> Spinner<'a> {
    pub fn new(frame: usize, source: &'a str, theme: Theme) -> Self {
        Self {
            frame,
            source,
            theme,
        }
    }

    /// Get the current spinner character
    pub fn current_char(&self) -> char {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }

    pub fn message(&self) -> String {
        format!("{} Loading from {}...", self.current_char(), self.source)
    }
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 5 || area.width < 35 {
            return;
        }

        // name, tagline, blank, spinner
        let center_y = area.y + area.height / 2;

        let name_y = center_y.saturating_sub(2);
        let name_x = area.x + (area.width.saturating_sub(APP_NAME.len() as u16)) / 2;
        buf.set_string(
            name_x,
            name_y,
            APP_NAME,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        let tag_y = name_y + 1;
        let tag_x = area.x + (area.width.saturating_sub(TAGLINE.len() as u16)) / 2;
        buf.set_string(tag_x, tag_y, TAGLINE, Style::default().fg(self.theme.muted()));

        let spinner_text = self.message();
        let spinner_y = tag_y + 2;
        let spinner_x =
            area.x + (area.width.saturating_sub(spinner_text.chars().count() as u16)) / 2;
        buf.set_string(
            spinner_x,
            spinner_y,
            &spinner_text,
            Style::default().fg(self.theme.accent()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_frames() {
        assert_eq!(SPINNER_FRAMES.len(), 10);
    }

    #[test]
    fn test_spinner_current_char() {
        let spinner = Spinner::new(0, "api", Theme::Dark);
        assert_eq!(spinner.current_char(), '⠋');

        let spinner = Spinner::new(5, "api", Theme::Dark);
        assert_eq!(spinner.current_char(), '⠴');
    }

    #[test]
    fn test_spinner_wraps() {
        let spinner = Spinner::new(10, "api", Theme::Dark);
        assert_eq!(spinner.current_char(), '⠋'); // 10 % 10 = 0
    }

    #[test]
    fn test_next_frame() {
        assert_eq!(Spinner::next_frame(0), 1);
        assert_eq!(Spinner::next_frame(9), 0);
    }

    #[test]
    fn test_spinner_message_names_source() {
        let spinner = Spinner::new(0, "http://localhost:8000", Theme::Dark);
        assert_eq!(spinner.message(), "⠋ Loading from http://localhost:8000...");
    }

    #[test]
    fn test_spinner_skips_tiny_area() {
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        Spinner::new(0, "api", Theme::Dark).render(area, &mut buf);
        assert!(buf.content().iter().all(|c| c.symbol() == " "));
    }
}
