//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Severity;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for values inside their normal band.
    pub normal: Color,
    /// Color for values in the orange band.
    pub warning: Color,
    /// Color for values in the red band.
    pub critical: Color,
    /// Color for values that are never classified.
    pub neutral: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for metric labels.
    pub label: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            normal: Color::Green,
            warning: Color::Rgb(255, 165, 0),
            critical: Color::Red,
            neutral: Color::White,
            border: Color::Gray,
            label: Style::default().fg(Color::Gray),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            normal: Color::Green,
            warning: Color::Rgb(215, 120, 0),
            critical: Color::Red,
            neutral: Color::Black,
            border: Color::DarkGray,
            label: Style::default().fg(Color::DarkGray),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a severity
    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Normal => Style::default().fg(self.normal),
            Severity::Warning => Style::default().fg(self.warning),
            Severity::Critical => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }

    /// Style for a value; unclassified values use the neutral color.
    pub fn value_style(&self, severity: Option<Severity>) -> Style {
        severity.map_or(Style::default().fg(self.neutral), |s| self.severity_style(s))
    }
}
