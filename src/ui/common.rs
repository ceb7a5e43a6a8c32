//! Common UI components shared across pages.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Page};
use crate::data::Severity;

/// Render the header bar with the page title and severity overview.
///
/// Displays: worst-severity indicator, page title, classified value counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(
        format!("{} ", app.page.title().to_uppercase()),
        Style::default().add_modifier(Modifier::BOLD),
    );

    let Some(ref data) = app.data else {
        let line = Line::from(vec![Span::raw(" "), title, Span::raw("│ Loading...")]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let tally = data.tally();
    let dim = Style::default().add_modifier(Modifier::DIM);
    let count = |n: usize, severity: Severity| {
        if n > 0 {
            Span::styled(n.to_string(), app.theme.severity_style(severity))
        } else {
            Span::styled("0", dim)
        }
    };

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.severity_style(tally.worst())),
        title,
        Span::raw("│ "),
        count(tally.normal, Severity::Normal),
        Span::raw(" ok "),
        count(tally.warning, Severity::Warning),
        Span::raw(" warn "),
        count(tally.critical, Severity::Critical),
        Span::raw(" crit"),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar: the pack summary followed by the twelve modules.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Page::all().map(|p| Line::from(format!(" {} ", p.label()))).collect();

    let tabs = Tabs::new(titles)
        .select(app.page.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// A temporary status message wins, then the last load error, then the
/// regular source line with controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let paragraph = Paragraph::new(format!(" {} | ←→:page q:quit", err))
            .style(Style::default().fg(app.theme.warning));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "←→:page Home/End ?:help e:export q:quit";
    let status = match app.last_updated {
        Some(at) => format!(
            " {} | Updated {:.1}s ago | {}",
            app.source_description(),
            at.elapsed().as_secs_f64(),
            controls,
        ),
        None => format!(" Loading... | {}", controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current page.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  → l Tab     Next page"),
        Line::from("  ← h S-Tab   Previous page"),
        Line::from("  Home        Pack summary"),
        Line::from("  End         Module 12"),
        Line::from(""),
        section(" General"),
        Line::from("  r           Reload data"),
        Line::from("  e           Export to JSON"),
        Line::from("  Esc q       Quit"),
        Line::from(""),
        section(" Colors"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("normal ", app.theme.severity_style(Severity::Normal)),
            Span::styled("warning ", app.theme.severity_style(Severity::Warning)),
            Span::styled("critical", app.theme.severity_style(Severity::Critical)),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 21u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
