//! Module page rendering: cells, temperatures and stats side by side.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::data::{ModulePage, ModuleStatus, Severity};
use crate::ui::summary::metric_table;
use crate::ui::Theme;

pub fn render(frame: &mut Frame, app: &App, page: &ModulePage, area: Rect) {
    let [body, flags] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    let [cells, temps, stats] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ])
    .areas(body);

    frame.render_widget(metric_table(&page.cells, &app.theme, " Cell Voltages "), cells);
    frame.render_widget(metric_table(&page.temps, &app.theme, " Temperatures "), temps);
    frame.render_widget(metric_table(&page.stats, &app.theme, " Module Stats "), stats);
    frame.render_widget(Paragraph::new(status_line(page.status, &app.theme)), flags);
}

/// Decoded status flags, e.g. `Status: HV HT`.
fn status_line(status: Option<ModuleStatus>, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled(" Status: ", theme.label)];
    match status {
        None => spans.push(Span::styled("-", Style::default().add_modifier(Modifier::DIM))),
        Some(status) => {
            let style = if status.has_warnings() {
                theme.severity_style(Severity::Warning)
            } else {
                theme.severity_style(Severity::Normal)
            };
            let labels = status.labels();
            if labels.is_empty() {
                spans.push(Span::styled(format!("0x{:02x}", status.bits()), style));
            } else {
                spans.push(Span::styled(labels.join(" "), style));
            }
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_status_line() {
        let theme = Theme::dark();
        assert_eq!(text(&status_line(None, &theme)), " Status: -");
        assert_eq!(text(&status_line(Some(ModuleStatus::from_bits(1)), &theme)), " Status: OK");

        let line = status_line(Some(ModuleStatus::from_bits(10)), &theme);
        assert_eq!(text(&line), " Status: HV HT");
        assert_eq!(line.spans[1].style.fg, Some(theme.warning));
    }
}
