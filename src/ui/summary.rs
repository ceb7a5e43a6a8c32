//! Pack summary page rendering.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::{MetricRow, PackPage};
use crate::ui::Theme;

/// Render the pack-level metrics as a two-column table.
pub fn render(frame: &mut Frame, app: &App, page: &PackPage, area: Rect) {
    let table = metric_table(&page.rows, &app.theme, " Pack ");
    frame.render_widget(table, area);
}

/// A bordered label/value table. Values are colored by severity.
pub fn metric_table<'a>(rows: &'a [MetricRow], theme: &Theme, title: &'a str) -> Table<'a> {
    let header = Row::new(vec![Cell::from("Metric"), Cell::from("Value")])
        .height(1)
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = rows
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.label.as_str()).style(theme.label),
                Cell::from(r.formatted()).style(theme.value_style(r.severity)),
            ])
        })
        .collect();

    let widths = [Constraint::Fill(2), Constraint::Fill(1)];

    Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{metric, LimitsTable, MetricLimits};
    use crate::source::Snapshot;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_render_summary_rows() {
        let mut limits = LimitsTable::new();
        limits.insert(metric::CURRENT, MetricLimits::new(200.0, 150.0, -200.0, -150.0));
        let snapshot: Snapshot =
            [("current".to_string(), 42.5), ("soc".to_string(), 80.0)].into_iter().collect();
        let page = PackPage::from_snapshot(&snapshot, &limits);
        let theme = Theme::dark();

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| f.render_widget(metric_table(&page.rows, &theme, " Pack "), f.area()))
            .unwrap();

        let text: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Current"));
        assert!(text.contains("42.50A"));
        assert!(text.contains("80.00%"));
        assert!(text.contains("Total Voltage"));
    }
}
