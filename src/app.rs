//! Application state and page navigation.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::data::{LimitsTable, ModulePage, PackPage, PageData, MODULE_COUNT};
use crate::export;
use crate::source::SnapshotSource;
use crate::ui::Theme;

/// Number of pages: the pack summary plus one per module.
pub const TOTAL_PAGES: usize = MODULE_COUNT + 1;

/// The page on screen. Index 0 is the pack summary, 1..=12 are modules.
///
/// Navigation wraps in both directions, so every transition is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page(usize);

impl Page {
    pub const SUMMARY: Page = Page(0);

    /// Page by index, or `None` if out of range.
    pub fn new(index: usize) -> Option<Self> {
        (index < TOTAL_PAGES).then_some(Page(index))
    }

    /// Page for a 1-based module number.
    pub fn for_module(module: usize) -> Option<Self> {
        (1..=MODULE_COUNT).contains(&module).then_some(Page(module))
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// The module shown on this page, if it is a module page.
    pub fn module(self) -> Option<usize> {
        (self.0 > 0).then_some(self.0)
    }

    /// Cycle to the next page.
    pub fn next(self) -> Self {
        Page((self.0 + 1) % TOTAL_PAGES)
    }

    /// Cycle to the previous page.
    pub fn prev(self) -> Self {
        Page((self.0 + TOTAL_PAGES - 1) % TOTAL_PAGES)
    }

    /// Short label for the tab strip.
    pub fn label(self) -> String {
        match self.module() {
            Some(module) => module.to_string(),
            None => "Pack".to_string(),
        }
    }

    /// Title shown in the header.
    pub fn title(self) -> String {
        match self.module() {
            Some(module) => format!("Module {}", module),
            None => "Batteries Dashboard".to_string(),
        }
    }

    /// Every page in navigation order.
    pub fn all() -> impl Iterator<Item = Page> {
        (0..TOTAL_PAGES).map(Page)
    }
}

/// Read and process one page from a source.
pub fn load_page(source: &mut dyn SnapshotSource, limits: &LimitsTable, page: Page) -> PageData {
    match page.module() {
        Some(module) => {
            PageData::Module(ModulePage::from_snapshot(module, &source.module(module), limits))
        }
        None => PageData::Pack(PackPage::from_snapshot(&source.pack(), limits)),
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub page: Page,
    pub show_help: bool,

    // Data source
    source: Box<dyn SnapshotSource>,
    pub limits: LimitsTable,
    pub data: Option<PageData>,
    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given source and limits table.
    pub fn new(source: Box<dyn SnapshotSource>, limits: LimitsTable) -> Self {
        Self::with_theme(source, limits, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme.
    pub fn with_theme(source: Box<dyn SnapshotSource>, limits: LimitsTable, theme: Theme) -> Self {
        Self {
            running: true,
            page: Page::SUMMARY,
            show_help: false,
            source,
            limits,
            data: None,
            load_error: None,
            last_updated: None,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Re-read the current page's snapshot.
    ///
    /// Called once per frame. Never fails: missing data renders as zeros
    /// and the reason is kept in `load_error`.
    pub fn reload_data(&mut self) {
        let data = load_page(self.source.as_mut(), &self.limits, self.page);
        self.load_error = self.source.error().map(str::to_string);
        self.data = Some(data);
        self.last_updated = Some(Instant::now());
    }

    /// Switch to the next page (wraps from module 12 to the summary).
    pub fn next_page(&mut self) {
        self.set_page(self.page.next());
    }

    /// Switch to the previous page (wraps from the summary to module 12).
    pub fn prev_page(&mut self) {
        self.set_page(self.page.prev());
    }

    /// Switch to a specific page and load it straight away.
    pub fn set_page(&mut self, page: Page) {
        self.page = page;
        self.reload_data();
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current page to a JSON file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };
        export::write_json(path, &export::pages_to_json(&[(self.page, data.clone())]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{metric, MetricLimits, Severity};
    use crate::source::{write_snapshot, DirSource, SnapshotDir};
    use tempfile::TempDir;

    fn app_in(dir: &SnapshotDir) -> App {
        let mut limits = LimitsTable::new();
        limits.insert(metric::CURRENT, MetricLimits::new(200.0, 150.0, -200.0, -150.0));
        App::with_theme(Box::new(DirSource::new(dir.clone())), limits, Theme::dark())
    }

    #[test]
    fn test_page_next_wraps() {
        let mut page = Page::SUMMARY;
        for _ in 0..TOTAL_PAGES {
            page = page.next();
        }
        assert_eq!(page, Page::SUMMARY);
    }

    #[test]
    fn test_page_prev_wraps() {
        assert_eq!(Page::SUMMARY.prev(), Page::for_module(12).unwrap());
        assert_eq!(Page::SUMMARY.prev().index(), 12);
        assert_eq!(Page::for_module(1).unwrap().prev(), Page::SUMMARY);
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(TOTAL_PAGES, 13);
        assert!(Page::new(12).is_some());
        assert!(Page::new(13).is_none());
        assert!(Page::for_module(0).is_none());
        assert!(Page::for_module(13).is_none());
        assert_eq!(Page::all().count(), TOTAL_PAGES);
    }

    #[test]
    fn test_page_labels() {
        assert_eq!(Page::SUMMARY.label(), "Pack");
        assert_eq!(Page::SUMMARY.module(), None);
        let page = Page::for_module(7).unwrap();
        assert_eq!(page.label(), "7");
        assert_eq!(page.title(), "Module 7");
        assert_eq!(page.module(), Some(7));
    }

    #[test]
    fn test_reload_classifies_summary() {
        let tmp = TempDir::new().unwrap();
        let dir = SnapshotDir::new(tmp.path());
        write_snapshot(&dir.main_path(), [("current", 160.0)]).unwrap();

        let mut app = app_in(&dir);
        app.reload_data();

        let Some(PageData::Pack(ref page)) = app.data else {
            panic!("expected pack page");
        };
        assert_eq!(page.rows[0].value, 160.0);
        assert_eq!(page.rows[0].severity, Some(Severity::Warning));
        assert!(app.load_error.is_none());
        assert!(app.last_updated.is_some());
    }

    #[test]
    fn test_navigation_loads_module_page() {
        let tmp = TempDir::new().unwrap();
        let dir = SnapshotDir::new(tmp.path());
        let mut app = app_in(&dir);

        app.prev_page();
        assert_eq!(app.page.module(), Some(12));
        let Some(PageData::Module(ref page)) = app.data else {
            panic!("expected module page");
        };
        assert_eq!(page.index, 12);
        assert!(page.cells.iter().all(|r| r.value == 0.0));
        assert!(app.load_error.as_deref().unwrap().contains("module_12_data.csv"));

        app.next_page();
        assert_eq!(app.page, Page::SUMMARY);
    }

    #[test]
    fn test_status_message() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&SnapshotDir::new(tmp.path()));
        assert!(app.get_status_message().is_none());
        app.set_status_message("Exported".to_string());
        assert_eq!(app.get_status_message(), Some("Exported"));
    }

    #[test]
    fn test_export_requires_data() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&SnapshotDir::new(tmp.path()));
        let path = tmp.path().join("export.json");
        assert!(app.export_state(&path).is_err());

        app.reload_data();
        app.export_state(&path).unwrap();
        assert!(path.is_file());
    }
}
