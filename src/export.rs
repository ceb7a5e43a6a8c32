//! JSON export of page data.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::app::Page;
use crate::data::PageData;

/// Build the export document for a set of pages.
pub fn pages_to_json(pages: &[(Page, PageData)]) -> Value {
    let pages: Vec<Value> = pages
        .iter()
        .map(|(page, data)| {
            let tally = data.tally();
            let mut entry = json!({
                "page": page.index(),
                "title": page.title(),
                "worst": tally.worst(),
                "tally": tally,
                "rows": data.rows().collect::<Vec<_>>(),
            });
            if let PageData::Module(module) = data {
                entry["status"] = json!(module.status.map(|s| s.labels()));
            }
            entry
        })
        .collect();

    json!({ "pages": pages })
}

/// Write a JSON document, pretty-printed.
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{metric, LimitsTable, MetricLimits, ModulePage, PackPage};
    use crate::source::Snapshot;

    #[test]
    fn test_pages_to_json() {
        let mut limits = LimitsTable::new();
        limits.insert(metric::CURRENT, MetricLimits::new(200.0, 150.0, -200.0, -150.0));
        let snapshot: Snapshot = [("current".to_string(), 250.0)].into_iter().collect();

        let pages = vec![
            (Page::SUMMARY, PageData::Pack(PackPage::from_snapshot(&snapshot, &limits))),
            (
                Page::for_module(2).unwrap(),
                PageData::Module(ModulePage::from_snapshot(2, &Snapshot::new(), &limits)),
            ),
        ];
        let doc = pages_to_json(&pages);

        let summary = &doc["pages"][0];
        assert_eq!(summary["title"], "Batteries Dashboard");
        assert_eq!(summary["worst"], "critical");
        assert_eq!(summary["tally"]["critical"], 1);
        assert_eq!(summary["rows"][0]["key"], "current");
        assert_eq!(summary["rows"][0]["severity"], "critical");
        assert!(summary["rows"][1]["severity"].is_null());

        let module = &doc["pages"][1];
        assert_eq!(module["page"], 2);
        assert_eq!(module["rows"].as_array().unwrap().len(), 24);
        assert!(module["status"].is_null());
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        write_json(&path, &json!({ "pages": [] })).unwrap();
        let read: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read["pages"], json!([]));
    }
}
