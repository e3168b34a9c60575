//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for datatable host integration tests.

#![allow(dead_code)]

use app_lib::{create_app_state, AppConfig, AppState, LoadState};
use std::sync::Arc;
use table_engine::{CellValue, DataTable, Dataset, TableView};

/// Test harness wrapping an `AppState`.
pub struct TestHarness {
    pub state: AppState,
}

impl TestHarness {
    /// State that has not finished loading.
    pub fn loading() -> Self {
        TestHarness {
            state: create_app_state(AppConfig::default()),
        }
    }

    /// Ready state holding the posts fixture.
    pub fn with_sample_data() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let harness = TestHarness {
            state: create_app_state(config),
        };
        harness.mount(PostsFixture::headers(), PostsFixture::dataset());
        harness
    }

    /// Create a harness with `rows` generated rows for paging tests.
    pub fn with_large_data(rows: usize) -> Self {
        let harness = Self::loading();
        let data = (0..rows)
            .map(|i| {
                vec![
                    CellValue::text(format!("Post {:03}", i)),
                    CellValue::Number(i as f64),
                    CellValue::text("2024-01-01T00:00:00Z"),
                    CellValue::Number((i + 1) as f64),
                    CellValue::text(format!("Choice {}", i % 3 + 1)),
                ]
            })
            .collect();
        harness.mount(PostsFixture::headers(), Dataset::from_rows(data));
        harness
    }

    pub fn mount(&self, headers: Vec<String>, rows: Dataset) {
        let props = self.state.config.table_props(headers).unwrap();
        let table = DataTable::new(props, Arc::new(rows)).unwrap();
        *self.state.table.lock().unwrap() = LoadState::Ready(table);
    }

    pub fn view(&self) -> TableView {
        app_lib::get_table_view(&self.state).unwrap()
    }

    /// Values of one column across the visible page.
    pub fn column_values(view: &TableView, header: &str) -> Vec<String> {
        let idx = view.headers().iter().position(|h| *h == header).unwrap();
        view.display_rows().into_iter().map(|r| r[idx].clone()).collect()
    }
}

/// A small list shaped like the "post" SharePoint list.
pub struct PostsFixture;

impl PostsFixture {
    pub fn headers() -> Vec<String> {
        ["Title", "number", "Date", "ID", "Choice"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn rows() -> Vec<Option<Vec<CellValue>>> {
        let row = |title: &str, number: Option<f64>, date: &str, id: f64, choice: &str| {
            Some(vec![
                CellValue::text(title),
                number.into(),
                CellValue::text(date),
                CellValue::Number(id),
                if choice.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::text(choice)
                },
            ])
        };
        vec![
            row("Welcome", Some(10.0), "2024-01-05T09:00:00Z", 1.0, "Choice 1"),
            row("release notes", Some(3.0), "2024-02-11T12:30:00Z", 2.0, "Choice 2"),
            row("Roadmap", None, "2024-02-20T08:15:00Z", 3.0, "Choice 1"),
            None,
            row("Retro", Some(30.0), "2024-03-01T16:45:00Z", 5.0, "Choice 3"),
            row("welcome back", Some(7.5), "2024-03-09T10:00:00Z", 6.0, ""),
            row("Budget", Some(120.0), "2024-04-02T14:00:00Z", 7.0, "Choice 2"),
            row("Hiring", Some(2.0), "2024-04-18T11:20:00Z", 8.0, "Choice 1"),
        ]
    }

    pub fn dataset() -> Dataset {
        Dataset::new(Self::rows())
    }
}
