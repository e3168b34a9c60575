//! FILENAME: core/engine/benches/view_derivation.rs
//! Benchmarks for filter/sort/paginate derivation over an in-memory dataset.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use table_engine::{CellValue, DataTable, Dataset, PageSize, TableProps};

const CHOICES: [&str; 4] = ["Choice 1", "Choice 2", "Choice 3", "Other"];

fn build_table(rows: usize) -> DataTable {
    let props = TableProps {
        column_headers: vec![
            "Title".to_string(),
            "number".to_string(),
            "Date".to_string(),
            "ID".to_string(),
            "Choice".to_string(),
        ],
        items_per_page_options: PageSize::default_options(),
        default_items_per_page: PageSize::fixed(25).unwrap(),
    };

    let data = Dataset::from_rows(
        (0..rows)
            .map(|i| {
                vec![
                    CellValue::text(format!("Item {}", i)),
                    CellValue::Number((i * 7 % 1000) as f64),
                    CellValue::text(format!("2024-{:02}-{:02}T00:00:00Z", i % 12 + 1, i % 28 + 1)),
                    CellValue::Number(i as f64),
                    CellValue::text(CHOICES[i % CHOICES.len()]),
                ]
            })
            .collect(),
    );

    DataTable::new(props, Arc::new(data)).unwrap()
}

fn bench_derive_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_view");

    for rows in [1_000usize, 10_000, 50_000] {
        let plain = build_table(rows);
        group.bench_with_input(BenchmarkId::new("unfiltered", rows), &plain, |b, t| {
            b.iter(|| black_box(t.derive_view()))
        });

        let mut filtered = build_table(rows);
        filtered.set_global_filter("item 1");
        filtered.toggle_column_filter("Choice", "choice 1").unwrap();
        filtered.toggle_sort("number").unwrap();
        group.bench_with_input(BenchmarkId::new("filtered_sorted", rows), &filtered, |b, t| {
            b.iter(|| black_box(t.derive_view()))
        });
    }

    group.finish();
}

fn bench_suggestions(c: &mut Criterion) {
    let mut table = build_table(10_000);
    c.bench_function("search_column_10k", |b| {
        b.iter(|| table.search_column("Choice", black_box("cho")).unwrap())
    });
}

criterion_group!(benches, bench_derive_view, bench_suggestions);
criterion_main!(benches);
