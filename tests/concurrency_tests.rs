//! Concurrent editing through `SharedLayout`.
//!
//! Writers run multi-step structural edits while readers inspect the
//! layout; every reader must observe a consistent grid.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use std::thread;

use common::{layout, report_layout};
use tablespan::{CompareMode, RowRemoval, SharedLayout, SpanSize, TextBinding};

fn consistent(grid: &tablespan::LayoutGrid<TextBinding>) -> bool {
    let summed: usize = grid.regions().iter().map(|r| r.row_count()).sum();
    summed == grid.row_count(true)
        && grid.spans().rows() == grid.row_count(true)
        && grid.spans().cols() == grid.column_count()
        && grid.spans().anchors().all(|a| grid.spans().fits(&a))
}

#[test]
fn test_readers_never_see_partial_edits() {
    let mut grid = layout(&[4, 4], 3);
    grid.set_span(0, 0, SpanSize::new(3, 2)).unwrap();
    grid.set_span(3, 1, SpanSize::new(2, 3)).unwrap();
    let shared = SharedLayout::new(grid);

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let layout = shared.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    let row = (i * 7 + w) % 6;
                    if i % 2 == 0 {
                        layout.insert_row(row);
                        layout.insert_column(i % 3);
                    } else {
                        layout.remove_row(row, false);
                        layout.remove_column(0);
                        layout.insert_column(0);
                    }
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let layout = shared.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    assert!(layout.read(consistent).unwrap());
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
    assert!(shared.read(consistent).unwrap());
}

#[test]
fn test_region_handles_from_many_threads() {
    let shared = SharedLayout::new(layout(&[2, 2], 2));
    let detail = shared.region(1).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let detail = detail.clone();
            thread::spawn(move || {
                assert!(detail.insert_row(0));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(detail.row_count(), 10);
    assert_eq!(shared.row_count(true), 12);
    assert_eq!(detail.remove_row(0, false), RowRemoval::Removed);
}

#[test]
fn test_try_clone_is_a_snapshot() {
    let shared = SharedLayout::new(report_layout());
    let snapshot = shared.try_clone().unwrap();

    shared.insert_column(0);
    let unchanged = snapshot
        .read(|snap| report_layout().equals(snap, CompareMode::Full, true))
        .unwrap();
    assert!(unchanged);
    assert_eq!(shared.column_count(), 5);
    assert_eq!(snapshot.column_count(), 4);
}
