use std::time::Duration;

use super::*;

fn config() -> LayoutConfig {
    LayoutConfig::new(300.0, 2400.0)
}

fn events(list: &[(&str, f64, f64)]) -> HashMap<String, EventInterval> {
    list.iter()
        .map(|&(id, start, end)| (id.to_string(), EventInterval::new(start, end)))
        .collect()
}

fn compute(config: &LayoutConfig, events: HashMap<String, EventInterval>) -> LayoutResult {
    compute_layout(config, &events, &CancelFlag::new()).expect("not cancelled")
}

/// Containment: every rect inside the column, within epsilon.
fn assert_contained(config: &LayoutConfig, mapping: &LayoutResult) {
    for (id, rect) in mapping {
        assert!(rect.x >= -1e-9, "{id}: x = {}", rect.x);
        assert!(
            rect.max_x() <= config.column_width + 1e-9,
            "{id}: max_x = {}",
            rect.max_x()
        );
        assert!(rect.y >= -1e-9, "{id}: y = {}", rect.y);
        assert!(
            rect.max_y() <= config.column_height + 1e-9,
            "{id}: max_y = {}",
            rect.max_y()
        );
    }
}

/// Non-overlap: rects of time-overlapping events have disjoint x-ranges.
fn assert_no_horizontal_overlap(
    events: &HashMap<String, EventInterval>,
    mapping: &LayoutResult,
) {
    let ids: Vec<&String> = events.keys().collect();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            if events[*a].overlaps(&events[*b]) {
                assert!(
                    !mapping[*a].overlaps_horizontally(&mapping[*b]),
                    "{a} and {b} overlap horizontally: {:?} vs {:?}",
                    mapping[*a],
                    mapping[*b]
                );
            }
        }
    }
}

// ── Pipeline properties ──────────────────────────────────

#[test]
fn empty_input_yields_empty_mapping() {
    let mapping = compute(&config(), HashMap::new());
    assert!(mapping.is_empty());
}

#[test]
fn disjoint_events_keep_full_width() {
    let config = config();
    let events = events(&[
        ("breakfast", 8.0, 8.5),
        ("standup", 9.0, 9.25),
        ("lunch", 12.0, 13.0),
        ("review", 16.0, 17.0),
    ]);
    let mapping = compute(&config, events);
    assert_eq!(mapping.len(), 4);
    for rect in mapping.values() {
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.width, config.column_width);
    }
}

#[test]
fn touching_events_keep_full_width() {
    let config = config();
    let mapping = compute(&config, events(&[("a", 9.0, 10.0), ("b", 10.0, 11.0)]));
    for rect in mapping.values() {
        assert_eq!(rect.width, config.column_width);
    }
}

#[test]
fn overlapping_events_get_disjoint_ranges() {
    let config = config();
    let events = events(&[
        ("a", 9.0, 11.0),
        ("b", 10.0, 12.0),
        ("c", 10.5, 13.0),
        ("d", 14.0, 15.0),
    ]);
    let mapping = compute(&config, events.clone());
    assert_eq!(mapping.len(), 4);
    assert_no_horizontal_overlap(&events, &mapping);
    assert_contained(&config, &mapping);
    // d is alone in its group and keeps the full width.
    assert_eq!(mapping["d"].width, config.column_width);
}

#[test]
fn full_overlap_backup_tiles_contiguously() {
    // Near-zero budget forces the backup path.
    let config = config().with_solver_budget(Duration::ZERO);
    let k = 4;
    let events: HashMap<String, EventInterval> = (0..k)
        .map(|i| (format!("e{i}"), EventInterval::new(9.0, 10.0)))
        .collect();
    let mapping = compute(&config, events);

    assert_eq!(mapping.len(), k);
    let expected_width = config.column_width / k as f64;
    let mut xs: Vec<f64> = mapping.values().map(|r| r.x).collect();
    xs.sort_by(f64::total_cmp);
    for (slot, x) in xs.iter().enumerate() {
        assert!((x - slot as f64 * expected_width).abs() < 1e-9);
    }
    for rect in mapping.values() {
        assert!((rect.width - expected_width).abs() < 1e-9);
    }
}

#[test]
fn near_zero_budget_still_yields_valid_mapping() {
    let config = config().with_solver_budget(Duration::ZERO);
    let events = events(&[
        ("a", 9.0, 12.0),
        ("b", 9.5, 10.5),
        ("c", 10.0, 11.0),
        ("d", 11.5, 13.0),
        ("e", 12.5, 14.0),
    ]);
    let mapping = compute(&config, events.clone());
    assert_eq!(mapping.len(), 5);
    assert_no_horizontal_overlap(&events, &mapping);
    assert_contained(&config, &mapping);
}

#[test]
fn zero_duration_event_yields_zero_height_rect() {
    let config = config();
    let events = events(&[("long", 9.0, 11.0), ("blip", 10.0, 10.0)]);
    let mapping = compute(&config, events.clone());
    assert_eq!(mapping["blip"].height, 0.0);
    assert!(mapping["long"].height > 0.0);
    assert_no_horizontal_overlap(&events, &mapping);
    assert_contained(&config, &mapping);
}

#[test]
fn repeated_runs_produce_identical_mappings() {
    let events = events(&[
        ("a", 9.0, 11.5),
        ("b", 9.5, 10.5),
        ("c", 10.0, 12.0),
        ("d", 11.0, 13.0),
    ]);
    let first = compute(&config(), events.clone());
    for _ in 0..5 {
        assert_eq!(compute(&config(), events.clone()), first);
    }
}

#[test]
fn dense_day_is_solved_within_budget() {
    // 12 half-overlapping meetings back to back; enough structure to force
    // real search without approaching the wall-clock budget.
    let config = config();
    let events: HashMap<String, EventInterval> = (0..12)
        .map(|i| {
            let start = 8.0 + i as f64 * 0.5;
            (format!("m{i}"), EventInterval::new(start, start + 0.75))
        })
        .collect();
    let mapping = compute(&config, events.clone());
    assert_eq!(mapping.len(), 12);
    assert_no_horizontal_overlap(&events, &mapping);
    assert_contained(&config, &mapping);
}

#[test]
fn cancel_before_sweep_suppresses_result() {
    let cancel = CancelFlag::new();
    cancel.set();
    let result = compute_layout(&config(), &events(&[("a", 9.0, 10.0)]), &cancel);
    assert!(result.is_none());
}

// ── Async engine surface ─────────────────────────────────

#[tokio::test]
async fn engine_delivers_mapping_once() {
    let engine = LayoutEngine::new(config()).unwrap();
    let handle = engine
        .begin_computation(events(&[("a", 9.0, 11.0), ("b", 10.0, 12.0)]))
        .unwrap();
    let mapping = handle.recv().await.expect("delivered");
    assert_eq!(mapping.len(), 2);
}

#[test]
fn engine_rejects_invalid_dimensions() {
    assert!(matches!(
        LayoutEngine::new(LayoutConfig::new(0.0, 100.0)),
        Err(EngineError::InvalidDimensions { .. })
    ));
}

#[tokio::test]
async fn engine_rejects_oversized_input() {
    let engine = LayoutEngine::new(config()).unwrap();
    let too_many: HashMap<String, EventInterval> = (0..=MAX_EVENTS_PER_COLUMN)
        .map(|i| (format!("e{i}"), EventInterval::new(0.0, 0.1)))
        .collect();
    assert!(matches!(
        engine.begin_computation(too_many),
        Err(EngineError::LimitExceeded(_))
    ));
}

#[tokio::test]
async fn live_count_drains_after_delivery() {
    let engine = LayoutEngine::new(config()).unwrap();
    let handle = engine.begin_computation(events(&[("a", 9.0, 10.0)])).unwrap();
    let _ = handle.recv().await;
    // recv resolving means the worker finished; it removes itself from the
    // live table before sending.
    assert_eq!(engine.live_count(), 0);
}
