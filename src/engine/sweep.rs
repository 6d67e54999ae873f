use std::collections::HashMap;

use crate::model::*;

// ── Sweep Builder ────────────────────────────────────────────────
//
// Converts event intervals into initial frames, sweeps them top to bottom to
// discover which pairs collide, and greedily partitions events into collision
// groups split into columns. The column partition is written back onto the
// frames as a width hint, so the sweep output is simultaneously the solver's
// starting point and the guaranteed-valid fallback tiling.

/// Symmetric N×N boolean matrix over frame indices; entry `(i, j)` is true
/// iff frame i and frame j's time intervals overlap.
#[derive(Debug, Clone)]
pub struct CollisionMatrix {
    n: usize,
    cells: Vec<bool>,
}

impl CollisionMatrix {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![false; n * n],
        }
    }

    pub fn mark(&mut self, i: usize, j: usize) {
        self.cells[i * self.n + j] = true;
        self.cells[j * self.n + i] = true;
    }

    pub fn collides(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.n + j]
    }
}

/// One maximal cluster of transitively colliding frames, partitioned into
/// columns of mutually non-overlapping frames.
#[derive(Debug, Clone)]
pub struct CollisionGroup {
    /// Frame indices per column, in sweep discovery order.
    pub columns: Vec<Vec<usize>>,
}

#[derive(Debug)]
pub struct SweepOutput {
    pub frames: Vec<EventFrame>,
    pub matrix: CollisionMatrix,
    pub groups: Vec<CollisionGroup>,
    /// Frame indices in the order their end endpoint was processed — the
    /// variable ordering used by the solver.
    pub completion_order: Vec<usize>,
    pub has_collisions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EndpointKind {
    // An event ending exactly where another starts must be processed first,
    // so touching events never collide.
    End,
    Start,
}

#[derive(Debug, Clone, Copy)]
struct Endpoint {
    coord: f64,
    kind: EndpointKind,
    frame: usize,
}

/// Build frames, collision matrix, and grouped column partition for one day
/// column. Frames are created in `(start, end, id)` order so the whole
/// pipeline is deterministic regardless of map iteration order.
pub fn build(config: &LayoutConfig, events: &HashMap<String, EventInterval>) -> SweepOutput {
    let mut entries: Vec<(&String, &EventInterval)> = events.iter().collect();
    entries.sort_by(|(id_a, a), (id_b, b)| {
        a.start
            .total_cmp(&b.start)
            .then(a.end.total_cmp(&b.end))
            .then(id_a.cmp(id_b))
    });

    let mut frames: Vec<EventFrame> = entries
        .into_iter()
        .map(|(id, interval)| {
            let (y, height) = config.vertical_extent(interval);
            EventFrame {
                id: id.clone(),
                interval: *interval,
                rect: Rect {
                    x: 0.0,
                    y,
                    width: config.column_width,
                    height,
                },
            }
        })
        .collect();

    let n = frames.len();
    let mut endpoints: Vec<Endpoint> = Vec::with_capacity(n * 2);
    for (i, frame) in frames.iter().enumerate() {
        endpoints.push(Endpoint {
            coord: frame.rect.y,
            kind: EndpointKind::Start,
            frame: i,
        });
        endpoints.push(Endpoint {
            coord: frame.rect.max_y(),
            kind: EndpointKind::End,
            frame: i,
        });
    }
    endpoints.sort_by(|a, b| {
        a.coord
            .total_cmp(&b.coord)
            .then(a.kind.cmp(&b.kind))
            .then(a.frame.cmp(&b.frame))
    });

    let mut matrix = CollisionMatrix::new(n);
    let mut has_collisions = false;
    let mut groups: Vec<CollisionGroup> = Vec::new();
    let mut current_columns: Vec<Vec<usize>> = Vec::new();
    let mut active: Vec<usize> = Vec::new();
    let mut completion_order: Vec<usize> = Vec::with_capacity(n);
    // Zero-height frames have their end endpoint sorted before their start;
    // such an end is deferred until the start is processed.
    let mut deferred_end = vec![false; n];

    for ep in &endpoints {
        let i = ep.frame;
        match ep.kind {
            EndpointKind::Start => {
                for &j in &active {
                    matrix.mark(i, j);
                    has_collisions = true;
                }

                // Lowest-index column with no currently-active member takes
                // the frame; otherwise open a new column.
                let slot = current_columns
                    .iter()
                    .position(|col| !col.iter().any(|m| active.contains(m)));
                match slot {
                    Some(c) => current_columns[c].push(i),
                    None => current_columns.push(vec![i]),
                }

                if deferred_end[i] {
                    // The frame completes at its own start endpoint and never
                    // enters the active set.
                    completion_order.push(i);
                    if active.is_empty() {
                        close_group(&mut groups, &mut current_columns);
                    }
                } else {
                    active.push(i);
                }
            }
            EndpointKind::End => {
                if let Some(pos) = active.iter().position(|&j| j == i) {
                    active.remove(pos);
                    completion_order.push(i);
                    if active.is_empty() {
                        close_group(&mut groups, &mut current_columns);
                    }
                } else {
                    deferred_end[i] = true;
                }
            }
        }
    }
    close_group(&mut groups, &mut current_columns);

    // Pre-pass tiling: every frame takes its group-column slot. For a
    // single-column group this leaves `x = 0`, `width = column_width`.
    for group in &groups {
        apply_column_tiling(config.column_width, &mut frames, group);
    }

    SweepOutput {
        frames,
        matrix,
        groups,
        completion_order,
        has_collisions,
    }
}

fn close_group(groups: &mut Vec<CollisionGroup>, current_columns: &mut Vec<Vec<usize>>) {
    if !current_columns.is_empty() {
        groups.push(CollisionGroup {
            columns: std::mem::take(current_columns),
        });
    }
}

/// Assign each frame in the group its column's equal-width slot.
pub fn apply_column_tiling(column_width: f64, frames: &mut [EventFrame], group: &CollisionGroup) {
    let width = column_width / group.columns.len() as f64;
    for (c, column) in group.columns.iter().enumerate() {
        for &i in column {
            frames[i].rect.x = c as f64 * width;
            frames[i].rect.width = width;
        }
    }
}
