use std::time::Duration;

/// Hours in one day column.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Tolerance for comparing candidate positions and widths. Absorbs the
/// rounding drift of repeated `W / i` divisions.
pub const EPSILON: f64 = 1e-9;

/// Default wall-clock budget for the backtracking search.
pub const DEFAULT_SOLVER_BUDGET: Duration = Duration::from_millis(750);

/// Hard cap on events per day column — bounds the O(N²) collision matrix.
pub const MAX_EVENTS_PER_COLUMN: usize = 1024;
