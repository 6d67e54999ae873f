use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::limits::{DEFAULT_SOLVER_BUDGET, EPSILON, HOURS_PER_DAY};

/// Fractional hours since midnight — the only time type.
pub type Hours = f64;

/// Half-open time-of-day interval `[start, end)` in fractional hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventInterval {
    pub start: Hours,
    pub end: Hours,
}

impl EventInterval {
    pub fn new(start: Hours, end: Hours) -> Self {
        debug_assert!(end >= start, "interval end must not precede start");
        Self { start, end }
    }

    pub fn duration(&self) -> Hours {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &EventInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// A zero-duration interval (`start == end`) renders as a zero-height frame.
    pub fn is_instant(&self) -> bool {
        self.duration() <= 0.0
    }
}

/// Axis-aligned rectangle in device-independent units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal half-open ranges `[x, x+width)` overlap. Ranges touching
    /// within `EPSILON` do not overlap.
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.x < other.max_x() - EPSILON && other.x < self.max_x() - EPSILON
    }
}

/// One admissible `(x, width)` placement a frame may take during search.
/// Equality is tolerant within `EPSILON`.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub x: f64,
    pub width: f64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.width - other.width).abs() < EPSILON
    }
}

/// A frame under layout: event id plus the rectangle being assigned.
///
/// `y` and `height` are fixed at construction from the interval and column
/// height; `x` and `width` are owned by whichever phase (sweep pre-pass,
/// solver, backup) is currently running. Two frames are equal iff their ids
/// are equal.
#[derive(Debug, Clone)]
pub struct EventFrame {
    pub id: String,
    pub interval: EventInterval,
    pub rect: Rect,
}

impl PartialEq for EventFrame {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventFrame {}

/// Engine configuration — an explicit value, no ambient globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Day column width in device-independent units. Must be > 0.
    pub column_width: f64,
    /// Day column height in device-independent units. Must be > 0.
    pub column_height: f64,
    /// Wall-clock budget for the backtracking search.
    #[serde(default = "default_solver_budget")]
    pub solver_budget: Duration,
}

fn default_solver_budget() -> Duration {
    DEFAULT_SOLVER_BUDGET
}

impl LayoutConfig {
    pub fn new(column_width: f64, column_height: f64) -> Self {
        Self {
            column_width,
            column_height,
            solver_budget: DEFAULT_SOLVER_BUDGET,
        }
    }

    pub fn with_solver_budget(mut self, budget: Duration) -> Self {
        self.solver_budget = budget;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.column_width.is_finite()
            && self.column_width > 0.0
            && self.column_height.is_finite()
            && self.column_height > 0.0
    }

    /// `(y, height)` of a frame — a pure function of the interval and the
    /// column height, fixed for the frame's lifetime.
    pub fn vertical_extent(&self, interval: &EventInterval) -> (f64, f64) {
        let y = interval.start / HOURS_PER_DAY * self.column_height;
        let height = interval.duration() / HOURS_PER_DAY * self.column_height;
        (y, height)
    }
}
