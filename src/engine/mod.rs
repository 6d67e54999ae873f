mod backup;
mod domain;
mod error;
mod solver;
mod sweep;
#[cfg(test)]
mod tests;

pub use error::EngineError;
pub use solver::SearchOutcome;
pub use sweep::{CollisionGroup, CollisionMatrix, SweepOutput};

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::oneshot;
use tracing::debug;
use ulid::Ulid;

use crate::limits::MAX_EVENTS_PER_COLUMN;
use crate::model::*;
use crate::observability;

/// Cooperative cancellation flag shared between a computation's owner and its
/// worker. The worker observes it within one candidate trial (solver) or one
/// group iteration (backup), never mid-mutation of a frame.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Final id → rectangle mapping for one day column.
pub type LayoutResult = HashMap<String, Rect>;

/// Handle for one in-flight computation. The result arrives through
/// [`ComputationHandle::recv`] exactly once, unless the computation is
/// cancelled, in which case it never arrives.
#[derive(Debug)]
pub struct ComputationHandle {
    id: Ulid,
    rx: oneshot::Receiver<LayoutResult>,
    cancel: CancelFlag,
}

impl ComputationHandle {
    pub fn id(&self) -> Ulid {
        self.id
    }

    /// Resolve to the mapping, or `None` if the computation was cancelled.
    pub async fn recv(self) -> Option<LayoutResult> {
        self.rx.await.ok()
    }

    /// Set the cancellation flag. Idempotent; a no-op once the worker has
    /// delivered its result.
    pub fn cancel(&self) {
        self.cancel.set();
    }
}

/// Event-frame layout engine for one calendar day-column geometry.
///
/// Each [`LayoutEngine::begin_computation`] call runs as an independent
/// worker task owning its own frames, matrix, and solver state; nothing is
/// shared between computations. The engine does not enforce the
/// one-live-computation-per-column rule: a caller recomputing a column is
/// expected to [`LayoutEngine::cancel`] the superseded handle so two results
/// never race for the same column.
pub struct LayoutEngine {
    config: LayoutConfig,
    live: Arc<DashMap<Ulid, CancelFlag>>,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Result<Self, EngineError> {
        if !config.is_valid() {
            return Err(EngineError::InvalidDimensions {
                width: config.column_width,
                height: config.column_height,
            });
        }
        Ok(Self {
            config,
            live: Arc::new(DashMap::new()),
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Number of computations currently in flight.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Start a layout computation for one set of events. Non-blocking; the
    /// heavy work runs on the blocking pool and the result is delivered
    /// through the returned handle.
    pub fn begin_computation(
        &self,
        events: HashMap<String, EventInterval>,
    ) -> Result<ComputationHandle, EngineError> {
        if events.len() > MAX_EVENTS_PER_COLUMN {
            return Err(EngineError::LimitExceeded("too many events in one column"));
        }

        let id = Ulid::new();
        let cancel = CancelFlag::new();
        let (tx, rx) = oneshot::channel();

        self.live.insert(id, cancel.clone());
        metrics::gauge!(observability::COMPUTATIONS_ACTIVE).increment(1.0);

        let config = self.config.clone();
        let flag = cancel.clone();
        let live = self.live.clone();
        tokio::spawn(async move {
            let result =
                tokio::task::spawn_blocking(move || compute_layout(&config, &events, &flag)).await;
            live.remove(&id);
            metrics::gauge!(observability::COMPUTATIONS_ACTIVE).decrement(1.0);
            match result {
                Ok(Some(mapping)) => {
                    // Receiver may have been dropped by an uninterested caller.
                    let _ = tx.send(mapping);
                }
                Ok(None) => {
                    debug!("computation {id} cancelled, suppressing delivery");
                }
                Err(e) => {
                    tracing::error!("layout worker for {id} failed: {e}");
                }
            }
        });

        Ok(ComputationHandle { id, rx, cancel })
    }

    /// Cancel an in-flight computation by handle id. Idempotent; a no-op for
    /// completed or unknown handles.
    pub fn cancel(&self, id: Ulid) {
        if let Some(flag) = self.live.get(&id) {
            flag.set();
        }
    }
}

/// Synchronous layout pipeline: sweep → pass-through | solve → export |
/// backup. Returns `None` iff cancellation was observed; every other path
/// produces a complete mapping.
pub fn compute_layout(
    config: &LayoutConfig,
    events: &HashMap<String, EventInterval>,
    cancel: &CancelFlag,
) -> Option<LayoutResult> {
    if events.is_empty() {
        return Some(LayoutResult::new());
    }

    let sweep_started = Instant::now();
    let mut out = sweep::build(config, events);
    metrics::histogram!(observability::SWEEP_DURATION_SECONDS)
        .record(sweep_started.elapsed().as_secs_f64());

    if cancel.is_set() {
        record_outcome("cancelled");
        return None;
    }

    if out.has_collisions {
        let domains = domain::generate(config.column_width, &out.frames);
        let solve_started = Instant::now();
        let outcome = solver::run(
            &mut out.frames,
            &domains,
            &out.matrix,
            &out.completion_order,
            solve_started + config.solver_budget,
            cancel,
        );
        metrics::histogram!(observability::SOLVE_DURATION_SECONDS)
            .record(solve_started.elapsed().as_secs_f64());
        debug!(
            frames = out.frames.len(),
            groups = out.groups.len(),
            ?outcome,
            "search finished"
        );

        match outcome {
            SearchOutcome::Solved => {}
            SearchOutcome::Cancelled => {
                record_outcome("cancelled");
                return None;
            }
            SearchOutcome::TimedOut | SearchOutcome::Exhausted => {
                if !backup::apply(config.column_width, &mut out.frames, &out.groups, cancel) {
                    record_outcome("cancelled");
                    return None;
                }
            }
        }
        record_outcome(observability::outcome_label(outcome));
    } else {
        record_outcome("no_collisions");
    }

    Some(
        out.frames
            .into_iter()
            .map(|frame| (frame.id, frame.rect))
            .collect(),
    )
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!(observability::COMPUTATIONS_TOTAL, "outcome" => outcome).increment(1);
}
