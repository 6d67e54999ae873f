use crate::model::*;

use super::CancelFlag;
use super::sweep::{self, CollisionGroup};

// ── Backup Layout ────────────────────────────────────────────────

/// Re-apply the sweep's column partition as an equal-width tiling per group.
/// Never fails; linear in the number of frames. Returns `false` only when
/// cancellation was observed (checked once per group), in which case the
/// frames must not be exported.
pub fn apply(
    column_width: f64,
    frames: &mut [EventFrame],
    groups: &[CollisionGroup],
    cancel: &CancelFlag,
) -> bool {
    for group in groups {
        if cancel.is_set() {
            return false;
        }
        sweep::apply_column_tiling(column_width, frames, group);
    }
    true
}
