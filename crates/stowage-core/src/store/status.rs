// ── Request-lifecycle status ──

use strum::Display;

/// Lifecycle status of a resource module's most recently settled call.
///
/// Within one operation the transitions are strictly
/// `Loading -> (Success | Failed)`; `Idle` is only ever the initial
/// value (or the value after a per-user reset). Because overlapping
/// calls share the flag, it describes the last *settled* call, not any
/// specific in-flight one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceStatus {
    #[default]
    Idle,
    Loading,
    Failed,
    Success,
}

impl ResourceStatus {
    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }
}
