//! One-shot fly-to signal

use crate::model::FlyTarget;

/// Write-once-consume-once holder for the pan signal a search selection
/// emits.
///
/// Once consumed the signal is gone: re-running the consumer with no new
/// emission must not restart the animation, so there is deliberately no
/// way to peek the previous value.
#[derive(Debug, Default)]
pub struct FlyToSignal {
    pending: Option<FlyTarget>,
}

impl FlyToSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a new target, replacing any unconsumed one.
    pub fn emit(&mut self, target: FlyTarget) {
        self.pending = Some(target);
    }

    /// Consumes the pending target, if any.
    pub fn take(&mut self) -> Option<FlyTarget> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
