// Trigger cooldown

use std::sync::Mutex;

/// Default window between accepted triggers
pub const DEFAULT_COOLDOWN_MS: i64 = 1_000;

/// Rejection carrying the time left in the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoolingDown {
    pub remaining_ms: i64,
}

impl CoolingDown {
    /// Whole seconds left, rounded up
    pub fn remaining_secs(&self) -> i64 {
        (self.remaining_ms + 999) / 1000
    }
}

/// Rejects triggers arriving within `window_ms` of the last accepted one.
/// Rejected triggers do not extend the window.
pub struct Cooldown {
    window_ms: i64,
    last_accepted: Mutex<Option<i64>>,
}

impl Cooldown {
    pub fn new(window_ms: i64) -> Self {
        Self {
            window_ms: window_ms.max(0),
            last_accepted: Mutex::new(None),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    /// Accept (and start a new window) or reject a trigger at `now_ms`.
    /// A clock that stepped back behind the last accepted trigger ends the
    /// window, so `remaining_ms` never exceeds `window_ms`.
    pub fn try_enter(&self, now_ms: i64) -> Result<(), CoolingDown> {
        let mut last = self
            .last_accepted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(at) = *last {
            let elapsed = now_ms - at;
            if (0..self.window_ms).contains(&elapsed) {
                return Err(CoolingDown {
                    remaining_ms: self.window_ms - elapsed,
                });
            }
        }
        *last = Some(now_ms);
        Ok(())
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_MS)
    }
}
