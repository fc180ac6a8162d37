use log::warn;

use crate::kv::KeyValueStore;

/// Local storage key for the onboarding tour step.
pub const TOUR_KEY: &str = "site-tour";

/// Onboarding tour position, read once at startup and written on every
/// change.
pub struct TourProgress {
    store: Box<dyn KeyValueStore>,
    step: i64,
}

impl TourProgress {
    /// Load the stored step. A missing or unreadable value starts the tour
    /// from step 0.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let step = match store.get_item(TOUR_KEY) {
            Ok(Some(raw)) => raw.trim().parse::<i64>().unwrap_or_else(|_| {
                warn!("Ignoring malformed {TOUR_KEY} value '{raw}'");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                warn!("Could not read {TOUR_KEY}: {e}");
                0
            }
        };
        TourProgress { store, step }
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Move to `step` and persist it. A negative step marks the tour as
    /// dismissed.
    pub fn set_step(&mut self, step: i64) -> rez_core::Result<()> {
        self.step = step;
        self.store.set_item(TOUR_KEY, &step.to_string())
    }

    pub fn advance(&mut self) -> rez_core::Result<()> {
        self.set_step(self.step + 1)
    }

    /// Whether the tour is currently showing.
    pub fn is_open(&self) -> bool {
        self.step >= 0
    }
}
