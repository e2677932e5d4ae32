//! Source of "now" for request handlers.
//!
//! Handlers never call `Utc::now()` directly; they ask the state's clock, which
//! tests replace with a manually driven one.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Default)]
pub enum Clock {
    /// Wall-clock time
    #[default]
    System,
    /// Time that only moves when told to
    Manual(Arc<Mutex<DateTime<Utc>>>),
}

impl Clock {
    pub fn manual(start: DateTime<Utc>) -> Self {
        Self::Manual(Arc::new(Mutex::new(start)))
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Manual(at) => *at.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Move a manual clock to `at`. No-op on the system clock.
    pub fn set(&self, at: DateTime<Utc>) {
        if let Self::Manual(current) = self {
            *current.lock().unwrap_or_else(PoisonError::into_inner) = at;
        }
    }

    /// Move a manual clock forward. No-op on the system clock.
    pub fn advance(&self, by: Duration) {
        if let Self::Manual(current) = self {
            let mut current = current.lock().unwrap_or_else(PoisonError::into_inner);
            *current += by;
        }
    }
}
