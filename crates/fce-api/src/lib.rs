pub mod card;
pub mod clock;
pub mod collection;
pub mod config;
pub mod deck;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod review;
pub mod router;
pub mod state;
pub mod stats;
pub mod tracing;
pub mod transfer;
pub mod validation;

pub use clock::Clock;
pub use collection::Collection;
pub use config::ApiConfig;
pub use state::ApiState;
