//! Water Saver Mission Engine
//!
//! Platform-agnostic simulation for the water-conservation learning game:
//! a tank drained by leak sources, player choices that cut the drain, a
//! win/lose evaluator and a queue of short-lived feedback messages.
//! This crate owns no timers and no UI; hosts drive it through
//! [`MissionController`].

pub mod choice;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod lifecycle;
pub mod notifications;
pub mod numbers;
pub mod outcome;
pub mod snapshot;
pub mod source;
pub mod state;

// Re-export commonly used types
pub use choice::{ChoiceEntry, ChoiceId, ChoiceSet, ChoiceSpec};
pub use clock::ClockGuard;
pub use config::{Briefing, MissionConfig, RewardTable};
pub use error::{MissionError, MissionResult};
pub use lifecycle::{ActionReport, MissionController, MissionHooks, NoHooks, Phase};
pub use notifications::{Notification, NotificationId, NotificationQueue};
pub use outcome::{Reward, RunOutcome, TankStatus, Thresholds, evaluate, tank_status};
pub use snapshot::{ChoiceView, MissionSnapshot};
pub use source::{LeakSource, Placement, SourceList, default_sources};
pub use state::{SimulationState, TickReport};

/// Trait for abstracting where mission configuration comes from
/// Platform-specific implementations should provide this
pub trait MissionLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the mission definition
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or is invalid.
    fn load_config(&self) -> Result<MissionConfig, Self::Error>;
}
