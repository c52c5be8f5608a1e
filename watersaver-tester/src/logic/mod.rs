pub mod event_loop;
pub mod reports;
pub mod runner;
pub mod scenarios;

pub use runner::{ScenarioResult, ScenarioRunner};
pub use scenarios::{catalog, get_scenario, list_scenarios};
