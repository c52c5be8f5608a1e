use crate::lifecycle::Phase;

pub type MissionResult<T> = Result<T, MissionError>;

#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    #[error("unknown leak source: {0}")]
    UnknownSource(String),

    #[error("unknown water choice: {0}")]
    UnknownChoice(String),

    #[error("cannot {action} while the mission is {phase}")]
    InvalidPhase { action: &'static str, phase: Phase },

    #[error("invalid mission config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse mission config: {0}")]
    Parse(#[from] serde_json::Error),
}
