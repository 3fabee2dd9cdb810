use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent pathing configuration error: {0}")]
    Config(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
