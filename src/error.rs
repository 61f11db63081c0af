#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("seed option is not an integer: {0:?}")]
    InvalidSeed(String),
}
