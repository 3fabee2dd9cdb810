use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid service configuration: {0}")]
    Config(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
