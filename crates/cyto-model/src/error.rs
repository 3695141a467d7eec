use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("batch size must be greater than zero")]
    InvalidBatchSize,
}

pub type Result<T> = std::result::Result<T, ModelError>;
