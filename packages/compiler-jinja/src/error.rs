use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur while writing generated artifacts
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Failed to serialize definition: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Compilation error: {0}")]
    Generic(String),
}

impl From<String> for CompileError {
    fn from(s: String) -> Self {
        CompileError::Generic(s)
    }
}
