use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("No component declaration found{}", hint.as_ref().map(|h| format!(" for {}", h)).unwrap_or_default())]
    ComponentNotFound { hint: Option<String> },

    #[error("Invalid syntax at {pos}: {message}")]
    InvalidSyntax { pos: usize, message: String },
}

impl ParseError {
    pub fn component_not_found(hint: Option<&str>) -> Self {
        Self::ComponentNotFound {
            hint: hint.map(str::to_string),
        }
    }

    pub fn invalid_syntax(pos: usize, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            pos,
            message: message.into(),
        }
    }
}
