use roos_compiler_jinja::CompileError;
use roos_parser::ParseError;
use roos_resolver::ResolverError;
use std::path::PathBuf;
use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that abort the conversion of one component
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{what} not found: {}", path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    #[error("Cannot convert {component}: {message}")]
    Structural { component: String, message: String },

    #[error("Circular nested conversion: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error("Invalid customization {}: {message}", path.display())]
    Customization { path: PathBuf, message: String },

    #[error("Unknown token reference: {0}")]
    UnknownToken(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    pub fn missing(what: &'static str, path: impl Into<PathBuf>) -> Self {
        ConvertError::MissingInput {
            what,
            path: path.into(),
        }
    }

    pub fn structural(component: &str, message: impl Into<String>) -> Self {
        ConvertError::Structural {
            component: component.to_string(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<CompileError> for ConvertError {
    fn from(e: CompileError) -> Self {
        match e {
            CompileError::Serialize(e) => ConvertError::Json(e),
            CompileError::Generic(message) => ConvertError::Structural {
                component: "generated output".to_string(),
                message,
            },
        }
    }
}
