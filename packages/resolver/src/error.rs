use std::path::PathBuf;
use thiserror::Error;

pub type ResolverResult<T> = Result<T, ResolverError>;

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Import not found: {import_path} imported by {source_path}")]
    ImportNotFound {
        import_path: String,
        source_path: String,
    },

    #[error("Invalid base component mappings in {}: {message}", path.display())]
    MappingFile { path: PathBuf, message: String },
}

impl ResolverError {
    pub fn import_not_found(import_path: &str, source_path: &std::path::Path) -> Self {
        Self::ImportNotFound {
            import_path: import_path.to_string(),
            source_path: source_path.to_string_lossy().to_string(),
        }
    }
}
