use thiserror::Error;

/// Error whilst rendering an interface declaration
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid interface name '{0}'")]
    InvalidInterfaceName(String),
    #[error("Cannot resolve type reference '{name}'")]
    UnresolvableTypeReference { name: String },
    #[error("Failed to write to output: {0}")]
    SinkWrite(#[from] std::io::Error),
}

/// Error whilst reflecting a class from PHP source
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Malformed(String),
    #[error("Class '{0}' not found")]
    ClassNotFound(String),
    #[error("Unsupported type declaration '{0}'")]
    UnsupportedType(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
