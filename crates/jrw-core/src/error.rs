use thiserror::Error;

#[derive(Debug, Error)]
pub enum JrwError {
    #[error("invalid build target '{0}'\nUsage: jrw build {{local|k8s|all}}")]
    InvalidTarget(String),

    #[error("program not found on PATH: {0}")]
    ProgramNotFound(String),

    #[error("failed to spawn '{program}': {message}")]
    SpawnFailed { program: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, JrwError>;
