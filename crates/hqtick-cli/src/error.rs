use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Core(#[from] hqtick_core::CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Argument(_) => 2,
            Self::Core(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
