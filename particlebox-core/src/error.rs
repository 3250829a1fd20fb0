use thiserror::Error;

/// Errors surfaced while building or loading a simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to parse scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Line and column (both 1-based) of a YAML error, if known
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::Yaml(e) => e.location().map(|loc| (loc.line(), loc.column())),
            _ => None,
        }
    }
}
