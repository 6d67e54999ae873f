#[derive(Debug)]
pub enum EngineError {
    /// Column width or height is non-positive or non-finite.
    InvalidDimensions { width: f64, height: f64 },
    LimitExceeded(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidDimensions { width, height } => {
                write!(f, "invalid column dimensions: {width}x{height}")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
