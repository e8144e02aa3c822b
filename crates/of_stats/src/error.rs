use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Malformed event markup: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("Invalid integer in <{field}>: '{text}'")]
    InvalidNumber { field: &'static str, text: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StatsError {
    /// Whether a lenient numeric policy could have avoided this error.
    pub fn is_data_error(&self) -> bool {
        matches!(self, StatsError::InvalidNumber { .. })
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_number_message() {
        let err = StatsError::InvalidNumber {
            field: "elapsed",
            text: "90+2".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid integer in <elapsed>: '90+2'");
        assert!(err.is_data_error());
    }

    #[test]
    fn test_parse_error_is_not_data_error() {
        let err: StatsError = roxmltree::Document::parse("<a><b></a>")
            .map(|_| ())
            .unwrap_err()
            .into();
        assert!(matches!(err, StatsError::Parse(_)));
        assert!(!err.is_data_error());
    }
}
