//! Error types shared by the whole crate.

/// Errors raised by the TSP genetic algorithm.
///
/// Both variants are fail-fast: a run cannot continue once one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TspError {
    /// City input or chromosome arguments violate a precondition
    /// (empty input, duplicate points, mismatched gene sets, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A [`GaConfig`](crate::ga::GaConfig) parameter is out of range.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

/// Crate-wide result alias.
pub type Result<T, E = TspError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TspError::InvalidInput("no cities".into());
        assert_eq!(err.to_string(), "invalid input: no cities");

        let err = TspError::Configuration("population_size must be at least 2".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: population_size must be at least 2"
        );
    }
}
