use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the routescore library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Every variant is raised while setting things up. Scoring itself never
/// fails: an edge that cannot be traversed is reported through
/// [`ScoreResult`](crate::ScoreResult), not through this type.
#[derive(Debug, Error)]
pub enum Error {
    /// A configured scorer name could not be resolved to a known cost model.
    #[error("cannot resolve edge scorer {name} (plugin {plugin}){}", format_known(.known))]
    UnknownScorer {
        name: String,
        plugin: String,
        known: Vec<&'static str>,
    },

    /// A scorer's option table did not deserialize into its typed options.
    #[error("invalid options for edge scorer {name}: {source}")]
    InvalidScorerOptions {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Raised when a configuration value is outside its accepted range.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Raised when a configuration file could not be read.
    #[error("failed to read configuration from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidConfiguration`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

fn format_known(known: &[&'static str]) -> String {
    if known.is_empty() {
        String::new()
    } else {
        format!("; known scorers: {}", known.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scorer_lists_known_names() {
        let err = Error::UnknownScorer {
            name: "FakeScorer".to_string(),
            plugin: "FakePluginPath".to_string(),
            known: vec!["DistanceScorer", "PenaltyScorer"],
        };
        assert_eq!(
            err.to_string(),
            "cannot resolve edge scorer FakeScorer (plugin FakePluginPath); known scorers: DistanceScorer, PenaltyScorer"
        );
    }

    #[test]
    fn invalid_shorthand_builds_configuration_error() {
        let err = Error::invalid("path_density must be positive");
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
        assert_eq!(
            err.to_string(),
            "invalid configuration: path_density must be positive"
        );
    }
}
