/// Failures loading normalizer configuration. Classifiers themselves never
/// return errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid facility table JSON: {0}")]
    Json(#[from] serde_json::Error),
}
