use thiserror::Error;

#[derive(Debug, Error)]
pub enum BalanceError {
    /// Missing or inconsistent settings, fatal at start-up.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An exchange query failed; the whole report is dropped.
    #[error("{call} failed for {asset}: {source}")]
    ExternalService {
        asset: String,
        call: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl BalanceError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn external(asset: &str, call: &'static str, source: anyhow::Error) -> Self {
        Self::ExternalService {
            asset: asset.to_string(),
            call,
            source,
        }
    }
}
