//! Error types for list loading.
//!
//! Only provider failures and a missing data source are reported as errors.
//! Misuse (asking for the next page while one is in flight, or when the
//! provider reported no more data) is a silent no-op, and bad configuration is
//! clamped to a usable value instead of failing.

use crate::source::ProviderError;

/// Errors produced while driving a data provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The provider failed to deliver the requested page.
    #[error("failed to load page {page}: {source}")]
    Provider {
        /// The page that was requested.
        page: usize,
        /// The provider's own error.
        #[source]
        source: ProviderError,
    },

    /// A load was requested but no data source has been configured.
    #[error("no data source configured")]
    NoDataSource,
}

impl Error {
    /// Returns the page number that failed, if the error came from a provider.
    pub fn page(&self) -> Option<usize> {
        match self {
            Self::Provider { page, .. } => Some(*page),
            Self::NoDataSource => None,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display_names_page() {
        let err = Error::Provider {
            page: 3,
            source: ProviderError::Network("connection reset".into()),
        };
        assert_eq!(
            err.to_string(),
            "failed to load page 3: network error: connection reset"
        );
        assert_eq!(err.page(), Some(3));
    }

    #[test]
    fn test_no_data_source_has_no_page() {
        assert_eq!(Error::NoDataSource.page(), None);
    }
}
