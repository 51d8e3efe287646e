//! The data provider contract.
//!
//! A list is fed either by a fixed collection that is already fully loaded,
//! or by a remote [`PageProvider`] that returns one page at a time. Both are
//! wrapped in [`DataSource`] so the loader can treat them uniformly.
//!
//! Providers are asynchronous and must be `Send + Sync`: the loader hands an
//! `Arc` of the provider to a bubbletea command, which runs the fetch on the
//! program's runtime and reports the outcome back as a message.

mod memory;

pub use memory::MemoryProvider;

use crate::item::Item;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// One page of provider results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginatedResponse {
    /// Items on this page, in display order.
    pub data: Vec<Item>,
    /// Total number of items matching the search.
    pub total_count: usize,
    /// Whether another page can be requested. Authoritative even when it
    /// disagrees with `total_count`.
    pub has_more: bool,
    /// The page number this response answers.
    pub page: usize,
    /// The page size the provider used.
    pub page_size: usize,
}

/// Failures reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The request never reached the backend or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with an error status.
    #[error("request rejected ({status}): {message}")]
    Rejected {
        /// Status code returned by the backend.
        status: u16,
        /// Message returned by the backend.
        message: String,
    },

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// A remote, paginated source of items.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use bubbletea_lazylist::item::Item;
/// use bubbletea_lazylist::source::{PageProvider, PaginatedResponse, ProviderError};
/// use serde_json::json;
///
/// struct Numbers;
///
/// #[async_trait]
/// impl PageProvider for Numbers {
///     async fn load(
///         &self,
///         page: usize,
///         page_size: usize,
///         _search: &str,
///     ) -> Result<PaginatedResponse, ProviderError> {
///         let start = (page - 1) * page_size;
///         let data = (start..(start + page_size).min(100))
///             .map(|n| Item::from(json!({ "id": n })))
///             .collect();
///         Ok(PaginatedResponse {
///             data,
///             total_count: 100,
///             has_more: start + page_size < 100,
///             page,
///             page_size,
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait PageProvider: Send + Sync {
    /// Fetches page `page` (1-based) of `page_size` items matching `search`.
    async fn load(
        &self,
        page: usize,
        page_size: usize,
        search: &str,
    ) -> Result<PaginatedResponse, ProviderError>;
}

/// Where a list gets its items from.
#[derive(Clone)]
pub enum DataSource {
    /// A fully materialized collection, adopted without a fetch.
    Static(Vec<Item>),
    /// A paginated provider.
    Remote(Arc<dyn PageProvider>),
}

impl DataSource {
    /// Wraps a provider.
    pub fn remote<P: PageProvider + 'static>(provider: P) -> Self {
        DataSource::Remote(Arc::new(provider))
    }

    /// Returns `true` for a fixed collection.
    pub fn is_static(&self) -> bool {
        matches!(self, DataSource::Static(_))
    }
}

impl From<Vec<Item>> for DataSource {
    fn from(items: Vec<Item>) -> Self {
        DataSource::Static(items)
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Static(items) => f.debug_tuple("Static").field(&items.len()).finish(),
            DataSource::Remote(_) => f.write_str("Remote(..)"),
        }
    }
}
