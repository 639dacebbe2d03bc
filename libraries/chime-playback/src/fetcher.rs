//! Track record lookup contract

use async_trait::async_trait;

use crate::error::Result;
use crate::types::TrackDescriptor;

/// Opaque id → record store
///
/// The session treats the store as an external collaborator: one
/// asynchronous lookup per load, no caching or retry at this layer.
#[async_trait]
pub trait TrackFetcher: Send + Sync {
    /// Resolve an id to a track descriptor
    ///
    /// `Ok(None)` means the record does not exist; `Err` is a lookup
    /// failure (I/O, storage). Both park the session in `Failed`.
    async fn fetch(&self, id: &str) -> Result<Option<TrackDescriptor>>;
}
