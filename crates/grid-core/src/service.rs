use grid_model::RecordCollection;

use crate::error::Result;

/// Remote record fetch.
///
/// Implementations may block; the grid calls them off the owning thread when
/// fetching in the background.
pub trait RecordService: Send + Sync {
    fn retrieve(&self, query: &str, layout: Option<&str>) -> Result<RecordCollection>;
}
