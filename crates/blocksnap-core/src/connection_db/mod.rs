//! Spatial databases of connections available for snapping.
//!
//! Connections are kept sorted by their vertical position so that the
//! connections in an area can be located with a binary search followed by a
//! short walk along the y axis.

mod index;
mod set;

pub use index::ConnectionDb;
pub use set::ConnectionDbSet;

use crate::connection::ConnectionId;
use thiserror::Error;

/// Connection database errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConnectionDbError {
    /// The connection is not stored at the given y position.
    #[error("Unable to find connection {id} in connection database at y = {y}")]
    NotFound { id: ConnectionId, y: f64 },
}

/// Result type for connection database operations.
pub type ConnectionDbResult<T> = Result<T, ConnectionDbError>;
