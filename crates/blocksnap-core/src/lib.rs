//! BlockSnap Core Library
//!
//! Connection databases for a block editor: spatial indexes of the
//! connection points blocks expose, queried while a block is dragged to find
//! what it may snap to.

pub mod checker;
pub mod config;
pub mod connection;
pub mod connection_db;

pub use checker::{CheckResult, ConnectionChecker, DefaultChecker};
pub use config::{
    CONNECTING_SNAP_RADIUS, CURRENT_CONNECTION_PREFERENCE, ConfigError, ConfigResult, SNAP_RADIUS,
    SnapConfig,
};
pub use connection::{BlockId, Connection, ConnectionId, ConnectionKind};
pub use connection_db::{ConnectionDb, ConnectionDbError, ConnectionDbResult, ConnectionDbSet};
