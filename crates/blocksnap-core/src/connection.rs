//! Connection points on blocks.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection.
pub type ConnectionId = Uuid;

/// Unique identifier for the block owning a connection.
pub type BlockId = Uuid;

/// The role a connection plays on its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// A value input slot (accepts an output).
    InputValue,
    /// A value output tab (plugs into an input).
    OutputValue,
    /// The statement connection below a block.
    NextStatement,
    /// The statement connection above a block.
    PreviousStatement,
}

impl ConnectionKind {
    /// All kinds, in database order.
    pub const ALL: [ConnectionKind; 4] = [
        ConnectionKind::InputValue,
        ConnectionKind::OutputValue,
        ConnectionKind::NextStatement,
        ConnectionKind::PreviousStatement,
    ];

    /// The kind this one is able to join with.
    pub fn opposite(self) -> Self {
        match self {
            ConnectionKind::InputValue => ConnectionKind::OutputValue,
            ConnectionKind::OutputValue => ConnectionKind::InputValue,
            ConnectionKind::NextStatement => ConnectionKind::PreviousStatement,
            ConnectionKind::PreviousStatement => ConnectionKind::NextStatement,
        }
    }

    /// Position of this kind in [`ConnectionKind::ALL`].
    pub(crate) fn slot(self) -> usize {
        match self {
            ConnectionKind::InputValue => 0,
            ConnectionKind::OutputValue => 1,
            ConnectionKind::NextStatement => 2,
            ConnectionKind::PreviousStatement => 3,
        }
    }
}

/// A connection point in workspace coordinates.
///
/// Identity is carried by `id`; two connections at the same position with
/// different ids are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique identifier.
    pub id: ConnectionId,
    /// Block the connection belongs to.
    pub block: BlockId,
    /// Role of the connection.
    pub kind: ConnectionKind,
    /// Position in workspace units.
    pub position: Point,
}

impl Connection {
    /// Create a connection with a fresh id.
    pub fn new(block: BlockId, kind: ConnectionKind, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            block,
            kind,
            position,
        }
    }

    /// Horizontal position.
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Vertical position.
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Euclidean distance to another connection.
    pub fn distance_from(&self, other: &Connection) -> f64 {
        self.position.distance(other.position)
    }

    /// A copy of this connection displaced by `offset`.
    pub fn offset_by(&self, offset: Vec2) -> Self {
        Self {
            position: self.position + offset,
            ..*self
        }
    }

    /// Move the connection to a new position.
    ///
    /// This only updates the caller's record. Use
    /// [`ConnectionDbSet::move_connection`](crate::ConnectionDbSet::move_connection)
    /// for a connection stored in a database.
    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }
}
