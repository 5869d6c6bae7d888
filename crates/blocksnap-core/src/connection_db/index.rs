//! A single y-sorted connection database.

use super::{ConnectionDbError, ConnectionDbResult};
use crate::checker::{ConnectionChecker, DefaultChecker};
use crate::connection::{Connection, ConnectionId};
use kurbo::{Point, Vec2};
use std::fmt;
use std::sync::Arc;

/// Database of connections sorted by y position in workspace units.
///
/// The database holds copies of connection handles, not the connections
/// themselves. Position changes go through [`ConnectionDb::move_connection`]
/// (or [`ConnectionDb::set_x`] for horizontal moves); changing a stored
/// entry's y any other way silently breaks the ordering.
pub struct ConnectionDb {
    /// Connections sorted by `position.y` (ties in any order).
    entries: Vec<Connection>,
    /// The workspace's connection checker, used to pick snap targets.
    checker: Arc<dyn ConnectionChecker>,
}

impl Default for ConnectionDb {
    fn default() -> Self {
        Self::new(Arc::new(DefaultChecker::new()))
    }
}

impl fmt::Debug for ConnectionDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDb")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl ConnectionDb {
    /// Create an empty database using `checker` to validate snap targets.
    pub fn new(checker: Arc<dyn ConnectionChecker>) -> Self {
        Self {
            entries: Vec::new(),
            checker,
        }
    }

    /// The connection checker this database was created with.
    pub fn checker(&self) -> &Arc<dyn ConnectionChecker> {
        &self.checker
    }

    /// Number of stored connections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the database is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored connections in y order.
    pub fn entries(&self) -> &[Connection] {
        &self.entries
    }

    /// Iterate stored connections in y order.
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.entries.iter()
    }

    /// Check if a connection with the given id is stored.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Remove every connection.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Add a connection. It must not already be in the database.
    ///
    /// `y` decides where the connection is inserted and must equal the
    /// connection's current y position.
    pub fn insert(&mut self, connection: &Connection, y: f64) {
        let index = self.find_insertion_index(y);
        let stored = Connection {
            position: Point::new(connection.x(), y),
            ..*connection
        };
        self.entries.insert(index, stored);
        log::trace!(
            "Added connection {} at y = {} (index {}, {} stored)",
            connection.id,
            y,
            index,
            self.entries.len()
        );
    }

    /// Remove a connection. It must already be in the database.
    ///
    /// Fails with [`ConnectionDbError::NotFound`] when the connection is not
    /// stored at `y`; the database is left unchanged in that case.
    pub fn remove(&mut self, connection: &Connection, y: f64) -> ConnectionDbResult<()> {
        let Some(index) = self.find_index_of(connection, y) else {
            log::error!(
                "Connection {} not found in connection database at y = {}",
                connection.id,
                y
            );
            return Err(ConnectionDbError::NotFound {
                id: connection.id,
                y,
            });
        };
        self.entries.remove(index);
        log::trace!(
            "Removed connection {} from index {} ({} stored)",
            connection.id,
            index,
            self.entries.len()
        );
        Ok(())
    }

    /// Update the stored horizontal position of `connection`.
    ///
    /// A horizontal move keeps the y ordering, so the entry is updated in
    /// place. Fails with [`ConnectionDbError::NotFound`] when the connection
    /// is not stored at its current y position.
    pub fn set_x(&mut self, connection: &Connection, x: f64) -> ConnectionDbResult<()> {
        let y = connection.y();
        let index = self
            .find_index_of(connection, y)
            .ok_or(ConnectionDbError::NotFound {
                id: connection.id,
                y,
            })?;
        self.entries[index].position.x = x;
        Ok(())
    }

    /// Move a stored connection to `to`.
    ///
    /// `connection` is looked up at its current y position. A vertical move
    /// removes and re-inserts the entry; a horizontal one updates it in place.
    pub fn move_connection(
        &mut self,
        connection: &Connection,
        to: Point,
    ) -> ConnectionDbResult<()> {
        if to.y == connection.y() {
            return self.set_x(connection, to.x);
        }
        self.remove(connection, connection.y())?;
        let moved = Connection {
            position: to,
            ..*connection
        };
        self.insert(&moved, to.y);
        Ok(())
    }

    /// Find the index of `connection`.
    ///
    /// Binary searches for `y`, then walks back and forth over the run of
    /// entries sharing the connection's y position, comparing ids.
    fn find_index_of(&self, connection: &Connection, y: f64) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }

        let best_guess = self.find_insertion_index(y);
        if best_guess >= self.entries.len() {
            return None;
        }

        let target_y = connection.y();
        let matches = |i: &usize| self.entries[*i].id == connection.id;
        let same_y = |i: &usize| self.entries[*i].y() == target_y;

        (0..=best_guess)
            .rev()
            .take_while(same_y)
            .find(matches)
            .or_else(|| {
                (best_guess..self.entries.len())
                    .take_while(same_y)
                    .find(matches)
            })
    }

    /// Find a candidate index for inserting at `y`.
    ///
    /// Returns as soon as an entry with exactly `y` is hit, so within a run
    /// of equal y values the result is some position in the run, not
    /// necessarily the first.
    pub fn find_insertion_index(&self, y: f64) -> usize {
        let mut low = 0;
        let mut high = self.entries.len();
        while low < high {
            let mid = (low + high) / 2;
            let mid_y = self.entries[mid].y();
            if mid_y < y {
                low = mid + 1;
            } else if mid_y > y {
                high = mid;
            } else {
                return mid;
            }
        }
        low
    }

    /// Find all connections within `max_radius` of `point`.
    ///
    /// Compatibility is not checked; every stored connection whose Euclidean
    /// distance to `point` is at most `max_radius` is returned, in no
    /// particular order.
    pub fn neighbors_within(&self, point: Point, max_radius: f64) -> Vec<Connection> {
        let db = &self.entries;
        if db.is_empty() {
            return Vec::new();
        }

        // Bounds are [0, len - 2]; a single entry leaves `mid` at -1 and the
        // forward walk starts at 0.
        let mut min: isize = 0;
        let mut max: isize = db.len() as isize - 2;
        let mut mid = max;
        while min < mid {
            if db[mid as usize].y() < point.y {
                min = mid;
            } else {
                max = mid;
            }
            mid = (min + max) / 2;
        }

        let mut neighbors = Vec::new();
        // Returns false once the entry is vertically out of range.
        let mut check = |i: usize| {
            let entry = &db[i];
            let dx = point.x - entry.x();
            let dy = point.y - entry.y();
            if (dx * dx + dy * dy).sqrt() <= max_radius {
                neighbors.push(*entry);
            }
            dy.abs() <= max_radius
        };

        let mut lower = mid;
        while lower >= 0 && check(lower as usize) {
            lower -= 1;
        }
        let mut upper = mid + 1;
        while (upper as usize) < db.len() && check(upper as usize) {
            upper += 1;
        }

        neighbors
    }

    /// Find the closest connection `connection` may join.
    ///
    /// The connection is evaluated as if displaced by `offset`. Candidates
    /// are filtered by the database's checker; the returned distance is
    /// measured from the displaced position.
    pub fn search_for_closest(
        &self,
        connection: &Connection,
        max_radius: f64,
        offset: Vec2,
    ) -> Option<(Connection, f64)> {
        if self.entries.is_empty() {
            return None;
        }

        let probe = connection.offset_by(offset);
        let base_y = probe.y();
        let closest_index = self.find_insertion_index(base_y);

        let mut best: Option<Connection> = None;
        let mut best_radius = max_radius;
        let below = (0..closest_index).rev();
        let above = closest_index..self.entries.len();
        for i in below
            .take_while(|&i| self.is_in_y_range(i, base_y, max_radius))
            .chain(above.take_while(|&i| self.is_in_y_range(i, base_y, max_radius)))
        {
            let candidate = &self.entries[i];
            if self.checker.can_connect(&probe, candidate, best_radius) {
                best_radius = probe.distance_from(candidate);
                best = Some(*candidate);
            }
        }

        best.map(|found| (found, best_radius))
    }

    fn is_in_y_range(&self, index: usize, base_y: f64, max_radius: f64) -> bool {
        (self.entries[index].y() - base_y).abs() <= max_radius
    }
}
