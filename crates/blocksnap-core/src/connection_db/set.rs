//! One connection database per connection kind.

use super::{ConnectionDb, ConnectionDbResult};
use crate::checker::{ConnectionChecker, DefaultChecker};
use crate::config::SnapConfig;
use crate::connection::{Connection, ConnectionKind};
use kurbo::{Point, Vec2};
use std::sync::Arc;

/// The connection databases of a workspace, one per [`ConnectionKind`].
///
/// All databases share the workspace's checker. A dragged connection
/// searches the database of its opposite kind.
#[derive(Debug)]
pub struct ConnectionDbSet {
    dbs: [ConnectionDb; 4],
    /// Snapping distances used by [`ConnectionDbSet::snap_target`].
    config: SnapConfig,
}

impl ConnectionDbSet {
    /// Create empty databases sharing `checker`, with the default snapping
    /// distances.
    pub fn new(checker: Arc<dyn ConnectionChecker>) -> Self {
        Self::with_config(checker, SnapConfig::default())
    }

    /// Create empty databases sharing `checker`.
    pub fn with_config(checker: Arc<dyn ConnectionChecker>, config: SnapConfig) -> Self {
        Self {
            dbs: ConnectionKind::ALL.map(|_| ConnectionDb::new(Arc::clone(&checker))),
            config,
        }
    }

    /// The snapping configuration.
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// The database holding connections of `kind`.
    pub fn db(&self, kind: ConnectionKind) -> &ConnectionDb {
        &self.dbs[kind.slot()]
    }

    /// Mutable access to the database holding connections of `kind`.
    pub fn db_mut(&mut self, kind: ConnectionKind) -> &mut ConnectionDb {
        &mut self.dbs[kind.slot()]
    }

    /// The database a dragged connection of `kind` should search.
    pub fn opposite_db(&self, kind: ConnectionKind) -> &ConnectionDb {
        self.db(kind.opposite())
    }

    /// Add a connection to its kind's database at its current y position.
    pub fn add(&mut self, connection: &Connection) {
        self.db_mut(connection.kind).insert(connection, connection.y());
    }

    /// Remove a connection from its kind's database at its current y position.
    pub fn remove(&mut self, connection: &Connection) -> ConnectionDbResult<()> {
        self.db_mut(connection.kind).remove(connection, connection.y())
    }

    /// Move a stored connection and the caller's record to `to`.
    ///
    /// The record is only updated once its database entry has moved.
    pub fn move_connection(
        &mut self,
        connection: &mut Connection,
        to: Point,
    ) -> ConnectionDbResult<()> {
        self.db_mut(connection.kind).move_connection(connection, to)?;
        connection.move_to(to);
        Ok(())
    }

    /// Find the closest connection `connection` may join once displaced by `offset`.
    pub fn closest(
        &self,
        connection: &Connection,
        max_radius: f64,
        offset: Vec2,
    ) -> Option<(Connection, f64)> {
        self.opposite_db(connection.kind)
            .search_for_closest(connection, max_radius, offset)
    }

    /// Pick the connection a drag should snap to.
    ///
    /// Searches with `snap_radius`, or `connecting_snap_radius` while
    /// `highlighted` is set. The highlighted connection is kept while it is
    /// still valid unless another candidate is closer by more than
    /// `current_connection_preference`.
    pub fn snap_target(
        &self,
        connection: &Connection,
        offset: Vec2,
        highlighted: Option<&Connection>,
    ) -> Option<(Connection, f64)> {
        let radius = self.config.search_radius(highlighted.is_some());
        let candidate = self.closest(connection, radius, offset)?;

        let Some(current) = highlighted else {
            return Some(candidate);
        };
        if candidate.0.id == current.id {
            return Some(candidate);
        }

        let probe = connection.offset_by(offset);
        let checker = self.opposite_db(connection.kind).checker();
        if !checker.can_connect(&probe, current, radius) {
            return Some(candidate);
        }
        let current_distance = probe.distance_from(current);
        if candidate.1 > current_distance - self.config.current_connection_preference {
            log::trace!(
                "Keeping highlighted connection {} over {}",
                current.id,
                candidate.0.id
            );
            return Some((*current, current_distance));
        }
        Some(candidate)
    }

    /// Total number of stored connections.
    pub fn len(&self) -> usize {
        self.dbs.iter().map(ConnectionDb::len).sum()
    }

    /// Check if every database is empty.
    pub fn is_empty(&self) -> bool {
        self.dbs.iter().all(ConnectionDb::is_empty)
    }

    /// Remove every connection from every database.
    pub fn clear(&mut self) {
        for db in &mut self.dbs {
            db.clear();
        }
    }
}

impl Default for ConnectionDbSet {
    fn default() -> Self {
        Self::new(Arc::new(DefaultChecker::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection_db::ConnectionDbError;
    use uuid::Uuid;

    fn conn(kind: ConnectionKind, x: f64, y: f64) -> Connection {
        Connection::new(Uuid::new_v4(), kind, Point::new(x, y))
    }

    #[test]
    fn test_add_routes_by_kind() {
        let mut set = ConnectionDbSet::default();
        let block = Uuid::new_v4();
        let next = Connection::new(block, ConnectionKind::NextStatement, Point::new(0.0, 10.0));
        let input = Connection::new(block, ConnectionKind::InputValue, Point::new(5.0, 3.0));
        set.add(&next);
        set.add(&input);

        assert_eq!(set.len(), 2);
        assert!(set.db(ConnectionKind::NextStatement).contains(next.id));
        assert!(set.db(ConnectionKind::InputValue).contains(input.id));
        assert!(set.db(ConnectionKind::OutputValue).is_empty());
        assert!(set.opposite_db(ConnectionKind::PreviousStatement).contains(next.id));
    }

    #[test]
    fn test_remove() {
        let mut set = ConnectionDbSet::default();
        let c = conn(ConnectionKind::OutputValue, 1.0, 1.0);
        set.add(&c);
        set.remove(&c).unwrap();
        assert!(set.is_empty());
        assert!(matches!(set.remove(&c), Err(ConnectionDbError::NotFound { .. })));
    }

    #[test]
    fn test_closest_searches_opposite_kind() {
        let mut set = ConnectionDbSet::default();
        let target = conn(ConnectionKind::InputValue, 50.0, 50.0);
        let decoy = conn(ConnectionKind::OutputValue, 50.0, 50.0);
        set.add(&target);
        set.add(&decoy);

        let dragged = conn(ConnectionKind::OutputValue, 40.0, 40.0);
        let (found, distance) = set.closest(&dragged, 28.0, Vec2::new(10.0, 10.0)).unwrap();
        assert_eq!(found.id, target.id);
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn test_move_connection_horizontal() {
        let mut set = ConnectionDbSet::default();
        let mut target = conn(ConnectionKind::InputValue, 0.0, 0.0);
        set.add(&target);

        set.move_connection(&mut target, Point::new(100.0, 0.0)).unwrap();
        assert_eq!(target.position, Point::new(100.0, 0.0));

        let db = set.db(ConnectionKind::InputValue);
        assert_eq!(db.neighbors_within(Point::new(100.0, 0.0), 1.0), vec![target]);
        assert!(db.neighbors_within(Point::new(0.0, 0.0), 1.0).is_empty());
    }

    #[test]
    fn test_move_connection_vertical() {
        let mut set = ConnectionDbSet::default();
        let mut target = conn(ConnectionKind::NextStatement, 0.0, 0.0);
        let other = conn(ConnectionKind::NextStatement, 0.0, 10.0);
        set.add(&target);
        set.add(&other);

        set.move_connection(&mut target, Point::new(5.0, 20.0)).unwrap();
        let db = set.db(ConnectionKind::NextStatement);
        assert_eq!(db.entries()[0].id, other.id);
        assert_eq!(db.entries()[1], target);

        // The stale position no longer finds it.
        let mut stale = target;
        stale.move_to(Point::ZERO);
        assert!(set.move_connection(&mut stale, Point::new(1.0, 1.0)).is_err());
        assert_eq!(stale.position, Point::ZERO);
    }

    #[test]
    fn test_snap_target_uses_snap_radius() {
        let mut set = ConnectionDbSet::default();
        let near = conn(ConnectionKind::PreviousStatement, 0.0, 27.0);
        let far = conn(ConnectionKind::PreviousStatement, 0.0, -40.0);
        set.add(&near);
        set.add(&far);
        let dragged = conn(ConnectionKind::NextStatement, 0.0, 0.0);

        let (found, _) = set.snap_target(&dragged, Vec2::ZERO, None).unwrap();
        assert_eq!(found.id, near.id);

        set.remove(&near).unwrap();
        assert!(set.snap_target(&dragged, Vec2::ZERO, None).is_none());
        // The wider connecting radius reaches `far` once something is highlighted.
        let (found, _) = set.snap_target(&dragged, Vec2::ZERO, Some(&far)).unwrap();
        assert_eq!(found.id, far.id);
    }

    #[test]
    fn test_snap_target_prefers_highlight() {
        let mut set = ConnectionDbSet::default();
        let current = conn(ConnectionKind::InputValue, 10.0, 0.0);
        let slightly_closer = conn(ConnectionKind::InputValue, 0.0, 5.0);
        set.add(&current);
        set.add(&slightly_closer);
        let dragged = conn(ConnectionKind::OutputValue, 0.0, 0.0);

        let (found, distance) = set.snap_target(&dragged, Vec2::ZERO, Some(&current)).unwrap();
        assert_eq!(found.id, current.id);
        assert_eq!(distance, 10.0);

        let much_closer = conn(ConnectionKind::InputValue, 0.0, 1.0);
        set.add(&much_closer);
        let (found, _) = set.snap_target(&dragged, Vec2::ZERO, Some(&current)).unwrap();
        assert_eq!(found.id, much_closer.id);
    }

    #[test]
    fn test_snap_target_drops_invalid_highlight() {
        let mut set = ConnectionDbSet::default();
        let dragged = conn(ConnectionKind::OutputValue, 0.0, 0.0);
        let own = Connection::new(dragged.block, ConnectionKind::InputValue, Point::new(4.0, 0.0));
        let candidate = conn(ConnectionKind::InputValue, 0.0, 6.0);
        set.add(&candidate);

        let (found, _) = set.snap_target(&dragged, Vec2::ZERO, Some(&own)).unwrap();
        assert_eq!(found.id, candidate.id);
    }

    #[test]
    fn test_with_config() {
        let config = SnapConfig {
            snap_radius: 5.0,
            connecting_snap_radius: 10.0,
            current_connection_preference: 0.0,
        };
        let mut set = ConnectionDbSet::with_config(Arc::new(DefaultChecker::new()), config);
        assert_eq!(set.config(), &config);

        set.add(&conn(ConnectionKind::InputValue, 0.0, 6.0));
        let dragged = conn(ConnectionKind::OutputValue, 0.0, 0.0);
        assert!(set.snap_target(&dragged, Vec2::ZERO, None).is_none());
    }

    #[test]
    fn test_shared_checker() {
        let set = ConnectionDbSet::default();
        let first = set.db(ConnectionKind::InputValue).checker();
        for kind in ConnectionKind::ALL {
            assert!(Arc::ptr_eq(first, set.db(kind).checker()));
        }
    }

    #[test]
    fn test_clear() {
        let mut set = ConnectionDbSet::default();
        for kind in ConnectionKind::ALL {
            set.add(&Connection::new(Uuid::new_v4(), kind, Point::ZERO));
        }
        assert_eq!(set.len(), 4);
        set.clear();
        assert!(set.is_empty());
    }
}
