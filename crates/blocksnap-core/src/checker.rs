//! Compatibility checks between connections.

use crate::connection::Connection;

/// Outcome of checking whether two connections may join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    /// The connections may join.
    Ok,
    /// Both sides are the same connection.
    SameConnection,
    /// Both connections belong to the same block.
    SameBlock,
    /// The kinds are not opposites of each other.
    WrongKind,
    /// The connections are further apart than allowed.
    TooFar,
}

impl CheckResult {
    /// Check if the connections may join.
    pub fn is_ok(self) -> bool {
        self == CheckResult::Ok
    }
}

/// Decides which connections are valid snap targets during a drag.
///
/// A [`ConnectionDb`](crate::ConnectionDb) stores its checker but never
/// consults it for plain radius queries.
pub trait ConnectionChecker: Send + Sync {
    /// Check `a` against `b`, allowing at most `max_distance` between them.
    fn check(&self, a: &Connection, b: &Connection, max_distance: f64) -> CheckResult;

    /// Whether `a` may join `b` within `max_distance`.
    fn can_connect(&self, a: &Connection, b: &Connection, max_distance: f64) -> bool {
        self.check(a, b, max_distance).is_ok()
    }
}

/// Checker enforcing kind pairing and block separation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultChecker;

impl DefaultChecker {
    /// Create a new default checker.
    pub fn new() -> Self {
        Self
    }
}

impl ConnectionChecker for DefaultChecker {
    fn check(&self, a: &Connection, b: &Connection, max_distance: f64) -> CheckResult {
        if a.id == b.id {
            return CheckResult::SameConnection;
        }
        if a.block == b.block {
            return CheckResult::SameBlock;
        }
        if a.kind.opposite() != b.kind {
            return CheckResult::WrongKind;
        }
        if a.distance_from(b) > max_distance {
            return CheckResult::TooFar;
        }
        CheckResult::Ok
    }
}
