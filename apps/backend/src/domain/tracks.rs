//! Track network query: which opponents' track does a move traverse?
//!
//! The rail graph itself (terrain, mileposts, build costs) belongs to the
//! board module outside this engine; the engine only consumes this query
//! through the `TrackGraph` trait, so tests and alternative board backends
//! can swap the implementation.

use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt;

use pathfinding::directed::bfs::bfs;

use crate::domain::coords::Coord;

/// One owned stretch of track between two adjacent mileposts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedSegment {
    pub player_id: i64,
    pub a: Coord,
    pub b: Coord,
}

/// Result of a track usage query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackUsage {
    /// Distinct opponents whose track the move ran over.
    pub owners_used: BTreeSet<i64>,
}

/// Why a move is illegal, as reported by the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackError {
    pub reason: String,
}

impl TrackError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl Error for TrackError {}

/// Query seam between the turn engine and the board's rail graph.
pub trait TrackGraph: Send + Sync {
    /// Compute the set of distinct opponents whose track a move from `from`
    /// to `to` traverses, or the reason the move is illegal.
    fn compute_track_usage(
        &self,
        tracks: &[OwnedSegment],
        from: Coord,
        to: Coord,
        mover_id: i64,
    ) -> Result<TrackUsage, TrackError>;
}

/// Default implementation over the persisted segment set.
///
/// Moves follow laid track only: the route is the shortest chain of
/// segments connecting the endpoints. Per edge, a mover-owned segment is
/// preferred (free); otherwise the lowest-id owner of that edge is charged.
#[derive(Debug, Default, Clone, Copy)]
pub struct RailNetwork;

fn edge_key(a: Coord, b: Coord) -> (Coord, Coord) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl TrackGraph for RailNetwork {
    fn compute_track_usage(
        &self,
        tracks: &[OwnedSegment],
        from: Coord,
        to: Coord,
        mover_id: i64,
    ) -> Result<TrackUsage, TrackError> {
        let mut adjacency: HashMap<Coord, Vec<Coord>> = HashMap::new();
        let mut owners: HashMap<(Coord, Coord), BTreeSet<i64>> = HashMap::new();

        for segment in tracks {
            adjacency.entry(segment.a).or_default().push(segment.b);
            adjacency.entry(segment.b).or_default().push(segment.a);
            owners
                .entry(edge_key(segment.a, segment.b))
                .or_default()
                .insert(segment.player_id);
        }

        if !adjacency.contains_key(&from) {
            return Err(TrackError::new(format!("{from} is not on the network")));
        }
        if !adjacency.contains_key(&to) {
            return Err(TrackError::new(format!("{to} is not on the network")));
        }

        let path = bfs(
            &from,
            |node| adjacency.get(node).cloned().unwrap_or_default(),
            |node| *node == to,
        )
        .ok_or_else(|| TrackError::new(format!("no connected route from {from} to {to}")))?;

        let mut owners_used = BTreeSet::new();
        for pair in path.windows(2) {
            let edge_owners = owners
                .get(&edge_key(pair[0], pair[1]))
                .ok_or_else(|| TrackError::new("route left the segment set"))?;
            if edge_owners.contains(&mover_id) {
                continue;
            }
            // Parallel track between the same mileposts: charge one owner,
            // deterministically the lowest id.
            if let Some(owner) = edge_owners.iter().next() {
                owners_used.insert(*owner);
            }
        }

        Ok(TrackUsage { owners_used })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(player_id: i64, a: (i32, i32), b: (i32, i32)) -> OwnedSegment {
        OwnedSegment {
            player_id,
            a: Coord::new(a.0, a.1),
            b: Coord::new(b.0, b.1),
        }
    }

    #[test]
    fn own_track_is_free() {
        let tracks = vec![seg(1, (0, 0), (0, 1)), seg(1, (0, 1), (0, 2))];
        let usage = RailNetwork
            .compute_track_usage(&tracks, Coord::new(0, 0), Coord::new(0, 2), 1)
            .unwrap();
        assert!(usage.owners_used.is_empty());
    }

    #[test]
    fn opponents_along_the_route_are_collected_once() {
        let tracks = vec![
            seg(1, (0, 0), (0, 1)),
            seg(2, (0, 1), (0, 2)),
            seg(2, (0, 2), (0, 3)),
            seg(3, (0, 3), (0, 4)),
        ];
        let usage = RailNetwork
            .compute_track_usage(&tracks, Coord::new(0, 0), Coord::new(0, 4), 1)
            .unwrap();
        assert_eq!(usage.owners_used, BTreeSet::from([2, 3]));
    }

    #[test]
    fn parallel_track_prefers_mover_then_lowest_owner() {
        let tracks = vec![
            seg(5, (0, 0), (0, 1)),
            seg(2, (0, 0), (0, 1)),
            seg(9, (0, 1), (0, 2)),
            seg(4, (0, 1), (0, 2)),
        ];
        // Mover owns nothing: lowest owner charged per edge.
        let usage = RailNetwork
            .compute_track_usage(&tracks, Coord::new(0, 0), Coord::new(0, 2), 1)
            .unwrap();
        assert_eq!(usage.owners_used, BTreeSet::from([2, 4]));

        // Mover owns one of the parallel segments: that edge is free.
        let usage = RailNetwork
            .compute_track_usage(&tracks, Coord::new(0, 0), Coord::new(0, 2), 2)
            .unwrap();
        assert_eq!(usage.owners_used, BTreeSet::from([4]));
    }

    #[test]
    fn disconnected_endpoints_are_rejected() {
        let tracks = vec![seg(1, (0, 0), (0, 1)), seg(2, (5, 5), (5, 6))];
        let err = RailNetwork
            .compute_track_usage(&tracks, Coord::new(0, 0), Coord::new(5, 6), 1)
            .unwrap_err();
        assert!(err.reason.contains("no connected route"));

        let err = RailNetwork
            .compute_track_usage(&tracks, Coord::new(9, 9), Coord::new(0, 1), 1)
            .unwrap_err();
        assert!(err.reason.contains("not on the network"));
    }
}
