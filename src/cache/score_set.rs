use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::types::{MemberId, Points};

/// In-process sorted set of member scores.
///
/// Ordering mirrors a Redis sorted set read in descending direction: higher
/// score first, ties broken reverse-lexicographically by member id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreSet {
    scores: HashMap<MemberId, Points>,
    ordered: BTreeSet<(Points, MemberId)>,
}

impl ScoreSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members with a score.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when no member has a score.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Current score of `member`, `None` when absent.
    pub fn score(&self, member: &MemberId) -> Option<Points> {
        self.scores.get(member).copied()
    }

    /// Sets the member's score, replacing any previous value.
    pub fn set(&mut self, member: MemberId, points: Points) {
        if let Some(old) = self.scores.insert(member.clone(), points) {
            self.ordered.remove(&(old, member.clone()));
        }
        self.ordered.insert((points, member));
    }

    /// Adds `delta` to the member's score, creating the entry at `delta` if
    /// absent. Returns the resulting score.
    pub fn incr(&mut self, member: &MemberId, delta: Points) -> Points {
        let next = self.score(member).unwrap_or(0) + delta;
        self.set(member.clone(), next);
        next
    }

    /// Zero-based rank in descending order, `None` when absent.
    pub fn rank_desc(&self, member: &MemberId) -> Option<usize> {
        let points = self.score(member)?;
        let probe = (points, member.clone());
        Some(
            self.ordered
                .range((std::ops::Bound::Excluded(probe), std::ops::Bound::Unbounded))
                .count(),
        )
    }

    /// Inclusive `[start, stop]` slice in descending order, clamped to the
    /// set bounds like a ZREVRANGE call.
    pub fn range_desc(&self, start: usize, stop: usize) -> Vec<(MemberId, Points)> {
        if start > stop {
            return Vec::new();
        }
        self.ordered
            .iter()
            .rev()
            .skip(start)
            .take(stop - start + 1)
            .map(|(points, member)| (member.clone(), *points))
            .collect()
    }

    /// All entries in descending order.
    pub fn iter_desc(&self) -> impl Iterator<Item = (&MemberId, Points)> {
        self.ordered.iter().rev().map(|(points, member)| (member, *points))
    }
}
