//! Congestion ranking of intersections
//!
//! Each intersection has exactly one current level (last report wins). The
//! ranking is kept sorted so the most congested intersections are read off the
//! front without sorting on every query.

use sorted_vec::SortedVec;
use std::cmp::Reverse;
use std::collections::HashMap;

use super::types::IntersectionId;

/// Ranking key, ordered by descending level then by first report
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RankEntry {
    level: Reverse<u64>,
    order: u64,
    id: IntersectionId,
}

#[derive(Debug, Clone, Copy)]
struct CurrentLevel {
    level: u64,
    order: u64,
}

#[derive(Debug, Clone)]
pub struct CongestionTracker {
    ranking: SortedVec<RankEntry>,
    current: HashMap<IntersectionId, CurrentLevel>,
    next_order: u64,
}

impl Default for CongestionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CongestionTracker {
    pub fn new() -> Self {
        Self {
            ranking: SortedVec::new(),
            current: HashMap::new(),
            next_order: 0,
        }
    }

    /// Upsert the current level of an intersection
    /// Returns the level it replaced, if the intersection was reported before
    pub fn report(&mut self, id: &IntersectionId, level: u64) -> Option<u64> {
        match self.current.get_mut(id) {
            Some(current) => {
                let previous = current.level;
                if previous != level {
                    self.ranking.remove_item(&RankEntry {
                        level: Reverse(previous),
                        order: current.order,
                        id: id.clone(),
                    });
                    current.level = level;
                    self.ranking.insert(RankEntry {
                        level: Reverse(level),
                        order: current.order,
                        id: id.clone(),
                    });
                }
                Some(previous)
            }
            None => {
                let order = self.next_order;
                self.next_order += 1;
                self.current.insert(id.clone(), CurrentLevel { level, order });
                self.ranking.insert(RankEntry {
                    level: Reverse(level),
                    order,
                    id: id.clone(),
                });
                None
            }
        }
    }

    /// Up to `k` intersections, most congested first
    pub fn most_congested(&self, k: usize) -> Vec<(IntersectionId, u64)> {
        self.ranking
            .iter()
            .take(k)
            .map(|entry| (entry.id.clone(), entry.level.0))
            .collect()
    }

    /// Remove and return the most congested intersection
    /// It is forgotten entirely, a later report ranks it as new
    pub fn pop_most_congested(&mut self) -> Option<(IntersectionId, u64)> {
        if self.ranking.is_empty() {
            return None;
        }
        let entry = self.ranking.remove_index(0);
        self.current.remove(&entry.id);
        Some((entry.id, entry.level.0))
    }

    /// Current level of an intersection, 0 if it was never reported
    pub fn level(&self, id: &IntersectionId) -> u64 {
        self.current.get(id).map_or(0, |current| current.level)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn clear(&mut self) {
        self.ranking = SortedVec::new();
        self.current.clear();
        self.next_order = 0;
    }
}
