//! Choosing a rank for a slot between two neighbours

use crate::rank::{Rank, RankCodec};
use crate::types::{Member, TaskId};
use serde::Serialize;

/// Outcome of asking for a rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankDecision {
    /// A rank strictly inside the slot
    Assigned(Rank),
    /// The codec ran out of precision; the column must be rebalanced first
    RebalanceRequired,
}

/// An insertion point in a column, described by its neighbours
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Slot {
    /// Index the new item will occupy
    pub index: usize,
    pub prev: Option<Rank>,
    pub next: Option<Rank>,
}

impl Slot {
    /// Find the slot right before `before`, or at the end when `before` is
    /// absent or not a member.
    pub fn locate(members: &[Member], before: Option<&TaskId>) -> Self {
        let index = before
            .and_then(|id| members.iter().position(|m| &m.id == id))
            .unwrap_or(members.len());

        Self {
            index,
            prev: index
                .checked_sub(1)
                .and_then(|i| members.get(i))
                .map(|m| m.rank.clone()),
            next: members.get(index).map(|m| m.rank.clone()),
        }
    }

    /// Whether `rank` already sits strictly between the neighbours
    pub fn contains(&self, rank: &Rank) -> bool {
        self.prev.as_ref().map_or(true, |prev| prev < rank)
            && self.next.as_ref().map_or(true, |next| rank < next)
    }
}

/// Pick the codec operation matching which neighbours exist.
pub fn rank_for_slot(codec: &RankCodec, prev: Option<&Rank>, next: Option<&Rank>) -> RankDecision {
    let rank = match (prev, next) {
        (Some(_), Some(_)) => codec.between(prev, next),
        (Some(_), None) => Some(RankCodec::after(prev)),
        (None, Some(_)) => RankCodec::before(next),
        (None, None) => Some(Rank::mid()),
    };

    match rank {
        Some(rank) => RankDecision::Assigned(rank),
        None => RankDecision::RebalanceRequired,
    }
}
