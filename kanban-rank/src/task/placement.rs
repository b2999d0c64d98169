//! Placing a task into a column slot, rebalancing once when precision runs out

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::policy::{rank_for_slot, RankDecision, Slot};
use crate::rank::{Rank, RankCodec};
use crate::types::{ColumnKey, TaskId};
use tracing::{debug, info};

/// A rank chosen for a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Assignment {
    pub rank: Rank,
    /// Whether the column had to be rebalanced first
    pub rebalanced: bool,
}

/// Find the slot before `before` among the column's members, ignoring
/// `moving` so a task is never compared with itself.
pub(crate) async fn locate(
    ctx: &BoardContext,
    key: &ColumnKey,
    moving: Option<&TaskId>,
    before: Option<&TaskId>,
) -> Result<Slot> {
    let mut members = ctx.store().list_members(key).await?;
    if let Some(moving) = moving {
        members.retain(|m| &m.id != moving);
    }
    Ok(Slot::locate(&members, before))
}

/// Pick a rank for the slot before `before`.
///
/// `resolved` is a slot the caller already located; it is used for the
/// first attempt instead of listing the column again. When the codec runs
/// out of precision the column is rebalanced and the slot is resolved again
/// from fresh membership. A second failure is [`BoardError::RankExhausted`].
pub(crate) async fn assign_rank(
    ctx: &BoardContext,
    key: &ColumnKey,
    moving: Option<&TaskId>,
    before: Option<&TaskId>,
    resolved: Option<Slot>,
) -> Result<Assignment> {
    let codec = ctx.codec();
    let mut rebalanced = false;
    let mut pending = resolved;

    loop {
        let slot = match pending.take() {
            Some(slot) => slot,
            None => locate(ctx, key, moving, before).await?,
        };
        match rank_for_slot(&codec, slot.prev.as_ref(), slot.next.as_ref()) {
            RankDecision::Assigned(rank) => {
                debug!(column = %key.column, index = slot.index, rank = %rank, "assigned rank");
                return Ok(Assignment { rank, rebalanced });
            }
            RankDecision::RebalanceRequired if !rebalanced => {
                info!(column = %key.column, index = slot.index, "rank precision exhausted, rebalancing");
                rebalance_column(ctx, key).await?;
                rebalanced = true;
            }
            RankDecision::RebalanceRequired => {
                return Err(BoardError::RankExhausted {
                    column: key.column.to_string(),
                });
            }
        }
    }
}

/// Rewrite every member's rank with sequential ranks, keeping the current
/// order. Members whose rank is already right are not written. Returns the
/// number of writes; each one completes before the next starts.
pub(crate) async fn rebalance_column(ctx: &BoardContext, key: &ColumnKey) -> Result<usize> {
    let members = ctx.store().list_members(key).await?;
    let ranks = RankCodec::sequential(members.len());

    let mut written = 0;
    for (member, rank) in members.iter().zip(ranks) {
        if member.rank == rank {
            continue;
        }
        ctx.store()
            .write_placement(&key.owner, &member.id, &key.column, &rank)
            .await?;
        written += 1;
    }

    debug!(column = %key.column, members = members.len(), written, "rebalanced column");
    Ok(written)
}
