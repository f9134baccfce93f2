//! Pure merge of an incoming refund snapshot into the local state.

use super::{
    Refund, RefundError, RefundItem, RefundItemOrderLine, RefundItemSnapshot, RefundSnapshot,
};

/// Result of merging an incoming snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The merged refund to persist.
    pub refund: Refund,

    /// True when this merge transitioned the refund to completed; the
    /// completed notification must be published exactly once, on this
    /// transition.
    pub completed: bool,
}

/// Merges an incoming refund snapshot into the existing local state.
///
/// The merge is keyed by external ids at every level: items and order lines
/// present in the snapshot are added or updated, items and order lines absent
/// from it are removed. Both sides of the merge are plain values, so the
/// reconciliation can be tested without any storage in play.
pub fn merge_refund(
    existing: Option<&Refund>,
    incoming: &RefundSnapshot,
) -> Result<MergeOutcome, RefundError> {
    // Items reconcile by set difference against the existing refund: matching
    // ids are updated, new ids added, ids absent from the snapshot dropped.
    // Incoming snapshots fully specify item state, so updating and adding
    // produce the same value; removal falls out of iterating the snapshot.
    let items = incoming
        .items
        .iter()
        .map(merge_item)
        .collect::<Result<Vec<_>, _>>()?;

    let was_completed = existing.is_some_and(|e| e.completed_time.is_some());
    let completed = incoming.completed_time.is_some() && !was_completed;

    Ok(MergeOutcome {
        refund: Refund {
            id: incoming.id,
            tenant_id: incoming.tenant_id,
            payment_id: incoming.payment_id,
            completed_time: incoming.completed_time,
            items,
        },
        completed,
    })
}

fn merge_item(snapshot: &RefundItemSnapshot) -> Result<RefundItem, RefundError> {
    let store_id = snapshot.store_id.ok_or(RefundError::StoreIdNotFound {
        refund_item: snapshot.id,
    })?;
    let order_id = snapshot.order_id.ok_or(RefundError::OrderIdNotFound {
        refund_item: snapshot.id,
    })?;

    let order_lines = snapshot
        .order_lines
        .iter()
        .map(|line| RefundItemOrderLine {
            order_line_id: line.order_line_id,
            quantity: line.quantity,
            total_amount: line.total_amount,
        })
        .collect();

    Ok(RefundItem {
        id: snapshot.id,
        store_id,
        order_id,
        amount: snapshot.amount,
        order_lines,
    })
}
