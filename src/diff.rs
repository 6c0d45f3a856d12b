//! Diff engine for incremental kitchen dispatch.
//!
//! When an open check is edited and re-sent, only the net-new items go to
//! the kitchen — already-prepared dishes must not print again. There is no
//! "negative kitchen order": quantity decreases produce nothing.

use crate::types::{Check, LineItem};

/// Compute the items that are net-new relative to a baseline check.
///
/// Without a baseline (a check never sent before) every current item is
/// new. Course-break markers are never part of an incremental payload;
/// they only appear on full slips, as section dividers.
pub fn new_items_since(current: &[LineItem], baseline: Option<&Check>) -> Vec<LineItem> {
    let Some(baseline) = baseline else {
        return current
            .iter()
            .filter(|item| !item.is_course_break())
            .cloned()
            .collect();
    };

    current
        .iter()
        .filter(|item| !item.is_course_break())
        .filter_map(|item| {
            let original_qty = baseline
                .find_item(item.dish_id)
                .map(|original| original.quantity)
                .unwrap_or(0);
            let added_qty = item.quantity.saturating_sub(original_qty);
            (added_qty > 0).then(|| LineItem {
                quantity: added_qty,
                ..item.clone()
            })
        })
        .collect()
}

/// Whether an edit session has anything new to dispatch. Gates the
/// "Send" vs "Print" affordance and the partial-vs-full slip choice.
pub fn has_new_items(current: &[LineItem], baseline: Option<&Check>) -> bool {
    !new_items_since(current, baseline).is_empty()
}

// ===========================================================================
// Tests
// ===========================================================================
