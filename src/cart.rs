//! Line-item ledger operations for the active order session.
//!
//! All operations run under the single-writer discipline of the event
//! loop: they mutate the session's item vec in place and never fail for
//! "remove when empty" — missing ids are a no-op.

use crate::types::{LineItem, MenuItem, COURSE_BREAK_ID};

/// Add one unit of a dish.
///
/// If a line with the same dish id already exists its quantity is
/// incremented in place (identity and position preserved); otherwise a new
/// line is appended with quantity 1. Course-break markers never merge.
pub fn add_item(items: &mut Vec<LineItem>, dish: &MenuItem) {
    if dish.dish_id != COURSE_BREAK_ID {
        if let Some(existing) = items.iter_mut().find(|item| item.dish_id == dish.dish_id) {
            existing.quantity += 1;
            return;
        }
    }
    items.push(LineItem::from_dish(dish));
}

/// Append a course-break marker. Always appended, never merged.
pub fn add_course_break(items: &mut Vec<LineItem>) {
    items.push(LineItem::course_break());
}

/// Remove one unit of a dish, or a marker by position.
///
/// Markers share the reserved dish id, so they are removed by `index`.
/// For dishes: quantity > 1 decrements, quantity == 1 removes the line.
/// Unknown ids and out-of-range marker indexes are a no-op.
pub fn remove_item(items: &mut Vec<LineItem>, dish_id: i64, index: usize) {
    if dish_id == COURSE_BREAK_ID {
        if index < items.len() && items[index].is_course_break() {
            items.remove(index);
        }
        return;
    }

    if let Some(pos) = items.iter().position(|item| item.dish_id == dish_id) {
        if items[pos].quantity > 1 {
            items[pos].quantity -= 1;
        } else {
            items.remove(pos);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::COURSE_BREAK_LABEL;

    fn dish(id: i64, price: f64) -> MenuItem {
        MenuItem {
            dish_id: id,
            dish_name: format!("Dish {id}"),
            category: "Mains".to_string(),
            price,
        }
    }

    #[test]
    fn test_add_same_dish_twice_merges() {
        let mut items = Vec::new();
        let pizza = dish(1, 10.0);
        add_item(&mut items, &pizza);
        add_item(&mut items, &pizza);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_add_preserves_position_on_merge() {
        let mut items = Vec::new();
        add_item(&mut items, &dish(1, 10.0));
        add_item(&mut items, &dish(2, 5.0));
        add_item(&mut items, &dish(1, 10.0));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].dish_id, 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].dish_id, 2);
    }

    #[test]
    fn test_course_breaks_never_merge() {
        let mut items = Vec::new();
        add_item(&mut items, &dish(1, 10.0));
        add_course_break(&mut items);
        add_item(&mut items, &dish(2, 5.0));
        add_course_break(&mut items);
        assert_eq!(items.len(), 4);
        assert!(items[1].is_course_break());
        assert!(items[3].is_course_break());
        assert_eq!(items[1].dish_name, COURSE_BREAK_LABEL);
    }

    #[test]
    fn test_remove_marker_by_index_leaves_other_markers() {
        let mut items = Vec::new();
        add_course_break(&mut items);
        add_item(&mut items, &dish(1, 10.0));
        add_course_break(&mut items);

        remove_item(&mut items, -1, 0);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].dish_id, 1);
        assert!(items[1].is_course_break());
    }

    #[test]
    fn test_remove_marker_index_must_point_at_marker() {
        let mut items = Vec::new();
        add_item(&mut items, &dish(1, 10.0));
        // index 0 is a dish, not a marker; must not remove it
        remove_item(&mut items, -1, 0);
        assert_eq!(items.len(), 1);
        // out of range is a no-op too
        remove_item(&mut items, -1, 5);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_remove_decrements_then_removes() {
        let mut items = Vec::new();
        let pizza = dish(1, 10.0);
        add_item(&mut items, &pizza);
        add_item(&mut items, &pizza);

        remove_item(&mut items, 1, 0);
        assert_eq!(items[0].quantity, 1);

        remove_item(&mut items, 1, 0);
        assert!(items.is_empty());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut items = Vec::new();
        add_item(&mut items, &dish(1, 10.0));
        remove_item(&mut items, 99, 0);
        assert_eq!(items.len(), 1);

        let mut empty: Vec<LineItem> = Vec::new();
        remove_item(&mut empty, 1, 0);
        assert!(empty.is_empty());
    }
}
