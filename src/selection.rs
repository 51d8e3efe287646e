//! Selection state and transitions.
//!
//! A [`Selection`] keeps the selected items together with their keys, in
//! click order. Transitions are computed by [`toggle`], which never mutates
//! its input and returns the new selection together with the items that were
//! added and removed.
//!
//! Selection is sticky: items stay selected after a reload removes them from
//! the materialized list, until they are toggled off or the selection is
//! cleared explicitly.

use crate::item::{Item, ItemKey, KeyExpr};

/// How clicks affect the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Clicks never select.
    #[default]
    None,
    /// At most one item is selected; a click replaces the selection.
    Single,
    /// Each click toggles the clicked item in or out.
    Multiple,
}

/// The selected items and their keys, in selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    items: Vec<Item>,
    keys: Vec<ItemKey>,
}

impl Selection {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from items, resolving their keys with `key_expr`.
    ///
    /// Later duplicates of an already present key are dropped.
    pub fn from_items(items: impl IntoIterator<Item = Item>, key_expr: &KeyExpr) -> Self {
        let mut selection = Self::new();
        for item in items {
            let key = key_expr.key_of(&item);
            if !selection.keys.contains(&key) {
                selection.keys.push(key);
                selection.items.push(item);
            }
        }
        selection
    }

    /// Selected items in selection order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Keys of the selected items, parallel to [`items`](Self::items).
    pub fn keys(&self) -> &[ItemKey] {
        &self.keys
    }

    /// Number of selected items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if an item with `key` is selected.
    pub fn contains_key(&self, key: &ItemKey) -> bool {
        self.keys.contains(key)
    }

    /// Returns `true` if `item` is selected under `key_expr`.
    pub fn is_selected(&self, item: &Item, key_expr: &KeyExpr) -> bool {
        self.contains_key(&key_expr.key_of(item))
    }
}

/// Result of a selection transition.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange {
    /// The selection after the transition.
    pub selection: Selection,
    /// Items that became selected.
    pub added: Vec<Item>,
    /// Items that stopped being selected.
    pub removed: Vec<Item>,
}

impl SelectionChange {
    /// Returns `true` if the transition added and removed nothing.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Computes the selection that results from clicking `item`.
///
/// In [`SelectionMode::Single`] the clicked item replaces the selection and
/// every previously selected item with a different key is reported as
/// removed; reselecting the current item removes nothing. In
/// [`SelectionMode::Multiple`] the item is appended if absent and removed if
/// present. [`SelectionMode::None`] leaves the selection unchanged.
///
/// # Examples
///
/// ```rust
/// use bubbletea_lazylist::item::{Item, KeyExpr};
/// use bubbletea_lazylist::selection::{toggle, Selection, SelectionMode};
/// use serde_json::json;
///
/// let a = Item::from(json!({ "id": 1 }));
/// let b = Item::from(json!({ "id": 2 }));
/// let keys = KeyExpr::default();
///
/// let first = toggle(&a, SelectionMode::Single, &Selection::new(), &keys);
/// let second = toggle(&b, SelectionMode::Single, &first.selection, &keys);
/// assert_eq!(second.selection.items(), &[b.clone()]);
/// assert_eq!(second.added, vec![b]);
/// assert_eq!(second.removed, vec![a]);
/// ```
pub fn toggle(
    item: &Item,
    mode: SelectionMode,
    current: &Selection,
    key_expr: &KeyExpr,
) -> SelectionChange {
    let key = key_expr.key_of(item);

    match mode {
        SelectionMode::None => SelectionChange {
            selection: current.clone(),
            added: Vec::new(),
            removed: Vec::new(),
        },
        SelectionMode::Single => {
            let removed = current
                .items
                .iter()
                .zip(&current.keys)
                .filter(|(_, k)| **k != key)
                .map(|(i, _)| i.clone())
                .collect();
            SelectionChange {
                selection: Selection {
                    items: vec![item.clone()],
                    keys: vec![key],
                },
                added: vec![item.clone()],
                removed,
            }
        }
        SelectionMode::Multiple => {
            let mut selection = current.clone();
            match selection.keys.iter().position(|k| *k == key) {
                Some(index) => {
                    selection.items.remove(index);
                    selection.keys.remove(index);
                    SelectionChange {
                        selection,
                        added: Vec::new(),
                        removed: vec![item.clone()],
                    }
                }
                None => {
                    selection.items.push(item.clone());
                    selection.keys.push(key);
                    SelectionChange {
                        selection,
                        added: vec![item.clone()],
                        removed: Vec::new(),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: i64) -> Item {
        Item::from(json!({ "id": id, "name": format!("item {id}") }))
    }

    #[test]
    fn test_single_replaces_selection() {
        let keys = KeyExpr::default();
        let (a, b) = (item(1), item(2));

        let first = toggle(&a, SelectionMode::Single, &Selection::new(), &keys);
        assert_eq!(first.added, vec![a.clone()]);
        assert!(first.removed.is_empty());

        let second = toggle(&b, SelectionMode::Single, &first.selection, &keys);
        assert_eq!(second.selection.items(), &[b.clone()]);
        assert_eq!(second.selection.keys(), &[ItemKey::Int(2)]);
        assert_eq!(second.added, vec![b]);
        assert_eq!(second.removed, vec![a]);
    }

    #[test]
    fn test_single_reselect_does_not_report_removal() {
        let keys = KeyExpr::default();
        let a = item(1);
        let first = toggle(&a, SelectionMode::Single, &Selection::new(), &keys);

        // A fresh record with the same key counts as the same item.
        let again = toggle(&item(1), SelectionMode::Single, &first.selection, &keys);
        assert!(again.removed.is_empty());
        assert_eq!(again.selection.len(), 1);
    }

    #[test]
    fn test_multiple_appends_in_click_order() {
        let keys = KeyExpr::default();
        let mut selection = Selection::new();
        for id in [3, 1, 2] {
            selection = toggle(&item(id), SelectionMode::Multiple, &selection, &keys).selection;
        }
        assert_eq!(
            selection.keys(),
            &[ItemKey::Int(3), ItemKey::Int(1), ItemKey::Int(2)]
        );
    }

    #[test]
    fn test_multiple_toggle_is_its_own_inverse() {
        let keys = KeyExpr::default();
        let original = Selection::from_items(vec![item(1), item(2)], &keys);

        for id in [1, 2, 3] {
            let target = item(id);
            let once = toggle(&target, SelectionMode::Multiple, &original, &keys);
            let twice = toggle(&target, SelectionMode::Multiple, &once.selection, &keys);
            assert_eq!(twice.selection.keys(), original.keys());
            assert_eq!(twice.selection.len(), original.len());
        }
    }

    #[test]
    fn test_multiple_removal_reports_item() {
        let keys = KeyExpr::default();
        let a = item(1);
        let current = Selection::from_items(vec![a.clone()], &keys);
        let change = toggle(&a, SelectionMode::Multiple, &current, &keys);
        assert!(change.selection.is_empty());
        assert!(change.added.is_empty());
        assert_eq!(change.removed, vec![a]);
    }

    #[test]
    fn test_none_mode_is_inert() {
        let keys = KeyExpr::default();
        let current = Selection::from_items(vec![item(1)], &keys);
        let change = toggle(&item(2), SelectionMode::None, &current, &keys);
        assert!(change.is_empty());
        assert_eq!(change.selection, current);
    }

    #[test]
    fn test_identity_keys_distinguish_records() {
        let keys = KeyExpr::field("missing");
        let a = Item::from(json!({ "name": "twin" }));
        let b = Item::from(json!({ "name": "twin" }));
        let current = toggle(&a, SelectionMode::Multiple, &Selection::new(), &keys).selection;

        assert!(current.is_selected(&a, &keys));
        assert!(current.is_selected(&a.clone(), &keys));
        assert!(!current.is_selected(&b, &keys));
    }

    #[test]
    fn test_from_items_drops_duplicate_keys() {
        let keys = KeyExpr::default();
        let selection = Selection::from_items(vec![item(1), item(1), item(2)], &keys);
        assert_eq!(selection.len(), 2);
    }
}
