//! Partitioning of items into named, collapsible groups.
//!
//! Grouping is a pure function of its inputs. It is recomputed in full
//! whenever the item list or the collapse state changes; groups carry no
//! identity between calls, and collapse state is kept by name.

use crate::item::{is_truthy, Item};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Name of the group that receives items without a grouping value.
pub const UNGROUPED: &str = "Ungrouped";

/// A named run of items sharing the same grouping value.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// The stringified grouping value, or [`UNGROUPED`].
    pub name: String,
    /// Whether the group's items are shown.
    pub expanded: bool,
    /// Items in their original relative order.
    pub items: Vec<Item>,
}

impl Group {
    /// Number of items in the group, whether or not it is expanded.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the group holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items that should be shown: all of them when expanded, none otherwise.
    pub fn visible_items(&self) -> &[Item] {
        if self.expanded {
            &self.items
        } else {
            &[]
        }
    }
}

/// Splits `items` into groups keyed by the value of `group_by`.
///
/// Missing or falsy values land in [`UNGROUPED`]. Items keep their input order
/// within a group and groups are sorted by name. A group is collapsed when its
/// name appears in `collapsed`.
///
/// # Examples
///
/// ```rust
/// use bubbletea_lazylist::grouping::group_items;
/// use bubbletea_lazylist::item::Item;
/// use serde_json::json;
///
/// let items: Vec<Item> = vec![
///     json!({ "group": "B" }).into(),
///     json!({ "group": "A" }).into(),
///     json!({}).into(),
/// ];
/// let groups = group_items(&items, "group", &["B".to_string()]);
/// let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
/// assert_eq!(names, ["A", "B", "Ungrouped"]);
/// assert!(!groups[1].expanded);
/// ```
pub fn group_items(items: &[Item], group_by: &str, collapsed: &[String]) -> Vec<Group> {
    if items.is_empty() {
        return Vec::new();
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for item in items {
        let name = group_name(item, group_by);
        match index.get(&name) {
            Some(&slot) => groups[slot].items.push(item.clone()),
            None => {
                index.insert(name.clone(), groups.len());
                groups.push(Group {
                    expanded: !collapsed.contains(&name),
                    name,
                    items: vec![item.clone()],
                });
            }
        }
    }

    groups.sort_by(|a, b| compare_names(&a.name, &b.name));
    groups
}

fn group_name(item: &Item, group_by: &str) -> String {
    match item.get(group_by) {
        Some(value) if is_truthy(value) => match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        _ => UNGROUPED.to_string(),
    }
}

/// Case-insensitive ordering. Names differing only in case put lowercase
/// first ("apple" before "Apple"), which keeps the order total.
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(values: Vec<Value>) -> Vec<Item> {
        values.into_iter().map(Item::from).collect()
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(group_items(&[], "group", &[]).is_empty());
    }

    #[test]
    fn test_groups_sorted_with_ungrouped_bucket() {
        let list = items(vec![
            json!({ "id": 1, "group": "B" }),
            json!({ "id": 2, "group": "A" }),
            json!({ "id": 3, "group": null }),
        ]);
        let groups = group_items(&list, "group", &[]);
        let names: Vec<_> = groups.iter().map(|g| g.name.clone()).collect();
        assert_eq!(names, vec!["A", "B", "Ungrouped"]);
        assert!(groups.iter().all(|g| g.expanded));
    }

    #[test]
    fn test_falsy_values_are_ungrouped() {
        let list = items(vec![
            json!({ "group": "" }),
            json!({ "group": 0 }),
            json!({ "group": false }),
            json!({}),
        ]);
        let groups = group_items(&list, "group", &[]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, UNGROUPED);
        assert_eq!(groups[0].len(), 4);
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        let list = items(vec![json!({ "tier": 2 }), json!({ "tier": 1 }), json!({ "tier": 2 })]);
        let groups = group_items(&list, "tier", &[]);
        assert_eq!(groups[0].name, "1");
        assert_eq!(groups[1].name, "2");
        assert_eq!(groups[1].len(), 2);
    }

    #[test]
    fn test_stable_order_within_group() {
        let list = items(vec![
            json!({ "id": 1, "group": "X" }),
            json!({ "id": 2, "group": "Y" }),
            json!({ "id": 3, "group": "X" }),
        ]);
        let groups = group_items(&list, "group", &[]);
        let ids: Vec<_> = groups[0].items.iter().map(|i| i.get("id").cloned()).collect();
        assert_eq!(ids, vec![Some(json!(1)), Some(json!(3))]);
    }

    #[test]
    fn test_collapsed_by_name() {
        let list = items(vec![json!({ "group": "A" }), json!({ "group": "B" })]);
        let groups = group_items(&list, "group", &["A".to_string()]);
        assert!(!groups[0].expanded);
        assert!(groups[0].visible_items().is_empty());
        assert!(groups[1].expanded);
        assert_eq!(groups[1].visible_items().len(), 1);
    }

    #[test]
    fn test_missing_group_field_degrades_to_ungrouped() {
        let list = items(vec![json!({ "group": "A" })]);
        let groups = group_items(&list, "department", &[]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, UNGROUPED);
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let list = items(vec![
            json!({ "group": "beta" }),
            json!({ "group": "Alpha" }),
            json!({ "group": "alpha" }),
            json!({}),
        ]);
        let collapsed = vec!["beta".to_string()];
        let first = group_items(&list, "group", &collapsed);
        let second = group_items(&list, "group", &collapsed);
        assert_eq!(first, second);

        let names: Vec<_> = first.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["alpha", "Alpha", "beta", "Ungrouped"]);
    }
}
