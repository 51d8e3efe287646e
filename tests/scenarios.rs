//! End-to-end scenarios driven through the public API, with a host-defined
//! provider in place of the bundled in-memory one.

use async_trait::async_trait;
use bubbletea_lazylist::prelude::*;
use bubbletea_lazylist::selection::{toggle, Selection};
use bubbletea_lazylist::{group_items, should_preload, ScrollMetrics, UNGROUPED};
use bubbletea_rs::Cmd;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Serves `total` numbered rows, counting calls per search term.
struct CountingProvider {
    total: usize,
    calls: AtomicUsize,
}

impl CountingProvider {
    fn new(total: usize) -> Arc<Self> {
        Arc::new(Self {
            total,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageProvider for CountingProvider {
    async fn load(
        &self,
        page: usize,
        page_size: usize,
        search: &str,
    ) -> std::result::Result<PaginatedResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(2)).await;

        let start = (page - 1) * page_size;
        let end = (start + page_size).min(self.total);
        let data = (start..end)
            .map(|i| json!({ "id": i + 1, "label": format!("{search}{}", i + 1) }).into())
            .collect();
        Ok(PaginatedResponse {
            data,
            total_count: self.total,
            has_more: end < self.total,
            page,
            page_size,
        })
    }
}

async fn drive(list: &mut List, mut cmd: Option<Cmd>) {
    while let Some(next) = cmd.take() {
        cmd = match next.await {
            Some(msg) => list.update(msg),
            None => None,
        };
    }
}

fn list_over(provider: &Arc<CountingProvider>) -> (List, Option<Cmd>) {
    let mut list = List::new(ListConfig::default().ungrouped().with_display_field("label"));
    let cmd = list.set_data_source(DataSource::Remote(provider.clone()));
    (list, cmd)
}

#[tokio::test]
async fn pages_of_fifteen_over_forty_two_items() {
    let provider = CountingProvider::new(42);
    let (mut list, cmd) = list_over(&provider);
    drive(&mut list, cmd).await;

    let mut loaded = vec![list.progress().loaded];
    let mut more = vec![list.has_more()];
    while list.has_more() {
        let cmd = list.load_more();
        drive(&mut list, cmd).await;
        loaded.push(list.progress().loaded);
        more.push(list.has_more());
    }

    assert_eq!(loaded, [15, 30, 42]);
    assert_eq!(more, [true, true, false]);
    assert_eq!(list.progress().percent, 100);
    assert!(list.progress().is_complete);
}

#[test]
fn single_selection_replaces_and_reports() {
    let keys = KeyExpr::default();
    let a = Item::from(json!({ "id": "a" }));
    let b = Item::from(json!({ "id": "b" }));

    let first = toggle(&a, SelectionMode::Single, &Selection::new(), &keys);
    let second = toggle(&b, SelectionMode::Single, &first.selection, &keys);

    assert_eq!(second.selection.items(), &[b.clone()]);
    assert_eq!(second.added, vec![b]);
    assert_eq!(second.removed, vec![a]);
}

#[test]
fn grouping_orders_names_with_ungrouped() {
    let items: Vec<Item> = vec![
        json!({ "group": "B" }).into(),
        json!({ "group": "A" }).into(),
        json!({ "group": null }).into(),
    ];
    let groups = group_items(&items, "group", &[]);
    let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["A", "B", UNGROUPED]);

    // Same input, same output.
    assert_eq!(groups, group_items(&items, "group", &[]));
}

#[tokio::test]
async fn stale_search_response_never_overwrites_newer_one() {
    let provider = CountingProvider::new(40);
    let mut list = List::new(ListConfig::default().ungrouped());

    let _ = list.on_search_input("x");
    let for_x = list
        .set_data_source(DataSource::Remote(provider.clone()))
        .expect("fetch for x");
    let _ = list.on_search_input("y");
    let for_y = list.reload().expect("fetch for y");

    let y = for_y.await.expect("y loaded");
    let x = for_x.await.expect("x loaded");
    let _ = list.update(y);
    let _ = list.update(x);

    assert_eq!(list.page_state().search_term, "y");
    assert!(list
        .items()
        .iter()
        .all(|item| item.get_str("label").is_some_and(|l| l.starts_with('y'))));
}

#[tokio::test]
async fn no_second_request_while_page_is_loading() {
    let provider = CountingProvider::new(42);
    let (mut list, cmd) = list_over(&provider);
    drive(&mut list, cmd).await;
    assert_eq!(provider.calls(), 1);

    let page = list.load_more();
    assert!(page.is_some());
    assert_eq!(list.state(), ListState::LoadingPage);

    for _ in 0..3 {
        assert!(list.load_more().is_none());
    }
    drive(&mut list, page).await;
    assert_eq!(provider.calls(), 2);
    assert_eq!(list.items().len(), 30);
}

#[test]
fn equal_heights_never_preload() {
    let flags = bubbletea_lazylist::preload::LoadFlags {
        has_more: true,
        ..Default::default()
    };
    for height in [0.0, 120.0, 4096.0] {
        assert!(!should_preload(&ScrollMetrics::new(0.0, height, height), 0.0, flags));
    }
}

#[test]
fn multiple_toggle_twice_restores_selection() {
    let keys = KeyExpr::default();
    let items: Vec<Item> = (1..=4).map(|n| json!({ "id": n }).into()).collect();
    let original = Selection::from_items(items[..2].to_vec(), &keys);

    for item in &items {
        let once = toggle(item, SelectionMode::Multiple, &original, &keys);
        let twice = toggle(item, SelectionMode::Multiple, &once.selection, &keys);
        assert_eq!(twice.selection.keys(), original.keys());
    }
}

#[tokio::test]
async fn grouped_list_with_collapsed_group_renders_headers() {
    let items: Vec<Item> = ["fruit", "veg", "fruit", ""]
        .iter()
        .enumerate()
        .map(|(i, g)| json!({ "id": i, "kind": g, "name": format!("thing {i}") }).into())
        .collect();
    let mut list = List::new(
        ListConfig::default()
            .with_group_by("kind")
            .with_display_field("name")
            .with_selection_mode(SelectionMode::Multiple),
    );
    list.set_items(items);
    list.on_toggle_group("veg");

    let view = list.view();
    assert!(view.contains("▾ fruit"));
    assert!(view.contains("▸ veg"));
    assert!(view.contains("▾ Ungrouped"));
    assert!(view.contains("thing 0"));
    assert!(!view.contains("thing 1"));
}
