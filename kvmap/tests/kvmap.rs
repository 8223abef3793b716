use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kvpouch_asyncmap::{AsyncMap, MapError, MapResult, Visitor, entries};
use kvpouch_kvmap::{
    EnvKVMap, KVMap, KVMapConfig, KeyInfo, ListOptions, ListPage, MemoryNamespace, Namespace,
};

fn map_over(ns: &MemoryNamespace) -> KVMap<Arc<MemoryNamespace>> {
    KVMap::new(Arc::new(ns.clone()))
}

#[tokio::test]
async fn get_and_has_on_missing_key() {
    let map = map_over(&MemoryNamespace::new());
    assert_eq!(map.get("missing").await.unwrap(), None);
    assert!(!map.has("missing").await.unwrap());
}

#[tokio::test]
async fn set_then_get() {
    let map = map_over(&MemoryNamespace::new());
    map.set("k", "v").await.unwrap();
    assert_eq!(map.get("k").await.unwrap(), Some("v".to_string()));
    assert!(map.has("k").await.unwrap());
}

#[tokio::test]
async fn empty_string_is_a_value() {
    let map = map_over(&MemoryNamespace::new());
    map.set("empty", "").await.unwrap();
    assert_eq!(map.get("empty").await.unwrap(), Some(String::new()));
    assert!(map.has("empty").await.unwrap());
}

#[tokio::test]
async fn delete_reports_existence_once() {
    let ns = MemoryNamespace::new();
    let map = map_over(&ns);
    map.set("k", "v").await.unwrap();

    assert!(map.delete("k").await.unwrap());
    assert!(!map.delete("k").await.unwrap());
    assert!(!map.delete("never").await.unwrap());
    assert!(ns.is_empty());
}

#[tokio::test]
async fn listing_follows_every_page() {
    // Backend pages hold 7 keys even though the map asks for 1000.
    let ns = MemoryNamespace::with_max_page(7);
    let map = map_over(&ns);
    for i in 0..50 {
        map.set(&format!("key{i:03}"), &i.to_string()).await.unwrap();
    }

    let before = ns.list_calls();
    assert_eq!(map.size().await.unwrap(), 50);
    assert_eq!(ns.list_calls() - before, 8);

    let visited = entries(&map).await.unwrap();
    assert_eq!(visited.len(), 50);
    assert_eq!(visited[0], ("key000".to_string(), "0".to_string()));
    assert_eq!(visited[49], ("key049".to_string(), "49".to_string()));

    // Same order on a second pass.
    assert_eq!(entries(&map).await.unwrap(), visited);
}

#[tokio::test]
async fn small_page_limit() {
    let ns = MemoryNamespace::new();
    let map = KVMap::with_config(
        Arc::new(ns.clone()),
        KVMapConfig {
            page_limit: 3,
            prefix: None,
        },
    );
    for i in 0..10 {
        map.set(&format!("k{i}"), "v").await.unwrap();
    }
    assert_eq!(map.keys().await.unwrap().len(), 10);
    assert_eq!(ns.list_calls(), 4);
}

#[tokio::test]
async fn clear_removes_every_page() {
    let ns = MemoryNamespace::with_max_page(4);
    let map = map_over(&ns);
    for i in 0..18 {
        map.set(&format!("k{i}"), "v").await.unwrap();
    }
    map.clear().await.unwrap();
    assert!(ns.is_empty());
    assert_eq!(map.size().await.unwrap(), 0);
}

#[tokio::test]
async fn prefix_scopes_listing_only() {
    let ns = MemoryNamespace::new();
    let map = KVMap::with_config(
        Arc::new(ns.clone()),
        KVMapConfig {
            prefix: Some("doc:".into()),
            ..Default::default()
        },
    );
    map.set("doc:1", "a").await.unwrap();
    map.set("doc:2", "b").await.unwrap();
    map.set("other", "c").await.unwrap();

    assert_eq!(map.size().await.unwrap(), 2);
    assert_eq!(map.get("other").await.unwrap(), Some("c".to_string()));

    map.clear().await.unwrap();
    assert_eq!(ns.len(), 1);
}

#[tokio::test]
async fn backend_errors_pass_through() {
    let ns = MemoryNamespace::new();
    let map = map_over(&ns);
    map.set("k", "v").await.unwrap();

    ns.fail_with("network unreachable");
    let expected = MapError::Backend("network unreachable".into());
    assert_eq!(map.get("k").await.unwrap_err(), expected);
    assert_eq!(map.has("k").await.unwrap_err(), expected);
    assert_eq!(map.delete("k").await.unwrap_err(), expected);
    assert_eq!(map.set("k", "w").await.unwrap_err(), expected);
    assert_eq!(map.size().await.unwrap_err(), expected);
    assert_eq!(map.clear().await.unwrap_err(), expected);
    assert_eq!(entries(&map).await.unwrap_err(), expected);
    assert_eq!(expected.to_string(), "network unreachable");

    ns.recover();
    assert_eq!(map.get("k").await.unwrap(), Some("v".to_string()));
}

/// Deletes the entry after the one being visited.
struct DeleteNext {
    visited: Vec<String>,
}

#[async_trait::async_trait]
impl Visitor for DeleteNext {
    async fn visit(&mut self, _value: String, key: String, map: &dyn AsyncMap) -> MapResult<()> {
        if key == "a" {
            map.delete("b").await?;
        }
        self.visited.push(key);
        Ok(())
    }
}

#[tokio::test]
async fn for_each_skips_vanished_keys() {
    let map = map_over(&MemoryNamespace::new());
    for key in ["a", "b", "c"] {
        map.set(key, key).await.unwrap();
    }

    let mut visitor = DeleteNext {
        visited: Vec::new(),
    };
    map.for_each(&mut visitor).await.unwrap();
    assert_eq!(visitor.visited, vec!["a", "c"]);
}

#[derive(Debug, PartialEq)]
struct Env {
    account: &'static str,
}

#[tokio::test]
async fn env_map_behaves_like_kvmap() {
    let ns = MemoryNamespace::with_max_page(2);
    let map = EnvKVMap::new(Arc::new(ns.clone()), Env { account: "acme" });
    assert_eq!(map.env(), &Env { account: "acme" });

    for key in ["x", "y", "z"] {
        map.set(key, "1").await.unwrap();
    }
    assert_eq!(map.size().await.unwrap(), 3);
    assert!(map.delete("y").await.unwrap());
    assert!(!map.has("y").await.unwrap());
    assert_eq!(map.namespace().get("x").await.unwrap(), Some("1".to_string()));

    map.clear().await.unwrap();
    assert!(ns.is_empty());

    let (_kvmap, env) = map.into_parts();
    assert_eq!(env.account, "acme");
}

#[tokio::test]
async fn usable_as_trait_object() {
    let map: Arc<dyn AsyncMap> = Arc::new(map_over(&MemoryNamespace::new()));
    map.set("k", "v").await.unwrap();
    assert_eq!(map.size().await.unwrap(), 1);
}

#[test]
fn config_defaults_from_json() {
    let config: KVMapConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, KVMapConfig::default());
    assert_eq!(config.page_limit, 1000);
}

/// Serves fixed pages for the listing tests below; single-key calls are unused.
struct ScriptedPages {
    /// Cursor handed back for the page requested with `cursor` (None = first).
    next_cursor: fn(Option<&str>) -> Option<String>,
    calls: AtomicUsize,
}

impl ScriptedPages {
    fn new(next_cursor: fn(Option<&str>) -> Option<String>) -> Self {
        Self {
            next_cursor,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Namespace for ScriptedPages {
    async fn list(&self, options: &ListOptions) -> MapResult<ListPage> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ListPage {
            keys: vec![KeyInfo {
                name: format!("key{n}"),
            }],
            list_complete: false,
            cursor: (self.next_cursor)(options.cursor.as_deref()),
        })
    }

    async fn get(&self, key: &str) -> MapResult<Option<String>> {
        Ok(Some(key.to_string()))
    }

    async fn put(&self, _key: &str, _value: &str) -> MapResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> MapResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn incomplete_page_without_cursor_is_an_error() {
    let map = KVMap::new(ScriptedPages::new(|_| None));

    let err = map.size().await.unwrap_err();
    assert!(matches!(&err, MapError::Backend(msg) if msg.contains("no cursor")));
    assert!(entries(&map).await.is_err());
    assert!(map.clear().await.is_err());
    assert_eq!(map.namespace().calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn cycling_cursors_are_an_error() {
    // a -> b -> a: the second "a" would restart the listing.
    let map = KVMap::new(ScriptedPages::new(|cursor| match cursor {
        None | Some("b") => Some("a".to_string()),
        Some(_) => Some("b".to_string()),
    }));

    let err = map.keys().await.unwrap_err();
    assert!(matches!(&err, MapError::Backend(msg) if msg.contains("repeated")));
    assert_eq!(map.namespace().calls.load(Ordering::SeqCst), 3);
}
