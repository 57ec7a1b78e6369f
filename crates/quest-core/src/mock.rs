//! Mock data catalog: deterministic stand-in results for demo queries.
//!
//! Resolution order is exact canonical match, then the ordered heuristics,
//! then the generic node placeholder. First match wins.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::normalize::normalize;
use crate::query::Row;

const RETURN_ONE: &str = "RETURN 1";
const NODES_BY_LABEL: &str =
    "MATCH (n) RETURN labels(n) AS labels, count(*) AS cnt ORDER BY cnt DESC LIMIT 20";
const RELATIONSHIP_TYPES: &str =
    "MATCH ()-[r]->() RETURN type(r) AS relType, count(*) AS cnt ORDER BY cnt DESC LIMIT 20";
const NODE_PROPERTY_SAMPLE: &str = "MATCH (n) RETURN labels(n) AS labels, keys(n) AS props LIMIT 20";
const USER_SAMPLE: &str = "MATCH (u:User) RETURN u LIMIT 20";
const ITEM_SAMPLE: &str = "MATCH (i:Item) RETURN i LIMIT 20";
const PRODUCT_SAMPLE: &str = "MATCH (p:Product) RETURN p LIMIT 20";
const USER_ITEM_VIEW: &str =
    "MATCH (u:User)-[:VIEW]->(i:Item) RETURN u.userId AS userId, i.itemId AS itemId LIMIT 50";
const PATH_SAMPLE: &str = "MATCH p=(a)-[*1..3]->(b) RETURN length(p) AS hops LIMIT 20";

/// Key reported for the generic placeholder entry.
pub const GENERIC_KEY: &str = "*";

/// Which rule resolved a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "name", rename_all = "snake_case")]
pub enum MatchRule {
    Exact,
    Heuristic(&'static str),
    Generic,
}

/// A resolved catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockEntry {
    /// Canonical query the payload belongs to, or [`GENERIC_KEY`].
    pub key: String,
    pub rule: MatchRule,
    /// Result set in native record shape.
    pub payload: Value,
}

impl MockEntry {
    /// The entry's rows, normalized.
    pub fn rows(&self) -> Vec<Row> {
        normalize(&self.payload)
    }
}

/// Substring heuristic pointing at a canonical entry.
struct Heuristic {
    name: &'static str,
    matches: fn(&str) -> bool,
    target: &'static str,
}

const HEURISTICS: &[Heuristic] = &[
    Heuristic {
        name: "return-one",
        matches: returns_one,
        target: RETURN_ONE,
    },
    Heuristic {
        name: "user-nodes",
        matches: returns_users,
        target: USER_SAMPLE,
    },
    Heuristic {
        name: "item-nodes",
        matches: returns_items,
        target: ITEM_SAMPLE,
    },
    Heuristic {
        name: "product-nodes",
        matches: returns_products,
        target: PRODUCT_SAMPLE,
    },
    Heuristic {
        name: "count-star",
        matches: counts_star,
        target: NODES_BY_LABEL,
    },
];

fn returns_one(q: &str) -> bool {
    q.contains("RETURN 1")
}

fn returns_users(q: &str) -> bool {
    q.contains("User") && q.contains("RETURN u")
}

fn returns_items(q: &str) -> bool {
    q.contains("Item") && q.contains("RETURN i")
}

fn returns_products(q: &str) -> bool {
    q.contains("Product") && q.contains("RETURN p")
}

fn counts_star(q: &str) -> bool {
    q.to_lowercase().contains("count(*)")
}

/// Trim and collapse internal whitespace runs to single spaces.
pub fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical query table plus heuristic matchers.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    entries: HashMap<String, Value>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MockCatalog {
    /// The demo catalog.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(RETURN_ONE.to_string(), records(&["one"], vec![json!([1])]));
        entries.insert(
            NODES_BY_LABEL.to_string(),
            records(
                &["labels", "cnt"],
                vec![
                    json!([["User"], 120]),
                    json!([["Item"], 80]),
                    json!([["Product"], 45]),
                ],
            ),
        );
        entries.insert(
            RELATIONSHIP_TYPES.to_string(),
            records(
                &["relType", "cnt"],
                vec![json!(["VIEW", 300]), json!(["BOUGHT", 50])],
            ),
        );
        entries.insert(
            NODE_PROPERTY_SAMPLE.to_string(),
            records(
                &["labels", "props"],
                vec![
                    json!([["User"], ["userId", "name", "age"]]),
                    json!([["Item"], ["itemId", "name", "price"]]),
                ],
            ),
        );
        entries.insert(
            USER_SAMPLE.to_string(),
            records(
                &["u"],
                (0..5)
                    .map(|i| {
                        json!([node(i, "User", json!({"userId": format!("user-{i}"), "name": format!("User {i}")}))])
                    })
                    .collect(),
            ),
        );
        entries.insert(
            ITEM_SAMPLE.to_string(),
            records(
                &["i"],
                (0..5)
                    .map(|i| {
                        json!([node(
                            i + 100,
                            "Item",
                            json!({"itemId": format!("item-{i}"), "name": format!("Item {i}"), "price": 100 + i})
                        )])
                    })
                    .collect(),
            ),
        );
        entries.insert(
            PRODUCT_SAMPLE.to_string(),
            records(
                &["p"],
                (0..5)
                    .map(|i| {
                        json!([node(
                            i + 200,
                            "Product",
                            json!({"productId": format!("prod-{i}"), "name": format!("Product {i}")})
                        )])
                    })
                    .collect(),
            ),
        );
        entries.insert(
            USER_ITEM_VIEW.to_string(),
            records(
                &["userId", "itemId"],
                (0..10)
                    .map(|i| json!([format!("user-{}", i % 3), format!("item-{i}")]))
                    .collect(),
            ),
        );
        entries.insert(
            PATH_SAMPLE.to_string(),
            records(&["hops"], vec![json!([1]), json!([2]), json!([1])]),
        );
        Self { entries }
    }

    /// Resolve a query. Deterministic and pure.
    pub fn lookup(&self, query: &str) -> Option<MockEntry> {
        let normalized = normalize_query(query);
        if normalized.is_empty() {
            return None;
        }

        if let Some(payload) = self.entries.get(&normalized) {
            return Some(MockEntry {
                key: normalized,
                rule: MatchRule::Exact,
                payload: payload.clone(),
            });
        }

        for heuristic in HEURISTICS {
            if (heuristic.matches)(&normalized) {
                if let Some(payload) = self.entries.get(heuristic.target) {
                    return Some(MockEntry {
                        key: heuristic.target.to_string(),
                        rule: MatchRule::Heuristic(heuristic.name),
                        payload: payload.clone(),
                    });
                }
            }
        }

        if normalized.to_lowercase().contains("return n") {
            return Some(MockEntry {
                key: GENERIC_KEY.to_string(),
                rule: MatchRule::Generic,
                payload: records(
                    &["n"],
                    vec![json!([node(
                        999,
                        "MockNode",
                        json!({"message": "This is a mock node because the backend returned empty results."})
                    )])],
                ),
            });
        }

        None
    }

    /// Canonical queries in the table, sorted.
    pub fn canonical_queries(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

fn records(keys: &[&str], fields: Vec<Value>) -> Value {
    let records: Vec<Value> = fields
        .into_iter()
        .map(|f| json!({"keys": keys, "_fields": f}))
        .collect();
    json!({ "records": records })
}

fn node(identity: u64, label: &str, properties: Value) -> Value {
    json!({"identity": identity, "labels": [label], "properties": properties})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query_collapses_whitespace() {
        assert_eq!(
            normalize_query("  MATCH (u:User)\n\t RETURN u   LIMIT 20 "),
            "MATCH (u:User) RETURN u LIMIT 20"
        );
    }

    #[test]
    fn test_exact_match_after_normalization() {
        let catalog = MockCatalog::builtin();
        let entry = catalog
            .lookup("MATCH ()-[r]->()\n  RETURN type(r) AS relType, count(*) AS cnt ORDER BY cnt DESC LIMIT 20")
            .unwrap();
        assert_eq!(entry.rule, MatchRule::Exact);
        let rows = entry.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["relType"], "VIEW");
        assert_eq!(rows[0]["cnt"], 300);
    }

    #[test]
    fn test_return_one_heuristic() {
        let entry = MockCatalog::builtin().lookup("RETURN 1 AS one").unwrap();
        assert_eq!(entry.rule, MatchRule::Heuristic("return-one"));
        assert_eq!(entry.key, RETURN_ONE);
        assert_eq!(entry.rows()[0]["one"], 1);
    }

    #[test]
    fn test_label_heuristics() {
        let catalog = MockCatalog::builtin();
        let user = catalog.lookup("MATCH (u:User) WHERE u.age > 3 RETURN u").unwrap();
        assert_eq!(user.key, USER_SAMPLE);
        assert_eq!(user.rows().len(), 5);

        let item = catalog.lookup("MATCH (i:Item) RETURN i.name").unwrap();
        assert_eq!(item.key, ITEM_SAMPLE);

        let product = catalog.lookup("MATCH (p:Product) RETURN p").unwrap();
        assert_eq!(product.key, PRODUCT_SAMPLE);
    }

    #[test]
    fn test_heuristics_are_ordered() {
        // Matches both return-one and count-star; the earlier rule wins.
        let entry = MockCatalog::builtin()
            .lookup("MATCH (n) WITH count(*) AS c RETURN 1")
            .unwrap();
        assert_eq!(entry.rule, MatchRule::Heuristic("return-one"));
    }

    #[test]
    fn test_count_star_is_case_insensitive() {
        let entry = MockCatalog::builtin()
            .lookup("match (m:Movie) return COUNT(*) as total")
            .unwrap();
        assert_eq!(entry.rule, MatchRule::Heuristic("count-star"));
        assert_eq!(entry.key, NODES_BY_LABEL);
    }

    #[test]
    fn test_generic_placeholder() {
        let entry = MockCatalog::builtin()
            .lookup("MATCH (n:Movie) return n LIMIT 5")
            .unwrap();
        assert_eq!(entry.rule, MatchRule::Generic);
        assert_eq!(entry.key, GENERIC_KEY);
        let rows = entry.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["n"]["labels"][0], "MockNode");
    }

    #[test]
    fn test_no_match() {
        let catalog = MockCatalog::builtin();
        assert!(catalog.lookup("MATCH (m:Movie) RETURN m.title").is_none());
        assert!(catalog.lookup("   ").is_none());
    }

    #[test]
    fn test_every_canonical_query_resolves_exactly() {
        let catalog = MockCatalog::builtin();
        assert_eq!(catalog.canonical_queries().len(), 9);
        for query in catalog.canonical_queries() {
            let entry = catalog.lookup(query).unwrap();
            assert_eq!(entry.rule, MatchRule::Exact, "{query}");
            assert!(!entry.rows().is_empty(), "{query}");
        }
    }
}
