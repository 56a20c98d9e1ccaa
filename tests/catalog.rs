use emmett::{aggregate, aggregate_with, Catalog, Entry, Layout, Namespace, Record, Scanner, ScannerConfig};
use pretty_assertions::assert_eq;

const FIXTURE: &str = include_str!("fixtures/geometry.js");

fn tree(source: &str) -> Namespace {
    match aggregate(source, Layout::Tree) {
        Catalog::Tree(root) => root,
        Catalog::Flat(_) => panic!("expected tree layout"),
    }
}

fn flat(source: &str) -> Vec<Record> {
    match aggregate(source, Layout::Flat) {
        Catalog::Flat(records) => records,
        Catalog::Tree(_) => panic!("expected flat layout"),
    }
}

#[test]
fn test_fixture_tree() {
    let root = tree(FIXTURE);

    // the string literal never opens a doc comment
    assert!(root.entry("Banner").is_none());
    assert!(root.entries.is_empty());

    let geo = root.namespace("geo").expect("geo namespace");
    assert_eq!(
        geo.entries.keys().cloned().collect::<Vec<_>>(),
        vec!["Point", "dist", "distance"]
    );

    let Some(Entry::Single(point)) = geo.entries.get("Point") else {
        panic!("Point should be a single entry");
    };
    assert!(point.class);
    assert_eq!(point.description, "A point in the plane.");
    assert_eq!(point.param.len(), 2);
    assert_eq!(point.param[1].default_value.as_deref(), Some("0"));
    assert!(point.param[1].optional);
    assert_eq!(point.tag_values("since"), ["0.1".to_string()]);

    let Some(Entry::Overloads(distance)) = geo.entries.get("distance") else {
        panic!("distance should be overloaded");
    };
    assert_eq!(distance.len(), 2);
    assert_eq!(distance[0].param.len(), 2);
    assert_eq!(distance[1].description, "Distance from the origin.");
    assert_eq!(
        distance[0].returns.as_ref().and_then(|r| r.description.as_deref()),
        Some("euclidean distance")
    );

    let dist = &geo.entries["dist"].records()[0];
    assert!(dist.deprecated);
    assert!(dist.function);
}

#[test]
fn test_fixture_flat_is_sorted() {
    let names: Vec<_> = flat(FIXTURE)
        .iter()
        .map(|r| r.qualified_name().unwrap())
        .collect();

    assert_eq!(
        names,
        vec!["geo.dist", "geo.distance", "geo.distance", "geo.Point"]
    );
}

#[test]
fn test_private_without_name_is_absent() {
    let root = tree("/** Internal. @private */");
    assert!(root.is_empty());
}

#[test]
fn test_tree_json_matches_interchange_shape() {
    let catalog = aggregate(
        "/** @namespace a.b */ /** Hi. @function f @param y */",
        Layout::Tree,
    );

    assert_eq!(
        serde_json::to_value(&catalog).unwrap(),
        serde_json::json!({
            "a": {
                "b": {
                    "f": {
                        "name": "f",
                        "namespace": "a.b",
                        "function": true,
                        "description": "Hi.",
                        "param": [{ "optional": false, "name": "y" }]
                    }
                }
            }
        })
    );
}

#[test]
fn test_custom_marker_end_to_end() {
    let scanner = Scanner::new(ScannerConfig { tag_marker: '%' });
    let catalog = aggregate_with("/** email me@host %function mail */", &scanner, Layout::Flat);

    let Catalog::Flat(records) = catalog else {
        panic!("expected flat layout");
    };
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].description, "email me@host");
}
