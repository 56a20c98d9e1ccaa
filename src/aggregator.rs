//! @ai:module:intent Build namespaced entity records from the doc comment event stream
//! @ai:module:layer application
//! @ai:module:public_api Aggregator, aggregate, aggregate_with
//! @ai:module:depends_on event, grammar, record, scanner
//! @ai:module:stateless false

use crate::event::{Event, EventSink, Tag};
use crate::grammar::{parse_param, parse_return};
use crate::record::{Catalog, Layout, Record};
use crate::scanner::Scanner;

/// @ai:intent Running state of one aggregation pass
/// @ai:invariant namespace persists across comments until a later `namespace` tag replaces it
#[derive(Debug)]
pub struct Aggregator {
    namespace: String,
    current: Option<Record>,
    catalog: Catalog,
    committed: usize,
    discarded: usize,
}

impl Aggregator {
    pub fn new(layout: Layout) -> Self {
        Self {
            namespace: String::new(),
            current: None,
            catalog: Catalog::empty(layout),
            committed: 0,
            discarded: 0,
        }
    }

    /// The namespace applied to the next committed record.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn committed(&self) -> usize {
        self.committed
    }

    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// @ai:intent Apply one event to the running state
    /// @ai:context events for record fields outside an open comment are ignored
    /// @ai:effects state:write
    pub fn handle(&mut self, event: &Event) {
        let value = event.value.as_str();

        match &event.tag {
            Tag::Open => self.current = Some(Record::new()),
            Tag::Close => self.commit(),
            Tag::Namespace => {
                tracing::debug!(namespace = value, "namespace changed");
                self.namespace = value.to_string();
            }
            tag => {
                let Some(record) = self.current.as_mut() else {
                    tracing::debug!(tag = %tag, "tag outside of a doc comment");
                    return;
                };
                apply_tag(record, tag, value);
            }
        }
    }

    /// @ai:intent Resolve the qualified name of the in-progress record and store it
    /// @ai:post nameless records are dropped without error
    /// @ai:effects state:write
    fn commit(&mut self) {
        let Some(mut record) = self.current.take() else {
            return;
        };

        if !record.is_named() {
            self.discarded += 1;
            tracing::debug!("discarding doc comment without a name");
            return;
        }

        let name = record.name.take().unwrap_or_default();
        let full_path = format!("{}.{}", self.namespace, name);
        let mut path: Vec<&str> = full_path
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();

        let Some(leaf) = path.pop() else {
            self.discarded += 1;
            tracing::debug!(name = %name, "discarding doc comment with an empty qualified name");
            return;
        };

        record.name = Some(leaf.to_string());
        record.namespace = path.join(".");
        self.committed += 1;

        match &mut self.catalog {
            Catalog::Tree(root) => root.descend_mut(&path).insert(leaf.to_string(), record),
            Catalog::Flat(records) => records.push(record),
        }
    }

    /// @ai:intent Produce the catalog, sorting the flat layout by qualified name
    /// @ai:effects pure
    pub fn finish(self) -> Catalog {
        tracing::debug!(
            committed = self.committed,
            discarded = self.discarded,
            "aggregation finished"
        );

        match self.catalog {
            Catalog::Flat(mut records) => {
                records.sort_by_cached_key(Record::sort_key);
                Catalog::Flat(records)
            }
            tree => tree,
        }
    }
}

impl EventSink for Aggregator {
    fn accept(&mut self, event: &Event) {
        self.handle(event);
    }
}

/// @ai:intent Fold a record-level tag into the in-progress record
/// @ai:effects state:write
fn apply_tag(record: &mut Record, tag: &Tag, value: &str) {
    match tag {
        Tag::Name => record.name = Some(value.to_string()),
        Tag::Function => {
            record.function = true;
            record.name = Some(value.to_string());
        }
        Tag::Class => {
            record.class = true;
            record.name = Some(value.to_string());
        }
        Tag::Object => {
            record.object = true;
            record.name = Some(value.to_string());
        }
        Tag::Field => {
            record.field = true;
            record.name = Some(value.to_string());
        }
        Tag::Description => record.description = value.to_string(),
        Tag::Param => record.param.push(parse_param(value)),
        Tag::Return => record.returns = Some(parse_return(value)),
        Tag::Private => record.private = true,
        Tag::Deprecated => record.deprecated = true,
        Tag::Custom(name) => {
            if !name.is_empty() && !value.is_empty() {
                record
                    .tags
                    .entry(name.clone())
                    .or_default()
                    .push(value.to_string());
            }
        }
        // handled by the aggregator itself
        Tag::Open | Tag::Close | Tag::Namespace => {}
    }
}

/// @ai:intent Scan source text with the default scanner and aggregate it
/// @ai:example ("/** @name foo */", Tree) -> root entry `foo`
/// @ai:effects pure
pub fn aggregate(source: &str, layout: Layout) -> Catalog {
    aggregate_with(source, &Scanner::default(), layout)
}

/// @ai:intent Scan source text with a configured scanner and aggregate it
/// @ai:effects pure
pub fn aggregate_with(source: &str, scanner: &Scanner, layout: Layout) -> Catalog {
    let mut aggregator = Aggregator::new(layout);
    scanner.scan(source, &mut aggregator);
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Entry, Namespace};
    use pretty_assertions::assert_eq;

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
    fn test_no_comments_empty_catalog() {
        assert!(aggregate("function f() { return 1; }", Layout::Tree).is_empty());
        assert!(aggregate("", Layout::Flat).is_empty());
    }

    #[test]
    fn test_single_name_at_root() {
        let root = tree("/** @name foo */");
        let Some(Entry::Single(record)) = root.entries.get("foo") else {
            panic!("foo missing: {root:?}");
        };

        assert_eq!(record.name.as_deref(), Some("foo"));
        assert_eq!(record.namespace, "");
        assert_eq!(record.description, "");
        assert!(record.param.is_empty());
        assert!(root.namespaces.is_empty());
    }

    #[test]
    fn test_namespace_persists_across_comments() {
        let root = tree("/**\n * @namespace a.b\n */\n/**\n * @function f\n */");
        let entry = root.entry("a.b.f").expect("f under a.b");
        let record = &entry.records()[0];

        assert!(record.function);
        assert_eq!(record.namespace, "a.b");
        assert_eq!(root.entries.len(), 0);
    }

    #[test]
    fn test_namespace_persists_until_changed() {
        let source = "/** @namespace a */ /** @name x */ /** @namespace b */ /** @name y */ /** @name z */";
        let root = tree(source);

        assert!(root.entry("a.x").is_some());
        assert!(root.entry("b.y").is_some());
        assert!(root.entry("b.z").is_some());
    }

    #[test]
    fn test_overloads_keep_source_order() {
        let source = "/** First. @function f @param a */\n/** Second. @function f @param b */\n/** Third. @function f */";
        let root = tree(source);

        let Some(Entry::Overloads(records)) = root.entries.get("f") else {
            panic!("expected overload group");
        };
        let descriptions: Vec<_> = records.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descriptions, vec!["First.", "Second.", "Third."]);
    }

    #[test]
    fn test_unnamed_comment_is_dropped() {
        let mut aggregator = Aggregator::new(Layout::Tree);
        Scanner::default().scan("/** @private */ /** @name kept */", &mut aggregator);

        assert_eq!(aggregator.discarded(), 1);
        assert_eq!(aggregator.committed(), 1);
        assert_eq!(aggregator.finish().len(), 1);
    }

    #[test]
    fn test_dotted_name_extends_namespace() {
        let root = tree("/** @namespace app */ /** @class models.User */");
        let record = &root.entry("app.models.User").unwrap().records()[0];

        assert_eq!(record.name.as_deref(), Some("User"));
        assert_eq!(record.namespace, "app.models");
        assert!(record.class);
    }

    #[test]
    fn test_flags_and_custom_tags() {
        let source = "/**\n * Old helper.\n * @function helper\n * @private\n * @deprecated\n * @since 1.0\n * @see a\n * @see b\n * @todo\n * @return {string} the label\n */";
        let root = tree(source);
        let record = &root.entry("helper").unwrap().records()[0];

        assert!(record.private);
        assert!(record.deprecated);
        assert_eq!(record.description, "Old helper.");
        assert_eq!(record.tag_values("since"), ["1.0".to_string()]);
        assert_eq!(record.tag_values("see"), ["a".to_string(), "b".to_string()]);
        assert!(record.tag_values("todo").is_empty());

        let returns = record.returns.as_ref().unwrap();
        assert_eq!(returns.type_name.as_deref(), Some("string"));
        assert_eq!(returns.description.as_deref(), Some("the label"));
    }

    #[test]
    fn test_kind_flags_accumulate_last_name_wins() {
        let root = tree("/** @class Widget @object widget */");
        let record = &root.entry("widget").unwrap().records()[0];

        assert!(record.class);
        assert!(record.object);
        assert!(root.entry("Widget").is_none());
    }

    #[test]
    fn test_params_in_order() {
        let root = tree("/** @function f @param {number} a @param [b=2] second */");
        let params = &root.entry("f").unwrap().records()[0].param;

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name.as_deref(), Some("a"));
        assert_eq!(params[0].type_name.as_deref(), Some("number"));
        assert_eq!(params[1].default_value.as_deref(), Some("2"));
        assert_eq!(params[1].description.as_deref(), Some("second"));
    }

    #[test]
    fn test_flat_sorted_case_insensitively() {
        let source = "/** @name beta */ /** @namespace Zed */ /** @name alpha */ /** @namespace */ /** @name Alpha */ /** @namespace a */ /** @name Gamma */";
        let names: Vec<_> = flat(source)
            .iter()
            .map(|r| r.qualified_name().unwrap())
            .collect();

        assert_eq!(names, vec!["Alpha", "beta", "a.Gamma", "Zed.alpha"]);
    }

    #[test]
    fn test_flat_keeps_overloads_as_separate_records() {
        let records = flat("/** @function f */ /** @function f */");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.name.as_deref() == Some("f")));
    }

    #[test]
    fn test_tree_json_nests_namespaces_by_segment() {
        let json = serde_json::to_value(aggregate(
            "/** @namespace a.b */ /** @function f */",
            Layout::Tree,
        ))
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "a": { "b": { "f": { "name": "f", "namespace": "a.b", "function": true, "description": "" } } }
            })
        );
    }

    #[test]
    fn test_class_later_used_as_namespace() {
        let source = "/** @class Foo */ /** @namespace Foo */ /** @function bar */";
        let root = tree(source);
        assert!(root.entry("Foo").is_some());
        assert!(root.entry("Foo.bar").is_some());

        let json = serde_json::to_value(Catalog::Tree(root)).unwrap();
        assert_eq!(json["Foo"]["class"], true);
        assert_eq!(json["Foo"]["bar"]["namespace"], "Foo");
        assert_eq!(json["Foo"]["bar"]["function"], true);
    }

    #[test]
    fn test_events_outside_comment_are_ignored() {
        let mut aggregator = Aggregator::new(Layout::Tree);
        aggregator.handle(&Event::new(Tag::Name, "stray"));
        aggregator.handle(&Event::new(Tag::Namespace, "ns"));

        assert_eq!(aggregator.namespace(), "ns");
        assert!(aggregator.finish().is_empty());
    }
}
