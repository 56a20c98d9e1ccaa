//! @ai:module:intent Define data structures for documented entities and the catalogs that hold them
//! @ai:module:layer domain
//! @ai:module:public_api Record, Param, Return, Entry, Namespace, Catalog, Layout
//! @ai:module:stateless true

use serde::ser::{Error as _, SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap, BTreeSet};

fn is_false(value: &bool) -> bool {
    !*value
}

/// @ai:intent Parsed value of a `param` tag
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// @ai:intent Parsed value of a `return` tag
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Return {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// @ai:intent Structured representation of one doc comment
/// @ai:invariant a committed record always has a name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub function: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub class: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub object: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub field: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub param: Vec<Param>,
    #[serde(rename = "return", default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<Return>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub private: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// Values of every tag without a dedicated field, in source order
    #[serde(flatten)]
    pub tags: BTreeMap<String, Vec<String>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Check whether the record carries a usable name
    pub fn is_named(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// @ai:intent Get the dotted, namespace-qualified name
    /// @ai:example (namespace "a.b", name "f") -> Some("a.b.f")
    /// @ai:example (namespace "", name "f") -> Some("f")
    /// @ai:effects pure
    pub fn qualified_name(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        if self.namespace.is_empty() {
            Some(name.to_string())
        } else {
            Some(format!("{}.{}", self.namespace, name))
        }
    }

    /// @ai:intent Key used to order the flat catalog
    /// @ai:post always `namespace + "." + name`, lowercased, even for the root namespace
    /// @ai:effects pure
    pub fn sort_key(&self) -> String {
        format!(
            "{}.{}",
            self.namespace,
            self.name.as_deref().unwrap_or_default()
        )
        .to_lowercase()
    }

    /// @ai:intent Get all values recorded for a custom tag
    pub fn tag_values(&self, tag: &str) -> &[String] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Kind flags that are set, in declaration order.
    pub fn kinds(&self) -> Vec<&'static str> {
        [
            ("function", self.function),
            ("class", self.class),
            ("object", self.object),
            ("field", self.field),
        ]
        .into_iter()
        .filter_map(|(kind, set)| set.then_some(kind))
        .collect()
    }
}

/// @ai:intent A committed slot: one record, or every overload sharing a qualified name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Entry {
    Single(Record),
    Overloads(Vec<Record>),
}

impl Entry {
    /// @ai:intent Add a record under the same qualified name
    /// @ai:post Single becomes [existing, record]; Overloads gets record appended
    /// @ai:effects state:write
    pub fn push(&mut self, record: Record) {
        let previous = std::mem::replace(self, Entry::Overloads(Vec::new()));
        *self = match previous {
            Entry::Single(existing) => Entry::Overloads(vec![existing, record]),
            Entry::Overloads(mut records) => {
                records.push(record);
                Entry::Overloads(records)
            }
        };
    }

    pub fn records(&self) -> &[Record] {
        match self {
            Entry::Single(record) => std::slice::from_ref(record),
            Entry::Overloads(records) => records,
        }
    }

    pub fn is_overloaded(&self) -> bool {
        matches!(self, Entry::Overloads(_))
    }
}

/// @ai:intent Namespace container of the tree catalog
/// @ai:context child namespaces and entries are kept apart so one name can be both
/// @ai:context serializes as one object keyed by segment and leaf name, see `Serialize` impl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    pub namespaces: BTreeMap<String, Namespace>,
    pub entries: BTreeMap<String, Entry>,
}

impl Namespace {
    /// @ai:intent Walk down a namespace path, creating missing containers
    /// @ai:effects state:write
    pub fn descend_mut<S: AsRef<str>>(&mut self, path: &[S]) -> &mut Namespace {
        let mut current = self;
        for segment in path {
            current = current
                .namespaces
                .entry(segment.as_ref().to_string())
                .or_default();
        }
        current
    }

    /// @ai:intent Commit a record under a leaf name, merging overloads
    /// @ai:effects state:write
    pub fn insert(&mut self, leaf: String, record: Record) {
        match self.entries.entry(leaf) {
            btree_map::Entry::Occupied(mut slot) => slot.get_mut().push(record),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(Entry::Single(record));
            }
        }
    }

    /// @ai:intent Look up a nested namespace by dotted path
    /// @ai:example ("") -> Some(self)
    /// @ai:effects pure
    pub fn namespace(&self, path: &str) -> Option<&Namespace> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |current, segment| current.namespaces.get(segment))
    }

    /// @ai:intent Look up an entry by its qualified name
    /// @ai:example ("a.b.f") -> entry `f` inside namespace `a.b`
    /// @ai:effects pure
    pub fn entry(&self, qualified: &str) -> Option<&Entry> {
        let (path, leaf) = match qualified.rsplit_once('.') {
            Some((path, leaf)) => (path, leaf),
            None => ("", qualified),
        };
        self.namespace(path)?.entries.get(leaf)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.namespaces.values().all(Namespace::is_empty)
    }

    /// @ai:intent Collect every record, depth-first, entries before child namespaces
    /// @ai:effects pure
    pub fn records(&self) -> Vec<&Record> {
        let mut out: Vec<&Record> = self
            .entries
            .values()
            .flat_map(|entry| entry.records())
            .collect();
        for child in self.namespaces.values() {
            out.extend(child.records());
        }
        out
    }
}

/// Child namespaces and entries are written side by side: `{"a":{"b":{"f":{..}}}}`.
/// A key that is both a single entry and a namespace becomes the record object
/// with the namespace members merged in, record fields first. An overload group
/// stays an array, so members sharing its name are not written.
impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let keys: BTreeSet<&String> = self.namespaces.keys().chain(self.entries.keys()).collect();
        let mut map = serializer.serialize_map(Some(keys.len()))?;

        for key in keys {
            match (self.entries.get(key), self.namespaces.get(key)) {
                (Some(Entry::Single(record)), Some(members)) => {
                    map.serialize_entry(key, &RecordWithMembers { record, members })?
                }
                (Some(entry), _) => map.serialize_entry(key, entry)?,
                (None, Some(members)) => map.serialize_entry(key, members)?,
                (None, None) => {}
            }
        }

        map.end()
    }
}

struct RecordWithMembers<'a> {
    record: &'a Record,
    members: &'a Namespace,
}

impl Serialize for RecordWithMembers<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let serde_json::Value::Object(mut object) =
            serde_json::to_value(self.record).map_err(S::Error::custom)?
        else {
            return Err(S::Error::custom("record did not serialize to an object"));
        };

        if let serde_json::Value::Object(members) =
            serde_json::to_value(self.members).map_err(S::Error::custom)?
        {
            for (key, value) in members {
                object.entry(key).or_insert(value);
            }
        }

        object.serialize(serializer)
    }
}

/// @ai:intent Shape of the aggregation result
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Namespace-nested tree with overload groups
    #[default]
    Tree,
    /// Flat list sorted case-insensitively by qualified name
    Flat,
}

/// @ai:intent Result of aggregating one source buffer
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Catalog {
    Tree(Namespace),
    Flat(Vec<Record>),
}

impl Catalog {
    pub fn empty(layout: Layout) -> Self {
        match layout {
            Layout::Tree => Catalog::Tree(Namespace::default()),
            Layout::Flat => Catalog::Flat(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<&Record> {
        match self {
            Catalog::Tree(root) => root.records(),
            Catalog::Flat(records) => records.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Catalog::Tree(root) => root.is_empty(),
            Catalog::Flat(records) => records.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Record {
        Record {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_entry_push_converts_single_to_overloads() {
        let mut entry = Entry::Single(named("a"));
        entry.push(named("b"));
        assert!(entry.is_overloaded());
        entry.push(named("c"));

        let names: Vec<_> = entry
            .records()
            .iter()
            .map(|r| r.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_namespace_lookup() {
        let mut root = Namespace::default();
        root.descend_mut(&["a", "b"]).insert("f".to_string(), named("f"));

        assert!(root.entry("a.b.f").is_some());
        assert!(root.entry("a.f").is_none());
        assert!(root.namespace("a").is_some());
        assert!(!root.is_empty());
        assert_eq!(root.records().len(), 1);
    }

    #[test]
    fn test_namespace_serializes_as_nested_objects() {
        let mut root = Namespace::default();
        root.descend_mut(&["a", "b"]).insert("f".to_string(), named("f"));
        root.insert("g".to_string(), named("g"));

        assert_eq!(
            serde_json::to_value(&root).unwrap(),
            serde_json::json!({
                "a": { "b": { "f": { "name": "f", "namespace": "", "description": "" } } },
                "g": { "name": "g", "namespace": "", "description": "" }
            })
        );
    }

    #[test]
    fn test_entry_and_namespace_with_same_name_merge() {
        let mut root = Namespace::default();
        let mut class = named("Foo");
        class.class = true;
        root.insert("Foo".to_string(), class);
        root.descend_mut(&["Foo"]).insert("bar".to_string(), named("bar"));
        root.descend_mut(&["Foo"]).insert("name".to_string(), named("clash"));

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["Foo"]["class"], true);
        assert_eq!(json["Foo"]["name"], "Foo");
        assert_eq!(json["Foo"]["bar"]["name"], "bar");
        assert_eq!(json.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_overload_group_shadows_namespace_members() {
        let mut root = Namespace::default();
        root.insert("f".to_string(), named("f"));
        root.insert("f".to_string(), named("f"));
        root.descend_mut(&["f"]).insert("inner".to_string(), named("inner"));

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["f"].as_array().unwrap().len(), 2);
        assert!(root.entry("f.inner").is_some());
    }

    #[test]
    fn test_empty_namespace_serializes_as_empty_object() {
        assert_eq!(
            serde_json::to_value(Catalog::empty(Layout::Tree)).unwrap(),
            serde_json::json!({})
        );
        assert_eq!(
            serde_json::to_value(Catalog::empty(Layout::Flat)).unwrap(),
            serde_json::json!([])
        );
    }

    #[test]
    fn test_sort_key_includes_root_separator() {
        let record = named("Foo");
        assert_eq!(record.sort_key(), ".foo");
        assert_eq!(record.qualified_name(), Some("Foo".to_string()));
    }

    #[test]
    fn test_record_serializes_compactly() {
        let mut record = named("f");
        record.function = true;
        record
            .tags
            .insert("since".to_string(), vec!["1.0".to_string()]);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "f",
                "namespace": "",
                "function": true,
                "description": "",
                "since": ["1.0"]
            })
        );
    }

    #[test]
    fn test_kinds_lists_set_flags() {
        let mut record = named("x");
        record.class = true;
        record.field = true;
        assert_eq!(record.kinds(), vec!["class", "field"]);
    }
}
