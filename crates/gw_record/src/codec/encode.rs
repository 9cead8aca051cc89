use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::codec::error::EncodeError;
use crate::codec::tracker::{ReferenceTracker, TrackerStats, Visit};
use crate::record::{Handle, Link, Record, Value};

// -----------------------------------------------------------------------------
// Serializer

/// Encodes record graphs into JSON documents.
///
/// Every composite value is expanded exactly once per pass: the first visit
/// assigns a `$id` and emits fields in schema order, every repeat visit —
/// whether a diamond or a genuine cycle — emits a `{"$ref": id}` marker.
/// That single rule is what bounds the output on cyclic graphs.
///
/// The input graph is never mutated; the only side effect of a pass is the
/// [`stats`](Serializer::stats) snapshot it leaves behind.
///
/// # Examples
///
/// ```
/// use gw_record::{Link, Serializer, derive::Record};
///
/// #[derive(Record, Default)]
/// struct Task {
///     #[record(alias = "title")]
///     name: String,
///     #[record(order = 1)]
///     blocked_on: Option<Link<Task>>,
/// }
///
/// let base = Link::new(Task { name: "dig".into(), blocked_on: None });
/// let next = Link::new(Task { name: "plant".into(), blocked_on: Some(base.clone()) });
///
/// let mut serializer = Serializer::new();
/// let text = serializer.serialize(&next).unwrap();
/// assert_eq!(
///     text,
///     r#"{"$id":1,"title":"plant","blocked_on":{"$id":2,"title":"dig","blocked_on":null}}"#
/// );
/// assert_eq!(serializer.stats().unique_ids, 2);
/// ```
#[derive(Debug, Default)]
pub struct Serializer {
    pretty: bool,
    strict_cycles: bool,
    stats: TrackerStats,
}

impl Serializer {
    /// Creates a serializer with default options: compact output, cycles
    /// compacted to reference markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets pretty-printed output (indentation and newlines only — the
    /// value model is unchanged).
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets strict cycle handling: encoding fails with
    /// [`EncodeError::CircularReference`] instead of compacting a cycle's
    /// back edge to a reference marker. Shared (diamond) references are
    /// still compacted.
    pub fn strict_cycles(mut self, strict: bool) -> Self {
        self.strict_cycles = strict;
        self
    }

    /// Encodes the graph rooted at `root`.
    pub fn serialize<T: Record>(&mut self, root: &Link<T>) -> Result<String, EncodeError> {
        self.serialize_handle(&root.handle())
    }

    /// Encodes the graph rooted at a type-erased `root`.
    pub fn serialize_handle(&mut self, root: &Handle) -> Result<String, EncodeError> {
        self.encode_document(root, None)
    }

    /// Encodes the graph with its type name embedded as a document-level
    /// `$type` field, so it can be decoded without a statically known
    /// target type.
    pub fn serialize_tagged(&mut self, root: &Handle) -> Result<String, EncodeError> {
        self.encode_document(root, Some(root.schema().name()))
    }

    /// Encodes the graph under the given registered type name.
    ///
    /// Fails with [`EncodeError::WrongType`] if `root` is not actually a
    /// record of that type; otherwise behaves like
    /// [`serialize_tagged`](Self::serialize_tagged).
    pub fn serialize_as(&mut self, name: &str, root: &Handle) -> Result<String, EncodeError> {
        let found = root.schema().name();
        if found != name {
            return Err(EncodeError::WrongType {
                expected: name.to_owned(),
                found,
            });
        }
        self.encode_document(root, Some(found))
    }

    /// Encodes a bare [`Value`] root — a primitive, list, map, or record.
    ///
    /// `Value::Null` encodes as the `null` literal.
    pub fn serialize_value(&mut self, root: &Value) -> Result<String, EncodeError> {
        let mut tracker = ReferenceTracker::new();
        let json = self.encode_value(&mut tracker, root)?;
        self.stats = tracker.stats();
        Ok(self.render(&json))
    }

    /// The tracker statistics of the most recent encode pass.
    #[inline]
    pub const fn stats(&self) -> TrackerStats {
        self.stats
    }

    fn encode_document(&mut self, root: &Handle, tag: Option<&str>) -> Result<String, EncodeError> {
        let mut tracker = ReferenceTracker::new();
        let json = self.encode_handle(&mut tracker, root, tag)?;
        self.stats = tracker.stats();
        Ok(self.render(&json))
    }

    fn render(&self, json: &JsonValue) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(json)
        } else {
            serde_json::to_string(json)
        };
        rendered.unwrap() // in-memory JSON values always render
    }

    fn encode_handle(
        &self,
        tracker: &mut ReferenceTracker,
        handle: &Handle,
        tag: Option<&str>,
    ) -> Result<JsonValue, EncodeError> {
        let id = match tracker.begin(handle) {
            Visit::Shared(id) => return Ok(reference_marker(id)),
            Visit::Cyclic(id) => {
                if self.strict_cycles {
                    return Err(EncodeError::CircularReference {
                        type_name: handle.schema().name(),
                    });
                }
                return Ok(reference_marker(id));
            }
            Visit::First(id) => id,
        };

        let record = handle.borrow();
        let schema = record.record_schema();

        let mut map = JsonMap::new();
        map.insert("$id".to_owned(), JsonValue::from(id));
        if let Some(tag) = tag {
            map.insert("$type".to_owned(), JsonValue::from(tag));
        }

        for field in schema.fields() {
            let value = record.get_at(field.index()).unwrap(); // accessors are generated with the schema
            if value.is_null() && !schema.include_nulls() {
                continue;
            }
            map.insert(field.key().to_owned(), self.encode_value(tracker, &value)?);
        }

        drop(record);
        tracker.finish(handle);
        Ok(JsonValue::Object(map))
    }

    fn encode_value(
        &self,
        tracker: &mut ReferenceTracker,
        value: &Value,
    ) -> Result<JsonValue, EncodeError> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::Bool(flag) => Ok(JsonValue::from(*flag)),
            Value::Int(int) => Ok(JsonValue::from(*int)),
            Value::UInt(uint) => Ok(JsonValue::from(*uint)),
            Value::Float(float) => Ok(match Number::from_f64(*float) {
                Some(number) => JsonValue::Number(number),
                None => {
                    log::warn!("non-finite number {float} has no JSON form; encoding null");
                    JsonValue::Null
                }
            }),
            Value::Str(text) => Ok(JsonValue::from(text.as_str())),
            Value::List(items) => items
                .iter()
                .map(|item| self.encode_value(tracker, item))
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            Value::Map(pairs) => {
                let mut map = JsonMap::new();
                for (key, inner) in pairs {
                    map.insert(key.clone(), self.encode_value(tracker, inner)?);
                }
                Ok(JsonValue::Object(map))
            }
            Value::Link(handle) => self.encode_handle(tracker, handle, None),
        }
    }
}

fn reference_marker(id: u64) -> JsonValue {
    let mut map = JsonMap::new();
    map.insert("$ref".to_owned(), JsonValue::from(id));
    JsonValue::Object(map)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Serializer;
    use crate::derive::Record;
    use crate::record::{Link, Value};

    #[derive(Record, Default)]
    struct Appliance {
        #[record(alias = "device_name", order = 1)]
        name: String,
        #[record(order = 2)]
        watts: u32,
        #[record(ignore)]
        serial: String,
    }

    #[derive(Record, Default)]
    #[record(include_nulls = false)]
    struct Sparse {
        label: String,
        note: Option<String>,
    }

    #[derive(Record, Default)]
    struct Node {
        label: String,
        next: Option<Link<Node>>,
        others: Vec<Link<Node>>,
    }

    #[test]
    fn fields_use_aliases_and_schema_order() {
        let appliance = Link::new(Appliance {
            name: "kettle".into(),
            watts: 1800,
            serial: "do not leak".into(),
        });
        let text = Serializer::new().serialize(&appliance).unwrap();
        assert_eq!(text, r#"{"$id":1,"device_name":"kettle","watts":1800}"#);
    }

    #[test]
    fn ignored_fields_never_appear() {
        let appliance = Link::new(Appliance {
            serial: "secret".into(),
            ..Default::default()
        });
        let text = Serializer::new().serialize(&appliance).unwrap();
        assert!(!text.contains("serial"));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn null_fields_are_omitted_on_request() {
        let sparse = Link::new(Sparse {
            label: "x".into(),
            note: None,
        });
        let text = Serializer::new().serialize(&sparse).unwrap();
        assert_eq!(text, r#"{"$id":1,"label":"x"}"#);

        // Default policy keeps nulls.
        let node = Link::new(Node::default());
        let text = Serializer::new().serialize(&node).unwrap();
        assert!(text.contains(r#""next":null"#));
    }

    #[test]
    fn shared_references_compact_to_one_marker() {
        let leaf = Link::new(Node {
            label: "leaf".into(),
            ..Default::default()
        });
        let root = Link::new(Node {
            label: "root".into(),
            next: Some(leaf.clone()),
            others: vec![leaf.clone()],
        });

        let mut serializer = Serializer::new();
        let text = serializer.serialize(&root).unwrap();

        assert_eq!(text.matches(r#""$ref":2"#).count(), 1);
        assert_eq!(text.matches(r#""label":"leaf""#).count(), 1);

        let stats = serializer.stats();
        assert_eq!(stats.unique_ids, 2);
        assert_eq!(stats.shared_count, 1);
        assert_eq!(stats.cyclic_count, 0);
    }

    #[test]
    fn cycles_terminate_with_a_single_back_edge() {
        let a = Link::new(Node {
            label: "a".into(),
            ..Default::default()
        });
        let b = Link::new(Node {
            label: "b".into(),
            next: Some(a.clone()),
            ..Default::default()
        });
        a.borrow_mut().next = Some(b.clone());

        let mut serializer = Serializer::new();
        let text = serializer.serialize(&a).unwrap();

        assert_eq!(text.matches("$ref").count(), 1);
        assert!(text.contains(r#""next":{"$ref":1}"#));
        assert_eq!(serializer.stats().cyclic_count, 1);
    }

    #[test]
    fn strict_mode_rejects_cycles_but_not_diamonds() {
        let a = Link::new(Node::default());
        a.borrow_mut().next = Some(a.clone());
        let err = Serializer::new()
            .strict_cycles(true)
            .serialize(&a)
            .unwrap_err();
        assert_eq!(
            err,
            crate::EncodeError::CircularReference { type_name: "Node" }
        );

        let leaf = Link::new(Node::default());
        let root = Link::new(Node {
            label: "root".into(),
            next: Some(leaf.clone()),
            others: vec![leaf.clone()],
        });
        assert!(
            Serializer::new()
                .strict_cycles(true)
                .serialize(&root)
                .is_ok()
        );
    }

    #[test]
    fn tagging_embeds_the_type_name() {
        let node = Link::new(Node::default());
        let mut serializer = Serializer::new();

        let text = serializer.serialize_tagged(&node.handle()).unwrap();
        assert!(text.starts_with(r#"{"$id":1,"$type":"Node""#));

        let err = serializer
            .serialize_as("Appliance", &node.handle())
            .unwrap_err();
        assert_eq!(
            err,
            crate::EncodeError::WrongType {
                expected: "Appliance".into(),
                found: "Node",
            }
        );
    }

    #[test]
    fn pretty_printing_is_presentation_only() {
        let node = Link::new(Node {
            label: "n".into(),
            ..Default::default()
        });
        let compact = Serializer::new().serialize(&node).unwrap();
        let pretty = Serializer::new().pretty(true).serialize(&node).unwrap();

        assert_ne!(compact, pretty);
        let a: serde_json::Value = serde_json::from_str(&compact).unwrap();
        let b: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bare_value_roots_encode_directly() {
        let mut serializer = Serializer::new();
        assert_eq!(serializer.serialize_value(&Value::Null).unwrap(), "null");
        assert_eq!(
            serializer
                .serialize_value(&Value::List(vec![Value::Int(1), Value::Bool(true)]))
                .unwrap(),
            "[1,true]"
        );
    }
}
