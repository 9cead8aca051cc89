use gw_utils::hash::{FixedHashState, HashMap};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::codec::error::{DecodeError, SchemaError};
use crate::record::{Handle, Link, Schematic, ShapeError, Value, ValueShape};
use crate::registry::SchemaRegistry;
use crate::schema::{FieldKind, FieldSchema, RecordSchema, ScalarKind};

// -----------------------------------------------------------------------------
// Entry points

/// Decodes a document into a graph of the statically known record type.
///
/// # Examples
///
/// ```
/// use gw_record::{Link, from_str, derive::Record};
///
/// #[derive(Record, Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let point: Link<Point> = from_str(r#"{"y": 2, "x": 1}"#).unwrap();
/// assert_eq!(point.borrow().x, 1);
/// ```
pub fn from_str<T: Schematic>(text: &str) -> Result<Link<T>, DecodeError> {
    let tree = parse_document(text)?;
    let handle = build_document(&tree, T::schema())?;
    Ok(handle.downcast::<T>().unwrap()) // instance comes from T's own constructor
}

// -----------------------------------------------------------------------------
// Deserializer

/// Decodes JSON documents back into record graphs.
///
/// Construction order per object node: allocate an empty instance, register
/// its `$id` in the pass-scoped reference table *before* populating fields
/// (which is what makes cyclic back edges resolvable), then decode and
/// assign each field present in both schema and document. A `$ref` whose
/// target id is not registered yet defers its whole field to a back-patch
/// queue, drained once the tree is fully built; ids that never materialize
/// fail with [`DecodeError::DanglingReference`].
///
/// Field matching is by document key — reordering keys never changes the
/// result. Unknown keys (including keys of ignored fields) are dropped.
///
/// The registry is only consulted to resolve type *names*; statically typed
/// decoding works with an empty registry.
///
/// # Examples
///
/// ```
/// use gw_record::{Deserializer, Link, Serializer, registry::SchemaRegistry, derive::Record};
///
/// #[derive(Record, Default)]
/// struct Sensor {
///     #[record(required)]
///     channel: u16,
/// }
///
/// let mut registry = SchemaRegistry::new();
/// registry.register::<Sensor>();
///
/// let text = Serializer::new()
///     .serialize_tagged(&Link::new(Sensor { channel: 7 }).handle())
///     .unwrap();
///
/// let decoded = Deserializer::new(&registry).deserialize_tagged(&text).unwrap();
/// let sensor = decoded.downcast::<Sensor>().unwrap();
/// assert_eq!(sensor.borrow().channel, 7);
/// ```
pub struct Deserializer<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Deserializer<'a> {
    /// Creates a deserializer resolving type names against `registry`.
    #[inline]
    pub const fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Decodes a document into the statically known record type.
    #[inline]
    pub fn deserialize<T: Schematic>(&self, text: &str) -> Result<Link<T>, DecodeError> {
        from_str(text)
    }

    /// Decodes a document against an explicit schema.
    pub fn deserialize_with(
        &self,
        text: &str,
        schema: &'static RecordSchema,
    ) -> Result<Handle, DecodeError> {
        let tree = parse_document(text)?;
        build_document(&tree, schema)
    }

    /// Decodes a document as the registered type named `name`.
    ///
    /// Fails with [`DecodeError::UnknownType`] for unregistered names and
    /// with [`SchemaError::AmbiguousTypeName`] for names claimed by more
    /// than one type.
    pub fn deserialize_by_name(&self, text: &str, name: &str) -> Result<Handle, DecodeError> {
        let schema = self.resolve_name(name)?;
        self.deserialize_with(text, schema)
    }

    /// Decodes a document carrying its own `$type` tag.
    ///
    /// Fails with [`SchemaError::MissingTypeTag`] when the document-level
    /// tag is absent.
    pub fn deserialize_tagged(&self, text: &str) -> Result<Handle, DecodeError> {
        let tree = parse_document(text)?;
        let name = tree
            .as_object()
            .and_then(|obj| obj.get("$type"))
            .and_then(JsonValue::as_str)
            .ok_or(SchemaError::MissingTypeTag)?;
        let schema = self.resolve_name(name)?;
        build_document(&tree, schema)
    }

    fn resolve_name(&self, name: &str) -> Result<&'static RecordSchema, DecodeError> {
        if self.registry.is_ambiguous(name) {
            return Err(SchemaError::AmbiguousTypeName {
                name: name.to_owned(),
            }
            .into());
        }
        self.registry
            .get_by_name(name)
            .ok_or_else(|| DecodeError::UnknownType {
                name: name.to_owned(),
            })
    }
}

// -----------------------------------------------------------------------------
// Parsing stage

fn parse_document(text: &str) -> Result<JsonValue, DecodeError> {
    serde_json::from_str(text).map_err(|err| DecodeError::Parse {
        line: err.line(),
        column: err.column(),
        reason: err.to_string(),
    })
}

fn build_document(tree: &JsonValue, schema: &'static RecordSchema) -> Result<Handle, DecodeError> {
    let mut builder = GraphBuilder::new();
    let handle = builder.build_root(tree, schema)?;
    builder.drain_patches()?;
    Ok(handle)
}

// -----------------------------------------------------------------------------
// GraphBuilder

/// A field assignment deferred until its `$ref` target exists.
struct Patch<'v> {
    handle: Handle,
    field: &'static FieldSchema,
    type_name: &'static str,
    node: &'v JsonValue,
}

/// Field-level outcome: either a hard failure, or "try again after the rest
/// of the tree is built".
enum BuildError {
    Unresolved(u64),
    Fatal(DecodeError),
}

impl From<DecodeError> for BuildError {
    #[inline]
    fn from(err: DecodeError) -> Self {
        BuildError::Fatal(err)
    }
}

struct GraphBuilder<'v> {
    /// The pass-scoped reference table: id → already-constructed instance.
    instances: HashMap<u64, Handle>,
    patches: Vec<Patch<'v>>,
}

impl<'v> GraphBuilder<'v> {
    fn new() -> Self {
        Self {
            instances: HashMap::with_hasher(FixedHashState),
            patches: Vec::new(),
        }
    }

    fn build_root(
        &mut self,
        node: &'v JsonValue,
        schema: &'static RecordSchema,
    ) -> Result<Handle, DecodeError> {
        let obj = node.as_object().ok_or_else(|| DecodeError::TypeMismatch {
            type_name: schema.name(),
            field: "$document",
            source: ShapeError::shape(ValueShape::Record, shape_of(node)),
        })?;

        if let Some(ref_node) = obj.get("$ref") {
            // Nothing can be registered before the root, so a root marker
            // can never resolve.
            let id = marker_id(ref_node, schema.name(), "$ref")?;
            return Err(DecodeError::DanglingReference { id });
        }

        self.build_record(obj, schema)
    }

    fn build_record(
        &mut self,
        obj: &'v JsonMap<String, JsonValue>,
        schema: &'static RecordSchema,
    ) -> Result<Handle, DecodeError> {
        let declared_id = match obj.get("$id") {
            Some(node) => Some(marker_id(node, schema.name(), "$id")?),
            None => None,
        };

        let handle = self.allocate(declared_id, schema);

        {
            let mut record = handle.borrow_mut();
            for field in schema.fields() {
                let Some(node) = obj.get(field.key()) else {
                    if field.required() {
                        return Err(DecodeError::MissingRequiredField {
                            type_name: schema.name(),
                            field: field.key(),
                        });
                    }
                    continue;
                };
                match self.decode_field(node, field.kind(), schema.name(), field.key()) {
                    Ok(value) => {
                        record
                            .set_at(field.index(), value)
                            .map_err(|source| DecodeError::TypeMismatch {
                                type_name: schema.name(),
                                field: field.key(),
                                source,
                            })?;
                    }
                    Err(BuildError::Unresolved(_)) => self.patches.push(Patch {
                        handle: handle.clone(),
                        field,
                        type_name: schema.name(),
                        node,
                    }),
                    Err(BuildError::Fatal(err)) => return Err(err),
                }
            }
        }

        for key in obj.keys() {
            if !key.starts_with('$') && schema.field_by_key(key).is_none() {
                log::debug!("dropping unknown key `{key}` while decoding `{}`", schema.name());
            }
        }

        Ok(handle)
    }

    /// Allocates an instance for an object node, registering its id before
    /// any field is populated.
    ///
    /// Re-decoding (from the back-patch queue) must not fork identity, so an
    /// id that is already registered with the right type yields the existing
    /// instance instead of a fresh one.
    fn allocate(&mut self, declared_id: Option<u64>, schema: &'static RecordSchema) -> Handle {
        let Some(id) = declared_id else {
            return schema.create_instance();
        };

        if let Some(existing) = self.instances.get(&id) {
            if existing.schema().ty_id() != schema.ty_id() {
                log::warn!(
                    "id {id} is declared by multiple objects of different types; \
                     keeping the latest"
                );
            } else if existing.try_borrow().is_err() {
                // Still being populated: the object nests a duplicate of its
                // own id.
                log::warn!(
                    "id {id} is declared again inside its own definition; \
                     the inner object becomes a separate instance"
                );
            } else {
                return existing.clone();
            }
        }

        let fresh = schema.create_instance();
        self.instances.insert(id, fresh.clone());
        fresh
    }

    fn decode_field(
        &mut self,
        node: &'v JsonValue,
        kind: &FieldKind,
        type_name: &'static str,
        key: &'static str,
    ) -> Result<Value, BuildError> {
        match kind {
            FieldKind::Optional(inner) => {
                if node.is_null() {
                    Ok(Value::Null)
                } else {
                    self.decode_field(node, inner, type_name, key)
                }
            }
            FieldKind::Scalar(scalar) => scalar_value(node, *scalar).map_err(|source| {
                BuildError::Fatal(DecodeError::TypeMismatch {
                    type_name,
                    field: key,
                    source,
                })
            }),
            FieldKind::List(element) => {
                let items = node.as_array().ok_or_else(|| {
                    mismatch(type_name, key, ValueShape::List, shape_of(node))
                })?;
                items
                    .iter()
                    .map(|item| self.decode_field(item, element, type_name, key))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
            FieldKind::Map(value_kind) => {
                let entries = node.as_object().ok_or_else(|| {
                    mismatch(type_name, key, ValueShape::Map, shape_of(node))
                })?;
                let mut pairs = Vec::with_capacity(entries.len());
                for (entry_key, entry_node) in entries {
                    pairs.push((
                        entry_key.clone(),
                        self.decode_field(entry_node, value_kind, type_name, key)?,
                    ));
                }
                Ok(Value::Map(pairs))
            }
            FieldKind::Record(schema_of) => {
                let obj = node.as_object().ok_or_else(|| {
                    mismatch(type_name, key, ValueShape::Record, shape_of(node))
                })?;
                if let Some(ref_node) = obj.get("$ref") {
                    let id = marker_id(ref_node, type_name, "$ref")?;
                    if obj.len() > 1 {
                        log::warn!(
                            "`$ref` marker for id {id} carries {} extra keys; ignored",
                            obj.len() - 1
                        );
                    }
                    return match self.instances.get(&id) {
                        Some(target) => Ok(Value::Link(target.clone())),
                        None => Err(BuildError::Unresolved(id)),
                    };
                }
                self.build_record(obj, schema_of())
                    .map(Value::Link)
                    .map_err(BuildError::Fatal)
            }
        }
    }

    /// Re-decodes deferred fields now that every `$id` in the document is
    /// registered. Anything still unresolved points at an id the document
    /// never defines.
    fn drain_patches(&mut self) -> Result<(), DecodeError> {
        while !self.patches.is_empty() {
            let patches = core::mem::take(&mut self.patches);
            for patch in patches {
                let value = match self.decode_field(
                    patch.node,
                    patch.field.kind(),
                    patch.type_name,
                    patch.field.key(),
                ) {
                    Ok(value) => value,
                    Err(BuildError::Unresolved(id)) => {
                        return Err(DecodeError::DanglingReference { id });
                    }
                    Err(BuildError::Fatal(err)) => return Err(err),
                };
                patch
                    .handle
                    .borrow_mut()
                    .set_at(patch.field.index(), value)
                    .map_err(|source| DecodeError::TypeMismatch {
                        type_name: patch.type_name,
                        field: patch.field.key(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Node helpers

fn shape_of(node: &JsonValue) -> ValueShape {
    match node {
        JsonValue::Null => ValueShape::Null,
        JsonValue::Bool(_) => ValueShape::Bool,
        JsonValue::Number(_) => ValueShape::Number,
        JsonValue::String(_) => ValueShape::String,
        JsonValue::Array(_) => ValueShape::List,
        JsonValue::Object(obj) if obj.contains_key("$ref") => ValueShape::Reference,
        JsonValue::Object(_) => ValueShape::Record,
    }
}

/// Reads the integer of a `$id`/`$ref` marker.
fn marker_id(
    node: &JsonValue,
    type_name: &'static str,
    marker: &'static str,
) -> Result<u64, DecodeError> {
    node.as_u64().ok_or_else(|| DecodeError::TypeMismatch {
        type_name,
        field: marker,
        source: ShapeError::shape(ValueShape::Number, shape_of(node)),
    })
}

fn mismatch(
    type_name: &'static str,
    key: &'static str,
    expected: ValueShape,
    found: ValueShape,
) -> BuildError {
    BuildError::Fatal(DecodeError::TypeMismatch {
        type_name,
        field: key,
        source: ShapeError::shape(expected, found),
    })
}

fn scalar_value(node: &JsonValue, scalar: ScalarKind) -> Result<Value, ShapeError> {
    match node {
        // Let the typed setter decide whether null is assignable.
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(flag) => Ok(Value::Bool(*flag)),
        JsonValue::Number(number) => {
            if let Some(int) = number.as_i64() {
                Ok(Value::Int(int))
            } else if let Some(uint) = number.as_u64() {
                Ok(Value::UInt(uint))
            } else {
                Ok(Value::Float(number.as_f64().unwrap())) // every JSON number is one of the three
            }
        }
        JsonValue::String(text) => Ok(Value::Str(text.clone())),
        other => Err(ShapeError::shape(scalar.shape(), shape_of(other))),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Deserializer, from_str};
    use crate::codec::encode::Serializer;
    use crate::codec::error::{DecodeError, SchemaError};
    use crate::derive::Record;
    use crate::record::{Link, ShapeError};
    use crate::registry::SchemaRegistry;

    #[derive(Record, Default)]
    struct Node {
        label: String,
        next: Option<Link<Node>>,
        others: Vec<Link<Node>>,
    }

    #[derive(Record, Default)]
    struct Profile {
        #[record(alias = "full_name", required)]
        name: String,
        #[record(ignore)]
        password: String,
        age: Option<u8>,
    }

    fn roundtrip(node: &Link<Node>) -> Link<Node> {
        let text = Serializer::new().serialize(node).unwrap();
        from_str(&text).unwrap()
    }

    #[test]
    fn round_trip_restores_fields() {
        let node = Link::new(Node {
            label: "power".into(),
            ..Default::default()
        });
        let back = roundtrip(&node);
        assert_eq!(back.borrow().label, "power");
        assert!(back.borrow().next.is_none());
    }

    #[test]
    fn key_order_does_not_matter() {
        let a: Link<Profile> = from_str(r#"{"full_name": "Ada", "age": 36}"#).unwrap();
        let b: Link<Profile> = from_str(r#"{"age": 36, "full_name": "Ada"}"#).unwrap();
        assert_eq!(a.borrow().name, b.borrow().name);
        assert_eq!(a.borrow().age, b.borrow().age);
    }

    #[test]
    fn alias_is_the_only_accepted_key() {
        // The declared field name is an unknown key once aliased.
        let profile: Link<Profile> =
            from_str(r#"{"full_name": "Ada", "name": "ignored"}"#).unwrap();
        assert_eq!(profile.borrow().name, "Ada");
    }

    #[test]
    fn ignored_fields_never_decode() {
        let profile: Link<Profile> =
            from_str(r#"{"full_name": "Ada", "password": "hunter2"}"#).unwrap();
        assert_eq!(profile.borrow().password, "");
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let err = from_str::<Profile>(r#"{"age": 3}"#).unwrap_err();
        match err {
            DecodeError::MissingRequiredField { type_name, field } => {
                assert_eq!(type_name, "Profile");
                assert_eq!(field, "full_name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn required_field_with_null_value_counts_as_present() {
        let err = from_str::<Profile>(r#"{"full_name": null}"#).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { .. }));
    }

    #[test]
    fn shared_references_decode_to_one_instance() {
        let leaf = Link::new(Node {
            label: "leaf".into(),
            ..Default::default()
        });
        let root = Link::new(Node {
            label: "root".into(),
            next: Some(leaf.clone()),
            others: vec![leaf.clone(), leaf.clone()],
        });

        let back = roundtrip(&root);
        let borrowed = back.borrow();
        let via_next = borrowed.next.clone().unwrap();
        assert!(Link::ptr_eq(&via_next, &borrowed.others[0]));
        assert!(Link::ptr_eq(&via_next, &borrowed.others[1]));
    }

    #[test]
    fn cycles_reconstruct() {
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

        let back = roundtrip(&a);
        let forward = back.borrow().next.clone().unwrap();
        let and_back = forward.borrow().next.clone().unwrap();
        assert!(Link::ptr_eq(&back, &and_back));
        assert_eq!(forward.borrow().label, "b");
    }

    #[test]
    fn forward_references_are_back_patched() {
        // Hand-reordered document: the marker appears before its target.
        let text = r#"{
            "$id": 1, "label": "root",
            "next": {"$ref": 2},
            "others": [{"$id": 2, "label": "late", "next": null, "others": []}]
        }"#;
        let root: Link<Node> = from_str(text).unwrap();
        let borrowed = root.borrow();
        let via_next = borrowed.next.clone().unwrap();
        assert_eq!(via_next.borrow().label, "late");
        assert!(Link::ptr_eq(&via_next, &borrowed.others[0]));
    }

    #[test]
    fn dangling_reference_is_reported_with_its_id() {
        let err = from_str::<Node>(r#"{"label": "x", "next": {"$ref": 99}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::DanglingReference { id: 99 }));

        // A root that is itself an unresolved marker.
        let err = from_str::<Node>(r#"{"$ref": 99}"#).unwrap_err();
        assert!(matches!(err, DecodeError::DanglingReference { id: 99 }));
    }

    #[test]
    fn parse_errors_carry_a_position() {
        let err = from_str::<Node>(r#"{"label": "unterminated"#).unwrap_err();
        match err {
            DecodeError::Parse { line, column, .. } => {
                assert_eq!(line, 1);
                assert!(column > 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn shape_mismatches_name_the_field() {
        let err = from_str::<Node>(r#"{"label": ["not", "text"]}"#).unwrap_err();
        match err {
            DecodeError::TypeMismatch {
                type_name,
                field,
                source,
            } => {
                assert_eq!(type_name, "Node");
                assert_eq!(field, "label");
                assert!(matches!(source, ShapeError::Shape { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn by_name_and_tagged_decoding() {
        let mut registry = SchemaRegistry::new();
        registry.register::<Node>();
        let deserializer = Deserializer::new(&registry);

        let node = Link::new(Node {
            label: "dynamic".into(),
            ..Default::default()
        });
        let tagged = Serializer::new().serialize_tagged(&node.handle()).unwrap();

        let by_tag = deserializer.deserialize_tagged(&tagged).unwrap();
        assert_eq!(
            by_tag.downcast::<Node>().unwrap().borrow().label,
            "dynamic"
        );

        let by_name = deserializer.deserialize_by_name(&tagged, "Node").unwrap();
        assert!(by_name.downcast::<Node>().is_some());
    }

    #[test]
    fn unknown_and_missing_type_names() {
        let registry = SchemaRegistry::new();
        let deserializer = Deserializer::new(&registry);

        let err = deserializer
            .deserialize_by_name("{}", "Ghost")
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownType { name } if name == "Ghost"));

        let err = deserializer.deserialize_tagged("{}").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Schema(SchemaError::MissingTypeTag)
        ));
    }

    #[test]
    fn decoded_ids_do_not_leak_between_passes() {
        // Each decode pass has its own reference table; the same ids in two
        // documents must produce unrelated instances.
        let text = r#"{"$id": 1, "label": "first", "next": null, "others": []}"#;
        let a: Link<Node> = from_str(text).unwrap();
        let b: Link<Node> = from_str(text).unwrap();
        assert!(!Link::ptr_eq(&a, &b));
    }
}
