use crate::definitions::Definitions;
use crate::descriptor::{definition_name, CompoundType, PrimitiveKind, TypeDescriptor};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Prefix of every `$ref` pointing into the document's definitions.
pub const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";

/// Format emitted for kinds the primitive table does not know.
pub const UNKNOWN_FORMAT: &str = "UNKNOWN";

/// Swagger 2.0 schema object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Reference to a named definition
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The type of the schema (string, integer, object, array, ...)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format for primitive types (e.g. "int32", "int64", "float", "double")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Properties for object types, in field declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    /// Required field names for object types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Schema {
    /// `{"$ref": "#/definitions/<name>"}`
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", DEFINITIONS_REF_PREFIX, name)),
            ..Self::default()
        }
    }

    pub fn primitive(schema_type: &str, format: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            format: (!format.is_empty()).then(|| format.to_string()),
            ..Self::default()
        }
    }

    /// Generic `{"type": "object"}`
    pub fn object() -> Self {
        Self {
            schema_type: Some("object".to_string()),
            ..Self::default()
        }
    }

    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// Definition name this schema points at, if it is a `$ref`.
    pub fn reference_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(DEFINITIONS_REF_PREFIX))
    }

    /// Every definition name referenced by this schema or anything nested in it.
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        if let Some(name) = self.reference_name() {
            names.push(name);
        }
        if let Some(items) = &self.items {
            items.collect_references(names);
        }
        if let Some(properties) = &self.properties {
            for property in properties.values() {
                property.collect_references(names);
            }
        }
    }
}

/// Maps a primitive kind to its Swagger `(type, format)` pair.
///
/// Returns `None` for kinds outside the table; callers fall back to the raw kind label.
pub fn primitive_schema(kind: &PrimitiveKind) -> Option<(&'static str, &'static str)> {
    let pair = match kind {
        PrimitiveKind::Int => ("integer", "int32"),
        PrimitiveKind::Uint => ("integer", "uint32"),
        PrimitiveKind::Int8 => ("integer", "int8"),
        PrimitiveKind::Uint8 => ("integer", "uint8"),
        PrimitiveKind::Int16 => ("integer", "int16"),
        PrimitiveKind::Uint16 => ("integer", "uint16"),
        PrimitiveKind::Int32 => ("integer", "int32"),
        PrimitiveKind::Uint32 => ("integer", "uint32"),
        PrimitiveKind::Int64 => ("integer", "int64"),
        PrimitiveKind::Uint64 => ("integer", "uint64"),
        PrimitiveKind::Bool => ("boolean", "boolean"),
        PrimitiveKind::String => ("string", ""),
        PrimitiveKind::Float32 => ("number", "float"),
        PrimitiveKind::Float64 => ("number", "double"),
        PrimitiveKind::Other(_) => return None,
    };
    Some(pair)
}

/// Schema generator - walks type descriptors and fills the definitions registry
///
/// One generator belongs to exactly one document build.
#[derive(Debug, Default)]
pub struct SchemaGenerator {
    definitions: Definitions,
}

impl SchemaGenerator {
    pub fn new() -> Self {
        debug!("Initializing SchemaGenerator");
        Self::default()
    }

    /// Resolve a descriptor to a schema, registering any compound types it reaches.
    pub fn resolve(&mut self, descriptor: &TypeDescriptor) -> Schema {
        resolve(descriptor, &mut self.definitions)
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn into_definitions(self) -> Definitions {
        self.definitions
    }
}

/// Resolve `descriptor` against `definitions`.
///
/// Compound types become `$ref`s and are registered depth-first, so every reference
/// handed back already has a matching definition.
///
/// # Arguments
///
/// * `descriptor` - The type shape to convert
/// * `definitions` - Registry that receives every compound type reached by the walk
///
/// # Returns
///
/// An inline schema for primitives, sequences, maps and unknown kinds, or a `$ref` for
/// compound types. Indirections resolve to whatever they point at.
pub fn resolve(descriptor: &TypeDescriptor, definitions: &mut Definitions) -> Schema {
    match descriptor {
        TypeDescriptor::Primitive(kind) => primitive_to_schema(kind),
        TypeDescriptor::Compound(compound) => {
            let name = definition_name(&compound.name);
            define_compound(&name, compound, definitions);
            Schema::reference(&name)
        }
        TypeDescriptor::Sequence(inner) => Schema::array(resolve(inner, definitions)),
        // value types of maps are not inspected
        TypeDescriptor::Map { .. } => Schema::object(),
        TypeDescriptor::Unknown => Schema::object(),
        TypeDescriptor::Indirection(inner) => resolve(inner, definitions),
    }
}

fn primitive_to_schema(kind: &PrimitiveKind) -> Schema {
    match primitive_schema(kind) {
        Some((schema_type, format)) => Schema::primitive(schema_type, format),
        None => {
            debug!("No schema mapping for kind {}", kind.label());
            Schema::primitive(kind.label(), UNKNOWN_FORMAT)
        }
    }
}

fn define_compound(name: &str, compound: &CompoundType, definitions: &mut Definitions) {
    definitions.ensure_defined(name, &compound.fields, |defs| {
        debug!("Generating definition for {}", name);

        let mut properties = IndexMap::new();
        let mut required: Vec<String> = Vec::new();

        for field in &compound.fields {
            let mut property = resolve(&field.ty, defs);
            if let Some(comment) = field.comment_text() {
                property.description = Some(comment.to_string());
            }
            properties.insert(field.name.clone(), property);

            if field.is_required() && !required.contains(&field.name) {
                required.push(field.name.clone());
            }
        }

        Schema {
            title: Some(name.to_string()),
            schema_type: Some("object".to_string()),
            properties: (!properties.is_empty()).then_some(properties),
            required,
            ..Schema::default()
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Describe, FieldDescriptor};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn item() -> TypeDescriptor {
        CompoundType::new("Item")
            .field(FieldDescriptor::new("java", String::describe()))
            .field(FieldDescriptor::new("golang", String::describe()).required())
            .into()
    }

    fn req() -> TypeDescriptor {
        CompoundType::new("Req")
            .field(FieldDescriptor::new("name", String::describe()).comment("display name"))
            .field(FieldDescriptor::new("age", i64::describe()).required())
            .field(FieldDescriptor::new("list", TypeDescriptor::sequence(item())))
            .into()
    }

    #[test]
    fn test_primitive_table() {
        let table = vec![
            (PrimitiveKind::Int, "integer", Some("int32")),
            (PrimitiveKind::Int8, "integer", Some("int8")),
            (PrimitiveKind::Int16, "integer", Some("int16")),
            (PrimitiveKind::Int32, "integer", Some("int32")),
            (PrimitiveKind::Int64, "integer", Some("int64")),
            (PrimitiveKind::Uint, "integer", Some("uint32")),
            (PrimitiveKind::Uint8, "integer", Some("uint8")),
            (PrimitiveKind::Uint16, "integer", Some("uint16")),
            (PrimitiveKind::Uint32, "integer", Some("uint32")),
            (PrimitiveKind::Uint64, "integer", Some("uint64")),
            (PrimitiveKind::Bool, "boolean", Some("boolean")),
            (PrimitiveKind::String, "string", None),
            (PrimitiveKind::Float32, "number", Some("float")),
            (PrimitiveKind::Float64, "number", Some("double")),
        ];

        let mut generator = SchemaGenerator::new();
        for (kind, schema_type, format) in table {
            let schema = generator.resolve(&TypeDescriptor::Primitive(kind.clone()));
            assert_eq!(schema.schema_type.as_deref(), Some(schema_type), "{:?}", kind);
            assert_eq!(schema.format.as_deref(), format, "{:?}", kind);
            assert!(schema.reference.is_none());
        }
        assert!(generator.definitions().is_empty());
    }

    #[test]
    fn test_unmapped_kind_falls_back_to_label() {
        let mut generator = SchemaGenerator::new();
        let schema = generator.resolve(&TypeDescriptor::sequence(u128::describe()));

        assert_eq!(schema.schema_type.as_deref(), Some("array"));
        let items = schema.items.unwrap();
        assert_eq!(items.schema_type.as_deref(), Some("u128"));
        assert_eq!(items.format.as_deref(), Some(UNKNOWN_FORMAT));
    }

    #[test]
    fn test_compound_returns_reference() {
        let mut generator = SchemaGenerator::new();
        let schema = generator.resolve(&item());

        assert_eq!(schema.reference.as_deref(), Some("#/definitions/Item"));
        assert_eq!(schema.reference_name(), Some("Item"));

        let definition = generator.definitions().get("Item").unwrap();
        assert_eq!(definition.title.as_deref(), Some("Item"));
        assert_eq!(definition.schema_type.as_deref(), Some("object"));
        assert_eq!(definition.required, vec!["golang".to_string()]);

        let names: Vec<_> = definition.properties.as_ref().unwrap().keys().collect();
        assert_eq!(names, vec!["java", "golang"]);
    }

    #[test]
    fn test_nested_compounds_are_registered() {
        let mut generator = SchemaGenerator::new();
        generator.resolve(&req());

        let definitions = generator.definitions();
        assert_eq!(definitions.len(), 2);

        let req = definitions.get("Req").unwrap();
        let properties = req.properties.as_ref().unwrap();
        assert_eq!(properties["name"].description.as_deref(), Some("display name"));
        assert_eq!(properties["age"].format.as_deref(), Some("int64"));

        let list = &properties["list"];
        assert_eq!(list.schema_type.as_deref(), Some("array"));
        assert_eq!(
            list.items.as_ref().unwrap().reference.as_deref(),
            Some("#/definitions/Item")
        );
        assert!(definitions.contains("Item"));
    }

    #[test]
    fn test_idempotent_registration() {
        let mut generator = SchemaGenerator::new();
        let first = generator.resolve(&item());
        let second = generator.resolve(&item());

        assert_eq!(first, second);
        assert_eq!(generator.definitions().len(), 1);
        assert_eq!(
            generator.definitions().get("Item").unwrap().required,
            vec!["golang".to_string()]
        );
        assert!(generator.definitions().collisions().is_empty());
    }

    #[test]
    fn test_nested_type_with_same_name_is_reported() {
        let inner: TypeDescriptor = CompoundType::new("A")
            .field(FieldDescriptor::new("y", u8::describe()))
            .into();
        let outer: TypeDescriptor = CompoundType::new("A")
            .field(FieldDescriptor::new("x", inner))
            .into();

        let mut generator = SchemaGenerator::new();
        let schema = generator.resolve(&outer);

        assert_eq!(schema.reference_name(), Some("A"));
        assert_eq!(generator.definitions().collisions(), ["A".to_string()]);
        let definition = generator.definitions().get("A").unwrap();
        let names: Vec<_> = definition.properties.as_ref().unwrap().keys().collect();
        assert_eq!(names, vec!["x"]);
    }

    #[test]
    fn test_required_listed_once() {
        let compound: TypeDescriptor = CompoundType::new("Dup")
            .field(FieldDescriptor::new("id", u32::describe()).required())
            .field(FieldDescriptor::new("id", u64::describe()).required())
            .into();

        let mut generator = SchemaGenerator::new();
        generator.resolve(&compound);
        generator.resolve(&compound);

        let definition = generator.definitions().get("Dup").unwrap();
        assert_eq!(definition.required, vec!["id".to_string()]);
    }

    #[test]
    fn test_sequence_of_primitive_is_inline() {
        let mut generator = SchemaGenerator::new();
        let schema = generator.resolve(&Vec::<String>::describe());

        assert_eq!(schema, Schema::array(Schema::primitive("string", "")));
        assert!(generator.definitions().is_empty());
    }

    #[test]
    fn test_map_and_unknown_are_objects() {
        let mut generator = SchemaGenerator::new();

        let map = generator.resolve(&HashMap::<String, Vec<u8>>::describe());
        assert_eq!(map, Schema::object());

        let dynamic = generator.resolve(&TypeDescriptor::Unknown);
        assert_eq!(dynamic, Schema::object());
        assert!(generator.definitions().is_empty());
    }

    #[test]
    fn test_indirection_is_transparent() {
        let mut generator = SchemaGenerator::new();
        let direct = generator.resolve(&item());
        let pointer = generator.resolve(&TypeDescriptor::indirection(item()));
        assert_eq!(direct, pointer);

        let optional = generator.resolve(&Option::<f32>::describe());
        assert_eq!(optional, Schema::primitive("number", "float"));
    }

    #[test]
    fn test_decorated_compound_name_is_normalized() {
        let decorated: TypeDescriptor = CompoundType::new("*Profile").into();

        let mut generator = SchemaGenerator::new();
        let schema = generator.resolve(&decorated);

        assert_eq!(schema.reference_name(), Some("Profile"));
        assert!(generator.definitions().contains("Profile"));
    }

    #[test]
    fn test_every_reference_has_definition() {
        let mut generator = SchemaGenerator::new();
        let schema = generator.resolve(&TypeDescriptor::sequence(req()));

        let definitions = generator.definitions();
        for name in schema.referenced_names() {
            assert!(definitions.contains(name), "missing {}", name);
        }
        for (_, definition) in definitions.iter() {
            for name in definition.referenced_names() {
                assert!(definitions.contains(name), "missing {}", name);
            }
        }
    }

    #[test]
    fn test_schema_serialization_shape() {
        let mut generator = SchemaGenerator::new();
        generator.resolve(&item());

        let json = serde_json::to_value(generator.definitions().get("Item").unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Item",
                "type": "object",
                "properties": {
                    "java": {"type": "string"},
                    "golang": {"type": "string"}
                },
                "required": ["golang"]
            })
        );
    }
}
