//! Structural descriptions of payload types.
//!
//! A [`TypeDescriptor`] is what the schema walker consumes. Descriptors come from two
//! providers: types that implement [`Describe`] by hand, and the source-backed
//! [`TypeResolver`](crate::type_resolver::TypeResolver) which reads struct definitions
//! out of Rust files.

use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Tag key marking a field as required when its value is `"true"`.
pub const TAG_REQUIRED: &str = "required";
/// Tag key carrying the human readable description of a field.
pub const TAG_COMMENT: &str = "comment";

/// Shape of a type, as far as schema synthesis is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// A scalar kind (integers, floats, booleans, strings)
    Primitive(PrimitiveKind),
    /// A list, slice or array of the inner type
    Sequence(Box<TypeDescriptor>),
    /// An associative map; only the fact that it is a map is used
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    /// A named record with ordered fields
    Compound(CompoundType),
    /// Pointer-like wrapper around the inner type (`Option`, `Box`, `&T`, `*T`)
    Indirection(Box<TypeDescriptor>),
    /// Dynamic or interface-like value with no static shape
    Unknown,
}

/// Primitive kinds understood by the primitive type mapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Bool,
    String,
    Float32,
    Float64,
    /// A scalar outside the mapping table, kept with its raw label
    Other(String),
}

/// A named record type and its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundType {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// One field of a [`CompoundType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
    /// Per-field metadata such as `required` and `comment`
    pub tags: IndexMap<String, String>,
}

impl TypeDescriptor {
    /// Descriptor of a type implementing [`Describe`].
    pub fn of<T: Describe + ?Sized>() -> Self {
        T::describe()
    }

    pub fn sequence(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence(Box::new(inner))
    }

    pub fn indirection(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Indirection(Box::new(inner))
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => write!(f, "{}", kind.label()),
            TypeDescriptor::Sequence(inner) => write!(f, "[]{}", inner),
            TypeDescriptor::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeDescriptor::Compound(compound) => write!(f, "{}", compound.name),
            TypeDescriptor::Indirection(inner) => write!(f, "*{}", inner),
            TypeDescriptor::Unknown => write!(f, "interface{{}}"),
        }
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive(kind)
    }
}

impl From<CompoundType> for TypeDescriptor {
    fn from(compound: CompoundType) -> Self {
        TypeDescriptor::Compound(compound)
    }
}

impl PrimitiveKind {
    /// Looks a primitive up by its Go or Rust spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "int" | "isize" => PrimitiveKind::Int,
            "int8" | "i8" => PrimitiveKind::Int8,
            "int16" | "i16" => PrimitiveKind::Int16,
            "int32" | "i32" | "rune" => PrimitiveKind::Int32,
            "int64" | "i64" => PrimitiveKind::Int64,
            "uint" | "usize" => PrimitiveKind::Uint,
            "uint8" | "u8" | "byte" => PrimitiveKind::Uint8,
            "uint16" | "u16" => PrimitiveKind::Uint16,
            "uint32" | "u32" => PrimitiveKind::Uint32,
            "uint64" | "u64" => PrimitiveKind::Uint64,
            "bool" => PrimitiveKind::Bool,
            "string" | "String" | "str" | "char" => PrimitiveKind::String,
            "float32" | "f32" => PrimitiveKind::Float32,
            "float64" | "f64" => PrimitiveKind::Float64,
            "i128" | "u128" | "complex64" | "complex128" | "uintptr" => {
                PrimitiveKind::Other(name.to_string())
            }
            _ => return None,
        };
        Some(kind)
    }

    /// Raw kind label, used when the kind has no schema mapping.
    pub fn label(&self) -> &str {
        match self {
            PrimitiveKind::Int => "int",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Uint => "uint",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Uint32 => "uint32",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::String => "string",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::Other(label) => label,
        }
    }
}

impl CompoundType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, keeping declaration order.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            tags: IndexMap::new(),
        }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn required(self) -> Self {
        self.tag(TAG_REQUIRED, "true")
    }

    pub fn comment(self, comment: impl Into<String>) -> Self {
        self.tag(TAG_COMMENT, comment)
    }

    pub fn is_required(&self) -> bool {
        self.tags.get(TAG_REQUIRED).map(String::as_str) == Some("true")
    }

    pub fn comment_text(&self) -> Option<&str> {
        self.tags
            .get(TAG_COMMENT)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }
}

/// Strips pointer, array and brace decoration from a type name.
///
/// `*User`, `[]User` and `[]*User` all become `User`; `interface{}` becomes `interface`.
pub fn definition_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '*' | '&' | '[' | ']' | '{' | '}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Types that can describe their own shape.
///
/// Record types implement this by hand:
///
/// ```
/// use swagger_from_routes::descriptor::{CompoundType, Describe, FieldDescriptor, TypeDescriptor};
///
/// struct Item {
///     java: String,
/// }
///
/// impl Describe for Item {
///     fn describe() -> TypeDescriptor {
///         CompoundType::new("Item")
///             .field(FieldDescriptor::new("java", String::describe()).required())
///             .into()
///     }
/// }
/// ```
pub trait Describe {
    fn describe() -> TypeDescriptor;
}

macro_rules! describe_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::Primitive(PrimitiveKind::$kind)
                }
            }
        )*
    };
}

describe_primitive! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => Int,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    usize => Uint,
    f32 => Float32,
    f64 => Float64,
    bool => Bool,
    char => String,
    str => String,
    String => String,
}

impl Describe for i128 {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Other("i128".to_string()))
    }
}

impl Describe for u128 {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Other("u128".to_string()))
    }
}

macro_rules! describe_sequence {
    ($($ty:ident),*) => {
        $(
            impl<T: Describe> Describe for $ty<T> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::sequence(T::describe())
                }
            }
        )*
    };
}

describe_sequence!(Vec, VecDeque, HashSet, BTreeSet);

impl<T: Describe> Describe for [T] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(T::describe())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(T::describe())
    }
}

macro_rules! describe_indirection {
    ($($ty:ident),*) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ty<T> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::indirection(T::describe())
                }
            }
        )*
    };
}

describe_indirection!(Box, Rc, Arc);

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::indirection(T::describe())
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::indirection(T::describe())
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map(K::describe(), V::describe())
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map(K::describe(), V::describe())
    }
}

impl Describe for serde_json::Value {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item;

    impl Describe for Item {
        fn describe() -> TypeDescriptor {
            CompoundType::new("Item")
                .field(FieldDescriptor::new("java", String::describe()))
                .into()
        }
    }

    #[test]
    fn test_describe_primitives() {
        assert_eq!(
            TypeDescriptor::of::<u16>(),
            TypeDescriptor::Primitive(PrimitiveKind::Uint16)
        );
        assert_eq!(
            TypeDescriptor::of::<String>(),
            TypeDescriptor::Primitive(PrimitiveKind::String)
        );
        assert_eq!(
            TypeDescriptor::of::<u128>(),
            TypeDescriptor::Primitive(PrimitiveKind::Other("u128".to_string()))
        );
    }

    #[test]
    fn test_describe_wrappers() {
        let descriptor = TypeDescriptor::of::<Option<Vec<Item>>>();
        assert_eq!(descriptor.to_string(), "*[]Item");

        let map = TypeDescriptor::of::<HashMap<String, i64>>();
        assert_eq!(map.to_string(), "map[string]int64");

        assert_eq!(TypeDescriptor::of::<serde_json::Value>(), TypeDescriptor::Unknown);
    }

    #[test]
    fn test_primitive_from_name() {
        assert_eq!(PrimitiveKind::from_name("int64"), Some(PrimitiveKind::Int64));
        assert_eq!(PrimitiveKind::from_name("i64"), Some(PrimitiveKind::Int64));
        assert_eq!(PrimitiveKind::from_name("byte"), Some(PrimitiveKind::Uint8));
        assert_eq!(
            PrimitiveKind::from_name("complex128"),
            Some(PrimitiveKind::Other("complex128".to_string()))
        );
        assert_eq!(PrimitiveKind::from_name("User"), None);
    }

    #[test]
    fn test_definition_name() {
        assert_eq!(definition_name("[]Item"), "Item");
        assert_eq!(definition_name("*User"), "User");
        assert_eq!(definition_name("[]*User"), "User");
        assert_eq!(definition_name("interface{}"), "interface");
        assert_eq!(definition_name("Plain"), "Plain");
    }

    #[test]
    fn test_field_tags() {
        let field = FieldDescriptor::new("name", String::describe())
            .required()
            .comment("user name");
        assert!(field.is_required());
        assert_eq!(field.comment_text(), Some("user name"));

        let field = FieldDescriptor::new("age", u8::describe()).tag(TAG_REQUIRED, "yes");
        assert!(!field.is_required());
        assert_eq!(field.comment_text(), None);
    }
}
