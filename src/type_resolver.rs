use crate::descriptor::{
    definition_name, CompoundType, FieldDescriptor, PrimitiveKind, TypeDescriptor, TAG_COMMENT,
};
use crate::error::{Error, Result};
use crate::source::{ParsedFile, SourceSet};
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use syn::{visit::Visit, Token};

/// Attribute carrying per-field tags, e.g. `#[swagger(required, comment = "...")]`
pub const TAG_ATTRIBUTE: &str = "swagger";

/// Type resolver - builds type descriptors from struct definitions in parsed sources
pub struct TypeResolver {
    parsed_files: Vec<ParsedFile>,
    /// Descriptors already built, by type name
    type_cache: HashMap<String, TypeDescriptor>,
    /// Types currently being resolved, to detect self-references
    resolving_stack: HashSet<String>,
}

/// Serde attributes that change how a field appears on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SerdeAttributes {
    rename: Option<String>,
    skip: bool,
}

impl TypeResolver {
    pub fn new(parsed_files: Vec<ParsedFile>) -> Self {
        debug!("Initializing TypeResolver with {} files", parsed_files.len());
        Self {
            parsed_files,
            type_cache: HashMap::new(),
            resolving_stack: HashSet::new(),
        }
    }

    pub fn from_sources(sources: SourceSet) -> Self {
        Self::new(sources.files)
    }

    /// Find a struct definition by name across all parsed files, including inline modules
    pub fn find_struct_definition(&self, name: &str) -> Option<&syn::ItemStruct> {
        self.parsed_files.iter().find_map(|parsed_file| {
            let found = find_struct_in_file(&parsed_file.syntax_tree, name);
            if found.is_some() {
                debug!("Found struct {} in {}", name, parsed_file.path.display());
            }
            found
        })
    }

    /// Resolve a type by name.
    ///
    /// Decoration (`*`, `[]`, `{}`) is stripped from the name before lookup. Returns `None`
    /// when the name is neither a primitive nor a known struct.
    pub fn resolve_type(&mut self, type_name: &str) -> Option<TypeDescriptor> {
        let name = definition_name(type_name);

        if let Some(kind) = PrimitiveKind::from_name(&name) {
            return Some(TypeDescriptor::Primitive(kind));
        }

        if let Some(cached) = self.type_cache.get(&name) {
            debug!("Type {} found in cache", name);
            return Some(cached.clone());
        }

        if self.resolving_stack.contains(&name) {
            warn!("Circular reference detected for type: {}", name);
            return Some(TypeDescriptor::Unknown);
        }

        let item_struct = match self.find_struct_definition(&name) {
            Some(item) => item.clone(),
            None => {
                warn!("Could not resolve type: {}", name);
                return None;
            }
        };

        self.resolving_stack.insert(name.clone());
        let resolved = self.describe_struct(&item_struct);
        self.resolving_stack.remove(&name);

        self.type_cache.insert(name, resolved.clone());
        Some(resolved)
    }

    /// Resolve a type expression such as `User`, `[]Item`, `*Profile`, `map[string]int`,
    /// `interface{}` or any Rust type (`Vec<Item>`, `Option<Box<User>>`).
    ///
    /// Unknown names inside the expression degrade to [`TypeDescriptor::Unknown`]; only a
    /// syntactically invalid expression is an error.
    pub fn resolve_expr(&mut self, expr: &str) -> Result<TypeDescriptor> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(Error::InvalidArgument("empty type expression".to_string()));
        }

        if let Some(rest) = expr.strip_prefix("[]") {
            return Ok(TypeDescriptor::sequence(self.resolve_expr(rest)?));
        }
        if let Some(rest) = expr.strip_prefix('*') {
            return Ok(TypeDescriptor::indirection(self.resolve_expr(rest)?));
        }
        if let Some((key, value)) = split_map_expr(expr) {
            let key = self.resolve_expr(key)?;
            let value = self.resolve_expr(value)?;
            return Ok(TypeDescriptor::map(key, value));
        }
        if expr == "interface{}" || expr == "any" {
            return Ok(TypeDescriptor::Unknown);
        }

        let ty: syn::Type = syn::parse_str(expr)?;
        Ok(self.describe_syn_type(&ty))
    }

    /// Convert a parsed Rust type into a descriptor
    pub fn describe_syn_type(&mut self, ty: &syn::Type) -> TypeDescriptor {
        match ty {
            syn::Type::Path(type_path) => self.describe_path(&type_path.path),
            syn::Type::Reference(reference) => {
                TypeDescriptor::indirection(self.describe_syn_type(&reference.elem))
            }
            syn::Type::Ptr(pointer) => TypeDescriptor::indirection(self.describe_syn_type(&pointer.elem)),
            syn::Type::Slice(slice) => TypeDescriptor::sequence(self.describe_syn_type(&slice.elem)),
            syn::Type::Array(array) => TypeDescriptor::sequence(self.describe_syn_type(&array.elem)),
            syn::Type::Paren(paren) => self.describe_syn_type(&paren.elem),
            syn::Type::Group(group) => self.describe_syn_type(&group.elem),
            _ => TypeDescriptor::Unknown,
        }
    }

    fn describe_path(&mut self, path: &syn::Path) -> TypeDescriptor {
        let Some(segment) = path.segments.last() else {
            return TypeDescriptor::Unknown;
        };
        let type_name = segment.ident.to_string();

        let generic_args: Vec<&syn::Type> = match &segment.arguments {
            syn::PathArguments::AngleBracketed(args) => args
                .args
                .iter()
                .filter_map(|arg| match arg {
                    syn::GenericArgument::Type(ty) => Some(ty),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        match type_name.as_str() {
            "Vec" | "VecDeque" | "HashSet" | "BTreeSet" | "IndexSet" => {
                let inner = self.describe_generic_arg(generic_args.first().copied());
                TypeDescriptor::sequence(inner)
            }
            "Option" | "Box" | "Rc" | "Arc" => {
                let inner = self.describe_generic_arg(generic_args.first().copied());
                TypeDescriptor::indirection(inner)
            }
            "HashMap" | "BTreeMap" | "IndexMap" => {
                let key = self.describe_generic_arg(generic_args.first().copied());
                let value = self.describe_generic_arg(generic_args.get(1).copied());
                TypeDescriptor::map(key, value)
            }
            "Value" => TypeDescriptor::Unknown,
            _ => self.resolve_type(&type_name).unwrap_or(TypeDescriptor::Unknown),
        }
    }

    fn describe_generic_arg(&mut self, arg: Option<&syn::Type>) -> TypeDescriptor {
        match arg {
            Some(ty) => self.describe_syn_type(ty),
            None => TypeDescriptor::Unknown,
        }
    }

    fn describe_struct(&mut self, item_struct: &syn::ItemStruct) -> TypeDescriptor {
        let struct_name = item_struct.ident.to_string();
        debug!("Parsing struct definition: {}", struct_name);

        let mut compound = CompoundType::new(struct_name);
        if let syn::Fields::Named(named_fields) = &item_struct.fields {
            for field in &named_fields.named {
                if let Some(field_descriptor) = self.describe_field(field) {
                    compound = compound.field(field_descriptor);
                }
            }
        }

        debug!("Parsed {} fields", compound.fields.len());
        TypeDescriptor::Compound(compound)
    }

    fn describe_field(&mut self, field: &syn::Field) -> Option<FieldDescriptor> {
        let ident = field.ident.as_ref()?.to_string();
        let serde_attrs = parse_serde_attributes(&field.attrs);
        if serde_attrs.skip {
            debug!("Skipping field {}", ident);
            return None;
        }

        let name = serde_attrs.rename.unwrap_or(ident);
        let ty = self.describe_syn_type(&field.ty);
        let mut descriptor = FieldDescriptor::new(name, ty);
        descriptor.tags = parse_field_tags(&field.attrs);
        Some(descriptor)
    }
}

/// Finds the first struct with a given name, descending into inline modules
struct StructFinder<'ast, 'n> {
    name: &'n str,
    found: Option<&'ast syn::ItemStruct>,
}

impl<'ast> Visit<'ast> for StructFinder<'ast, '_> {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        if self.found.is_none() && node.ident == self.name {
            self.found = Some(node);
        }
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if self.found.is_none() {
            syn::visit::visit_item_mod(self, node);
        }
    }
}

fn find_struct_in_file<'a>(file: &'a syn::File, name: &str) -> Option<&'a syn::ItemStruct> {
    let mut finder = StructFinder { name, found: None };
    finder.visit_file(file);
    finder.found
}

/// Splits `map[K]V` into `K` and `V`, honouring nested brackets in the key.
fn split_map_expr(expr: &str) -> Option<(&str, &str)> {
    let rest = expr.strip_prefix("map[")?;
    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '[' => depth += 1,
            ']' if depth == 0 => return Some((&rest[..i], &rest[i + 1..])),
            ']' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Collect `#[swagger(...)]` tags, falling back to doc comments for `comment`
fn parse_field_tags(attrs: &[syn::Attribute]) -> IndexMap<String, String> {
    let mut tags = IndexMap::new();
    let mut doc_lines = Vec::new();

    for attr in attrs {
        if attr.path().is_ident(TAG_ATTRIBUTE) {
            let result = attr.parse_nested_meta(|meta| {
                let key = match meta.path.get_ident() {
                    Some(ident) => ident.to_string(),
                    None => return Err(meta.error("expected a plain tag name")),
                };
                let value = if meta.input.peek(Token![=]) {
                    match meta.value()?.parse::<syn::Lit>()? {
                        syn::Lit::Str(s) => s.value(),
                        syn::Lit::Bool(b) => b.value.to_string(),
                        syn::Lit::Int(i) => i.base10_digits().to_string(),
                        syn::Lit::Float(f) => f.base10_digits().to_string(),
                        _ => return Err(meta.error("unsupported tag value")),
                    }
                } else {
                    "true".to_string()
                };
                tags.insert(key, value);
                Ok(())
            });
            if let Err(e) = result {
                warn!("Ignoring malformed #[{}] attribute: {}", TAG_ATTRIBUTE, e);
            }
        } else if attr.path().is_ident("doc") {
            if let syn::Meta::NameValue(name_value) = &attr.meta {
                if let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(doc),
                    ..
                }) = &name_value.value
                {
                    let line = doc.value().trim().to_string();
                    if !line.is_empty() {
                        doc_lines.push(line);
                    }
                }
            }
        }
    }

    if !tags.contains_key(TAG_COMMENT) && !doc_lines.is_empty() {
        tags.insert(TAG_COMMENT.to_string(), doc_lines.join(" "));
    }
    tags
}

/// Serde keys that keep a field out of one or both directions of the wire format
const SKIP_KEYS: [&str; 3] = ["skip", "skip_serializing", "skip_deserializing"];

fn parse_serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
    let mut serde_attrs = SerdeAttributes::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
                let value: syn::LitStr = meta.value()?.parse()?;
                debug!("Found serde rename: {}", value.value());
                serde_attrs.rename = Some(value.value());
            } else if SKIP_KEYS.iter().any(|key| meta.path.is_ident(key)) {
                debug!("Found serde skip");
                serde_attrs.skip = true;
            } else if meta.input.peek(Token![=]) {
                meta.value()?.parse::<syn::Expr>()?;
            } else if meta.input.peek(syn::token::Paren) {
                meta.parse_nested_meta(|inner| {
                    if inner.input.peek(Token![=]) {
                        inner.value()?.parse::<syn::Expr>()?;
                    }
                    Ok(())
                })?;
            }
            Ok(())
        });
        if let Err(e) = result {
            debug!("Unreadable serde attribute: {}", e);
        }
    }

    serde_attrs
}
