//! Swagger 2.0 documents from route declarations.
//!
//! Routes carry typed query, body and response payloads. The payload types are walked
//! structurally and emitted once each under `definitions`, so operations refer to them
//! by `$ref`.
//!
//! # Architecture
//!
//! 1. [`descriptor`] - structural type descriptions and the [`Describe`](descriptor::Describe) trait
//! 2. [`schema_generator`] - primitive mapping and the recursive schema walker
//! 3. [`definitions`] - the name-keyed definitions registry
//! 4. [`path_template`] - `:param` extraction and `{param}` rewriting
//! 5. [`route`] - route declarations and groups
//! 6. [`openapi_builder`] - operations, path items and document assembly
//! 7. [`source`] and [`type_resolver`] - descriptors read from Rust struct definitions
//! 8. [`manifest`] - route manifests in YAML or JSON
//! 9. [`serializer`] - YAML / JSON output
//!
//! # Example
//!
//! ```
//! use swagger_from_routes::descriptor::{CompoundType, Describe, FieldDescriptor, TypeDescriptor};
//! use swagger_from_routes::openapi_builder::build_document;
//! use swagger_from_routes::route::{ApiDefinition, HttpMethod, RouteDeclaration, RouteGroup};
//!
//! let item: TypeDescriptor = CompoundType::new("Item")
//!     .field(FieldDescriptor::new("name", String::describe()).required())
//!     .into();
//!
//! let api = ApiDefinition::default().group(
//!     RouteGroup::new("/api").route(
//!         RouteDeclaration::new(HttpMethod::Get, "/items/:id")
//!             .summary("Get an item")
//!             .response(item),
//!     ),
//! );
//!
//! let document = build_document(&api);
//! assert!(document.paths.contains_key("/api/items/{id}"));
//! assert!(document.definitions.contains_key("Item"));
//! ```

pub mod cli;
pub mod definitions;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod openapi_builder;
pub mod path_template;
pub mod route;
pub mod schema_generator;
pub mod serializer;
pub mod source;
pub mod type_resolver;
