use crate::path_template::PathTemplate;
use crate::route::{ApiDefinition, ApiInfo, HttpMethod, RouteDeclaration, RouteGroup};
use crate::schema_generator::{Schema, SchemaGenerator};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Description attached to every generated 200 response.
pub const SUCCESS_DESCRIPTION: &str = "A successful response.";

const JSON_MEDIA_TYPE: &str = "application/json";

/// Swagger document builder
pub struct SwaggerBuilder {
    info: ApiInfo,
    /// Paths collection (URL template -> PathItem)
    paths: BTreeMap<String, PathItem>,
    /// Definitions referenced by query and body parameters
    request_refs: BTreeSet<String>,
}

/// Swagger Info object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
}

/// Swagger PathItem object - all operations for a single path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
}

/// Swagger Operation object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    pub responses: BTreeMap<String, Response>,
}

/// Where a parameter is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Body,
}

/// Swagger Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    /// Scalar type, used by path parameters
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    /// Schema, used by query and body parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Swagger Response object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    pub schema: Schema,
}

/// Complete Swagger 2.0 document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwaggerDocument {
    pub swagger: String,
    pub schemes: Vec<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub info: Info,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    pub paths: BTreeMap<String, PathItem>,
    pub definitions: BTreeMap<String, Schema>,
}

impl Parameter {
    /// Required string parameter taken from the URL path
    pub fn path(name: &str, description: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            location: ParameterLocation::Path,
            required: true,
            param_type: Some("string".to_string()),
            schema: None,
            description: description.map(str::to_string),
        }
    }

    /// Required parameter whose value is described by `schema`; named after its location
    fn with_schema(location: ParameterLocation, schema: Schema) -> Self {
        let name = match location {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Body => "body",
        };
        Self {
            name: name.to_string(),
            location,
            required: true,
            param_type: None,
            schema: Some(schema),
            description: None,
        }
    }
}

impl PathItem {
    /// Puts `operation` into the slot for `method`, returning what was there before.
    pub fn set_operation(&mut self, method: HttpMethod, operation: Operation) -> Option<Operation> {
        let slot = match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Delete => &mut self.delete,
        };
        slot.replace(operation)
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }
}

impl SwaggerBuilder {
    pub fn new() -> Self {
        debug!("Initializing SwaggerBuilder");
        Self {
            info: ApiInfo::default(),
            paths: BTreeMap::new(),
            request_refs: BTreeSet::new(),
        }
    }

    pub fn with_info(mut self, info: ApiInfo) -> Self {
        self.info = info;
        self
    }

    /// Render a standalone route into the paths map
    pub fn add_route(&mut self, route: &RouteDeclaration, schema_gen: &mut SchemaGenerator) {
        self.render_route(route, &route.path, schema_gen);
    }

    /// Render every route of a group, prefixed with the group path
    pub fn add_group(&mut self, group: &RouteGroup, schema_gen: &mut SchemaGenerator) {
        debug!("Adding group {} ({} routes)", group.path, group.routes.len());
        for route in &group.routes {
            let path = format!("{}{}", group.path, route.path);
            self.render_route(route, &path, schema_gen);
        }
    }

    fn render_route(&mut self, route: &RouteDeclaration, path: &str, schema_gen: &mut SchemaGenerator) {
        debug!("Adding route: {} {}", route.method, path);

        // Resolve payload types first so every $ref below has a definition
        let query = route.query.as_ref().map(|ty| schema_gen.resolve(ty));
        let body = route.body.as_ref().map(|ty| schema_gen.resolve(ty));
        let response = route
            .response
            .as_ref()
            .map(|ty| schema_gen.resolve(ty))
            .unwrap_or_default();

        let template = PathTemplate::parse(path, &route.properties);
        let mut parameters = template.parameters;
        if let Some(schema) = query {
            parameters.push(Parameter::with_schema(ParameterLocation::Query, schema));
        }
        if let Some(schema) = body {
            parameters.push(Parameter::with_schema(ParameterLocation::Body, schema));
        }

        for param in &parameters {
            if let Some(name) = param.schema.as_ref().and_then(Schema::reference_name) {
                self.request_refs.insert(name.to_string());
            }
        }

        let mut responses = BTreeMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: SUCCESS_DESCRIPTION.to_string(),
                schema: response,
            },
        );

        let operation = Operation {
            tags: route.tags.clone(),
            summary: route.summary.clone(),
            description: route.description.clone(),
            parameters,
            responses,
        };

        let path_item = self.paths.entry(template.path).or_default();
        if path_item.set_operation(route.method, operation).is_some() {
            debug!("Replaced existing {} operation for {}", route.method, path);
        }
    }

    /// Definition names referenced by query and body parameters so far
    pub fn request_refs(&self) -> &BTreeSet<String> {
        &self.request_refs
    }

    /// Build the final Swagger document
    pub fn build(self, schema_gen: SchemaGenerator) -> SwaggerDocument {
        debug!("Building final Swagger document");

        let definitions = schema_gen.into_definitions();
        for name in &self.request_refs {
            if !definitions.contains(name) {
                warn!("Parameter references missing definition: {}", name);
            }
        }

        let info = self.info;
        SwaggerDocument {
            swagger: "2.0".to_string(),
            schemes: vec!["http".to_string(), "https".to_string()],
            consumes: vec![JSON_MEDIA_TYPE.to_string()],
            produces: vec![JSON_MEDIA_TYPE.to_string()],
            info: Info {
                title: info.title,
                version: info.version,
                description: info.description,
            },
            host: info.host.filter(|h| !h.is_empty()),
            base_path: info.base_path.filter(|b| !b.is_empty()),
            paths: self.paths,
            definitions: definitions.into_schemas(),
        }
    }
}

impl Default for SwaggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles a Swagger 2.0 document from an API definition.
///
/// Standalone routes are rendered first, then every group in declaration order. A fresh
/// schema generator and builder are created for each call, so concurrent builds share
/// nothing.
///
/// # Arguments
///
/// * `api` - Document info plus the standalone routes and route groups to render
///
/// # Returns
///
/// The complete document. Assembly never fails: unresolvable or missing payload types
/// degrade to generic schemas or are left out, with a warning logged.
///
/// # Example
///
/// ```
/// use swagger_from_routes::openapi_builder::build_document;
/// use swagger_from_routes::route::{ApiDefinition, HttpMethod, RouteDeclaration};
///
/// let api = ApiDefinition::default()
///     .route(RouteDeclaration::new(HttpMethod::Delete, "/users/:id"));
/// let document = build_document(&api);
///
/// let operation = document.paths["/users/{id}"].delete.as_ref().unwrap();
/// assert_eq!(operation.parameters[0].name, "id");
/// ```
pub fn build_document(api: &ApiDefinition) -> SwaggerDocument {
    let mut builder = SwaggerBuilder::new().with_info(api.info.clone());
    let mut schema_gen = SchemaGenerator::new();

    for route in &api.routes {
        builder.add_route(route, &mut schema_gen);
    }
    for group in &api.groups {
        builder.add_group(group, &mut schema_gen);
    }

    builder.build(schema_gen)
}
