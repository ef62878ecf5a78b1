//! Route declarations, the input of document assembly.
//!
//! These are produced by whatever registers routes with the HTTP layer: the
//! [`manifest`](crate::manifest) loader, or application code building an
//! [`ApiDefinition`] directly.

use crate::descriptor::TypeDescriptor;
use std::collections::BTreeMap;
use std::fmt;

/// HTTP methods that map onto a Swagger path item slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Case-insensitive parse; anything unrecognised becomes GET.
    pub fn parse(method: &str) -> Self {
        match method.trim().to_ascii_uppercase().as_str() {
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            _ => HttpMethod::Get,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete information about a single API endpoint.
#[derive(Debug, Clone, Default)]
pub struct RouteDeclaration {
    pub method: HttpMethod,
    /// URL template with `:name` placeholders (e.g. "/users/:id")
    pub path: String,
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Type bound from the query string
    pub query: Option<TypeDescriptor>,
    /// Type bound from the request body
    pub body: Option<TypeDescriptor>,
    /// Type returned on success
    pub response: Option<TypeDescriptor>,
    /// Descriptions of path parameters, keyed by parameter name
    pub properties: BTreeMap<String, String>,
}

impl RouteDeclaration {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn query(mut self, query: TypeDescriptor) -> Self {
        self.query = Some(query);
        self
    }

    pub fn body(mut self, body: TypeDescriptor) -> Self {
        self.body = Some(body);
        self
    }

    pub fn response(mut self, response: TypeDescriptor) -> Self {
        self.response = Some(response);
        self
    }

    pub fn property(mut self, param: impl Into<String>, description: impl Into<String>) -> Self {
        self.properties.insert(param.into(), description.into());
        self
    }
}

/// Routes sharing a path prefix.
#[derive(Debug, Clone, Default)]
pub struct RouteGroup {
    pub path: String,
    pub routes: Vec<RouteDeclaration>,
}

impl RouteGroup {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            routes: Vec::new(),
        }
    }

    pub fn route(mut self, route: RouteDeclaration) -> Self {
        self.routes.push(route);
        self
    }
}

/// Top level document information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    pub description: String,
    pub host: Option<String>,
    pub base_path: Option<String>,
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            title: "Generated API".to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
            host: None,
            base_path: None,
        }
    }
}

/// Everything needed to assemble one document.
#[derive(Debug, Clone, Default)]
pub struct ApiDefinition {
    pub info: ApiInfo,
    pub routes: Vec<RouteDeclaration>,
    pub groups: Vec<RouteGroup>,
}

impl ApiDefinition {
    pub fn new(info: ApiInfo) -> Self {
        Self {
            info,
            ..Self::default()
        }
    }

    pub fn route(mut self, route: RouteDeclaration) -> Self {
        self.routes.push(route);
        self
    }

    pub fn group(mut self, group: RouteGroup) -> Self {
        self.groups.push(group);
        self
    }
}
