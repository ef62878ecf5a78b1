//! Route manifest files.
//!
//! A manifest lists the routes an application registers, naming payload types by type
//! expression. Types are looked up through a [`TypeResolver`]:
//!
//! ```yaml
//! info:
//!   title: Users
//!   version: 1.0.0
//! routes:
//!   - method: get
//!     path: /users/:id
//!     summary: Get one user
//!     response: User
//!     properties:
//!       id: '"user id"'
//! groups:
//!   - path: /api
//!     routes:
//!       - method: post
//!         path: /users
//!         body: CreateUser
//!         response: "[]User"
//! ```

use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::route::{ApiDefinition, ApiInfo, HttpMethod, RouteDeclaration, RouteGroup};
use crate::type_resolver::TypeResolver;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteManifest {
    pub info: ManifestInfo,
    pub routes: Vec<ManifestRoute>,
    pub groups: Vec<ManifestGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestInfo {
    pub title: String,
    pub version: String,
    pub description: String,
    pub host: Option<String>,
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestRoute {
    #[serde(default)]
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub query: Option<String>,
    pub body: Option<String>,
    pub response: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestGroup {
    pub path: String,
    #[serde(default)]
    pub routes: Vec<ManifestRoute>,
}

impl Default for ManifestInfo {
    fn default() -> Self {
        let info = ApiInfo::default();
        Self {
            title: info.title,
            version: info.version,
            description: info.description,
            host: info.host,
            base_path: info.base_path,
        }
    }
}

impl RouteManifest {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads a manifest, choosing JSON for `.json` files and YAML otherwise.
    ///
    /// # Arguments
    ///
    /// * `path` - Manifest file; the extension is compared case-insensitively
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoError`] if the file cannot be read and [`Error::ManifestError`]
    /// carrying `path` if its content does not match the manifest layout.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!("Reading route manifest: {}", path.display());
        let content = fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };

        parsed.map_err(|e| Error::ManifestError {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Turn the manifest into an [`ApiDefinition`], resolving every type expression.
    ///
    /// Expressions that do not parse are dropped with a warning, which leaves the
    /// corresponding parameter or response schema out of the document.
    pub fn into_api(self, resolver: &mut TypeResolver) -> ApiDefinition {
        let info = ApiInfo {
            title: self.info.title,
            version: self.info.version,
            description: self.info.description,
            host: self.info.host,
            base_path: self.info.base_path,
        };

        let routes = self
            .routes
            .into_iter()
            .map(|route| route.into_declaration(resolver))
            .collect();

        let groups = self
            .groups
            .into_iter()
            .map(|group| RouteGroup {
                path: group.path,
                routes: group
                    .routes
                    .into_iter()
                    .map(|route| route.into_declaration(resolver))
                    .collect(),
            })
            .collect();

        ApiDefinition {
            info,
            routes,
            groups,
        }
    }
}

impl ManifestRoute {
    fn into_declaration(self, resolver: &mut TypeResolver) -> RouteDeclaration {
        let path = self.path;
        let mut lookup = |expr: Option<String>| -> Option<TypeDescriptor> {
            let expr = expr?;
            match resolver.resolve_expr(&expr) {
                Ok(descriptor) => Some(descriptor),
                Err(e) => {
                    warn!("Skipping type `{}` on route {}: {}", expr, path, e);
                    None
                }
            }
        };

        let query = lookup(self.query);
        let body = lookup(self.body);
        let response = lookup(self.response);

        RouteDeclaration {
            method: HttpMethod::parse(&self.method),
            path,
            summary: self.summary,
            description: self.description,
            tags: self.tags,
            query,
            body,
            response,
            properties: self.properties,
        }
    }
}
