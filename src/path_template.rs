//! Path parameter extraction from route templates.
//!
//! Routes are declared with `:name` placeholders (`/users/:id`); Swagger wants
//! `{name}`. [`PathTemplate::parse`] rewrites the template and produces one
//! path parameter per placeholder, left to right.

use crate::openapi_builder::Parameter;
use log::debug;
use std::collections::BTreeMap;

/// Placeholder marker used by route declarations.
pub const PARAM_MARKER: char = ':';

/// A route template rewritten into Swagger syntax together with its path parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTemplate {
    /// Template with `{name}` placeholders
    pub path: String,
    pub parameters: Vec<Parameter>,
}

impl PathTemplate {
    /// Parses `path`, attaching descriptions from `properties` keyed by parameter name.
    ///
    /// No syntax validation happens: whatever follows the first marker in a segment is
    /// taken as the parameter name.
    pub fn parse(path: &str, properties: &BTreeMap<String, String>) -> Self {
        let mut parameters = Vec::new();

        let segments: Vec<String> = path
            .split('/')
            .map(|segment| match segment.split_once(PARAM_MARKER) {
                Some((prefix, name)) => {
                    debug!("Found path parameter {} in {}", name, path);
                    let description = properties
                        .get(name)
                        .map(|d| d.trim_matches('"'))
                        .filter(|d| !d.is_empty());
                    parameters.push(Parameter::path(name, description));
                    format!("{}{{{}}}", prefix, name)
                }
                None => segment.to_string(),
            })
            .collect();

        Self {
            path: segments.join("/"),
            parameters,
        }
    }
}
