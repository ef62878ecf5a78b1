use crate::descriptor::FieldDescriptor;
use crate::schema_generator::Schema;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

/// Name-keyed store of compound type schemas for one document build.
///
/// Each name is built at most once per shape. A different shape arriving under a name
/// that is already taken replaces the earlier definition.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    schemas: BTreeMap<String, Schema>,
    /// Field list each definition was built from, used to tell repeats from collisions
    shapes: HashMap<String, Vec<FieldDescriptor>>,
    /// Names that were taken by a different shape, in the order the clashes happened
    collisions: Vec<String>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and stores the schema for `name` unless an identical shape is already there.
    ///
    /// `build` receives the registry so nested compound types can register themselves
    /// before the enclosing definition is inserted.
    pub fn ensure_defined<F>(&mut self, name: &str, shape: &[FieldDescriptor], build: F)
    where
        F: FnOnce(&mut Definitions) -> Schema,
    {
        let same_shape = self
            .shapes
            .get(name)
            .map(|existing| existing.as_slice() == shape);
        match same_shape {
            Some(true) => {
                debug!("Definition for {} already exists", name);
                return;
            }
            Some(false) => self.record_collision(name),
            None => {}
        }

        debug!("Building definition for {}", name);
        let schema = build(self);

        // a nested type sharing the name may have registered itself during the build
        if self
            .shapes
            .get(name)
            .is_some_and(|nested| nested.as_slice() != shape)
        {
            self.record_collision(name);
        }

        self.shapes.insert(name.to_string(), shape.to_vec());
        self.schemas.insert(name.to_string(), schema);
    }

    fn record_collision(&mut self, name: &str) {
        warn!(
            "Definition name collision for {}: replacing the earlier type",
            name
        );
        self.collisions.push(name.to_string());
    }

    /// Names whose definition was replaced by a differently shaped type
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.schemas.iter()
    }

    pub fn into_schemas(self) -> BTreeMap<String, Schema> {
        self.schemas
    }
}
