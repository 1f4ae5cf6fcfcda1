use std::collections::BTreeMap;

use log::info;

use crate::{
    config::{SpaceConfig, SpaceSpec},
    error::{Result, SearchSpaceErr},
    space::{ResNetSpace, SearchSpace},
};

/// Creates a search space from its configuration.
pub type SpaceCtor = fn(&SpaceConfig) -> Result<Box<dyn SearchSpace>>;

fn resnet(config: &SpaceConfig) -> Result<Box<dyn SearchSpace>> {
    Ok(Box::new(ResNetSpace::new(config)?))
}

/// Maps search space names to their constructors.
#[derive(Debug, Default)]
pub struct Registry {
    ctors: BTreeMap<String, SpaceCtor>,
}

impl Registry {
    /// Creates an empty `Registry`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `Registry` with every search space of this crate registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.ctors.insert(ResNetSpace::NAME.to_string(), resnet);
        registry
    }

    /// Registers a new search space.
    ///
    /// # Arguments
    /// * `name` - The name to register the space under.
    /// * `ctor` - The constructor of the space.
    ///
    /// # Returns
    /// An error if the name is already taken.
    pub fn register(&mut self, name: impl Into<String>, ctor: SpaceCtor) -> Result<()> {
        let name = name.into();
        if self.ctors.contains_key(&name) {
            return Err(SearchSpaceErr::DuplicateSpace(name));
        }

        info!("registered search space {name}");
        self.ctors.insert(name, ctor);
        Ok(())
    }

    /// Builds the search space described by `spec`.
    pub fn build(&self, spec: &SpaceSpec) -> Result<Box<dyn SearchSpace>> {
        let ctor = self
            .ctors
            .get(&spec.name)
            .ok_or_else(|| SearchSpaceErr::UnknownSpace(spec.name.clone()))?;

        ctor(&spec.config)
    }

    /// Returns the registered names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ctors.keys().map(String::as_str)
    }
}
