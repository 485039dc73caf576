use std::{collections::HashMap, path::Path};

use tracing::warn;

use crate::{
    error::{Error, Result},
    graph::node::ModuleRef,
};

/// Instance table: every module built from a patch, by name.
///
/// Names keep the order of the lines that first defined them. Redefining a
/// name replaces the binding in place; modules that already captured the old
/// instance keep using it. Anonymous constants synthesized for numeric
/// literals are owned here too, so every node lives exactly as long as the
/// table does.
#[derive(Default)]
pub struct Graph {
    entries: Vec<(String, ModuleRef)>,
    index: HashMap<String, usize>,
    anonymous: Vec<ModuleRef>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, returning the instance it replaced, if any.
    pub fn insert(&mut self, name: impl Into<String>, module: ModuleRef) -> Option<ModuleRef> {
        let name = name.into();
        match self.index.get(&name) {
            Some(&slot) => {
                warn!(instance = %name, "instance redefined, later definition wins");
                Some(std::mem::replace(&mut self.entries[slot].1, module))
            }
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, module));
                None
            }
        }
    }

    pub fn insert_anonymous(&mut self, module: ModuleRef) {
        self.anonymous.push(module);
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRef> {
        self.index.get(name).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of named instances.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn anonymous_count(&self) -> usize {
        self.anonymous.len()
    }

    /// Named instances in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleRef)> {
        self.entries.iter().map(|(name, module)| (name.as_str(), module))
    }

    /// Attach a WAV recorder to the instance called `name`.
    pub fn record(&self, name: &str, path: impl AsRef<Path>, scaler: f32) -> Result<()> {
        self.get(name)
            .ok_or_else(|| Error::UnknownInstance(name.to_owned()))?
            .record(path, scaler)
    }

    /// Finalize every attached recorder.
    pub fn stop_recording(&self) -> Result<()> {
        for (_, module) in self.iter() {
            module.stop_recording()?;
        }
        Ok(())
    }
}
