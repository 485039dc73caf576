use std::{collections::HashMap, fmt, rc::Rc, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    catalog,
    error::{Error, ParseErrorKind, Result},
    graph::{ControlSource, Input, Module, ModuleRef},
};

/// Declared kind of one positional parameter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Float,
    Int,
    /// Mono module reference; numeric literals become anonymous constants.
    Module,
    StereoModule,
    /// Reserved: declared in schemas but not bindable yet.
    String,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Float => "float",
            ParamKind::Int => "int",
            ParamKind::Module => "Module",
            ParamKind::StereoModule => "StereoModule",
            ParamKind::String => "string",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "float" => Ok(ParamKind::Float),
            "int" => Ok(ParamKind::Int),
            "Module" => Ok(ParamKind::Module),
            "StereoModule" => Ok(ParamKind::StereoModule),
            "string" => Ok(ParamKind::String),
            other => Err(Error::UnknownParamKind(other.to_owned())),
        }
    }
}

/// One bound parameter, handed to a factory and then dropped.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Float(f32),
    Int(i64),
    Module(ModuleRef),
    StereoModule(ModuleRef),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Module(_) => ParamKind::Module,
            ParamValue::StereoModule(_) => ParamKind::StereoModule,
        }
    }
}

/// Positional parameters bound against a descriptor's schema.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: Vec<ParamValue>,
}

impl Params {
    pub fn new(values: Vec<ParamValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn float(&self, index: usize) -> Result<f32> {
        match self.values.get(index) {
            Some(ParamValue::Float(value)) => Ok(*value),
            _ => Err(Error::ParameterMismatch {
                index,
                expected: ParamKind::Float,
            }),
        }
    }

    pub fn int(&self, index: usize) -> Result<i64> {
        match self.values.get(index) {
            Some(ParamValue::Int(value)) => Ok(*value),
            _ => Err(Error::ParameterMismatch {
                index,
                expected: ParamKind::Int,
            }),
        }
    }

    pub fn module(&self, index: usize) -> Result<ModuleRef> {
        match self.values.get(index) {
            Some(ParamValue::Module(module)) => Ok(module.clone()),
            _ => Err(Error::ParameterMismatch {
                index,
                expected: ParamKind::Module,
            }),
        }
    }

    pub fn stereo(&self, index: usize) -> Result<ModuleRef> {
        match self.values.get(index) {
            Some(ParamValue::StereoModule(module)) => Ok(module.clone()),
            _ => Err(Error::ParameterMismatch {
                index,
                expected: ParamKind::StereoModule,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
}

pub type Factory = Box<dyn Fn(&Params) -> Result<Box<dyn Module>>>;

/// Type name, ordered parameter schema and factory for one module type.
pub struct ModuleDescriptor {
    type_name: String,
    params: Vec<ParamSpec>,
    factory: Factory,
}

impl ModuleDescriptor {
    pub fn new<F>(type_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Params) -> Result<Box<dyn Module>> + 'static,
    {
        Self {
            type_name: type_name.into(),
            params: Vec::new(),
            factory: Box::new(factory),
        }
    }

    /// Builder form of [`add_parameter`](Self::add_parameter).
    pub fn with_param(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.add_parameter(name, kind);
        self
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, kind: ParamKind) {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
        });
    }

    /// Append a parameter whose kind is given by name (`"float"`,
    /// `"StereoModule"`, ...). An unknown kind leaves the schema untouched.
    pub fn add_parameter_named(&mut self, name: impl Into<String>, kind: &str) -> Result<()> {
        let kind = kind.parse()?;
        self.add_parameter(name, kind);
        Ok(())
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn parameter_count(&self) -> usize {
        self.params.len()
    }

    /// Schema entry `n`, or `TooManyParams` past the end of the schema.
    pub fn parameter(&self, n: usize) -> Result<&ParamSpec, ParseErrorKind> {
        self.params.get(n).ok_or(ParseErrorKind::TooManyParams)
    }

    pub fn parameters(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn instantiate(&self, params: &Params) -> Result<Box<dyn Module>> {
        (self.factory)(params)
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("type_name", &self.type_name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Catalog of module types a patch may instantiate.
///
/// Built once before parsing and only read afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    descriptors: HashMap<String, ModuleDescriptor>,
}

impl Registry {
    /// An empty registry, without even the built-in `Input`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `descriptors` plus the built-in `Input` bound to
    /// `controls`.
    pub fn with_descriptors(
        descriptors: impl IntoIterator<Item = ModuleDescriptor>,
        controls: Rc<dyn ControlSource>,
    ) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry.register(Input::descriptor(controls));
        registry
    }

    /// Registry holding the standard catalog and `Input`.
    pub fn standard(controls: Rc<dyn ControlSource>) -> Self {
        Self::with_descriptors(catalog::descriptors(), controls)
    }

    /// Add a descriptor, returning the one it replaced.
    pub fn register(&mut self, descriptor: ModuleDescriptor) -> Option<ModuleDescriptor> {
        self.descriptors
            .insert(descriptor.type_name.clone(), descriptor)
    }

    pub fn get(&self, type_name: &str) -> Option<&ModuleDescriptor> {
        self.descriptors.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.descriptors.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
