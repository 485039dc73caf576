//! From patch text to a graph of live modules.
//!
//! The [`Registry`] says which module types exist and what parameters they
//! take; the parser walks a patch line by line, type-checks each parameter
//! against that schema and stores the instantiated module in a
//! [`Graph`](crate::graph::Graph).

pub mod parser;
pub mod registry;

pub use parser::{load_patch, parse_patch, PatchParser};
pub use registry::{Factory, ModuleDescriptor, ParamKind, ParamSpec, ParamValue, Params, Registry};
