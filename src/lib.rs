pub mod catalog; // Standard module descriptors (oscillators, arithmetic, panning)
pub mod error;
pub mod graph; // Module evaluation contract and the instance table
pub mod io;
pub mod patch; // Registry and patch-text parser
pub mod runtime; // Block clock and output driver

pub use error::{Error, Result};
pub use graph::{Graph, Module, ModuleRef, OutputRange};
pub use patch::{ModuleDescriptor, ParamKind, ParamValue, Params, Registry};
pub use runtime::Driver;

/// Largest block, in frames, any module can produce in one evaluation.
pub const MAX_BLOCK_SIZE: usize = 4000;
pub const SAMPLE_RATE: u32 = 44_100;
pub(crate) const NYQUIST: f32 = SAMPLE_RATE as f32 / 2.0;
