//! Standard module types.
//!
//! The runtime only needs descriptors; these are the ones a stock patch can
//! use. Hosts with their own modules register extra descriptors next to (or
//! instead of) this list.

/// `Add` and `Multiply`.
pub mod math;
/// `Sine`, `Saw` and `Square` oscillators.
pub mod oscillator;
/// `Pan` (mono to stereo) and `StereoAdd`.
pub mod pan;
/// Linear range mapping.
pub mod rescaler;

use crate::{graph::Constant, patch::ModuleDescriptor};

pub use math::{Add, Multiply};
pub use oscillator::{Oscillator, Waveform};
pub use pan::{Pan, StereoAdd};
pub use rescaler::Rescaler;

/// Every standard descriptor, `Constant` included. The built-in `Input` is
/// added by the registry itself.
pub fn descriptors() -> Vec<ModuleDescriptor> {
    vec![
        Constant::descriptor(),
        Oscillator::descriptor(Waveform::Sine),
        Oscillator::descriptor(Waveform::Saw),
        Oscillator::descriptor(Waveform::Square),
        Add::descriptor(),
        Multiply::descriptor(),
        Rescaler::descriptor(),
        Pan::descriptor(),
        StereoAdd::descriptor(),
    ]
}
