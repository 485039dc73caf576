use crate::{
    error::Result,
    graph::{Module, ModuleRef, OutputRange},
    patch::{ModuleDescriptor, ParamKind},
};

/// Maps its input's declared range linearly onto `[low, high]`.
///
/// `Rescaler pitch(lfo, 200, 400)` turns a [-1, 1] LFO into 200..400 Hz.
/// `low` may exceed `high` to invert the signal. An input with a
/// single-valued range maps to `low`.
pub struct Rescaler {
    input: ModuleRef,
    low: f32,
    high: f32,
}

impl Rescaler {
    pub fn new(input: ModuleRef, low: f32, high: f32) -> Self {
        Self { input, low, high }
    }

    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new("Rescaler", |params| {
            Ok(Box::new(Rescaler::new(
                params.module(0)?,
                params.float(1)?,
                params.float(2)?,
            )))
        })
        .with_param("input", ParamKind::Module)
        .with_param("min", ParamKind::Float)
        .with_param("max", ParamKind::Float)
    }
}

impl Module for Rescaler {
    fn name(&self) -> &str {
        "Rescaler"
    }

    fn output_range(&self) -> OutputRange {
        OutputRange::new(self.low.min(self.high), self.low.max(self.high))
    }

    fn fill(&mut self, timestamp: u64, out: &mut [f32]) -> Result<()> {
        let from = self.input.output_range();
        let to = self.output_range();
        let span = from.max - from.min;
        let scale = if span > 0.0 {
            (self.high - self.low) / span
        } else {
            0.0
        };

        let input = self.input.output(timestamp, out.len())?;
        for (o, &x) in out.iter_mut().zip(input.iter()) {
            // clamp away rounding at the edges of the range
            *o = (self.low + (x - from.min) * scale).clamp(to.min, to.max);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::graph::{HeldControls, Input};

    fn axis(value: f32) -> ModuleRef {
        let controls = Rc::new(HeldControls::new());
        controls.set(0, value);
        ModuleRef::new(Input::new(0, controls))
    }

    #[test]
    fn maps_bipolar_onto_target() {
        for (x, expected) in [(-1.0, 200.0), (0.0, 300.0), (1.0, 400.0)] {
            let node = ModuleRef::new(Rescaler::new(axis(x), 200.0, 400.0));
            let block = node.output(1, 4).unwrap();
            assert!((block[0] - expected).abs() < 1e-3, "{x} -> {}", block[0]);
        }
    }

    #[test]
    fn inverted_target() {
        let node = ModuleRef::new(Rescaler::new(axis(1.0), 1.0, 0.0));

        assert_eq!(node.output_range(), OutputRange::UNIPOLAR);
        assert_eq!(node.output(1, 4).unwrap()[0], 0.0);
    }
}
