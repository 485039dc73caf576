use crate::{
    error::Result,
    graph::{Module, ModuleRef, OutputRange},
    patch::{ModuleDescriptor, ParamKind},
};

/*
Arithmetic on two signals
=========================

  Add:       a + b     mixing, offsets (`Add biased(lfo, 1)`)
  Multiply:  a × b     gain, ring modulation, VCA

Neither module restricts its inputs; instead the declared output range is
derived from the inputs' ranges, so downstream consumers can still validate
what they receive:

  Add       [a.min + b.min, a.max + b.max]
  Multiply  smallest and largest of the four corner products

Example: a [-1, 1] oscillator times a [0, 0.5] envelope declares [-0.5, 0.5].
*/

pub struct Add {
    a: ModuleRef,
    b: ModuleRef,
}

impl Add {
    pub fn new(a: ModuleRef, b: ModuleRef) -> Self {
        Self { a, b }
    }

    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new("Add", |params| {
            Ok(Box::new(Add::new(params.module(0)?, params.module(1)?)))
        })
        .with_param("a", ParamKind::Module)
        .with_param("b", ParamKind::Module)
    }
}

impl Module for Add {
    fn name(&self) -> &str {
        "Add"
    }

    fn output_range(&self) -> OutputRange {
        let a = self.a.output_range();
        let b = self.b.output_range();
        OutputRange::new(a.min + b.min, a.max + b.max)
    }

    fn fill(&mut self, timestamp: u64, out: &mut [f32]) -> Result<()> {
        let a = self.a.output(timestamp, out.len())?;
        let b = self.b.output(timestamp, out.len())?;

        for ((o, a), b) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
            *o = a + b;
        }
        Ok(())
    }
}

pub struct Multiply {
    a: ModuleRef,
    b: ModuleRef,
}

impl Multiply {
    pub fn new(a: ModuleRef, b: ModuleRef) -> Self {
        Self { a, b }
    }

    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new("Multiply", |params| {
            Ok(Box::new(Multiply::new(params.module(0)?, params.module(1)?)))
        })
        .with_param("a", ParamKind::Module)
        .with_param("b", ParamKind::Module)
    }
}

impl Module for Multiply {
    fn name(&self) -> &str {
        "Multiply"
    }

    fn output_range(&self) -> OutputRange {
        let a = self.a.output_range();
        let b = self.b.output_range();
        let corners = [a.min * b.min, a.min * b.max, a.max * b.min, a.max * b.max];

        OutputRange::new(
            corners.iter().copied().fold(f32::INFINITY, f32::min),
            corners.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        )
    }

    fn fill(&mut self, timestamp: u64, out: &mut [f32]) -> Result<()> {
        let a = self.a.output(timestamp, out.len())?;
        let b = self.b.output(timestamp, out.len())?;

        for ((o, a), b) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
            *o = a * b;
        }
        Ok(())
    }
}
