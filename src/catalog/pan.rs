use crate::{
    error::Result,
    graph::{Module, ModuleRef, OutputRange},
    patch::{ModuleDescriptor, ParamKind},
};

/*
Mono to Stereo
==============

Pan is the only way into the stereo side of a patch; nothing up-mixes
implicitly. Position runs from -1 (hard left) to +1 (hard right) and uses a
linear law:

  left  = x · (1 − p) / 2
  right = x · (1 + p) / 2

At p = 0 each side carries half the signal. Like the linear crossfade in a
simple mixer, the centre is quieter than either edge.

StereoAdd sums two stereo signals channel by channel.
*/

pub struct Pan {
    input: ModuleRef,
    position: ModuleRef,
}

impl Pan {
    pub fn new(input: ModuleRef, position: ModuleRef) -> Self {
        Self { input, position }
    }

    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new("Pan", |params| {
            Ok(Box::new(Pan::new(params.module(0)?, params.module(1)?)))
        })
        .with_param("input", ParamKind::Module)
        .with_param("position", ParamKind::Module)
    }
}

impl Module for Pan {
    fn name(&self) -> &str {
        "Pan"
    }

    fn output_range(&self) -> OutputRange {
        // each side is the input times a gain in [0, 1]
        let input = self.input.output_range();
        OutputRange::new(input.min.min(0.0), input.max.max(0.0))
    }

    fn validate_input_range(&self) -> Result<()> {
        self.validate_within(&self.position, OutputRange::BIPOLAR)
    }

    fn is_stereo(&self) -> bool {
        true
    }

    fn fill(&mut self, timestamp: u64, out: &mut [f32]) -> Result<()> {
        let frames = out.len() / 2;
        let input = self.input.output(timestamp, frames)?;
        let position = self.position.output(timestamp, frames)?;

        for ((frame, &x), &p) in out.chunks_exact_mut(2).zip(input.iter()).zip(position.iter()) {
            frame[0] = x * ((1.0 - p) * 0.5);
            frame[1] = x * ((1.0 + p) * 0.5);
        }
        Ok(())
    }
}

pub struct StereoAdd {
    a: ModuleRef,
    b: ModuleRef,
}

impl StereoAdd {
    pub fn new(a: ModuleRef, b: ModuleRef) -> Self {
        Self { a, b }
    }

    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new("StereoAdd", |params| {
            Ok(Box::new(StereoAdd::new(params.stereo(0)?, params.stereo(1)?)))
        })
        .with_param("a", ParamKind::StereoModule)
        .with_param("b", ParamKind::StereoModule)
    }
}

impl Module for StereoAdd {
    fn name(&self) -> &str {
        "StereoAdd"
    }

    fn output_range(&self) -> OutputRange {
        let a = self.a.output_range();
        let b = self.b.output_range();
        OutputRange::new(a.min + b.min, a.max + b.max)
    }

    fn is_stereo(&self) -> bool {
        true
    }

    fn fill(&mut self, timestamp: u64, out: &mut [f32]) -> Result<()> {
        let frames = out.len() / 2;
        let a = self.a.output(timestamp, frames)?;
        let b = self.b.output(timestamp, frames)?;

        for ((o, a), b) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
            *o = a + b;
        }
        Ok(())
    }
}
