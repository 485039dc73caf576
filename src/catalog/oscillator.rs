use std::f32::consts::TAU;

use crate::{
    error::Result,
    graph::{Module, ModuleRef, OutputRange},
    patch::{ModuleDescriptor, ParamKind},
    NYQUIST, SAMPLE_RATE,
};

/*
Audio Oscillator
================

An oscillator turns a frequency signal into a repeating waveform. The
frequency is itself a module, so it can be a literal (`Sine a(440)`), a
control input, or another oscillator doing vibrato.

Phase accumulator:
  phase advances by frequency / sample_rate every sample and wraps at 1.0.
  Each waveform is a function of phase only:

    Sine     sin(2π · phase)
    Saw      2 · phase − 1          rising ramp, snaps down at wrap
    Square   +1 below 0.5, −1 above

All three stay in [-1, 1]. Frequencies are accepted between 0 Hz and Nyquist
(22050 Hz); anything declared wider fails input validation before the block
is computed.

No band-limiting: saw and square alias at high pitches.
*/

/// Frequencies an oscillator accepts.
pub const FREQUENCY_RANGE: OutputRange = OutputRange::new(0.0, NYQUIST);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Saw,
    Square,
}

impl Waveform {
    pub fn type_name(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Saw => "Saw",
            Waveform::Square => "Square",
        }
    }

    #[inline]
    fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

pub struct Oscillator {
    waveform: Waveform,
    frequency: ModuleRef,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: ModuleRef) -> Self {
        Self {
            waveform,
            frequency,
            phase: 0.0,
        }
    }

    pub fn descriptor(waveform: Waveform) -> ModuleDescriptor {
        ModuleDescriptor::new(waveform.type_name(), move |params| {
            Ok(Box::new(Oscillator::new(waveform, params.module(0)?)))
        })
        .with_param("frequency", ParamKind::Module)
    }
}

impl Module for Oscillator {
    fn name(&self) -> &str {
        self.waveform.type_name()
    }

    fn output_range(&self) -> OutputRange {
        OutputRange::BIPOLAR
    }

    fn validate_input_range(&self) -> Result<()> {
        self.validate_within(&self.frequency, FREQUENCY_RANGE)
    }

    fn fill(&mut self, timestamp: u64, out: &mut [f32]) -> Result<()> {
        let frequency = self.frequency.output(timestamp, out.len())?;
        let step = 1.0 / SAMPLE_RATE as f32;

        for (o, &hz) in out.iter_mut().zip(frequency.iter()) {
            *o = self.waveform.sample(self.phase);
            self.phase += hz * step;
            if self.phase >= 1.0 {
                self.phase -= self.phase.floor();
            }
        }
        Ok(())
    }
}
