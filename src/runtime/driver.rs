//! Driver - pulls the `output` instance once per block
//!
//! The driver owns the only clock in the system: a block counter that goes
//! up by one per production call. Every module downstream sees that counter
//! as its timestamp, which is what makes per-block memoization work.

use std::cell::Ref;

use tracing::{info, trace};

use crate::{
    error::{Error, Result},
    graph::{Graph, ModuleRef},
    io::converter::stereo_to_pcm16,
    MAX_BLOCK_SIZE,
};

/// Instance name the driver plays.
pub const OUTPUT_NAME: &str = "output";

pub struct Driver {
    output: ModuleRef,
    clock: u64,
}

impl Driver {
    /// Resolve `output` in a fully parsed graph.
    ///
    /// Fails before any block is produced if the instance is missing or mono.
    pub fn new(graph: &Graph) -> Result<Self> {
        let output = graph.get(OUTPUT_NAME).ok_or(Error::NoOutputModule)?;
        if !output.is_stereo() {
            return Err(Error::OutputNotStereo);
        }

        info!(
            module = %output.name(),
            instances = graph.len(),
            literals = graph.anonymous_count(),
            "patch ready"
        );

        Ok(Self {
            output: output.clone(),
            clock: 0,
        })
    }

    /// Blocks produced so far; also the timestamp of the next block.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn output(&self) -> &ModuleRef {
        &self.output
    }

    /// Produce the next block as interleaved stereo floats.
    pub fn render(&mut self, frames: usize) -> Result<Ref<'_, [f32]>> {
        let timestamp = self.clock;
        self.clock += 1;
        trace!(timestamp, frames, "rendering block");
        self.output.output(timestamp, frames)
    }

    /// Produce the next block as interleaved 16-bit PCM.
    ///
    /// Renders `out.len() / 2` frames (at most [`MAX_BLOCK_SIZE`]) and
    /// returns the frame count.
    pub fn render_pcm(&mut self, out: &mut [i16]) -> Result<usize> {
        let frames = (out.len() / 2).min(MAX_BLOCK_SIZE);
        let block = self.render(frames)?;
        stereo_to_pcm16(&block, &mut out[..frames * 2]);
        Ok(frames)
    }

    /// Produce `blocks` blocks and discard them; attached recorders still
    /// capture everything.
    pub fn run_offline(&mut self, blocks: u64, frames: usize) -> Result<()> {
        for _ in 0..blocks {
            self.render(frames)?;
        }
        Ok(())
    }
}
