use std::{
    cell::{Ref, RefCell},
    fmt,
    path::Path,
    rc::Rc,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    io::wav::WavRecorder,
    MAX_BLOCK_SIZE,
};

/*
Pull Evaluation
===============

Every node in a patch owns one output buffer and remembers the timestamp of
the block it last computed. A consumer asks its inputs for a block by calling
`output(timestamp, frames)`:

  - timestamp newer than the cached one: validate inputs, fill, record, check
  - otherwise: hand back the cached buffer untouched

The driver advances a plain block counter, so the timestamp is a logical
clock rather than wall time. Because every node caches, a producer shared by
several consumers is computed once per block:

      [A] ──┬──→ [B] ──┐
            └──→ [C] ──┴──→ [D]

  D pulls B, B pulls A (A fills). D pulls C, C pulls A (cached).

Buffer shapes:

  mono     N samples
  stereo   2N samples, interleaved L R L R ...

There is no implicit conversion between the two; the parser refuses to wire a
stereo node into a mono slot and vice versa.
*/

/// Closed interval a module promises its samples stay within.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputRange {
    pub min: f32,
    pub max: f32,
}

impl OutputRange {
    /// Audio-style signals, `[-1, 1]`.
    pub const BIPOLAR: Self = Self::new(-1.0, 1.0);
    /// Control signals that never go negative, `[0, 1]`.
    pub const UNIPOLAR: Self = Self::new(0.0, 1.0);

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn point(value: f32) -> Self {
        Self::new(value, value)
    }

    /// NaN is never contained.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// True when every value of `self` also lies in `outer`.
    pub fn within(&self, outer: &OutputRange) -> bool {
        self.min >= outer.min && self.max <= outer.max
    }
}

impl fmt::Display for OutputRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.min, self.max)
    }
}

/// Core trait for patch modules.
///
/// Implementors only compute samples; caching, recording and output checks
/// are handled by [`ModuleRef`].
pub trait Module {
    /// Type name used in error messages (e.g. `"Sine"`).
    fn name(&self) -> &str;

    fn output_range(&self) -> OutputRange;

    /// Check each input's declared range against what this module accepts.
    ///
    /// Default implementation accepts everything (modules without inputs).
    fn validate_input_range(&self) -> Result<()> {
        Ok(())
    }

    /// Compute one block into `out`.
    ///
    /// `out` holds exactly the requested frames: `n` samples for mono
    /// modules, `2n` interleaved samples for stereo ones.
    fn fill(&mut self, timestamp: u64, out: &mut [f32]) -> Result<()>;

    fn is_stereo(&self) -> bool {
        false
    }

    /// Called once with the full, maximum-size buffer when the node is built.
    fn prepare(&mut self, _buffer: &mut [f32]) {}

    /// Fail with `InvalidInputRange` unless `input` stays within `accepted`.
    fn validate_within(&self, input: &ModuleRef, accepted: OutputRange) -> Result<()> {
        let input_range = input.output_range();
        if input_range.within(&accepted) {
            return Ok(());
        }
        Err(Error::InvalidInputRange {
            input: input.name(),
            input_range,
            module: self.name().to_owned(),
            accepted,
        })
    }
}

#[cfg(any(debug_assertions, feature = "contract-checks"))]
const CHECK_OUTPUT_RANGE: bool = true;
#[cfg(not(any(debug_assertions, feature = "contract-checks")))]
const CHECK_OUTPUT_RANGE: bool = false;

struct Node {
    module: Box<dyn Module>,
    buffer: Vec<f32>,
    last_timestamp: Option<u64>,
    recorder: Option<WavRecorder>,
}

impl Node {
    fn new(mut module: Box<dyn Module>) -> Self {
        let channels = if module.is_stereo() { 2 } else { 1 };
        let mut buffer = vec![0.0; MAX_BLOCK_SIZE * channels];
        module.prepare(&mut buffer);

        Self {
            module,
            buffer,
            last_timestamp: None,
            recorder: None,
        }
    }

    fn channels(&self) -> usize {
        if self.module.is_stereo() {
            2
        } else {
            1
        }
    }

    fn is_stale(&self, timestamp: u64) -> bool {
        self.last_timestamp.map_or(true, |last| timestamp > last)
    }

    fn evaluate(&mut self, timestamp: u64, frames: usize) -> Result<()> {
        let len = frames * self.channels();
        let Node {
            module,
            buffer,
            last_timestamp,
            recorder,
        } = self;

        module.validate_input_range()?;

        let block = &mut buffer[..len];
        module.fill(timestamp, block)?;
        *last_timestamp = Some(timestamp);

        if let Some(recorder) = recorder {
            recorder.write_block(block)?;
        }

        if CHECK_OUTPUT_RANGE {
            validate_output_range(module.as_ref(), block)?;
        }

        Ok(())
    }
}

fn validate_output_range(module: &dyn Module, block: &[f32]) -> Result<()> {
    let range = module.output_range();
    match block.iter().find(|&&sample| !range.contains(sample)) {
        Some(&value) => Err(Error::InvalidOutputRange {
            module: module.name().to_owned(),
            range,
            value,
        }),
        None => Ok(()),
    }
}

/// Shared handle to a module and its cached output.
///
/// Cloning is cheap; every clone refers to the same node. The instance table
/// owns the nodes, parameter slots only borrow them through these handles.
#[derive(Clone)]
pub struct ModuleRef(Rc<RefCell<Node>>);

impl ModuleRef {
    pub fn new(module: impl Module + 'static) -> Self {
        Self::from_boxed(Box::new(module))
    }

    pub fn from_boxed(module: Box<dyn Module>) -> Self {
        Self(Rc::new(RefCell::new(Node::new(module))))
    }

    /// Return this module's block for `timestamp`, computing it only if
    /// `timestamp` is newer than the last one evaluated.
    ///
    /// `frames` is clamped to [`MAX_BLOCK_SIZE`]. Stereo modules return
    /// `2 * frames` interleaved samples.
    pub fn output(&self, timestamp: u64, frames: usize) -> Result<Ref<'_, [f32]>> {
        let frames = frames.min(MAX_BLOCK_SIZE);

        // Check with a shared borrow first: a module may list the same input
        // twice and still hold the first block while asking for the second.
        let stale = self.0.borrow().is_stale(timestamp);
        if stale {
            self.0.borrow_mut().evaluate(timestamp, frames)?;
        }

        Ok(Ref::map(self.0.borrow(), |node| {
            &node.buffer[..frames * node.channels()]
        }))
    }

    pub fn name(&self) -> String {
        self.0.borrow().module.name().to_owned()
    }

    pub fn output_range(&self) -> OutputRange {
        self.0.borrow().module.output_range()
    }

    pub fn is_stereo(&self) -> bool {
        self.0.borrow().module.is_stereo()
    }

    pub fn last_timestamp(&self) -> Option<u64> {
        self.0.borrow().last_timestamp
    }

    /// Attach a WAV recorder that captures every block this module computes.
    ///
    /// A module carries at most one recorder; later requests keep the first.
    pub fn record(&self, path: impl AsRef<Path>, scaler: f32) -> Result<()> {
        let path = path.as_ref();
        let mut node = self.0.borrow_mut();
        if node.recorder.is_some() {
            warn!(module = node.module.name(), path = %path.display(), "module is already recording");
            return Ok(());
        }

        let channels = node.channels() as u16;
        node.recorder = Some(WavRecorder::create(path, channels, scaler)?);
        debug!(module = node.module.name(), path = %path.display(), channels, "recording attached");
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.0.borrow().recorder.is_some()
    }

    /// Flush and close the recorder, if any, so the file is final on disk.
    pub fn stop_recording(&self) -> Result<()> {
        let recorder = self.0.borrow_mut().recorder.take();
        match recorder {
            Some(recorder) => Ok(recorder.finish()?),
            None => Ok(()),
        }
    }

    pub fn ptr_eq(&self, other: &ModuleRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("ModuleRef")
            .field("name", &node.module.name())
            .field("stereo", &node.module.is_stereo())
            .field("last_timestamp", &node.last_timestamp)
            .finish()
    }
}
