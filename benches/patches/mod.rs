//! Whole-patch benchmarks.
//!
//! These parse and render patch texts of the kind a user would write,
//! including a producer shared by several consumers.

mod parse;
mod render;

pub use parse::bench_parse;
pub use render::bench_render;

/// Four detuned saws sharing one vibrato LFO.
pub const CHORUS_PATCH: &str = "\
# shared vibrato
Sine lfo(6)
Rescaler wobble(lfo, 0, 2)
Add f1(wobble, 110)
Add f2(wobble, 110.5)
Add f3(wobble, 220)
Add f4(wobble, 220.7)
Saw v1(f1)
Saw v2(f2)
Saw v3(f3)
Saw v4(f4)
Add low(v1, v2)
Add high(v3, v4)
Multiply low_q(low, 0.25)
Multiply high_q(high, 0.25)
Pan left(low_q, 0)
Pan right(high_q, 0.5)
StereoAdd output(left, right)
";
