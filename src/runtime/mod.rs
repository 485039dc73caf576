//! Runtime for playing a parsed patch.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use patchbay::{graph::HeldControls, patch::parse_patch, Driver, Graph, Registry};
//!
//! let registry = Registry::standard(Rc::new(HeldControls::new()));
//! let mut graph = Graph::new();
//! parse_patch(&registry, &mut graph, "Sine tone(440)\nPan output(tone, 0)\n").unwrap();
//!
//! let mut driver = Driver::new(&graph).unwrap();
//! let mut pcm = vec![0i16; 512 * 2];
//! driver.render_pcm(&mut pcm).unwrap();
//! ```

mod driver;

pub use driver::{Driver, OUTPUT_NAME};
