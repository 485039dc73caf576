//! Building blocks of a running patch.
//!
//! A patch is a directed acyclic graph of modules, each producing one block
//! of samples per logical timestamp. Consumers pull from their inputs, and
//! every node memoizes its last block so shared producers are computed once.

/// Broadcast-value node, also used for inline numeric literals.
pub mod constant;
/// Built-in control-input node and the host control collaborator.
pub mod input;
/// Evaluation contract, range contract and shared module handles.
pub mod node;
/// Name to instance ownership map.
pub mod table;

pub use constant::Constant;
pub use input::{ControlSource, HeldControls, Input};
pub use node::{Module, ModuleRef, OutputRange};
pub use table::Graph;
