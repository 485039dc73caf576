use crate::{
    error::Result,
    graph::node::{Module, OutputRange},
    patch::{ModuleDescriptor, ParamKind},
};

/// Broadcasts one value for ever.
///
/// The value is written across the whole buffer once, when the node is
/// built, so `fill` has nothing left to do. The parser also synthesizes an
/// anonymous `Constant` for every numeric literal passed to a module slot.
pub struct Constant {
    value: f32,
}

impl Constant {
    pub const TYPE_NAME: &'static str = "Constant";

    pub fn new(value: f32) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new(Self::TYPE_NAME, |params| {
            Ok(Box::new(Constant::new(params.float(0)?)))
        })
        .with_param("value", ParamKind::Float)
    }
}

impl Module for Constant {
    fn name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn output_range(&self) -> OutputRange {
        OutputRange::point(self.value)
    }

    fn fill(&mut self, _timestamp: u64, _out: &mut [f32]) -> Result<()> {
        Ok(())
    }

    fn prepare(&mut self, buffer: &mut [f32]) {
        buffer.fill(self.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::node::ModuleRef, MAX_BLOCK_SIZE};

    #[test]
    fn broadcasts_across_full_block() {
        let node = ModuleRef::new(Constant::new(0.25));

        let block = node.output(1, MAX_BLOCK_SIZE).unwrap();
        assert!(block.iter().all(|&s| s == 0.25));
        assert_eq!(node.output_range(), OutputRange::point(0.25));
    }

    #[test]
    fn value_survives_repeated_blocks() {
        let node = ModuleRef::new(Constant::new(-3.0));

        for timestamp in 0..4 {
            let block = node.output(timestamp, 128).unwrap();
            assert!(block.iter().all(|&s| s == -3.0));
        }
    }
}
