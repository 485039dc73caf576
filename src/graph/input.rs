use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::{
    error::Result,
    graph::node::{Module, OutputRange},
    patch::{ModuleDescriptor, ParamKind},
};

/// Axis reporting touch pressure; the only unipolar one.
pub const PRESSURE_AXIS: i64 = 2;

/// Range a control axis promises to stay within.
pub fn axis_range(axis: i64) -> OutputRange {
    if axis == PRESSURE_AXIS {
        OutputRange::UNIPOLAR
    } else {
        OutputRange::BIPOLAR
    }
}

/// Host-side source of control signals (pointer position, pressure, ...).
///
/// Implementations must keep samples within [`axis_range`].
pub trait ControlSource {
    fn sample_axis(&self, axis: i64, out: &mut [f32]);
}

/// Control source that holds one value per axis until it is changed.
///
/// Unset axes read as zero.
#[derive(Debug, Default)]
pub struct HeldControls {
    values: RefCell<BTreeMap<i64, f32>>,
}

impl HeldControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an axis, clamped into its declared range.
    pub fn set(&self, axis: i64, value: f32) {
        let range = axis_range(axis);
        self.values
            .borrow_mut()
            .insert(axis, value.clamp(range.min, range.max));
    }

    pub fn get(&self, axis: i64) -> f32 {
        self.values.borrow().get(&axis).copied().unwrap_or(0.0)
    }
}

impl ControlSource for HeldControls {
    fn sample_axis(&self, axis: i64, out: &mut [f32]) {
        out.fill(self.get(axis));
    }
}

/// Built-in module exposing one control axis as a mono signal.
pub struct Input {
    axis: i64,
    controls: Rc<dyn ControlSource>,
}

impl Input {
    pub const TYPE_NAME: &'static str = "Input";

    pub fn new(axis: i64, controls: Rc<dyn ControlSource>) -> Self {
        Self { axis, controls }
    }

    /// Descriptor for `Input name(axis)`, bound to the host's controls.
    pub fn descriptor(controls: Rc<dyn ControlSource>) -> ModuleDescriptor {
        ModuleDescriptor::new(Self::TYPE_NAME, move |params| {
            Ok(Box::new(Input::new(params.int(0)?, controls.clone())))
        })
        .with_param("axis", ParamKind::Int)
    }
}

impl Module for Input {
    fn name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn output_range(&self) -> OutputRange {
        axis_range(self.axis)
    }

    fn fill(&mut self, _timestamp: u64, out: &mut [f32]) -> Result<()> {
        self.controls.sample_axis(self.axis, out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::ModuleRef;

    #[test]
    fn held_values_are_clamped_per_axis() {
        let controls = HeldControls::new();
        controls.set(0, 3.0);
        controls.set(PRESSURE_AXIS, -0.5);

        assert_eq!(controls.get(0), 1.0);
        assert_eq!(controls.get(PRESSURE_AXIS), 0.0);
        assert_eq!(controls.get(7), 0.0);
    }

    #[test]
    fn input_reads_current_axis_value() {
        let controls = Rc::new(HeldControls::new());
        let node = ModuleRef::new(Input::new(1, controls.clone()));

        controls.set(1, -0.5);
        assert!(node.output(1, 32).unwrap().iter().all(|&s| s == -0.5));

        controls.set(1, 0.75);
        assert!(node.output(2, 32).unwrap().iter().all(|&s| s == 0.75));
    }

    #[test]
    fn pressure_axis_is_unipolar() {
        let controls = Rc::new(HeldControls::new());
        let pressure = Input::new(PRESSURE_AXIS, controls.clone());
        let x = Input::new(0, controls);

        assert_eq!(pressure.output_range(), OutputRange::UNIPOLAR);
        assert_eq!(x.output_range(), OutputRange::BIPOLAR);
    }
}
