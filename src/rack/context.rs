use tracing::{debug, warn};

use crate::{
    error::{RackError, Result},
    modules::{
        layout::ModuleLayout,
        module::{InputId, LightId, ModuleIo, OutputId, ParamId, ProcessArgs, RackModule},
    },
    rack::{handle::ParamReceiver, poly::PolyVoltage},
};

/// Owned parameter, port and light storage for one module instance.
///
/// This is the reference host: it implements `ModuleIo` over plain arrays
/// sized from the module's layout. All storage is allocated up front in
/// `new`; nothing on the tick path allocates.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    layout: &'static ModuleLayout,
    params: Vec<f32>,
    inputs: Vec<PolyVoltage>,
    outputs: Vec<PolyVoltage>,
    output_connected: Vec<bool>,
    lights: Vec<f32>,
}

impl ModuleContext {
    pub fn new(layout: &'static ModuleLayout) -> Self {
        debug!(
            module = layout.name,
            params = layout.params.len(),
            inputs = layout.inputs.len(),
            outputs = layout.outputs.len(),
            lights = layout.lights.len(),
            "module context created"
        );

        Self {
            layout,
            params: layout.default_params().collect(),
            inputs: vec![PolyVoltage::new(); layout.inputs.len()],
            outputs: vec![PolyVoltage::new(); layout.outputs.len()],
            output_connected: vec![false; layout.outputs.len()],
            lights: vec![0.0; layout.lights.len()],
        }
    }

    /// Context sized for an existing module.
    pub fn for_module(module: &dyn RackModule) -> Self {
        Self::new(module.layout())
    }

    pub fn layout(&self) -> &'static ModuleLayout {
        self.layout
    }

    /// Run one tick of `module` against this context.
    #[inline]
    pub fn process(&mut self, module: &mut dyn RackModule, args: &ProcessArgs) {
        debug_assert!(std::ptr::eq(module.layout(), self.layout));
        module.process(args, self);
    }

    /// Set a parameter, clamped into its declared range.
    pub fn set_param(&mut self, id: impl Into<ParamId>, value: f32) -> Result<()> {
        let id = id.into();
        let config = self.layout.param(id)?;
        self.params[id.0] = config.clamp(value);
        Ok(())
    }

    pub fn set_param_by_name(&mut self, name: &str, value: f32) -> Result<()> {
        let id = self.layout.param_index(name)?;
        self.set_param(id, value)
    }

    /// Plug a cable carrying `lanes` into an input (or update its voltages).
    ///
    /// Realtime-safe; hosts call this every tick to feed new voltages.
    pub fn set_input(&mut self, id: impl Into<InputId>, lanes: &[f32]) -> Result<()> {
        let id = id.into();
        match self.inputs.get_mut(id.0) {
            Some(port) => port.write_lanes(lanes),
            None => Err(RackError::PortOutOfRange {
                index: id.0,
                count: self.inputs.len(),
            }),
        }
    }

    pub fn disconnect_input(&mut self, id: impl Into<InputId>) {
        if let Some(port) = self.inputs.get_mut(id.into().0) {
            port.disconnect();
        }
    }

    pub fn input(&self, id: impl Into<InputId>) -> Option<&PolyVoltage> {
        self.inputs.get(id.into().0)
    }

    /// Direct access to an input port. Writing lanes through it patches the
    /// input without the lane-count check of `set_input`.
    pub fn input_mut(&mut self, id: impl Into<InputId>) -> Option<&mut PolyVoltage> {
        self.inputs.get_mut(id.into().0)
    }

    /// Mark an output as patched downstream so the module writes it.
    pub fn connect_output(&mut self, id: impl Into<OutputId>) {
        if let Some(flag) = self.output_connected.get_mut(id.into().0) {
            *flag = true;
        }
    }

    pub fn disconnect_output(&mut self, id: impl Into<OutputId>) {
        let id = id.into();
        if let Some(flag) = self.output_connected.get_mut(id.0) {
            *flag = false;
            self.outputs[id.0].disconnect();
        }
    }

    pub fn output(&self, id: impl Into<OutputId>) -> Option<&PolyVoltage> {
        self.outputs.get(id.into().0)
    }

    /// Current brightness of a light (0.0 when out of range).
    pub fn light(&self, id: impl Into<LightId>) -> f32 {
        self.lights.get(id.into().0).copied().unwrap_or(0.0)
    }

    /// Apply every queued parameter change. Returns how many were applied.
    ///
    /// Changes with ids outside the layout are dropped.
    pub fn apply_param_changes(&mut self, rx: &mut impl ParamReceiver) -> usize {
        let mut applied = 0;
        while let Some(change) = rx.pop() {
            match self.set_param(change.param, change.value) {
                Ok(()) => applied += 1,
                Err(err) => warn!(module = self.layout.name, %err, "dropped parameter change"),
            }
        }
        applied
    }
}

impl ModuleIo for ModuleContext {
    #[inline]
    fn param(&self, id: ParamId) -> f32 {
        self.params.get(id.0).copied().unwrap_or(0.0)
    }

    #[inline]
    fn voltage(&self, input: InputId, lane: usize) -> f32 {
        self.inputs
            .get(input.0)
            .map(|port| port.voltage(lane))
            .unwrap_or(0.0)
    }

    #[inline]
    fn is_input_connected(&self, input: InputId) -> bool {
        self.inputs
            .get(input.0)
            .is_some_and(PolyVoltage::is_connected)
    }

    #[inline]
    fn input_channels(&self, input: InputId) -> usize {
        self.inputs
            .get(input.0)
            .map(PolyVoltage::channels)
            .unwrap_or(0)
    }

    #[inline]
    fn is_output_connected(&self, output: OutputId) -> bool {
        self.output_connected.get(output.0).copied().unwrap_or(false)
    }

    #[inline]
    fn set_output_channels(&mut self, output: OutputId, channels: usize) {
        if let Some(port) = self.outputs.get_mut(output.0) {
            port.set_channels(channels);
        }
    }

    #[inline]
    fn set_voltage(&mut self, output: OutputId, lane: usize, volts: f32) {
        if let Some(port) = self.outputs.get_mut(output.0) {
            port.set_voltage(lane, volts);
        }
    }

    #[inline]
    fn set_light(&mut self, light: LightId, brightness: f32) {
        if let Some(slot) = self.lights.get_mut(light.0) {
            *slot = brightness;
        }
    }
}
