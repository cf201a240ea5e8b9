use super::layout::ModuleLayout;

/// Timing information for one tick.
///
/// - sample_rate: host sample rate in Hz (e.g., 48000.0)
/// - sample_time: seconds since the previous tick (1 / sample_rate)
/// - frame: ticks processed since the host started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessArgs {
    pub sample_rate: f32,
    pub sample_time: f32,
    pub frame: u64,
}

impl ProcessArgs {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            sample_time: 1.0 / sample_rate,
            frame: 0,
        }
    }

    /// Host changed sample rate between ticks.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.sample_time = 1.0 / sample_rate;
    }

    #[inline]
    pub fn advance(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }
}

/// Index of a parameter within a module's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub usize);

/// Index of an input port within a module's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputId(pub usize);

/// Index of an output port within a module's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputId(pub usize);

/// Index of a status light within a module's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(pub usize);

/// Implement `From<$enum> for $id` for fieldless enums whose declaration
/// order matches the layout order.
macro_rules! port_ids {
    ($($name:ty => $id:ident),* $(,)?) => {
        $(
            impl From<$name> for $crate::modules::module::$id {
                #[inline]
                fn from(value: $name) -> Self {
                    $crate::modules::module::$id(value as usize)
                }
            }
        )*
    };
}
pub(crate) use port_ids;

/// What a module can see of its host during a tick.
///
/// Unconnected inputs read 0 V on every lane. Writes to out-of-range ports
/// or lanes are ignored by the host.
pub trait ModuleIo {
    fn param(&self, id: ParamId) -> f32;

    /// Raw voltage of one lane.
    fn voltage(&self, input: InputId, lane: usize) -> f32;

    /// Voltage of one lane with mono broadcast: a single-lane input reads
    /// the same value for every lane.
    fn poly_voltage(&self, input: InputId, lane: usize) -> f32 {
        if self.input_channels(input) == 1 {
            self.voltage(input, 0)
        } else {
            self.voltage(input, lane)
        }
    }

    fn is_input_connected(&self, input: InputId) -> bool;

    /// Lane count in [0, 16]; 0 when unconnected.
    fn input_channels(&self, input: InputId) -> usize;

    fn is_output_connected(&self, output: OutputId) -> bool;

    fn set_output_channels(&mut self, output: OutputId, channels: usize);

    fn set_voltage(&mut self, output: OutputId, lane: usize, volts: f32);

    fn set_light(&mut self, light: LightId, brightness: f32);
}

/// Core trait for modules driven once per sample by a host.
pub trait RackModule: Send {
    /// Static description of the module's params, ports and lights.
    fn layout(&self) -> &'static ModuleLayout;

    fn process(&mut self, args: &ProcessArgs, io: &mut dyn ModuleIo);

    /// Return to the power-on state.
    ///
    /// Default implementation does nothing (stateless modules).
    fn reset(&mut self) {
        // Default: do nothing
    }
}

/// Allow boxed modules to be used as modules (for dynamic dispatch)
impl RackModule for Box<dyn RackModule> {
    fn layout(&self) -> &'static ModuleLayout {
        (**self).layout()
    }

    fn process(&mut self, args: &ProcessArgs, io: &mut dyn ModuleIo) {
        (**self).process(args, io)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
