use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};
#[cfg(feature = "rtrb")]
use tracing::warn;

use crate::modules::module::ParamId;
#[cfg(feature = "rtrb")]
use crate::{
    error::{RackError, Result},
    modules::layout::ModuleLayout,
};

/// A parameter write travelling from a control thread to the audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParamChange {
    pub param: ParamId,
    pub value: f32,
}

impl ParamChange {
    pub fn new(param: impl Into<ParamId>, value: f32) -> Self {
        Self {
            param: param.into(),
            value,
        }
    }
}

/// Source of pending parameter changes, drained once per block or tick.
pub trait ParamReceiver {
    fn pop(&mut self) -> Option<ParamChange>;
}

impl ParamReceiver for VecDeque<ParamChange> {
    fn pop(&mut self) -> Option<ParamChange> {
        self.pop_front()
    }
}

#[cfg(feature = "rtrb")]
impl ParamReceiver for Consumer<ParamChange> {
    fn pop(&mut self) -> Option<ParamChange> {
        Consumer::pop(self).ok()
    }
}

/// Control-thread end of a parameter queue.
#[cfg(feature = "rtrb")]
pub struct ParamHandle {
    tx: Producer<ParamChange>,
    layout: &'static ModuleLayout,
}

/// Audio-thread end of a parameter queue.
#[cfg(feature = "rtrb")]
pub struct ParamQueue {
    rx: Consumer<ParamChange>,
}

/// Create a lock-free single-producer/single-consumer parameter queue for
/// one module.
#[cfg(feature = "rtrb")]
pub fn param_queue(layout: &'static ModuleLayout, capacity: usize) -> (ParamHandle, ParamQueue) {
    let (tx, rx) = RingBuffer::<ParamChange>::new(capacity);
    (ParamHandle { tx, layout }, ParamQueue { rx })
}

#[cfg(feature = "rtrb")]
impl ParamHandle {
    /// Queue a change. The value is clamped when the audio thread applies it.
    pub fn set(&mut self, param: impl Into<ParamId>, value: f32) -> Result<()> {
        let param = param.into();
        self.layout.param(param)?;

        self.tx.push(ParamChange { param, value }).map_err(|_| {
            warn!(module = self.layout.name, param = param.0, "parameter queue full");
            RackError::QueueFull
        })
    }

    /// Queue a change addressed by parameter name.
    pub fn set_by_name(&mut self, name: &str, value: f32) -> Result<()> {
        let param = self.layout.param_index(name)?;
        self.set(param, value)
    }

    pub fn layout(&self) -> &'static ModuleLayout {
        self.layout
    }
}

#[cfg(feature = "rtrb")]
impl ParamReceiver for ParamQueue {
    fn pop(&mut self) -> Option<ParamChange> {
        self.rx.pop().ok()
    }
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use super::*;
    use crate::modules::layout::ParamConfig;

    static LAYOUT: ModuleLayout = ModuleLayout {
        name: "Knobs",
        params: &[
            ParamConfig::new("Attack", 0.0, 1.0, 0.5),
            ParamConfig::new("Release", 0.0, 1.0, 0.5),
        ],
        inputs: &[],
        outputs: &[],
        lights: &[],
    };

    #[test]
    fn changes_arrive_in_order() {
        let (mut handle, mut queue) = param_queue(&LAYOUT, 8);
        handle.set(ParamId(0), 0.1).unwrap();
        handle.set_by_name("release", 0.9).unwrap();

        assert_eq!(queue.pop(), Some(ParamChange::new(ParamId(0), 0.1)));
        assert_eq!(queue.pop(), Some(ParamChange::new(ParamId(1), 0.9)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn full_queue_reports_error() {
        let (mut handle, _queue) = param_queue(&LAYOUT, 1);
        handle.set(ParamId(0), 0.1).unwrap();
        assert_eq!(handle.set(ParamId(0), 0.2), Err(RackError::QueueFull));
    }

    #[test]
    fn bad_ids_never_reach_the_queue() {
        let (mut handle, mut queue) = param_queue(&LAYOUT, 4);
        assert!(handle.set(ParamId(2), 0.1).is_err());
        assert!(handle.set_by_name("Sustain", 0.1).is_err());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn queue_moves_across_threads() {
        let (mut handle, mut queue) = param_queue(&LAYOUT, 64);
        let producer = std::thread::spawn(move || {
            for i in 0..32 {
                handle.set(ParamId(0), i as f32 / 32.0).unwrap();
            }
        });
        producer.join().unwrap();

        let mut received = 0;
        while queue.pop().is_some() {
            received += 1;
        }
        assert_eq!(received, 32);
    }
}
