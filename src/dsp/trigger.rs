//! Hysteresis comparator for trigger inputs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Schmitt Trigger
===============

A trigger input is a voltage, not a boolean. Real signals are noisy and have
finite slopes, so a single threshold would fire several times while a pulse
crawls past it. A Schmitt trigger uses TWO thresholds instead.

Vocabulary
----------

  low threshold   The signal must fall to or below this to re-arm.
                  Here: 0.1 V.

  high threshold  The signal must reach or exceed this to fire.
                  Here: 1.0 V.

  hysteresis      The gap between the two thresholds. Wiggles inside the
                  gap are ignored because they never cross BOTH lines.

  rising edge     The moment the comparator goes from Low to High. This is
                  the only moment `process` returns true.


The State Machine
-----------------

    ┌─────┐   input >= 1.0 V  (fires)   ┌──────┐
    │ Low │ ──────────────────────────→ │ High │
    └─────┘                             └──────┘
       ↑                                    │
       └────────── input <= 0.1 V ──────────┘

Voltage over time and the resulting detections:

    input:   0.0  2.0  0.5  0.2  2.0  0.05  2.0
    state:   Low  High High High High Low   High
    fires:    .    ✓    .    .    .    .     ✓

The dip to 0.2 V never reaches 0.1 V, so it does not re-arm and the
following 2.0 V does not produce a second detection.
*/

/// Level a trigger must fall to before it can fire again.
pub const TRIGGER_LOW: f32 = 0.1;
/// Level a trigger must reach to fire.
pub const TRIGGER_HIGH: f32 = 1.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    /// Armed: waiting for the signal to reach the high threshold.
    #[default]
    Low,
    /// Fired: waiting for the signal to fall back to the low threshold.
    High,
}

/// Rising-edge detector with explicit hysteresis state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchmittTrigger {
    state: TriggerState,
}

impl SchmittTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample. Returns true only on the tick the signal crosses
    /// into the high state.
    #[inline]
    pub fn process(&mut self, input: f32) -> bool {
        match self.state {
            TriggerState::Low => {
                if input >= TRIGGER_HIGH {
                    self.state = TriggerState::High;
                    return true;
                }
            }
            TriggerState::High => {
                if input <= TRIGGER_LOW {
                    self.state = TriggerState::Low;
                }
            }
        }
        false
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn is_high(&self) -> bool {
        self.state == TriggerState::High
    }

    pub fn reset(&mut self) {
        self.state = TriggerState::Low;
    }
}
