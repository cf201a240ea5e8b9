use crate::{
    error::{RackError, Result},
    MAX_CHANNELS,
};

/*
Polyphonic Ports
================

A single cable can carry up to 16 independent voltages ("lanes"). A port
stores all 16 slots plus a lane count; only the first `channels` slots are
meaningful.

    channels = 3
    ┌─────┬─────┬─────┬─────┬─────┬─── ─ ─ ───┐
    │ 1.2 │ -0.4│ 3.0 │ 0.0 │ 0.0 │   ...     │  16 slots
    └─────┴─────┴─────┴─────┴─────┴─── ─ ─ ───┘
      lane0 lane1 lane2  (unused, always 0.0)

Rules kept by this type:
  - Lanes at or above `channels` always read 0.0. Shrinking the lane count
    zeroes the slots it drops.
  - `channels == 0` means "nothing connected".
  - A mono port (one lane) broadcasts: `poly_voltage(c)` returns lane 0 for
    every c. That lets one envelope drive every voice of a poly signal.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyVoltage {
    voltages: [f32; MAX_CHANNELS],
    channels: usize,
}

impl Default for PolyVoltage {
    fn default() -> Self {
        Self::new()
    }
}

impl PolyVoltage {
    /// An unconnected port (zero lanes).
    pub const fn new() -> Self {
        Self {
            voltages: [0.0; MAX_CHANNELS],
            channels: 0,
        }
    }

    pub fn mono(volts: f32) -> Self {
        let mut port = Self::new();
        port.set_channels(1);
        port.voltages[0] = volts;
        port
    }

    /// Build a port carrying exactly these lanes.
    pub fn from_lanes(lanes: &[f32]) -> Result<Self> {
        let mut port = Self::new();
        port.write_lanes(lanes)?;
        Ok(port)
    }

    /// Replace the lane count and contents in one go.
    pub fn write_lanes(&mut self, lanes: &[f32]) -> Result<()> {
        if lanes.len() > MAX_CHANNELS {
            return Err(RackError::InvalidChannelCount(lanes.len()));
        }
        self.set_channels(lanes.len());
        self.voltages[..lanes.len()].copy_from_slice(lanes);
        Ok(())
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.channels > 0
    }

    /// Set the lane count, clamped to 16. Dropped lanes are zeroed.
    pub fn set_channels(&mut self, channels: usize) {
        let channels = channels.min(MAX_CHANNELS);
        for v in &mut self.voltages[channels..] {
            *v = 0.0;
        }
        self.channels = channels;
    }

    #[inline]
    pub fn voltage(&self, lane: usize) -> f32 {
        self.voltages.get(lane).copied().unwrap_or(0.0)
    }

    /// Lane voltage with mono broadcast.
    #[inline]
    pub fn poly_voltage(&self, lane: usize) -> f32 {
        if self.channels == 1 {
            self.voltages[0]
        } else {
            self.voltage(lane)
        }
    }

    /// Write one lane. Lanes outside the current count are ignored.
    #[inline]
    pub fn set_voltage(&mut self, lane: usize, volts: f32) {
        if lane < self.channels {
            self.voltages[lane] = volts;
        }
    }

    /// The active lanes.
    #[inline]
    pub fn lanes(&self) -> &[f32] {
        &self.voltages[..self.channels]
    }

    pub fn disconnect(&mut self) {
        self.set_channels(0);
    }
}
