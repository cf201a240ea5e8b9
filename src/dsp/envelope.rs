#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::amplify::unit_clamp, MIN_KNOB};

/*
Exponential ADSR Envelope
=========================

This module implements the gate/trigger driven ADSR used by the envelope
module. Unlike a linear ramp generator, every stage here is a one-pole
exponential approach toward a target: the further away the level is, the
faster it moves.

Vocabulary
----------

  level       The envelope's current value (0.0 to 1.0). The module emits
              10 × level volts.

  knob        A normalized stage control in [0.0, 1.0]. Knob 0 is the
              fastest possible stage, knob 1 the slowest.

  rate        How quickly a stage closes the distance to its target, in
              1/second. Derived from the knob.

  decaying    The only phase bit carried between ticks. False while in
              Attack (or after a release), true once Attack has hit 1.0.

  gate        Note held. While high, the envelope runs Attack → Decay and
              then holds at Sustain.

  trigger     Rising edge that forces the envelope back into Attack, even
              while the gate is still held (retrigger).


The Math: One-Pole Approach
---------------------------

Each tick moves the level a fraction of the way toward a target:

    level += rate × (target - level) × sample_time

With a constant target this is the explicit Euler step of

    d(level)/dt = rate × (target - level)

whose solution is an exponential curve with time constant 1/rate.


Knob to Rate
------------

    rate = 20000^(1 - knob) / 10

    knob    rate (1/s)    time constant
    0.0     2000          0.5 ms
    0.5     ~14.1         ~71 ms
    1.0     0.1           10 s

The curve is exponential in the knob, so equal knob turns feel like equal
changes in stage length. Knobs below 1e-4 skip the formula and snap to the
target (an infinitely fast stage).


Why Attack Aims at 1.01
-----------------------

An exponential approach never actually arrives:

    Level
    1.01 ┼ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─   ← aimed-for target
    1.00 ┼─ ─ ─ ─ ─ ─ ─ ─╱ ← crossed here, attack ends
         │          ╱
         │     ╱
    0.00 └╱─────────────────────────→ Time

Aiming slightly past 1.0 means the curve crosses 1.0 in finite time. On the
crossing tick the level is clamped to exactly 1.0 and Decay begins.


The State Machine
-----------------

    ┌─────────┐  level >= 1   ┌───────┐  |level - S| <= 1e-3  ┌─────────┐
    │ Attack  │ ────────────→ │ Decay │ ────────────────────→ │ Sustain │
    └─────────┘               └───────┘                       └─────────┘
      ↑    ↑                      │                               │
      │    └──── trigger ─────────┴───────────────────────────────┘
      │
      │ gate high          ┌─────────┐  |level| <= 1e-3   ┌──────┐
      └──────────────────  │ Release │ ─────────────────→ │ Idle │
                           └─────────┘                    └──────┘
               gate low from any stage ↑

Decay and Sustain share one rule (approach the sustain level); they are
told apart only by how close the level is to the target. The same goes for
Release and Idle.


Implementation Notes
--------------------

Knobs are re-read every tick, so a sweep of the sustain knob while held
makes the level glide to the new target at the decay rate.

A single Euler step with rate × sample_time > 1 would overshoot the target.
That needs a knob near zero AND an enormous time step; the result is still
clamped into [0, 1] so the level can never leave range.
*/

/// Base of the knob-to-rate exponential.
pub const RATE_BASE: f32 = 20_000.0;
/// Slowest time constant in seconds (knob fully clockwise).
pub const MAX_TIME: f32 = 10.0;
/// Attack approaches this rather than 1.0 so it finishes in finite time.
pub const ATTACK_TARGET: f32 = 1.01;
/// Distance from a target under which the stage counts as "arrived".
pub const STAGE_TOLERANCE: f32 = 1e-3;

/// Convert a normalized knob to an approach rate in 1/second.
#[inline]
pub fn stage_rate(knob: f32) -> f32 {
    RATE_BASE.powf(1.0 - knob) / MAX_TIME
}

/// Combine a base knob value with a 0-10 V modulation input.
#[inline]
pub fn knob_with_cv(param: f32, cv: f32) -> f32 {
    unit_clamp(param + cv / 10.0)
}

#[inline]
fn is_near(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

/// Per-tick stage controls, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeKnobs {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl EnvelopeKnobs {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: unit_clamp(attack),
            decay: unit_clamp(decay),
            sustain: unit_clamp(sustain),
            release: unit_clamp(release),
        }
    }
}

impl Default for EnvelopeKnobs {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5, 0.5)
    }
}

/// Which stage the envelope is in, derived from the phase bit, gate and level.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // Gate low, level at rest near 0
    Attack,  // Gate high, rising toward 1.0
    Decay,   // Gate high, falling (or rising) toward sustain
    Sustain, // Gate high, within tolerance of sustain
    Release, // Gate low, falling toward 0
}

/// The four status indicators of the envelope module.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageLights {
    pub attack: bool,
    pub decay: bool,
    pub sustain: bool,
    pub release: bool,
}

impl From<EnvelopeStage> for StageLights {
    fn from(stage: EnvelopeStage) -> Self {
        Self {
            attack: stage == EnvelopeStage::Attack,
            decay: stage == EnvelopeStage::Decay,
            sustain: stage == EnvelopeStage::Sustain,
            release: stage == EnvelopeStage::Release,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Envelope {
    level: f32,     // current output value (0.0 - 1.0)
    decaying: bool, // false = attack phase, true = decay/sustain phase
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the attack phase on the next gated tick.
    #[inline]
    pub fn retrigger(&mut self) {
        self.decaying = false;
    }

    /// Advance the envelope by one tick.
    ///
    /// `trig` is the already edge-detected trigger: true only on the tick
    /// the trigger input crossed its high threshold.
    pub fn step(
        &mut self,
        knobs: &EnvelopeKnobs,
        gate: bool,
        trig: bool,
        sample_time: f32,
    ) -> EnvelopeStage {
        if trig {
            self.retrigger();
        }

        // Non-finite or negative time deltas freeze the envelope.
        let dt = if sample_time.is_finite() {
            sample_time.max(0.0)
        } else {
            0.0
        };

        if gate {
            if self.decaying {
                // Decay, then hold at sustain
                self.level = if knobs.decay < MIN_KNOB {
                    knobs.sustain
                } else {
                    self.level + stage_rate(knobs.decay) * (knobs.sustain - self.level) * dt
                };
            } else {
                // Attack
                self.level = if knobs.attack < MIN_KNOB {
                    1.0
                } else {
                    self.level + stage_rate(knobs.attack) * (ATTACK_TARGET - self.level) * dt
                };

                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.decaying = true;
                }
            }
        } else {
            // Release
            self.level = if knobs.release < MIN_KNOB {
                0.0
            } else {
                self.level + stage_rate(knobs.release) * (0.0 - self.level) * dt
            };
            self.decaying = false;
        }

        self.level = unit_clamp(self.level);
        debug_assert!((0.0..=1.0).contains(&self.level));

        self.stage(gate, knobs.sustain)
    }

    /// Render one envelope value per sample with fixed knobs and gate.
    pub fn render(
        &mut self,
        buffer: &mut [f32],
        knobs: &EnvelopeKnobs,
        gate: bool,
        sample_time: f32,
    ) {
        for sample in buffer.iter_mut() {
            self.step(knobs, gate, false, sample_time);
            *sample = self.level;
        }
    }

    /// Derive the current stage for a given gate and sustain level.
    pub fn stage(&self, gate: bool, sustain: f32) -> EnvelopeStage {
        match (gate, self.decaying) {
            (true, false) => EnvelopeStage::Attack,
            (true, true) if is_near(self.level, sustain, STAGE_TOLERANCE) => {
                EnvelopeStage::Sustain
            }
            (true, true) => EnvelopeStage::Decay,
            (false, _) if is_near(self.level, 0.0, STAGE_TOLERANCE) => EnvelopeStage::Idle,
            (false, _) => EnvelopeStage::Release,
        }
    }

    /// Back to the initial state: level 0, attack phase.
    pub fn reset(&mut self) {
        self.level = 0.0;
        self.decaying = false;
    }

    /// Current level (0.0 to 1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// True once attack has completed and until the gate drops or a
    /// trigger arrives.
    pub fn is_decaying(&self) -> bool {
        self.decaying
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TIME: f32 = 1.0 / 48_000.0;

    fn run(env: &mut Envelope, knobs: &EnvelopeKnobs, gate: bool, ticks: usize) {
        for _ in 0..ticks {
            env.step(knobs, gate, false, SAMPLE_TIME);
        }
    }

    #[test]
    fn instant_attack_reaches_one_in_a_single_tick() {
        let mut env = Envelope::new();
        let knobs = EnvelopeKnobs::new(0.0, 0.5, 0.5, 0.5);

        env.step(&knobs, true, false, SAMPLE_TIME);

        assert_eq!(env.level(), 1.0);
        assert!(env.is_decaying());
    }

    #[test]
    fn instant_release_drops_to_zero_in_a_single_tick() {
        let mut env = Envelope::new();
        let knobs = EnvelopeKnobs::new(0.0, 0.5, 0.7, 0.0);
        run(&mut env, &knobs, true, 10);
        assert!(env.level() > 0.5);

        env.step(&knobs, false, false, SAMPLE_TIME);

        assert_eq!(env.level(), 0.0);
        assert!(!env.is_decaying());
    }

    #[test]
    fn instant_decay_snaps_to_sustain() {
        let mut env = Envelope::new();
        let knobs = EnvelopeKnobs::new(0.0, 0.0, 0.4, 0.5);

        env.step(&knobs, true, false, SAMPLE_TIME); // attack completes
        let stage = env.step(&knobs, true, false, SAMPLE_TIME);

        assert_eq!(env.level(), 0.4);
        assert_eq!(stage, EnvelopeStage::Sustain);
    }

    #[test]
    fn attack_finishes_in_finite_time() {
        let mut env = Envelope::new();
        let knobs = EnvelopeKnobs::new(0.5, 0.5, 0.5, 0.5);

        // Time constant ~71ms; aiming at 1.01 crosses 1.0 after ~0.33s
        let mut ticks = 0;
        while !env.is_decaying() && ticks < 48_000 {
            env.step(&knobs, true, false, SAMPLE_TIME);
            ticks += 1;
        }

        assert!(env.is_decaying(), "attack should complete within one second");
        assert_eq!(env.level(), 1.0);
        assert!(ticks > 10_000, "attack at knob 0.5 should take ~0.33s, took {ticks} ticks");
    }

    #[test]
    fn decay_converges_monotonically_to_sustain() {
        let mut env = Envelope::new();
        let knobs = EnvelopeKnobs::new(0.0, 0.5, 0.3, 0.5);
        env.step(&knobs, true, false, SAMPLE_TIME);
        assert!(env.is_decaying());

        let mut previous = env.level();
        for _ in 0..96_000 {
            env.step(&knobs, true, false, SAMPLE_TIME);
            assert!(env.level() <= previous, "decay must not rise");
            assert!(env.level() >= 0.3, "decay must not overshoot sustain");
            previous = env.level();
        }

        assert!((env.level() - 0.3).abs() < 1e-3);
        assert_eq!(env.stage(true, 0.3), EnvelopeStage::Sustain);
    }

    #[test]
    fn trigger_restarts_attack_while_gated() {
        let mut env = Envelope::new();
        let knobs = EnvelopeKnobs::new(0.0, 0.5, 0.3, 0.5);
        run(&mut env, &knobs, true, 100);
        assert!(env.is_decaying());

        // Slow attack so the re-armed attack is observable on the next tick
        let slow = EnvelopeKnobs::new(0.5, 0.5, 0.3, 0.5);
        let stage = env.step(&slow, true, true, SAMPLE_TIME);

        assert!(!env.is_decaying());
        assert_eq!(stage, EnvelopeStage::Attack);
    }

    #[test]
    fn release_always_clears_decaying() {
        let mut env = Envelope::new();
        let knobs = EnvelopeKnobs::new(0.0, 0.5, 0.5, 0.5);
        run(&mut env, &knobs, true, 10);
        assert!(env.is_decaying());

        let stage = env.step(&knobs, false, false, SAMPLE_TIME);

        assert!(!env.is_decaying());
        assert_eq!(stage, EnvelopeStage::Release);
    }

    #[test]
    fn release_settles_to_idle() {
        let mut env = Envelope::new();
        let knobs = EnvelopeKnobs::new(0.0, 0.5, 0.8, 0.5);
        run(&mut env, &knobs, true, 10);
        run(&mut env, &knobs, false, 48_000);

        assert!(env.level() < STAGE_TOLERANCE);
        assert_eq!(env.stage(false, 0.8), EnvelopeStage::Idle);
    }

    #[test]
    fn level_stays_in_range_for_extreme_inputs() {
        let mut env = Envelope::new();
        // Deterministic pseudo-random walk over knobs, gate and time step
        let mut seed: u32 = 0x1234_5678;
        let mut next = || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (seed >> 8) as f32 / (1u32 << 24) as f32
        };

        for _ in 0..20_000 {
            let knobs = EnvelopeKnobs::new(next() * 0.01, next(), next(), next() * 0.01);
            let gate = next() > 0.4;
            let trig = next() > 0.9;
            // Up to 2s per tick: rate × dt far beyond 1
            let dt = next() * 2.0;
            env.step(&knobs, gate, trig, dt);
            assert!(
                (0.0..=1.0).contains(&env.level()),
                "level escaped range: {}",
                env.level()
            );
        }
    }

    #[test]
    fn non_finite_time_step_is_ignored() {
        let mut env = Envelope::new();
        let knobs = EnvelopeKnobs::new(0.5, 0.5, 0.5, 0.5);
        env.step(&knobs, true, false, f32::NAN);
        env.step(&knobs, true, false, f32::INFINITY);
        assert_eq!(env.level(), 0.0);
        assert!(env.level().is_finite());
    }

    #[test]
    fn knobs_are_clamped_and_nan_safe() {
        let knobs = EnvelopeKnobs::new(-1.0, 2.0, f32::NAN, 0.5);
        assert_eq!(knobs.attack, 0.0);
        assert_eq!(knobs.decay, 1.0);
        assert_eq!(knobs.sustain, 0.0);
    }

    #[test]
    fn cv_adds_to_knob_in_tenths() {
        assert!((knob_with_cv(0.2, 3.0) - 0.5).abs() < 1e-6);
        assert_eq!(knob_with_cv(0.5, 10.0), 1.0);
        assert_eq!(knob_with_cv(0.5, -10.0), 0.0);
    }

    #[test]
    fn rate_curve_endpoints() {
        assert!((stage_rate(0.0) - 2000.0).abs() < 1e-2);
        assert!((stage_rate(1.0) - 0.1).abs() < 1e-6);
        assert!((stage_rate(0.5) - 14.142_136).abs() < 1e-3);
    }

    #[test]
    fn lights_follow_stage() {
        let lights = StageLights::from(EnvelopeStage::Decay);
        assert_eq!(
            lights,
            StageLights {
                attack: false,
                decay: true,
                sustain: false,
                release: false
            }
        );
        assert_eq!(StageLights::from(EnvelopeStage::Idle), StageLights::default());
    }
}
