//! Gain and voltage-controlled attenuation primitives.

/*
Gain and VCAs
=============

Every level control in the mixer is a multiplication. Faders multiply by a
fixed gain; CV inputs multiply by a gain derived from a control voltage.

Vocabulary
----------

  gain          A multiplier applied to a signal.
                  gain > 1.0  →  louder
                  gain = 1.0  →  unchanged (unity)
                  gain < 1.0  →  quieter
                  gain = 0.0  →  silence

  VCA           Voltage-controlled amplifier. In this crate it only ever
                attenuates: the control voltage is mapped to [0.0, 1.0].

  unipolar CV   A control voltage meant to live in 0..10 V.


CV to Gain
----------

    gain = clamp(cv / 10, 0, 1)

      cv (V)   gain
      -5.0     0.0   (clamped)
       0.0     0.0
       2.5     0.25
      10.0     1.0
      15.0     1.0   (clamped)

A CV can never boost a signal. Boost only comes from the faders, which are
bounded by their parameter ranges.


NaN Handling
------------

`unit_clamp` is written as max-then-min rather than `f32::clamp` because
`f32::max` returns the non-NaN operand: a NaN input collapses to 0.0 instead
of poisoning every following sample.
*/

/// Clamp into [0.0, 1.0], mapping NaN to 0.0.
#[inline]
pub fn unit_clamp(value: f32) -> f32 {
    value.max(0.0).min(1.0)
}

/// Map a unipolar 0-10 V control voltage to an attenuation factor in [0, 1].
#[inline]
pub fn cv_gain(volts: f32) -> f32 {
    unit_clamp(volts / 10.0)
}

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Attenuate each lane by the gain its paired control voltage maps to.
///
/// `cv` holds volts, one entry per lane of `signal`.
#[inline]
pub fn attenuate_in_place(signal: &mut [f32], cv: &[f32]) {
    debug_assert_eq!(signal.len(), cv.len());

    for (s, &volts) in signal.iter_mut().zip(cv.iter()) {
        *s *= cv_gain(volts);
    }
}
