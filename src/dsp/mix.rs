//! Fader laws and lane summing.

/*
Summing Mixer
=============

A summing mixer ADDS its inputs. Before the sum, each channel passes through
its own fader; after the sum, the master fader scales the total.

Vocabulary
----------

  fader law     The curve mapping a fader's position to a gain. Two laws
                are used here, on purpose:

                  channel faders   gain = position²   (position 0..√2)
                  master fader     gain = position    (position 0..2)

                Both top out at gain 2.0 (+6 dB) and both give unity at
                position 1.0. The squared law spends more of its travel at
                low gains, so fine adjustments near silence are easier.

  lane          One voice of a polyphonic signal. Lanes are summed with
                their counterparts (lane 3 of channel 1 adds to lane 3 of
                channel 2), never across each other.

  summing       Plain addition. Four channels at +6 dB can reach 8× any
                single input, so the mix is NOT bounded to the input range.


Fader Positions to Decibels
---------------------------

    dB = 20 × log₁₀(gain)

    channel position   gain    dB
    0.0                0.0     -inf
    0.5                0.25    -12.0
    1.0                1.0       0.0
    √2 ≈ 1.414         2.0      +6.0

    master position    gain    dB
    0.5                0.5      -6.0
    1.0                1.0       0.0
    2.0                2.0      +6.0
*/

/// Gain produced by a channel fader (squared law).
#[inline]
pub fn fader_gain(position: f32) -> f32 {
    position * position
}

/// Convert a linear gain to decibels. Zero maps to negative infinity.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.log10()
}

/// Add signal B into signal A lane by lane (summing).
///
/// ⚠️ WARNING: no headroom management; the sum can exceed either input.
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::SQRT_2;

    #[test]
    fn test_unity_fader_is_unity_gain() {
        assert_eq!(fader_gain(1.0), 1.0);
    }

    #[test]
    fn test_full_fader_is_plus_six_db() {
        assert!((fader_gain(SQRT_2) - 2.0).abs() < 1e-6);
        assert!((gain_to_db(fader_gain(SQRT_2)) - 6.0206).abs() < 1e-3);
    }

    #[test]
    fn test_closed_fader_is_silent() {
        assert_eq!(fader_gain(0.0), 0.0);
        assert_eq!(gain_to_db(0.0), f32::NEG_INFINITY);
    }

    #[test]
    fn test_sum_in_place_can_exceed_inputs() {
        let mut a = [1.0, 0.5, -2.0];
        let b = [1.0, 0.8, -2.0];
        sum_in_place(&mut a, &b);
        assert_eq!(a, [2.0, 1.3, -4.0]);
    }
}
