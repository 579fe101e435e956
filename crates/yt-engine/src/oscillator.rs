//! Band-unlimited oscillator shapes.

use crate::graph::Waveform;

/// Sample a waveform at `phase` in [0, 1). Output is in [-1, 1].
pub(crate) fn sample(waveform: Waveform, phase: f64) -> f64 {
    match waveform {
        Waveform::Sine => libm::sin(core::f64::consts::TAU * phase),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => 1.0 - 4.0 * libm::fabs(phase - 0.5),
        Waveform::Sawtooth => 2.0 * phase - 1.0,
    }
}

/// Advance a phase accumulator, wrapping into [0, 1).
pub(crate) fn advance(phase: f64, increment: f64) -> f64 {
    let next = phase + increment;
    next - libm::floor(next)
}
