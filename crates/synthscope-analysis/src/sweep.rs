//! Synth parameters a sweep can measure.
//!
//! The parameter decides how a fitted sweep is reported (what the measured
//! value is and in which unit) and, for envelope times, which curve family is
//! fitted when none is requested.

use std::fmt;

use crate::curve::{CurveKind, CurveSelection};

/// The synth control a parameter sweep was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SweepParameter {
    /// Filter cutoff knob, measured as a cutoff frequency.
    FilterCutoff,
    /// Filter resonance knob, measured as the resonance peak level.
    FilterResonance,
    /// Envelope attack slider, measured as a time.
    EnvelopeAttack,
    /// Envelope decay slider, measured as a time.
    EnvelopeDecay,
    /// Envelope release slider, measured as a time.
    EnvelopeRelease,
    /// LFO rate knob, measured as a frequency.
    LfoRate,
}

impl SweepParameter {
    /// Every parameter, in the order they are listed in help text.
    pub const ALL: [SweepParameter; 6] = [
        SweepParameter::FilterCutoff,
        SweepParameter::FilterResonance,
        SweepParameter::EnvelopeAttack,
        SweepParameter::EnvelopeDecay,
        SweepParameter::EnvelopeRelease,
        SweepParameter::LfoRate,
    ];

    /// Snake-case name.
    pub fn name(self) -> &'static str {
        match self {
            SweepParameter::FilterCutoff => "filter_cutoff",
            SweepParameter::FilterResonance => "filter_resonance",
            SweepParameter::EnvelopeAttack => "envelope_attack",
            SweepParameter::EnvelopeDecay => "envelope_decay",
            SweepParameter::EnvelopeRelease => "envelope_release",
            SweepParameter::LfoRate => "lfo_rate",
        }
    }

    /// Report heading.
    pub fn title(self) -> &'static str {
        match self {
            SweepParameter::FilterCutoff => "Filter Cutoff",
            SweepParameter::FilterResonance => "Filter Resonance",
            SweepParameter::EnvelopeAttack => "Envelope Attack Timing",
            SweepParameter::EnvelopeDecay => "Envelope Decay Timing",
            SweepParameter::EnvelopeRelease => "Envelope Release Timing",
            SweepParameter::LfoRate => "LFO Rate",
        }
    }

    /// What the measured column holds.
    pub fn quantity(self) -> &'static str {
        match self {
            SweepParameter::FilterCutoff => "cutoff frequency",
            SweepParameter::FilterResonance => "resonance peak",
            SweepParameter::EnvelopeAttack
            | SweepParameter::EnvelopeDecay
            | SweepParameter::EnvelopeRelease => "time",
            SweepParameter::LfoRate => "frequency",
        }
    }

    /// Unit of the measured column.
    pub fn unit(self) -> &'static str {
        match self {
            SweepParameter::FilterCutoff | SweepParameter::LfoRate => "Hz",
            SweepParameter::FilterResonance => "dB",
            SweepParameter::EnvelopeAttack
            | SweepParameter::EnvelopeDecay
            | SweepParameter::EnvelopeRelease => "s",
        }
    }

    /// Decimal places used when printing measured values.
    pub fn precision(self) -> usize {
        match self {
            SweepParameter::EnvelopeAttack
            | SweepParameter::EnvelopeDecay
            | SweepParameter::EnvelopeRelease => 4,
            _ => 1,
        }
    }

    /// Curve families fitted when the caller names none.
    ///
    /// Envelope times are fitted with the exponential family only. `None`
    /// leaves the choice to the profile.
    pub fn default_selection(self) -> Option<CurveSelection> {
        match self {
            SweepParameter::EnvelopeAttack
            | SweepParameter::EnvelopeDecay
            | SweepParameter::EnvelopeRelease => {
                Some(CurveSelection::Only(CurveKind::Exponential))
            }
            _ => None,
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
