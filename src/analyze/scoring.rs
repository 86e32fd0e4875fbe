//! Confidence arithmetic for the heuristic sentiment path.
//!
//! confidence = base
//!   + exclusive_vote  (exactly one of pos/neg present in the whole text)
//!   + intensifier     (intensifier token present)
//!   - attenuator      (attenuator token present)
//!   + last_clause     (exactly one of pos/neg present in the last clause)
//!   + negation_bias   (heavy negated-token density)
//!
//! clamped to [0,1] and rounded to two decimals.

use crate::config::ConfidenceWeights;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfidenceInputs {
    pub exclusive_vote: bool,
    pub intensified: bool,
    pub attenuated: bool,
    pub last_clause_exclusive: bool,
    pub heavy_negation: bool,
}

pub fn heuristic_confidence(inputs: &ConfidenceInputs, w: &ConfidenceWeights) -> f32 {
    let mut conf = w.base;
    if inputs.exclusive_vote {
        conf += w.exclusive_vote;
    }
    if inputs.intensified {
        conf += w.intensifier;
    }
    if inputs.attenuated {
        conf -= w.attenuator;
    }
    if inputs.last_clause_exclusive {
        conf += w.last_clause;
    }
    if inputs.heavy_negation {
        conf += w.negation_bias;
    }
    round2(conf.clamp(0.0, 1.0))
}

#[inline]
pub fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_only() {
        let c = heuristic_confidence(&ConfidenceInputs::default(), &ConfidenceWeights::default());
        assert_eq!(c, 0.6);
    }

    #[test]
    fn all_additive_factors_stay_in_range() {
        let all = ConfidenceInputs {
            exclusive_vote: true,
            intensified: true,
            attenuated: false,
            last_clause_exclusive: true,
            heavy_negation: true,
        };
        assert_eq!(heuristic_confidence(&all, &ConfidenceWeights::default()), 0.95);

        // Adversarial weights push the raw sum far outside [0,1].
        let huge = ConfidenceWeights {
            base: 0.9,
            exclusive_vote: 5.0,
            intensifier: 5.0,
            attenuator: 0.0,
            last_clause: 5.0,
            negation_bias: 5.0,
        };
        assert_eq!(heuristic_confidence(&all, &huge), 1.0);

        let sunk = ConfidenceWeights {
            base: 0.0,
            attenuator: 3.0,
            ..ConfidenceWeights::default()
        };
        let only_atten = ConfidenceInputs {
            attenuated: true,
            ..Default::default()
        };
        assert_eq!(heuristic_confidence(&only_atten, &sunk), 0.0);
    }

    #[test]
    fn attenuator_cancels_intensifier() {
        let i = ConfidenceInputs {
            exclusive_vote: true,
            intensified: true,
            attenuated: true,
            ..Default::default()
        };
        assert_eq!(heuristic_confidence(&i, &ConfidenceWeights::default()), 0.75);
    }
}
