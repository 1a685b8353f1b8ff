//! Individuals control chart with a run rule
//!
//! Rule 1: a point beyond `mean ± 3σ`.
//! Rule 2: nine or more consecutive points strictly on one side of the mean.
//! A point exactly on the mean belongs to neither side and breaks both runs.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{SPC_RUN_LENGTH, SPC_SIGMA_MULTIPLIER};

use super::{mean, std_dev};

/// Individuals chart tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpcParams {
    /// Control band half-width in σ
    pub sigma_multiplier: f64,
    /// Run length that triggers rule 2
    pub run_length: usize,
}

impl Default for SpcParams {
    fn default() -> Self {
        Self {
            sigma_multiplier: SPC_SIGMA_MULTIPLIER,
            run_length: SPC_RUN_LENGTH,
        }
    }
}

/// Individuals chart output
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpcStatistics {
    /// Centre line
    pub mean: f64,
    /// Population σ
    pub std_deviation: f64,
    /// mean + kσ
    pub upper_control_limit: f64,
    /// mean - kσ
    pub lower_control_limit: f64,
    /// Indices of rule 1 violations
    pub out_of_control_points: Vec<usize>,
    /// Rule 2 fired
    pub rule2_violation: bool,
    /// Rule 1 or rule 2 fired
    pub out_of_control: bool,
}

/// Run an individuals chart over `data`
pub fn individuals_chart(data: &[f64], params: &SpcParams) -> SpcStatistics {
    let centre = mean(data);
    let sigma = std_dev(data);
    let ucl = centre + params.sigma_multiplier * sigma;
    let lcl = centre - params.sigma_multiplier * sigma;

    let out_of_control_points: Vec<usize> = data
        .iter()
        .enumerate()
        .filter(|(_, &x)| x > ucl || x < lcl)
        .map(|(i, _)| i)
        .collect();

    let rule2_violation = has_run(data, centre, params.run_length);

    SpcStatistics {
        mean: centre,
        std_deviation: sigma,
        upper_control_limit: ucl,
        lower_control_limit: lcl,
        out_of_control: !out_of_control_points.is_empty() || rule2_violation,
        out_of_control_points,
        rule2_violation,
    }
}

fn has_run(data: &[f64], centre: f64, run_length: usize) -> bool {
    if run_length == 0 {
        return false;
    }

    let mut above = 0usize;
    let mut below = 0usize;
    for &x in data {
        if x > centre {
            above += 1;
            below = 0;
        } else if x < centre {
            below += 1;
            above = 0;
        } else {
            above = 0;
            below = 0;
        }

        if above >= run_length || below >= run_length {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternating_signal_in_control() {
        let data: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let stats = individuals_chart(&data, &SpcParams::default());
        assert!(!stats.out_of_control);
        assert!(!stats.rule2_violation);
        assert!(stats.out_of_control_points.is_empty());
    }

    #[test]
    fn outlier_breaks_three_sigma() {
        let mut data: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 0.1 } else { -0.1 }).collect();
        data[20] = 5.0;
        let stats = individuals_chart(&data, &SpcParams::default());
        assert_eq!(stats.out_of_control_points, [20]);
        assert!(stats.out_of_control);
    }

    #[test]
    fn nine_point_run_fires_rule_two() {
        // 9 below then 9 above, no point beyond 3σ
        let mut data = [-1.0; 18];
        for x in data.iter_mut().skip(9) {
            *x = 1.0;
        }
        let stats = individuals_chart(&data, &SpcParams::default());
        assert!(stats.out_of_control_points.is_empty());
        assert!(stats.rule2_violation);
        assert!(stats.out_of_control);
    }

    #[test]
    fn points_on_the_mean_break_runs() {
        // 8 above, one on the centre line, 8 above again: no 9-run
        let centre = 0.0;
        assert!(!has_run(
            &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, centre, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            centre,
            9
        ));
        assert!(has_run(&[1.0; 9], centre, 9));
    }

    #[test]
    fn constant_series_in_control() {
        let stats = individuals_chart(&[7.25; 25], &SpcParams::default());
        assert_eq!(stats.std_deviation, 0.0);
        assert!(!stats.out_of_control);
    }
}
