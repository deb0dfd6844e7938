use crate::data::model::{Layer, PickPoint};
use crate::error::SolverError;
use crate::solver::{ModelParams, SiteCode, VelocityModel};
use crate::view::units::{reciprocal, PeriodUnit};

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// One curve-matching pass: the model, the observed picks and the period
/// domain the synthetic curve is sampled over.
#[derive(Debug, Clone)]
pub struct MatchRequest<'a> {
    pub layers: &'a [Layer],
    pub picks: &'a [PickPoint],
    /// Evaluation domain in the displayed period unit.
    pub domain: (f64, f64),
    pub period_unit: PeriodUnit,
    /// Number of intervals; `samples + 1` periods are generated.
    pub samples: usize,
    pub phase_vel_window: (f64, f64),
    pub wave_factor: f64,
    pub site_code: SiteCode,
}

/// One evaluated period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub period: f64,
    pub velocity: Option<f64>,
}

/// Sorted, de-duplicated union of generated and observed periods.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedPeriods {
    pub periods: Vec<f64>,
    /// Per pick, in file order: where its period landed in `periods`.
    /// `None` for picks that cannot be evaluated.
    pub pick_indices: Vec<Option<usize>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchResult {
    pub samples: Vec<CurveSample>,
    /// Finite, positive `(period, velocity)` pairs sorted by period.
    pub curve: Vec<(f64, f64)>,
    pub pick_indices: Vec<Option<usize>>,
    pub rmse: Option<f64>,
    pub vs30: Option<f64>,
    pub site_class: Option<String>,
}

// ---------------------------------------------------------------------------
// Period generation and merge
// ---------------------------------------------------------------------------

/// `samples + 1` evenly spaced values across `[min, max]` in `unit`,
/// returned as ascending periods. A degenerate domain or `samples == 0`
/// yields a single period.
pub fn evaluation_periods(min: f64, max: f64, samples: usize, unit: PeriodUnit) -> Vec<f64> {
    let mut periods: Vec<f64> = if samples == 0 || min == max {
        vec![unit.to_period(min)]
    } else {
        let step = (max - min) / samples as f64;
        (0..=samples)
            .map(|i| unit.to_period(min + step * i as f64))
            .collect()
    };
    periods.sort_by(f64::total_cmp);
    periods
}

/// Two-pointer merge of ascending `generated` periods with the pick periods.
/// Picks are ordered by period first (file order is arbitrary); equal values
/// collapse onto one slot.
pub fn merge_periods(generated: &[f64], pick_periods: &[Option<f64>]) -> MergedPeriods {
    let mut order: Vec<usize> = (0..pick_periods.len())
        .filter(|&i| pick_periods[i].is_some())
        .collect();
    order.sort_by(|&a, &b| {
        let pa = pick_periods[a].unwrap_or_default();
        let pb = pick_periods[b].unwrap_or_default();
        pa.total_cmp(&pb)
    });

    let mut periods = Vec::with_capacity(generated.len() + order.len());
    let mut pick_indices = vec![None; pick_periods.len()];

    let push = |periods: &mut Vec<f64>, value: f64| -> usize {
        if periods.last() != Some(&value) {
            periods.push(value);
        }
        periods.len() - 1
    };

    let (mut i, mut j) = (0, 0);
    while i < order.len() || j < generated.len() {
        let pick = order.get(i).and_then(|&p| pick_periods[p].map(|period| (p, period)));
        match (pick, generated.get(j)) {
            (Some((p, period)), Some(&g)) if period < g => {
                pick_indices[p] = Some(push(&mut periods, period));
                i += 1;
            }
            (Some((p, period)), None) => {
                pick_indices[p] = Some(push(&mut periods, period));
                i += 1;
            }
            (_, Some(&g)) => {
                push(&mut periods, g);
                j += 1;
            }
            (None, None) => break,
        }
    }

    MergedPeriods {
        periods,
        pick_indices,
    }
}

/// Period and observed velocity of a pick, when both are usable.
fn pick_sample(pick: &PickPoint) -> Option<(f64, f64)> {
    let period = reciprocal(pick.frequency());
    let velocity = reciprocal(pick.slowness());
    let usable = |v: f64| v.is_finite() && v > 0.0;
    (usable(period) && usable(velocity)).then_some((period, velocity))
}

/// Root-mean-square misfit over `(modeled, observed)` pairs that have a
/// modeled value. `None` when no pair qualifies.
pub fn rmse(pairs: impl IntoIterator<Item = (Option<f64>, f64)>) -> Option<f64> {
    let (sum, count) = pairs
        .into_iter()
        .filter_map(|(modeled, observed)| modeled.map(|m| (m - observed).powi(2)))
        .fold((0.0, 0usize), |(sum, n), sq| (sum + sq, n + 1));
    (count > 0).then(|| (sum / count as f64).sqrt())
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate the model once over the merged periods and score it against
/// the picks.
pub fn evaluate<M: VelocityModel>(request: &MatchRequest<'_>) -> Result<MatchResult, SolverError> {
    if request.layers.is_empty() {
        return Ok(MatchResult::default());
    }

    let generated = evaluation_periods(
        request.domain.0,
        request.domain.1,
        request.samples,
        request.period_unit,
    );
    let observed: Vec<Option<(f64, f64)>> = request.picks.iter().map(pick_sample).collect();
    let pick_periods: Vec<Option<f64>> = observed.iter().map(|o| o.map(|(p, _)| p)).collect();
    let merged = merge_periods(&generated, &pick_periods);

    let params = ModelParams::from_layers(
        request.layers,
        request.phase_vel_window.0,
        request.phase_vel_window.1,
        request.wave_factor,
    );
    let model = M::build(params)?;

    let samples: Vec<CurveSample> = merged
        .periods
        .iter()
        .map(|&period| CurveSample {
            period,
            velocity: model.phase_velocity(period),
        })
        .collect();

    let rmse = rmse(
        merged
            .pick_indices
            .iter()
            .zip(&observed)
            .filter_map(|(index, obs)| {
                let index = (*index)?;
                let (_, velocity) = (*obs)?;
                Some((samples[index].velocity, velocity))
            }),
    );

    let mut curve: Vec<(f64, f64)> = samples
        .iter()
        .filter_map(|s| s.velocity.map(|v| (s.period, v)))
        .filter(|&(p, v)| p.is_finite() && v.is_finite() && p > 0.0 && v > 0.0)
        .collect();
    curve.sort_by(|a, b| a.0.total_cmp(&b.0));

    let vs30 = model.vs30();
    let vs30 = (vs30.is_finite() && vs30 > 0.0).then_some(vs30);
    let site_class = vs30.and_then(|v| M::classify_site(&request.site_code.normalized(), v));

    Ok(MatchResult {
        samples,
        curve,
        pick_indices: merged.pick_indices,
        rmse,
        vs30,
        site_class,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// `c(T) = Vs₀ − Vs₁·T`, windowed like a real solver.
    struct LinearModel {
        a: f64,
        b: f64,
        window: (f64, f64),
    }

    impl VelocityModel for LinearModel {
        fn build(params: ModelParams) -> Result<Self, SolverError> {
            if params.layer_count < 2 {
                return Err(SolverError::NoLayers);
            }
            Ok(Self {
                a: params.shear_velocities[0],
                b: params.shear_velocities[1],
                window: (params.phase_vel_min, params.phase_vel_max),
            })
        }

        fn vs30(&self) -> f64 {
            self.a
        }

        fn phase_velocity(&self, period: f64) -> Option<f64> {
            let c = self.a - self.b * period;
            (c >= self.window.0 && c <= self.window.1).then_some(c)
        }

        fn classify_site(code: &str, _vs30: f64) -> Option<String> {
            Some(code.to_string())
        }
    }

    fn pick(frequency: f64, velocity: f64) -> PickPoint {
        PickPoint {
            fields: [0.0, 0.0, frequency, 0.0, 1.0 / velocity, 0.0, 0.0],
        }
    }

    fn linear_layers() -> Vec<Layer> {
        vec![Layer::new(0.0, 10.0, 430.0, 2.0), Layer::new(10.0, 20.0, 1200.0, 2.0)]
    }

    fn request<'a>(layers: &'a [Layer], picks: &'a [PickPoint]) -> MatchRequest<'a> {
        MatchRequest {
            layers,
            picks,
            domain: (0.05, 0.3),
            period_unit: PeriodUnit::Period,
            samples: 5,
            phase_vel_window: (10.0, 2000.0),
            wave_factor: 2.0,
            site_code: SiteCode::Asce7_22,
        }
    }

    #[test]
    fn generates_n_plus_one_periods() {
        let periods = evaluation_periods(0.1, 0.5, 4, PeriodUnit::Period);
        assert_eq!(periods.len(), 5);
        assert_abs_diff_eq!(periods[0], 0.1);
        assert_abs_diff_eq!(periods[4], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn frequency_domain_converts_and_sorts() {
        let periods = evaluation_periods(1.0, 10.0, 2, PeriodUnit::Frequency);
        assert_eq!(periods.len(), 3);
        assert_relative_eq!(periods[0], 0.1);
        assert_relative_eq!(periods[1], 1.0 / 5.5);
        assert_relative_eq!(periods[2], 1.0);
    }

    #[test]
    fn degenerate_domain_gives_single_sample() {
        assert_eq!(evaluation_periods(0.2, 0.2, 10, PeriodUnit::Period), vec![0.2]);
        assert_eq!(evaluation_periods(0.1, 0.9, 0, PeriodUnit::Period), vec![0.1]);
    }

    #[test]
    fn merge_tracks_pick_positions() {
        let generated = [0.1, 0.2, 0.3];
        let picks = [Some(0.25), Some(0.05), Some(0.2), None];
        let merged = merge_periods(&generated, &picks);
        assert_eq!(merged.periods, vec![0.05, 0.1, 0.2, 0.25, 0.3]);
        assert_eq!(merged.pick_indices, vec![Some(3), Some(0), Some(2), None]);
        for (pick, index) in picks.iter().zip(&merged.pick_indices) {
            if let (Some(p), Some(i)) = (pick, index) {
                assert_eq!(merged.periods[*i], *p);
            }
        }
    }

    #[test]
    fn merge_is_sorted_and_sized() {
        let generated = evaluation_periods(0.01, 1.0, 20, PeriodUnit::Period);
        let picks: Vec<Option<f64>> = [0.77, 0.013, 0.5, 0.999, 0.31].iter().map(|&p| Some(p)).collect();
        let merged = merge_periods(&generated, &picks);
        assert!(merged.periods.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(merged.periods.len(), generated.len() + picks.len());
    }

    #[test]
    fn duplicate_pick_periods_share_a_slot() {
        let merged = merge_periods(&[0.5], &[Some(0.2), Some(0.2)]);
        assert_eq!(merged.periods, vec![0.2, 0.5]);
        assert_eq!(merged.pick_indices, vec![Some(0), Some(0)]);
    }

    #[test]
    fn rmse_single_pick() {
        let layers = linear_layers();
        let picks = [pick(10.0, 300.0)];
        let result = evaluate::<LinearModel>(&request(&layers, &picks)).unwrap();
        assert_relative_eq!(result.rmse.unwrap(), 10.0, max_relative = 1e-9);
    }

    #[test]
    fn rmse_two_picks() {
        let layers = linear_layers();
        // modeled: 310 at 0.1 s, 190 at 0.2 s
        let picks = [pick(10.0, 300.0), pick(5.0, 200.0)];
        let result = evaluate::<LinearModel>(&request(&layers, &picks)).unwrap();
        assert_relative_eq!(result.rmse.unwrap(), 10.0, max_relative = 1e-9);
        for (i, index) in result.pick_indices.iter().enumerate() {
            let index = index.unwrap();
            assert_relative_eq!(result.samples[index].period, 1.0 / picks[i].frequency());
        }
    }

    #[test]
    fn rmse_is_none_without_modeled_values() {
        let layers = linear_layers();
        let picks = [pick(10.0, 300.0)];
        let mut req = request(&layers, &picks);
        req.phase_vel_window = (1000.0, 2000.0);
        let result = evaluate::<LinearModel>(&req).unwrap();
        assert_eq!(result.rmse, None);
        assert!(result.curve.is_empty());
        assert_eq!(rmse(std::iter::empty()), None);
    }

    #[test]
    fn empty_stack_gives_empty_result() {
        let result = evaluate::<LinearModel>(&request(&[], &[])).unwrap();
        assert!(result.curve.is_empty());
        assert_eq!(result.rmse, None);
    }

    #[test]
    fn curve_is_positive_and_sorted() {
        let layers = linear_layers();
        let mut req = request(&layers, &[]);
        // c(T) goes negative past T ≈ 0.36 s; those samples are dropped.
        req.domain = (0.05, 0.6);
        req.phase_vel_window = (-1e6, 1e6);
        let result = evaluate::<LinearModel>(&req).unwrap();
        assert!(result.curve.iter().all(|&(p, v)| p > 0.0 && v > 0.0));
        assert!(result.curve.windows(2).all(|w| w[0].0 <= w[1].0));
        assert!(result.curve.len() < result.samples.len());
    }

    #[test]
    fn site_class_uses_normalized_code() {
        let layers = linear_layers();
        let result = evaluate::<LinearModel>(&request(&layers, &[])).unwrap();
        assert_eq!(result.vs30, Some(430.0));
        assert_eq!(result.site_class.as_deref(), Some("asce_7_22"));
    }
}
