//! Pressure-drop evaluation of a single shaft size.
//!
//! Two airflow models are supported:
//!
//! * [`FlowModel::Cumulative`]: the fan is on the roof and every floor adds
//!   its airflow to the shaft, so the section above floor *i* carries the
//!   airflow of floors 1 to *i*. The pressure a floor sees is the friction
//!   accumulated in the sections below it, so the bottom floor sees none and
//!   the top floor sees the most.
//! * [`FlowModel::Uniform`]: the full design airflow travels the whole
//!   height. The bottom floor's air crosses the entire shaft while the top
//!   floor's air crosses a single floor height.
//!
//! In both models the shaft passes when the bottom-to-top pressure difference
//! stays within the allowed limit, which is what a constant pressure
//! controller can balance.

use crate::config::{AirProperties, FittingCoefficients, SizerConfig};
use crate::models::{FloorSection, FlowModel, ShaftEvaluation, ShaftShape, SizingInput};

use super::airflow::FloorAggregation;
use super::friction::{darcy_pressure_drop, velocity_pressure};
use super::geometry::{circular_area, huebscher_equivalent_diameter, hydraulic_diameter_rect};
use super::precision::{AREA_DP, FLOW_DP, PRESSURE_DP, round_dp, to_f64};

const SQ_IN_PER_SQ_FT: f64 = 144.0;

/// Airflow and friction in one floor-height section of the shaft.
#[derive(Debug, Clone, Copy)]
struct Section {
    cfm: f64,
    velocity: f64,
    dp: f64,
    accumulated: f64,
}

/// Unrounded losses for one shaft size.
#[derive(Debug, Clone)]
struct Losses {
    velocity: f64,
    vp: f64,
    dp_shaft: f64,
    dp_after: f64,
    dp_offset: f64,
    dp_entry: f64,
    dp_exit: f64,
    dp_bottom: f64,
    dp_top: f64,
    delta_p: f64,
    sections: Vec<Section>,
}

impl Losses {
    fn total(&self) -> f64 {
        self.dp_shaft + self.dp_after + self.dp_offset + self.dp_entry + self.dp_exit
    }
}

/// Evaluates candidate shaft sizes for one building.
///
/// The evaluator borrows the aggregated floor data and the design constants
/// once, so that a size search can evaluate many cross-sections cheaply.
#[derive(Debug, Clone)]
pub struct ShaftEvaluator<'a> {
    air: &'a AirProperties,
    fittings: &'a FittingCoefficients,
    aggregation: &'a FloorAggregation,
    floor_height_ft: f64,
    duct_after_last_ft: f64,
    offset_length_ft: Option<f64>,
    k_offset: f64,
    max_delta_p: f64,
    min_velocity_fpm: f64,
    flow_model: FlowModel,
}

impl<'a> ShaftEvaluator<'a> {
    /// Creates an evaluator for the given input.
    ///
    /// # Arguments
    ///
    /// * `input` - The building and shaft input
    /// * `config` - The sizing configuration
    /// * `aggregation` - The aggregated floor totals
    /// * `k_offset` - Summed loss coefficient of the offset elbows
    pub fn new(
        input: &SizingInput,
        config: &'a SizerConfig,
        aggregation: &'a FloorAggregation,
        k_offset: f64,
    ) -> Self {
        Self {
            air: config.air(),
            fittings: config.fittings(),
            aggregation,
            floor_height_ft: input.floor_height_ft,
            duct_after_last_ft: input.duct_after_last_ft,
            offset_length_ft: input
                .offset
                .as_ref()
                .filter(|o| o.elbows > 0)
                .map(|o| o.length_ft),
            k_offset,
            max_delta_p: input.max_delta_p,
            min_velocity_fpm: config.limits().min_velocity_fpm,
            flow_model: input.flow_model,
        }
    }

    /// Returns the allowed bottom-to-top pressure difference (in. WC).
    pub fn max_delta_p(&self) -> f64 {
        self.max_delta_p
    }

    /// Returns the flow model in use.
    pub fn flow_model(&self) -> FlowModel {
        self.flow_model
    }

    /// Evaluates one cross-section.
    ///
    /// Returns `None` when the size is not viable: the subducts leave no
    /// free area, or the maximum velocity is below the minimum velocity.
    pub fn evaluate(&self, shape: ShaftShape) -> Option<ShaftEvaluation> {
        let (gross_area, dh_in, equivalent_d) = match shape {
            ShaftShape::Round { diameter_in } => {
                (circular_area(diameter_in), diameter_in, diameter_in)
            }
            ShaftShape::Rectangular {
                width_in,
                height_in,
            } => (
                width_in * height_in,
                hydraulic_diameter_rect(width_in, height_in),
                huebscher_equivalent_diameter(width_in, height_in),
            ),
        };

        let effective_area = gross_area - self.aggregation.subduct_deduction_sq_in;
        if effective_area <= 0.0 {
            return None;
        }
        let effective_sq_ft = effective_area / SQ_IN_PER_SQ_FT;

        let losses = match self.flow_model {
            FlowModel::Cumulative => self.cumulative_losses(effective_sq_ft, dh_in)?,
            FlowModel::Uniform => self.uniform_losses(effective_sq_ft, dh_in)?,
        };

        Some(self.report(shape, gross_area, effective_area, dh_in, equivalent_d, &losses))
    }

    fn darcy(&self, length_ft: f64, dh_in: f64, sum_k: f64, velocity: f64) -> f64 {
        darcy_pressure_drop(length_ft, dh_in, sum_k, velocity, self.air)
    }

    /// Losses downstream of the top penetration: duct after the last floor
    /// and the offset.
    fn downstream_losses(&self, dh_in: f64, velocity: f64) -> (f64, f64) {
        let dp_after = if self.duct_after_last_ft > 0.0 {
            self.darcy(self.duct_after_last_ft, dh_in, 0.0, velocity)
        } else {
            0.0
        };
        let dp_offset = match self.offset_length_ft {
            Some(length) => self.darcy(length, dh_in, self.k_offset, velocity),
            None => 0.0,
        };
        (dp_after, dp_offset)
    }

    fn cumulative_losses(&self, effective_sq_ft: f64, dh_in: f64) -> Option<Losses> {
        let mut sections = Vec::with_capacity(self.aggregation.floor_design_cfm.len());
        let mut cumulative = 0.0;
        let mut accumulated = 0.0;

        for &floor_cfm in &self.aggregation.floor_design_cfm {
            cumulative += floor_cfm;
            let velocity = cumulative / effective_sq_ft;
            let dp = self.darcy(self.floor_height_ft, dh_in, 0.0, velocity);
            sections.push(Section {
                cfm: cumulative,
                velocity,
                dp,
                accumulated,
            });
            accumulated += dp;
        }

        let bottom = *sections.first()?;
        let top = *sections.last()?;
        if top.velocity < self.min_velocity_fpm {
            return None;
        }

        let vp = velocity_pressure(top.velocity, self.air.density);
        let (dp_after, dp_offset) = self.downstream_losses(dh_in, top.velocity);

        Some(Losses {
            velocity: top.velocity,
            vp,
            dp_shaft: accumulated,
            dp_after,
            dp_offset,
            dp_entry: 0.0,
            dp_exit: self.fittings.exit * vp,
            dp_bottom: bottom.accumulated,
            dp_top: top.accumulated,
            delta_p: top.accumulated - bottom.accumulated,
            sections,
        })
    }

    fn uniform_losses(&self, effective_sq_ft: f64, dh_in: f64) -> Option<Losses> {
        let floors = self.aggregation.floor_design_cfm.len();
        if floors == 0 {
            return None;
        }

        let velocity = self.aggregation.design_cfm / effective_sq_ft;
        if velocity < self.min_velocity_fpm {
            return None;
        }

        let vp = velocity_pressure(velocity, self.air.density);
        let dp_shaft = self.darcy(self.aggregation.total_height_ft, dh_in, 0.0, velocity);
        let (dp_after, dp_offset) = self.downstream_losses(dh_in, velocity);
        let dp_exit = self.fittings.exit * vp;
        let tail = dp_after + dp_offset + dp_exit;

        let section_dp = self.darcy(self.floor_height_ft, dh_in, 0.0, velocity);
        let dp_bottom = dp_shaft + tail;
        let dp_top = section_dp + tail;

        let sections = (0..floors)
            .map(|i| {
                let floors_above = (floors - i) as f64;
                let run = self.darcy(floors_above * self.floor_height_ft, dh_in, 0.0, velocity);
                Section {
                    cfm: self.aggregation.design_cfm,
                    velocity,
                    dp: section_dp,
                    accumulated: run + tail,
                }
            })
            .collect();

        Some(Losses {
            velocity,
            vp,
            dp_shaft,
            dp_after,
            dp_offset,
            dp_entry: self.fittings.entry_bellmouth * vp,
            dp_exit,
            dp_bottom,
            dp_top,
            delta_p: (dp_bottom - dp_top).abs(),
            sections,
        })
    }

    fn report(
        &self,
        shape: ShaftShape,
        gross_area: f64,
        effective_area: f64,
        dh_in: f64,
        equivalent_d: f64,
        losses: &Losses,
    ) -> ShaftEvaluation {
        let floors = losses
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| FloorSection {
                floor: i as u32 + 1,
                cumulative_cfm: round_dp(s.cfm, FLOW_DP),
                velocity_fpm: round_dp(s.velocity, FLOW_DP),
                section_dp: round_dp(s.dp, PRESSURE_DP),
                accumulated_dp: round_dp(s.accumulated, PRESSURE_DP),
            })
            .collect();

        // Cumulative shafts are judged on the reported ΔP, uniform ones on the exact value.
        let delta_p = round_dp(losses.delta_p, PRESSURE_DP);
        let passes = match self.flow_model {
            FlowModel::Cumulative => to_f64(delta_p) <= self.max_delta_p,
            FlowModel::Uniform => losses.delta_p <= self.max_delta_p,
        };

        ShaftEvaluation {
            label: shape.label(),
            shape,
            gross_area_sq_in: round_dp(gross_area, AREA_DP),
            effective_area_sq_in: round_dp(effective_area, AREA_DP),
            hydraulic_diameter_in: round_dp(dh_in, AREA_DP),
            equivalent_diameter_in: round_dp(equivalent_d, AREA_DP),
            velocity_fpm: round_dp(losses.velocity, FLOW_DP),
            velocity_pressure: round_dp(losses.vp, PRESSURE_DP),
            dp_shaft: round_dp(losses.dp_shaft, PRESSURE_DP),
            dp_after: round_dp(losses.dp_after, PRESSURE_DP),
            dp_offset: round_dp(losses.dp_offset, PRESSURE_DP),
            dp_entry: round_dp(losses.dp_entry, PRESSURE_DP),
            dp_exit: round_dp(losses.dp_exit, PRESSURE_DP),
            dp_total: round_dp(losses.total(), PRESSURE_DP),
            dp_bottom: round_dp(losses.dp_bottom, PRESSURE_DP),
            dp_top: round_dp(losses.dp_top, PRESSURE_DP),
            delta_p,
            passes,
            total_cfm: round_dp(self.aggregation.total_cfm, FLOW_DP),
            design_cfm: round_dp(self.aggregation.design_cfm, FLOW_DP),
            total_penetrations: self.aggregation.total_penetrations,
            total_height_ft: round_dp(self.aggregation.total_height_ft, AREA_DP),
            floors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::airflow::aggregate_floors;
    use crate::calculation::offset_loss_coefficient;
    use crate::config::fixtures::standard_config;
    use crate::models::{ElbowAngle, ExhaustType, FloorConfig, OffsetConfig, SizingMode};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ten_storey_input(flow_model: FlowModel) -> SizingInput {
        SizingInput {
            project: None,
            exhaust_type: ExhaustType::ClothesDryers,
            floors: vec![
                FloorConfig {
                    penetrations: 2,
                    subduct_size_in: Some(4),
                    cfm_per_penetration: 100.0,
                };
                10
            ],
            floor_height_ft: 10.0,
            duct_after_last_ft: 20.0,
            diversity_pct: 50.0,
            offset: Some(OffsetConfig {
                elbows: 2,
                length_ft: 10.0,
                angle: ElbowAngle::Deg90,
            }),
            sizing: SizingMode::RoundAuto,
            max_delta_p: 0.25,
            flow_model,
        }
    }

    fn evaluate(input: &SizingInput, shape: ShaftShape) -> Option<ShaftEvaluation> {
        let config = standard_config();
        let agg = aggregate_floors(input, &config, 1).unwrap().aggregation;
        let k = offset_loss_coefficient(input.offset.as_ref(), config.fittings());
        ShaftEvaluator::new(input, &config, &agg, k).evaluate(shape)
    }

    #[test]
    fn test_cumulative_round_shaft() {
        let input = ten_storey_input(FlowModel::Cumulative);
        let eval = evaluate(&input, ShaftShape::Round { diameter_in: 12.0 }).unwrap();

        assert_eq!(eval.label, "12\" Round");
        assert_eq!(eval.gross_area_sq_in, dec("113.10"));
        assert_eq!(eval.effective_area_sq_in, dec("83.10"));
        assert_eq!(eval.hydraulic_diameter_in, dec("12"));
        assert_eq!(eval.velocity_fpm, dec("1733"));
        assert_eq!(eval.velocity_pressure, dec("0.18743"));
        assert_eq!(eval.dp_shaft, dec("0.1353"));
        assert_eq!(eval.dp_after, dec("0.0674"));
        assert_eq!(eval.dp_offset, dec("0.25861"));
        assert_eq!(eval.dp_entry, Decimal::ZERO);
        assert_eq!(eval.dp_exit, dec("0.18743"));
        assert_eq!(eval.dp_total, dec("0.64874"));
        assert_eq!(eval.dp_bottom, Decimal::ZERO);
        assert_eq!(eval.dp_top, dec("0.1016"));
        assert_eq!(eval.delta_p, dec("0.1016"));
        assert!(eval.passes);
        assert_eq!(eval.total_cfm, dec("2000"));
        assert_eq!(eval.design_cfm, dec("1000"));
        assert_eq!(eval.total_penetrations, 20);
        assert_eq!(eval.total_height_ft, dec("100"));
    }

    #[test]
    fn test_cumulative_floor_breakdown() {
        let input = ten_storey_input(FlowModel::Cumulative);
        let eval = evaluate(&input, ShaftShape::Round { diameter_in: 12.0 }).unwrap();

        let accumulated: Vec<Decimal> = eval.floors.iter().map(|f| f.accumulated_dp).collect();
        let expected: Vec<Decimal> = [
            "0", "0.00051", "0.00227", "0.00593", "0.0121", "0.0214", "0.03441", "0.05173",
            "0.07393", "0.1016",
        ]
        .iter()
        .map(|s| dec(s))
        .collect();
        assert_eq!(accumulated, expected);

        let velocities: Vec<Decimal> = eval.floors.iter().map(|f| f.velocity_fpm).collect();
        let expected: Vec<Decimal> = [
            "173", "347", "520", "693", "866", "1040", "1213", "1386", "1560", "1733",
        ]
        .iter()
        .map(|s| dec(s))
        .collect();
        assert_eq!(velocities, expected);

        assert_eq!(eval.floors[0].section_dp, dec("0.00051"));
        assert_eq!(eval.floors[9].section_dp, dec("0.0337"));
        assert_eq!(eval.floors[9].cumulative_cfm, dec("1000"));
        assert_eq!(eval.floors[0].floor, 1);
    }

    #[test]
    fn test_uniform_round_shaft() {
        let input = ten_storey_input(FlowModel::Uniform);
        let eval = evaluate(&input, ShaftShape::Round { diameter_in: 14.0 }).unwrap();

        assert_eq!(eval.effective_area_sq_in, dec("123.94"));
        assert_eq!(eval.velocity_fpm, dec("1162"));
        assert_eq!(eval.velocity_pressure, dec("0.08426"));
        assert_eq!(eval.dp_shaft, dec("0.13245"));
        assert_eq!(eval.dp_after, dec("0.02649"));
        assert_eq!(eval.dp_offset, dec("0.11435"));
        assert_eq!(eval.dp_entry, dec("0.00253"));
        assert_eq!(eval.dp_exit, dec("0.08426"));
        assert_eq!(eval.dp_total, dec("0.36008"));
        assert_eq!(eval.dp_bottom, dec("0.35755"));
        assert_eq!(eval.dp_top, dec("0.23834"));
        assert_eq!(eval.delta_p, dec("0.11921"));
        assert!(eval.passes);

        assert_eq!(eval.floors.first().unwrap().accumulated_dp, eval.dp_bottom);
        assert_eq!(eval.floors.last().unwrap().accumulated_dp, eval.dp_top);
    }

    #[test]
    fn test_cumulative_pass_uses_reported_delta_p() {
        let mut input = ten_storey_input(FlowModel::Cumulative);
        input.max_delta_p = 0.1016;
        let eval = evaluate(&input, ShaftShape::Round { diameter_in: 12.0 }).unwrap();
        assert_eq!(eval.delta_p, dec("0.1016"));
        assert!(eval.passes);

        input.max_delta_p = 0.10159;
        let eval = evaluate(&input, ShaftShape::Round { diameter_in: 12.0 }).unwrap();
        assert!(!eval.passes);
    }

    #[test]
    fn test_user_rectangle() {
        let input = ten_storey_input(FlowModel::Cumulative);
        let eval = evaluate(&input, ShaftShape::rectangular(12.0, 24.0)).unwrap();

        assert_eq!(eval.label, "24\" × 12\" Rect");
        assert_eq!(eval.gross_area_sq_in, dec("288"));
        assert_eq!(eval.effective_area_sq_in, dec("258"));
        assert_eq!(eval.hydraulic_diameter_in, dec("16"));
        assert_eq!(eval.equivalent_diameter_in, dec("18.28"));
        assert_eq!(eval.velocity_fpm, dec("558"));
        assert_eq!(eval.dp_total, dec("0.06346"));
        assert_eq!(eval.delta_p, dec("0.00899"));
    }

    #[test]
    fn test_subducts_filling_shaft_not_viable() {
        let mut input = ten_storey_input(FlowModel::Cumulative);
        for floor in &mut input.floors {
            floor.subduct_size_in = Some(8);
        }
        // 2 × 54 sq.in. of subducts exceed an 8" shaft's 50.27 sq.in.
        assert!(evaluate(&input, ShaftShape::Round { diameter_in: 8.0 }).is_none());
    }

    #[test]
    fn test_slow_shaft_not_viable() {
        let mut input = ten_storey_input(FlowModel::Uniform);
        input.floors = vec![
            FloorConfig {
                penetrations: 1,
                subduct_size_in: None,
                cfm_per_penetration: 50.0,
            };
            2
        ];
        assert!(evaluate(&input, ShaftShape::Round { diameter_in: 48.0 }).is_none());

        input.flow_model = FlowModel::Cumulative;
        assert!(evaluate(&input, ShaftShape::Round { diameter_in: 48.0 }).is_none());
    }

    #[test]
    fn test_no_offset_has_no_offset_loss() {
        let mut input = ten_storey_input(FlowModel::Cumulative);
        input.offset = None;
        input.duct_after_last_ft = 0.0;
        let eval = evaluate(&input, ShaftShape::Round { diameter_in: 12.0 }).unwrap();

        assert_eq!(eval.dp_offset, Decimal::ZERO);
        assert_eq!(eval.dp_after, Decimal::ZERO);
        assert_eq!(eval.dp_shaft, dec("0.1353"));
        assert_eq!(eval.dp_total, dec("0.32272"));
    }
}
