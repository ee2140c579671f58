//! Markdown sizing report.
//!
//! [`SizingReport`] renders a [`SizingResult`] as a multi-section Markdown
//! document: cover and summary, design inputs, the recommended shaft, the
//! floor-by-floor pressure table, the selected equipment and the disclaimer.
//! The date is passed in so a report can be reproduced exactly.
//! [`CsiSpec`] writes the same result up as a CSI specification section.

mod csi;

pub use csi::CsiSpec;

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::SizerConfig;
use crate::models::{FlowModel, SizingResult};

/// Floors listed in the floor-by-floor table before it is cut short.
pub const MAX_REPORTED_FLOORS: usize = 20;

/// A sizing result bound to the catalog and date it is reported against.
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use shaft_sizer::calculation::run_sizing;
/// use shaft_sizer::config::ConfigLoader;
/// use shaft_sizer::report::SizingReport;
/// # fn demo(input: shaft_sizer::models::SizingInput) -> Result<(), Box<dyn std::error::Error>> {
/// let loader = ConfigLoader::load("./config/lf_systems")?;
/// let result = run_sizing(&input, loader.config())?;
/// let date = NaiveDate::from_ymd_opt(2026, 3, 1).ok_or("bad date")?;
/// let markdown = SizingReport::new(&result, loader.config(), date).to_string();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SizingReport<'a> {
    result: &'a SizingResult,
    config: &'a SizerConfig,
    date: NaiveDate,
}

impl<'a> SizingReport<'a> {
    /// Creates a report for a sizing result.
    pub fn new(result: &'a SizingResult, config: &'a SizerConfig, date: NaiveDate) -> Self {
        Self {
            result,
            config,
            date,
        }
    }

    fn project_name(&self) -> &str {
        self.result
            .input
            .project
            .as_ref()
            .map(|p| p.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Untitled Project")
    }

    fn location(&self) -> &str {
        self.result
            .input
            .project
            .as_ref()
            .map(|p| p.location.as_str())
            .unwrap_or("")
    }

    fn prepared_by(&self) -> &str {
        self.result
            .input
            .project
            .as_ref()
            .map(|p| p.prepared_by.as_str())
            .unwrap_or("")
    }

    fn status(&self) -> &'static str {
        if self.result.shaft.passes { "PASS" } else { "FAIL" }
    }

    fn write_cover(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let system = self.config.system();

        writeln!(f, "# {} SHAFT SIZING REPORT", system.code)?;
        writeln!(f)?;
        writeln!(f, "### {}", system.name)?;
        writeln!(f)?;
        writeln!(f, "**Project:** {}  ", self.project_name())?;
        writeln!(f, "**Location:** {}  ", self.location())?;
        writeln!(f, "**Exhaust Type:** {}  ", result.input.exhaust_type.display_name())?;
        writeln!(f, "**Prepared by:** {}  ", self.prepared_by())?;
        writeln!(f, "**Date:** {}", self.date.format("%B %Y"))?;
        writeln!(f)?;
        writeln!(f, "## System at a Glance")?;
        writeln!(f)?;
        writeln!(f, "| | |")?;
        writeln!(f, "|---|---|")?;
        writeln!(f, "| Building Floors | {} |", result.input.floor_count())?;
        writeln!(f, "| Design CFM | {} CFM |", grouped(result.shaft.design_cfm))?;
        writeln!(f, "| Recommended Shaft | {} |", result.shaft.label)?;
        writeln!(f, "| Selected Fan | {} |", result.fan.display_model())?;
        writeln!(f, "| Controller | {} |", result.controller.model)?;
        writeln!(f, "| System Status | {} |", self.status())?;
        writeln!(f, "| Total System dP | {} in. WC |", fixed(result.shaft.dp_total, 3))?;
        writeln!(f)?;
        writeln!(
            f,
            "{} | {} | {} | {}",
            system.manufacturer, system.address, system.phone, system.website
        )?;
        writeln!(f)
    }

    fn write_design_inputs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = &self.result.input;
        let shaft = &self.result.shaft;
        let air = self.config.air();
        let first = input.floors.first();
        let total_cfm: f64 = input
            .floors
            .iter()
            .map(|fl| fl.penetrations as f64 * fl.cfm_per_penetration)
            .sum();

        writeln!(f, "## Design Inputs")?;
        writeln!(f)?;
        writeln!(f, "| Parameter | Value |")?;
        writeln!(f, "|---|---|")?;
        writeln!(f, "| Exhaust Type | {} |", input.exhaust_type.display_name())?;
        writeln!(f, "| Number of Floors | {} |", input.floor_count())?;
        if let Some(first) = first {
            writeln!(f, "| Penetrations per Floor | {} |", first.penetrations)?;
        }
        writeln!(f, "| Total Penetrations | {} |", shaft.total_penetrations)?;
        match first.and_then(|fl| fl.subduct_size_in) {
            Some(size) => writeln!(f, "| Subduct Size | {}\" diameter |", size)?,
            None => writeln!(f, "| Subducts | None (wall openings) |")?,
        }
        if let Some(first) = first {
            writeln!(
                f,
                "| CFM per Penetration | {} CFM |",
                grouped_f64(first.cfm_per_penetration)
            )?;
        }
        writeln!(f, "| Total CFM (all units) | {} CFM |", grouped_f64(total_cfm))?;
        writeln!(f, "| Diversity Factor | {:.0}% |", input.diversity_pct)?;
        writeln!(f, "| Design CFM | {} CFM |", grouped(shaft.design_cfm))?;
        writeln!(f, "| Floor-to-Floor Height | {:.1} ft |", input.floor_height_ft)?;
        writeln!(f, "| Total Shaft Height | {} ft |", fixed(shaft.total_height_ft, 1))?;
        writeln!(f, "| Duct After Last Unit | {:.1} ft |", input.duct_after_last_ft)?;
        match &input.offset {
            Some(offset) => writeln!(
                f,
                "| Shaft Offset | {} × {}° elbows, {:.1} ft |",
                offset.elbows,
                offset.angle.degrees(),
                offset.length_ft
            )?,
            None => writeln!(f, "| Shaft Offset | None |")?,
        }
        writeln!(f, "| Airflow Model | {} |", flow_model_name(input.flow_model))?;
        writeln!(f)?;
        writeln!(f, "### Design Criteria")?;
        writeln!(f)?;
        writeln!(f, "| Criterion | Limit |")?;
        writeln!(f, "|---|---|")?;
        writeln!(f, "| Max floor-to-floor dP | {:.2} in. WC |", input.max_delta_p)?;
        writeln!(f, "| Air density (standard) | {} lb/ft³ |", air.density)?;
        writeln!(f, "| Duct roughness | {} ft |", air.roughness_ft)?;
        writeln!(f, "| Engineering basis | ASHRAE 2009 Duct Design Ch. 21 |")?;
        writeln!(f)
    }

    fn write_shaft(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shaft = &self.result.shaft;
        let deduction = shaft.gross_area_sq_in - shaft.effective_area_sq_in;

        writeln!(f, "## Recommended Shaft Size")?;
        writeln!(f)?;
        writeln!(f, "### {}: {}", self.status(), shaft.label)?;
        writeln!(f)?;
        writeln!(f, "| Metric | Value |")?;
        writeln!(f, "|---|---|")?;
        writeln!(f, "| Shaft Dimensions | {} |", shaft.label)?;
        writeln!(
            f,
            "| Gross Cross-Section | {} sq. in. |",
            fixed(shaft.gross_area_sq_in, 0)
        )?;
        if deduction > Decimal::ZERO {
            writeln!(f, "| Subduct Deductions | {} sq. in. |", fixed(deduction, 0))?;
        }
        writeln!(
            f,
            "| Net Effective Area | {} sq. in. |",
            fixed(shaft.effective_area_sq_in, 0)
        )?;
        writeln!(
            f,
            "| Hydraulic Diameter | {} in. |",
            fixed(shaft.hydraulic_diameter_in, 1)
        )?;
        writeln!(f, "| Maximum Velocity | {} FPM |", grouped(shaft.velocity_fpm))?;
        writeln!(f)?;
        writeln!(f, "### Pressure Drop Breakdown")?;
        writeln!(f)?;
        writeln!(f, "| Component | dP (in. WC) |")?;
        writeln!(f, "|---|---|")?;
        writeln!(f, "| Shaft Friction | {} |", fixed(shaft.dp_shaft, 4))?;
        writeln!(f, "| After-Unit Duct Loss | {} |", fixed(shaft.dp_after, 4))?;
        writeln!(f, "| Offset Losses | {} |", fixed(shaft.dp_offset, 4))?;
        if shaft.dp_entry > Decimal::ZERO {
            writeln!(f, "| Entry Loss | {} |", fixed(shaft.dp_entry, 4))?;
        }
        writeln!(f, "| Exit / Fan Entry Loss | {} |", fixed(shaft.dp_exit, 4))?;
        writeln!(f, "| **Total System dP** | **{}** |", fixed(shaft.dp_total, 4))?;
        writeln!(f)?;
        writeln!(
            f,
            "The bottom-to-top floor differential of {} in. WC is {} the {:.2} in. WC design limit.",
            fixed(shaft.delta_p, 3),
            if shaft.passes { "within" } else { "exceeding" },
            self.result.input.max_delta_p
        )?;
        writeln!(f)
    }

    fn write_floor_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let floors = &self.result.shaft.floors;
        let top = self.result.input.floor_count();

        writeln!(f, "## Floor-by-Floor Pressure Analysis")?;
        writeln!(f)?;
        match self.result.input.flow_model {
            FlowModel::Cumulative => writeln!(
                f,
                "The fan on the roof pulls air upward. Floor 1 (bottom) sees no shaft \
                 resistance; each higher floor accumulates more friction as the airflow builds."
            )?,
            FlowModel::Uniform => writeln!(
                f,
                "The full design airflow is carried over the whole shaft height. The bottom \
                 floor sees the friction of the entire shaft."
            )?,
        }
        writeln!(f)?;
        writeln!(f, "| Floor | Cumul. CFM | Velocity (FPM) | Section dP | Accumulated dP |")?;
        writeln!(f, "|---|---|---|---|---|")?;
        for section in floors.iter().take(MAX_REPORTED_FLOORS) {
            let position = if section.floor == 1 {
                " (Bottom)"
            } else if section.floor == top {
                " (Top)"
            } else {
                ""
            };
            writeln!(
                f,
                "| {}{} | {} | {} | {} | {} |",
                section.floor,
                position,
                grouped(section.cumulative_cfm),
                grouped(section.velocity_fpm),
                fixed(section.section_dp, 4),
                fixed(section.accumulated_dp, 4)
            )?;
        }
        if floors.len() > MAX_REPORTED_FLOORS {
            writeln!(f)?;
            writeln!(
                f,
                "_{} further floors are not listed._",
                floors.len() - MAX_REPORTED_FLOORS
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "The constant pressure controller compensates for varying usage by modulating \
             the fan speed in real time."
        )?;
        writeln!(f)
    }

    fn write_alternatives(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alternatives = &self.result.alternatives;
        if alternatives.len() <= 1 {
            return Ok(());
        }

        writeln!(f, "## Alternative Sizes")?;
        writeln!(f)?;
        writeln!(f, "| Shaft | Net Area (sq. in.) | Velocity (FPM) | Floor dP | Total dP |")?;
        writeln!(f, "|---|---|---|---|---|")?;
        for alt in alternatives {
            writeln!(
                f,
                "| {} | {} | {} | {} | {} |",
                alt.label,
                fixed(alt.effective_area_sq_in, 0),
                grouped(alt.velocity_fpm),
                fixed(alt.delta_p, 4),
                fixed(alt.dp_total, 4)
            )?;
        }
        writeln!(f)
    }

    fn write_fan(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fan = &self.result.fan;
        let specs = &fan.specs;

        writeln!(f, "## Fan Selection: {}", fan.display_model())?;
        writeln!(f)?;
        writeln!(f, "| Specification | Value |")?;
        writeln!(f, "|---|---|")?;
        writeln!(f, "| Design Airflow | {} CFM |", grouped(fan.design_cfm))?;
        writeln!(f, "| System Static Pressure | {} in. WC |", fixed(fan.system_sp, 4))?;
        writeln!(f, "| Available CFM at Design SP | {} CFM |", grouped(fan.available_cfm))?;
        writeln!(f, "| Operating SP | {} in. WC |", fixed(fan.operating_sp, 4))?;
        writeln!(f, "| Capacity Margin | {}% |", fan.margin_pct)?;
        if let Some(per_fan) = fan.cfm_per_fan {
            writeln!(f, "| CFM per Fan | {} CFM |", grouped(per_fan))?;
        }
        writeln!(f, "| Voltage | {} |", specs.voltage)?;
        writeln!(f, "| Horsepower | {} |", specs.hp)?;
        writeln!(f, "| Motor Type | {} |", specs.motor)?;
        writeln!(f, "| Impeller | {} |", specs.impeller)?;
        writeln!(f, "| RPM | {} |", specs.rpm)?;
        writeln!(f, "| Weight | {} |", specs.weight)?;
        writeln!(f)?;
        writeln!(
            f,
            "Recommended for {}: {}.",
            self.result.input.exhaust_type.display_name(),
            self.result.input.exhaust_type.recommended_fan()
        )?;
        if let Some(booster) = self.result.input.exhaust_type.recommended_booster() {
            writeln!(f, "Booster: {}.", booster)?;
        }
        writeln!(f)?;
        writeln!(f, "### Fan Family")?;
        writeln!(f)?;
        writeln!(f, "| Model | Max CFM | Max SP | Voltage | HP | Motor | Impeller |")?;
        writeln!(f, "|---|---|---|---|---|---|---|")?;
        for spec in self.config.fans() {
            let max_cfm = spec.curve.first().map_or(0.0, |p| p.cfm);
            let max_sp = spec.curve.last().map_or(0.0, |p| p.sp);
            writeln!(
                f,
                "| {} | {:.0} | {} in. | {} | {} | {} | {} |",
                spec.model, max_cfm, max_sp, spec.voltage, spec.hp, spec.motor, spec.impeller
            )?;
        }
        writeln!(f)
    }

    fn write_controller(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let controller = &self.result.controller;

        writeln!(f, "## Controller Selection: {}", controller.model)?;
        writeln!(f)?;
        writeln!(f, "### {} ({})", controller.name, controller.system)?;
        writeln!(f)?;
        writeln!(f, "{}", controller.reason)?;
        writeln!(f)?;
        writeln!(f, "| Specification | Value |")?;
        writeln!(f, "|---|---|")?;
        writeln!(f, "| System | {} |", controller.system)?;
        writeln!(f, "| Control Signal | 0-10 VDC |")?;
        writeln!(f, "| Listings | {} |", controller.listings)?;
        writeln!(f, "| Pressure Transducers | {} |", controller.transducers)?;
        writeln!(f, "| Accessories | {} |", controller.accessories)?;
        writeln!(f)?;
        writeln!(f, "| Building Height | Controller | System |")?;
        writeln!(f, "|---|---|---|")?;
        let mut previous: Option<u32> = None;
        for spec in self.config.controllers() {
            let height = match (spec.max_floors, previous) {
                (Some(max), _) => format!("Up to {} stories", max),
                (None, Some(prev)) => format!("Over {} stories", prev),
                (None, None) => "Any height".to_string(),
            };
            writeln!(f, "| {} | {} | {} |", height, spec.model, spec.system)?;
            previous = spec.max_floors.or(previous);
        }
        writeln!(f)
    }

    fn write_notes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let warnings = self.result.warnings();

        writeln!(f, "## Engineering Notes")?;
        writeln!(f)?;
        if warnings.is_empty() {
            writeln!(f, "- No design warnings were raised.")?;
        }
        for warning in warnings {
            writeln!(f, "- **{}** ({}): {}", warning.code, warning.severity, warning.message)?;
        }
        writeln!(
            f,
            "- Friction losses use the Darcy-Weisbach equation with the Colebrook friction factor."
        )?;
        writeln!(
            f,
            "- Calculation {} by engine version {}.",
            self.result.calculation_id, self.result.engine_version
        )?;
        writeln!(f)
    }

    fn write_disclaimer(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let system = self.config.system();

        writeln!(f, "## Contact and Disclaimer")?;
        writeln!(f)?;
        writeln!(f, "**Project:** {}  ", self.project_name())?;
        writeln!(f, "**Location:** {}  ", self.location())?;
        writeln!(f, "**Prepared for:** {}", self.prepared_by())?;
        writeln!(f)?;
        writeln!(
            f,
            "Contact {}: Phone {} | Web {} | {}",
            system.manufacturer, system.phone, system.website, system.address
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "This report is generated by the {} {} sizing calculator for estimation purposes. \
             Calculations follow ASHRAE 2009 Duct Design Chapter 21. Final design must be \
             verified by a licensed professional engineer.",
            system.manufacturer, system.code
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "**IMPORTANT:** All shaft sizing calculations and subduct area deductions are based \
             on the use of {} SD Series Low Profile Subducts. Alternative subduct products may \
             have different area deductions and require the shaft to be resized.",
            system.manufacturer
        )
    }
}

impl fmt::Display for SizingReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_cover(f)?;
        self.write_design_inputs(f)?;
        self.write_shaft(f)?;
        self.write_floor_table(f)?;
        self.write_alternatives(f)?;
        self.write_fan(f)?;
        self.write_controller(f)?;
        self.write_notes(f)?;
        self.write_disclaimer(f)
    }
}

fn flow_model_name(model: FlowModel) -> &'static str {
    match model {
        FlowModel::Cumulative => "Cumulative (airflow builds floor by floor)",
        FlowModel::Uniform => "Uniform (full design airflow over the shaft height)",
    }
}

/// Formats a value to exactly `dp` decimal places, rounding half away from
/// zero.
pub(crate) fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// Formats a whole number with thousands separators ("12,480").
pub(crate) fn grouped(value: Decimal) -> String {
    let rounded = value.round().normalize().to_string();
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{}{}", sign, out)
}

pub(crate) fn grouped_f64(value: f64) -> String {
    grouped(Decimal::from_f64_retain(value).unwrap_or_default())
}
