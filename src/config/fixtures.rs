//! In-memory copy of the standard catalog for unit tests.

use std::collections::BTreeMap;

use super::types::{
    AirProperties, ControllerSpec, DesignLimits, FanCurvePoint, FanSpec, FittingCoefficients,
    SizeTable, SizerConfig, SystemMetadata,
};

fn fan(model: &str, order: u32, voltage: &str, hp: &str, curve: &[(f64, f64)]) -> FanSpec {
    FanSpec {
        model: model.to_string(),
        order,
        voltage: voltage.to_string(),
        hp: hp.to_string(),
        motor: if order <= 4 { "EC" } else { "ID" }.to_string(),
        amps: "6.25".to_string(),
        weight: "35 lbs".to_string(),
        inlet: "8\"".to_string(),
        impeller: if order <= 4 { "BI" } else { "BC" }.to_string(),
        rpm: "1950".to_string(),
        curve: curve
            .iter()
            .map(|&(cfm, sp)| FanCurvePoint { cfm, sp })
            .collect(),
    }
}

pub(crate) fn standard_config() -> SizerConfig {
    let metadata = SystemMetadata {
        code: "MES".to_string(),
        name: "Multi-Family Exhaust Shaft".to_string(),
        manufacturer: "LF Systems".to_string(),
        website: "https://www.lfsystems.net".to_string(),
        phone: "817-393-4029".to_string(),
        address: "100 S Sylvania Ave, Fort Worth, TX 76111".to_string(),
    };

    let air = AirProperties {
        density: 0.075,
        roughness_ft: 0.0003,
        kinematic_viscosity: 1.63e-4,
    };

    let limits = DesignLimits {
        max_delta_p: 0.25,
        min_delta_p: 0.01,
        max_floors: 120,
        min_diversity_pct: 20.0,
        max_diversity_pct: 100.0,
        max_penetrations_per_floor: 2,
        min_user_diameter_in: 6.0,
        max_user_diameter_in: 60.0,
        min_user_rect_side_in: 6.0,
        min_velocity_fpm: 50.0,
        candidate_velocity_min_fpm: 100.0,
        candidate_velocity_max_fpm: 3000.0,
        max_aspect_ratio: 4.0,
        max_alternatives: 8,
        system_curve_points: 20,
        system_curve_span: 1.2,
    };

    let fittings = FittingCoefficients {
        elbow_90: 0.60,
        elbow_45: 0.30,
        tee_branch: 0.50,
        exit: 1.00,
        entry_bellmouth: 0.03,
        entry_abrupt: 0.50,
        steep_elbow_threshold_deg: 60,
    };

    let subducts = BTreeMap::from([(4, 15.0), (6, 31.5), (8, 54.0)]);

    let sizes = SizeTable {
        round_diameters_in: (8..=48).step_by(2).collect(),
        rect_sides_in: (6..=48).step_by(2).collect(),
    };

    let controllers = vec![
        ControllerSpec {
            model: "L150.H".to_string(),
            name: "L150 Constant Pressure Controller".to_string(),
            system: "HRS (High-Rise System)".to_string(),
            accessories: "LP5, SLT, DP".to_string(),
            listings: "UL508, CSA C22.2 No 14-18".to_string(),
            max_floors: Some(7),
            transducers: 1,
            selection_note: "≤7 → L150-H".to_string(),
        },
        ControllerSpec {
            model: "L152.M".to_string(),
            name: "L152 Constant Pressure Controller".to_string(),
            system: "MES (Multi-Story Exhaust System)".to_string(),
            accessories: "(2) LP5, (2) SLT, (2) DP".to_string(),
            listings: "UL508, UL864, CSA C22.2 No 14-18".to_string(),
            max_floors: None,
            transducers: 2,
            selection_note: ">7 → L152 for stack effect mitigation".to_string(),
        },
    ];

    let fans = vec![
        fan(
            "DEF050",
            6,
            "208/480V/3ph",
            "5",
            &[
                (5850.0, 0.0),
                (5660.0, 0.25),
                (5450.0, 0.50),
                (5300.0, 0.75),
                (5090.0, 1.00),
                (4890.0, 1.25),
                (4680.0, 1.50),
                (4460.0, 1.75),
                (4230.0, 2.00),
            ],
        ),
        fan(
            "DEF004",
            1,
            "120V/1ph",
            "1/2",
            &[
                (540.0, 0.0),
                (490.0, 0.25),
                (430.0, 0.50),
                (350.0, 0.75),
                (240.0, 1.00),
            ],
        ),
        fan(
            "DEF008",
            2,
            "120V/1ph",
            "1/2",
            &[
                (970.0, 0.0),
                (890.0, 0.25),
                (840.0, 0.50),
                (780.0, 0.75),
                (680.0, 1.00),
                (540.0, 1.25),
                (440.0, 1.50),
                (270.0, 1.75),
            ],
        ),
        fan(
            "DEF015",
            3,
            "120V/1ph",
            "1/2",
            &[
                (1860.0, 0.0),
                (1780.0, 0.25),
                (1700.0, 0.50),
                (1610.0, 0.75),
                (1520.0, 1.00),
                (1410.0, 1.25),
                (1280.0, 1.50),
                (1140.0, 1.75),
                (990.0, 2.00),
            ],
        ),
        fan(
            "DEF025",
            4,
            "120V/1ph",
            "1",
            &[
                (2480.0, 0.0),
                (2400.0, 0.25),
                (2320.0, 0.50),
                (2230.0, 0.75),
                (2140.0, 1.00),
                (2040.0, 1.25),
                (1930.0, 1.50),
                (1790.0, 1.75),
                (1630.0, 2.00),
            ],
        ),
        fan(
            "DEF035",
            5,
            "208/480V/3ph",
            "3",
            &[
                (4100.0, 0.0),
                (3940.0, 0.25),
                (3770.0, 0.50),
                (3610.0, 0.75),
                (3460.0, 1.00),
                (3300.0, 1.25),
                (3120.0, 1.50),
                (2900.0, 1.75),
                (2630.0, 2.00),
            ],
        ),
    ];

    SizerConfig::new(
        metadata,
        air,
        limits,
        fittings,
        subducts,
        sizes,
        controllers,
        fans,
    )
}
