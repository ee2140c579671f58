//! CSI Section 23 34 00 specification.
//!
//! [`CsiSpec`] renders a sizing result as the three-part guide specification
//! (general, products, execution) an engineer drops into the project manual.

use std::fmt;

use crate::config::SizerConfig;
use crate::models::SizingResult;

use super::{fixed, grouped};

const SECTION: &str = "23 34 00";

/// A sizing result written up as a Markdown CSI specification section.
#[derive(Debug, Clone, Copy)]
pub struct CsiSpec<'a> {
    result: &'a SizingResult,
    config: &'a SizerConfig,
}

impl<'a> CsiSpec<'a> {
    /// Creates the specification for a sizing result.
    pub fn new(result: &'a SizingResult, config: &'a SizerConfig) -> Self {
        Self { result, config }
    }

    fn dual_transducers(&self) -> bool {
        self.result.controller.transducers > 1
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# SECTION {}", SECTION)?;
        writeln!(f)?;
        writeln!(f, "## HVAC FANS - HIGH-RISE EXHAUST SHAFT SYSTEM")?;
        writeln!(f)?;

        let Some(project) = self.result.input.project.as_ref() else {
            return Ok(());
        };
        let mut parts = Vec::new();
        if !project.name.is_empty() {
            parts.push(format!("**Project:** {}", project.name));
        }
        if !project.location.is_empty() {
            parts.push(format!("**Location:** {}", project.location));
        }
        if parts.is_empty() {
            return Ok(());
        }
        if !project.prepared_by.is_empty() {
            parts.push(format!("**Prepared by:** {}", project.prepared_by));
        }
        writeln!(f, "{}", parts.join(" | "))?;
        writeln!(f)
    }

    fn write_general(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = &self.result.input;
        let controller = &self.result.controller;

        writeln!(f, "### PART 1 - GENERAL")?;
        writeln!(f)?;
        writeln!(f, "#### 1.01 SECTION INCLUDES")?;
        writeln!(f)?;
        writeln!(
            f,
            "- High-rise exhaust shaft system for {} serving {} floors",
            input.exhaust_type.display_name().to_lowercase(),
            input.floor_count()
        )?;
        writeln!(
            f,
            "- Variable speed exhaust fan(s): {}",
            self.result.fan.display_model()
        )?;
        writeln!(f, "- Constant pressure controller: {}", controller.model)?;
        writeln!(f, "- Associated sensors, accessories, and wiring")?;
        writeln!(f, "- Fire-rated exhaust shaft construction per local building code")?;
        writeln!(f)?;

        writeln!(f, "#### 1.02 REFERENCES")?;
        writeln!(f)?;
        for reference in [
            "ASHRAE Handbook: HVAC Systems and Equipment",
            "ASHRAE Handbook: Fundamentals, Chapter 21: Duct Design",
            "NFPA 90A: Standard for the Installation of Air-Conditioning and Ventilating Systems",
            "NFPA 90B: Standard for the Installation of Warm Air Heating and Air-Conditioning Systems",
            "UL 705: Standard for Safety Power Ventilators",
            "UL 508: Standard for Industrial Control Equipment",
            "UL 864: Standard for Control Units and Accessories for Fire Alarm Systems",
            "IMC: International Mechanical Code, current edition",
            "SMACNA: HVAC Duct Construction Standards",
        ] {
            writeln!(f, "- {}", reference)?;
        }
        writeln!(f)?;

        writeln!(f, "#### 1.03 SUBMITTALS")?;
        writeln!(f)?;
        writeln!(f, "- Product data sheets for exhaust fan(s) and controller(s)")?;
        writeln!(f, "- Fan performance curves showing operating point")?;
        writeln!(f, "- System pressure drop calculations")?;
        writeln!(f, "- Wiring diagrams")?;
        writeln!(f, "- Installation and maintenance manuals")?;
        writeln!(f, "- Warranty documentation")?;
        writeln!(f)?;

        writeln!(f, "#### 1.04 QUALITY ASSURANCE")?;
        writeln!(f)?;
        writeln!(f, "- Exhaust fan(s) shall be ETL listed to UL 705")?;
        writeln!(f, "- Controller shall be UL 508 listed for industrial control equipment")?;
        if controller.listings.replace(' ', "").contains("UL864") {
            writeln!(
                f,
                "- Controller shall be UL 864 listed for fire alarm system integration"
            )?;
        }
        writeln!(f, "- Fan manufacturer shall provide a minimum 2-year mechanical warranty")?;
        writeln!(f, "- System shall be designed and tested by the manufacturer")?;
        writeln!(f)?;

        writeln!(f, "#### 1.05 DELIVERY, STORAGE, AND HANDLING")?;
        writeln!(f)?;
        writeln!(f, "- Deliver products in factory-sealed packaging")?;
        writeln!(f, "- Store in clean, dry, ventilated area protected from weather")?;
        writeln!(
            f,
            "- Handle equipment carefully to prevent damage to impellers and motors"
        )?;
        writeln!(f)?;

        writeln!(f, "#### 1.06 WARRANTY")?;
        writeln!(f)?;
        writeln!(
            f,
            "- Manufacturer shall provide a minimum 2-year warranty on all mechanical components"
        )?;
        writeln!(f, "- Controller shall carry a minimum 2-year warranty")?;
        writeln!(f)
    }

    fn write_products(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let system = self.config.system();
        let input = &self.result.input;
        let shaft = &self.result.shaft;
        let fan = &self.result.fan;
        let specs = &fan.specs;
        let controller = &self.result.controller;

        writeln!(f, "### PART 2 - PRODUCTS")?;
        writeln!(f)?;
        writeln!(f, "#### 2.01 MANUFACTURERS")?;
        writeln!(f)?;
        writeln!(
            f,
            "- {}, {} ({})",
            system.manufacturer, system.address, system.website
        )?;
        writeln!(f, "- No substitutions without prior written approval")?;
        writeln!(f)?;

        writeln!(f, "#### 2.02 EXHAUST FAN: {}", fan.model)?;
        writeln!(f)?;
        writeln!(f, "- Model: {} Dynamic Exhaust Fan", fan.display_model())?;
        writeln!(
            f,
            "- Capacity: {} CFM at {} in. WC static pressure",
            grouped(shaft.design_cfm),
            fixed(shaft.dp_total, 2)
        )?;
        writeln!(
            f,
            "- Motor: {} HP, {}, {} type, {} RPM",
            specs.hp, specs.voltage, specs.motor, specs.rpm
        )?;
        writeln!(
            f,
            "- Impeller: {}, backward inclined (BI) or backward curved (BC), 5052 aluminum, \
             dynamically balanced",
            specs.impeller
        )?;
        writeln!(f, "- Housing: G90 galvanized steel with integrated clean-out access panel")?;
        writeln!(f, "- Construction: AMCA 99-0401 Type B Spark Resistant")?;
        writeln!(f, "- Listings: ETL listed to UL 705; CSA C22.2")?;
        writeln!(f, "- Suitable for indoor or outdoor installation")?;
        if let (true, Some(per_fan)) = (fan.parallel, fan.cfm_per_fan) {
            writeln!(
                f,
                "- Provide {} fans piped in parallel, each rated for {} CFM",
                fan.quantity,
                grouped(per_fan)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "#### 2.03 CONTROLLER: {}", controller.model)?;
        writeln!(f)?;
        writeln!(f, "- Model: {} ({})", controller.model, controller.name)?;
        writeln!(f, "- System: {}", controller.system)?;
        writeln!(
            f,
            "- Function: Maintain constant negative pressure in exhaust shaft using \
             EC-Flow Technology"
        )?;
        writeln!(f, "- Input: 24V AC/DC")?;
        writeln!(f, "- Output: 0-10 VDC control signal to fan VFD or EC motor")?;
        writeln!(f, "- Display: LCD with 4-button interface")?;
        writeln!(f, "- Communication: Modbus RTU RS485")?;
        writeln!(f, "- Listings: {}", controller.listings)?;
        writeln!(f, "- Accessories: {}", controller.accessories)?;
        if self.dual_transducers() {
            writeln!(
                f,
                "- Two pressure transducers installed above and below the neutral pressure \
                 plane to mitigate seasonal stack effect and reverse stack effect"
            )?;
            writeln!(f, "- Dedicated input for smoke control system integration")?;
        }
        writeln!(f)?;

        writeln!(f, "#### 2.04 ACCESSORIES")?;
        writeln!(f)?;
        writeln!(f, "- LP5: Bi-directional pressure transducer")?;
        writeln!(f, "- SLT: Silicone tubing")?;
        writeln!(f, "- DP: Duct static pressure pickup(s)")?;
        if specs.motor == "ID" || specs.motor.contains("VFD") {
            writeln!(
                f,
                "- CFW500 Variable Frequency Drive: NEMA 4X, pre-programmed for DEF motor"
            )?;
        }
        writeln!(f)?;

        writeln!(f, "#### 2.05 EXHAUST SHAFT CONSTRUCTION")?;
        writeln!(f)?;
        writeln!(f, "- Shaft size: {}", shaft.label)?;
        writeln!(
            f,
            "- Gross cross-sectional area: {} sq. in.",
            fixed(shaft.gross_area_sq_in, 0)
        )?;
        let net = fixed(shaft.effective_area_sq_in, 0);
        if input.has_subducts() {
            writeln!(f, "- Net effective area (after subduct deductions): {} sq. in.", net)?;
        } else {
            writeln!(f, "- Net effective area: {} sq. in. (no subducts, full area)", net)?;
        }
        writeln!(
            f,
            "- Construction: Fire-rated shaft per local building code and NFPA requirements"
        )?;
        writeln!(
            f,
            "- Material: Galvanized steel ductwork, minimum 26 gauge, per SMACNA standards"
        )?;
        let first = input.floors.first();
        let penetrations = first.map_or(0, |fl| fl.penetrations);
        match first.and_then(|fl| fl.subduct_size_in) {
            Some(size) => {
                writeln!(
                    f,
                    "- Subduct penetrations: {}\" diameter, {} per floor",
                    size, penetrations
                )?;
                writeln!(
                    f,
                    "- **IMPORTANT:** Shaft sizing calculations and subduct area deductions are \
                     based on the use of {m} SD Series Low Profile Subducts. Use of alternative \
                     subduct products may result in different area deductions and require \
                     resizing of the shaft. No substitutions without prior written approval \
                     from {m}.",
                    m = system.manufacturer
                )?;
            }
            None => writeln!(
                f,
                "- Wall openings: {} per floor (no subducts in shaft)",
                penetrations
            )?,
        }
        writeln!(f, "- Shaft shall be straight and vertical between all occupied floors")?;
        if let Some(offset) = &input.offset {
            writeln!(
                f,
                "- Offset permitted above top floor: {} elbow(s), {} ft length",
                offset.elbows, offset.length_ft
            )?;
        }
        writeln!(f)
    }

    fn write_execution(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = &self.result.input;
        let shaft = &self.result.shaft;

        writeln!(f, "### PART 3 - EXECUTION")?;
        writeln!(f)?;
        writeln!(f, "#### 3.01 INSTALLATION")?;
        writeln!(f)?;
        writeln!(
            f,
            "- Install exhaust fan on roof or mechanical penthouse per manufacturer instructions"
        )?;
        writeln!(f, "- Mount fan on vibration isolators to prevent structure-borne noise")?;
        writeln!(
            f,
            "- Install controller in accessible location per manufacturer instructions"
        )?;
        writeln!(
            f,
            "- Install pressure transducer(s) and duct pressure pickup(s) per manufacturer instructions"
        )?;
        if self.dual_transducers() {
            writeln!(
                f,
                "- Install upper pressure transducer above the neutral pressure plane of the building"
            )?;
            writeln!(
                f,
                "- Install lower pressure transducer below the neutral pressure plane of the building"
            )?;
        }
        writeln!(
            f,
            "- Connect all wiring per manufacturer wiring diagrams and NEC requirements"
        )?;
        writeln!(f, "- Provide disconnect switch and overcurrent protection per NEC")?;
        writeln!(f)?;

        writeln!(f, "#### 3.02 SHAFT INSTALLATION")?;
        writeln!(f)?;
        writeln!(f, "- Install exhaust shaft vertically through fire-rated shaft enclosure")?;
        writeln!(
            f,
            "- Seal all shaft penetrations with fire-rated materials per building code"
        )?;
        let connection = if input.has_subducts() {
            "subduct connections"
        } else {
            "wall openings"
        };
        writeln!(
            f,
            "- Install {} at each floor with fire/smoke dampers as required",
            connection
        )?;
        writeln!(
            f,
            "- Ensure shaft is airtight; seal all joints with approved duct sealant"
        )?;
        writeln!(f)?;

        writeln!(f, "#### 3.03 TESTING AND COMMISSIONING")?;
        writeln!(f)?;
        writeln!(f, "- Verify shaft is airtight before system startup")?;
        writeln!(f, "- Set controller pressure setpoint per design requirements")?;
        writeln!(
            f,
            "- Verify system maintains negative pressure in shaft at all floor levels"
        )?;
        writeln!(
            f,
            "- Verify differential pressure between bottom and top floors does not exceed \
             {} in. WC",
            input.max_delta_p
        )?;
        writeln!(
            f,
            "- Verify total system airflow: {} CFM",
            grouped(shaft.design_cfm)
        )?;
        writeln!(f, "- Document all test results and provide to owner")?;
        writeln!(
            f,
            "- Provide training to building maintenance staff on system operation"
        )?;
        writeln!(f)?;

        writeln!(f, "#### 3.04 DESIGN DATA")?;
        writeln!(f)?;
        writeln!(f, "| Parameter | Value |")?;
        writeln!(f, "|---|---|")?;
        writeln!(f, "| Total CFM (all units) | {} CFM |", grouped(shaft.total_cfm))?;
        writeln!(
            f,
            "| Design CFM ({}% diversity) | {} CFM |",
            input.diversity_pct,
            grouped(shaft.design_cfm)
        )?;
        writeln!(f, "| System static pressure | {} in. WC |", fixed(shaft.dp_total, 4))?;
        writeln!(f, "| Floor-to-floor height | {} ft |", input.floor_height_ft)?;
        writeln!(
            f,
            "| Total shaft height | {} ft |",
            shaft.total_height_ft.normalize()
        )?;
        writeln!(
            f,
            "| Maximum floor differential | {} in. WC |",
            fixed(shaft.delta_p, 4)
        )?;
        writeln!(f)
    }

    fn write_closing(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let system = self.config.system();

        writeln!(
            f,
            "**NOTE:** _All shaft sizing calculations in this specification are based on the \
             use of {m} SD Series Low Profile Subducts. The subduct area deductions used to \
             determine net effective shaft area assume SD Series geometry. Use of other subduct \
             products will change the area deductions and may require a larger shaft size. \
             Contact {m} at {} or {} for assistance._",
            system.phone,
            system.website,
            m = system.manufacturer
        )?;
        writeln!(f)?;
        writeln!(f, "**END OF SECTION {}**", SECTION)
    }
}

impl fmt::Display for CsiSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        self.write_general(f)?;
        self.write_products(f)?;
        self.write_execution(f)?;
        self.write_closing(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::run_sizing;
    use crate::config::fixtures::standard_config;
    use crate::models::{
        ElbowAngle, ExhaustType, FloorConfig, FlowModel, OffsetConfig, ProjectInfo, SizingInput,
        SizingMode,
    };

    fn input(floors: usize) -> SizingInput {
        SizingInput {
            project: Some(ProjectInfo {
                name: "Riverside Lofts".to_string(),
                location: "Austin, TX".to_string(),
                prepared_by: "engineer@example.com".to_string(),
            }),
            exhaust_type: ExhaustType::ClothesDryers,
            floors: vec![
                FloorConfig {
                    penetrations: 2,
                    subduct_size_in: Some(4),
                    cfm_per_penetration: 100.0,
                };
                floors
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
            flow_model: FlowModel::Cumulative,
        }
    }

    fn render(input: &SizingInput) -> String {
        let config = standard_config();
        let result = run_sizing(input, &config).unwrap();
        CsiSpec::new(&result, &config).to_string()
    }

    #[test]
    fn test_header_and_closing() {
        let spec = render(&input(10));

        assert!(spec.starts_with("# SECTION 23 34 00"));
        assert!(spec.contains(
            "**Project:** Riverside Lofts | **Location:** Austin, TX | \
             **Prepared by:** engineer@example.com"
        ));
        assert!(spec.contains("### PART 1 - GENERAL"));
        assert!(spec.contains("### PART 2 - PRODUCTS"));
        assert!(spec.contains("### PART 3 - EXECUTION"));
        assert!(spec.contains("Contact LF Systems at 817-393-4029"));
        assert!(spec.trim_end().ends_with("**END OF SECTION 23 34 00**"));
    }

    #[test]
    fn test_project_line_omitted_without_project() {
        let mut input = input(10);
        input.project = None;
        let spec = render(&input);

        assert!(!spec.contains("**Project:**"));
        assert!(spec.contains("## HVAC FANS - HIGH-RISE EXHAUST SHAFT SYSTEM"));
    }

    #[test]
    fn test_products_for_ten_storeys() {
        let spec = render(&input(10));

        assert!(spec.contains("- High-rise exhaust shaft system for clothes dryers serving 10 floors"));
        assert!(spec.contains("- Variable speed exhaust fan(s): DEF015"));
        assert!(spec.contains("#### 2.02 EXHAUST FAN: DEF015"));
        assert!(spec.contains("- Capacity: 1,000 CFM at 0.65 in. WC static pressure"));
        assert!(spec.contains("- Motor: 1/2 HP, 120V/1ph, EC type, 1950 RPM"));
        assert!(spec.contains("- Shaft size: 12\" Round"));
        assert!(spec.contains("- Gross cross-sectional area: 113 sq. in."));
        assert!(spec.contains("- Net effective area (after subduct deductions): 83 sq. in."));
        assert!(spec.contains("- Subduct penetrations: 4\" diameter, 2 per floor"));
        assert!(spec.contains("- Offset permitted above top floor: 2 elbow(s), 10 ft length"));
        assert!(!spec.contains("CFW500"));
        assert!(!spec.contains("piped in parallel"));
    }

    #[test]
    fn test_dual_transducer_controller_clauses() {
        let spec = render(&input(10));

        assert!(spec.contains("#### 2.03 CONTROLLER: L152.M"));
        assert!(spec.contains("- Controller shall be UL 864 listed for fire alarm system integration"));
        assert!(spec.contains("- Dedicated input for smoke control system integration"));
        assert!(spec.contains("- Install upper pressure transducer above the neutral pressure plane"));
        assert!(spec.contains("- Install lower pressure transducer below the neutral pressure plane"));
    }

    #[test]
    fn test_single_transducer_controller_clauses() {
        let spec = render(&input(5));

        assert!(spec.contains("#### 2.03 CONTROLLER: L150.H"));
        assert!(!spec.contains("UL 864 listed"));
        assert!(!spec.contains("smoke control"));
        assert!(!spec.contains("upper pressure transducer"));
    }

    #[test]
    fn test_parallel_fans_and_drive() {
        let mut input = input(10);
        input.diversity_pct = 100.0;
        for floor in &mut input.floors {
            floor.cfm_per_penetration = 400.0;
        }
        input.sizing = SizingMode::RoundUser { diameter_in: 36.0 };
        let spec = render(&input);

        assert!(spec.contains("#### 2.02 EXHAUST FAN: DEF050"));
        assert!(spec.contains("fans piped in parallel, each rated for"));
        assert!(spec.contains(
            "- CFW500 Variable Frequency Drive: NEMA 4X, pre-programmed for DEF motor"
        ));
    }

    #[test]
    fn test_wall_openings_without_subducts() {
        let mut input = input(10);
        for floor in &mut input.floors {
            floor.subduct_size_in = None;
        }
        input.offset = None;
        let spec = render(&input);

        assert!(spec.contains("- Wall openings: 2 per floor (no subducts in shaft)"));
        assert!(spec.contains("(no subducts, full area)"));
        assert!(spec.contains("- Install wall openings at each floor"));
        assert!(!spec.contains("Subduct penetrations"));
        assert!(!spec.contains("Offset permitted"));
    }

    #[test]
    fn test_design_data() {
        let spec = render(&input(10));

        assert!(spec.contains("| Total CFM (all units) | 2,000 CFM |"));
        assert!(spec.contains("| Design CFM (50% diversity) | 1,000 CFM |"));
        assert!(spec.contains("| System static pressure | 0.6487 in. WC |"));
        assert!(spec.contains("| Floor-to-floor height | 10 ft |"));
        assert!(spec.contains("| Total shaft height | 100 ft |"));
        assert!(spec.contains("| Maximum floor differential | 0.1016 in. WC |"));
        assert!(spec.contains("does not exceed 0.25 in. WC"));
    }
}
