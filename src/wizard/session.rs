//! The conversational sizing session.

use serde::Serialize;

use crate::calculation::run_sizing;
use crate::config::SizerConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ElbowAngle, ExhaustType, FloorConfig, FlowModel, OffsetConfig, ProjectInfo, SizingInput,
    SizingMode, SizingResult,
};

use super::parse;
use super::step::Step;

const WELCOME: &str = "**Welcome to the exhaust shaft sizing calculator!**\n\n\
    This tool sizes fire-rated exhaust shafts in high-rise buildings served by a \
    constant pressure exhaust system.\n\n\
    Let's get started. **What is the project name?**";

const SIZING_PROMPT: &str = "**How would you like to size the shaft?**\n\n\
    - **round_auto**: find the optimal round diameter\n\
    - **rect_auto**: find the optimal rectangular size\n\
    - **round_user**: I'll specify a diameter\n\
    - **rect_user**: I'll specify rectangular dimensions";

const RESTART_WORDS: [&str; 3] = ["restart", "new", "reset"];

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The person answering the questions.
    User,
    /// The sizing assistant.
    Assistant,
}

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Who wrote the message.
    pub role: Role,
    /// Markdown text.
    pub text: String,
    /// The step this message answers or replies to.
    pub step: Step,
    /// True when the message rejects an answer.
    pub warning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FloorField {
    Penetrations,
    Subduct,
    Cfm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetField {
    Elbows,
    Length,
    Angle,
}

/// Outcome of handling one answer.
enum Reply {
    /// Accepted; ask the question of `next`.
    Advance { next: Step, text: String },
    /// Accepted; ask a follow-up within the same step.
    Continue(String),
    /// Rejected; ask again.
    Invalid(String),
}

/// Answers collected so far.
#[derive(Debug, Clone)]
struct Draft {
    project: ProjectInfo,
    exhaust_type: Option<ExhaustType>,
    has_subducts: bool,
    floors: Vec<FloorConfig>,
    same_for_all: bool,
    current_floor: usize,
    floor_field: FloorField,
    floor_height_ft: f64,
    duct_after_last_ft: f64,
    diversity_pct: f64,
    has_offset: bool,
    offset: OffsetConfig,
    offset_field: OffsetField,
    sizing: SizingMode,
    max_delta_p: f64,
    flow_model: FlowModel,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            project: ProjectInfo::default(),
            exhaust_type: None,
            has_subducts: true,
            floors: Vec::new(),
            same_for_all: true,
            current_floor: 0,
            floor_field: FloorField::Penetrations,
            floor_height_ft: 0.0,
            duct_after_last_ft: 0.0,
            diversity_pct: 100.0,
            has_offset: false,
            offset: OffsetConfig {
                elbows: 0,
                length_ft: 0.0,
                angle: ElbowAngle::Deg90,
            },
            offset_field: OffsetField::Elbows,
            sizing: SizingMode::RoundAuto,
            max_delta_p: 0.25,
            flow_model: FlowModel::default(),
        }
    }
}

impl Draft {
    /// The floors the current floor answer applies to.
    fn answered_floors(&mut self) -> &mut [FloorConfig] {
        if self.same_for_all {
            self.floors.as_mut_slice()
        } else {
            let i = self.current_floor;
            self.floors.get_mut(i..=i).unwrap_or_default()
        }
    }

    fn to_input(&self) -> EngineResult<SizingInput> {
        let exhaust_type = self
            .exhaust_type
            .ok_or_else(|| EngineError::invalid("exhaust_type", "has not been answered"))?;
        Ok(SizingInput {
            project: Some(self.project.clone()),
            exhaust_type,
            floors: self.floors.clone(),
            floor_height_ft: self.floor_height_ft,
            duct_after_last_ft: self.duct_after_last_ft,
            diversity_pct: self.diversity_pct,
            offset: self.has_offset.then(|| self.offset.clone()),
            sizing: self.sizing.clone(),
            max_delta_p: self.max_delta_p,
            flow_model: self.flow_model,
        })
    }
}

/// A step-by-step sizing conversation.
///
/// Each answer passed to [`respond`](Self::respond) is recorded, validated
/// against the design limits of the configuration and answered with either
/// the next question or a warning that repeats the current one. Answering
/// the maximum ΔP question runs the sizing.
///
/// # Example
///
/// ```no_run
/// use shaft_sizer::config::ConfigLoader;
/// use shaft_sizer::wizard::{Step, WizardSession};
///
/// let loader = ConfigLoader::load("./config/lf_systems").unwrap();
/// let mut session = WizardSession::new();
/// session.respond("Riverside Lofts", loader.config());
/// assert_eq!(session.step(), Step::Location);
/// ```
#[derive(Debug, Clone)]
pub struct WizardSession {
    step: Step,
    draft: Draft,
    messages: Vec<Message>,
    result: Option<SizingResult>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    /// Starts a session with the greeting and the first question.
    pub fn new() -> Self {
        Self::with_flow_model(FlowModel::default())
    }

    /// Starts a session that sizes under the given airflow model.
    pub fn with_flow_model(flow_model: FlowModel) -> Self {
        let mut session = Self {
            step: Step::Welcome,
            draft: Draft {
                flow_model,
                ..Draft::default()
            },
            messages: Vec::new(),
            result: None,
        };
        session.welcome();
        session
    }

    /// Returns the airflow model the session sizes under.
    pub fn flow_model(&self) -> FlowModel {
        self.draft.flow_model
    }

    /// Returns the step awaiting an answer.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Returns the conversation so far.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the most recent message.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Returns the sizing result once the conversation is complete.
    pub fn result(&self) -> Option<&SizingResult> {
        self.result.as_ref()
    }

    /// Suggested answers for the current question.
    pub fn quick_replies(&self) -> &'static [&'static str] {
        match self.step {
            Step::ExhaustType => &["Dryers", "Bathrooms", "Kitchen Hoods"],
            Step::Subducts | Step::SameForAll | Step::Offset => &["Yes", "No"],
            Step::FloorDetails => match self.draft.floor_field {
                FloorField::Penetrations => &["1", "2"],
                FloorField::Subduct => &["4", "6", "8"],
                FloorField::Cfm => &[],
            },
            Step::OffsetDetails if self.draft.offset_field == OffsetField::Angle => {
                &["45", "90"]
            }
            Step::SizingMode => &["round_auto", "rect_auto", "round_user", "rect_user"],
            Step::Complete => &["restart"],
            _ => &[],
        }
    }

    /// Starts the conversation over under the same airflow model.
    pub fn reset(&mut self) {
        *self = Self::with_flow_model(self.draft.flow_model);
    }

    /// Rolls the conversation back to an editable step.
    ///
    /// Messages from that step on are dropped, any result is cleared and the
    /// step's question is asked again. Later answers must be given again as
    /// the conversation moves forward.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the step is not editable or has not been
    /// reached yet.
    pub fn edit(&mut self, step: Step) -> EngineResult<()> {
        if !step.is_editable() {
            return Err(EngineError::invalid(
                "step",
                format!("{} cannot be edited", step),
            ));
        }
        if step >= self.step {
            return Err(EngineError::invalid(
                "step",
                format!("{} has not been answered yet", step),
            ));
        }

        self.messages.retain(|m| m.step < step);
        self.result = None;
        self.step = step;
        tracing::debug!(step = %step, "Wizard rolled back");
        Ok(())
    }

    /// Handles one answer to the current question.
    pub fn respond(&mut self, answer: &str, config: &SizerConfig) {
        let answer = answer.trim();
        let step = self.step;

        if step == Step::Complete && is_restart(answer) {
            self.reset();
            return;
        }

        self.push(Role::User, answer.to_string(), step, false);

        let reply = match step {
            Step::Welcome | Step::ProjectName => self.answer_project_name(answer),
            Step::Location => self.answer_location(answer),
            Step::Email => self.answer_email(answer),
            Step::ExhaustType => self.answer_exhaust_type(answer),
            Step::Subducts => self.answer_subducts(answer),
            Step::Floors => self.answer_floors(answer, config),
            Step::SameForAll => self.answer_same_for_all(answer),
            Step::FloorDetails => self.answer_floor_details(answer, config),
            Step::FloorHeight => self.answer_floor_height(answer),
            Step::DuctAfterLast => self.answer_duct_after_last(answer, config),
            Step::Diversity => self.answer_diversity(answer, config),
            Step::Offset => self.answer_offset(answer),
            Step::OffsetDetails => self.answer_offset_details(answer),
            Step::SizingMode => self.answer_sizing_mode(answer, config),
            Step::UserSize => self.answer_user_size(answer, config),
            Step::MaxDeltaP => self.answer_max_delta_p(answer, config),
            Step::Complete => {
                Reply::Continue("Type **restart** to size another shaft.".to_string())
            }
        };

        match reply {
            Reply::Advance { next, text } => {
                self.push(Role::Assistant, text, step, false);
                self.step = next;
            }
            Reply::Continue(text) => self.push(Role::Assistant, text, step, false),
            Reply::Invalid(text) => {
                tracing::debug!(step = %step, answer, "Wizard answer rejected");
                self.push(Role::Assistant, text, step, true);
            }
        }
    }

    fn welcome(&mut self) {
        self.push(Role::Assistant, WELCOME.to_string(), Step::Welcome, false);
        self.step = Step::ProjectName;
    }

    fn push(&mut self, role: Role, text: String, step: Step, warning: bool) {
        self.messages.push(Message {
            role,
            text,
            step,
            warning,
        });
    }

    fn answer_project_name(&mut self, answer: &str) -> Reply {
        if answer.chars().count() < 2 {
            return Reply::Invalid(
                "Please enter a project name (at least 2 characters).".to_string(),
            );
        }
        self.draft.project.name = answer.to_string();
        Reply::Advance {
            next: Step::Location,
            text: format!(
                "Project: **{}**\n\n**What is the project location?** *(City, State, e.g. \"Dallas, TX\")*",
                answer
            ),
        }
    }

    fn answer_location(&mut self, answer: &str) -> Reply {
        if answer.chars().count() < 2 {
            return Reply::Invalid("Please enter a city and state (e.g. \"Dallas, TX\").".to_string());
        }
        self.draft.project.location = answer.to_string();
        Reply::Advance {
            next: Step::Email,
            text: format!(
                "Location: **{}**\n\n**What is your email address?** *(for the report header)*",
                answer
            ),
        }
    }

    fn answer_email(&mut self, answer: &str) -> Reply {
        if !(answer.contains('@') && answer.contains('.')) {
            return Reply::Invalid(
                "Please enter a valid email address (e.g. \"jsmith@company.com\").".to_string(),
            );
        }
        self.draft.project.prepared_by = answer.to_string();
        Reply::Advance {
            next: Step::ExhaustType,
            text: format!(
                "Email: **{}**\n\nNow let's size the shaft. **What type of exhaust does this shaft serve?**",
                answer
            ),
        }
    }

    fn answer_exhaust_type(&mut self, answer: &str) -> Reply {
        let Some(exhaust_type) = ExhaustType::from_keyword(answer) else {
            return Reply::Invalid(
                "Please select **Dryers**, **Bathrooms** or **Kitchen Hoods**.".to_string(),
            );
        };
        self.draft.exhaust_type = Some(exhaust_type);
        Reply::Advance {
            next: Step::Subducts,
            text: format!(
                "**{}** selected.\n\n**Does this shaft have subducts (branch ducts penetrating the shaft wall)?**",
                exhaust_type.display_name()
            ),
        }
    }

    fn answer_subducts(&mut self, answer: &str) -> Reply {
        let Some(has_subducts) = parse::yes_no(answer) else {
            return Reply::Invalid("Please answer **Yes** or **No**.".to_string());
        };
        self.draft.has_subducts = has_subducts;
        let text = if has_subducts {
            "**Subducts**: the shaft area is reduced by the subduct cross-sections.\n\n\
             **How many floors have penetrations into this shaft?**"
        } else {
            "**No subducts**: the full shaft area is available for airflow.\n\n\
             **How many floors have openings into this shaft?**"
        };
        Reply::Advance {
            next: Step::Floors,
            text: text.to_string(),
        }
    }

    fn answer_floors(&mut self, answer: &str, config: &SizerConfig) -> Reply {
        let max_floors = config.limits().max_floors;
        let Some(n) = parse::count(answer).filter(|n| (1..=max_floors).contains(n)) else {
            return Reply::Invalid(format!("Enter a number between 1 and {}.", max_floors));
        };
        self.draft.floors = vec![
            FloorConfig {
                penetrations: 1,
                subduct_size_in: None,
                cfm_per_penetration: 0.0,
            };
            n as usize
        ];
        let fields = if self.draft.has_subducts {
            "number of openings, subduct size and CFM"
        } else {
            "number of openings and CFM"
        };
        Reply::Advance {
            next: Step::SameForAll,
            text: format!(
                "**{} floors**.\n\nAre **all floors configured the same?** ({})",
                n, fields
            ),
        }
    }

    fn answer_same_for_all(&mut self, answer: &str) -> Reply {
        self.draft.same_for_all = answer_is_yes(answer);
        self.draft.current_floor = 0;
        self.draft.floor_field = FloorField::Penetrations;
        let text = if self.draft.same_for_all {
            "All floors the same.\n\n**How many penetrations (openings) per floor?** (1 or 2)"
                .to_string()
        } else {
            format!(
                "Per-floor configuration.\n\n**Floor 1 of {}: how many penetrations?** (1 or 2)",
                self.draft.floors.len()
            )
        };
        Reply::Advance {
            next: Step::FloorDetails,
            text,
        }
    }

    fn answer_floor_details(&mut self, answer: &str, config: &SizerConfig) -> Reply {
        match self.draft.floor_field {
            FloorField::Penetrations => {
                let max = config.limits().max_penetrations_per_floor;
                let Some(n) = parse::count(answer).filter(|n| (1..=max).contains(n)) else {
                    return Reply::Invalid(format!(
                        "Enter between 1 and {} penetrations per floor.",
                        max
                    ));
                };
                for floor in self.draft.answered_floors() {
                    floor.penetrations = n;
                }
                if self.draft.has_subducts {
                    self.draft.floor_field = FloorField::Subduct;
                    Reply::Continue(format!(
                        "{} penetration(s).\n\n**What subduct size?**\n\n{}",
                        n,
                        subduct_table(config)
                    ))
                } else {
                    for floor in self.draft.answered_floors() {
                        floor.subduct_size_in = None;
                    }
                    self.draft.floor_field = FloorField::Cfm;
                    Reply::Continue(format!(
                        "{} opening(s) per floor (no subducts).\n\n**How many CFM per opening?**",
                        n
                    ))
                }
            }
            FloorField::Subduct => {
                let Some((size, area)) = parse::count(answer)
                    .and_then(|s| config.subducts().get(&s).map(|a| (s, *a)))
                else {
                    return Reply::Invalid(format!(
                        "Subduct must be one of {} inches.",
                        subduct_sizes(config)
                    ));
                };
                for floor in self.draft.answered_floors() {
                    floor.subduct_size_in = Some(size);
                }
                self.draft.floor_field = FloorField::Cfm;
                Reply::Continue(format!(
                    "{}\" subduct (removes {:.1} sq. in.).\n\n**How many CFM per penetration?**",
                    size, area
                ))
            }
            FloorField::Cfm => {
                let Some(cfm) = parse::number(answer).filter(|c| *c > 0.0) else {
                    return Reply::Invalid("Enter a CFM value greater than 0.".to_string());
                };
                for floor in self.draft.answered_floors() {
                    floor.cfm_per_penetration = cfm;
                }
                let floor_count = self.draft.floors.len();
                if self.draft.same_for_all {
                    return Reply::Advance {
                        next: Step::FloorHeight,
                        text: format!(
                            "{} CFM per opening applied to all {} floors.\n\n\
                             **What is the floor-to-floor height (ft)?**",
                            cfm, floor_count
                        ),
                    };
                }
                let done = self.draft.current_floor + 1;
                if done < floor_count {
                    self.draft.current_floor = done;
                    self.draft.floor_field = FloorField::Penetrations;
                    Reply::Continue(format!(
                        "Floor {} done.\n\n**Floor {} of {}: how many penetrations?** (1 or 2)",
                        done,
                        done + 1,
                        floor_count
                    ))
                } else {
                    Reply::Advance {
                        next: Step::FloorHeight,
                        text: format!(
                            "All {} floors configured.\n\n**What is the floor-to-floor height (ft)?**",
                            floor_count
                        ),
                    }
                }
            }
        }
    }

    fn answer_floor_height(&mut self, answer: &str) -> Reply {
        let Some(height) = parse::number(answer).filter(|h| *h > 0.0) else {
            return Reply::Invalid("Enter a valid height in feet.".to_string());
        };
        self.draft.floor_height_ft = height;
        Reply::Advance {
            next: Step::DuctAfterLast,
            text: format!(
                "{} ft floor-to-floor.\n\n**Length of duct from the top floor penetration to the \
                 exhaust fan (ft)?** (Include all runs after the highest connection.)",
                height
            ),
        }
    }

    fn answer_duct_after_last(&mut self, answer: &str, config: &SizerConfig) -> Reply {
        let Some(length) = parse::number(answer).filter(|d| *d >= 0.0) else {
            return Reply::Invalid("Enter 0 or a positive number of feet.".to_string());
        };
        self.draft.duct_after_last_ft = length;
        let limits = config.limits();
        Reply::Advance {
            next: Step::Diversity,
            text: format!(
                "{} ft after the last unit.\n\n**What is the diversity factor?** Enter a \
                 percentage from {} to {} (e.g. 50 means half of the connections are active at once).",
                length, limits.min_diversity_pct, limits.max_diversity_pct
            ),
        }
    }

    fn answer_diversity(&mut self, answer: &str, config: &SizerConfig) -> Reply {
        let limits = config.limits();
        let range = limits.min_diversity_pct..=limits.max_diversity_pct;
        let Some(pct) = parse::percentage(answer).filter(|p| range.contains(p)) else {
            return Reply::Invalid(format!(
                "Diversity must be between {} and {}%.",
                limits.min_diversity_pct, limits.max_diversity_pct
            ));
        };
        self.draft.diversity_pct = pct;
        Reply::Advance {
            next: Step::Offset,
            text: format!(
                "{}% diversity.\n\n**Does the shaft offset after the last floor?** (The shaft \
                 must be straight between floors but can offset above the top floor.)",
                pct
            ),
        }
    }

    fn answer_offset(&mut self, answer: &str) -> Reply {
        self.draft.has_offset = answer_is_yes(answer);
        if self.draft.has_offset {
            self.draft.offset_field = OffsetField::Elbows;
            Reply::Advance {
                next: Step::OffsetDetails,
                text: "**How many elbows in the offset?** (typically 2)".to_string(),
            }
        } else {
            Reply::Advance {
                next: Step::SizingMode,
                text: format!("No offset.\n\n{}", SIZING_PROMPT),
            }
        }
    }

    fn answer_offset_details(&mut self, answer: &str) -> Reply {
        match self.draft.offset_field {
            OffsetField::Elbows => {
                let Some(elbows) = parse::count(answer).filter(|n| *n >= 1) else {
                    return Reply::Invalid("Enter the number of elbows (at least 1).".to_string());
                };
                self.draft.offset.elbows = elbows;
                self.draft.offset_field = OffsetField::Length;
                Reply::Continue(format!(
                    "{} elbow(s).\n\n**Total length of the offset section (ft)?**",
                    elbows
                ))
            }
            OffsetField::Length => {
                let Some(length) = parse::number(answer).filter(|l| *l >= 0.0) else {
                    return Reply::Invalid("Enter a length of 0 or more.".to_string());
                };
                self.draft.offset.length_ft = length;
                self.draft.offset_field = OffsetField::Angle;
                Reply::Continue(format!(
                    "{} ft offset.\n\n**Elbow angle?** (45 or 90; default 90)",
                    length
                ))
            }
            OffsetField::Angle => {
                let angle = parse::count(answer)
                    .and_then(|a| ElbowAngle::try_from(a).ok())
                    .unwrap_or(ElbowAngle::Deg90);
                self.draft.offset.angle = angle;
                Reply::Advance {
                    next: Step::SizingMode,
                    text: format!("{}° elbows.\n\n{}", angle.degrees(), SIZING_PROMPT),
                }
            }
        }
    }

    fn answer_sizing_mode(&mut self, answer: &str, config: &SizerConfig) -> Reply {
        let keyword = answer.to_lowercase().replace([' ', '-'], "_");
        let (sizing, next, text) = match keyword.as_str() {
            "round_auto" => (SizingMode::RoundAuto, Step::MaxDeltaP, max_delta_p_prompt(config)),
            "rect_auto" => (SizingMode::RectAuto, Step::MaxDeltaP, max_delta_p_prompt(config)),
            "round_user" => (
                SizingMode::RoundUser { diameter_in: 0.0 },
                Step::UserSize,
                "**Enter the round duct diameter (inches):**".to_string(),
            ),
            "rect_user" => (
                SizingMode::RectUser {
                    width_in: 0.0,
                    height_in: 0.0,
                },
                Step::UserSize,
                "**Enter the rectangular dimensions as `width x height` (inches):** (e.g. 24 x 18)"
                    .to_string(),
            ),
            _ => {
                return Reply::Invalid(
                    "Choose **round_auto**, **rect_auto**, **round_user** or **rect_user**."
                        .to_string(),
                );
            }
        };
        self.draft.sizing = sizing;
        Reply::Advance { next, text }
    }

    fn answer_user_size(&mut self, answer: &str, config: &SizerConfig) -> Reply {
        let limits = config.limits();
        match self.draft.sizing {
            SizingMode::RoundUser { .. } => {
                let range = limits.min_user_diameter_in..=limits.max_user_diameter_in;
                let Some(diameter_in) = parse::number(answer).filter(|d| range.contains(d)) else {
                    return Reply::Invalid(format!(
                        "Diameter must be {} to {} inches.",
                        limits.min_user_diameter_in, limits.max_user_diameter_in
                    ));
                };
                self.draft.sizing = SizingMode::RoundUser { diameter_in };
            }
            SizingMode::RectUser { .. } => {
                let min = limits.min_user_rect_side_in;
                let Some((a, b)) =
                    parse::dimensions(answer).filter(|(a, b)| *a >= min && *b >= min)
                else {
                    return Reply::Invalid(format!(
                        "Enter two dimensions of at least {}\", e.g. `24 x 18`.",
                        min
                    ));
                };
                self.draft.sizing = SizingMode::RectUser {
                    width_in: a.max(b),
                    height_in: a.min(b),
                };
            }
            SizingMode::RoundAuto | SizingMode::RectAuto => {}
        }
        Reply::Advance {
            next: Step::MaxDeltaP,
            text: max_delta_p_prompt(config),
        }
    }

    fn answer_max_delta_p(&mut self, answer: &str, config: &SizerConfig) -> Reply {
        let limits = config.limits();
        let range = limits.min_delta_p..=limits.max_delta_p;
        let Some(max_delta_p) = parse::number(answer).filter(|d| range.contains(d)) else {
            return Reply::Invalid(format!(
                "Enter a value between {} and {} in. WC.",
                limits.min_delta_p, limits.max_delta_p
            ));
        };
        self.draft.max_delta_p = max_delta_p;
        self.run(config)
    }

    fn run(&mut self, config: &SizerConfig) -> Reply {
        let outcome = self
            .draft
            .to_input()
            .and_then(|input| run_sizing(&input, config));

        let text = match outcome {
            Ok(result) => {
                tracing::info!(
                    shaft = %result.shaft.label,
                    fan = %result.fan.display_model(),
                    "Wizard sizing completed"
                );
                let text = format!(
                    "**Calculation complete!**\n\n\
                     | | |\n|---|---|\n\
                     | Recommended Shaft | {} |\n\
                     | Status | {} |\n\
                     | Floor ΔP | {} in. WC |\n\
                     | Selected Fan | {} |\n\
                     | Controller | {} |\n\n\
                     Type **restart** to size another shaft.",
                    result.shaft.label,
                    if result.shaft.passes { "PASS" } else { "FAIL" },
                    result.shaft.delta_p,
                    result.fan.display_model(),
                    result.controller.model
                );
                self.result = Some(result);
                text
            }
            Err(EngineError::NoViableShaft { .. }) => {
                "**No valid shaft size found.**\n\nThe CFM may be too high or the area \
                 deductions too large for the available sizes. Try adjusting your inputs.\n\n\
                 Type **restart** to begin again."
                    .to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Wizard sizing failed");
                format!(
                    "The sizing could not be completed: {}\n\nType **restart** to begin again.",
                    e
                )
            }
        };

        Reply::Advance {
            next: Step::Complete,
            text,
        }
    }
}

fn answer_is_yes(answer: &str) -> bool {
    parse::yes_no(answer) == Some(true)
}

fn is_restart(answer: &str) -> bool {
    let lc = answer.to_lowercase();
    RESTART_WORDS.iter().any(|w| lc.contains(w))
}

fn subduct_sizes(config: &SizerConfig) -> String {
    config
        .subducts()
        .keys()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn subduct_table(config: &SizerConfig) -> String {
    let mut table = String::from("| Size | Area Removed |\n|---|---|");
    for (size, area) in config.subducts() {
        table.push_str(&format!("\n| {}\" | {:.1} sq. in. |", size, area));
    }
    table
}

fn max_delta_p_prompt(config: &SizerConfig) -> String {
    format!(
        "**Maximum allowable ΔP between the bottom and top floors?** Max = {} in. WC. \
         Enter your target (e.g. 0.20):",
        config.limits().max_delta_p
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::standard_config;

    fn answer_all(session: &mut WizardSession, answers: &[&str]) {
        let config = standard_config();
        for answer in answers {
            session.respond(answer, &config);
        }
    }

    #[test]
    fn test_new_session_asks_project_name() {
        let session = WizardSession::new();
        assert_eq!(session.step(), Step::ProjectName);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].step, Step::Welcome);
    }

    #[test]
    fn test_flow_model_survives_reset() {
        let mut session = WizardSession::with_flow_model(FlowModel::Uniform);
        assert_eq!(session.flow_model(), FlowModel::Uniform);
        assert_eq!(WizardSession::new().flow_model(), FlowModel::Cumulative);

        answer_all(&mut session, &["Tower", "Dallas, TX"]);
        session.reset();
        assert_eq!(session.step(), Step::ProjectName);
        assert_eq!(session.flow_model(), FlowModel::Uniform);
    }

    #[test]
    fn test_short_project_name_warns_and_stays() {
        let mut session = WizardSession::new();
        answer_all(&mut session, &["A"]);

        assert_eq!(session.step(), Step::ProjectName);
        let last = session.last_message().unwrap();
        assert!(last.warning);
        assert_eq!(last.step, Step::ProjectName);
    }

    #[test]
    fn test_subducts_requires_yes_or_no() {
        let mut session = WizardSession::new();
        answer_all(
            &mut session,
            &["Tower", "Dallas, TX", "a@b.com", "bath", "perhaps"],
        );
        assert_eq!(session.step(), Step::Subducts);
        assert!(session.last_message().unwrap().warning);

        answer_all(&mut session, &["no"]);
        assert_eq!(session.step(), Step::Floors);
        assert!(!session.draft.has_subducts);
    }

    #[test]
    fn test_no_subducts_skips_subduct_question() {
        let mut session = WizardSession::new();
        answer_all(
            &mut session,
            &["Tower", "Dallas, TX", "a@b.com", "dryers", "no", "3", "yes", "2"],
        );
        assert_eq!(session.draft.floor_field, FloorField::Cfm);
        assert!(session.quick_replies().is_empty());
    }

    #[test]
    fn test_per_floor_answers() {
        let mut session = WizardSession::new();
        answer_all(
            &mut session,
            &[
                "Tower", "Dallas, TX", "a@b.com", "dryers", "yes", "2", "no", "1", "4", "100",
                "2", "6", "120",
            ],
        );

        assert_eq!(session.step(), Step::FloorHeight);
        let floors = &session.draft.floors;
        assert_eq!(floors[0].penetrations, 1);
        assert_eq!(floors[0].subduct_size_in, Some(4));
        assert_eq!(floors[0].cfm_per_penetration, 100.0);
        assert_eq!(floors[1].penetrations, 2);
        assert_eq!(floors[1].subduct_size_in, Some(6));
        assert_eq!(floors[1].cfm_per_penetration, 120.0);
    }

    #[test]
    fn test_unknown_elbow_angle_falls_back_to_ninety() {
        let mut session = WizardSession::new();
        answer_all(
            &mut session,
            &[
                "Tower", "Dallas, TX", "a@b.com", "dryers", "yes", "10", "yes", "2", "4", "100",
                "10", "20", "50%", "yes", "2", "10", "60",
            ],
        );
        assert_eq!(session.step(), Step::SizingMode);
        assert_eq!(session.draft.offset.angle, ElbowAngle::Deg90);
        assert_eq!(session.draft.diversity_pct, 50.0);
    }

    #[test]
    fn test_rect_user_orders_sides() {
        let mut session = WizardSession::new();
        answer_all(
            &mut session,
            &[
                "Tower", "Dallas, TX", "a@b.com", "dryers", "yes", "10", "yes", "2", "4", "100",
                "10", "20", "50", "no", "rect_user", "12 x 24",
            ],
        );
        assert_eq!(session.step(), Step::MaxDeltaP);
        assert_eq!(
            session.draft.sizing,
            SizingMode::RectUser {
                width_in: 24.0,
                height_in: 12.0
            }
        );
    }

    #[test]
    fn test_edit_rejects_unanswered_and_fixed_steps() {
        let mut session = WizardSession::new();
        answer_all(&mut session, &["Tower"]);

        assert!(session.edit(Step::Email).is_err());
        assert!(session.edit(Step::SameForAll).is_err());
        assert!(session.edit(Step::ProjectName).is_ok());
        assert_eq!(session.step(), Step::ProjectName);
        assert_eq!(session.messages().len(), 1);
    }
}
