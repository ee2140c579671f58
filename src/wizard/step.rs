//! Wizard steps.

use std::fmt;

use serde::Serialize;

/// A question in the sizing conversation.
///
/// Steps are numbered in the order they are asked; messages are tagged with
/// the step they answer so the conversation can be rolled back to any
/// editable step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// The greeting posted when a session starts.
    Welcome,
    /// Project name.
    ProjectName,
    /// Project location.
    Location,
    /// Contact email of the person preparing the sizing.
    Email,
    /// Dryers, bathrooms or kitchen hoods.
    ExhaustType,
    /// Whether penetrations connect through subducts.
    Subducts,
    /// Number of floors with penetrations.
    Floors,
    /// Whether every floor has the same penetrations.
    SameForAll,
    /// Penetrations, subduct size and CFM, for all floors or floor by floor.
    FloorDetails,
    /// Floor-to-floor height.
    FloorHeight,
    /// Duct length from the top penetration to the fan.
    DuctAfterLast,
    /// Diversity percentage.
    Diversity,
    /// Whether the shaft offsets above the top floor.
    Offset,
    /// Offset elbows, length and angle.
    OffsetDetails,
    /// Automatic or user-specified, round or rectangular.
    SizingMode,
    /// The user-specified diameter or rectangular sides.
    UserSize,
    /// Allowed bottom-to-top pressure difference; answering runs the sizing.
    MaxDeltaP,
    /// A result (or failure) has been reported.
    Complete,
}

impl Step {
    /// Every step in the order it is asked.
    pub const ALL: [Step; 18] = [
        Step::Welcome,
        Step::ProjectName,
        Step::Location,
        Step::Email,
        Step::ExhaustType,
        Step::Subducts,
        Step::Floors,
        Step::SameForAll,
        Step::FloorDetails,
        Step::FloorHeight,
        Step::DuctAfterLast,
        Step::Diversity,
        Step::Offset,
        Step::OffsetDetails,
        Step::SizingMode,
        Step::UserSize,
        Step::MaxDeltaP,
        Step::Complete,
    ];

    /// Returns the step number, starting at 0 for the greeting.
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Looks a step up by number.
    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.get(number as usize).copied()
    }

    /// Returns true if the answer to this step can be changed later.
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            Step::ProjectName
                | Step::Location
                | Step::Email
                | Step::ExhaustType
                | Step::Subducts
                | Step::Floors
                | Step::FloorHeight
                | Step::DuctAfterLast
                | Step::Diversity
                | Step::Offset
        )
    }

    /// Returns a short label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Step::Welcome => "Welcome",
            Step::ProjectName => "Project Name",
            Step::Location => "Location",
            Step::Email => "Email",
            Step::ExhaustType => "Exhaust Type",
            Step::Subducts => "Subducts",
            Step::Floors => "Floors",
            Step::SameForAll => "Same For All Floors",
            Step::FloorDetails => "Floor Details",
            Step::FloorHeight => "Floor Height",
            Step::DuctAfterLast => "Duct After Last",
            Step::Diversity => "Diversity",
            Step::Offset => "Offset",
            Step::OffsetDetails => "Offset Details",
            Step::SizingMode => "Sizing Mode",
            Step::UserSize => "User Size",
            Step::MaxDeltaP => "Max ΔP",
            Step::Complete => "Complete",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
