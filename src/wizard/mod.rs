//! Conversational sizing.
//!
//! [`WizardSession`] asks for the building one question at a time, checks
//! every answer, and runs the sizing once the last question is answered.
//! Messages are tagged with the [`Step`] they belong to, so an earlier
//! answer can be changed with [`WizardSession::edit`].

mod parse;
mod session;
mod step;

pub use session::{Message, Role, WizardSession};
pub use step::Step;
