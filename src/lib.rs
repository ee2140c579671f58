//! Exhaust shaft sizing engine for high-rise constant pressure exhaust systems.
//!
//! This crate sizes the vertical exhaust shaft that collects dryer, bathroom
//! or kitchen exhaust from every floor of a building, then selects the roof
//! fan and pressure controller that serve it. Pressure losses follow the
//! Darcy-Weisbach equation with the Colebrook friction factor.
//!
//! The engine is available as a library ([`calculation::run_sizing`]), an
//! HTTP API ([`api::create_router`]), a Markdown report
//! ([`report::SizingReport`]), a CSI specification section
//! ([`report::CsiSpec`]) and a question-by-question session
//! ([`wizard::WizardSession`]).

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod wizard;
