//! Domain library for the founder freedom assessment funnel.
//!
//! The crate is organized around the forward-only lead pipeline: the intake
//! wizard collects a fixed 15-field [`assessment::AnswerSet`], the scoring
//! and segmentation functions reduce it to a score and tier, the gate
//! finalizes a [`assessment::Lead`] once contact identity is known, and the
//! dispatcher fans the lead out to the external collaborators.

pub mod assessment;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod telemetry;
