//! The assessment pipeline: answer model, intake wizard, scoring,
//! finalization gate, and results presenter.

pub mod answers;
pub mod lead;
pub mod results;
pub mod scoring;
pub mod wizard;

pub use answers::{
    AnswerField, AnswerParseError, AnswerSet, BiggestObstacle, Binary, CurrentStage,
    NinetyDayGoal, PreferredPath, NOTES_MAX_CHARS,
};
pub use lead::{ContactDetails, GateError, Lead};
pub use results::{CallToAction, CountUp, Insight, SegmentNarrative};
pub use scoring::{score, Segment};
pub use wizard::{
    IntakeWizard, SelectionEffect, StepKind, StepValidationError, Transition, WizardStep,
    AUTO_ADVANCE_DELAY, FORWARD_REVEAL_DELAY, TOTAL_STEPS,
};
