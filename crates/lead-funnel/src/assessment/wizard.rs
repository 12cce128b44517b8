use crate::assessment::answers::{AnswerField, AnswerParseError, AnswerSet};
use serde::Serialize;
use std::time::Duration;

/// Delay between a fresh binary selection and the scheduled advance, long
/// enough for the selection highlight to register.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(300);

/// How long after a step change the forward control stays hidden, so it does
/// not flash during an auto-advance.
pub const FORWARD_REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Welcome plus the fifteen question steps.
pub const TOTAL_STEPS: usize = 16;

/// What the current step collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Welcome,
    Binary,
    Categorical,
    FreeText,
}

/// A presentable snapshot of one wizard step.
#[derive(Debug, Clone, Serialize)]
pub struct WizardStep {
    pub index: usize,
    pub kind: StepKind,
    pub field: Option<AnswerField>,
    pub prompt: &'static str,
    pub options: Vec<&'static str>,
    pub back_visible: bool,
}

/// Outcome of a selection on the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEffect {
    /// `Some` when the selection schedules an automatic advance.
    pub auto_advance: Option<Duration>,
}

/// Outcome of a `next` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved to the given step index.
    Advanced(usize),
    /// Last question answered; the answer set is ready for the gate.
    Completed,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StepValidationError {
    #[error("answer the current question before continuing")]
    Unanswered,
    #[error("already at the first step")]
    AtStart,
    #[error("the wizard has already completed")]
    Finished,
    #[error(transparent)]
    Answer(#[from] AnswerParseError),
}

/// The intake wizard: a cursor over sixteen steps plus the answers gathered
/// so far. Pre-populated values are remembered so re-selecting one never
/// re-triggers auto-advance.
#[derive(Debug, Clone)]
pub struct IntakeWizard {
    step: usize,
    answers: AnswerSet,
    /// Last value seen per field, in step order. Selection only schedules an
    /// advance when it changes this.
    previous_values: [Option<String>; AnswerField::ALL.len()],
    completed: bool,
}

impl Default for IntakeWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeWizard {
    pub fn new() -> Self {
        Self::with_answers(AnswerSet::default())
    }

    /// Resume with answers carried back from the gate. Existing values seed
    /// the previous-value memory so they count as "already selected".
    pub fn with_answers(answers: AnswerSet) -> Self {
        let previous_values =
            std::array::from_fn(|idx| answers.value(AnswerField::ALL[idx]));
        Self {
            step: 0,
            answers,
            previous_values,
            completed: false,
        }
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Field collected at a step index; `None` for Welcome.
    pub fn field_at(step: usize) -> Option<AnswerField> {
        step.checked_sub(1)
            .and_then(|idx| AnswerField::ALL.get(idx).copied())
    }

    pub fn step_at(step: usize) -> Option<WizardStep> {
        if step >= TOTAL_STEPS {
            return None;
        }
        let field = Self::field_at(step);
        let kind = match field {
            None => StepKind::Welcome,
            Some(field) if field.is_binary() => StepKind::Binary,
            Some(AnswerField::Notes) => StepKind::FreeText,
            Some(_) => StepKind::Categorical,
        };
        Some(WizardStep {
            index: step,
            kind,
            field,
            prompt: field.map(AnswerField::prompt).unwrap_or(
                "Find out how free your business really lets you be.",
            ),
            options: field.map(AnswerField::option_keys).unwrap_or_default(),
            back_visible: step > 0,
        })
    }

    pub fn current_step(&self) -> WizardStep {
        // step is kept strictly below TOTAL_STEPS
        Self::step_at(self.step).unwrap_or(WizardStep {
            index: self.step,
            kind: StepKind::Welcome,
            field: None,
            prompt: "",
            options: Vec::new(),
            back_visible: false,
        })
    }

    fn current_field(&self) -> Option<AnswerField> {
        Self::field_at(self.step)
    }

    /// Record a selection on the current step. Binary steps schedule an
    /// auto-advance only when the value actually changed.
    pub fn select(&mut self, raw: &str) -> Result<SelectionEffect, StepValidationError> {
        if self.completed {
            return Err(StepValidationError::Finished);
        }
        let field = self
            .current_field()
            .ok_or(StepValidationError::Unanswered)?;

        self.answers.set(field, raw)?;

        let slot = &mut self.previous_values[self.step - 1];
        let new_value = self.answers.value(field);
        let changed = *slot != new_value;
        *slot = new_value;

        let auto_advance = if field.is_binary() && changed {
            Some(AUTO_ADVANCE_DELAY)
        } else {
            None
        };
        Ok(SelectionEffect { auto_advance })
    }

    /// Advance past the current step; at the final step this completes the
    /// wizard instead. Required steps refuse to advance while unanswered.
    pub fn next(&mut self) -> Result<Transition, StepValidationError> {
        if self.completed {
            return Err(StepValidationError::Finished);
        }
        if let Some(field) = self.current_field() {
            if field.is_required() && !self.answers.is_answered(field) {
                return Err(StepValidationError::Unanswered);
            }
        }
        if self.step + 1 == TOTAL_STEPS {
            self.completed = true;
            return Ok(Transition::Completed);
        }
        self.step += 1;
        Ok(Transition::Advanced(self.step))
    }

    /// Step backward without discarding any answer.
    pub fn back(&mut self) -> Result<usize, StepValidationError> {
        if self.completed {
            return Err(StepValidationError::Finished);
        }
        if self.step == 0 {
            return Err(StepValidationError::AtStart);
        }
        self.step -= 1;
        Ok(self.step)
    }

    /// Whether the explicit forward control should be shown, given how long
    /// ago the step last changed.
    pub fn forward_control_visible(&self, since_step_change: Duration) -> bool {
        if since_step_change < FORWARD_REVEAL_DELAY {
            return false;
        }
        match self.current_field() {
            None => true,
            Some(AnswerField::Notes) => true,
            Some(field) => self.answers.is_answered(field),
        }
    }

    /// Hand the gathered answers to the gate.
    pub fn into_answers(self) -> AnswerSet {
        self.answers
    }
}
