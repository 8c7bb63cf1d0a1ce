//! Wizard controller - step navigation and submission state machine
//!
//! States are `Editing(step)`, `Submitting` and `Completed`. A failed
//! submission returns the wizard to `Editing(last step)` with the failure
//! kept in [`WizardController::field_error`], so the user can retry without
//! re-entering answers.
//!
//! The asynchronous boundaries (submission and entity searches) are exposed
//! as ticketed begin/finish pairs. A ticket carries the session generation
//! it was issued in; results presented with an outdated ticket are
//! discarded instead of being applied to a wizard that has moved on.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::answers::{AnswerMap, AnswerValue};
use crate::core::entity::{EntityKind, SelectedEntity};
use crate::core::question::{FormDefinition, Question, QuestionKind};
use crate::service::{
    EntityDirectory, RegistrationReceipt, RegistrationService, SubmissionFailure,
};
use crate::wizard::mapper::{self, RegistrationPayload};
use crate::wizard::validator::{self, FieldError};
use crate::wizard::visibility;

/// Generic message shown when a submission fails
pub const SUBMISSION_ERROR: &str = "Error al enviar el registro. Por favor, intenta nuevamente.";

/// Where the wizard is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing(usize),
    Submitting,
    Completed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Editing(step) => write!(f, "editing step {}", step + 1),
            Phase::Submitting => write!(f, "submitting"),
            Phase::Completed => write!(f, "completed"),
        }
    }
}

/// Error shown on the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    Field(FieldError),
    Submission(SubmissionFailure),
}

impl std::fmt::Display for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepError::Field(e) => write!(f, "{}", e),
            StepError::Submission(_) => write!(f, "{}", SUBMISSION_ERROR),
        }
    }
}

/// Result of a call to [`WizardController::advance`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The current answer is invalid; the step did not change
    Blocked(FieldError),
    /// Moved to the given step
    Moved(usize),
    /// Registration accepted
    Completed(RegistrationReceipt),
    /// Registration refused or unreachable; back on the last step
    SubmissionFailed(SubmissionFailure),
}

/// Calls the current state does not allow
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("A request is in flight; wait for it to finish")]
    Busy,

    #[error("The registration is already complete")]
    Finished,

    #[error("Already at the first question")]
    AtFirstStep,

    #[error("Can only answer the current question '{expected}', not '{got}'")]
    NotCurrentQuestion { expected: String, got: String },

    #[error("Question '{id}' does not accept this kind of answer")]
    AnswerKind { id: String },

    #[error("Question '{id}' is not a searchable question")]
    NotSearchable { id: String },

    #[error("New {kind} entries cannot be created")]
    NotCreatable { kind: EntityKind },

    #[error("The wizard is not ready to submit")]
    NotAtLastStep,

    #[error("Response belongs to an earlier state of the wizard")]
    StaleResponse,
}

/// Proof that a submission was started; needed to apply its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    generation: u64,
    payload: RegistrationPayload,
}

impl SubmissionTicket {
    pub fn payload(&self) -> &RegistrationPayload {
        &self.payload
    }
}

/// Outcome of [`WizardController::begin_submission`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStart {
    /// Payload ready to send; the wizard is `Submitting`
    InFlight(SubmissionTicket),
    /// The answers could not be mapped; the wizard stays editable
    Refused(SubmissionFailure),
}

/// Proof that a lookup was started for the current question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    seq: u64,
    step: usize,
    kind: EntityKind,
    query: String,
}

impl SearchTicket {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Read-only snapshot of the wizard
#[derive(Debug)]
pub struct WizardState<'a> {
    pub current_step: Option<usize>,
    pub answers: &'a AnswerMap,
    pub visible_questions: Vec<&'a Question>,
    pub field_error: Option<String>,
    pub is_submitting: bool,
}

/// Drives one registration session
pub struct WizardController {
    form: FormDefinition,
    answers: AnswerMap,
    visible: Vec<usize>,
    phase: Phase,
    error: Option<StepError>,
    receipt: Option<RegistrationReceipt>,
    generation: u64,
    search_seq: u64,
    pending_search: Option<u64>,
    service: Box<dyn RegistrationService>,
    directory: Box<dyn EntityDirectory>,
}

impl WizardController {
    /// Start a session at the first question with no answers
    pub fn new(
        form: FormDefinition,
        service: Box<dyn RegistrationService>,
        directory: Box<dyn EntityDirectory>,
    ) -> Self {
        let answers = AnswerMap::new();
        let visible = visibility::visible_indices(form.questions(), &answers);
        Self {
            form,
            answers,
            visible,
            phase: Phase::Editing(0),
            error: None,
            receipt: None,
            generation: 0,
            search_seq: 0,
            pending_search: None,
            service,
            directory,
        }
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn field_error(&self) -> Option<&StepError> {
        self.error.as_ref()
    }

    pub fn receipt(&self) -> Option<&RegistrationReceipt> {
        self.receipt.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Index of the current step within the visible questions
    pub fn current_step(&self) -> Option<usize> {
        match self.phase {
            Phase::Editing(step) => Some(step),
            _ => None,
        }
    }

    /// Question shown at the current step
    pub fn current_question(&self) -> Option<&Question> {
        let step = self.current_step()?;
        self.visible
            .get(step)
            .map(|&idx| &self.form.questions()[idx])
    }

    /// Questions currently shown, in order
    pub fn visible_questions(&self) -> Vec<&Question> {
        self.visible
            .iter()
            .map(|&idx| &self.form.questions()[idx])
            .collect()
    }

    pub fn step_count(&self) -> usize {
        self.visible.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step()
            .is_some_and(|step| step + 1 == self.visible.len())
    }

    pub fn state(&self) -> WizardState<'_> {
        WizardState {
            current_step: self.current_step(),
            answers: &self.answers,
            visible_questions: self.visible_questions(),
            field_error: self.error.as_ref().map(|e| e.to_string()),
            is_submitting: self.is_submitting(),
        }
    }

    /// Store the answer for the current question
    pub fn record_answer(
        &mut self,
        question_id: &str,
        value: impl Into<AnswerValue>,
    ) -> Result<(), WizardError> {
        let step = self.editing_step()?;
        if self.pending_search.is_some() {
            return Err(WizardError::Busy);
        }

        let question = self.question_at(step);
        if question.id != question_id {
            return Err(WizardError::NotCurrentQuestion {
                expected: question.id.clone(),
                got: question_id.to_string(),
            });
        }

        let value = value.into();
        let accepts = match (&question.kind, &value) {
            (QuestionKind::SearchableSelect { .. }, AnswerValue::Entity(_)) => true,
            (QuestionKind::SearchableSelect { .. }, AnswerValue::Text(_)) => false,
            (_, AnswerValue::Text(_)) => true,
            (_, AnswerValue::Entity(_)) => false,
        };
        if !accepts {
            return Err(WizardError::AnswerKind {
                id: question_id.to_string(),
            });
        }

        debug!(question = question_id, "answer recorded");
        self.answers.set(question_id, value);
        self.error = None;
        self.refresh_visibility();
        Ok(())
    }

    /// Validate the current answer and move forward, submitting on the last step
    pub fn advance(&mut self) -> Result<StepOutcome, WizardError> {
        let step = self.editing_step()?;
        if self.pending_search.is_some() {
            return Err(WizardError::Busy);
        }

        if let Err(e) = self.validate_current(step) {
            debug!(step, error = %e, "advance blocked");
            self.error = Some(StepError::Field(e));
            return Ok(StepOutcome::Blocked(e));
        }
        self.error = None;

        if step + 1 < self.visible.len() {
            self.set_step(step + 1);
            return Ok(StepOutcome::Moved(step + 1));
        }

        match self.begin_submission()? {
            SubmissionStart::Refused(failure) => Ok(StepOutcome::SubmissionFailed(failure)),
            SubmissionStart::InFlight(ticket) => {
                let result = self.service.submit(ticket.payload());
                self.finish_submission(ticket, result)
            }
        }
    }

    /// Go back one step without validating
    pub fn retreat(&mut self) -> Result<usize, WizardError> {
        let step = self.editing_step()?;
        if step == 0 {
            return Err(WizardError::AtFirstStep);
        }
        self.error = None;
        self.set_step(step - 1);
        Ok(step - 1)
    }

    /// Map the answers and enter `Submitting`
    ///
    /// Only valid on the last step. Hosts with their own transport send
    /// [`SubmissionTicket::payload`] and hand the result to
    /// [`finish_submission`](Self::finish_submission); [`advance`](Self::advance)
    /// does both with the injected service.
    pub fn begin_submission(&mut self) -> Result<SubmissionStart, WizardError> {
        self.editing_step()?;
        if !self.is_last_step() {
            return Err(WizardError::NotAtLastStep);
        }

        match mapper::map_to_payload(self.form.kind(), &self.answers) {
            Ok(payload) => {
                debug!(form = %self.form.kind(), "submission started");
                self.phase = Phase::Submitting;
                Ok(SubmissionStart::InFlight(SubmissionTicket {
                    generation: self.generation,
                    payload,
                }))
            }
            Err(e) => {
                warn!(form = %self.form.kind(), error = %e, "submission refused before sending");
                let failure = SubmissionFailure::from(e);
                self.error = Some(StepError::Submission(failure.clone()));
                Ok(SubmissionStart::Refused(failure))
            }
        }
    }

    /// Apply the service's answer to a submission started with `ticket`
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<RegistrationReceipt, SubmissionFailure>,
    ) -> Result<StepOutcome, WizardError> {
        if ticket.generation != self.generation || self.phase != Phase::Submitting {
            debug!("discarding stale submission response");
            return Err(WizardError::StaleResponse);
        }

        match result {
            Ok(receipt) => {
                info!(id = %receipt.id, "registration completed");
                self.phase = Phase::Completed;
                self.error = None;
                self.receipt = Some(receipt.clone());
                Ok(StepOutcome::Completed(receipt))
            }
            Err(failure) => {
                warn!(
                    status = ?failure.status,
                    fields = ?failure.field_errors.keys().collect::<Vec<_>>(),
                    "registration failed: {}",
                    failure.message
                );
                self.phase = Phase::Editing(self.visible.len() - 1);
                self.error = Some(StepError::Submission(failure.clone()));
                Ok(StepOutcome::SubmissionFailed(failure))
            }
        }
    }

    /// Start a lookup for the current searchable question
    ///
    /// A newer search supersedes older ones; while one is pending the
    /// current field cannot be answered or advanced.
    pub fn begin_search(&mut self, query: &str) -> Result<SearchTicket, WizardError> {
        let step = self.editing_step()?;
        let kind = self.searchable_kind(step)?;

        self.search_seq += 1;
        self.pending_search = Some(self.search_seq);
        Ok(SearchTicket {
            generation: self.generation,
            seq: self.search_seq,
            step,
            kind,
            query: query.to_string(),
        })
    }

    /// Accept lookup results, or `None` if the ticket is stale
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        results: Vec<SelectedEntity>,
    ) -> Option<Vec<SelectedEntity>> {
        let current = ticket.generation == self.generation
            && self.pending_search == Some(ticket.seq)
            && self.current_step() == Some(ticket.step);
        if !current {
            debug!(query = %ticket.query, "discarding stale search results");
            return None;
        }
        self.pending_search = None;
        Some(results)
    }

    /// Abandon a pending lookup
    pub fn cancel_search(&mut self) {
        self.pending_search = None;
    }

    /// Search the injected directory for the current question
    pub fn search(&mut self, query: &str) -> Result<Vec<SelectedEntity>, WizardError> {
        let ticket = self.begin_search(query)?;
        let results = self.directory.search(ticket.kind(), ticket.query());
        self.finish_search(&ticket, results)
            .ok_or(WizardError::StaleResponse)
    }

    /// Create an entity for the current question and select it
    pub fn create_entity(
        &mut self,
        name: &str,
        initial: Option<&str>,
    ) -> Result<Option<SelectedEntity>, WizardError> {
        let step = self.editing_step()?;
        let kind = self.searchable_kind(step)?;
        if !kind.is_creatable() {
            return Err(WizardError::NotCreatable { kind });
        }

        let Some(entity) = self.directory.create(kind, name, initial) else {
            return Ok(None);
        };
        let id = self.question_at(step).id.clone();
        self.record_answer(&id, entity.clone())?;
        Ok(Some(entity))
    }

    /// Discard the session and start over
    pub fn reset(&mut self) {
        self.generation += 1;
        self.answers = AnswerMap::new();
        self.error = None;
        self.receipt = None;
        self.pending_search = None;
        self.phase = Phase::Editing(0);
        self.refresh_visibility();
    }

    fn editing_step(&self) -> Result<usize, WizardError> {
        match self.phase {
            Phase::Editing(step) => Ok(step),
            Phase::Submitting => Err(WizardError::Busy),
            Phase::Completed => Err(WizardError::Finished),
        }
    }

    fn question_at(&self, step: usize) -> &Question {
        &self.form.questions()[self.visible[step]]
    }

    fn searchable_kind(&self, step: usize) -> Result<EntityKind, WizardError> {
        let question = self.question_at(step);
        match &question.kind {
            QuestionKind::SearchableSelect { source } => Ok(*source),
            _ => Err(WizardError::NotSearchable {
                id: question.id.clone(),
            }),
        }
    }

    fn validate_current(&self, step: usize) -> Result<(), FieldError> {
        let question = self.question_at(step);
        let raw = self.answers.text(&question.id).unwrap_or("");
        let selected = self.answers.entity(&question.id);
        validator::validate(question, raw, selected)
    }

    fn set_step(&mut self, step: usize) {
        debug!(from = ?self.current_step(), to = step, "step changed");
        self.pending_search = None;
        self.phase = Phase::Editing(step);
    }

    fn refresh_visibility(&mut self) {
        self.visible = visibility::visible_indices(self.form.questions(), &self.answers);
        if let Phase::Editing(step) = self.phase {
            let last = self.visible.len().saturating_sub(1);
            if step > last {
                self.phase = Phase::Editing(last);
            }
        }
    }
}
