use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;

use log::debug;

use super::validation::{FormModel, ValidationError};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Identifies one accepted submit attempt. Only the latest ticket may settle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubmitTicket(pub u64);

impl Display for SubmitTicket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// `Succeeded` and `Failed` are the two terminal outcomes of an attempt; both
/// accept a fresh `Validating` transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmitState {
    pub fn is_busy(self) -> bool {
        matches!(self, SubmitState::Validating | SubmitState::Submitting)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationMode {
    OnChange,
    OnBlur,
    OnSubmit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormOptions {
    pub validate_mode: ValidationMode,
    pub clear_error_on_edit: bool,
    pub validate_first_error_only: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_mode: ValidationMode::OnBlur,
            clear_error_on_edit: true,
            validate_first_error_only: true,
        }
    }
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_mode(mut self, value: ValidationMode) -> Self {
        self.validate_mode = value;
        self
    }

    pub fn clear_error_on_edit(mut self, value: bool) -> Self {
        self.clear_error_on_edit = value;
        self
    }

    pub fn validate_first_error_only(mut self, value: bool) -> Self {
        self.validate_first_error_only = value;
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMeta<E> {
    pub dirty: bool,
    pub touched: bool,
    pub errors: Vec<E>,
}

impl<E> Default for FieldMeta<E> {
    fn default() -> Self {
        Self {
            dirty: false,
            touched: false,
            errors: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T, E> {
    pub model: T,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub is_dirty: bool,
    pub is_valid: bool,
    pub field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
}

/// Outcome of [`FormController::begin_submit`].
#[derive(Clone, Debug)]
pub enum SubmitAttempt<T, E> {
    /// Validation failed; nothing was handed off.
    Invalid(Vec<(FieldKey, E)>),
    /// The model passed validation and awaits a settle for `ticket`.
    Pending { ticket: SubmitTicket, model: T },
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    InvalidStateTransition { from: SubmitState, to: SubmitState },
    AlreadySubmitting,
    NoSubmissionPending,
    StaleSubmission(SubmitTicket),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::InvalidStateTransition { from, to } => {
                write!(f, "invalid submit state transition: {from:?} -> {to:?}")
            }
            FormError::AlreadySubmitting => f.write_str("form submit is already in progress"),
            FormError::NoSubmissionPending => f.write_str("no form submit is pending"),
            FormError::StaleSubmission(ticket) => {
                write!(f, "submit ticket {ticket} is no longer current")
            }
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

pub(super) type SyncFieldValidatorFn<T, E> = Arc<dyn Fn(&T) -> Result<(), E> + Send + Sync>;

/// Owns a form model, its per-field metadata and the submit lifecycle.
///
/// The controller lives on the UI thread and is mutated through `&mut self`
/// from event handlers; it never touches presentation directly (see
/// `form::binding` for that).
pub struct FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub(super) options: FormOptions,
    pub(super) initial_model: T,
    pub(super) model: T,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
    pub(super) validators: BTreeMap<FieldKey, Vec<SyncFieldValidatorFn<T, E>>>,
    pub(super) pending: Option<SubmitTicket>,
    pub(super) next_ticket: u64,
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub fn new(initial: T, options: FormOptions) -> Self {
        let field_meta = T::field_keys()
            .iter()
            .map(|key| (*key, FieldMeta::default()))
            .collect();
        Self {
            options,
            initial_model: initial.clone(),
            model: initial,
            submit_state: SubmitState::Idle,
            submit_count: 0,
            field_meta,
            validators: BTreeMap::new(),
            pending: None,
            next_ticket: 0,
        }
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn model(&self) -> &T {
        &self.model
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submit_state
    }

    pub fn pending_ticket(&self) -> Option<SubmitTicket> {
        self.pending
    }

    /// Validates the whole model and, when it passes, moves to `Submitting`
    /// and issues a ticket the caller must settle with [`Self::finish_submit`].
    pub fn begin_submit(&mut self) -> FormResult<SubmitAttempt<T, E>> {
        if self.submit_state.is_busy() {
            return Err(FormError::AlreadySubmitting);
        }
        self.transition(SubmitState::Validating)?;
        self.submit_count = self.submit_count.saturating_add(1);

        let failures = self.validate_form();
        if !failures.is_empty() {
            self.transition(SubmitState::Failed)?;
            debug!(
                "submit #{} rejected by validation ({} field(s))",
                self.submit_count,
                failures.len()
            );
            return Ok(SubmitAttempt::Invalid(failures));
        }

        self.transition(SubmitState::Submitting)?;
        self.next_ticket += 1;
        let ticket = SubmitTicket(self.next_ticket);
        self.pending = Some(ticket);
        debug!("submit {ticket} accepted");
        Ok(SubmitAttempt::Pending {
            ticket,
            model: self.model.clone(),
        })
    }

    /// Settles the pending attempt. Success resets the form to its initial
    /// model; failure keeps every field value so the user can retry.
    pub fn finish_submit<X>(
        &mut self,
        ticket: SubmitTicket,
        result: &Result<(), X>,
    ) -> FormResult<SubmitState> {
        match self.pending {
            None => return Err(FormError::NoSubmissionPending),
            Some(current) if current != ticket => return Err(FormError::StaleSubmission(ticket)),
            Some(_) => {}
        }
        self.pending = None;

        if result.is_ok() {
            self.transition(SubmitState::Succeeded)?;
            self.reset_model_and_meta();
        } else {
            self.transition(SubmitState::Failed)?;
        }
        debug!("submit {ticket} settled as {:?}", self.submit_state);
        Ok(self.submit_state)
    }

    /// Convenience for hosts that can hold the controller across an await.
    pub async fn submit_async<F, Fut, X>(&mut self, f: F) -> FormResult<SubmitState>
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = Result<(), X>>,
    {
        let (ticket, model) = match self.begin_submit()? {
            SubmitAttempt::Invalid(_) => return Ok(self.submit_state),
            SubmitAttempt::Pending { ticket, model } => (ticket, model),
        };
        let result = f(&model).await;
        self.finish_submit(ticket, &result)
    }

    pub fn reset_to_initial(&mut self) {
        self.reset_model_and_meta();
        self.submit_state = SubmitState::Idle;
        self.pending = None;
    }

    pub fn clear_errors(&mut self) {
        for meta in self.field_meta.values_mut() {
            meta.errors.clear();
        }
    }

    pub fn snapshot(&self) -> FormSnapshot<T, E> {
        FormSnapshot {
            model: self.model.clone(),
            submit_state: self.submit_state,
            submit_count: self.submit_count,
            is_dirty: self.field_meta.values().any(|meta| meta.dirty),
            is_valid: self.field_meta.values().all(|meta| meta.errors.is_empty()),
            field_meta: self.field_meta.clone(),
        }
    }

    pub fn field_meta_by_key(&self, key: FieldKey) -> Option<&FieldMeta<E>> {
        self.field_meta.get(&key)
    }

    pub(super) fn ensure_meta(&mut self, key: FieldKey) -> &mut FieldMeta<E> {
        self.field_meta.entry(key).or_default()
    }

    fn reset_model_and_meta(&mut self) {
        self.model = self.initial_model.clone();
        for meta in self.field_meta.values_mut() {
            *meta = FieldMeta::default();
        }
    }

    fn transition(&mut self, next: SubmitState) -> FormResult<()> {
        let current = self.submit_state;
        if current == next {
            return Ok(());
        }

        let allowed = matches!(
            (current, next),
            (SubmitState::Idle, SubmitState::Validating)
                | (SubmitState::Validating, SubmitState::Submitting)
                | (SubmitState::Validating, SubmitState::Failed)
                | (SubmitState::Submitting, SubmitState::Succeeded)
                | (SubmitState::Submitting, SubmitState::Failed)
                | (SubmitState::Succeeded, SubmitState::Validating)
                | (SubmitState::Failed, SubmitState::Validating)
                | (_, SubmitState::Idle)
        );
        if !allowed {
            return Err(FormError::InvalidStateTransition {
                from: current,
                to: next,
            });
        }
        self.submit_state = next;
        Ok(())
    }
}
