use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_timer::Delay;
use gpui::SharedString;
use log::{debug, warn};

use crate::feedback::{NotificationEntry, NotificationManager};
use crate::form::{
    ContactController, ContactField, ContactForm, FieldValidationError, FormError, FormModel,
    FormOptions, FormResult, SubmitAttempt, SubmitState, SubmitTicket, contact_controller,
};
use crate::motion::MotionConfig;
use crate::surface::{Element, PresentationPort};
use crate::timer::{TimerEvent, TimerHost};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmissionError {
    Rejected(String),
    Transport(String),
    TimedOut,
}

impl Display for SubmissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::Rejected(reason) => write!(f, "message was rejected: {reason}"),
            SubmissionError::Transport(reason) => write!(f, "could not reach the server: {reason}"),
            SubmissionError::TimedOut => f.write_str("the request timed out"),
        }
    }
}

impl std::error::Error for SubmissionError {}

pub type BoxedDeliveryFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(), SubmissionError>> + Send + 'a>>;

/// Delivers a validated contact form somewhere outside the page.
pub trait ContactTransport: Send + Sync {
    fn deliver<'a>(&'a self, form: &'a ContactForm) -> BoxedDeliveryFuture<'a>;
}

impl<F> ContactTransport for F
where
    F: for<'a> Fn(&'a ContactForm) -> BoxedDeliveryFuture<'a> + Send + Sync,
{
    fn deliver<'a>(&'a self, form: &'a ContactForm) -> BoxedDeliveryFuture<'a> {
        (self)(form)
    }
}

/// Waits a fixed latency, then resolves with a preset outcome.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimulatedTransport {
    latency: Duration,
    outcome: Result<(), SubmissionError>,
}

impl SimulatedTransport {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            outcome: Ok(()),
        }
    }

    pub fn failing(latency: Duration, error: SubmissionError) -> Self {
        Self {
            latency,
            outcome: Err(error),
        }
    }
}

impl ContactTransport for SimulatedTransport {
    fn deliver<'a>(&'a self, _form: &'a ContactForm) -> BoxedDeliveryFuture<'a> {
        Box::pin(async move {
            Delay::new(self.latency).await;
            self.outcome.clone()
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Delivery {
    /// Settles successfully on a timer, with no I/O.
    Simulated { latency: Duration },
    /// The host runs a [`ContactTransport`] and reports the result back.
    External,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionOptions {
    pub idle_label: SharedString,
    pub busy_label: SharedString,
    pub success_message: SharedString,
    pub failure_message: SharedString,
    pub delivery: Delivery,
    pub notification_motion: MotionConfig,
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self {
            idle_label: "Send Message".into(),
            busy_label: "Sending...".into(),
            success_message: "Message sent successfully! I'll get back to you soon.".into(),
            failure_message: "Message could not be sent".into(),
            delivery: Delivery::Simulated {
                latency: Duration::from_millis(1_500),
            },
            notification_motion: MotionConfig::default(),
        }
    }
}

impl SubmissionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn idle_label(mut self, value: impl Into<SharedString>) -> Self {
        self.idle_label = value.into();
        self
    }

    pub fn busy_label(mut self, value: impl Into<SharedString>) -> Self {
        self.busy_label = value.into();
        self
    }

    pub fn success_message(mut self, value: impl Into<SharedString>) -> Self {
        self.success_message = value.into();
        self
    }

    pub fn failure_message(mut self, value: impl Into<SharedString>) -> Self {
        self.failure_message = value.into();
        self
    }

    pub fn delivery(mut self, value: Delivery) -> Self {
        self.delivery = value;
        self
    }

    pub fn notification_motion(mut self, value: MotionConfig) -> Self {
        self.notification_motion = value;
        self
    }
}

/// What a field looks like to the user right now.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldState {
    pub field: ContactField,
    pub raw_value: SharedString,
    pub error_message: Option<SharedString>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingSubmission {
    pub ticket: SubmitTicket,
    pub form: ContactForm,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    Invalid(Vec<FieldValidationError>),
    Pending(PendingSubmission),
}

/// Runs `transport` for a pending submission and returns the result to feed
/// back through `SubmissionController::settle`.
pub async fn deliver<T>(
    transport: &T,
    pending: &PendingSubmission,
) -> Result<(), SubmissionError>
where
    T: ContactTransport + ?Sized,
{
    transport.deliver(&pending.form).await
}

/// Drives the contact form: field feedback, the submit control and the
/// notification that reports the outcome.
pub struct SubmissionController {
    options: SubmissionOptions,
    form: ContactController,
}

impl SubmissionController {
    pub fn new(options: SubmissionOptions, form_options: FormOptions) -> Self {
        Self {
            options,
            form: contact_controller(form_options),
        }
    }

    pub fn options(&self) -> &SubmissionOptions {
        &self.options
    }

    pub fn form(&self) -> &ContactController {
        &self.form
    }

    pub fn submit_state(&self) -> SubmitState {
        self.form.submit_state()
    }

    pub fn field_state(&self, field: ContactField) -> FieldState {
        let fields = ContactForm::fields();
        let model = self.form.model();
        let (raw_value, error_message) = match field {
            ContactField::Name => (
                model.name.clone(),
                self.form.field_error_for_display(fields.name()),
            ),
            ContactField::Email => (
                model.email.clone(),
                self.form.field_error_for_display(fields.email()),
            ),
            ContactField::Message => (
                model.message.clone(),
                self.form.field_error_for_display(fields.message()),
            ),
        };
        FieldState {
            field,
            raw_value,
            error_message,
        }
    }

    /// Puts the form's elements into their idle presentation.
    pub fn present_initial(&self, port: &mut dyn PresentationPort) {
        self.present_values(port);
        self.form.present_all_fields(port);
        self.present_submit_control(port);
    }

    pub fn input(
        &mut self,
        field: ContactField,
        text: impl Into<SharedString>,
        port: &mut dyn PresentationPort,
    ) {
        let key = field.key();
        let fields = ContactForm::fields();
        let was_showing_error = self.field_state(field).error_message.is_some();
        match field {
            ContactField::Name => self.form.set(fields.name(), text.into()),
            ContactField::Email => self.form.set(fields.email(), text.into()),
            ContactField::Message => self.form.set(fields.message(), text.into()),
        }
        if was_showing_error {
            self.form.present_field_by_key(key, port);
        }
    }

    /// Validates the field the user just left. Returns whether it is valid.
    pub fn blur(&mut self, field: ContactField, port: &mut dyn PresentationPort) -> bool {
        let fields = ContactForm::fields();
        let is_valid = match field {
            ContactField::Name => self.form.touch(fields.name()),
            ContactField::Email => self.form.touch(fields.email()),
            ContactField::Message => self.form.touch(fields.message()),
        };
        self.form.present_field_by_key(field.key(), port);
        is_valid
    }

    pub fn submit(
        &mut self,
        port: &mut dyn PresentationPort,
        timers: &mut dyn TimerHost,
    ) -> FormResult<SubmitOutcome> {
        if self.form.submit_state().is_busy() {
            return Err(FormError::AlreadySubmitting);
        }
        self.form.clear_errors();
        self.form.present_all_fields(port);

        let attempt = self.form.begin_submit()?;
        self.form.present_all_fields(port);

        match attempt {
            SubmitAttempt::Invalid(failures) => {
                let failures = failures
                    .into_iter()
                    .filter_map(|(key, reason)| {
                        let field = ContactField::from_key(key)?;
                        Some(FieldValidationError { field, reason })
                    })
                    .collect();
                Ok(SubmitOutcome::Invalid(failures))
            }
            SubmitAttempt::Pending { ticket, model } => {
                self.present_submit_control(port);
                if let Delivery::Simulated { latency } = self.options.delivery {
                    timers.schedule(latency, TimerEvent::SimulatedDelivery(ticket));
                    debug!("submit {ticket} simulated for {latency:?}");
                }
                Ok(SubmitOutcome::Pending(PendingSubmission {
                    ticket,
                    form: model,
                }))
            }
        }
    }

    /// Completes the pending submission. Success reports through a `Success`
    /// notification and clears the form; failure reports through an `Error`
    /// notification and keeps what the user typed.
    pub fn settle(
        &mut self,
        ticket: SubmitTicket,
        result: Result<(), SubmissionError>,
        port: &mut dyn PresentationPort,
        timers: &mut dyn TimerHost,
        notifications: &mut NotificationManager,
    ) -> FormResult<SubmitState> {
        let state = self.form.finish_submit(ticket, &result)?;
        let motion = self.options.notification_motion;

        match result {
            Ok(()) => {
                let entry = NotificationEntry::success(self.options.success_message.clone())
                    .motion(motion);
                notifications.show(entry, port, timers);
                self.present_values(port);
                self.form.present_all_fields(port);
            }
            Err(error) => {
                warn!("submit {ticket} failed: {error}");
                let message = format!("{}: {error}", self.options.failure_message);
                notifications.show(NotificationEntry::error(message).motion(motion), port, timers);
            }
        }
        self.present_submit_control(port);
        Ok(state)
    }

    /// The submit control is disabled and relabelled while an attempt is in
    /// flight.
    fn present_submit_control(&self, port: &mut dyn PresentationPort) {
        let busy = self.form.submit_state().is_busy();
        let label = if busy {
            &self.options.busy_label
        } else {
            &self.options.idle_label
        };
        port.set_text(Element::SubmitButton, label);
        port.set_enabled(Element::SubmitButton, !busy);
    }

    fn present_values(&self, port: &mut dyn PresentationPort) {
        let fields = ContactForm::fields();
        self.form.present_text_value(fields.name(), port);
        self.form.present_text_value(fields.email(), port);
        self.form.present_text_value(fields.message(), port);
    }
}
