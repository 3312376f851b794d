use std::time::Duration;

use gpui::SharedString;
use log::{debug, trace};

use crate::feedback::{NotificationEntry, NotificationId, NotificationManager};
use crate::form::{
    ContactField, FieldValidationError, FormError, FormOptions, FormResult, SubmitState,
    SubmitTicket,
};
use crate::submission::{
    FieldState, PendingSubmission, SubmissionController, SubmissionError, SubmissionOptions,
    SubmitOutcome,
};
use crate::surface::PresentationPort;
use crate::timer::{DelayTimers, ManualTimers, TimerEvent, TimerHost, TimerId};

/// Host events the page reacts to, in delivery order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PageEvent {
    Blur(ContactField),
    Input {
        field: ContactField,
        text: SharedString,
    },
    Submit,
    CloseNotification(NotificationId),
    /// Key name as reported by the host, e.g. `"escape"`.
    KeyDown(SharedString),
    SubmissionSettled {
        ticket: SubmitTicket,
        result: Result<(), SubmissionError>,
    },
}

impl PageEvent {
    pub fn input(field: ContactField, text: impl Into<SharedString>) -> Self {
        PageEvent::Input {
            field,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PageEffect {
    None,
    FieldChecked { field: ContactField, valid: bool },
    SubmitRejected(Vec<FieldValidationError>),
    /// Handed to the host when delivery is external.
    SubmitPending(PendingSubmission),
    SubmitSettled(SubmitState),
    NotificationDismissed(bool),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageOptions {
    pub form: FormOptions,
    pub submission: SubmissionOptions,
}

impl PageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(mut self, value: FormOptions) -> Self {
        self.form = value;
        self
    }

    pub fn submission(mut self, value: SubmissionOptions) -> Self {
        self.submission = value;
        self
    }
}

/// Page-level owner of the contact form and notification slot.
///
/// Built once when the page initializes; every host callback goes through
/// [`ContactPage::dispatch`] or [`ContactPage::fire_timer`].
pub struct ContactPage<P, H>
where
    P: PresentationPort,
    H: TimerHost,
{
    port: P,
    timers: H,
    submission: SubmissionController,
    notifications: NotificationManager,
}

impl<P, H> ContactPage<P, H>
where
    P: PresentationPort,
    H: TimerHost,
{
    pub fn new(options: PageOptions, mut port: P, timers: H) -> Self {
        let submission = SubmissionController::new(options.submission, options.form);
        submission.present_initial(&mut port);
        debug!("contact page initialized");
        Self {
            port,
            timers,
            submission,
            notifications: NotificationManager::new(),
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn timers(&self) -> &H {
        &self.timers
    }

    pub fn submission(&self) -> &SubmissionController {
        &self.submission
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn field_state(&self, field: ContactField) -> FieldState {
        self.submission.field_state(field)
    }

    /// Shows a notification on behalf of another part of the page.
    pub fn notify(&mut self, entry: NotificationEntry) -> NotificationId {
        self.notifications
            .show(entry, &mut self.port, &mut self.timers)
    }

    pub fn dispatch(&mut self, event: PageEvent) -> FormResult<PageEffect> {
        trace!("dispatching {event:?}");
        match event {
            PageEvent::Blur(field) => {
                let valid = self.submission.blur(field, &mut self.port);
                Ok(PageEffect::FieldChecked { field, valid })
            }
            PageEvent::Input { field, text } => {
                self.submission.input(field, text, &mut self.port);
                Ok(PageEffect::None)
            }
            PageEvent::Submit => match self.submission.submit(&mut self.port, &mut self.timers)? {
                SubmitOutcome::Invalid(failures) => Ok(PageEffect::SubmitRejected(failures)),
                SubmitOutcome::Pending(pending) => Ok(PageEffect::SubmitPending(pending)),
            },
            PageEvent::CloseNotification(id) => {
                let dismissed =
                    self.notifications
                        .dismiss_if_current(id, &mut self.port, &mut self.timers);
                Ok(PageEffect::NotificationDismissed(dismissed))
            }
            PageEvent::KeyDown(key) => {
                if !key.eq_ignore_ascii_case("escape") {
                    return Ok(PageEffect::None);
                }
                let dismissed = self
                    .notifications
                    .dismiss(&mut self.port, &mut self.timers);
                Ok(PageEffect::NotificationDismissed(dismissed))
            }
            PageEvent::SubmissionSettled { ticket, result } => {
                let state = self.submission.settle(
                    ticket,
                    result,
                    &mut self.port,
                    &mut self.timers,
                    &mut self.notifications,
                )?;
                Ok(PageEffect::SubmitSettled(state))
            }
        }
    }

    /// Routes a fired timer. Returns `false` when the timer was stale.
    pub fn fire_timer(&mut self, id: TimerId, event: TimerEvent) -> FormResult<bool> {
        match event {
            TimerEvent::Notification(timer) => Ok(self.notifications.handle_timer(
                id,
                timer,
                &mut self.port,
                &mut self.timers,
            )),
            TimerEvent::SimulatedDelivery(ticket) => {
                let settled = self.submission.settle(
                    ticket,
                    Ok(()),
                    &mut self.port,
                    &mut self.timers,
                    &mut self.notifications,
                );
                match settled {
                    Ok(_) => Ok(true),
                    Err(FormError::StaleSubmission(_) | FormError::NoSubmissionPending) => {
                        trace!("dropping simulated delivery for {ticket}");
                        Ok(false)
                    }
                    Err(error) => Err(error),
                }
            }
        }
    }
}

impl<P> ContactPage<P, ManualTimers>
where
    P: PresentationPort,
{
    /// Moves the virtual clock forward, firing every timer that falls due,
    /// including timers scheduled by earlier fires within the same window.
    /// Returns how many fired timers were acted on.
    pub fn advance(&mut self, by: Duration) -> FormResult<usize> {
        let deadline = self.timers.now() + by;
        let mut handled = 0;
        while let Some((id, event)) = self.timers.pop_due(deadline) {
            if self.fire_timer(id, event)? {
                handled += 1;
            }
        }
        self.timers.advance_to(deadline);
        Ok(handled)
    }
}

impl<P> ContactPage<P, DelayTimers>
where
    P: PresentationPort,
{
    /// Waits for the next wall-clock timer and routes it. Returns `Ok(false)`
    /// once nothing is scheduled.
    pub async fn run_next_timer(&mut self) -> FormResult<bool> {
        let Some((id, event)) = self.timers.next_fire().await else {
            return Ok(false);
        };
        self.fire_timer(id, event)?;
        Ok(true)
    }

    pub async fn run_until_idle(&mut self) -> FormResult<()> {
        while self.run_next_timer().await? {}
        Ok(())
    }
}
