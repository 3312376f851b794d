use std::time::Duration;

use foliokit::feedback::{NotificationKind, NotificationPhase};
use foliokit::form::{ContactError, ContactField, FieldValidationError, FormError, SubmitState};
use foliokit::motion::{MotionConfig, MotionTransition};
use foliokit::prelude::*;
use foliokit::submission::{BoxedDeliveryFuture, PendingSubmission, deliver};
use foliokit::surface::SurfaceOp;
use futures::executor::block_on;

type Page = ContactPage<MemorySurface, ManualTimers>;

fn page() -> Page {
    ContactPage::new(PageOptions::default(), MemorySurface::new(), ManualTimers::new())
}

fn external_page() -> Page {
    let options = PageOptions::new()
        .submission(SubmissionOptions::new().delivery(Delivery::External));
    ContactPage::new(options, MemorySurface::new(), ManualTimers::new())
}

fn fill_valid(page: &mut Page) {
    for (field, text) in [
        (ContactField::Name, "Ada Lovelace"),
        (ContactField::Email, "ada@example.com"),
        (ContactField::Message, "I would like to talk about engines."),
    ] {
        page.dispatch(PageEvent::input(field, text)).expect("input is always accepted");
    }
}

fn submit_pending(page: &mut Page) -> PendingSubmission {
    match page.dispatch(PageEvent::Submit).expect("submit") {
        PageEffect::SubmitPending(pending) => pending,
        other => panic!("expected a pending submission, got {other:?}"),
    }
}

fn error_text(page: &Page, field: ContactField) -> &str {
    page.port().text(Element::FieldError(field.key()))
}

#[test]
fn initial_presentation_enables_the_submit_control() {
    let page = page();
    assert!(page.port().is_enabled(Element::SubmitButton));
    assert_eq!(page.port().text(Element::SubmitButton), "Send Message");
    assert!(page.port().visible_errors().is_empty());
    assert_eq!(
        page.port().class(Element::FieldInput(ContactField::Name.key())),
        Some(StyleClass::FieldNormal)
    );
}

#[test]
fn submitting_an_empty_form_shows_three_errors_and_no_notification() {
    let mut page = page();
    let effect = page.dispatch(PageEvent::Submit).expect("submit");

    assert_eq!(
        effect,
        PageEffect::SubmitRejected(vec![
            FieldValidationError {
                field: ContactField::Name,
                reason: ContactError::NameTooShort,
            },
            FieldValidationError {
                field: ContactField::Email,
                reason: ContactError::InvalidEmail,
            },
            FieldValidationError {
                field: ContactField::Message,
                reason: ContactError::MessageTooShort,
            },
        ])
    );
    assert_eq!(page.port().visible_errors().len(), 3);
    assert_eq!(
        error_text(&page, ContactField::Email),
        "Please enter a valid email address"
    );
    assert_eq!(
        page.port().class(Element::FieldInput(ContactField::Message.key())),
        Some(StyleClass::FieldInvalid)
    );
    assert!(page.notifications().current().is_none());
    assert!(page.port().mounted().is_empty());
    assert!(page.port().is_enabled(Element::SubmitButton));
    assert_eq!(page.timers().pending(), 0);
}

#[test]
fn submit_shows_only_the_fields_that_still_fail() {
    let mut page = page();
    page.dispatch(PageEvent::input(ContactField::Name, "x")).expect("input");
    page.dispatch(PageEvent::Submit).expect("first submit");
    assert_eq!(page.port().visible_errors().len(), 3);

    fill_valid(&mut page);
    page.dispatch(PageEvent::input(ContactField::Email, "not-an-email")).expect("input");
    let effect = page.dispatch(PageEvent::Submit).expect("second submit");

    assert!(matches!(effect, PageEffect::SubmitRejected(ref failures) if failures.len() == 1));
    assert_eq!(
        page.port().visible_errors(),
        vec![(
            ContactField::Email.key(),
            "Please enter a valid email address".to_string()
        )]
    );
}

#[test]
fn valid_submission_succeeds_after_the_simulated_latency() {
    let mut page = page();
    fill_valid(&mut page);
    submit_pending(&mut page);

    assert!(!page.port().is_enabled(Element::SubmitButton));
    assert_eq!(page.port().text(Element::SubmitButton), "Sending...");
    assert_eq!(page.submission().submit_state(), SubmitState::Submitting);

    page.advance(Duration::from_millis(1_499)).expect("advance");
    assert!(page.notifications().current().is_none());

    page.advance(Duration::from_millis(1)).expect("advance");
    let current = page.notifications().current().expect("success notification");
    assert_eq!(current.kind, NotificationKind::Success);
    assert_eq!(
        current.message,
        "Message sent successfully! I'll get back to you soon."
    );
    assert_eq!(page.port().mounted().len(), 1);

    for field in ContactField::ALL {
        let state = page.field_state(field);
        assert!(state.raw_value.is_empty(), "{field} should be reset");
        assert_eq!(state.error_message, None);
        assert_eq!(page.port().text(Element::FieldInput(field.key())), "");
    }
    assert!(page.port().visible_errors().is_empty());
    assert!(page.port().is_enabled(Element::SubmitButton));
    assert_eq!(page.port().text(Element::SubmitButton), "Send Message");
    assert_eq!(page.submission().submit_state(), SubmitState::Succeeded);
}

#[test]
fn success_notification_auto_dismisses() {
    let mut page = page();
    fill_valid(&mut page);
    submit_pending(&mut page);

    page.advance(Duration::from_millis(1_500 + 100)).expect("advance");
    assert_eq!(page.notifications().phase(), NotificationPhase::Visible);

    page.advance(Duration::from_millis(5_000)).expect("advance");
    assert_eq!(page.notifications().phase(), NotificationPhase::Exiting);

    page.advance(Duration::from_millis(300)).expect("advance");
    assert_eq!(page.notifications().phase(), NotificationPhase::Hidden);
    assert!(page.port().mounted().is_empty());
    assert_eq!(page.timers().pending(), 0);
}

#[test]
fn resubmitting_while_sending_is_rejected() {
    let mut page = page();
    fill_valid(&mut page);
    submit_pending(&mut page);

    assert_eq!(
        page.dispatch(PageEvent::Submit),
        Err(FormError::AlreadySubmitting)
    );
    assert!(page.port().visible_errors().is_empty());
}

#[test]
fn blur_shows_error_and_edit_clears_it_without_revalidating() {
    let mut page = page();
    page.dispatch(PageEvent::input(ContactField::Name, "A")).expect("input");
    let effect = page.dispatch(PageEvent::Blur(ContactField::Name)).expect("blur");
    assert_eq!(
        effect,
        PageEffect::FieldChecked {
            field: ContactField::Name,
            valid: false
        }
    );
    assert_eq!(
        error_text(&page, ContactField::Name),
        "Name must be at least 2 characters long"
    );
    assert_eq!(
        page.port().class(Element::FieldInput(ContactField::Name.key())),
        Some(StyleClass::FieldInvalid)
    );

    // Still too short, but the old message describes text that no longer exists.
    page.dispatch(PageEvent::input(ContactField::Name, "B")).expect("input");
    assert_eq!(error_text(&page, ContactField::Name), "");
    assert_eq!(
        page.port().class(Element::FieldInput(ContactField::Name.key())),
        Some(StyleClass::FieldNormal)
    );
    assert_eq!(page.field_state(ContactField::Name).error_message, None);

    page.dispatch(PageEvent::Blur(ContactField::Name)).expect("blur");
    assert!(page.field_state(ContactField::Name).error_message.is_some());
}

#[test]
fn blur_on_a_valid_field_keeps_the_normal_border() {
    let mut page = page();
    page.dispatch(PageEvent::input(ContactField::Email, "a@b.co")).expect("input");
    let effect = page.dispatch(PageEvent::Blur(ContactField::Email)).expect("blur");
    assert_eq!(
        effect,
        PageEffect::FieldChecked {
            field: ContactField::Email,
            valid: true
        }
    );
    assert_eq!(error_text(&page, ContactField::Email), "");
}

#[test]
fn rapid_notifications_leave_only_the_latest() {
    let mut page = page();
    let first = page.notify(NotificationEntry::new("first"));
    page.advance(Duration::from_millis(20)).expect("advance");
    let second = page.notify(NotificationEntry::new("second"));

    page.advance(Duration::from_millis(10_000)).expect("advance");
    assert_eq!(page.port().unmount_count(first), 1);
    assert_eq!(page.port().unmount_count(second), 1);

    let third = page.notify(NotificationEntry::new("third"));
    let fourth = page.notify(NotificationEntry::new("fourth"));
    page.advance(Duration::from_millis(100)).expect("advance");

    let current = page.notifications().current().expect("latest notification");
    assert_eq!(current.id, fourth);
    assert_eq!(current.message, "fourth");
    assert!(current.visible);
    assert_eq!(page.port().mounted().len(), 1);
    assert!(
        !page
            .port()
            .ops()
            .contains(&SurfaceOp::SetClass(
                Element::Notification(third),
                StyleClass::NotificationOnscreen
            ))
    );
}

#[test]
fn escape_and_close_click_share_the_dismiss_path() {
    let mut page = page();
    let id = page.notify(NotificationEntry::new("hello"));
    page.advance(Duration::from_millis(100)).expect("advance");

    assert_eq!(
        page.dispatch(PageEvent::KeyDown("Escape".into())),
        Ok(PageEffect::NotificationDismissed(true))
    );
    assert_eq!(
        page.dispatch(PageEvent::CloseNotification(id)),
        Ok(PageEffect::NotificationDismissed(false))
    );
    page.advance(Duration::from_millis(300)).expect("advance");
    assert_eq!(
        page.dispatch(PageEvent::KeyDown("escape".into())),
        Ok(PageEffect::NotificationDismissed(false))
    );
    assert_eq!(page.port().unmount_count(id), 1);

    assert_eq!(
        page.dispatch(PageEvent::KeyDown("Enter".into())),
        Ok(PageEffect::None)
    );
}

#[test]
fn external_failure_shows_an_error_and_keeps_the_fields() {
    let mut page = external_page();
    fill_valid(&mut page);
    let pending = submit_pending(&mut page);
    assert_eq!(page.timers().pending(), 0);
    assert_eq!(pending.form.email, "ada@example.com");

    let transport = SimulatedTransport::failing(
        Duration::from_millis(1),
        SubmissionError::Transport("connection reset".into()),
    );
    let result = block_on(deliver(&transport, &pending));
    let effect = page
        .dispatch(PageEvent::SubmissionSettled {
            ticket: pending.ticket,
            result,
        })
        .expect("settle");

    assert_eq!(effect, PageEffect::SubmitSettled(SubmitState::Failed));
    let current = page.notifications().current().expect("error notification");
    assert_eq!(current.kind, NotificationKind::Error);
    assert_eq!(
        current.message,
        "Message could not be sent: could not reach the server: connection reset"
    );
    assert_eq!(page.port().mounted().len(), 1);
    assert_eq!(page.field_state(ContactField::Name).raw_value, "Ada Lovelace");
    assert!(page.port().is_enabled(Element::SubmitButton));

    // The user can retry straight away.
    let retry = submit_pending(&mut page);
    let result = block_on(deliver(&SimulatedTransport::new(Duration::ZERO), &retry));
    assert_eq!(
        page.dispatch(PageEvent::SubmissionSettled {
            ticket: retry.ticket,
            result,
        }),
        Ok(PageEffect::SubmitSettled(SubmitState::Succeeded))
    );
    assert_eq!(
        page.notifications().current().map(|current| current.kind),
        Some(NotificationKind::Success)
    );
}

#[test]
fn settling_an_old_ticket_is_refused() {
    let mut page = external_page();
    fill_valid(&mut page);
    let first = submit_pending(&mut page);
    page.dispatch(PageEvent::SubmissionSettled {
        ticket: first.ticket,
        result: Err(SubmissionError::TimedOut),
    })
    .expect("settle first");

    let second = submit_pending(&mut page);
    assert_ne!(first.ticket, second.ticket);
    assert_eq!(
        page.dispatch(PageEvent::SubmissionSettled {
            ticket: first.ticket,
            result: Ok(()),
        }),
        Err(FormError::StaleSubmission(first.ticket))
    );
    assert_eq!(page.submission().submit_state(), SubmitState::Submitting);
}

fn size_limited(form: &ContactForm) -> BoxedDeliveryFuture<'_> {
    Box::pin(async move {
        if form.message.len() > 1_000 {
            Err(SubmissionError::Rejected("too long".into()))
        } else {
            Ok(())
        }
    })
}

#[test]
fn function_transport_receives_the_validated_form() {
    let mut page = external_page();
    fill_valid(&mut page);
    let pending = submit_pending(&mut page);

    assert_eq!(block_on(deliver(&size_limited, &pending)), Ok(()));
}

#[test]
fn wall_clock_timers_drive_the_same_flow() {
    let motion = MotionConfig::new()
        .enter(MotionTransition::new().delay_ms(1))
        .exit(MotionTransition::new().duration_ms(1));
    let options = PageOptions::new().submission(
        SubmissionOptions::new()
            .delivery(Delivery::Simulated {
                latency: Duration::from_millis(5),
            })
            .notification_motion(motion),
    );
    let mut page = ContactPage::new(options, MemorySurface::new(), DelayTimers::new());
    for (field, text) in [
        (ContactField::Name, "Ada"),
        (ContactField::Email, "ada@example.com"),
        (ContactField::Message, "Short but valid message"),
    ] {
        page.dispatch(PageEvent::input(field, text)).expect("input");
    }
    page.dispatch(PageEvent::Submit).expect("submit");

    assert!(block_on(page.run_next_timer()).expect("delivery timer"));
    assert_eq!(
        page.notifications().current().map(|current| current.kind),
        Some(NotificationKind::Success)
    );
    assert!(block_on(page.run_next_timer()).expect("reveal timer"));
    assert_eq!(page.notifications().phase(), NotificationPhase::Visible);

    page.dispatch(PageEvent::KeyDown("escape".into())).expect("escape");
    block_on(page.run_until_idle()).expect("drain timers");
    assert_eq!(page.notifications().phase(), NotificationPhase::Hidden);
    assert!(page.port().mounted().is_empty());
}
