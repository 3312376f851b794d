use std::time::Duration;

use gpui::SharedString;
use log::{debug, trace};

use crate::motion::MotionConfig;
use crate::surface::{Element, PresentationPort, StyleClass};
use crate::timer::{TimerEvent, TimerHost, TimerId};

/// Generation token of a notification. Strictly increasing per manager, so a
/// timer or close click carrying an older id can never act on a newer one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NotificationId(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotificationPhase {
    Hidden,
    Entering,
    Visible,
    Exiting,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotificationStep {
    Reveal,
    AutoDismiss,
    Remove,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NotificationTimer {
    pub id: NotificationId,
    pub step: NotificationStep,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotificationEntry {
    pub message: SharedString,
    pub kind: NotificationKind,
    pub auto_close_ms: Option<u32>,
    pub closable: bool,
    pub motion: MotionConfig,
}

impl NotificationEntry {
    pub fn new(message: impl Into<SharedString>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Info,
            auto_close_ms: Some(5_000),
            closable: true,
            motion: MotionConfig::default(),
        }
    }

    pub fn success(message: impl Into<SharedString>) -> Self {
        Self::new(message).kind(NotificationKind::Success)
    }

    pub fn error(message: impl Into<SharedString>) -> Self {
        Self::new(message).kind(NotificationKind::Error)
    }

    pub fn kind(mut self, value: NotificationKind) -> Self {
        self.kind = value;
        self
    }

    pub fn auto_close_ms(mut self, value: Option<u32>) -> Self {
        self.auto_close_ms = value;
        self
    }

    pub fn closable(mut self, value: bool) -> Self {
        self.closable = value;
        self
    }

    pub fn motion(mut self, value: MotionConfig) -> Self {
        self.motion = value;
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotificationSnapshot {
    pub id: NotificationId,
    pub message: SharedString,
    pub kind: NotificationKind,
    pub phase: NotificationPhase,
    pub visible: bool,
    pub created_at: Duration,
}

struct ActiveNotification {
    id: NotificationId,
    entry: NotificationEntry,
    phase: NotificationPhase,
    created_at: Duration,
    timers: Vec<TimerId>,
}

/// Owns the single notification slot.
///
/// `Hidden -> Entering -> Visible -> Exiting -> Hidden`. A `show` in any phase
/// tears the current notification down on the spot (timers cancelled, node
/// unmounted) and starts over with the new entry.
#[derive(Default)]
pub struct NotificationManager {
    next_id: u64,
    active: Option<ActiveNotification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> NotificationPhase {
        self.active
            .as_ref()
            .map_or(NotificationPhase::Hidden, |active| active.phase)
    }

    pub fn current(&self) -> Option<NotificationSnapshot> {
        self.active.as_ref().map(|active| NotificationSnapshot {
            id: active.id,
            message: active.entry.message.clone(),
            kind: active.entry.kind,
            phase: active.phase,
            visible: active.phase == NotificationPhase::Visible,
            created_at: active.created_at,
        })
    }

    pub fn show(
        &mut self,
        entry: NotificationEntry,
        port: &mut dyn PresentationPort,
        timers: &mut dyn TimerHost,
    ) -> NotificationId {
        if let Some(previous) = self.active.take() {
            debug!("notification {:?} preempted", previous.id);
            Self::release(previous, port, timers);
        }

        self.next_id += 1;
        let id = NotificationId(self.next_id);
        port.mount_notification(id, &entry);
        let enter_delay = entry.motion.enter_delay();
        debug!("notification {id:?} ({:?}) entering", entry.kind);
        self.active = Some(ActiveNotification {
            id,
            entry,
            phase: NotificationPhase::Entering,
            created_at: timers.now(),
            timers: Vec::new(),
        });

        if enter_delay.is_zero() {
            self.reveal(port, timers);
        } else {
            self.arm(NotificationStep::Reveal, enter_delay, timers);
        }
        id
    }

    /// Starts the exit of the current notification. Returns `false` when
    /// nothing is showing or the exit is already under way.
    pub fn dismiss(&mut self, port: &mut dyn PresentationPort, timers: &mut dyn TimerHost) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if !matches!(
            active.phase,
            NotificationPhase::Entering | NotificationPhase::Visible
        ) {
            return false;
        }

        for timer in active.timers.drain(..) {
            timers.cancel(timer);
        }
        active.phase = NotificationPhase::Exiting;
        port.set_class(
            Element::Notification(active.id),
            StyleClass::NotificationOffscreen,
        );
        debug!("notification {:?} exiting", active.id);

        let exit = active.entry.motion.exit_duration();
        if exit.is_zero() {
            self.remove(port, timers);
        } else {
            self.arm(NotificationStep::Remove, exit, timers);
        }
        true
    }

    /// Dismisses only when `id` is still the current notification.
    pub fn dismiss_if_current(
        &mut self,
        id: NotificationId,
        port: &mut dyn PresentationPort,
        timers: &mut dyn TimerHost,
    ) -> bool {
        if self.active.as_ref().is_none_or(|active| active.id != id) {
            trace!("ignoring dismissal of stale notification {id:?}");
            return false;
        }
        self.dismiss(port, timers)
    }

    /// Handles a fired notification timer. Returns `false` when the timer no
    /// longer applies to the current notification or its phase.
    pub fn handle_timer(
        &mut self,
        fired: TimerId,
        timer: NotificationTimer,
        port: &mut dyn PresentationPort,
        timers: &mut dyn TimerHost,
    ) -> bool {
        let Some(active) = self.active.as_mut() else {
            trace!("dropping {timer:?}: no notification");
            return false;
        };
        if active.id != timer.id {
            trace!("dropping {timer:?}: current is {:?}", active.id);
            return false;
        }
        active.timers.retain(|pending| *pending != fired);

        match (timer.step, active.phase) {
            (NotificationStep::Reveal, NotificationPhase::Entering) => {
                self.reveal(port, timers);
                true
            }
            (NotificationStep::AutoDismiss, NotificationPhase::Visible) => {
                self.dismiss(port, timers)
            }
            (NotificationStep::Remove, NotificationPhase::Exiting) => {
                self.remove(port, timers);
                true
            }
            (step, phase) => {
                trace!("dropping {step:?} for {:?} in {phase:?}", timer.id);
                false
            }
        }
    }

    fn reveal(&mut self, port: &mut dyn PresentationPort, timers: &mut dyn TimerHost) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.phase = NotificationPhase::Visible;
        port.set_class(
            Element::Notification(active.id),
            StyleClass::NotificationOnscreen,
        );
        debug!("notification {:?} visible", active.id);

        if let Some(auto_close_ms) = active.entry.auto_close_ms {
            let delay = Duration::from_millis(u64::from(auto_close_ms));
            self.arm(NotificationStep::AutoDismiss, delay, timers);
        }
    }

    fn remove(&mut self, port: &mut dyn PresentationPort, timers: &mut dyn TimerHost) {
        if let Some(active) = self.active.take() {
            debug!("notification {:?} removed", active.id);
            Self::release(active, port, timers);
        }
    }

    fn arm(&mut self, step: NotificationStep, delay: Duration, timers: &mut dyn TimerHost) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let event = TimerEvent::Notification(NotificationTimer {
            id: active.id,
            step,
        });
        active.timers.push(timers.schedule(delay, event));
    }

    fn release(
        active: ActiveNotification,
        port: &mut dyn PresentationPort,
        timers: &mut dyn TimerHost,
    ) {
        for timer in active.timers {
            timers.cancel(timer);
        }
        port.unmount_notification(active.id);
    }
}
