//! Presentation port.
//!
//! Validator, notification manager and submission controller never touch a UI
//! tree directly. They write through [`PresentationPort`], addressing the few
//! elements they own with [`Element`]. [`MemorySurface`] is the in-memory
//! implementation used by tests and headless hosts.

use std::collections::BTreeMap;

use crate::feedback::{NotificationEntry, NotificationId, NotificationKind};
use crate::form::FieldKey;
use crate::motion::TransitionPreset;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Element {
    FieldInput(FieldKey),
    FieldError(FieldKey),
    SubmitButton,
    Notification(NotificationId),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StyleClass {
    /// Default border on a field input.
    FieldNormal,
    /// Error border on a field input.
    FieldInvalid,
    /// Notification translated out of view (before entry and during exit).
    NotificationOffscreen,
    NotificationOnscreen,
}

pub trait PresentationPort {
    fn set_text(&mut self, element: Element, text: &str);
    fn set_class(&mut self, element: Element, class: StyleClass);
    fn set_enabled(&mut self, element: Element, enabled: bool);

    /// Creates the notification node off-screen. The entry's motion carries
    /// the transition presets to animate with.
    fn mount_notification(&mut self, id: NotificationId, entry: &NotificationEntry);
    fn unmount_notification(&mut self, id: NotificationId);
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SurfaceOp {
    SetText(Element, String),
    SetClass(Element, StyleClass),
    SetEnabled(Element, bool),
    Mount(NotificationId),
    Unmount(NotificationId),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MountedNotification {
    pub message: String,
    pub kind: NotificationKind,
    pub closable: bool,
    pub enter: TransitionPreset,
    pub exit: TransitionPreset,
}

#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    texts: BTreeMap<Element, String>,
    classes: BTreeMap<Element, StyleClass>,
    disabled: BTreeMap<Element, bool>,
    mounted: BTreeMap<NotificationId, MountedNotification>,
    ops: Vec<SurfaceOp>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, element: Element) -> &str {
        self.texts.get(&element).map(String::as_str).unwrap_or("")
    }

    pub fn class(&self, element: Element) -> Option<StyleClass> {
        self.classes.get(&element).copied()
    }

    pub fn is_enabled(&self, element: Element) -> bool {
        !self.disabled.get(&element).copied().unwrap_or(false)
    }

    pub fn mounted(&self) -> Vec<(NotificationId, MountedNotification)> {
        self.mounted
            .iter()
            .map(|(id, node)| (*id, node.clone()))
            .collect()
    }

    /// Field error slots currently showing text.
    pub fn visible_errors(&self) -> Vec<(FieldKey, String)> {
        self.texts
            .iter()
            .filter_map(|(element, text)| match element {
                Element::FieldError(key) if !text.is_empty() => Some((*key, text.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn unmount_count(&self, id: NotificationId) -> usize {
        self.ops
            .iter()
            .filter(|op| **op == SurfaceOp::Unmount(id))
            .count()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl PresentationPort for MemorySurface {
    fn set_text(&mut self, element: Element, text: &str) {
        self.texts.insert(element, text.to_string());
        self.ops.push(SurfaceOp::SetText(element, text.to_string()));
    }

    fn set_class(&mut self, element: Element, class: StyleClass) {
        self.classes.insert(element, class);
        self.ops.push(SurfaceOp::SetClass(element, class));
    }

    fn set_enabled(&mut self, element: Element, enabled: bool) {
        self.disabled.insert(element, !enabled);
        self.ops.push(SurfaceOp::SetEnabled(element, enabled));
    }

    fn mount_notification(&mut self, id: NotificationId, entry: &NotificationEntry) {
        self.mounted.insert(
            id,
            MountedNotification {
                message: entry.message.to_string(),
                kind: entry.kind,
                closable: entry.closable,
                enter: entry.motion.enter_preset(),
                exit: entry.motion.exit_preset(),
            },
        );
        self.classes
            .insert(Element::Notification(id), StyleClass::NotificationOffscreen);
        self.ops.push(SurfaceOp::Mount(id));
    }

    fn unmount_notification(&mut self, id: NotificationId) {
        self.mounted.remove(&id);
        self.classes.remove(&Element::Notification(id));
        self.ops.push(SurfaceOp::Unmount(id));
    }
}
