pub use crate::application::{ContactPage, PageEffect, PageEvent, PageOptions};
pub use crate::feedback::{
    NotificationEntry, NotificationId, NotificationKind, NotificationManager, NotificationPhase,
};
pub use crate::form::{
    ContactError, ContactField, ContactForm, FieldValidationError, FormError, FormOptions,
    FormResult, SubmitState, ValidationMode,
};
pub use crate::motion::{MotionConfig, MotionLevel};
pub use crate::submission::{
    ContactTransport, Delivery, FieldState, SimulatedTransport, SubmissionError,
    SubmissionOptions,
};
pub use crate::surface::{Element, MemorySurface, PresentationPort, StyleClass};
pub use crate::timer::{DelayTimers, ManualTimers, TimerHost};
