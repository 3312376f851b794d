mod binding;
mod contact;
mod controller;
mod rules;
mod validation;


pub use contact::{
    ContactController, ContactForm, ContactFormEmailLens, ContactFormFields,
    ContactFormMessageLens, ContactFormNameLens, contact_controller,
};
pub use controller::{
    FieldKey, FieldMeta, FormController, FormError, FormOptions, FormResult, FormSnapshot,
    SubmitAttempt, SubmitState, SubmitTicket, ValidationMode,
};
pub use foliokit_form_derive::FormModel;
pub use rules::{
    ContactError, ContactField, FieldValidationError, MESSAGE_MIN_CHARS, NAME_MIN_CHARS,
    validate, validate_email, validate_message, validate_name,
};
pub use validation::{FieldLens, FieldValidator, FormModel, ValidationError};
