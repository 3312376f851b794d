use gpui::SharedString;

use super::controller::{FormController, FormOptions};
use super::rules::{ContactError, validate_email, validate_message, validate_name};
use super::validation::FormModel;

/// The three fields of the portfolio contact form, as raw user text.
#[derive(Clone, Debug, Default, Eq, PartialEq, foliokit_form_derive::FormModel)]
pub struct ContactForm {
    pub name: SharedString,
    pub email: SharedString,
    pub message: SharedString,
}

pub type ContactController = FormController<ContactForm, ContactError>;

/// Builds a controller over an empty contact form with one rule per field.
pub fn contact_controller(options: FormOptions) -> ContactController {
    let fields = ContactForm::fields();
    let mut controller = FormController::new(ContactForm::default(), options);
    controller.register_field_validator(
        fields.name(),
        |_model: &ContactForm, value: &SharedString| validate_name(value).map_or(Ok(()), Err),
    );
    controller.register_field_validator(
        fields.email(),
        |_model: &ContactForm, value: &SharedString| validate_email(value).map_or(Ok(()), Err),
    );
    controller.register_field_validator(
        fields.message(),
        |_model: &ContactForm, value: &SharedString| {
            validate_message(value).map_or(Ok(()), Err)
        },
    );
    controller
}
