use gpui::SharedString;

use super::controller::{FieldKey, FormController};
use super::validation::{FieldLens, FormModel, ValidationError};
use crate::surface::{Element, PresentationPort, StyleClass};

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub fn field_error_for_display<L>(&self, lens: L) -> Option<SharedString>
    where
        L: FieldLens<T>,
    {
        self.display_error_message(lens.key())
    }

    /// Writes the field's error slot and border indicator.
    pub fn present_field_by_key(&self, key: FieldKey, port: &mut dyn PresentationPort) {
        match self.display_error_message(key) {
            Some(message) => {
                port.set_text(Element::FieldError(key), &message);
                port.set_class(Element::FieldInput(key), StyleClass::FieldInvalid);
            }
            None => {
                port.set_text(Element::FieldError(key), "");
                port.set_class(Element::FieldInput(key), StyleClass::FieldNormal);
            }
        }
    }

    pub fn present_field<L>(&self, lens: L, port: &mut dyn PresentationPort)
    where
        L: FieldLens<T>,
    {
        self.present_field_by_key(lens.key(), port);
    }

    pub fn present_all_fields(&self, port: &mut dyn PresentationPort) {
        for key in self.field_meta.keys() {
            self.present_field_by_key(*key, port);
        }
    }

    /// Mirrors a text field's model value into its input element.
    pub fn present_text_value<L>(&self, lens: L, port: &mut dyn PresentationPort)
    where
        L: FieldLens<T, Value = SharedString>,
    {
        port.set_text(Element::FieldInput(lens.key()), lens.get(&self.model));
    }

    fn display_error_message(&self, key: FieldKey) -> Option<SharedString> {
        let meta = self.field_meta.get(&key)?;
        if !meta.touched && self.submit_count == 0 {
            return None;
        }
        meta.errors.first().map(ValidationError::message)
    }
}
