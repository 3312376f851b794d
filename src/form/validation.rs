use gpui::SharedString;
use log::trace;

use super::controller::{FieldKey, FieldMeta, FormController, SyncFieldValidatorFn, ValidationMode};

pub trait ValidationError: Clone + Send + Sync + 'static {
    fn message(&self) -> SharedString;
}

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;

    /// Every field key of the model, in declaration order.
    fn field_keys() -> &'static [FieldKey];
}

pub trait FieldValidator<T, L, E>: Send + Sync
where
    L: FieldLens<T>,
    E: ValidationError,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E>;
}

impl<T, L, E, F> FieldValidator<T, L, E> for F
where
    L: FieldLens<T>,
    E: ValidationError,
    F: for<'a> Fn(&'a T, &'a L::Value) -> Result<(), E> + Send + Sync,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E> {
        (self)(model, value)
    }
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub fn register_field_validator<L, V>(&mut self, lens: L, validator: V)
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        let key = lens.key();
        let validator = std::sync::Arc::new(validator);
        let wrapped: SyncFieldValidatorFn<T, E> =
            std::sync::Arc::new(move |model: &T| validator.validate(model, lens.get(model)));
        self.validators.entry(key).or_default().push(wrapped);
        self.ensure_meta(key);
    }

    /// Applies an edit. Outside `OnChange` mode an error shown for the old
    /// text is dropped without re-running validation.
    pub fn set<L>(&mut self, lens: L, value: L::Value)
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        lens.set(&mut self.model, value);
        let is_dirty = lens.get(&self.model) != lens.get(&self.initial_model);
        self.ensure_meta(key).dirty = is_dirty;

        if self.options.validate_mode == ValidationMode::OnChange {
            let _ = self.validate_field_by_key(key);
            return;
        }
        if self.options.clear_error_on_edit {
            let meta = self.ensure_meta(key);
            if !meta.errors.is_empty() {
                meta.errors.clear();
                trace!("cleared stale error on `{key}` after edit");
            }
        }
    }

    /// Marks the field as left by the user. Returns whether the field is
    /// currently free of errors.
    pub fn touch<L>(&mut self, lens: L) -> bool
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        self.ensure_meta(key).touched = true;

        if self.options.validate_mode == ValidationMode::OnBlur {
            self.validate_field_by_key(key)
        } else {
            self.field_meta
                .get(&key)
                .is_none_or(|meta| meta.errors.is_empty())
        }
    }

    pub fn validate_field<L>(&mut self, lens: L) -> bool
    where
        L: FieldLens<T>,
    {
        self.validate_field_by_key(lens.key())
    }

    /// Runs every registered validator against the current model, replacing
    /// all stored errors. Failures are returned in model declaration order.
    pub fn validate_form(&mut self) -> Vec<(FieldKey, E)> {
        let mut keys = T::field_keys().to_vec();
        for key in self.validators.keys() {
            if !keys.contains(key) {
                keys.push(*key);
            }
        }

        let mut failures = Vec::new();
        for key in keys {
            let errors = self.run_validators(key);
            failures.extend(errors.iter().cloned().map(|error| (key, error)));
            self.ensure_meta(key).errors = errors;
        }
        failures
    }

    pub fn reset_field<L>(&mut self, lens: L)
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let initial_value = lens.get(&self.initial_model).clone();
        lens.set(&mut self.model, initial_value);
        *self.ensure_meta(key) = FieldMeta::default();
    }

    pub fn clear_field_errors<L>(&mut self, lens: L)
    where
        L: FieldLens<T>,
    {
        if let Some(meta) = self.field_meta.get_mut(&lens.key()) {
            meta.errors.clear();
        }
    }

    pub fn field_meta<L>(&self, lens: L) -> Option<&FieldMeta<E>>
    where
        L: FieldLens<T>,
    {
        self.field_meta.get(&lens.key())
    }

    pub fn get<L>(&self, lens: L) -> &L::Value
    where
        L: FieldLens<T>,
    {
        lens.get(&self.model)
    }

    pub(super) fn validate_field_by_key(&mut self, key: FieldKey) -> bool {
        let errors = self.run_validators(key);
        let is_valid = errors.is_empty();
        self.ensure_meta(key).errors = errors;
        is_valid
    }

    fn run_validators(&self, key: FieldKey) -> Vec<E> {
        let mut errors = Vec::new();
        let Some(validators) = self.validators.get(&key) else {
            return errors;
        };
        for validator in validators {
            if let Err(error) = validator(&self.model) {
                errors.push(error);
                if self.options.validate_first_error_only {
                    break;
                }
            }
        }
        errors
    }
}
