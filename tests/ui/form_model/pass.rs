use foliokit::form::{FieldLens, FormModel};

#[derive(Clone, foliokit::form::FormModel)]
struct EnquiryForm {
    subject: String,
    #[form(key = "is-urgent")]
    urgent: bool,
}

fn main() {
    let fields = EnquiryForm::fields();
    let lens = fields.subject();
    let mut model = EnquiryForm {
        subject: "Hello".to_string(),
        urgent: false,
    };
    lens.set(&mut model, "Commission".to_string());
    fields.urgent().set(&mut model, true);

    assert_eq!(lens.key().as_str(), "subject");
    assert_eq!(lens.get(&model), "Commission");
    assert!(model.urgent);
    assert_eq!(EnquiryFormFields::URGENT.as_str(), "is-urgent");
    assert_eq!(EnquiryForm::field_keys(), EnquiryFormFields::KEYS);
    assert_eq!(EnquiryForm::field_keys()[1].as_str(), "is-urgent");
}
