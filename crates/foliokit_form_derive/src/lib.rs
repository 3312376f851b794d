use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, LitStr, Type, parse_macro_input};

/// Derives `foliokit::form::FormModel` for a struct with named fields.
///
/// Each field gets a lens type `<Model><Field>Lens` and an associated
/// `FieldKey` constant on `<Model>Fields` (`NAME` for `name`). The key is the
/// field name unless overridden with `#[form(key = "...")]`; it is what the
/// presentation port addresses the field's input and error slot by, so keys
/// must be unique within a model.
#[proc_macro_derive(FormModel, attributes(form))]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

struct FieldSpec {
    ident: Ident,
    ty: Type,
    key: LitStr,
    key_const: Ident,
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "FormModel derive supports only non-generic structs",
        ));
    }

    let model = input.ident;
    let specs = field_specs(input.data)?;
    let foliokit = foliokit_path();
    let fields_struct = format_ident!("{model}Fields");

    let mut key_consts = Vec::new();
    let mut accessors = Vec::new();
    let mut lenses = Vec::new();
    let mut key_names = Vec::new();

    for FieldSpec {
        ident,
        ty,
        key,
        key_const,
    } in &specs
    {
        let lens = format_ident!("{model}{}Lens", to_pascal_case(&unraw(ident)));

        key_consts.push(quote! {
            pub const #key_const: #foliokit::form::FieldKey = #foliokit::form::FieldKey::new(#key);
        });
        key_names.push(key_const);
        accessors.push(quote! {
            pub const fn #ident(&self) -> #lens {
                #lens
            }
        });
        lenses.push(quote! {
            #[derive(Clone, Copy, Debug, Default)]
            pub struct #lens;

            impl #foliokit::form::FieldLens<#model> for #lens {
                type Value = #ty;

                fn key(self) -> #foliokit::form::FieldKey {
                    #fields_struct::#key_const
                }

                fn get<'a>(self, model: &'a #model) -> &'a Self::Value {
                    &model.#ident
                }

                fn set(self, model: &mut #model, value: Self::Value) {
                    model.#ident = value;
                }
            }
        });
    }

    Ok(quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #fields_struct;

        impl #fields_struct {
            #(#key_consts)*

            /// Every field key, in declaration order.
            pub const KEYS: &'static [#foliokit::form::FieldKey] = &[#(Self::#key_names),*];

            #(#accessors)*
        }

        impl #foliokit::form::FormModel for #model {
            type Fields = #fields_struct;

            fn fields() -> Self::Fields {
                #fields_struct
            }

            fn field_keys() -> &'static [#foliokit::form::FieldKey] {
                #fields_struct::KEYS
            }
        }

        #(#lenses)*
    })
}

fn field_specs(data: Data) -> syn::Result<Vec<FieldSpec>> {
    let named = match data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return Err(syn::Error::new(
                    Span::call_site(),
                    "FormModel derive requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                Span::call_site(),
                "FormModel derive is only supported on structs",
            ));
        }
    };

    let mut specs: Vec<FieldSpec> = Vec::new();
    for field in named {
        let Some(ident) = field.ident else {
            continue;
        };
        let mut key = LitStr::new(&unraw(&ident), ident.span());
        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("form")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    key = meta.value()?.parse()?;
                    Ok(())
                } else {
                    Err(meta.error("unsupported form attribute, expected `key`"))
                }
            })?;
        }
        if key.value().is_empty() {
            return Err(syn::Error::new_spanned(&key, "field key must not be empty"));
        }
        if specs.iter().any(|spec| spec.key.value() == key.value()) {
            return Err(syn::Error::new_spanned(
                &key,
                format!("duplicate field key `{}`", key.value()),
            ));
        }
        let key_const = format_ident!("{}", unraw(&ident).to_ascii_uppercase());
        if key_const == "KEYS" || specs.iter().any(|spec| spec.key_const == key_const) {
            return Err(syn::Error::new_spanned(
                &ident,
                format!("field name clashes with generated constant `{key_const}`"),
            ));
        }
        specs.push(FieldSpec {
            ident,
            ty: field.ty,
            key,
            key_const,
        });
    }
    Ok(specs)
}

fn foliokit_path() -> TokenStream2 {
    match crate_name("foliokit") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::foliokit),
    }
}

fn unraw(ident: &Ident) -> String {
    ident.to_string().trim_start_matches("r#").to_string()
}

fn to_pascal_case(input: &str) -> String {
    input
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + chars.as_str()
            })
        })
        .collect()
}
