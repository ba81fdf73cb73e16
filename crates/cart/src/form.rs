//! Cart summary form: one quantity field per cart line.
//!
//! Field names follow the `items[<item-id>][quantity]` convention so a plain
//! url-encoded HTML form posts straight into [`CartForm::bind`].
//!
//! Validation failures never surface as `Err`: they are recorded on the form and
//! shown back to the user through [`FormView`].

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use cartkit_core::{CartItemId, DomainError, DomainResult, Entity};

use crate::model::Cart;

/// Name of the cart summary form type.
pub const CART_FORM: &str = "cart";

/// Highest quantity accepted for a single line.
pub const MAX_QUANTITY: u32 = 9999;

const BLANK: &str = "This value should not be blank.";
const NOT_A_NUMBER: &str = "This value is not valid.";
const EXTRA_FIELDS: &str = "This form should not contain extra fields.";

/// Submitted form data (url-decoded name/value pairs).
pub type FormSubmission = HashMap<String, String>;

/// Builds forms for a given cart.
pub trait FormBinder: Send + Sync {
    fn create_form(&self, form_type: &str, cart: &Cart) -> DomainResult<CartForm>;
}

impl<B> FormBinder for std::sync::Arc<B>
where
    B: FormBinder + ?Sized,
{
    fn create_form(&self, form_type: &str, cart: &Cart) -> DomainResult<CartForm> {
        (**self).create_form(form_type, cart)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CartFormBinder;

impl CartFormBinder {
    pub fn new() -> Self {
        Self
    }
}

impl FormBinder for CartFormBinder {
    fn create_form(&self, form_type: &str, cart: &Cart) -> DomainResult<CartForm> {
        if form_type != CART_FORM {
            return Err(DomainError::validation(format!(
                "unknown form type `{form_type}`"
            )));
        }
        Ok(CartForm::for_cart(cart))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QuantityField {
    item_id: CartItemId,
    name: String,
    value: String,
    parsed: Option<u32>,
    errors: Vec<String>,
}

/// A form bound to one cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartForm {
    fields: Vec<QuantityField>,
    errors: Vec<String>,
    submitted: bool,
}

pub fn quantity_field_name(item_id: &CartItemId) -> String {
    format!("items[{item_id}][quantity]")
}

impl CartForm {
    fn for_cart(cart: &Cart) -> Self {
        let fields = cart
            .items()
            .iter()
            .map(|item| QuantityField {
                item_id: *item.id(),
                name: quantity_field_name(item.id()),
                value: item.quantity().to_string(),
                parsed: Some(item.quantity()),
                errors: Vec::new(),
            })
            .collect();

        Self {
            fields,
            errors: Vec::new(),
            submitted: false,
        }
    }

    /// Bind submitted data and validate it.
    ///
    /// When every rule passes, the quantities are written onto `cart`. Otherwise the
    /// cart is left untouched and the errors stay on the form.
    pub fn bind(&mut self, cart: &mut Cart, submission: &FormSubmission) -> &mut Self {
        self.submitted = true;
        self.errors.clear();

        let known: BTreeSet<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();
        if submission.keys().any(|k| !known.contains(k.as_str())) {
            self.errors.push(EXTRA_FIELDS.to_string());
        }

        for field in &mut self.fields {
            field.errors.clear();
            field.parsed = None;

            let raw = submission.get(&field.name).map(|v| v.trim()).unwrap_or("");
            field.value = raw.to_string();

            if raw.is_empty() {
                field.errors.push(BLANK.to_string());
                continue;
            }

            match raw.parse::<u32>() {
                Err(_) => field.errors.push(NOT_A_NUMBER.to_string()),
                Ok(0) => field.errors.push("This value should be 1 or more.".to_string()),
                Ok(n) if n > MAX_QUANTITY => field
                    .errors
                    .push(format!("This value should be {MAX_QUANTITY} or less.")),
                Ok(n) => field.parsed = Some(n),
            }
        }

        if self.has_errors() {
            return self;
        }

        for field in &self.fields {
            if let (Some(item), Some(quantity)) = (cart.find_item_mut(&field.item_id), field.parsed) {
                item.set_quantity(quantity);
            }
        }

        self
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Submitted and free of errors.
    pub fn is_valid(&self) -> bool {
        self.submitted && !self.has_errors()
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.fields.iter().any(|f| !f.errors.is_empty())
    }

    pub fn view(&self) -> FormView {
        FormView {
            name: CART_FORM.to_string(),
            submitted: self.submitted,
            valid: !self.has_errors(),
            errors: self.errors.clone(),
            fields: self
                .fields
                .iter()
                .map(|f| FieldView {
                    name: f.name.clone(),
                    item_id: f.item_id,
                    value: f.value.clone(),
                    errors: f.errors.clone(),
                })
                .collect(),
        }
    }
}

/// Render-ready snapshot of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub name: String,
    pub submitted: bool,
    /// No errors recorded (an unsubmitted form is valid).
    pub valid: bool,
    pub errors: Vec<String>,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub name: String,
    pub item_id: CartItemId,
    pub value: String,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartkit_core::CartId;
    use chrono::Utc;

    use crate::model::CartItem;

    fn cart_with(quantities: &[u32]) -> Cart {
        let mut cart = Cart::new(CartId::new(), Utc::now());
        for (n, q) in quantities.iter().enumerate() {
            cart.push_item(CartItem::new(CartItemId::new(), format!("sku-{n}"), "Item", *q, 100).unwrap());
        }
        cart.calculate_total();
        cart
    }

    fn submission(cart: &Cart, values: &[&str]) -> FormSubmission {
        cart.items()
            .iter()
            .zip(values)
            .map(|(item, v)| (quantity_field_name(item.id()), v.to_string()))
            .collect()
    }

    #[test]
    fn unknown_form_type_is_rejected() {
        let cart = cart_with(&[]);
        let err = CartFormBinder::new().create_form("checkout", &cart).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn unbound_form_reflects_cart_quantities() {
        let cart = cart_with(&[2, 5]);
        let form = CartFormBinder::new().create_form(CART_FORM, &cart).unwrap();
        let view = form.view();

        assert!(!form.is_submitted());
        assert!(!form.is_valid());
        assert!(view.valid);
        assert_eq!(
            view.fields.iter().map(|f| f.value.as_str()).collect::<Vec<_>>(),
            vec!["2", "5"]
        );
    }

    #[test]
    fn valid_submission_updates_quantities() {
        let mut cart = cart_with(&[1, 1]);
        let data = submission(&cart, &["3", " 4 "]);
        let mut form = CartFormBinder::new().create_form(CART_FORM, &cart).unwrap();

        assert!(form.bind(&mut cart, &data).is_valid());
        assert_eq!(cart.items()[0].quantity(), 3);
        assert_eq!(cart.items()[1].quantity(), 4);
    }

    #[test]
    fn empty_cart_with_empty_submission_is_valid() {
        let mut cart = cart_with(&[]);
        let mut form = CartFormBinder::new().create_form(CART_FORM, &cart).unwrap();

        assert!(form.bind(&mut cart, &FormSubmission::new()).is_valid());
    }

    #[test]
    fn field_rules_are_reported_per_field_and_cart_is_untouched() {
        let mut cart = cart_with(&[1, 1, 1, 1]);
        let before = cart.clone();
        let mut data = submission(&cart, &["abc", "0", "10000"]);
        // fourth item left out entirely
        data.remove(&quantity_field_name(cart.items()[3].id()));
        let mut form = CartFormBinder::new().create_form(CART_FORM, &cart).unwrap();

        let valid = form.bind(&mut cart, &data).is_valid();
        let view = form.view();

        assert!(!valid);
        assert_eq!(cart, before);
        assert_eq!(view.fields[0].errors, vec![NOT_A_NUMBER.to_string()]);
        assert_eq!(view.fields[1].errors, vec!["This value should be 1 or more.".to_string()]);
        assert_eq!(view.fields[2].errors, vec!["This value should be 9999 or less.".to_string()]);
        assert_eq!(view.fields[3].errors, vec![BLANK.to_string()]);
        assert_eq!(view.fields[0].value, "abc");
        assert!(view.errors.is_empty());
    }

    #[test]
    fn extra_fields_invalidate_the_form() {
        let mut cart = cart_with(&[1]);
        let mut data = submission(&cart, &["2"]);
        data.insert(quantity_field_name(&CartItemId::new()), "1".to_string());
        let mut form = CartFormBinder::new().create_form(CART_FORM, &cart).unwrap();

        assert!(!form.bind(&mut cart, &data).is_valid());
        assert_eq!(form.view().errors, vec![EXTRA_FIELDS.to_string()]);
        assert_eq!(cart.items()[0].quantity(), 1);
    }

    #[test]
    fn view_serialises_for_the_render_context() {
        let mut cart = cart_with(&[2]);
        let id = *cart.items()[0].id();
        let data = submission(&cart, &[""]);
        let mut form = CartFormBinder::new().create_form(CART_FORM, &cart).unwrap();
        form.bind(&mut cart, &data);

        let value = serde_json::to_value(form.view()).unwrap();

        assert_eq!(value["name"], "cart");
        assert_eq!(value["submitted"], true);
        assert_eq!(value["valid"], false);
        assert_eq!(value["fields"][0]["name"], quantity_field_name(&id));
        assert_eq!(value["fields"][0]["item_id"], id.to_string());
        assert_eq!(value["fields"][0]["errors"][0], BLANK);
    }
}
