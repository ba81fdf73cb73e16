//! Compiled-in HTML templates.

use std::fmt::Write;

use serde_json::Value;

use super::RenderError;
use super::html::escape_html;
use crate::controller::SUMMARY_TEMPLATE;

fn text(v: &Value) -> String {
    match v {
        Value::String(s) => escape_html(s),
        Value::Null => String::new(),
        other => escape_html(&other.to_string()),
    }
}

/// Minor units to "12.34".
fn money(v: &Value) -> String {
    let minor = v.as_u64().unwrap_or(0);
    format!("{}.{:02}", minor / 100, minor % 100)
}

fn template_error(e: std::fmt::Error) -> RenderError {
    RenderError::Template {
        template: SUMMARY_TEMPLATE.to_string(),
        message: e.to_string(),
    }
}

/// `cart/summary.html`: flashes, form errors, one row per line with its quantity
/// input, totals, and the clear action.
pub fn cart_summary(ctx: &Value) -> Result<String, RenderError> {
    let cart = &ctx["cart"];
    let form = &ctx["form"];
    let links = &ctx["links"];
    let empty = Vec::new();
    let items = cart["items"].as_array().unwrap_or(&empty);
    let fields = form["fields"].as_array().unwrap_or(&empty);

    let mut out = String::new();
    write_summary(&mut out, ctx, cart, form, links, items, fields).map_err(template_error)?;
    Ok(out)
}

fn write_summary(
    out: &mut String,
    ctx: &Value,
    cart: &Value,
    form: &Value,
    links: &Value,
    items: &[Value],
    fields: &[Value],
) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html><head><meta charset=\"utf-8\"><title>Your cart</title></head><body>")?;
    writeln!(out, "<h1>Your cart</h1>")?;

    if let Some(flashes) = ctx["flashes"].as_array() {
        for flash in flashes {
            writeln!(
                out,
                "<div class=\"flash flash-{}\">{}</div>",
                text(&flash["kind"]),
                text(&flash["message"])
            )?;
        }
    }

    if let Some(errors) = form["errors"].as_array() {
        for error in errors {
            writeln!(out, "<div class=\"form-error\">{}</div>", text(error))?;
        }
    }

    if items.is_empty() {
        writeln!(out, "<p class=\"cart-empty\">Your cart is empty.</p>")?;
    } else {
        writeln!(out, "<form method=\"post\" action=\"{}\">", text(&links["summary"]))?;
        writeln!(out, "<table class=\"cart-items\">")?;
        writeln!(
            out,
            "<thead><tr><th>Item</th><th>Unit price</th><th>Quantity</th><th>Total</th></tr></thead><tbody>"
        )?;

        for item in items {
            let field = fields.iter().find(|f| f["item_id"] == item["id"]);
            let (name, value) = match field {
                Some(f) => (text(&f["name"]), text(&f["value"])),
                None => (String::new(), text(&item["quantity"])),
            };

            writeln!(
                out,
                "<tr data-sku=\"{}\"><td>{}</td><td>{}</td><td><input type=\"number\" min=\"1\" name=\"{}\" value=\"{}\">",
                text(&item["sku"]),
                text(&item["name"]),
                money(&item["unit_price"]),
                name,
                value
            )?;
            if let Some(errors) = field.and_then(|f| f["errors"].as_array()) {
                for error in errors {
                    writeln!(out, "<span class=\"field-error\">{}</span>", text(error))?;
                }
            }
            writeln!(out, "</td><td>{}</td></tr>", money(&item["total"]))?;
        }

        writeln!(out, "</tbody></table>")?;
        writeln!(
            out,
            "<p class=\"cart-totals\">Items: <span class=\"total-items\">{}</span> Total: <span class=\"total\">{}</span></p>",
            text(&cart["total_items"]),
            money(&cart["total"])
        )?;
        writeln!(out, "<button type=\"submit\">Update cart</button>")?;
        writeln!(out, "</form>")?;
    }

    writeln!(
        out,
        "<form method=\"post\" action=\"{}\"><button type=\"submit\">Clear cart</button></form>",
        text(&links["clear"])
    )?;
    writeln!(out, "</body></html>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> Value {
        json!({
            "cart": {
                "id": "c1",
                "items": [
                    {"id": "i1", "sku": "mug", "name": "Mug <XL>", "quantity": 2, "unit_price": 450, "total": 900}
                ],
                "total_items": 2,
                "total": 900
            },
            "form": {
                "name": "cart",
                "submitted": true,
                "valid": false,
                "errors": [],
                "fields": [
                    {"name": "items[i1][quantity]", "item_id": "i1", "value": "x", "errors": ["This value is not valid."]}
                ]
            },
            "links": {"summary": "/cart", "clear": "/cart/clear"},
            "flashes": [{"kind": "success", "message": "Your cart has been updated."}]
        })
    }

    #[test]
    fn renders_lines_totals_and_escaped_names() {
        let html = cart_summary(&context()).unwrap();

        assert!(html.contains("Mug &lt;XL&gt;"));
        assert!(html.contains("name=\"items[i1][quantity]\" value=\"x\""));
        assert!(html.contains("<span class=\"total\">9.00</span>"));
        assert!(html.contains("<span class=\"field-error\">This value is not valid.</span>"));
        assert!(html.contains("flash-success"));
        assert!(html.contains("action=\"/cart/clear\""));
    }

    #[test]
    fn empty_cart_has_no_quantity_form() {
        let html = cart_summary(&json!({
            "cart": {"items": [], "total_items": 0, "total": 0},
            "form": {"fields": [], "errors": []},
            "links": {"summary": "/cart", "clear": "/cart/clear"}
        }))
        .unwrap();

        assert!(html.contains("Your cart is empty."));
        assert!(!html.contains("Update cart"));
    }

    #[test]
    fn money_pads_minor_units() {
        assert_eq!(money(&json!(5)), "0.05");
        assert_eq!(money(&json!(123456)), "1234.56");
    }
}
