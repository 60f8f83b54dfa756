//! Money Formatting
//!
//! Renders minor currency units with the document locale via
//! `Intl.NumberFormat`, falling back to fixed two-decimal formatting when
//! the locale or currency code is rejected.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

pub fn format_money(minor_units: i64, currency: &str) -> String {
    intl_format(minor_units, currency).unwrap_or_else(|| fallback_format(minor_units, currency))
}

/// `"12.34 USD"`-style formatting, always available
pub fn fallback_format(minor_units: i64, currency: &str) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    format!("{sign}{}.{:02} {currency}", abs / 100, abs % 100)
}

fn intl_format(minor_units: i64, currency: &str) -> Option<String> {
    let window = web_sys::window()?;
    let locale = document_locale(&window);

    // Reflect keeps a rejected locale or currency code as a catchable Err
    // instead of an abort.
    let intl = Reflect::get(&window, &JsValue::from_str("Intl")).ok()?;
    let ctor: Function = Reflect::get(&intl, &JsValue::from_str("NumberFormat"))
        .ok()?
        .dyn_into()
        .ok()?;
    let options = Object::new();
    Reflect::set(
        &options,
        &JsValue::from_str("style"),
        &JsValue::from_str("currency"),
    )
    .ok()?;
    Reflect::set(
        &options,
        &JsValue::from_str("currency"),
        &JsValue::from_str(currency),
    )
    .ok()?;
    let args = Array::of2(&JsValue::from_str(&locale), &options);
    let formatter = Reflect::construct(&ctor, &args).ok()?;
    let format: Function = Reflect::get(&formatter, &JsValue::from_str("format"))
        .ok()?
        .dyn_into()
        .ok()?;
    format
        .call1(&formatter, &JsValue::from_f64(minor_units as f64 / 100.0))
        .ok()?
        .as_string()
}

fn document_locale(window: &web_sys::Window) -> String {
    window
        .document()
        .and_then(|doc| doc.document_element())
        .and_then(|root| root.get_attribute("lang"))
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| "en".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_format() {
        assert_eq!(fallback_format(123_456, "USD"), "1234.56 USD");
        assert_eq!(fallback_format(1998, "EUR"), "19.98 EUR");
    }

    #[test]
    fn test_fallback_format_small_amounts() {
        assert_eq!(fallback_format(5, "JPY"), "0.05 JPY");
        assert_eq!(fallback_format(0, "USD"), "0.00 USD");
    }

    #[test]
    fn test_fallback_format_negative() {
        assert_eq!(fallback_format(-95, "GBP"), "-0.95 GBP");
    }
}
