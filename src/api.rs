//! Cart API Client
//!
//! Frontend bindings to the storefront cart endpoints. Each call issues the
//! request exactly once and never retries; failures go back to the caller.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::models::{AddLine, AddPayload, CartSnapshot, ChangePayload};

pub const ADD_URL: &str = "/cart/add.js";
pub const CHANGE_URL: &str = "/cart/change.js";
pub const CART_URL: &str = "/cart.js";

/// Failure taxonomy for cart operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    /// Request rejected or non-OK status
    #[error("cart request failed: {0}")]
    Network(String),
    /// 200 response carrying a platform error payload
    #[error("cart API rejected the request: {0}")]
    Logical(String),
    /// Caught before any network call
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Required browser context is missing
    #[error("document is not available")]
    MissingDocument,
}

// ========================
// Endpoint Calls
// ========================

/// `POST /cart/add.js`. The platform answers with the added lines only, so
/// callers follow up with [`fetch_cart`] for the authoritative snapshot.
pub async fn add_lines(payload: &AddPayload) -> Result<(), CartError> {
    validate_lines(&payload.items)?;
    let body =
        serde_json::to_string(payload).map_err(|e| CartError::InvalidArgument(e.to_string()))?;
    send_json(ADD_URL, "POST", Some(body)).await?;
    Ok(())
}

/// `POST /cart/change.js`. Quantity 0 removes the line. The platform
/// answers with the full updated cart.
pub async fn change_line(key: &str, quantity: u32) -> Result<CartSnapshot, CartError> {
    if key.is_empty() {
        return Err(CartError::InvalidArgument("line key is required".into()));
    }
    let body = serde_json::to_string(&ChangePayload { id: key, quantity })
        .map_err(|e| CartError::InvalidArgument(e.to_string()))?;
    let value = send_json(CHANGE_URL, "POST", Some(body)).await?;
    decode_snapshot(value)
}

/// `GET /cart.js`
pub async fn fetch_cart() -> Result<CartSnapshot, CartError> {
    let value = send_json(CART_URL, "GET", None).await?;
    decode_snapshot(value)
}

// ========================
// Request Plumbing
// ========================

fn validate_lines(lines: &[AddLine]) -> Result<(), CartError> {
    if lines.is_empty() || lines.iter().any(|line| line.id == 0) {
        return Err(CartError::InvalidArgument("variant id is required".into()));
    }
    Ok(())
}

async fn send_json(
    url: &str,
    method: &str,
    body: Option<String>,
) -> Result<serde_json::Value, CartError> {
    let window = web_sys::window().ok_or(CartError::MissingDocument)?;

    let init = RequestInit::new();
    init.set_method(method);
    if let Some(body) = &body {
        init.set_body(&JsValue::from_str(body));
    }
    let request = Request::new_with_str_and_init(url, &init)
        .map_err(|e| CartError::Network(js_message(&e)))?;
    let headers = request.headers();
    let _ = headers.set("Accept", "application/json");
    if body.is_some() {
        let _ = headers.set("Content-Type", "application/json");
    }

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| CartError::Network(js_message(&e)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| CartError::Network("fetch returned a non-Response value".into()))?;
    let ok = response.ok();
    let status = response.status();

    let json_promise = response
        .json()
        .map_err(|e| CartError::Network(js_message(&e)))?;
    let json = match JsFuture::from(json_promise).await {
        Ok(json) => json,
        Err(_) if !ok => return Err(CartError::Network(format!("HTTP {status}"))),
        Err(_) => return Err(CartError::Logical("response body was not JSON".into())),
    };
    let value: serde_json::Value =
        serde_wasm_bindgen::from_value(json).map_err(|e| CartError::Logical(e.to_string()))?;
    classify(ok, status, &value)?;
    Ok(value)
}

/// Decide whether a decoded cart endpoint payload is a success.
///
/// HTTP status alone is not trusted: the platform can answer 200 with an
/// error payload. Cart payloads always carry `items`.
fn classify(ok: bool, status: u16, payload: &serde_json::Value) -> Result<(), CartError> {
    let error_text = payload
        .get("description")
        .and_then(|v| v.as_str())
        .or_else(|| payload.get("message").and_then(|v| v.as_str()))
        .map(str::to_owned);
    if !ok {
        return Err(CartError::Network(match error_text {
            Some(text) => format!("HTTP {status}: {text}"),
            None => format!("HTTP {status}"),
        }));
    }
    if payload.get("items").is_none() {
        if let Some(text) = error_text {
            return Err(CartError::Logical(text));
        }
        if payload.get("status").is_some() {
            return Err(CartError::Logical(format!(
                "HTTP {status} carried an error payload"
            )));
        }
    }
    Ok(())
}

fn decode_snapshot(value: serde_json::Value) -> Result<CartSnapshot, CartError> {
    serde_json::from_value(value)
        .map_err(|e| CartError::Logical(format!("malformed cart payload: {e}")))
}

fn js_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .unwrap_or_else(|| "unknown error".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_with_error_payload_is_logical_failure() {
        let payload = json!({
            "status": 422,
            "message": "Cart Error",
            "description": "All 1 Mug are in your cart."
        });
        let result = classify(true, 200, &payload);
        assert_eq!(
            result,
            Err(CartError::Logical("All 1 Mug are in your cart.".into()))
        );
    }

    #[test]
    fn test_non_ok_status_is_network_failure() {
        let payload = json!({ "message": "Too Many Requests" });
        let result = classify(false, 429, &payload);
        assert_eq!(
            result,
            Err(CartError::Network("HTTP 429: Too Many Requests".into()))
        );
    }

    #[test]
    fn test_cart_payload_is_success() {
        let payload = json!({
            "item_count": 2,
            "total_price": 1998,
            "currency": "USD",
            "items": []
        });
        assert_eq!(classify(true, 200, &payload), Ok(()));
    }

    #[test]
    fn test_added_lines_payload_is_success() {
        let payload = json!({ "items": [{ "key": "a:1", "id": 42, "quantity": 1 }] });
        assert_eq!(classify(true, 200, &payload), Ok(()));
    }

    #[test]
    fn test_decode_snapshot() {
        let snapshot = decode_snapshot(json!({
            "item_count": 1,
            "total_price": 999,
            "currency": "EUR",
            "items": [{
                "key": "40000000:abc",
                "id": 40_000_000u64,
                "quantity": 1,
                "title": "Enamel Mug",
                "line_price": 999
            }]
        }))
        .expect("decode failed");
        assert_eq!(snapshot.item_count, 1);
        assert_eq!(snapshot.items[0].key, "40000000:abc");
        assert_eq!(snapshot.items[0].image, None);
    }

    #[test]
    fn test_missing_variant_id_caught_before_network() {
        assert!(matches!(
            validate_lines(&[]),
            Err(CartError::InvalidArgument(_))
        ));
        assert!(matches!(
            validate_lines(&[AddLine { id: 0, quantity: 1 }]),
            Err(CartError::InvalidArgument(_))
        ));
        assert_eq!(validate_lines(&[AddLine { id: 7, quantity: 1 }]), Ok(()));
    }
}
