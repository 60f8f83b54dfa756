//! Fetch Watch
//!
//! Fallback path for cart mutations issued by code that bypasses the
//! cart service (third-party scripts on the storefront page). Wraps
//! `window.fetch`, and when an outside call hits a cart mutation endpoint,
//! re-reads the snapshot once the call settles. The direct notice path
//! wins: the watcher stays silent whenever a notice lands within the
//! settle window.

use gloo_timers::future::TimeoutFuture;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::context::CartService;
use crate::models::{CartNotice, NoticeSource};

/// How long the direct notification path gets to win
const SETTLE_MS: u32 = 150;

/// Install the fetch wrapper. Idempotent per service; later calls no-op.
pub fn install(service: CartService) {
    if service.watch_installed() {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(original) = Reflect::get(&window, &JsValue::from_str("fetch")) else {
        return;
    };
    let Ok(original) = original.dyn_into::<Function>() else {
        return;
    };

    let this = window.clone();
    let wrapper = Closure::<dyn FnMut(JsValue, JsValue) -> Promise>::new(
        move |input: JsValue, init: JsValue| {
            let promise = match original.call2(&this, &input, &init) {
                Ok(value) => value.unchecked_into::<Promise>(),
                Err(error) => Promise::reject(&error),
            };
            if is_cart_mutation(&request_url(&input)) && !service.has_own_mutation_in_flight() {
                settle_then_refresh(service, promise.clone());
            }
            promise
        },
    );
    if Reflect::set(&window, &JsValue::from_str("fetch"), wrapper.as_ref()).is_ok() {
        service.mark_watch_installed();
        wrapper.forget();
    }
}

fn settle_then_refresh(service: CartService, request: Promise) {
    spawn_local(async move {
        // Outcome of the intercepted call is irrelevant; a rejected add can
        // still have mutated the cart by the time it surfaces.
        let _ = JsFuture::from(request).await;
        let observed_at = js_sys::Date::now();
        TimeoutFuture::new(SETTLE_MS).await;
        if service.last_notice_at() >= observed_at {
            // The direct path already reported this mutation
            return;
        }
        match service.refresh().await {
            Ok(snapshot) => service.notify(CartNotice {
                item_count: Some(snapshot.item_count),
                source: NoticeSource::FetchFallback,
                did_error: false,
            }),
            Err(error) => {
                web_sys::console::log_1(
                    &format!("[CART] fallback refresh failed: {error}").into(),
                );
            }
        }
    });
}

fn request_url(input: &JsValue) -> String {
    if let Some(url) = input.as_string() {
        return url;
    }
    input
        .dyn_ref::<web_sys::Request>()
        .map(|request| request.url())
        .unwrap_or_default()
}

/// Does this URL target a cart mutation endpoint
fn is_cart_mutation(url: &str) -> bool {
    url.contains("/cart/add") || url.contains("/cart/change") || url.contains("/cart/update")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_urls_detected() {
        assert!(is_cart_mutation("/cart/add.js"));
        assert!(is_cart_mutation("https://shop.example/cart/change.js"));
        assert!(is_cart_mutation("/cart/update.js"));
    }

    #[test]
    fn test_reads_and_other_urls_ignored() {
        assert!(!is_cart_mutation("/cart.js"));
        assert!(!is_cart_mutation("/products/mug.js"));
        assert!(!is_cart_mutation("/collections/all"));
    }
}
