//! Cart Badge Component
//!
//! Cart count bubble. Subscribes to cart notices, persists the rendered
//! count to session storage and re-validates it when the page comes back
//! from the back/forward cache.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::context::use_cart_service;
use crate::models::{CartNotice, NoticeSource, StoredBadge};

const STORAGE_KEY: &str = "shopfront:cart-count";
/// Root element id; registered as the fly-to-cart landing target
const BADGE_ID: &str = "cart-icon";
/// Restored counts older than this are not trusted over the page render
const FRESHNESS_MS: f64 = 10_000.0;
/// Counts at or above this render as an indicator without a numeral
const MAX_NUMERAL: u32 = 100;
const BUMP_MS: u32 = 500;

/// What the badge does with an incoming notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BadgeUpdate {
    Add(u32),
    Replace(u32),
    Refetch,
}

fn plan_update(notice: &CartNotice) -> BadgeUpdate {
    match (notice.item_count, notice.source) {
        // Product forms report the quantity they added, on top of whatever
        // is already displayed
        (Some(added), NoticeSource::ProductForm) => BadgeUpdate::Add(added),
        (Some(total), _) => BadgeUpdate::Replace(total),
        (None, _) => BadgeUpdate::Refetch,
    }
}

/// Count to silently re-render after a cache restore, if any
fn plan_restore(stored: Option<StoredBadge>, rendered: u32, now: f64) -> Option<u32> {
    let stored = stored?;
    if stored.count == rendered {
        return None;
    }
    if now - stored.saved_at > FRESHNESS_MS {
        // Stale; the fresh page render wins
        return None;
    }
    Some(stored.count)
}

#[component]
pub fn CartBadge() -> impl IntoView {
    let service = use_cart_service();
    let (count, set_count) = signal(0u32);
    let (animating, set_animating) = signal(false);
    let saw_notice = StoredValue::new(false);

    let apply = move |next: u32, animate: bool| {
        set_count.set(next);
        if animate {
            set_animating.set(true);
            Timeout::new(BUMP_MS, move || set_animating.set(false)).forget();
        }
    };

    // Register as the fly-to-cart destination
    Effect::new(move |_| {
        service.set_fly_target(Some(format!("#{BADGE_ID}")));
    });

    // Initial count; skipped when a mutation already reported one
    Effect::new(move |_| {
        spawn_local(async move {
            match service.refresh().await {
                Ok(snapshot) => {
                    if !saw_notice.get_value() {
                        apply(snapshot.item_count, false);
                    }
                }
                Err(error) => {
                    web_sys::console::log_1(
                        &format!("[BADGE] initial cart read failed: {error}").into(),
                    );
                }
            }
        });
    });

    // Notices from the service and the fetch watcher
    Effect::new(move |_| {
        let Some(notice) = service.notice.get() else {
            return;
        };
        saw_notice.set_value(true);
        match plan_update(&notice) {
            BadgeUpdate::Add(added) => apply(count.get_untracked().saturating_add(added), true),
            BadgeUpdate::Replace(total) => apply(total, true),
            BadgeUpdate::Refetch => spawn_local(async move {
                match service.refresh().await {
                    Ok(snapshot) => apply(snapshot.item_count, true),
                    Err(error) => {
                        web_sys::console::log_1(
                            &format!("[BADGE] cart re-read failed: {error}").into(),
                        );
                    }
                }
            }),
        }
    });

    // Persist after every render so a restored page can re-validate
    Effect::new(move |_| {
        persist(count.get());
    });

    // Back/forward cache restore: silently correct a fresh mismatch
    Effect::new(move |_| {
        let Some(window) = web_sys::window() else {
            return;
        };
        let listener = Closure::<dyn FnMut(web_sys::PageTransitionEvent)>::new(
            move |ev: web_sys::PageTransitionEvent| {
                if !ev.persisted() {
                    return;
                }
                if let Some(correct) =
                    plan_restore(read_stored(), count.get_untracked(), js_sys::Date::now())
                {
                    apply(correct, false);
                }
            },
        );
        let _ = window
            .add_event_listener_with_callback("pageshow", listener.as_ref().unchecked_ref());
        listener.forget();
    });

    let bubble_class = move || {
        let mut class = String::from("cart-badge__bubble");
        if count.get() == 0 {
            class.push_str(" cart-badge__bubble--empty");
        }
        if count.get() >= MAX_NUMERAL {
            class.push_str(" cart-badge__bubble--max");
        }
        if animating.get() {
            class.push_str(" cart-badge__bubble--bump");
        }
        class
    };

    view! {
        <div class="cart-badge" id=BADGE_ID>
            <span
                class=bubble_class
                aria-label=move || format!("{} items in cart", count.get())
            >
                {move || {
                    let n = count.get();
                    if n >= MAX_NUMERAL { String::new() } else { n.to_string() }
                }}
            </span>
        </div>
    }
}

// ========================
// Session Storage
// ========================

fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.session_storage().ok().flatten()
}

fn read_stored() -> Option<StoredBadge> {
    let raw = session_storage()?.get_item(STORAGE_KEY).ok().flatten()?;
    serde_json::from_str(&raw).ok()
}

fn persist(count: u32) {
    let Some(storage) = session_storage() else {
        return;
    };
    let record = StoredBadge {
        count,
        saved_at: js_sys::Date::now(),
    };
    if let Ok(raw) = serde_json::to_string(&record) {
        let _ = storage.set_item(STORAGE_KEY, &raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(item_count: Option<u32>, source: NoticeSource) -> CartNotice {
        CartNotice {
            item_count,
            source,
            did_error: false,
        }
    }

    #[test]
    fn test_product_form_adds_to_displayed_count() {
        let plan = plan_update(&notice(Some(2), NoticeSource::ProductForm));
        assert_eq!(plan, BadgeUpdate::Add(2));
    }

    #[test]
    fn test_other_sources_replace_the_count() {
        assert_eq!(
            plan_update(&notice(Some(7), NoticeSource::Drawer)),
            BadgeUpdate::Replace(7)
        );
        assert_eq!(
            plan_update(&notice(Some(4), NoticeSource::FetchFallback)),
            BadgeUpdate::Replace(4)
        );
    }

    #[test]
    fn test_unknown_count_forces_refetch() {
        assert_eq!(
            plan_update(&notice(None, NoticeSource::ProductForm)),
            BadgeUpdate::Refetch
        );
    }

    #[test]
    fn test_restore_equal_count_is_a_no_op() {
        let stored = StoredBadge { count: 3, saved_at: 1_000.0 };
        assert_eq!(plan_restore(Some(stored), 3, 2_000.0), None);
    }

    #[test]
    fn test_restore_fresh_mismatch_corrects_silently() {
        let stored = StoredBadge { count: 5, saved_at: 1_000.0 };
        assert_eq!(plan_restore(Some(stored), 3, 5_000.0), Some(5));
    }

    #[test]
    fn test_restore_stale_mismatch_keeps_page_render() {
        let stored = StoredBadge { count: 5, saved_at: 1_000.0 };
        assert_eq!(plan_restore(Some(stored), 3, 20_000.0), None);
    }

    #[test]
    fn test_restore_without_record_keeps_page_render() {
        assert_eq!(plan_restore(None, 3, 5_000.0), None);
    }
}
