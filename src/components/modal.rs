//! Modal Dialog Component
//!
//! Generic open/close/scroll-lock dialog. The exit transition replays
//! deterministically on every close; the dialog also closes itself on
//! backdrop click, on Escape and when the viewport width leaves the
//! configured range.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Dialog lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Closed,
    Open,
    Closing,
}

const EXIT_FALLBACK_MS: u32 = 300;
const RESIZE_DEBOUNCE_MS: u32 = 150;

/// True when `width` falls outside the configured [min, max] range
fn outside_width_range(width: f64, min_width: Option<f64>, max_width: Option<f64>) -> bool {
    if min_width.is_some_and(|min| width < min) {
        return true;
    }
    max_width.is_some_and(|max| width > max)
}

#[component]
pub fn Modal(
    open: RwSignal<bool>,
    #[prop(optional)] min_width: Option<f64>,
    #[prop(optional)] max_width: Option<f64>,
    children: Children,
) -> impl IntoView {
    let phase = RwSignal::new(Phase::Closed);
    let container_ref = NodeRef::<Div>::new();
    let saved_scroll = StoredValue::new(0.0f64);

    // Reconcile the requested state with the phase machine
    Effect::new(move |_| {
        match (open.get(), phase.get()) {
            (true, Phase::Closed) => {
                if let Some(window) = web_sys::window() {
                    saved_scroll.set_value(window.scroll_y().unwrap_or(0.0));
                }
                set_scroll_lock(true);
                phase.set(Phase::Open);
            }
            (false, Phase::Open) => {
                phase.set(Phase::Closing);
                spawn_local(async move {
                    if let Some(container) = container_ref.get_untracked() {
                        play_exit(&container).await;
                    }
                    set_scroll_lock(false);
                    if let Some(window) = web_sys::window() {
                        window.scroll_to_with_x_and_y(0.0, saved_scroll.get_value());
                    }
                    phase.set(Phase::Closed);
                });
            }
            _ => {}
        }
    });

    // Escape closes
    Effect::new(move |_| {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let listener =
            Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
                if ev.key() == "Escape" && open.get_untracked() {
                    open.set(false);
                }
            });
        let _ = document
            .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
        listener.forget();
    });

    // Leaving the configured viewport range closes, debounced on resize
    Effect::new(move |_| {
        if min_width.is_none() && max_width.is_none() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
        let listener = Closure::<dyn FnMut()>::new({
            let pending = pending.clone();
            move || {
                let check = move || {
                    let Some(window) = web_sys::window() else {
                        return;
                    };
                    let width = window
                        .inner_width()
                        .ok()
                        .and_then(|w| w.as_f64())
                        .unwrap_or(0.0);
                    if open.get_untracked() && outside_width_range(width, min_width, max_width) {
                        open.set(false);
                    }
                };
                // Replacing the pending timeout cancels the previous one
                *pending.borrow_mut() = Some(Timeout::new(RESIZE_DEBOUNCE_MS, check));
            }
        });
        let _ =
            window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
        listener.forget();
    });

    let container_class = move || match phase.get() {
        Phase::Closed => "modal",
        Phase::Open | Phase::Closing => "modal modal--open",
    };

    view! {
        <div
            class=container_class
            node_ref=container_ref
            role="dialog"
            aria-modal="true"
            aria-hidden=move || if phase.get() == Phase::Open { "false" } else { "true" }
            on:click=move |_| {
                if open.get_untracked() {
                    open.set(false);
                }
            }
        >
            <div class="modal__panel" on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()>
                {children()}
            </div>
        </div>
    }
}

async fn play_exit(container: &web_sys::HtmlElement) {
    let classes = container.class_list();
    // Reset then reapply so the exit transition replays even if a previous
    // close was interrupted mid-flight
    let _ = classes.remove_1("modal--closing");
    let _ = container.offset_height();
    let _ = classes.add_1("modal--closing");
    leptos_flyto::transition_settled(container, EXIT_FALLBACK_MS).await;
    let _ = classes.remove_1("modal--closing");
}

fn set_scroll_lock(locked: bool) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    let result = if locked {
        body.class_list().add_1("scroll-locked")
    } else {
        body.class_list().remove_1("scroll-locked")
    };
    let _ = result;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_inside_range() {
        assert!(!outside_width_range(800.0, Some(600.0), Some(1200.0)));
        assert!(!outside_width_range(800.0, None, None));
    }

    #[test]
    fn test_width_outside_range() {
        assert!(outside_width_range(500.0, Some(600.0), Some(1200.0)));
        assert!(outside_width_range(1300.0, Some(600.0), Some(1200.0)));
        assert!(outside_width_range(599.0, Some(600.0), None));
        assert!(outside_width_range(1201.0, None, Some(1200.0)));
    }
}
