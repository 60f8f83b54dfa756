//! Quantity Input Component
//!
//! Bounded integer stepper for cart quantities.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Clamp raw input to the stepper bounds
fn clamp_quantity(raw: i64, min: u32, max: u32) -> u32 {
    if raw < min as i64 {
        min
    } else if raw > max as i64 {
        max
    } else {
        raw as u32
    }
}

/// Bounded stepper. Stepping past a bound is a no-op; direct input is
/// clamped on change. Every accepted change runs `on_change`.
#[component]
pub fn QuantityInput(
    value: u32,
    #[prop(default = 0)] min: u32,
    #[prop(default = 99)] max: u32,
    #[prop(into)] on_change: Callback<u32>,
) -> impl IntoView {
    let (quantity, set_quantity) = signal(clamp_quantity(value as i64, min, max));

    let accept = move |next: u32| {
        if next != quantity.get_untracked() {
            set_quantity.set(next);
            on_change.run(next);
        }
    };

    let on_decrement = move |_| {
        let current = quantity.get();
        if current > min {
            accept(current - 1);
        }
    };
    let on_increment = move |_| {
        let current = quantity.get();
        if current < max {
            accept(current + 1);
        }
    };
    let on_input_change = move |ev: web_sys::Event| {
        let Some(target) = ev.target() else { return };
        let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() else {
            return;
        };
        // Non-numeric input falls to the lower bound
        let raw = input.value().trim().parse::<i64>().unwrap_or(min as i64);
        let next = clamp_quantity(raw, min, max);
        // Rewrite the field even when the clamped value equals the current
        // one, so out-of-range text never sticks around
        input.set_value(&next.to_string());
        accept(next);
    };

    view! {
        <div class="quantity">
            <button type="button" class="quantity__button" aria-label="Decrease quantity" on:click=on_decrement>
                "−"
            </button>
            <input
                class="quantity__input"
                type="number"
                inputmode="numeric"
                min=min
                max=max
                prop:value=move || quantity.get().to_string()
                on:change=on_input_change
            />
            <button type="button" class="quantity__button" aria-label="Increase quantity" on:click=on_increment>
                "+"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_in_range_passthrough() {
        assert_eq!(clamp_quantity(5, 1, 10), 5);
        assert_eq!(clamp_quantity(1, 1, 10), 1);
        assert_eq!(clamp_quantity(10, 1, 10), 10);
    }

    #[test]
    fn test_clamp_out_of_range() {
        assert_eq!(clamp_quantity(0, 1, 10), 1);
        assert_eq!(clamp_quantity(9_999, 1, 10), 10);
        assert_eq!(clamp_quantity(-42, 0, 99), 0);
        assert_eq!(clamp_quantity(i64::MAX, 0, 99), 99);
        assert_eq!(clamp_quantity(i64::MIN, 0, 99), 0);
    }
}
