//! Product Form Component
//!
//! Add-to-cart form for one product card. This is the "product form"
//! notice source: a successful add flies a ghost to the badge and opens
//! the drawer through the notice path.

use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::QuantityInput;
use crate::context::{use_cart_service, FlyRequest};
use crate::money;

/// One sellable variant shown on the demo grid
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub variant_id: u64,
    pub title: String,
    /// Minor currency units
    pub price: i64,
    pub currency: String,
    pub image: Option<String>,
}

#[component]
pub fn ProductForm(product: Product) -> impl IntoView {
    let service = use_cart_service();
    let (quantity, set_quantity) = signal(1u32);
    let (error, set_error) = signal(None::<String>);
    let (busy, set_busy) = signal(false);
    let media_ref = NodeRef::<Div>::new();

    let variant_id = product.variant_id;
    let image = product.image.clone();
    let price_label = money::format_money(product.price, &product.currency);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        set_error.set(None);
        set_busy.set(true);
        let fly = FlyRequest {
            source: media_ref.get_untracked().map(Into::into),
            image: image.clone(),
        };
        let qty = quantity.get_untracked();
        spawn_local(async move {
            if let Err(error) = service.add_item(Some(variant_id), qty, Some(fly)).await {
                web_sys::console::log_1(&format!("[CART] add failed: {error}").into());
                set_error.set(Some(error.to_string()));
            }
            set_busy.set(false);
        });
    };

    view! {
        <form class="product-card" on:submit=on_submit>
            <div class="product-card__media" node_ref=media_ref>
                {product.image.clone().map(|src| view! {
                    <img src=src alt=product.title.clone()/>
                })}
            </div>
            <h3 class="product-card__title">{product.title.clone()}</h3>
            <p class="product-card__price">{price_label}</p>
            <QuantityInput value=1 min=1 max=10 on_change=move |q| set_quantity.set(q)/>
            <button type="submit" class="product-card__submit" prop:disabled=move || busy.get()>
                {move || if busy.get() { "Adding..." } else { "Add to cart" }}
            </button>
            <Show when=move || error.get().is_some()>
                <p class="product-card__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
        </form>
    }
}
