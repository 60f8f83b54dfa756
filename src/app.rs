//! Shopfront App
//!
//! Root component: builds the cart store and service once, installs the
//! fetch watch and lays out the storefront widgets.

use leptos::prelude::*;

use crate::components::{CartBadge, CartDrawer, Modal, Product, ProductForm};
use crate::context::CartService;
use crate::store::{CartState, CartStore};
use crate::watch;

fn demo_products() -> Vec<Product> {
    vec![
        Product {
            variant_id: 40_100_201,
            title: "Enamel Camp Mug".to_string(),
            price: 1450,
            currency: "USD".to_string(),
            image: Some("/assets/products/camp-mug.jpg".to_string()),
        },
        Product {
            variant_id: 40_100_202,
            title: "Waxed Canvas Tote".to_string(),
            price: 6800,
            currency: "USD".to_string(),
            image: Some("/assets/products/canvas-tote.jpg".to_string()),
        },
        Product {
            variant_id: 40_100_203,
            title: "Trail Water Bottle".to_string(),
            price: 3200,
            currency: "USD".to_string(),
            image: Some("/assets/products/water-bottle.jpg".to_string()),
        },
        Product {
            variant_id: 40_100_204,
            title: "Wool Camp Blanket".to_string(),
            price: 9900,
            currency: "USD".to_string(),
            image: None,
        },
    ]
}

#[component]
pub fn App() -> impl IntoView {
    let store = CartStore::new(CartState::default());
    let service = CartService::new(store);
    provide_context(store);
    provide_context(service);
    watch::install(service);

    let shipping_open = RwSignal::new(false);

    view! {
        <div class="storefront">
            <header class="storefront__header">
                <span class="storefront__logo">"Shopfront"</span>
                <button
                    type="button"
                    class="storefront__cart-button"
                    aria-label="Open cart"
                    on:click=move |_| service.open_drawer()
                >
                    "Cart"
                    <CartBadge/>
                </button>
            </header>

            <main class="storefront__grid">
                {demo_products()
                    .into_iter()
                    .map(|product| view! { <ProductForm product=product/> })
                    .collect_view()}
            </main>

            <footer class="storefront__footer">
                <button
                    type="button"
                    class="storefront__footer-link"
                    on:click=move |_| shipping_open.set(true)
                >
                    "Shipping & returns"
                </button>
            </footer>

            <CartDrawer/>

            // Popup is desktop-only; it dismisses itself below the width floor
            <Modal open=shipping_open min_width=480.0>
                <h3>"Shipping & returns"</h3>
                <p>"Orders ship within 2 business days. Returns are free for 30 days."</p>
                <button type="button" on:click=move |_| shipping_open.set(false)>
                    "Close"
                </button>
            </Modal>
        </div>
    }
}
