//! Cart Drawer Component
//!
//! Slide-in panel mirroring the cart. Renders declaratively from the
//! snapshot-derived view model; the items list, footer and header count
//! reconcile on every snapshot change.

use std::collections::HashSet;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::QuantityInput;
use crate::context::use_cart_service;
use crate::models::NoticeSource;
use crate::money;
use crate::store::{store_drawer_open, store_snapshot, use_cart_store};
use crate::view_model::{derive_sections, RowView};

#[component]
pub fn CartDrawer() -> impl IntoView {
    let service = use_cart_service();
    let store = use_cart_store();
    let (removing, set_removing) = signal(HashSet::<String>::new());
    // Derived count shown when a snapshot read failed after a mutation
    let (fallback_count, set_fallback_count) = signal(None::<u32>);
    let saved_scroll = StoredValue::new(0.0f64);
    let was_locked = StoredValue::new(false);

    let sections = Memo::new(move |_| {
        let snapshot = store_snapshot(&store);
        derive_sections(snapshot.as_ref(), &removing.get())
    });

    // A successful product-form add opens the drawer
    Effect::new(move |_| {
        let Some(notice) = service.notice.get() else {
            return;
        };
        if notice.source == NoticeSource::ProductForm && !notice.did_error {
            service.open_drawer();
        }
    });

    // Scroll lock follows the open state; closing restores the offset
    Effect::new(move |_| {
        let is_open = store_drawer_open(&store);
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(body) = window.document().and_then(|d| d.body()) else {
            return;
        };
        if is_open {
            saved_scroll.set_value(window.scroll_y().unwrap_or(0.0));
            let _ = body.class_list().add_1("scroll-locked");
            was_locked.set_value(true);
        } else if was_locked.get_value() {
            let _ = body.class_list().remove_1("scroll-locked");
            window.scroll_to_with_x_and_y(0.0, saved_scroll.get_value());
            was_locked.set_value(false);
        }
    });

    // Re-read the cart whenever the drawer opens; on failure fall back to
    // the derived count from the last notice and keep the rendered rows
    Effect::new(move |_| {
        if !store_drawer_open(&store) {
            return;
        }
        spawn_local(async move {
            match service.refresh().await {
                Ok(_) => set_fallback_count.set(None),
                Err(error) => {
                    web_sys::console::log_1(
                        &format!("[DRAWER] cart read failed: {error}").into(),
                    );
                    let derived = service.notice.get_untracked().and_then(|n| match n.source {
                        // Product forms report a delta, not a total
                        NoticeSource::ProductForm => None,
                        _ => n.item_count,
                    });
                    set_fallback_count.set(derived);
                }
            }
        });
    });

    let set_line_quantity = move |key: String, quantity: u32| {
        if quantity == 0 {
            // Mark for removal so the exit transition plays while the
            // change call is in flight
            set_removing.update(|marks| {
                marks.insert(key.clone());
            });
        }
        spawn_local(async move {
            match service.update_line(&key, quantity).await {
                Ok(_) => {
                    set_removing.update(|marks| {
                        marks.remove(&key);
                    });
                    set_fallback_count.set(None);
                }
                Err(error) => {
                    web_sys::console::log_1(
                        &format!("[DRAWER] quantity update failed: {error}").into(),
                    );
                    // Revert the optimistic removal mark
                    set_removing.update(|marks| {
                        marks.remove(&key);
                    });
                }
            }
        });
    };

    let is_open = move || store_drawer_open(&store);
    let header_count =
        move || fallback_count.get().unwrap_or_else(|| sections.get().header_count);

    view! {
        <div
            class=move || if is_open() { "cart-drawer__overlay cart-drawer__overlay--open" } else { "cart-drawer__overlay" }
            on:click=move |_| service.close_drawer()
        ></div>
        <aside
            class=move || if is_open() { "cart-drawer cart-drawer--open" } else { "cart-drawer" }
            aria-hidden=move || if is_open() { "false" } else { "true" }
        >
            <header class="cart-drawer__header">
                <h2>"Cart (" {header_count} ")"</h2>
                <button
                    type="button"
                    class="cart-drawer__close"
                    aria-label="Close cart"
                    on:click=move |_| service.close_drawer()
                >
                    "×"
                </button>
            </header>

            <Show
                when=move || !sections.get().is_empty
                fallback=|| view! { <p class="cart-drawer__empty">"Your cart is empty"</p> }
            >
                <ul class="cart-drawer__items">
                    <For
                        each=move || sections.get().rows
                        key=|row| (row.key.clone(), row.quantity, row.removing)
                        children=move |row: RowView| {
                            let change_key = row.key.clone();
                            let remove_key = row.key.clone();
                            let line_price = row.line_price;
                            let row_class = if row.removing {
                                "cart-line cart-line--removing"
                            } else {
                                "cart-line"
                            };
                            view! {
                                <li class=row_class>
                                    {row.image.clone().map(|src| view! {
                                        <img class="cart-line__image" src=src alt=""/>
                                    })}
                                    <div class="cart-line__info">
                                        <a
                                            class="cart-line__title"
                                            href=row.url.clone().unwrap_or_else(|| "#".to_string())
                                        >
                                            {row.title.clone()}
                                        </a>
                                        <span class="cart-line__price">
                                            {move || money::format_money(line_price, &sections.get().currency)}
                                        </span>
                                    </div>
                                    <QuantityInput
                                        value=row.quantity
                                        min=0
                                        max=99
                                        on_change=move |quantity| {
                                            set_line_quantity(change_key.clone(), quantity)
                                        }
                                    />
                                    <button
                                        type="button"
                                        class="cart-line__remove"
                                        on:click=move |_| set_line_quantity(remove_key.clone(), 0)
                                    >
                                        "Remove"
                                    </button>
                                </li>
                            }
                        }
                    />
                </ul>

                <footer class="cart-drawer__footer">
                    <div class="cart-drawer__subtotal">
                        <span>"Subtotal"</span>
                        <span>
                            {move || {
                                let totals = sections.get();
                                money::format_money(totals.subtotal, &totals.currency)
                            }}
                        </span>
                    </div>
                    <a class="cart-drawer__checkout" href="/checkout">"Check out"</a>
                </footer>
            </Show>
        </aside>
    }
}
