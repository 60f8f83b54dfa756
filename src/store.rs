//! Cart State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The snapshot is
//! a best-effort cached view; the platform holds the authoritative copy.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::CartSnapshot;

/// Global cart state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct CartState {
    /// Last snapshot read from the platform
    pub snapshot: Option<CartSnapshot>,
    /// Whether the cart drawer is open
    pub drawer_open: bool,
}

/// Type alias for the store
pub type CartStore = Store<CartState>;

/// Get the cart store from context
pub fn use_cart_store() -> CartStore {
    expect_context::<CartStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_set_snapshot(store: &CartStore, snapshot: CartSnapshot) {
    *store.snapshot().write() = Some(snapshot);
}

/// Reactive clone of the cached snapshot
pub fn store_snapshot(store: &CartStore) -> Option<CartSnapshot> {
    store.snapshot().read().clone()
}

/// Reactive item count; 0 while no snapshot has been read yet
pub fn store_item_count(store: &CartStore) -> u32 {
    store
        .snapshot()
        .read()
        .as_ref()
        .map(|snapshot| snapshot.item_count)
        .unwrap_or(0)
}

pub fn store_drawer_open(store: &CartStore) -> bool {
    store.drawer_open().get()
}

pub fn store_set_drawer_open(store: &CartStore, open: bool) {
    *store.drawer_open().write() = open;
}
