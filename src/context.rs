//! Cart Service Context
//!
//! The single cart service, constructed once by the app root and shared via
//! the Leptos Context API. Owns the mutation operations, the update-notice
//! channel and the bookkeeping the fetch watcher relies on.

use leptos::prelude::*;
use web_sys::Element;

use crate::api::{self, CartError};
use crate::models::{AddLine, AddPayload, CartNotice, CartSnapshot, NoticeSource};
use crate::store::{store_set_drawer_open, store_set_snapshot, CartStore};
use leptos_flyto::FlyConfig;

/// A fly-to-cart request captured at click time
#[derive(Clone)]
pub struct FlyRequest {
    pub source: Option<Element>,
    pub image: Option<String>,
}

/// App-wide cart service provided via context
#[derive(Clone, Copy)]
pub struct CartService {
    store: CartStore,
    /// Update notices - read half, components subscribe with Effects
    pub notice: ReadSignal<Option<CartNotice>>,
    set_notice: WriteSignal<Option<CartNotice>>,
    /// Selector for the element the fly animation lands on (the badge
    /// registers itself on mount)
    fly_target: StoredValue<Option<String>>,
    /// Mutations currently issued by this service; the fetch watcher
    /// ignores requests while this is nonzero
    in_flight: StoredValue<u32>,
    /// `Date.now()` of the last broadcast notice
    last_notice_at: StoredValue<f64>,
    /// Fetch watcher installed flag
    watch_installed: StoredValue<bool>,
}

impl CartService {
    pub fn new(store: CartStore) -> Self {
        let (notice, set_notice) = signal(None::<CartNotice>);
        Self {
            store,
            notice,
            set_notice,
            fly_target: StoredValue::new(None),
            in_flight: StoredValue::new(0),
            last_notice_at: StoredValue::new(0.0),
            watch_installed: StoredValue::new(false),
        }
    }

    // ========================
    // Mutations
    // ========================

    /// Add a variant to the cart. The fly animation starts synchronously,
    /// before the request is awaited, and runs regardless of the outcome.
    pub async fn add_item(
        &self,
        variant_id: Option<u64>,
        quantity: u32,
        fly: Option<FlyRequest>,
    ) -> Result<CartSnapshot, CartError> {
        let variant_id = variant_id
            .filter(|id| *id > 0)
            .ok_or_else(|| CartError::InvalidArgument("variant id is required".into()))?;
        if let Some(request) = fly {
            leptos_flyto::launch(
                request.source,
                self.resolve_fly_target(),
                request.image,
                FlyConfig::default(),
            );
        }
        self.begin_mutation();
        let result = self.perform_add(variant_id, quantity).await;
        self.end_mutation();
        let snapshot = result?;
        self.notify(CartNotice {
            item_count: Some(quantity),
            source: NoticeSource::ProductForm,
            did_error: false,
        });
        Ok(snapshot)
    }

    async fn perform_add(&self, variant_id: u64, quantity: u32) -> Result<CartSnapshot, CartError> {
        let payload = AddPayload {
            items: vec![AddLine { id: variant_id, quantity }],
        };
        api::add_lines(&payload).await?;
        // add.js answers with the added lines only; the snapshot read is
        // the mandated post-mutation re-fetch
        let snapshot = api::fetch_cart().await?;
        store_set_snapshot(&self.store, snapshot.clone());
        Ok(snapshot)
    }

    /// Set a line's quantity; 0 removes the line
    pub async fn update_line(&self, key: &str, quantity: u32) -> Result<CartSnapshot, CartError> {
        self.begin_mutation();
        let result = api::change_line(key, quantity).await;
        self.end_mutation();
        let snapshot = result?;
        store_set_snapshot(&self.store, snapshot.clone());
        self.notify(CartNotice {
            item_count: Some(snapshot.item_count),
            source: NoticeSource::Drawer,
            did_error: false,
        });
        Ok(snapshot)
    }

    /// Re-read the snapshot. Reads never broadcast a notice.
    pub async fn refresh(&self) -> Result<CartSnapshot, CartError> {
        let snapshot = api::fetch_cart().await?;
        store_set_snapshot(&self.store, snapshot.clone());
        Ok(snapshot)
    }

    // ========================
    // Notices
    // ========================

    pub fn notify(&self, notice: CartNotice) {
        self.last_notice_at.set_value(js_sys::Date::now());
        self.set_notice.set(Some(notice));
    }

    pub fn last_notice_at(&self) -> f64 {
        self.last_notice_at.get_value()
    }

    // ========================
    // Drawer + Fly Target
    // ========================

    pub fn open_drawer(&self) {
        store_set_drawer_open(&self.store, true);
    }

    pub fn close_drawer(&self) {
        store_set_drawer_open(&self.store, false);
    }

    pub fn set_fly_target(&self, selector: Option<String>) {
        self.fly_target.set_value(selector);
    }

    fn resolve_fly_target(&self) -> Option<Element> {
        let selector = self.fly_target.get_value()?;
        web_sys::window()?
            .document()?
            .query_selector(&selector)
            .ok()
            .flatten()
    }

    // ========================
    // Fetch Watcher Bookkeeping
    // ========================

    fn begin_mutation(&self) {
        self.in_flight.update_value(|n| *n += 1);
    }

    fn end_mutation(&self) {
        self.in_flight.update_value(|n| *n = n.saturating_sub(1));
    }

    pub fn has_own_mutation_in_flight(&self) -> bool {
        self.in_flight.get_value() > 0
    }

    pub fn watch_installed(&self) -> bool {
        self.watch_installed.get_value()
    }

    pub fn mark_watch_installed(&self) {
        self.watch_installed.set_value(true);
    }
}

/// Get the cart service from context
pub fn use_cart_service() -> CartService {
    expect_context::<CartService>()
}
