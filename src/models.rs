//! Cart Models
//!
//! Data structures matching the storefront cart API payloads.

use serde::{Deserialize, Serialize};

/// Full cart state as reported by the platform (`GET /cart.js`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub item_count: u32,
    /// Minor currency units
    pub total_price: i64,
    pub currency: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// One variant line within the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique per cart line
    pub key: String,
    /// Variant id
    pub id: u64,
    pub quantity: u32,
    #[serde(default)]
    pub title: String,
    /// Minor currency units for the whole line
    #[serde(default)]
    pub line_price: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Where a cart mutation originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSource {
    ProductForm,
    Drawer,
    FetchFallback,
}

/// Broadcast after a successful cart mutation.
///
/// For `ProductForm` the count is the quantity just added (the badge adds
/// it on top); for every other source it is the server total (the badge
/// replaces). `None` means the count is unknown and must be re-fetched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartNotice {
    pub item_count: Option<u32>,
    pub source: NoticeSource,
    pub did_error: bool,
}

/// Request body for `POST /cart/add.js`
#[derive(Debug, Serialize)]
pub struct AddPayload {
    pub items: Vec<AddLine>,
}

#[derive(Debug, Serialize)]
pub struct AddLine {
    pub id: u64,
    pub quantity: u32,
}

/// Request body for `POST /cart/change.js`
#[derive(Debug, Serialize)]
pub struct ChangePayload<'a> {
    pub id: &'a str,
    pub quantity: u32,
}

/// Session-persisted badge record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredBadge {
    pub count: u32,
    /// `Date.now()` milliseconds at persist time
    pub saved_at: f64,
}
