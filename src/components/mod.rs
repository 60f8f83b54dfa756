//! UI Components
//!
//! Reusable Leptos components.

mod cart_badge;
mod cart_drawer;
mod modal;
mod product_form;
mod quantity_input;

pub use cart_badge::CartBadge;
pub use cart_drawer::CartDrawer;
pub use modal::Modal;
pub use product_form::{Product, ProductForm};
pub use quantity_input::QuantityInput;
