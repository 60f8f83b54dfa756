#![allow(warnings)]
//! Shopfront Frontend Entry Point

mod api;
mod app;
mod components;
mod context;
mod models;
mod money;
mod store;
mod view_model;
mod watch;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
