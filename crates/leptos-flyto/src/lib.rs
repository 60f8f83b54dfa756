//! Leptos FlyTo Utilities
//!
//! Single-use fly-to-cart animation: a ghost of the added product travels
//! from its source element to the cart icon, then removes itself.
//! The flight is CSS-driven; this crate only computes the trajectory,
//! applies it as custom properties and waits for the transition to settle.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};

/// Axis-aligned box in viewport coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn from_dom(rect: &web_sys::DomRect) -> Self {
        Self {
            x: rect.x(),
            y: rect.y(),
            width: rect.width(),
            height: rect.height(),
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

/// Viewport point in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Where the ghost starts and how far it travels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trajectory {
    pub start: Point,
    pub delta: Point,
}

/// Fly animation options
#[derive(Clone, Copy, Debug)]
pub struct FlyConfig {
    /// Size the ghost to the source element's box
    pub uses_source_dimensions: bool,
    /// Settle timeout when no CSS transition fires
    pub fallback_ms: u32,
}

impl Default for FlyConfig {
    fn default() -> Self {
        Self {
            uses_source_dimensions: true,
            fallback_ms: 700,
        }
    }
}

/// Compute the flight. The ghost starts on the source center and lands on
/// the destination's top-right corner, where the count bubble sits.
pub fn trajectory(source: Rect, destination: Rect) -> Trajectory {
    let start = source.center();
    let end = Point {
        x: destination.x + destination.width,
        y: destination.y,
    };
    Trajectory {
        start,
        delta: Point {
            x: end.x - start.x,
            y: end.y - start.y,
        },
    }
}

/// Launch a single-use flight from `source` to `destination`.
///
/// The ghost is created and attached synchronously so callers can
/// fire-and-forget before awaiting network work. Missing endpoints make the
/// ghost remove itself without animating.
pub fn launch(
    source: Option<web_sys::Element>,
    destination: Option<web_sys::Element>,
    image: Option<String>,
    config: FlyConfig,
) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(ghost) = build_ghost(&document, image.as_deref()) else {
        return;
    };
    spawn_local(run(ghost, source, destination, config));
}

fn build_ghost(document: &web_sys::Document, image: Option<&str>) -> Option<web_sys::HtmlElement> {
    let ghost: web_sys::HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
    ghost.set_class_name("fly-ghost");
    if let Some(src) = image {
        if let Ok(img) = document.create_element("img") {
            let _ = img.set_attribute("src", src);
            let _ = img.set_attribute("alt", "");
            let _ = ghost.append_child(&img);
        }
    }
    document.body()?.append_child(&ghost).ok()?;
    Some(ghost)
}

async fn run(
    ghost: web_sys::HtmlElement,
    source: Option<web_sys::Element>,
    destination: Option<web_sys::Element>,
    config: FlyConfig,
) {
    let (Some(source), Some(destination)) = (source, destination) else {
        // No endpoints to fly between
        ghost.remove();
        return;
    };
    let from = Rect::from_dom(&source.get_bounding_client_rect());
    let to = Rect::from_dom(&destination.get_bounding_client_rect());
    let flight = trajectory(from, to);

    let style = ghost.style();
    if config.uses_source_dimensions {
        let _ = style.set_property("width", &format!("{}px", from.width));
        let _ = style.set_property("height", &format!("{}px", from.height));
    }
    // The stylesheet centers the ghost on the start point and moves it by
    // the delta custom properties when the active class lands.
    let _ = style.set_property("left", &format!("{}px", flight.start.x));
    let _ = style.set_property("top", &format!("{}px", flight.start.y));
    let _ = style.set_property("--fly-dx", &format!("{}px", flight.delta.x));
    let _ = style.set_property("--fly-dy", &format!("{}px", flight.delta.y));

    // One frame so the start position is applied before the transition runs
    next_frame().await;
    let _ = ghost.class_list().add_1("fly-ghost--active");
    transition_settled(&ghost, config.fallback_ms).await;
    ghost.remove();
}

/// Resolve on the next animation frame
pub async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        match web_sys::window() {
            Some(window) => {
                if window.request_animation_frame(&resolve).is_err() {
                    let _ = resolve.call0(&JsValue::NULL);
                }
            }
            None => {
                let _ = resolve.call0(&JsValue::NULL);
            }
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Resolve when a `transitionend` fires on `target`, or after `fallback_ms`
/// when no transition is running.
pub async fn transition_settled(target: &web_sys::HtmlElement, fallback_ms: u32) {
    let target: web_sys::EventTarget = target.clone().into();
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let on_end = resolve.clone();
        let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
            let _ = on_end.call0(&JsValue::NULL);
        });
        let _ = target
            .add_event_listener_with_callback("transitionend", listener.as_ref().unchecked_ref());
        listener.forget();

        let on_timeout = resolve.clone();
        let fallback = Closure::<dyn FnMut()>::new(move || {
            let _ = on_timeout.call0(&JsValue::NULL);
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                fallback.as_ref().unchecked_ref(),
                fallback_ms as i32,
            );
        }
        fallback.forget();
    });
    let _ = JsFuture::from(promise).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center() {
        let rect = Rect { x: 10.0, y: 20.0, width: 30.0, height: 40.0 };
        assert_eq!(rect.center(), Point { x: 25.0, y: 40.0 });
    }

    #[test]
    fn test_trajectory_lands_on_badge_corner() {
        let source = Rect { x: 0.0, y: 0.0, width: 40.0, height: 40.0 };
        let destination = Rect { x: 300.0, y: 10.0, width: 20.0, height: 20.0 };
        let flight = trajectory(source, destination);
        assert_eq!(flight.start, Point { x: 20.0, y: 20.0 });
        assert_eq!(flight.delta, Point { x: 300.0, y: -10.0 });
    }

    #[test]
    fn test_trajectory_zero_travel() {
        let source = Rect { x: 90.0, y: 10.0, width: 20.0, height: 20.0 };
        let destination = Rect { x: 80.0, y: 20.0, width: 20.0, height: 20.0 };
        let flight = trajectory(source, destination);
        assert_eq!(flight.start, Point { x: 100.0, y: 20.0 });
        assert_eq!(flight.delta, Point { x: 0.0, y: 0.0 });
    }
}
