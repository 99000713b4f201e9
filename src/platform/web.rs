//! Browser adapter (wasm32 only)
//!
//! Event listeners and the animation loop are owned values: dropping them
//! detaches the callbacks, so a finished level leaves nothing behind.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent};

use super::input::PointerEvent;
use crate::sim::entity::{BarrierKind, HazardKind, Shape};
use crate::sim::outcome::LevelResult;

type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// Event listeners attached to one target, removed on drop
pub struct EventListeners {
    target: EventTarget,
    listeners: Vec<(&'static str, Listener)>,
}

impl EventListeners {
    pub fn new(target: EventTarget) -> Self {
        Self {
            target,
            listeners: Vec::new(),
        }
    }

    pub fn add(&mut self, kind: &'static str, handler: impl FnMut(web_sys::Event) + 'static) -> Result<(), JsValue> {
        let closure = Listener::new(handler);
        self.target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        self.listeners.push((kind, closure));
        Ok(())
    }
}

impl Drop for EventListeners {
    fn drop(&mut self) {
        for (kind, closure) in self.listeners.drain(..) {
            let _ = self
                .target
                .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
    }
}

/// Map a client position onto arena coordinates
fn to_arena(canvas: &HtmlCanvasElement, arena: Vec2, client_x: f64, client_y: f64) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let scale = Vec2::new(
        arena.x / rect.width().max(1.0) as f32,
        arena.y / rect.height().max(1.0) as f32,
    );
    Vec2::new((client_x - rect.left()) as f32, (client_y - rect.top()) as f32) * scale
}

fn first_touch(canvas: &HtmlCanvasElement, arena: Vec2, event: &TouchEvent) -> Option<Vec2> {
    event
        .touches()
        .get(0)
        .map(|touch| to_arena(canvas, arena, touch.client_x() as f64, touch.client_y() as f64))
}

/// Mouse and touch listeners on `canvas`, reporting in arena coordinates
pub fn pointer_listeners(
    canvas: &HtmlCanvasElement,
    arena: Vec2,
    handler: impl FnMut(PointerEvent) + 'static,
) -> Result<EventListeners, JsValue> {
    let handler = Rc::new(RefCell::new(handler));
    let mut listeners = EventListeners::new(canvas.clone().into());

    // Mouse move
    {
        let handler = handler.clone();
        let canvas = canvas.clone();
        listeners.add("mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let pos = to_arena(&canvas, arena, event.client_x() as f64, event.client_y() as f64);
                (*handler.borrow_mut())(PointerEvent::Move(pos));
            }
        })?;
    }

    // Mouse leave
    {
        let handler = handler.clone();
        listeners.add("mouseleave", move |_event| {
            (*handler.borrow_mut())(PointerEvent::Leave);
        })?;
    }

    // Touch start / move
    for kind in ["touchstart", "touchmove"] {
        let handler = handler.clone();
        let canvas = canvas.clone();
        listeners.add(kind, move |event| {
            let Some(event) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            event.prevent_default();
            if let Some(pos) = first_touch(&canvas, arena, event) {
                let pointer = if event.type_() == "touchstart" {
                    PointerEvent::TouchStart(pos)
                } else {
                    PointerEvent::TouchMove(pos)
                };
                (*handler.borrow_mut())(pointer);
            }
        })?;
    }

    // Touch end
    for kind in ["touchend", "touchcancel"] {
        let handler = handler.clone();
        listeners.add(kind, move |_event| {
            (*handler.borrow_mut())(PointerEvent::TouchEnd);
        })?;
    }

    Ok(listeners)
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` loop, cancelled on drop
///
/// `step` runs once per frame; returning false ends the loop.
pub struct AnimationLoop {
    handle: Rc<RefCell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl AnimationLoop {
    pub fn start(mut step: impl FnMut() -> bool + 'static) -> Result<Self, JsValue> {
        let handle: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        {
            let handle = handle.clone();
            let weak = Rc::downgrade(&callback);
            *callback.borrow_mut() = Some(FrameCallback::new(move |_time: f64| {
                *handle.borrow_mut() = None;
                if !step() {
                    return;
                }
                let Some(callback) = weak.upgrade() else {
                    return;
                };
                if let Some(closure) = callback.borrow().as_ref() {
                    *handle.borrow_mut() = request_frame(closure).ok();
                }
            }));
        }

        if let Some(closure) = callback.borrow().as_ref() {
            *handle.borrow_mut() = Some(request_frame(closure)?);
        }

        Ok(Self { handle, callback })
    }
}

fn request_frame(closure: &FrameCallback) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .request_animation_frame(closure.as_ref().unchecked_ref())
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        if let (Some(window), Some(id)) = (web_sys::window(), self.handle.borrow_mut().take()) {
            let _ = window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

/// Canvas 2D painter for [`Shape`]s
pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasPainter {
    /// Draws in arena coordinates, scaled to the canvas backing size
    pub fn new(canvas: &HtmlCanvasElement, arena: Vec2) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        ctx.scale(
            canvas.width() as f64 / arena.x as f64,
            canvas.height() as f64 / arena.y as f64,
        )?;
        Ok(Self {
            ctx,
            width: arena.x as f64,
            height: arena.y as f64,
        })
    }

    pub fn clear(&self) {
        self.ctx.set_fill_style_str("#10141f");
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    pub fn paint(&self, shapes: &[Shape]) -> Result<(), JsValue> {
        self.clear();
        for shape in shapes {
            self.paint_shape(shape)?;
        }
        Ok(())
    }

    fn paint_shape(&self, shape: &Shape) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match *shape {
            Shape::Home { origin, size } => {
                ctx.set_fill_style_str("rgba(90, 200, 120, 0.25)");
                ctx.fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
                ctx.set_stroke_style_str("#5ac878");
                ctx.set_line_width(2.0);
                ctx.stroke_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
            }
            Shape::Hazard { center, radius, kind } => {
                let color = match kind {
                    HazardKind::BlackHole => "#000000",
                    HazardKind::Wormhole { .. } => "#6a3fd0",
                };
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)?;
                ctx.set_fill_style_str(color);
                ctx.fill();
                ctx.set_stroke_style_str("#9aa0b5");
                ctx.set_line_width(1.0);
                ctx.stroke();
            }
            Shape::Barrier { from, to, kind } => {
                let color = match kind {
                    BarrierKind::Normal => "#c8c8d0",
                    BarrierKind::Accelerate => "#ff6a3d",
                    BarrierKind::Decelerate => "#3da5ff",
                };
                self.line(from, to, color, 4.0);
            }
            Shape::Ball { center, radius, captured } => {
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)?;
                ctx.set_fill_style_str(if captured { "#ffe066" } else { "#ffb800" });
                ctx.fill();
            }
            Shape::Tether { from, to } => {
                self.line(from, to, "rgba(255, 224, 102, 0.5)", 1.0);
            }
        }
        Ok(())
    }

    fn line(&self, from: Vec2, to: Vec2, color: &str, width: f64) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(from.x as f64, from.y as f64);
        ctx.line_to(to.x as f64, to.y as f64);
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(width);
        ctx.stroke();
    }

    /// Result banner over the last frame
    pub fn paint_result(&self, result: &LevelResult) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let cx = self.width / 2.0;
        let cy = self.height / 2.0;

        ctx.set_fill_style_str("rgba(0, 0, 0, 0.6)");
        ctx.fill_rect(0.0, cy - 90.0, self.width, 180.0);

        ctx.set_text_align("center");
        ctx.set_fill_style_str("yellow");
        ctx.set_font("36px Arial");
        ctx.fill_text(result.tier.message(), cx, cy - 30.0)?;

        ctx.set_font("24px Arial");
        ctx.fill_text(&result.summary(), cx, cy + 15.0)?;

        let stars: String = (0..crate::consts::MAX_STARS)
            .map(|i| if i < result.stars_earned { '★' } else { '☆' })
            .collect();
        ctx.fill_text(&stars, cx, cy + 50.0)?;

        ctx.set_font("16px Arial");
        ctx.fill_text("Click to continue", cx, cy + 80.0)?;
        Ok(())
    }
}
