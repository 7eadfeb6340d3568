// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page-level facade.
//!
//! [`Magnetic`] owns one engine, the pointer tracker, the hover listeners of
//! every instance, and the frame loop. Hover closures hold only weak
//! references to the shared state, so dropping the facade tears everything
//! down. The JS entry points share a single page-wide facade; see
//! [`crate::bootstrap`].

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::ToString;
use alloc::vec::Vec;
use core::cell::RefCell;

use js_sys::Reflect;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element};

use magnetic_core::config::EngineConfig;
use magnetic_core::discovery::{DiscoveryConfig, discover};
use magnetic_core::engine::{Engine, FrameStats};
use magnetic_core::error::CreateError;
use magnetic_core::instance::MagnetOptions;
use magnetic_core::pointer::PointerCell;
use magnetic_core::registry::InstanceId;
use magnetic_core::timing::FrameTick;
use magnetic_core::trace::{TraceSink, Tracer};

use crate::markup::DomMarkup;
use crate::pointer::PointerTracker;
use crate::presenter::DomPresenter;
use crate::raf::RafLoop;

type DomEngine = Engine<Element, Rc<PointerCell>>;

/// Magnetic effect for a page.
///
/// ```no_run
/// # fn demo(root: web_sys::Element, button: web_sys::Element) -> Result<(), wasm_bindgen::JsValue> {
/// use magnetic_backend_web::Magnetic;
/// use magnetic_core::instance::MagnetOptions;
///
/// let mut magnetic = Magnetic::new()?;
/// magnetic.create(MagnetOptions::new(root, button).with_force(0.2))?;
/// magnetic.start();
/// # core::mem::forget(magnetic);
/// # Ok(())
/// # }
/// ```
pub struct Magnetic {
    shared: Rc<Shared>,
    raf: Option<RafLoop>,
    _pointer: PointerTracker,
}

struct Shared {
    engine: RefCell<DomEngine>,
    presenter: RefCell<DomPresenter>,
    hover: RefCell<Vec<HoverListeners>>,
    sink: RefCell<Option<Box<dyn TraceSink>>>,
}

impl core::fmt::Debug for Magnetic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Magnetic")
            .field("instances", &self.shared.engine.borrow().len())
            .field("raf", &self.raf)
            .finish_non_exhaustive()
    }
}

impl Magnetic {
    /// Creates a facade with the default tuning and starts tracking the
    /// pointer. The frame loop is not started.
    ///
    /// # Errors
    ///
    /// Fails if there is no global `window` or the `mousemove` listener cannot
    /// be installed.
    pub fn new() -> Result<Self, JsValue> {
        Self::with_config(EngineConfig::DEFAULT)
    }

    /// Like [`new`](Self::new) with explicit tuning.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn with_config(config: EngineConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let pointer = PointerTracker::install(&window)?;
        let engine = Engine::with_config(Rc::clone(pointer.cell()), config);
        Ok(Self {
            shared: Rc::new(Shared {
                engine: RefCell::new(engine),
                presenter: RefCell::new(DomPresenter::new()),
                hover: RefCell::new(Vec::new()),
                sink: RefCell::new(None),
            }),
            raf: None,
            _pointer: pointer,
        })
    }

    /// Routes engine diagnostics to `sink`.
    pub fn set_trace_sink(&self, sink: impl TraceSink + 'static) {
        *self.shared.sink.borrow_mut() = Some(Box::new(sink));
    }

    /// Starts the `requestAnimationFrame` loop. No-op if already running.
    pub fn start(&mut self) {
        let shared = &self.shared;
        self.raf
            .get_or_insert_with(|| {
                let shared = Rc::clone(shared);
                RafLoop::new(move |tick| {
                    let _ = shared.frame(&tick);
                })
            })
            .start();
    }

    /// Stops the frame loop. Offsets stay where they are until restarted.
    pub fn stop(&self) {
        if let Some(raf) = &self.raf {
            raf.stop();
        }
    }

    /// Registers an instance and listens for pointer enter/leave on its
    /// container.
    ///
    /// # Errors
    ///
    /// Fails with a JS `Error` carrying the [`CreateError`] message if the
    /// container or element is missing, or with the JS exception if the
    /// hover listeners cannot be installed.
    pub fn create(&self, options: MagnetOptions<Element>) -> Result<InstanceId, JsValue> {
        self.shared.create(options)
    }

    /// Registers an instance from a JS options object
    /// `{ root, element, force, distance }`.
    ///
    /// `container` is accepted as an alias for `root`. Values that are not
    /// elements fail like missing ones; `force` and `distance` values that are
    /// not numbers fall back to the defaults.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub fn create_from_js(&self, options: &JsValue) -> Result<InstanceId, JsValue> {
        self.shared.create(options_from_js(options))
    }

    /// Unregisters an instance, removing its hover listeners and clearing any
    /// offset it still applies. Returns `false` for stale handles.
    pub fn unregister(&self, id: InstanceId) -> bool {
        self.shared.unregister(id)
    }

    /// Registers every `data-magnetic-element` under a `data-magnetic-root`
    /// in `document`.
    pub fn scan(&self, document: &Document) -> Vec<InstanceId> {
        self.shared.scan(document, &DiscoveryConfig::DEFAULT)
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.engine.borrow().len()
    }

    /// Returns `true` if no instance is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.engine.borrow().is_empty()
    }

    /// Like [`scan`](Self::scan), deferred to `DOMContentLoaded` while
    /// `document` is still loading.
    ///
    /// # Errors
    ///
    /// Fails if the `DOMContentLoaded` listener cannot be installed.
    pub fn scan_when_parsed(&self, document: &Document) -> Result<(), JsValue> {
        let shared = Rc::clone(&self.shared);
        let target = document.clone();
        let scan = move || {
            let _ = shared.scan(&target, &DiscoveryConfig::DEFAULT);
        };
        if document.ready_state() == "loading" {
            let callback = Closure::once_into_js(scan);
            document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
        } else {
            scan();
        }
        Ok(())
    }
}

impl Shared {
    fn frame(&self, tick: &FrameTick) -> FrameStats {
        let mut engine = self.engine.borrow_mut();
        let mut presenter = self.presenter.borrow_mut();
        let mut sink = self.sink.borrow_mut();
        let mut tracer = tracer_for(&mut sink);
        engine.frame(tick, &mut *presenter, &mut tracer)
    }

    fn create(self: &Rc<Self>, options: MagnetOptions<Element>) -> Result<InstanceId, JsValue> {
        let id = {
            let mut engine = self.engine.borrow_mut();
            let mut presenter = self.presenter.borrow_mut();
            let mut sink = self.sink.borrow_mut();
            engine
                .create(options, &mut *presenter, &mut tracer_for(&mut sink))
                .map_err(create_error_to_js)?
        };

        let container = self
            .engine
            .borrow()
            .instance(id)
            .map(|inst| inst.container().clone());
        if let Some(container) = container {
            match HoverListeners::install(self, id, &container) {
                Ok(listeners) => self.hover.borrow_mut().push(listeners),
                Err(err) => {
                    let _ = self.unregister(id);
                    return Err(err);
                }
            }
        }
        Ok(id)
    }

    fn unregister(&self, id: InstanceId) -> bool {
        self.hover.borrow_mut().retain(|h| h.id != id);
        let mut engine = self.engine.borrow_mut();
        let mut presenter = self.presenter.borrow_mut();
        let mut sink = self.sink.borrow_mut();
        engine
            .unregister(id, &mut *presenter, &mut tracer_for(&mut sink))
            .is_some()
    }

    fn scan(self: &Rc<Self>, document: &Document, config: &DiscoveryConfig) -> Vec<InstanceId> {
        discover(&DomMarkup::new(document.clone()), config)
            .into_iter()
            .filter_map(|options| self.create(options).ok())
            .collect()
    }
}

fn tracer_for(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink.as_deref_mut() {
        Some(sink) => Tracer::new(sink),
        None => Tracer::none(),
    }
}

// ---------------------------------------------------------------------------
// Hover listeners
// ---------------------------------------------------------------------------

type HoverClosure = Closure<dyn FnMut()>;

/// `mouseenter`/`mouseleave` listeners for one instance. Removed on drop.
struct HoverListeners {
    id: InstanceId,
    target: Element,
    enter: HoverClosure,
    leave: HoverClosure,
}

impl HoverListeners {
    fn install(shared: &Rc<Shared>, id: InstanceId, target: &Element) -> Result<Self, JsValue> {
        let listeners = Self {
            id,
            target: target.clone(),
            enter: hover_closure(Rc::downgrade(shared), id, true),
            leave: hover_closure(Rc::downgrade(shared), id, false),
        };
        // On failure `listeners` drops here and removes whatever was added.
        target.add_event_listener_with_callback("mouseenter", listeners.enter.as_ref().unchecked_ref())?;
        target.add_event_listener_with_callback("mouseleave", listeners.leave.as_ref().unchecked_ref())?;
        Ok(listeners)
    }
}

impl Drop for HoverListeners {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("mouseenter", self.enter.as_ref().unchecked_ref());
        let _ = self
            .target
            .remove_event_listener_with_callback("mouseleave", self.leave.as_ref().unchecked_ref());
    }
}

fn hover_closure(shared: Weak<Shared>, id: InstanceId, hovering: bool) -> HoverClosure {
    Closure::wrap(Box::new(move || {
        if let Some(shared) = shared.upgrade() {
            shared.engine.borrow_mut().set_hovering(id, hovering);
        }
    }) as Box<dyn FnMut()>)
}

// ---------------------------------------------------------------------------
// JS interop helpers
// ---------------------------------------------------------------------------

/// A property of a JS options object, as construction sees it.
#[derive(Clone, Debug)]
enum JsField<E> {
    Undefined,
    Element(E),
    Number(f64),
    Other,
}

fn classify(value: JsValue) -> JsField<Element> {
    if value.is_undefined() {
        return JsField::Undefined;
    }
    if let Some(n) = value.as_f64() {
        return JsField::Number(n);
    }
    value
        .dyn_into::<Element>()
        .map_or(JsField::Other, JsField::Element)
}

fn options_from_js(options: &JsValue) -> MagnetOptions<Element> {
    options_from_fields(|key| {
        Reflect::get(options, &JsValue::from_str(key)).map_or(JsField::Undefined, classify)
    })
}

fn options_from_fields<E>(mut field: impl FnMut(&str) -> JsField<E>) -> MagnetOptions<E> {
    MagnetOptions {
        container: element_field(&mut field, &["root", "container"]),
        element: element_field(&mut field, &["element"]),
        force: number_field(&mut field, "force"),
        distance: number_field(&mut field, "distance"),
    }
}

/// The first defined property among `keys`, if it is an element.
fn element_field<E>(field: &mut impl FnMut(&str) -> JsField<E>, keys: &[&str]) -> Option<E> {
    let defined = keys
        .iter()
        .map(|&key| field(key))
        .find(|value| !matches!(value, JsField::Undefined));
    match defined {
        Some(JsField::Element(element)) => Some(element),
        _ => None,
    }
}

/// The property `key` if it is a JS number (NaN included).
fn number_field<E>(field: &mut impl FnMut(&str) -> JsField<E>, key: &str) -> Option<f64> {
    match field(key) {
        JsField::Number(n) => Some(n),
        _ => None,
    }
}

fn create_error_to_js(err: CreateError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
