//! Browser host backed by `web-sys`.

use std::{cell::RefCell, rc::Rc};

use once_cell::unsync::OnceCell;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

use crate::{
    dom::{Ev, Event, Handler, Tag},
    host::Host,
    HostError,
};

fn js_error(value: JsValue) -> HostError {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value));
    HostError::Js(message)
}

pub fn window() -> Result<web_sys::Window, HostError> {
    web_sys::window().ok_or_else(|| HostError::Js("no global window".to_string()))
}

fn as_element(node: &web_sys::Node) -> Result<&web_sys::Element, HostError> {
    node.dyn_ref::<web_sys::Element>()
        .ok_or(HostError::NotAnElement)
}

struct Listener {
    elem: web_sys::Element,
    event: Ev,
    closure: Closure<dyn Fn(web_sys::Event)>,
}

impl Listener {
    fn function(&self) -> &js_sys::Function {
        self.closure.as_ref().unchecked_ref()
    }

    fn unbind(&self) {
        if let Err(err) = self
            .elem
            .remove_event_listener_with_callback(self.event.as_str(), self.function())
        {
            tracing::warn!(event=%self.event, error=?err, "could not remove listener");
        }
    }
}

#[derive(Default)]
struct Inner {
    document: OnceCell<web_sys::Document>,
    // Closures must outlive their binding on the JS side.
    listeners: RefCell<Vec<Listener>>,
}

/// Renders into the live browser document.
#[derive(Clone, Default)]
pub struct WebHost {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for WebHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebHost")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl WebHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Result<&web_sys::Document, HostError> {
        self.inner.document.get_or_try_init(|| {
            window()?
                .document()
                .ok_or_else(|| HostError::Js("window has no document".to_string()))
        })
    }

    /// Number of handlers currently bound through this host.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Unbinds and drops the listeners of every element below `parent`.
    fn release_listeners_within(&self, parent: &web_sys::Node) {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|listener| {
            let elem: &web_sys::Node = listener.elem.as_ref();
            if elem.is_same_node(Some(parent)) || !parent.contains(Some(elem)) {
                true
            } else {
                listener.unbind();
                false
            }
        });
        tracing::trace!(released = before - listeners.len(), "released listeners");
    }
}

impl Host for WebHost {
    type Node = web_sys::Node;

    fn create_element(&self, tag: Tag) -> Result<Self::Node, HostError> {
        let elem = self
            .document()?
            .create_element(tag.as_str())
            .map_err(js_error)?;
        Ok(elem.into())
    }

    fn create_text(&self, value: &str) -> Result<Self::Node, HostError> {
        Ok(self.document()?.create_text_node(value).into())
    }

    fn set_attribute(&self, elem: &Self::Node, name: &str, value: &str) -> Result<(), HostError> {
        as_element(elem)?
            .set_attribute(name, value)
            .map_err(js_error)
    }

    fn remove_attribute(&self, elem: &Self::Node, name: &str) -> Result<(), HostError> {
        as_element(elem)?.remove_attribute(name).map_err(js_error)
    }

    fn set_text_content(&self, node: &Self::Node, value: &str) -> Result<(), HostError> {
        node.set_text_content(Some(value));
        Ok(())
    }

    fn text_content(&self, node: &Self::Node) -> Result<String, HostError> {
        Ok(node.text_content().unwrap_or_default())
    }

    fn add_listener(
        &self,
        elem: &Self::Node,
        event: Ev,
        handler: Handler,
    ) -> Result<(), HostError> {
        let elem = as_element(elem)?.clone();

        let mut listeners = self.inner.listeners.borrow_mut();
        if let Some(pos) = listeners
            .iter()
            .position(|l| l.event == event && l.elem.is_same_node(Some(elem.as_ref())))
        {
            listeners.swap_remove(pos).unbind();
        }

        let closure = Closure::<dyn Fn(web_sys::Event)>::wrap(Box::new(move |_: web_sys::Event| {
            handler.call(&Event::new(event));
        }));
        let listener = Listener {
            elem,
            event,
            closure,
        };
        listener
            .elem
            .add_event_listener_with_callback(event.as_str(), listener.function())
            .map_err(js_error)?;
        listeners.push(listener);
        Ok(())
    }

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError> {
        parent.append_child(child).map_err(js_error)?;
        Ok(())
    }

    fn clear_children(&self, parent: &Self::Node) -> Result<(), HostError> {
        self.release_listeners_within(parent);
        while let Some(child) = parent.last_child() {
            parent.remove_child(&child).map_err(js_error)?;
        }
        Ok(())
    }

    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>, HostError> {
        let found = self
            .document()?
            .query_selector(selector)
            .map_err(js_error)?;
        Ok(found.map(Into::into))
    }
}
