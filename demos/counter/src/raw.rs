//! Counter built with direct host calls and updated in place, without a
//! render loop.

use std::rc::Rc;

use hdom::{
    dom::{Attr, Ev, Handler, Tag},
    host::Host,
    HostError,
};

use crate::count::Count;

struct Parts<H: Host> {
    host: H,
    root: H::Node,
    value: H::Node,
    button: H::Node,
}

/// A mounted raw counter.
///
/// The click handler only holds a weak reference to the counter, so it stops
/// counting once the counter is dropped. Use [`RawCounter::detach`] to keep it
/// alive for the rest of the program.
pub struct RawCounter<H: Host> {
    parts: Rc<Parts<H>>,
}

impl<H: Host> RawCounter<H> {
    pub fn host(&self) -> &H {
        &self.parts.host
    }

    pub fn root(&self) -> &H::Node {
        &self.parts.root
    }

    /// The span holding the count.
    pub fn value(&self) -> &H::Node {
        &self.parts.value
    }

    pub fn button(&self) -> &H::Node {
        &self.parts.button
    }

    pub fn detach(self) {
        std::mem::forget(self);
    }
}

fn increment<H: Host>(parts: &Parts<H>) -> Result<(), HostError> {
    let host = &parts.host;
    let text = host.text_content(&parts.value)?;
    let current = match text.trim().parse::<i64>().ok().map(Count::new) {
        Some(Ok(count)) => count,
        _ => {
            tracing::warn!(%text, "counter text is not a count");
            return Ok(());
        }
    };

    if let Some(next) = current.increment() {
        host.set_text_content(&parts.value, &next.to_string())?;
        if !next.can_increment() {
            host.set_attribute(&parts.button, Attr::Disabled.as_str(), "")?;
        }
    }
    Ok(())
}

/// Appends `div [ span "0", button "+" ]` to `parent`.
pub fn mount<H>(host: H, parent: &H::Node) -> Result<RawCounter<H>, HostError>
where
    H: Host + 'static,
    H::Node: 'static,
{
    let root = host.create_element(Tag::Div)?;
    let value = host.create_element(Tag::Span)?;
    let text = host.create_text(&Count::MIN.to_string())?;
    host.append_child(&value, &text)?;

    let button = host.create_element(Tag::Button)?;
    let label = host.create_text("+")?;
    host.append_child(&button, &label)?;

    host.append_child(&root, &value)?;
    host.append_child(&root, &button)?;
    host.append_child(parent, &root)?;

    let parts = Rc::new(Parts {
        host,
        root,
        value,
        button,
    });

    let weak = Rc::downgrade(&parts);
    let handler = Handler::from_fn(move || match weak.upgrade() {
        Some(parts) => {
            if let Err(error) = increment(&parts) {
                tracing::error!(%error, "increment failed");
            }
        }
        None => tracing::warn!("Tried to increment a dropped counter"),
    });
    parts
        .host
        .add_listener(&parts.button, Ev::Click, handler)?;

    Ok(RawCounter { parts })
}
