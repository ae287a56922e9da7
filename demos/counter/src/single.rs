//! Counter whose whole state is the count.

use hdom::{
    dom::{h, Element, Props, Tag},
    host::Host,
    props, Error, Handle, RenderLoop,
};

use crate::count::Count;

fn step_props(next: Option<Count>, handle: &Handle<Count>) -> Props {
    let mut props = props! { "disabled" => next.is_none() };
    if let Some(next) = next {
        props.insert("onclick", handle.on_set(next));
    }
    props
}

pub fn view(count: &Count, handle: &Handle<Count>) -> Element {
    h(
        Tag::Div,
        props! { "class" => "counter" },
        (
            h(Tag::Button, step_props(count.decrement(), handle), "-"),
            h(Tag::Span, props! { "class" => "count" }, count.get()),
            h(Tag::Button, step_props(count.increment(), handle), "+"),
        ),
    )
}

pub fn mount<H>(host: H, mount: H::Node, initial: Count) -> Result<RenderLoop<H, Count>, Error>
where
    H: Host + 'static,
    H::Node: 'static,
{
    RenderLoop::mount(host, mount, initial, view)
}
