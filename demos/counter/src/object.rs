//! Counter with a record state, changed through partial patches.

use hdom::{
    dom::{
        builder::{button, div, span},
        Attr, Element, TagBuilder,
    },
    host::Host,
    Error, Handle, Merge, RenderLoop,
};

use crate::count::Count;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterState {
    pub count: Count,
    /// Rendered as the tooltip of the counter.
    pub label: String,
}

impl Default for CounterState {
    fn default() -> Self {
        Self {
            count: Count::MIN,
            label: "Counter".to_string(),
        }
    }
}

/// A partial [`CounterState`]. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CounterPatch {
    pub count: Option<Count>,
    pub label: Option<String>,
}

impl CounterPatch {
    pub fn count(count: Count) -> Self {
        Self {
            count: Some(count),
            ..Default::default()
        }
    }
}

impl Merge for CounterState {
    type Patch = CounterPatch;

    fn merge(&mut self, patch: CounterPatch) {
        if let Some(count) = patch.count {
            self.count = count;
        }
        if let Some(label) = patch.label {
            self.label = label;
        }
    }
}

fn step_button(text: &'static str, next: Option<Count>, handle: &Handle<CounterState>) -> TagBuilder {
    let btn = button().flag(Attr::Disabled, next.is_none()).and(text);
    match next {
        Some(next) => btn.on_click(handle.on_merge(CounterPatch::count(next))),
        None => btn,
    }
}

pub fn view(state: &CounterState, handle: &Handle<CounterState>) -> Element {
    let count = state.count;
    div()
        .class("counter")
        .attr(Attr::Title, state.label.as_str())
        .and((
            step_button("-", count.decrement(), handle),
            span().class("count").and(count.get()),
            step_button("+", count.increment(), handle),
        ))
        .build()
}

pub fn mount<H>(
    host: H,
    mount: H::Node,
    initial: CounterState,
) -> Result<RenderLoop<H, CounterState>, Error>
where
    H: Host + 'static,
    H::Node: 'static,
{
    RenderLoop::mount(host, mount, initial, view)
}
