use crate::{
    dom::{Child, Element},
    host::Host,
    HostError,
};

/// Creates host nodes for `element` and its subtree.
///
/// The returned node is not attached to any parent.
pub fn create<H: Host>(host: &H, element: &Element) -> Result<H::Node, HostError> {
    let elem = host.create_element(element.tag())?;

    // Set attributes.
    for (name, value) in element.attributes() {
        if let Some(value) = value.as_host_value() {
            host.set_attribute(&elem, name, value)?;
        }
    }

    // Add children.
    for child in element.children() {
        let node = match child {
            Child::Text(text) => host.create_text(text)?,
            Child::Element(child) => create(host, child)?,
        };
        host.append_child(&elem, &node)?;
    }

    // Add listeners.
    for (event, handler) in element.listeners() {
        host.add_listener(&elem, event, handler.clone())?;
    }

    Ok(elem)
}

/// Creates host nodes for `element` and appends them to `parent`.
pub fn render<H: Host>(host: &H, parent: &H::Node, element: &Element) -> Result<H::Node, HostError> {
    let elem = create(host, element)?;
    host.append_child(parent, &elem)?;
    Ok(elem)
}
