use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use super::Host;
use crate::{
    dom::{Ev, Event, Handler, Tag},
    html::escape,
    HostError,
};

/// Handle to a node of a [`MemoryDom`].
///
/// Slots of removed nodes are reused; the generation makes stale handles
/// fail with [`HostError::UnknownNode`] instead of aliasing a new node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

enum NodeKind {
    Element {
        tag: Tag,
        attributes: BTreeMap<String, String>,
        listeners: BTreeMap<Ev, Handler>,
    },
    Text(String),
}

struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Document {
    fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        doc.root = doc.alloc(NodeKind::Element {
            tag: Tag::Body,
            attributes: BTreeMap::new(),
            listeners: BTreeMap::new(),
        });
        doc
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let data = NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.data = Some(data);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                data: Some(data),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    fn get(&self, id: NodeId) -> Result<&NodeData, HostError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_ref())
            .ok_or(HostError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut NodeData, HostError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_mut())
            .ok_or(HostError::UnknownNode(id))
    }

    fn is_element(&self, id: NodeId) -> Result<bool, HostError> {
        Ok(matches!(self.get(id)?.kind, NodeKind::Element { .. }))
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> Result<bool, HostError> {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.get(id)?.parent;
        }
        Ok(false)
    }

    fn detach(&mut self, id: NodeId) -> Result<(), HostError> {
        if let Some(parent) = self.get_mut(id)?.parent.take() {
            self.get_mut(parent)?.children.retain(|c| *c != id);
        }
        Ok(())
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let slot = &mut self.slots[id.index as usize];
            if slot.generation != id.generation {
                continue;
            }
            if let Some(data) = slot.data.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                stack.extend(data.children);
            }
        }
    }

    fn remove_children(&mut self, parent: NodeId) -> Result<(), HostError> {
        let children = std::mem::take(&mut self.get_mut(parent)?.children);
        for child in children {
            self.free_subtree(child);
        }
        Ok(())
    }

    fn collect_text(&self, id: NodeId, out: &mut String) -> Result<(), HostError> {
        let data = self.get(id)?;
        match &data.kind {
            NodeKind::Text(value) => out.push_str(value),
            NodeKind::Element { .. } => {
                for child in &data.children {
                    self.collect_text(*child, out)?;
                }
            }
        }
        Ok(())
    }

    /// Pre-order walk over the descendants of `id`.
    fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>, HostError> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.get(id)?.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.get(id)?.children.iter().rev().copied());
        }
        Ok(out)
    }

    fn write_html(&self, id: NodeId, out: &mut String) -> Result<(), HostError> {
        let data = self.get(id)?;
        match &data.kind {
            NodeKind::Text(value) => out.push_str(&escape(value, false)),
            NodeKind::Element {
                tag, attributes, ..
            } => {
                out.push('<');
                out.push_str(tag.as_str());
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape(value, true));
                        out.push('"');
                    }
                }
                out.push('>');
                if tag.is_void() {
                    return Ok(());
                }
                for child in &data.children {
                    self.write_html(*child, out)?;
                }
                out.push_str("</");
                out.push_str(tag.as_str());
                out.push('>');
            }
        }
        Ok(())
    }
}

/// An in-memory document.
///
/// The document starts out with an empty `body` element as its root.
/// Clones share the same document.
#[derive(Clone)]
pub struct MemoryDom {
    doc: Rc<RefCell<Document>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDom")
            .field("nodes", &self.node_count())
            .finish()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        Self {
            doc: Rc::new(RefCell::new(Document::new())),
        }
    }

    pub fn body(&self) -> NodeId {
        self.doc.borrow().root
    }

    /// Appends an empty `<div id="{id}">` to the body.
    pub fn create_mount(&self, id: &str) -> Result<NodeId, HostError> {
        let elem = self.create_element(Tag::Div)?;
        self.set_attribute(&elem, "id", id)?;
        self.append_child(&self.body(), &elem)?;
        Ok(elem)
    }

    /// Number of live nodes, including the body.
    pub fn node_count(&self) -> usize {
        self.doc
            .borrow()
            .slots
            .iter()
            .filter(|slot| slot.data.is_some())
            .count()
    }

    /// Fires `event` on `node` the way a user interaction would.
    ///
    /// Mouse events on disabled elements are dropped. Returns whether a
    /// handler ran.
    pub fn dispatch(&self, node: NodeId, event: Ev) -> Result<bool, HostError> {
        self.dispatch_inner(node, event, false)
    }

    /// Like [`Self::dispatch`], but ignores the `disabled` attribute.
    pub fn force_dispatch(&self, node: NodeId, event: Ev) -> Result<bool, HostError> {
        self.dispatch_inner(node, event, true)
    }

    fn dispatch_inner(&self, node: NodeId, event: Ev, force: bool) -> Result<bool, HostError> {
        // The handler must run without the document borrowed, since it will
        // usually mutate the document.
        let handler = {
            let doc = self.doc.borrow();
            match &doc.get(node)?.kind {
                NodeKind::Element {
                    attributes,
                    listeners,
                    ..
                } => {
                    if !force && event.is_mouse() && attributes.contains_key("disabled") {
                        return Ok(false);
                    }
                    listeners.get(&event).cloned()
                }
                NodeKind::Text(_) => return Err(HostError::NotAnElement),
            }
        };

        match handler {
            Some(handler) => {
                handler.call(&Event::new(event));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>, HostError> {
        Ok(self.doc.borrow().get(node)?.parent)
    }

    pub fn children(&self, node: NodeId) -> Result<Vec<NodeId>, HostError> {
        Ok(self.doc.borrow().get(node)?.children.clone())
    }

    /// The tag of an element, or `None` for text nodes.
    pub fn tag(&self, node: NodeId) -> Result<Option<Tag>, HostError> {
        match self.doc.borrow().get(node)?.kind {
            NodeKind::Element { tag, .. } => Ok(Some(tag)),
            NodeKind::Text(_) => Ok(None),
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, HostError> {
        match &self.doc.borrow().get(node)?.kind {
            NodeKind::Element { attributes, .. } => Ok(attributes.get(name).cloned()),
            NodeKind::Text(_) => Err(HostError::NotAnElement),
        }
    }

    pub fn has_listener(&self, node: NodeId, event: Ev) -> Result<bool, HostError> {
        match &self.doc.borrow().get(node)?.kind {
            NodeKind::Element { listeners, .. } => Ok(listeners.contains_key(&event)),
            NodeKind::Text(_) => Err(HostError::NotAnElement),
        }
    }

    /// Returns `true` if the node is part of the tree below the body.
    pub fn is_connected(&self, node: NodeId) -> Result<bool, HostError> {
        let doc = self.doc.borrow();
        doc.is_inclusive_ancestor(doc.root, node)
    }

    /// All descendant elements of `node` with the given tag, in document
    /// order.
    pub fn find_all(&self, node: NodeId, tag: Tag) -> Result<Vec<NodeId>, HostError> {
        let doc = self.doc.borrow();
        let mut out = Vec::new();
        for id in doc.descendants(node)? {
            if let NodeKind::Element { tag: t, .. } = doc.get(id)?.kind {
                if t == tag {
                    out.push(id);
                }
            }
        }
        Ok(out)
    }

    pub fn outer_html(&self, node: NodeId) -> Result<String, HostError> {
        let mut out = String::new();
        self.doc.borrow().write_html(node, &mut out)?;
        Ok(out)
    }

    pub fn inner_html(&self, node: NodeId) -> Result<String, HostError> {
        let doc = self.doc.borrow();
        let mut out = String::new();
        for child in &doc.get(node)?.children {
            doc.write_html(*child, &mut out)?;
        }
        Ok(out)
    }
}

impl Host for MemoryDom {
    type Node = NodeId;

    fn create_element(&self, tag: Tag) -> Result<NodeId, HostError> {
        Ok(self.doc.borrow_mut().alloc(NodeKind::Element {
            tag,
            attributes: BTreeMap::new(),
            listeners: BTreeMap::new(),
        }))
    }

    fn create_text(&self, value: &str) -> Result<NodeId, HostError> {
        Ok(self
            .doc
            .borrow_mut()
            .alloc(NodeKind::Text(value.to_string())))
    }

    fn set_attribute(&self, elem: &NodeId, name: &str, value: &str) -> Result<(), HostError> {
        match &mut self.doc.borrow_mut().get_mut(*elem)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.insert(name.to_string(), value.to_string());
                Ok(())
            }
            NodeKind::Text(_) => Err(HostError::NotAnElement),
        }
    }

    fn remove_attribute(&self, elem: &NodeId, name: &str) -> Result<(), HostError> {
        match &mut self.doc.borrow_mut().get_mut(*elem)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.remove(name);
                Ok(())
            }
            NodeKind::Text(_) => Err(HostError::NotAnElement),
        }
    }

    fn set_text_content(&self, node: &NodeId, value: &str) -> Result<(), HostError> {
        let mut doc = self.doc.borrow_mut();
        if let NodeKind::Text(text) = &mut doc.get_mut(*node)?.kind {
            *text = value.to_string();
            return Ok(());
        }

        doc.remove_children(*node)?;
        if !value.is_empty() {
            let text = doc.alloc(NodeKind::Text(value.to_string()));
            doc.get_mut(text)?.parent = Some(*node);
            doc.get_mut(*node)?.children.push(text);
        }
        Ok(())
    }

    fn text_content(&self, node: &NodeId) -> Result<String, HostError> {
        let mut out = String::new();
        self.doc.borrow().collect_text(*node, &mut out)?;
        Ok(out)
    }

    fn add_listener(&self, elem: &NodeId, event: Ev, handler: Handler) -> Result<(), HostError> {
        match &mut self.doc.borrow_mut().get_mut(*elem)?.kind {
            NodeKind::Element { listeners, .. } => {
                listeners.insert(event, handler);
                Ok(())
            }
            NodeKind::Text(_) => Err(HostError::NotAnElement),
        }
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        let mut doc = self.doc.borrow_mut();
        if !doc.is_element(*parent)? {
            return Err(HostError::NotAnElement);
        }
        // Validates the child handle as well.
        doc.get(*child)?;
        if doc.is_inclusive_ancestor(*child, *parent)? {
            return Err(HostError::HierarchyRequest);
        }

        doc.detach(*child)?;
        doc.get_mut(*child)?.parent = Some(*parent);
        doc.get_mut(*parent)?.children.push(*child);
        Ok(())
    }

    fn clear_children(&self, parent: &NodeId) -> Result<(), HostError> {
        self.doc.borrow_mut().remove_children(*parent)
    }

    /// Supports `#id` and tag name selectors.
    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, HostError> {
        let selector = selector.trim();
        let doc = self.doc.borrow();

        let matches: Box<dyn Fn(&NodeKind) -> bool> = if let Some(id) = selector.strip_prefix('#')
        {
            if id.is_empty() {
                return Err(HostError::UnsupportedSelector(selector.to_string()));
            }
            let id = id.to_string();
            Box::new(move |kind| match kind {
                NodeKind::Element { attributes, .. } => {
                    attributes.get("id").map(|v| v == &id).unwrap_or(false)
                }
                NodeKind::Text(_) => false,
            })
        } else if let Some(tag) = Tag::from_name(&selector.to_ascii_lowercase()) {
            Box::new(move |kind| matches!(kind, NodeKind::Element { tag: t, .. } if *t == tag))
        } else {
            return Err(HostError::UnsupportedSelector(selector.to_string()));
        };

        if matches(&doc.get(doc.root)?.kind) {
            return Ok(Some(doc.root));
        }
        for id in doc.descendants(doc.root)? {
            if matches(&doc.get(id)?.kind) {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn dom() -> MemoryDom {
        MemoryDom::new()
    }

    #[rstest]
    fn builds_and_serializes(dom: MemoryDom) {
        let mount = dom.create_mount("app").unwrap();
        let button = dom.create_element(Tag::Button).unwrap();
        dom.set_attribute(&button, "disabled", "").unwrap();
        dom.set_attribute(&button, "title", "a\"b").unwrap();
        let text = dom.create_text("<+>").unwrap();
        dom.append_child(&button, &text).unwrap();
        dom.append_child(&mount, &button).unwrap();

        assert_eq!(
            dom.outer_html(mount).unwrap(),
            r#"<div id="app"><button disabled title="a&quot;b">&lt;+&gt;</button></div>"#
        );
        assert_eq!(dom.text_content(&mount).unwrap(), "<+>");
    }

    #[rstest]
    fn append_moves_nodes(dom: MemoryDom) {
        let a = dom.create_element(Tag::Div).unwrap();
        let b = dom.create_element(Tag::Div).unwrap();
        let child = dom.create_element(Tag::Span).unwrap();

        dom.append_child(&a, &child).unwrap();
        dom.append_child(&b, &child).unwrap();

        assert!(dom.children(a).unwrap().is_empty());
        assert_eq!(dom.children(b).unwrap(), vec![child]);
        assert_eq!(dom.parent(child).unwrap(), Some(b));
    }

    #[rstest]
    fn rejects_cycles(dom: MemoryDom) {
        let outer = dom.create_element(Tag::Div).unwrap();
        let inner = dom.create_element(Tag::Div).unwrap();
        dom.append_child(&outer, &inner).unwrap();

        assert_eq!(
            dom.append_child(&inner, &outer),
            Err(HostError::HierarchyRequest)
        );
        assert_eq!(
            dom.append_child(&outer, &outer),
            Err(HostError::HierarchyRequest)
        );
    }

    #[rstest]
    fn text_nodes_have_no_children(dom: MemoryDom) {
        let text = dom.create_text("x").unwrap();
        let span = dom.create_element(Tag::Span).unwrap();
        assert_eq!(
            dom.append_child(&text, &span),
            Err(HostError::NotAnElement)
        );
        assert_eq!(
            dom.set_attribute(&text, "id", "x"),
            Err(HostError::NotAnElement)
        );
    }

    #[rstest]
    fn clear_frees_subtrees(dom: MemoryDom) {
        let mount = dom.create_mount("app").unwrap();
        let baseline = dom.node_count();

        let div = dom.create_element(Tag::Div).unwrap();
        let span = dom.create_element(Tag::Span).unwrap();
        let text = dom.create_text("1").unwrap();
        dom.append_child(&span, &text).unwrap();
        dom.append_child(&div, &span).unwrap();
        dom.append_child(&mount, &div).unwrap();
        assert_eq!(dom.node_count(), baseline + 3);

        dom.clear_children(&mount).unwrap();
        assert_eq!(dom.node_count(), baseline);
        assert_eq!(dom.inner_html(mount).unwrap(), "");
        assert_eq!(dom.tag(span), Err(HostError::UnknownNode(span)));

        // The freed slot is reused, the stale handle stays invalid.
        let reused = dom.create_element(Tag::P).unwrap();
        assert_ne!(reused, div);
        assert_eq!(dom.tag(div), Err(HostError::UnknownNode(div)));
        assert_eq!(dom.tag(reused).unwrap(), Some(Tag::P));
    }

    #[rstest]
    fn set_text_content_on_elements(dom: MemoryDom) {
        let span = dom.create_element(Tag::Span).unwrap();
        let b = dom.create_element(Tag::B).unwrap();
        dom.append_child(&span, &b).unwrap();

        dom.set_text_content(&span, "7").unwrap();
        assert_eq!(dom.inner_html(span).unwrap(), "7");
        assert_eq!(dom.children(span).unwrap().len(), 1);

        dom.set_text_content(&span, "").unwrap();
        assert!(dom.children(span).unwrap().is_empty());
    }

    #[rstest]
    #[case("#app", true)]
    #[case("#other", false)]
    #[case("div", true)]
    #[case("body", true)]
    #[case("ul", false)]
    fn query_selector(dom: MemoryDom, #[case] selector: &str, #[case] found: bool) {
        dom.create_mount("app").unwrap();
        assert_eq!(dom.query_selector(selector).unwrap().is_some(), found);
    }

    #[rstest]
    #[case("")]
    #[case("#")]
    #[case(".counter")]
    #[case("div > span")]
    fn unsupported_selectors(dom: MemoryDom, #[case] selector: &str) {
        assert!(matches!(
            dom.query_selector(selector),
            Err(HostError::UnsupportedSelector(_))
        ));
    }

    #[rstest]
    fn query_selector_ignores_detached_nodes(dom: MemoryDom) {
        let detached = dom.create_element(Tag::Div).unwrap();
        dom.set_attribute(&detached, "id", "app").unwrap();
        assert_eq!(dom.query_selector("#app").unwrap(), None);
        assert!(!dom.is_connected(detached).unwrap());
    }

    #[rstest]
    fn dispatch_skips_disabled_elements(dom: MemoryDom) {
        let calls = Rc::new(Cell::new(0));
        let calls2 = calls.clone();
        let button = dom.create_element(Tag::Button).unwrap();
        dom.add_listener(
            &button,
            Ev::Click,
            Handler::from_fn(move || calls2.set(calls2.get() + 1)),
        )
        .unwrap();

        assert!(dom.dispatch(button, Ev::Click).unwrap());
        dom.set_attribute(&button, "disabled", "").unwrap();
        assert!(!dom.dispatch(button, Ev::Click).unwrap());
        assert!(dom.force_dispatch(button, Ev::Click).unwrap());
        assert!(!dom.dispatch(button, Ev::KeyDown).unwrap());
        assert_eq!(calls.get(), 2);
    }

    #[rstest]
    fn handlers_may_mutate_the_document(dom: MemoryDom) {
        let mount = dom.create_mount("app").unwrap();
        let button = dom.create_element(Tag::Button).unwrap();
        dom.append_child(&mount, &button).unwrap();

        let dom2 = dom.clone();
        dom.add_listener(
            &button,
            Ev::Click,
            Handler::from_fn(move || {
                dom2.clear_children(&mount).unwrap();
            }),
        )
        .unwrap();

        assert!(dom.dispatch(button, Ev::Click).unwrap());
        assert!(dom.children(mount).unwrap().is_empty());
    }

    #[rstest]
    fn find_all_in_document_order(dom: MemoryDom) {
        let root = dom.create_element(Tag::Div).unwrap();
        let first = dom.create_element(Tag::Span).unwrap();
        let nested = dom.create_element(Tag::P).unwrap();
        let second = dom.create_element(Tag::Span).unwrap();
        dom.append_child(&first, &nested).unwrap();
        dom.append_child(&root, &first).unwrap();
        dom.append_child(&root, &second).unwrap();

        assert_eq!(dom.find_all(root, Tag::Span).unwrap(), vec![first, second]);
        assert_eq!(dom.find_all(root, Tag::P).unwrap(), vec![nested]);
    }
}
