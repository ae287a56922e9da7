//! The document-tree API elements are rendered into.

mod memory;

pub use self::memory::{MemoryDom, NodeId};

use crate::{
    dom::{Ev, Handler, Tag},
    HostError,
};

/// A document tree that elements can be rendered into.
///
/// Nodes are referred to by cheap, cloneable handles. All methods take
/// `&self`; implementations use interior mutability, since event handlers
/// run while the host is borrowed by the code that dispatched them.
pub trait Host {
    type Node: Clone + std::fmt::Debug;

    fn create_element(&self, tag: Tag) -> Result<Self::Node, HostError>;

    fn create_text(&self, value: &str) -> Result<Self::Node, HostError>;

    fn set_attribute(&self, elem: &Self::Node, name: &str, value: &str) -> Result<(), HostError>;

    fn remove_attribute(&self, elem: &Self::Node, name: &str) -> Result<(), HostError>;

    /// Replaces the text of a text node, or all children of an element with
    /// a single text node.
    fn set_text_content(&self, node: &Self::Node, value: &str) -> Result<(), HostError>;

    fn text_content(&self, node: &Self::Node) -> Result<String, HostError>;

    /// Binds `handler` to `event`. Binding the same event twice replaces the
    /// previous handler.
    fn add_listener(&self, elem: &Self::Node, event: Ev, handler: Handler)
        -> Result<(), HostError>;

    /// Moves `child` to the end of `parent`'s children.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    fn clear_children(&self, parent: &Self::Node) -> Result<(), HostError>;

    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>, HostError>;
}
