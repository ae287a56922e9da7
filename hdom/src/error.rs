use crate::host::NodeId;

/// Failure reported by a [`crate::host::Host`] implementation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("node {0:?} does not exist (or was removed)")]
    UnknownNode(NodeId),
    #[error("operation requires an element node")]
    NotAnElement,
    #[error("a node can not be appended to itself or to one of its descendants")]
    HierarchyRequest,
    #[error("unsupported selector '{0}'")]
    UnsupportedSelector(String),
    #[error("javascript error: {0}")]
    Js(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown tag name '{0}'")]
    UnknownTag(String),
    #[error("unknown event name '{0}'")]
    UnknownEvent(String),
    #[error("no mount point matches selector '{0}'")]
    MountNotFound(String),
    #[error(transparent)]
    Host(#[from] HostError),
}
