//! The element model and the `h` factory.

mod attribute;
mod event;
mod node;
mod props;
mod tag;

pub use self::{
    attribute::Attr,
    event::{Ev, Event, Handler},
    node::{builder, h, Apply, AttrValue, Child, Element, TagBuilder},
    props::{PropValue, Props},
    tag::Tag,
};
