use std::{borrow::Cow, collections::BTreeMap, fmt};

use super::{Attr, Ev, Handler, PropValue, Props, Tag};
use crate::html::escape;

/// Value of a plain attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    /// Boolean attributes are present (empty value) when `true` and absent
    /// when `false`.
    Bool(bool),
}

impl AttrValue {
    /// The value written to the host, or `None` if the attribute is absent.
    pub fn as_host_value(&self) -> Option<&str> {
        match self {
            AttrValue::Text(value) => Some(value.as_str()),
            AttrValue::Bool(true) => Some(""),
            AttrValue::Bool(false) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    Text(String),
    Element(Element),
}

impl From<Element> for Child {
    fn from(e: Element) -> Self {
        Self::Element(e)
    }
}

impl From<String> for Child {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<'a> From<&'a str> for Child {
    fn from(v: &'a str) -> Self {
        Self::Text(v.to_string())
    }
}

/// An unattached element node.
///
/// Attributes and handlers are kept in ordered maps, so the order in which
/// they were assigned does not affect equality or rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    tag: Tag,
    attributes: BTreeMap<Cow<'static, str>, AttrValue>,
    listeners: BTreeMap<Ev, Handler>,
    children: Vec<Child>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: BTreeMap::new(),
            listeners: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Returns `true` if the attribute would be present on the host element.
    pub fn has_flag(&self, name: &str) -> bool {
        self.attribute(name)
            .map(|v| v.as_host_value().is_some())
            .unwrap_or(false)
    }

    pub fn listener(&self, event: Ev) -> Option<&Handler> {
        self.listeners.get(&event)
    }

    pub fn listeners(&self) -> impl Iterator<Item = (Ev, &Handler)> {
        self.listeners.iter().map(|(ev, h)| (*ev, h))
    }

    #[inline]
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Child::Element(e) => Some(e),
            Child::Text(_) => None,
        })
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Child::Text(t) => out.push_str(t),
                Child::Element(e) => e.collect_text(out),
            }
        }
    }

    /// All descendants with the given tag, in document order.
    pub fn find_all(&self, tag: Tag) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_tag(tag, &mut out);
        out
    }

    fn collect_tag<'a>(&'a self, tag: Tag, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.tag == tag {
                out.push(child);
            }
            child.collect_tag(tag, out);
        }
    }

    /// Compares tag, attributes, bound events and children.
    ///
    /// Unlike `==`, handlers only have to be bound to the same events, not
    /// share the same closure.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.attributes == other.attributes
            && self.listeners.keys().eq(other.listeners.keys())
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|pair| match pair {
                    (Child::Text(a), Child::Text(b)) => a == b,
                    (Child::Element(a), Child::Element(b)) => a.structurally_eq(b),
                    _ => false,
                })
    }
}

/// Serializes the element as HTML. Handlers are not serialized.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            match value.as_host_value() {
                Some("") => write!(f, " {}", name)?,
                Some(value) => {
                    write!(f, " {}=\"{}\"", name, escape(value, true))?;
                }
                None => {}
            }
        }
        f.write_str(">")?;
        if self.tag.is_void() {
            return Ok(());
        }
        for child in &self.children {
            match child {
                Child::Text(t) => f.write_str(&escape(t, false))?,
                Child::Element(e) => write!(f, "{}", e)?,
            }
        }
        write!(f, "</{}>", self.tag)
    }
}

pub struct TagBuilder {
    elem: Element,
}

impl TagBuilder {
    pub fn new(tag: Tag) -> Self {
        Self {
            elem: Element::new(tag),
        }
    }

    #[inline]
    pub fn elem(&self) -> &Element {
        &self.elem
    }

    // Attributes.

    pub fn add_attr(&mut self, attr: Attr, value: impl Into<String>) {
        self.elem
            .attributes
            .insert(attr.as_str().into(), AttrValue::Text(value.into()));
    }

    #[inline]
    pub fn attr(mut self, attr: Attr, value: impl Into<String>) -> Self {
        self.add_attr(attr, value);
        self
    }

    pub fn attr_if(self, flag: bool, attr: Attr, value: impl Into<String>) -> Self {
        if flag {
            self.attr(attr, value)
        } else {
            self
        }
    }

    pub fn add_flag(&mut self, attr: Attr, value: bool) {
        self.elem
            .attributes
            .insert(attr.as_str().into(), AttrValue::Bool(value));
    }

    /// Sets a boolean attribute like `disabled`.
    #[inline]
    pub fn flag(mut self, attr: Attr, value: bool) -> Self {
        self.add_flag(attr, value);
        self
    }

    pub fn attr_toggle_if(self, flag: bool, attr: Attr) -> Self {
        if flag {
            self.flag(attr, true)
        } else {
            self
        }
    }

    #[inline]
    pub fn class(self, cls: impl Into<String>) -> Self {
        self.attr(Attr::Class, cls)
    }

    /// Adds an entry of a [`Props`] map.
    ///
    /// Handlers under an `on<event>` key are bound to that event, every
    /// other value becomes a plain attribute.
    pub fn add_prop(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<PropValue>) {
        let key = key.into();
        match value.into() {
            PropValue::Handler(handler) => match Ev::from_prop_key(&key) {
                Some(event) => {
                    self.elem.listeners.insert(event, handler);
                }
                None => {
                    tracing::debug!(tag=%self.elem.tag, key=%key, "skipping handler for unknown event");
                }
            },
            PropValue::Text(value) => {
                self.elem.attributes.insert(key, AttrValue::Text(value));
            }
            PropValue::Bool(value) => {
                self.elem.attributes.insert(key, AttrValue::Bool(value));
            }
        }
    }

    #[inline]
    pub fn prop(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<PropValue>) -> Self {
        self.add_prop(key, value);
        self
    }

    pub fn add_props(&mut self, props: Props) {
        for (key, value) in props {
            self.add_prop(key, value);
        }
    }

    #[inline]
    pub fn props(mut self, props: Props) -> Self {
        self.add_props(props);
        self
    }

    // Events.

    /// Binds `handler` to `event`, replacing a previous handler for it.
    pub fn add_listener(&mut self, event: Ev, handler: Handler) {
        self.elem.listeners.insert(event, handler);
    }

    #[inline]
    pub fn on(mut self, event: Ev, handler: Handler) -> Self {
        self.add_listener(event, handler);
        self
    }

    #[inline]
    pub fn on_click(self, handler: Handler) -> Self {
        self.on(Ev::Click, handler)
    }

    // Children.

    pub fn add_child(&mut self, child: impl Into<Child>) {
        self.elem.children.push(child.into());
    }

    pub fn add_text(&mut self, value: impl Into<String>) {
        self.elem.children.push(Child::Text(value.into()));
    }

    #[inline]
    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.add_text(value);
        self
    }

    #[inline]
    pub fn and<A: Apply>(mut self, item: A) -> Self {
        item.apply(&mut self);
        self
    }

    pub fn and_if<A, F>(mut self, flag: bool, f: F) -> Self
    where
        A: Apply,
        F: FnOnce() -> A,
    {
        if flag {
            f().apply(&mut self);
        }
        self
    }

    pub fn add_iter<A: Apply, I: IntoIterator<Item = A>>(&mut self, iter: I) {
        for item in iter {
            item.apply(self);
        }
    }

    #[inline]
    pub fn and_iter<A: Apply, I: IntoIterator<Item = A>>(mut self, iter: I) -> Self {
        self.add_iter(iter);
        self
    }

    #[inline]
    pub fn build(self) -> Element {
        self.elem
    }
}

impl From<TagBuilder> for Element {
    fn from(b: TagBuilder) -> Self {
        b.build()
    }
}

/// Something that can be appended to an element under construction.
pub trait Apply {
    fn apply(self, tag: &mut TagBuilder);
}

impl<'a> Apply for &'a str {
    fn apply(self, tag: &mut TagBuilder) {
        tag.add_text(self);
    }
}

impl<'a> Apply for &'a String {
    fn apply(self, tag: &mut TagBuilder) {
        tag.add_text(self.as_str());
    }
}

impl Apply for String {
    fn apply(self, tag: &mut TagBuilder) {
        tag.add_text(self);
    }
}

impl Apply for Element {
    fn apply(self, tag: &mut TagBuilder) {
        tag.add_child(self);
    }
}

impl Apply for TagBuilder {
    fn apply(self, tag: &mut TagBuilder) {
        tag.add_child(self.build());
    }
}

impl Apply for Child {
    fn apply(self, tag: &mut TagBuilder) {
        tag.add_child(self);
    }
}

impl Apply for () {
    fn apply(self, _tag: &mut TagBuilder) {}
}

impl<A: Apply> Apply for Option<A> {
    fn apply(self, tag: &mut TagBuilder) {
        if let Some(inner) = self {
            inner.apply(tag);
        }
    }
}

impl<A: Apply> Apply for Vec<A> {
    fn apply(self, tag: &mut TagBuilder) {
        tag.add_iter(self);
    }
}

macro_rules! apply_display {
    ( $( $ty:ty ),* ) => {
        $(
            impl Apply for $ty {
                fn apply(self, tag: &mut TagBuilder) {
                    tag.add_text(self.to_string());
                }
            }
        )*
    };
}

apply_display!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64, char);

macro_rules! apply_tuple {
    ( $( $name:ident )+ ) => {
        impl<$( $name: Apply ),+> Apply for ( $( $name, )+ ) {
            #[allow(non_snake_case)]
            fn apply(self, tag: &mut TagBuilder) {
                let ( $( $name, )+ ) = self;
                $( $name.apply(tag); )+
            }
        }
    };
}

apply_tuple!(A1);
apply_tuple!(A1 A2);
apply_tuple!(A1 A2 A3);
apply_tuple!(A1 A2 A3 A4);
apply_tuple!(A1 A2 A3 A4 A5);
apply_tuple!(A1 A2 A3 A4 A5 A6);
apply_tuple!(A1 A2 A3 A4 A5 A6 A7);
apply_tuple!(A1 A2 A3 A4 A5 A6 A7 A8);

/// Creates a new, unattached element.
///
/// `props` keys of the form `on<event>` holding a [`Handler`] are bound as
/// event handlers; all other entries become attributes. `children` are
/// appended in order.
///
/// ```rust
/// use hdom::{dom::{h, Tag}, props};
///
/// let count = 3;
/// let view = h(Tag::Div, props! {}, (h(Tag::Span, props! {}, count), "!"));
/// assert_eq!(view.to_string(), "<div><span>3</span>!</div>");
/// ```
pub fn h(tag: Tag, props: Props, children: impl Apply) -> Element {
    let mut builder = TagBuilder::new(tag);
    builder.add_props(props);
    children.apply(&mut builder);
    builder.build()
}

pub mod builder {
    use super::{Tag, TagBuilder};

    #[inline]
    pub fn tag(tag: Tag) -> TagBuilder {
        TagBuilder::new(tag)
    }

    #[inline]
    pub fn div() -> TagBuilder {
        TagBuilder::new(Tag::Div)
    }

    #[inline]
    pub fn span() -> TagBuilder {
        TagBuilder::new(Tag::Span)
    }

    #[inline]
    pub fn button() -> TagBuilder {
        TagBuilder::new(Tag::Button)
    }

    #[inline]
    pub fn p() -> TagBuilder {
        TagBuilder::new(Tag::P)
    }

    #[inline]
    pub fn h1() -> TagBuilder {
        TagBuilder::new(Tag::H1)
    }

    #[inline]
    pub fn ul() -> TagBuilder {
        TagBuilder::new(Tag::Ul)
    }

    #[inline]
    pub fn li() -> TagBuilder {
        TagBuilder::new(Tag::Li)
    }

    #[inline]
    pub fn input() -> TagBuilder {
        TagBuilder::new(Tag::Input)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{builder::*, *};
    use crate::props;

    #[rstest]
    fn identical_arguments_build_equivalent_nodes() {
        let handler = Handler::from_fn(|| {});
        let build = || {
            h(
                Tag::Button,
                props! { "onclick" => handler.clone(), "disabled" => false, "class" => "inc" },
                "+",
            )
        };

        let a = build();
        let b = build();
        assert_eq!(a, b);
        assert!(a.structurally_eq(&b));
        assert!(!std::ptr::eq(&a, &b));
    }

    #[rstest]
    fn fresh_handlers_are_structurally_equal_only() {
        let make = || h(Tag::Button, props! { "onclick" => Handler::from_fn(|| {}) }, ());
        let a = make();
        let b = make();
        assert_ne!(a, b);
        assert!(a.structurally_eq(&b));
    }

    #[rstest]
    fn on_prefixed_handlers_become_listeners() {
        let elem = h(
            Tag::Button,
            props! {
                "onclick" => Handler::from_fn(|| {}),
                "onMouseOver" => Handler::from_fn(|| {}),
                "title" => "t",
            },
            (),
        );

        let events: Vec<_> = elem.listeners().map(|(ev, _)| ev).collect();
        assert_eq!(events, vec![Ev::Click, Ev::MouseOver]);
        assert_eq!(elem.attribute("onclick"), None);
        assert_eq!(elem.attribute("title"), Some(&AttrValue::Text("t".into())));
    }

    #[rstest]
    fn handler_under_unknown_key_is_skipped() {
        let elem = h(
            Tag::Div,
            props! { "onfrobnicate" => Handler::from_fn(|| {}), "data" => Handler::from_fn(|| {}) },
            (),
        );
        assert_eq!(elem.listeners().count(), 0);
        assert_eq!(elem.attributes().count(), 0);
    }

    #[rstest]
    fn on_prefixed_text_is_a_plain_attribute() {
        let elem = h(Tag::Div, props! { "onclick" => "alert(1)" }, ());
        assert!(elem.listener(Ev::Click).is_none());
        assert_eq!(
            elem.attribute("onclick"),
            Some(&AttrValue::Text("alert(1)".into()))
        );
    }

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn boolean_attributes(#[case] value: bool, #[case] present: bool) {
        let elem = h(Tag::Button, props! { "disabled" => value }, ());
        assert_eq!(elem.has_flag("disabled"), present);
    }

    #[rstest]
    fn assignment_order_does_not_matter() {
        let a = h(Tag::Div, props! { "id" => "x", "title" => "y" }, ());
        let b = h(Tag::Div, props! { "title" => "y", "id" => "x" }, ());
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[rstest]
    fn children_keep_their_order() {
        let elem = h(
            Tag::Div,
            props! {},
            (button().text("-"), h(Tag::Span, props! {}, 5), "tail", 1.5),
        );

        assert_eq!(
            elem.to_string(),
            "<div><button>-</button><span>5</span>tail1.5</div>"
        );
        assert_eq!(elem.text_content(), "-5tail1.5");
        assert_eq!(elem.child_elements().count(), 2);
    }

    #[rstest]
    fn optional_and_repeated_children() {
        let items = vec!["a", "b"];
        let elem = ul()
            .and_iter(items.into_iter().map(|i| li().text(i)))
            .and(Option::<Element>::None)
            .and_if(true, || li().text("c"))
            .and_if(false, || li().text("d"))
            .build();

        let texts: Vec<_> = elem
            .find_all(Tag::Li)
            .into_iter()
            .map(|li| li.text_content())
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[rstest]
    fn display_escapes_and_skips_false_flags() {
        let elem = div()
            .attr(Attr::Title, "a \"b\" & c")
            .flag(Attr::Hidden, false)
            .flag(Attr::Disabled, true)
            .text("<x>")
            .and(input().attr(Attr::Value, "v"))
            .build();

        assert_eq!(
            elem.to_string(),
            r#"<div disabled title="a &quot;b&quot; &amp; c">&lt;x&gt;<input value="v"></div>"#
        );
    }

    #[rstest]
    fn builder_and_factory_agree() {
        let handler = Handler::from_fn(|| {});
        let a = button()
            .flag(Attr::Disabled, true)
            .on_click(handler.clone())
            .text("+")
            .build();
        let b = h(
            Tag::Button,
            props! { "disabled" => true, "onclick" => handler },
            "+",
        );
        assert_eq!(a, b);
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn conditional_attributes(#[case] on: bool) {
        let elem = input()
            .attr_if(on, Attr::Placeholder, "count")
            .attr_toggle_if(on, Attr::Disabled)
            .build();

        assert_eq!(
            elem.attribute("placeholder"),
            on.then(|| AttrValue::Text("count".to_string())).as_ref()
        );
        assert_eq!(elem.has_flag("disabled"), on);
        assert_eq!(elem.attributes().count(), if on { 2 } else { 0 });
    }
}
