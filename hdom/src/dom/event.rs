use std::{rc::Rc, str::FromStr};

use crate::Error;

make_str_enum! {
    /// Event names a handler can be bound to.
    Ev {
        Blur = "blur",
        Change = "change",
        Click = "click",
        ContextMenu = "contextmenu",
        DblClick = "dblclick",
        Focus = "focus",
        Input = "input",
        KeyDown = "keydown",
        KeyPress = "keypress",
        KeyUp = "keyup",
        MouseDown = "mousedown",
        MouseEnter = "mouseenter",
        MouseLeave = "mouseleave",
        MouseMove = "mousemove",
        MouseOut = "mouseout",
        MouseOver = "mouseover",
        MouseUp = "mouseup",
        PointerDown = "pointerdown",
        PointerUp = "pointerup",
        Submit = "submit",
        Wheel = "wheel",
    }
}

impl Ev {
    /// Resolves a handler property key like `onclick` or `onClick`.
    ///
    /// Returns `None` if the key does not follow the `on<event>` convention
    /// or names an unknown event.
    pub fn from_prop_key(key: &str) -> Option<Self> {
        let name = key.strip_prefix("on")?;
        Self::from_name(&name.to_ascii_lowercase())
    }

    /// Mouse events are not delivered to disabled form controls.
    pub fn is_mouse(self) -> bool {
        matches!(
            self,
            Ev::Click
                | Ev::ContextMenu
                | Ev::DblClick
                | Ev::MouseDown
                | Ev::MouseEnter
                | Ev::MouseLeave
                | Ev::MouseMove
                | Ev::MouseOut
                | Ev::MouseOver
                | Ev::MouseUp
                | Ev::PointerDown
                | Ev::PointerUp
                | Ev::Wheel
        )
    }
}

impl FromStr for Ev {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(&s.to_ascii_lowercase()).ok_or_else(|| Error::UnknownEvent(s.to_string()))
    }
}

/// Event payload handed to a [`Handler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    kind: Ev,
}

impl Event {
    pub fn new(kind: Ev) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> Ev {
        self.kind
    }
}

/// A shared event handler closure.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Event)>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Event) + 'static,
    {
        Self(Rc::new(f))
    }

    /// Wraps a closure that does not care about the event payload.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self(Rc::new(move |_: &Event| f()))
    }

    #[inline]
    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    /// Returns `true` if both handlers share the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0) as *const u8,
            Rc::as_ptr(&other.0) as *const u8,
        )
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handler")
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("onclick", Some(Ev::Click))]
    #[case("onClick", Some(Ev::Click))]
    #[case("onkeydown", Some(Ev::KeyDown))]
    #[case("onfrobnicate", None)]
    #[case("click", None)]
    #[case("on", None)]
    fn prop_keys(#[case] key: &str, #[case] expected: Option<Ev>) {
        assert_eq!(Ev::from_prop_key(key), expected);
    }

    #[rstest]
    fn handler_identity() {
        let calls = Rc::new(Cell::new(0));
        let calls2 = calls.clone();
        let a = Handler::from_fn(move || calls2.set(calls2.get() + 1));
        let b = a.clone();
        let c = Handler::from_fn(|| {});

        assert_eq!(a, b);
        assert_ne!(a, c);

        b.call(&Event::new(Ev::Click));
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    fn handler_receives_event() {
        let seen = Rc::new(Cell::new(None));
        let seen2 = seen.clone();
        let handler = Handler::new(move |ev| seen2.set(Some(ev.kind())));
        handler.call(&Event::new(Ev::Input));
        assert_eq!(seen.get(), Some(Ev::Input));
    }

    #[rstest]
    #[case("click", Ev::Click)]
    #[case("KeyDown", Ev::KeyDown)]
    fn parses_event_names(#[case] name: &str, #[case] expected: Ev) {
        assert_eq!(name.parse::<Ev>(), Ok(expected));
    }

    #[rstest]
    fn unknown_event_name() {
        assert_eq!(
            "onclick".parse::<Ev>(),
            Err(Error::UnknownEvent("onclick".to_string()))
        );
    }
}
