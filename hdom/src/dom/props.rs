use std::borrow::Cow;

use super::Handler;

/// A value in a [`Props`] map.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Text(String),
    Bool(bool),
    Handler(Handler),
}

impl<'a> From<&'a str> for PropValue {
    fn from(v: &'a str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<'a> From<&'a String> for PropValue {
    fn from(v: &'a String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Handler> for PropValue {
    fn from(v: Handler) -> Self {
        Self::Handler(v)
    }
}

macro_rules! prop_value_from_display {
    ( $( $ty:ty ),* ) => {
        $(
            impl From<$ty> for PropValue {
                fn from(v: $ty) -> Self {
                    Self::Text(v.to_string())
                }
            }
        )*
    };
}

prop_value_from_display!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

/// The attributes and handlers passed to [`super::h`].
///
/// Keys are kept in insertion order. Inserting an existing key replaces its
/// value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    entries: Vec<(Cow<'static, str>, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<PropValue>) {
        let key = key.into();
        let value = value.into();
        // Linear search is fine, these maps are small.
        for (old_key, old_value) in &mut self.entries {
            if *old_key == key {
                *old_value = value;
                return;
            }
        }
        self.entries.push((key, value));
    }

    #[inline]
    pub fn with(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Props {
    type Item = (Cow<'static, str>, PropValue);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Builds a [`Props`] map.
///
/// ```rust
/// use hdom::{dom::Handler, props};
///
/// let props = props! {
///     "class" => "counter",
///     "disabled" => false,
///     "onclick" => Handler::from_fn(|| {}),
/// };
/// assert_eq!(props.len(), 3);
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::dom::Props::new()
    };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut props = $crate::dom::Props::new();
        $(
            props.insert($key, $value);
        )+
        props
    }};
}
