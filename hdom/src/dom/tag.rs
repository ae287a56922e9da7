use std::str::FromStr;

use crate::Error;

make_str_enum! {
    /// The element names known to the factory.
    Tag {
        A = "a",
        Article = "article",
        B = "b",
        Body = "body",
        Br = "br",
        Button = "button",
        Code = "code",
        Div = "div",
        Em = "em",
        Footer = "footer",
        Form = "form",
        H1 = "h1",
        H2 = "h2",
        H3 = "h3",
        Header = "header",
        Hr = "hr",
        I = "i",
        Img = "img",
        Input = "input",
        Label = "label",
        Li = "li",
        Main = "main",
        Nav = "nav",
        Ol = "ol",
        Option = "option",
        P = "p",
        Pre = "pre",
        Section = "section",
        Select = "select",
        Span = "span",
        Strong = "strong",
        Table = "table",
        Tbody = "tbody",
        Td = "td",
        TextArea = "textarea",
        Th = "th",
        Thead = "thead",
        Tr = "tr",
        Ul = "ul",
    }
}

impl Tag {
    /// Elements that never have children and serialize without a closing tag.
    pub fn is_void(self) -> bool {
        matches!(self, Tag::Br | Tag::Hr | Tag::Img | Tag::Input)
    }
}

impl FromStr for Tag {
    type Err = Error;

    /// Parses a tag name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(&s.to_ascii_lowercase()).ok_or_else(|| Error::UnknownTag(s.to_string()))
    }
}
