make_str_enum! {
    /// Common attribute names for the typed builder methods.
    ///
    /// Arbitrary names can still be set through [`super::TagBuilder::prop`].
    Attr {
        AriaLabel = "aria-label",
        Checked = "checked",
        Class = "class",
        Disabled = "disabled",
        For = "for",
        Hidden = "hidden",
        Href = "href",
        Id = "id",
        Name = "name",
        Placeholder = "placeholder",
        Role = "role",
        Src = "src",
        Style = "style",
        TabIndex = "tabindex",
        Title = "title",
        Type = "type",
        Value = "value",
    }
}
