// NOTE: this needs to be above the module definitions because otherwise the
// macro is not declared.

/// Defines an enum that maps to a fixed set of plain string values.
///
/// The generated enum can be converted to its string with `as_str` and looked
/// up by name with `from_name`. Used for the tag, attribute and event
/// vocabularies.
#[macro_export]
macro_rules! make_str_enum {
    (
        $(#[$meta:meta])*
        $enum_name:ident {
            $( $name:ident = $value:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $enum_name {
            $( $name, )*
        }

        impl $enum_name {
            /// All variants, in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$name, )* ];

            /// Convert to a string.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(
                        Self::$name => $value,
                    )*
                }
            }

            /// Look up a variant by its exact string value.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(
                        $value => Some(Self::$name),
                    )*
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
