//! Key naming conventions.

/// How logical field names are turned into wire keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingConvention {
    /// Keys are written verbatim.
    AsIs,
    /// `camelCase` names are written as `snake_case`.
    #[default]
    SnakeCase,
}

impl NamingConvention {
    /// Apply the convention to a logical name.
    pub fn apply(&self, name: &str) -> String {
        match self {
            NamingConvention::AsIs => name.to_string(),
            NamingConvention::SnakeCase => to_snake_case(name),
        }
    }
}

/// Convert a `camelCase` identifier to `snake_case`.
///
/// An underscore is inserted before an upper-case letter that follows a
/// lower-case letter or a digit, so runs of capitals stay together.
/// Names that are already snake case pass through unchanged.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;

    for c in name.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    out
}
