//! Hierarchical logger names
//!
//! Names are dot-separated (`com.app.service`) with `$` marking a nested
//! segment (`com.app.Outer$Inner`). The root logger is stored under the empty
//! name and displayed as [`ROOT_LOGGER_NAME`].

/// Display name of the root logger
pub const ROOT_LOGGER_NAME: &str = "ROOT";

/// Map the external spellings of root onto the stored root name
#[inline]
pub fn normalize(name: &str) -> &str {
    if is_root(name) {
        ""
    } else {
        name
    }
}

#[inline]
pub fn is_root(name: &str) -> bool {
    name.is_empty() || name == ROOT_LOGGER_NAME
}

/// Name shown to callers: root becomes `ROOT`, everything else is unchanged
pub fn display_name(name: &str) -> &str {
    if is_root(name) {
        ROOT_LOGGER_NAME
    } else {
        name
    }
}

/// Parent of a normalized name, or `None` for root.
///
/// A `$` wins over any dot, so `a.Outer$Inner` has parent `a.Outer`.
pub fn parent(name: &str) -> Option<&str> {
    if name.is_empty() {
        return None;
    }
    if let Some(nested) = name.rfind('$') {
        return Some(&name[..nested]);
    }
    match name.rfind('.') {
        Some(idx) if idx > 0 => Some(&name[..idx]),
        _ => Some(""),
    }
}

/// The name itself followed by every ancestor, ending at root
pub fn ancestors(name: &str) -> Ancestors<'_> {
    Ancestors {
        next: Some(normalize(name)),
    }
}

pub struct Ancestors<'a> {
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = parent(current);
        Some(current)
    }
}
