//! `view#fragment` addressing.

use std::fmt;

/// A parsed render address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address<'a> {
    pub view: &'a str,
    pub fragment: &'a str,
}

impl<'a> Address<'a> {
    /// Split `input` on the first `separator`.
    ///
    /// Without a separator the fragment is `root_name`. Once a separator is
    /// present the remainder names the fragment, even when it is empty. An
    /// empty separator disables fragment addressing.
    pub fn parse(input: &'a str, separator: &str, root_name: &'a str) -> Self {
        if !separator.is_empty()
            && let Some((view, fragment)) = input.split_once(separator)
        {
            return Self { view, fragment };
        }
        Self {
            view: input,
            fragment: root_name,
        }
    }
}

impl fmt::Display for Address<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.view, self.fragment)
    }
}
