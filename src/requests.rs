//! Request types for decoding HAProxy responses.

use std::fmt::{self, Display};

/// Choose which data rows of a response are decoded.
///
/// A row is selected when its cell in `column` equals `value` exactly.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Selector {
    pub column: String,
    pub value: String,
}

impl Selector {
    pub fn new<C: Into<String>, V: Into<String>>(column: C, value: V) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Select every row belonging to the named frontend or backend.
    ///
    /// # Examples
    /// ```
    /// use hastat::requests::Selector;
    ///
    /// let selector = Selector::proxy("elastic-ocean");
    /// assert_eq!(selector.column, "pxname");
    /// assert!(selector.matches("elastic-ocean"));
    /// ```
    pub fn proxy<V: Into<String>>(name: V) -> Self {
        Self::new("pxname", name)
    }

    pub fn matches(&self, cell: &str) -> bool {
        cell == self.value
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.column, self.value)
    }
}
