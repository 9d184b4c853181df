//! Static field tables binding record fields to named columns.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::errors::SchemaError;
use crate::responses::Value;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FieldKind {
    /// Base-10 signed integer; an empty cell decodes to zero.
    Integer,
    /// Cell text, taken verbatim.
    String,
}

/// One entry of a record's field table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Field {
    /// Logical name of the field on the record.
    pub name: &'static str,
    /// Header column the field is read from.
    pub column: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn integer(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            kind: FieldKind::Integer,
        }
    }

    pub const fn string(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            kind: FieldKind::String,
        }
    }
}

/// A record shape that can be decoded from a tabular response.
///
/// Implementors declare their field table once in `FIELDS`; the decoder starts from
/// `Default::default()` and hands every decoded cell to `assign` in table order.
///
/// # Examples
/// ```
/// use hastat::responses::Value;
/// use hastat::schema::{Field, Record};
///
/// #[derive(Debug, Default)]
/// struct Sessions {
///     server: String,
///     current: i64,
/// }
///
/// impl Record for Sessions {
///     const FIELDS: &'static [Field] = &[
///         Field::string("server", "svname"),
///         Field::integer("current", "scur"),
///     ];
///
///     fn assign(&mut self, field: &'static str, value: Value) {
///         match (field, value) {
///             ("server", Value::String(s)) => self.server = s,
///             ("current", Value::Integer(n)) => self.current = n,
///             _ => {}
///         }
///     }
/// }
/// ```
pub trait Record: Default {
    const FIELDS: &'static [Field];

    fn assign(&mut self, field: &'static str, value: Value);
}

/// Column name to position, built from one normalized header.
///
/// An index borrows the header it was built from, so it cannot outlive that response or be
/// applied to a different header layout.
#[derive(Clone, Debug)]
pub struct ColumnIndex<'a> {
    positions: HashMap<&'a str, usize>,
    duplicates: HashSet<&'a str>,
}

impl<'a> ColumnIndex<'a> {
    pub fn new(header: &'a [String]) -> Self {
        let mut positions = HashMap::with_capacity(header.len());
        let mut duplicates = HashSet::new();

        for (position, name) in header.iter().enumerate() {
            match positions.entry(name.as_str()) {
                Entry::Vacant(entry) => {
                    entry.insert(position);
                }
                Entry::Occupied(_) => {
                    duplicates.insert(name.as_str());
                }
            }
        }

        Self {
            positions,
            duplicates,
        }
    }

    /// Find the position of `column`, rejecting names that are absent or ambiguous.
    pub fn resolve(&self, column: &str) -> Result<usize, SchemaError> {
        if self.duplicates.contains(column) {
            return Err(SchemaError::DuplicateColumn(column.to_owned()));
        }
        self.positions
            .get(column)
            .copied()
            .ok_or_else(|| SchemaError::MissingColumn(column.to_owned()))
    }

    /// Resolve every field of a table, in table order.
    pub fn resolve_fields(&self, fields: &[Field]) -> Result<Vec<usize>, SchemaError> {
        fields.iter().map(|field| self.resolve(field.column)).collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
