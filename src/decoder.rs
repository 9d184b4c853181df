//! Decode tabular responses into typed records.

use crate::errors::{Error, Result};
use crate::parsers::{self, TableFormat};
use crate::requests::Selector;
use crate::responses::{DynamicRecord, Value};
use crate::schema::{ColumnIndex, Field, FieldKind, Record};

/// Decodes CSV responses, such as the output of `show stat`, into records.
///
/// A decoder holds no state between calls: every call parses its own header and builds its own
/// column index, so one decoder may be shared across threads and response layouts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Decoder {
    format: TableFormat,
}

impl Decoder {
    pub fn new(format: TableFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &TableFormat {
        &self.format
    }

    /// Decode every row matching `selector` into an `R`, preserving row order.
    ///
    /// Decoding is all or nothing: any failure discards the records decoded so far.
    ///
    /// # Examples
    /// ```
    /// use hastat::decoder::Decoder;
    /// use hastat::models::Load;
    /// use hastat::requests::Selector;
    ///
    /// let input = b"# pxname,svname,scur,smax,status,chkdown,\nweb,web-1,3,9,UP,0,\n";
    /// let load: Vec<Load> = Decoder::default()
    ///     .decode(input, &Selector::proxy("web"))
    ///     .expect("Failed to decode");
    /// assert_eq!(load[0].current, 3);
    /// ```
    pub fn decode<R: Record>(&self, input: &[u8], selector: &Selector) -> Result<Vec<R>> {
        self.decode_rows(input, R::FIELDS, selector, |values| {
            let mut record = R::default();
            for (field, value) in R::FIELDS.iter().zip(values) {
                record.assign(field.name, value);
            }
            record
        })
    }

    /// Decode every row matching `selector` into an ordered field-to-value mapping.
    pub fn decode_dynamic(
        &self,
        input: &[u8],
        fields: &[Field],
        selector: &Selector,
    ) -> Result<Vec<DynamicRecord>> {
        self.decode_rows(input, fields, selector, |values| {
            let mut record = DynamicRecord::with_capacity(fields.len());
            for (field, value) in fields.iter().zip(values) {
                record.push(field.name, value);
            }
            record
        })
    }

    fn decode_rows<T, F>(
        &self,
        input: &[u8],
        fields: &[Field],
        selector: &Selector,
        mut build: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(Vec<Value>) -> T,
    {
        let table = parsers::parse_table(input, &self.format)?;
        let index = ColumnIndex::new(&table.header);
        let positions = index.resolve_fields(fields)?;
        let selector_position = index.resolve(&selector.column)?;

        let mut records = Vec::new();
        for (offset, row) in table.rows.iter().enumerate() {
            // The header is row 0.
            let row_number = offset + 1;

            if !selector.matches(cell(row, selector_position, row_number)?) {
                continue;
            }

            let mut values = Vec::with_capacity(fields.len());
            for (field, &position) in fields.iter().zip(&positions) {
                let text = cell(row, position, row_number)?;
                values.push(decode_cell(field, text, row_number)?);
            }
            records.push(build(values));
        }

        tracing::trace!(%selector, records = records.len(), "decoded rows");
        Ok(records)
    }
}

/// Decode with the default `show stat` header format.
pub fn decode<R: Record>(input: &[u8], selector: &Selector) -> Result<Vec<R>> {
    Decoder::default().decode(input, selector)
}

/// Decode without a record type, using the default `show stat` header format.
pub fn decode_dynamic(
    input: &[u8],
    fields: &[Field],
    selector: &Selector,
) -> Result<Vec<DynamicRecord>> {
    Decoder::default().decode_dynamic(input, fields, selector)
}

fn cell(row: &csv::StringRecord, position: usize, row_number: usize) -> Result<&str> {
    row.get(position).ok_or_else(|| {
        Error::MalformedInput(format!(
            "row {} has {} cells, expected at least {}",
            row_number,
            row.len(),
            position + 1
        ))
    })
}

fn decode_cell(field: &Field, text: &str, row_number: usize) -> Result<Value> {
    match field.kind {
        FieldKind::String => Ok(Value::String(text.to_owned())),
        FieldKind::Integer if text.is_empty() => Ok(Value::Integer(0)),
        FieldKind::Integer => text
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| Error::Value {
                field: field.name,
                row: row_number,
                value: text.to_owned(),
            }),
    }
}
