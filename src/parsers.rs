use csv::{ReaderBuilder, StringRecord};

use crate::errors::{Error, SchemaError};

/// Shape of the header quirks in a tabular response.
///
/// HAProxy prefixes the header row with `# ` and terminates every row with a comma, which the
/// CSV reader sees as an extra empty column. The defaults describe `show stat`; other commands
/// may need different values.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TableFormat {
    /// Number of characters stripped from the first header cell.
    pub comment_prefix_len: usize,
    /// Number of columns dropped from the end of the header.
    pub trailing_columns: usize,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            comment_prefix_len: 2,
            trailing_columns: 1,
        }
    }
}

/// A parsed response: the normalized header and the data rows that follow it.
#[derive(Clone, Debug)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<StringRecord>,
}

/// Parse raw CSV bytes into a `Table`, normalizing the header row according to `format`.
pub fn parse_table(input: &[u8], format: &TableFormat) -> Result<Table, Error> {
    check_quotes(input)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => normalize_header(&record?, format)?,
        None => return Err(Error::MalformedInput("response contains no rows".into())),
    };
    let rows = records.collect::<Result<Vec<_>, csv::Error>>()?;

    tracing::trace!(columns = header.len(), rows = rows.len(), "parsed table");
    Ok(Table { header, rows })
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// A quote seen inside a quoted field: either the closing quote or the first half of `""`.
    QuoteInQuoted,
}

/// Reject quoting the CSV reader would otherwise accept leniently.
///
/// A quote may only open a field, a closing quote must be followed by a delimiter, a line end
/// or the end of input, and a quoted field must be closed.
fn check_quotes(input: &[u8]) -> Result<(), Error> {
    let mut state = QuoteState::FieldStart;
    let mut line = 1;

    for &byte in input {
        state = match (state, byte) {
            (QuoteState::Quoted, b'"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, b'"') => QuoteState::Quoted,
            (_, b',') | (_, b'\n') | (_, b'\r') => QuoteState::FieldStart,
            (QuoteState::FieldStart, b'"') => QuoteState::Quoted,
            (QuoteState::Unquoted, b'"') => {
                return Err(Error::MalformedInput(format!(
                    "stray quote in unquoted field on line {}",
                    line
                )));
            }
            (QuoteState::QuoteInQuoted, _) => {
                return Err(Error::MalformedInput(format!(
                    "unexpected text after closing quote on line {}",
                    line
                )));
            }
            (QuoteState::FieldStart, _) | (QuoteState::Unquoted, _) => QuoteState::Unquoted,
        };
        if byte == b'\n' {
            line += 1;
        }
    }

    if state == QuoteState::Quoted {
        return Err(Error::MalformedInput("unterminated quoted field".into()));
    }
    Ok(())
}

/// Strip the comment prefix from the first header cell and drop the trailing sentinel columns.
pub fn normalize_header(
    record: &StringRecord,
    format: &TableFormat,
) -> Result<Vec<String>, SchemaError> {
    let mut header: Vec<String> = record.iter().map(str::to_owned).collect();

    if let Some(first) = header.first_mut() {
        if first.chars().count() < format.comment_prefix_len {
            return Err(SchemaError::MissingCommentPrefix(first.clone()));
        }
        *first = first.chars().skip(format.comment_prefix_len).collect();
    }

    let keep = header.len().saturating_sub(format.trailing_columns);
    header.truncate(keep);

    if header.is_empty() {
        return Err(SchemaError::EmptyHeader);
    }
    Ok(header)
}
