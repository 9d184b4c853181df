use std::io::{Result, Write};

pub fn end<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"\n")
}

pub fn show_info<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"show info")
}

pub fn show_map<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"show map")
}

pub fn show_stat<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"show stat")
}

/// Write an arbitrary command line, terminating it unless the caller already did.
pub fn raw<W: Write>(w: &mut W, command: &str) -> Result<()> {
    w.write_all(command.as_bytes())?;
    if !command.ends_with('\n') {
        end(w)?;
    }
    Ok(())
}
