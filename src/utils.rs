//! Miscellaneous utility functions.

use anyhow::Context as _;
use colored::Colorize;
use std::io::Write;
use std::io::{self, ErrorKind};

use crate::value::JsonValue;

/// Write a colorized JSON value (plus trailing newline) to `writer`.
/// Silently returns `Ok(())` on broken pipe so that piping to tools like
/// `less` or `head` exits cleanly.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_colored_value<W: Write>(
    writer: &mut W,
    value: &JsonValue,
    pretty: bool,
) -> anyhow::Result<()> {
    let result = (|| -> io::Result<()> {
        write_colored(writer, value, 0, pretty)?;
        writeln!(writer)?;
        Ok(())
    })();

    match result {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err).context("write colorized JSON to stdout"),
    }
}

/// Recursively write a JSON value with syntax highlighting.
fn write_colored<W: Write>(
    writer: &mut W,
    value: &JsonValue,
    indent: usize,
    pretty: bool,
) -> io::Result<()> {
    let next_indent = indent + 2;

    match value {
        JsonValue::Null => write!(writer, "{}", "null".red().dimmed()),
        JsonValue::Bool(flag) => {
            write!(writer, "{}", flag.to_string().yellow().bold())
        }
        JsonValue::Number(number) => {
            write!(writer, "{}", number.text().yellow())
        }
        JsonValue::String(text) => {
            // Re-serialize to get proper JSON escaping and quoting.
            let quoted = quote(text)?;
            write!(writer, "{}", quoted.green())
        }
        JsonValue::Array(items) => {
            write!(writer, "[")?;
            for (i, item) in items.iter().enumerate() {
                if pretty {
                    writeln!(writer)?;
                    write!(writer, "{:width$}", "", width = next_indent)?;
                }
                write_colored(writer, item, next_indent, pretty)?;
                if i < items.len() - 1 {
                    write!(writer, ",")?;
                }
            }
            if pretty && !items.is_empty() {
                writeln!(writer)?;
                write!(writer, "{:width$}", "", width = indent)?;
            }
            write!(writer, "]")
        }
        JsonValue::Object(members) => {
            write!(writer, "{{")?;
            let count = members.len();
            for (i, (key, member)) in members.iter().enumerate() {
                if pretty {
                    writeln!(writer)?;
                    write!(writer, "{:width$}", "", width = next_indent)?;
                }
                write!(writer, "{}", quote(key)?.cyan())?;
                if pretty {
                    write!(writer, ": ")?;
                } else {
                    write!(writer, ":")?;
                }
                write_colored(writer, member, next_indent, pretty)?;
                if i < count - 1 {
                    write!(writer, ",")?;
                }
            }
            if pretty && !members.is_empty() {
                writeln!(writer)?;
                write!(writer, "{:width$}", "", width = indent)?;
            }
            write!(writer, "}}")
        }
    }
}

/// Escape and quote a string through the writer.
fn quote(text: &str) -> io::Result<String> {
    crate::to_string(text).map_err(io::Error::other)
}
