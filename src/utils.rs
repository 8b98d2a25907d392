//! Output helpers for the `jscan` binary.

use anyhow::Context as _;
use colored::Colorize;
use serde_json::Value;
use std::io::{self, ErrorKind, Write};

use crate::scanner::JsonObject;

/// Sentinel reported for objects that lack the requested field.
pub const MISSING_FIELD: &str = "unknown";

/// Text reported for `field` of `object`: strings bare, any other value as
/// compact JSON, [`MISSING_FIELD`] when absent.
#[must_use]
pub fn field_label(object: &JsonObject, field: &str) -> String {
    match object.get(field) {
        None => MISSING_FIELD.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// How an object is rendered by [`write_object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Render {
    /// Indent nested values over several lines
    pub pretty: bool,
    /// Syntax-highlight with ANSI colors
    pub color: bool,
}

/// Returns `true` when a write failed only because the reader went away,
/// e.g. `jscan | head`.
#[must_use]
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|err| err.kind() == ErrorKind::BrokenPipe)
}

/// Write one report line, and the object itself if `render` is given.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails. A broken pipe keeps its
/// [`io::Error`] so callers can recognise it with [`is_broken_pipe`].
pub fn write_object<W: Write>(
    writer: &mut W,
    object: &JsonObject,
    field: &str,
    render: Option<Render>,
) -> anyhow::Result<()> {
    let result = (|| -> io::Result<()> {
        writeln!(writer, "Got object: {}", field_label(object, field))?;
        if let Some(render) = render {
            if render.color {
                write_colored_object(writer, object, 0, render.pretty)?;
            } else if render.pretty {
                serde_json::to_writer_pretty(&mut *writer, object)?;
            } else {
                serde_json::to_writer(&mut *writer, object)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    })();

    match result {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Err(err.into()),
        Err(err) => Err(err).context("write object to stdout"),
    }
}

/// Recursively write a JSON value with syntax highlighting.
fn write_colored_json<W: Write>(
    writer: &mut W,
    value: &Value,
    indent: usize,
    pretty: bool,
) -> io::Result<()> {
    let next_indent = indent + 2;

    match value {
        Value::Null => write!(writer, "{}", "null".red().dimmed()),
        Value::Bool(b) => {
            write!(writer, "{}", b.to_string().yellow().bold())
        }
        Value::Number(n) => write!(writer, "{}", n.to_string().yellow()),
        // `Display` on a string value yields it quoted and escaped.
        Value::String(_) => write!(writer, "{}", value.to_string().green()),
        Value::Array(arr) => {
            write!(writer, "[")?;
            for (i, item) in arr.iter().enumerate() {
                if pretty {
                    writeln!(writer)?;
                    write!(writer, "{:width$}", "", width = next_indent)?;
                }
                write_colored_json(writer, item, next_indent, pretty)?;
                if i + 1 < arr.len() {
                    write!(writer, ",")?;
                }
            }
            if pretty && !arr.is_empty() {
                writeln!(writer)?;
                write!(writer, "{:width$}", "", width = indent)?;
            }
            write!(writer, "]")
        }
        Value::Object(obj) => write_colored_object(writer, obj, indent, pretty),
    }
}

/// Write a JSON object with syntax highlighting, keys in map order.
fn write_colored_object<W: Write>(
    writer: &mut W,
    obj: &JsonObject,
    indent: usize,
    pretty: bool,
) -> io::Result<()> {
    let next_indent = indent + 2;

    write!(writer, "{{")?;
    for (i, (key, val)) in obj.iter().enumerate() {
        if pretty {
            writeln!(writer)?;
            write!(writer, "{:width$}", "", width = next_indent)?;
        }
        let quoted_key = Value::from(key.as_str()).to_string();
        write!(writer, "{}", quoted_key.cyan())?;
        write!(writer, "{}", if pretty { ": " } else { ":" })?;
        write_colored_json(writer, val, next_indent, pretty)?;
        if i + 1 < obj.len() {
            write!(writer, ",")?;
        }
    }
    if pretty && !obj.is_empty() {
        writeln!(writer)?;
        write!(writer, "{:width$}", "", width = indent)?;
    }
    write!(writer, "}}")
}
