//! CLI command implementations.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod expense;
pub mod goal;
pub mod stats;

use anyhow::Result;
use serde::Serialize;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Text formatter honoring `--no-color`.
pub(crate) fn text(cli: &Cli) -> TextFormatter {
    TextFormatter::new(!cli.no_color)
}

/// Prints `data` as JSON, or the text produced by `render`.
pub(crate) fn emit<T, F>(cli: &Cli, data: &T, render: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&TextFormatter) -> String,
{
    match cli.format {
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(data)?),
        OutputFormat::Text => println!("{}", render(&text(cli))),
    }
    Ok(())
}
