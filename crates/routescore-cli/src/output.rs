//! Output rendering for command results.

use std::io::{self, Write};

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Pretty-printed JSON document.
    Json,
}

/// A command result that can be written in either format.
pub trait Render: Serialize {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Write `value` to stdout in the requested format.
pub fn emit<T: Render>(value: &T, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => value.render_text(&mut out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Format a cost for text output.
pub fn format_cost(cost: f64) -> String {
    format!("{:.4}", cost)
}
