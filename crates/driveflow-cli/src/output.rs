//! Output management and formatting.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::ListFormat;
use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    ///
    /// `--output-format` wins over `output.format`; `auto` in either place
    /// resolves to Human on a TTY and Plain otherwise.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => OutputFormat::from_config(&config.output.format),
            explicit => explicit,
        };
        let is_tty = io::stdout().is_terminal();
        let resolved_format = match requested {
            OutputFormat::Auto if is_tty => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human
                || !is_tty,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Command result meant for pipes.  Written even in quiet mode.
    pub fn data(&self, msg: &str) -> io::Result<()> {
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  *Not* suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Spinner on stderr while a slow step runs.  Hidden when quiet or
    /// when stderr is not a terminal.
    pub fn spinner(&self, msg: &'static str) -> ProgressBar {
        if self.quiet || !io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner());
        spinner.set_message(msg);
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }

    /// Render a list of records in the requested format.
    ///
    /// `--output-format json` forces JSON regardless of `--format`.
    pub fn listing<T: Serialize>(
        &self,
        format: ListFormat,
        listing: &Listing<'_, T>,
    ) -> io::Result<()> {
        let format = if self.resolved_format == OutputFormat::Json {
            ListFormat::Json
        } else {
            format
        };

        match format {
            ListFormat::Table => {
                self.header(listing.title)?;
                if listing.rows.is_empty() {
                    return self.info("No records.");
                }
                for line in listing.table_lines() {
                    self.print(&line)?;
                }
                Ok(())
            }
            // Machine formats bypass quiet so pipes always get data.
            ListFormat::List => {
                for label in &listing.labels {
                    self.data(label)?;
                }
                Ok(())
            }
            ListFormat::Csv => {
                for line in listing.csv_lines() {
                    self.data(&line)?;
                }
                Ok(())
            }
            ListFormat::Json => {
                let json = serde_json::to_string_pretty(listing.records)
                    .map_err(io::Error::other)?;
                self.data(&json)
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

/// Records prepared for [`OutputManager::listing`].
pub struct Listing<'a, T> {
    pub title: &'static str,
    pub headers: &'static [&'static str],
    /// One cell per header, per record.
    pub rows: Vec<Vec<String>>,
    /// Short label per record, for `--format list`.
    pub labels: Vec<String>,
    /// Serialised as-is for `--format json`.
    pub records: &'a [T],
}

impl<T> Listing<'_, T> {
    /// Space-padded columns, header first.
    fn table_lines(&self) -> Vec<String> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(pad_row(self.headers.iter().copied(), &widths));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &self.rows {
            lines.push(pad_row(row.iter().map(String::as_str), &widths));
        }
        lines
    }

    fn csv_lines(&self) -> Vec<String> {
        std::iter::once(self.headers.iter().map(|h| csv_field(h)).collect::<Vec<_>>())
            .chain(
                self.rows
                    .iter()
                    .map(|row| row.iter().map(|c| csv_field(c)).collect()),
            )
            .map(|fields| fields.join(","))
            .collect()
    }
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Quote a CSV field when it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
