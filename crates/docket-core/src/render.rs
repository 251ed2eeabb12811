use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use crate::calendar::CalendarEntry;
use crate::config::Config;
use crate::views::{ViewStats, VisibleRecord, is_due_soon};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, rows, today))]
    pub fn print_record_table(
        &mut self,
        rows: &[VisibleRecord<'_>],
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "#".to_string(),
            "Date".to_string(),
            "Client".to_string(),
            "Owner".to_string(),
            "Title".to_string(),
            "Status".to_string(),
            "Done".to_string(),
        ];

        let mut table_rows = Vec::with_capacity(rows.len());
        for row in rows {
            let record = row.record;
            let urgent = is_due_soon(record, today);

            let position = self.paint(&(row.position + 1).to_string(), "33");
            let date = if urgent {
                self.paint(&record.date, "31")
            } else {
                record.date.clone()
            };
            let done = if record.completed { "x" } else { "" };

            table_rows.push(vec![
                position,
                date,
                record.client.clone(),
                record.owner.clone(),
                record.title.clone(),
                record.status.label().to_string(),
                done.to_string(),
            ]);
        }

        write_table(&mut out, headers, table_rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, stats))]
    pub fn print_stats(&mut self, stats: &ViewStats) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "total      {}", stats.total)?;
        writeln!(out, "completed  {}", stats.completed)?;
        writeln!(out, "rate       {}%", stats.completion_rate)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, entries))]
    pub fn print_calendar(&mut self, entries: &[CalendarEntry]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec!["Date".to_string(), "Entry".to_string()];
        let rows = entries
            .iter()
            .map(|entry| vec![entry.date.clone(), entry.label.clone()])
            .collect();

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
