// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aligned text table for the per-file compression report.
//!
//! Widths are counted in chars after truncation. Color wraps the padded
//! cell, so escape codes never shift the columns.

use crate::color;
use std::io::{self, Write};

const SEP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Muted,
    /// Colored by the leading status word
    Status,
}

pub struct Column {
    name: &'static str,
    align: Align,
    style: Style,
    max: Option<usize>,
}

impl Column {
    pub const fn new(name: &'static str, align: Align, style: Style) -> Self {
        Self {
            name,
            align,
            style,
            max: None,
        }
    }

    pub const fn left(name: &'static str) -> Self {
        Self::new(name, Align::Left, Style::Plain)
    }

    pub const fn right(name: &'static str) -> Self {
        Self::new(name, Align::Right, Style::Plain)
    }

    pub const fn muted(name: &'static str) -> Self {
        Self::new(name, Align::Left, Style::Muted)
    }

    pub const fn status(name: &'static str) -> Self {
        Self::new(name, Align::Left, Style::Status)
    }

    /// Cut cells longer than `max` chars
    pub const fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    fn fit<'a>(&self, text: &'a str) -> &'a str {
        match self.max.and_then(|max| text.char_indices().nth(max)) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    colorize: bool,
}

impl Table {
    pub fn new(columns: Vec<Column>, colorize: bool) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            colorize,
        }
    }

    /// Missing trailing cells render empty
    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Header plus rows; nothing at all when there are no rows
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        let widths = self.widths();
        let header: Vec<&str> = self.columns.iter().map(|col| col.name).collect();
        self.write_line(out, &widths, &header, true)?;
        for row in &self.rows {
            let cells: Vec<&str> = (0..self.columns.len())
                .map(|i| row.get(i).map_or("", String::as_str))
                .collect();
            self.write_line(out, &widths, &cells, false)?;
        }
        Ok(())
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| col.fit(cell).chars().count())
                    .fold(col.name.chars().count(), usize::max)
            })
            .collect()
    }

    fn write_line(
        &self,
        out: &mut impl Write,
        widths: &[usize],
        cells: &[&str],
        header: bool,
    ) -> io::Result<()> {
        let last = self.columns.len().saturating_sub(1);
        let mut line = String::new();
        for (i, (col, cell)) in self.columns.iter().zip(cells).enumerate() {
            if i > 0 {
                line.push_str(SEP);
            }
            let text = if header { cell } else { col.fit(cell) };
            let width = widths[i];
            // A left-aligned final column gets no trailing spaces
            let padded = match col.align {
                Align::Left if i == last => text.to_string(),
                Align::Left => format!("{text:<width$}"),
                Align::Right => format!("{text:>width$}"),
            };
            line.push_str(&self.paint(padded, col.style, header));
        }
        writeln!(out, "{line}")
    }

    fn paint(&self, text: String, style: Style, header: bool) -> String {
        if !self.colorize {
            return text;
        }
        match (header, style) {
            (true, _) => color::apply_header(&text),
            (false, Style::Plain) => text,
            (false, Style::Muted) => color::apply_muted(&text),
            (false, Style::Status) => color::apply_status(&text),
        }
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
