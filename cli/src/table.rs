// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use colored::{Color, Colorize};
use unicode_width::UnicodeWidthStr;

/// A column of a [`Table`] over records of type `T`.
pub struct Column<T> {
    pub name: &'static str,
    pub padding: PaddingDirection,
    format: fn(&T) -> String,
    color: Option<fn(&T) -> Option<Color>>,
}

impl<T> Column<T> {
    pub fn new(name: &'static str, format: fn(&T) -> String) -> Self {
        Self {
            name,
            padding: PaddingDirection::Left,
            format,
            color: None,
        }
    }

    /// Aligns the column to the right, for numbers.
    #[must_use]
    pub fn right(mut self) -> Self {
        self.padding = PaddingDirection::Right;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: fn(&T) -> Option<Color>) -> Self {
        self.color = Some(color);
        self
    }

    fn format(&self, data: &T) -> String {
        (self.format)(data)
    }

    fn stylize(&self, data: &T, cell: &str, width: Option<usize>) -> String {
        let cell = match (width, self.padding) {
            (Some(width), PaddingDirection::Left) => format!("{cell}{}", pad(cell, width)),
            (Some(width), PaddingDirection::Right) => format!("{}{cell}", pad(cell, width)),
            (None, _) => cell.to_string(),
        };

        match self.color.and_then(|f| f(data)) {
            Some(color) => cell.color(color).to_string(),
            None => cell,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

/// Plain text table, one record per line.
pub struct Table<'a, T> {
    columns: &'a [Column<T>],
    data: &'a [T],
    separator: &'a str,
    header: bool,
}

impl<'a, T> Table<'a, T> {
    pub fn new(columns: &'a [Column<T>], data: &'a [T]) -> Self {
        Self {
            columns,
            data,
            separator: "  ",
            header: true,
        }
    }

    #[must_use]
    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }
}

impl<T> fmt::Display for Table<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .data
            .iter()
            .map(|row| self.columns.iter().map(|col| col.format(row)).collect())
            .collect();

        let mut widths: Vec<usize> = if self.header {
            self.columns.iter().map(|col| col.name.width()).collect()
        } else {
            vec![0; self.columns.len()]
        };
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        let last = self.columns.len().saturating_sub(1);
        // Last column does not need padding if it's left-aligned
        let width_of = |i: usize, col: &Column<T>| {
            (i != last || col.padding == PaddingDirection::Right)
                .then(|| widths.get(i).copied().unwrap_or_default())
        };

        if self.header {
            for (i, col) in self.columns.iter().enumerate() {
                let name = match width_of(i, col) {
                    Some(width) => format!("{}{}", col.name, pad(col.name, width)),
                    None => col.name.to_string(),
                };
                write!(f, "{}", name.bold())?;
                f.write_str(if i < last { self.separator } else { "\n" })?;
            }
        }

        for (row, data) in cells.iter().zip(self.data) {
            for (i, (col, cell)) in self.columns.iter().zip(row).enumerate() {
                write!(f, "{}", col.stylize(data, cell, width_of(i, col)))?;
                f.write_str(if i < last { self.separator } else { "\n" })?;
            }
        }
        Ok(())
    }
}

fn pad(cell: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(cell.width()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        size: u32,
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("Size", |a: &Row| a.size.to_string()).right(),
            Column::new("Name", |a: &Row| a.name.to_string()),
        ]
    }

    #[test]
    fn test_table_aligns_columns() {
        colored::control::set_override(false);
        let rows = [
            Row { name: "a.txt", size: 7 },
            Row { name: "日本.txt", size: 1024 },
        ];
        let columns = columns();
        let out = Table::new(&columns, &rows).to_string();
        assert_eq!(out, "Size  Name\n   7  a.txt\n1024  日本.txt\n");
    }

    #[test]
    fn test_table_without_header() {
        colored::control::set_override(false);
        let rows = [Row { name: "a", size: 1 }];
        let columns = columns();
        let out = Table::new(&columns, &rows).without_header().to_string();
        assert_eq!(out, "1  a\n");
    }
}
