//! List view: renders a store snapshot as a table and emits row intents.

use crate::controller::CrudIntents;
use crate::error::{Error, Result};
use crate::records::{Equipo, Persona, Record};

/// Row-level action requested from the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListIntent {
    Create,
    /// 0-based positions.
    Edit(usize),
    View(usize),
    Delete(usize),
}

/// Tabular projection of a record.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl TableRow for Persona {
    fn headers() -> &'static [&'static str] {
        &["Document", "Name", "Email", "Phone", "Type", "Equipment"]
    }

    fn cells(&self) -> Vec<String> {
        let document = match self.document_type {
            Some(kind) => format!("{} {}", kind.code(), self.document_number),
            None => self.document_number.clone(),
        };
        let equipment = self
            .equipment
            .iter()
            .map(|assignment| assignment.label.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            document.trim().to_string(),
            self.full_name(),
            self.email.clone(),
            self.phone.clone(),
            self.person_type
                .map(|p| p.display_name().to_string())
                .unwrap_or_default(),
            equipment,
        ]
    }
}

impl TableRow for Equipo {
    fn headers() -> &'static [&'static str] {
        &["Brand", "Serial", "Accessories", "Registered", "Color"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.brand.clone(),
            self.serial.clone(),
            self.accessories.clone(),
            self.registered_at(),
            self.color.clone(),
        ]
    }
}

/// Snapshot of a store handed down for rendering.
#[derive(Debug, Clone)]
pub struct ListView<R> {
    rows: Vec<R>,
}

impl<R: Record + TableRow> ListView<R> {
    pub fn from_records(records: &[R]) -> Self {
        Self {
            rows: records.to_vec(),
        }
    }

    /// Plain-text table with a 1-based row column.
    pub fn render(&self) -> String {
        let mut header = vec!["#".to_string()];
        header.extend(R::headers().iter().map(|h| h.to_string()));

        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .enumerate()
            .map(|(n, row)| {
                let mut cells = vec![(n + 1).to_string()];
                cells.extend(row.cells());
                cells
            })
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for cells in &body {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        if body.is_empty() {
            out.push_str("(no records)\n");
        }
        for cells in &body {
            push_line(&mut out, cells, &widths);
        }
        out
    }

    /// Forward an intent to the controller. Rows must exist in this snapshot.
    pub fn emit<H: CrudIntents<R>>(&self, intent: ListIntent, handler: &mut H) -> Result<()> {
        match intent {
            ListIntent::Create => handler.on_create(),
            ListIntent::Edit(position) => handler.on_edit(self.row(position)?),
            ListIntent::View(position) => handler.on_view(self.row(position)?),
            ListIntent::Delete(position) => {
                self.row(position)?;
                handler.on_delete(position);
            }
        }
        Ok(())
    }

    fn row(&self, position: usize) -> Result<&R> {
        self.rows.get(position).ok_or(Error::RowNotFound {
            row: position + 1,
            len: self.rows.len(),
        })
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}
