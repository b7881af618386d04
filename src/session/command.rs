//! Session command grammar.

use std::str::FromStr;

use crate::catalog::CatalogId;
use crate::error::{Error, Result};
use crate::records::{AssignmentId, Slice};

/// One parsed session line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Use(Slice),
    List,
    New,
    /// 1-based table rows.
    Edit(usize),
    View(usize),
    Delete(usize),
    /// Field name stays textual until the active slice resolves it.
    Set { field: String, value: String },
    Add,
    Remove(AssignmentId),
    Select {
        assignment: AssignmentId,
        catalog: Option<CatalogId>,
    },
    Show,
    Save,
    Cancel,
    Catalog,
    Export,
    Quit,
}

pub const HELP: &str = "\
Commands:
  use <personas|equipos>           switch slice
  list                             show the records table
  new                              open an empty form
  edit <row>                       open the form on a row
  view <row>                       open the form read-only
  delete <row>                     delete a row
  set <field> <value...>           change a form field (no value clears it)
  add                              add an equipment assignment (personas)
  remove <assignment>              remove an equipment assignment (personas)
  select <assignment> <id|none>    pick catalog equipment (personas)
  show                             redraw the open form
  save                             submit the open form
  cancel                           close the form without saving
  catalog                          list the equipment catalog
  export                           print the active slice as JSON
  quit                             leave the session";

impl Command {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(Error::UnknownCommand(String::new()));
        };
        let args: Vec<&str> = words.collect();

        let command = match verb.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "use" => {
                let [slice] = args.as_slice() else {
                    return Err(Error::CommandSyntax { usage: "use <personas|equipos>" });
                };
                Command::Use(slice.parse().map_err(|_| Error::CommandSyntax {
                    usage: "use <personas|equipos>",
                })?)
            }
            "list" | "ls" => Command::List,
            "new" => Command::New,
            "edit" => Command::Edit(row_arg(&args, "edit <row>")?),
            "view" => Command::View(row_arg(&args, "view <row>")?),
            "delete" | "rm" => Command::Delete(row_arg(&args, "delete <row>")?),
            "set" => {
                let Some((field, value)) = args.split_first() else {
                    return Err(Error::CommandSyntax { usage: "set <field> <value...>" });
                };
                Command::Set {
                    field: field.to_string(),
                    value: value.join(" "),
                }
            }
            "add" => Command::Add,
            "remove" => {
                let [id] = args.as_slice() else {
                    return Err(Error::CommandSyntax { usage: "remove <assignment>" });
                };
                Command::Remove(id.parse().map_err(|_| Error::CommandSyntax {
                    usage: "remove <assignment>",
                })?)
            }
            "select" => {
                const USAGE: &str = "select <assignment> <catalog-id|none>";
                let [id, catalog] = args.as_slice() else {
                    return Err(Error::CommandSyntax { usage: USAGE });
                };
                let assignment = id
                    .parse()
                    .map_err(|_| Error::CommandSyntax { usage: USAGE })?;
                let catalog = if catalog.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(catalog.parse().map_err(|_| Error::CommandSyntax { usage: USAGE })?)
                };
                Command::Select { assignment, catalog }
            }
            "show" => Command::Show,
            "save" => Command::Save,
            "cancel" | "close" => Command::Cancel,
            "catalog" => Command::Catalog,
            "export" => Command::Export,
            "quit" | "exit" => Command::Quit,
            other => return Err(Error::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

/// Single positive row number.
fn row_arg(args: &[&str], usage: &'static str) -> Result<usize> {
    match args {
        [row] => row
            .parse::<usize>()
            .ok()
            .filter(|row| *row > 0)
            .ok_or(Error::CommandSyntax { usage }),
        _ => Err(Error::CommandSyntax { usage }),
    }
}
