//! Line-driven session over the two page controllers.

use std::io::{BufRead, Write};
use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info};

use crate::catalog::EquipmentCatalog;
use crate::config::SessionSettings;
use crate::controller::{CrudIntents, PageController};
use crate::error::{Error, Result};
use crate::records::{Draft, Equipo, Persona, Record, Slice};
use crate::ui::{render_form, ListIntent, ListView, ModalBody, TableRow};

use super::command::{Command, HELP};

/// Whether the session keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal front end: the UI side of both slices.
pub struct Session<W: Write> {
    personas: PageController<Persona>,
    equipos: PageController<Equipo>,
    active: Slice,
    catalog: Arc<dyn EquipmentCatalog>,
    settings: SessionSettings,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(catalog: Arc<dyn EquipmentCatalog>, settings: SessionSettings, out: W) -> Self {
        Self {
            personas: PageController::new(catalog.clone()),
            equipos: PageController::new(()),
            active: settings.default_slice,
            catalog,
            settings,
            out,
        }
    }

    /// Replay commands from a script or pipe until EOF or `quit`.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        self.drive(|| lines.next().map(|line| line.map_err(Error::from)), false)
    }

    /// Line-edited prompt with history. Ctrl-D or Ctrl-C ends the session.
    pub fn run_interactive(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()
            .map_err(|e| Error::Internal(format!("Failed to open terminal: {}", e)))?;
        writeln!(self.out, "RegiSena console. Type 'help' for commands.")?;

        let prompt = self.settings.prompt.clone();
        self.drive(
            || match editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    Some(Ok(line))
                }
                Err(ReadlineError::Eof | ReadlineError::Interrupted) => None,
                Err(e) => Some(Err(Error::Internal(format!("Terminal input failed: {}", e)))),
            },
            true,
        )
    }

    fn drive<F>(&mut self, mut next_line: F, interactive: bool) -> Result<()>
    where
        F: FnMut() -> Option<Result<String>>,
    {
        info!(slice = %self.active, interactive, "Session started");
        loop {
            self.out.flush()?;
            let Some(line) = next_line() else {
                break;
            };
            let line = line?;
            if self.settings.echo_commands && !interactive {
                writeln!(self.out, "{}{}", self.settings.prompt, line.trim_end())?;
            }
            if self.execute(&line)? == Flow::Quit {
                break;
            }
        }

        info!(
            personas = self.personas.store().len(),
            equipos = self.equipos.store().len(),
            "Session ended"
        );
        Ok(())
    }

    /// Run one line. Recoverable errors are printed as notices.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let result = Command::parse_line(line).and_then(|command| match command {
            Some(command) => self.dispatch(command),
            None => Ok(Flow::Continue),
        });
        match result {
            Ok(flow) => Ok(flow),
            Err(e) if e.is_recoverable() => {
                debug!(error = %e.format_for_log(), "Command rejected");
                writeln!(self.out, "{}", e.format_for_notice())?;
                Ok(Flow::Continue)
            }
            Err(e) => Err(e),
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Use(slice) => {
                self.active = slice;
                debug!(slice = %slice, "Active slice changed");
                writeln!(self.out, "Now managing {}.", slice)?;
                self.slice_command(Command::List)?;
            }
            Command::Catalog => {
                for entry in self.catalog.entries() {
                    writeln!(self.out, "{:>4}  {}", entry.id.0, entry.label())?;
                }
            }
            Command::Add | Command::Remove(_) | Command::Select { .. } => {
                self.assignment_command(command)?;
            }
            other => self.slice_command(other)?,
        }
        Ok(Flow::Continue)
    }

    /// Commands shared by both slices, routed to the active controller.
    fn slice_command(&mut self, command: Command) -> Result<()> {
        match self.active {
            Slice::Personas => run_slice_command(&mut self.personas, command, &mut self.out),
            Slice::Equipos => run_slice_command(&mut self.equipos, command, &mut self.out),
        }
    }

    /// Equipment sub-list commands, only meaningful on the persona form.
    fn assignment_command(&mut self, command: Command) -> Result<()> {
        if self.active != Slice::Personas {
            return Err(Error::NotSupported(format!(
                "equipment assignments exist only on personas (active slice: {})",
                self.active
            )));
        }

        let form = self.personas.form_mut()?;
        match command {
            Command::Add => {
                let id = form.add_assignment()?;
                writeln!(self.out, "Added assignment {}.", id)?;
            }
            Command::Remove(id) => form.remove_assignment(id)?,
            Command::Select {
                assignment,
                catalog,
            } => form.select_equipment(assignment, catalog)?,
            _ => return Ok(()),
        }
        write!(self.out, "{}", render_form(form))?;
        Ok(())
    }
}

fn run_slice_command<R, W>(
    ctrl: &mut PageController<R>,
    command: Command,
    out: &mut W,
) -> Result<()>
where
    R: Record + TableRow,
    R::Draft: ModalBody,
    W: Write,
{
    match command {
        Command::List => {
            write!(out, "{}", ListView::from_records(ctrl.store().records()).render())?;
        }
        Command::New | Command::Edit(_) | Command::View(_) | Command::Delete(_) => {
            if ctrl.is_modal_visible() {
                return Err(Error::FormAlreadyOpen {
                    noun: <R::Draft as Draft>::NOUN,
                });
            }
            let intent = match command {
                Command::Edit(row) => ListIntent::Edit(row - 1),
                Command::View(row) => ListIntent::View(row - 1),
                Command::Delete(row) => ListIntent::Delete(row - 1),
                _ => ListIntent::Create,
            };
            ListView::from_records(ctrl.store().records()).emit(intent, ctrl)?;
            match ctrl.form() {
                Some(form) => write!(out, "{}", render_form(form))?,
                None => {
                    writeln!(out, "Deleted.")?;
                    write!(out, "{}", ListView::from_records(ctrl.store().records()).render())?;
                }
            }
        }
        Command::Set { field, value } => {
            let field: <R::Draft as Draft>::Field = field
                .parse()
                .map_err(|reason: String| Error::invalid_field("field", field.as_str(), reason))?;
            let form = ctrl.form_mut()?;
            form.set_field(field, &value)?;
            write!(out, "{}", render_form(form))?;
        }
        Command::Show => {
            let form = ctrl.form().ok_or(Error::FormNotOpen)?;
            write!(out, "{}", render_form(form))?;
        }
        Command::Save => {
            ctrl.submit_form()?;
            writeln!(out, "Saved.")?;
            write!(out, "{}", ListView::from_records(ctrl.store().records()).render())?;
        }
        Command::Cancel => {
            if !ctrl.is_modal_visible() {
                return Err(Error::FormNotOpen);
            }
            ctrl.on_close();
            writeln!(out, "Form closed.")?;
        }
        Command::Export => {
            writeln!(out, "{}", serde_json::to_string_pretty(ctrl.store().records())?)?;
        }
        _ => {}
    }
    Ok(())
}
