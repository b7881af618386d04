//! Page controller
//!
//! One controller per slice. It owns the record store, the current record and
//! the open modal, and it is the only thing that mutates the store. Views talk
//! to it exclusively through [`CrudIntents`].

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::form::EditForm;
use crate::records::{Draft, Record};
use crate::store::RecordStore;

/// Draft context of a record type.
pub type ContextOf<R> = <<R as Record>::Draft as Draft>::Context;

// ─────────────────────────────────────────────────────────────────
// Intent interface
// ─────────────────────────────────────────────────────────────────

/// Notifications from the list view and the edit form.
pub trait CrudIntents<R: Record> {
    /// Open the form with no current record.
    fn on_create(&mut self);

    /// Open the form on `record`.
    fn on_edit(&mut self, record: &R);

    /// Open the form on `record`, read-only.
    fn on_view(&mut self, record: &R);

    /// Remove the record at `position`.
    fn on_delete(&mut self, position: usize);

    /// Commit a finalized payload from the form.
    fn on_submit(&mut self, payload: R::Draft);

    /// Close the modal, discarding the working copy.
    fn on_close(&mut self);
}

// ─────────────────────────────────────────────────────────────────
// Page Controller
// ─────────────────────────────────────────────────────────────────

/// Store owner and mediator for one slice.
#[derive(Debug)]
pub struct PageController<R: Record> {
    store: RecordStore<R>,
    current: Option<R>,
    form: Option<EditForm<R::Draft>>,
    context: ContextOf<R>,
}

impl<R: Record> PageController<R> {
    pub fn new(context: ContextOf<R>) -> Self {
        Self {
            store: RecordStore::new(),
            current: None,
            form: None,
            context,
        }
    }

    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    pub fn is_modal_visible(&self) -> bool {
        self.form.is_some()
    }

    pub fn form(&self) -> Option<&EditForm<R::Draft>> {
        self.form.as_ref()
    }

    /// Open form, or [`Error::FormNotOpen`].
    pub fn form_mut(&mut self) -> Result<&mut EditForm<R::Draft>> {
        self.form.as_mut().ok_or(Error::FormNotOpen)
    }

    /// Ask the open form for its payload and commit it.
    ///
    /// A rejected submission leaves the modal open with the working copy intact.
    pub fn submit_form(&mut self) -> Result<()> {
        let form = self.form.as_ref().ok_or(Error::FormNotOpen)?;
        match form.submit() {
            Ok(payload) => {
                debug!(slice = %R::SLICE, revision = form.revision(), "Form submitted");
                self.on_submit(payload);
                Ok(())
            }
            Err(e) => {
                warn!(slice = %R::SLICE, error = %e.format_for_log(), "Submission rejected");
                Err(e)
            }
        }
    }

    fn open_form(&mut self, current: Option<&R>, view_only: bool) {
        self.current = current.cloned();
        let draft = current.map(Record::to_draft);
        let form = EditForm::open(draft, view_only, self.context.clone());
        debug!(slice = %R::SLICE, mode = ?form.mode(), "Form opened");
        self.form = Some(form);
    }
}

#[cfg(test)]
impl<R: Record> PageController<R> {
    /// Record the open form is editing or viewing.
    pub fn current(&self) -> Option<&R> {
        self.current.as_ref()
    }
}

impl<R: Record> CrudIntents<R> for PageController<R> {
    fn on_create(&mut self) {
        self.open_form(None, false);
    }

    fn on_edit(&mut self, record: &R) {
        self.open_form(Some(record), false);
    }

    fn on_view(&mut self, record: &R) {
        self.open_form(Some(record), true);
    }

    fn on_delete(&mut self, position: usize) {
        match self.store.remove_at(position) {
            Some(removed) => {
                info!(slice = %R::SLICE, id = %removed.id(), position, "Record deleted");
            }
            None => {
                warn!(
                    slice = %R::SLICE,
                    position,
                    len = self.store.len(),
                    "Delete ignored, no record at position"
                );
            }
        }
    }

    fn on_submit(&mut self, payload: R::Draft) {
        match self.current.take() {
            Some(current) => {
                let record = R::from_draft(current.id().clone(), payload);
                match self.store.replace(record) {
                    Some(_) => info!(slice = %R::SLICE, id = %current.id(), "Record updated"),
                    None => warn!(
                        slice = %R::SLICE,
                        id = %current.id(),
                        "Edited record no longer in store"
                    ),
                }
            }
            None => {
                let id = self.store.generate_id();
                let record = R::from_draft(id.clone(), payload);
                // generate_id never returns an id already in the store
                if let Err(e) = self.store.push(record) {
                    warn!(slice = %R::SLICE, error = %e.format_for_log(), "Record not created");
                } else {
                    info!(slice = %R::SLICE, id = %id, "Record created");
                }
            }
        }
        self.on_close();
    }

    fn on_close(&mut self) {
        if self.form.take().is_some() {
            debug!(slice = %R::SLICE, "Form closed");
        }
        self.current = None;
    }
}
