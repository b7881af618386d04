//! Modal edit form
//!
//! Holds the working copy of one record while the modal is open. Every
//! successful edit replaces the working copy wholesale and bumps the revision;
//! rejected edits leave both untouched. The form never decides between create
//! and update: [`EditForm::submit`] only hands the finalized payload back to
//! the caller.

mod assignments;

use tracing::debug;

use crate::error::{Error, Result};
use crate::records::Draft;

// ─────────────────────────────────────────────────────────────────
// Form Mode
// ─────────────────────────────────────────────────────────────────

/// How the form was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// No current record; submitting creates one.
    Create,
    /// Editing the current record.
    Edit,
    /// Read-only inspection of the current record.
    View,
}

/// Which controls the modal shows, and whether they are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormControls {
    pub inputs_enabled: bool,
    pub show_add: bool,
    pub show_remove: bool,
    /// Disabled while a single assignment remains.
    pub remove_enabled: bool,
    pub show_submit: bool,
    pub show_cancel: bool,
}

// ─────────────────────────────────────────────────────────────────
// Edit Form
// ─────────────────────────────────────────────────────────────────

/// Modal form over a draft `D`.
#[derive(Debug, Clone)]
pub struct EditForm<D: Draft> {
    mode: FormMode,
    draft: D,
    revision: u64,
    context: D::Context,
}

impl<D: Draft> EditForm<D> {
    /// Open the form on `current`, or on defaults when there is no current record.
    pub fn open(current: Option<D>, view_only: bool, context: D::Context) -> Self {
        let mode = match (&current, view_only) {
            (_, true) => FormMode::View,
            (Some(_), false) => FormMode::Edit,
            (None, false) => FormMode::Create,
        };
        Self {
            mode,
            draft: current.unwrap_or_default(),
            revision: 0,
            context,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_view_only(&self) -> bool {
        self.mode == FormMode::View
    }

    /// Current working copy.
    pub fn draft(&self) -> &D {
        &self.draft
    }

    /// Number of accepted edits since the form opened.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn title(&self) -> String {
        let verb = match self.mode {
            FormMode::Create => "New",
            FormMode::Edit => "Edit",
            FormMode::View => "View",
        };
        format!("{} {}", verb, D::NOUN)
    }

    pub fn controls(&self) -> FormControls {
        let editable = !self.is_view_only();
        let sublist = self.draft.sublist_len();
        FormControls {
            inputs_enabled: editable,
            show_add: editable && sublist.is_some(),
            show_remove: editable && sublist.is_some(),
            remove_enabled: editable && sublist.is_some_and(|len| len > 1),
            show_submit: editable,
            show_cancel: true,
        }
    }

    /// Change one scalar field.
    pub fn set_field(&mut self, field: D::Field, value: &str) -> Result<()> {
        self.ensure_editable()?;
        let next = self.draft.clone().with_field(field, value)?;
        debug!(noun = D::NOUN, field = %field, "Form field changed");
        self.commit(next);
        Ok(())
    }

    /// Finalized payload for the caller. The form itself stays as it was.
    pub fn submit(&self) -> Result<D> {
        self.ensure_editable()?;
        self.draft.clone().finalize()
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.is_view_only() {
            Err(Error::FormReadOnly)
        } else {
            Ok(())
        }
    }

    fn commit(&mut self, next: D) {
        self.draft = next;
        self.revision += 1;
    }
}
