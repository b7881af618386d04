//! Text views over the controllers: the record table and the modal form.

pub mod list;
pub mod modal;

pub use list::{ListIntent, ListView, TableRow};
pub use modal::{render_form, ModalBody};
