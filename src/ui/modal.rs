//! Text rendering of the modal edit form.

use crate::form::EditForm;
use crate::records::{Draft, EquipoDraft, PersonaDraft};

/// Draft-specific lines rendered below the scalar fields.
pub trait ModalBody: Draft {
    fn body_lines(&self) -> Vec<String> {
        Vec::new()
    }
}

impl ModalBody for EquipoDraft {}

impl ModalBody for PersonaDraft {
    fn body_lines(&self) -> Vec<String> {
        let mut lines = vec!["equipment:".to_string()];
        for row in self.assignments() {
            let label = if row.is_selected() {
                row.label.as_str()
            } else {
                "(none)"
            };
            lines.push(format!("  [{}] {}", row.id, label));
        }
        lines
    }
}

/// Render the open form with its fields, sub-list and available actions.
pub fn render_form<D: ModalBody>(form: &EditForm<D>) -> String {
    let controls = form.controls();
    let mut out = String::new();

    let suffix = if controls.inputs_enabled { "" } else { " (read-only)" };
    out.push_str(&format!("== {}{} ==\n", form.title(), suffix));

    let width = D::fields()
        .iter()
        .map(|field| field.to_string().len())
        .max()
        .unwrap_or(0);
    for field in D::fields() {
        let line = format!(
            "  {:<width$} : {}",
            field.to_string(),
            form.draft().field_value(*field),
            width = width
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    for line in form.draft().body_lines() {
        out.push_str("  ");
        out.push_str(&line);
        out.push('\n');
    }

    let mut actions = Vec::new();
    if controls.inputs_enabled {
        actions.push("set");
    }
    if controls.show_add {
        actions.push("add");
    }
    if controls.show_remove && controls.remove_enabled {
        actions.push("remove");
    }
    if controls.inputs_enabled && controls.show_add {
        actions.push("select");
    }
    if controls.show_submit {
        actions.push("save");
    }
    if controls.show_cancel {
        actions.push("cancel");
    }
    out.push_str(&format!("  actions: {}\n", actions.join(", ")));
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{CatalogId, EquipmentCatalog, StaticCatalog};
    use crate::records::equipo::EquipoField;
    use crate::records::persona::PersonaField;
    use crate::records::AssignmentId;

    fn catalog() -> Arc<dyn EquipmentCatalog> {
        Arc::new(StaticCatalog::bundled().unwrap())
    }

    #[test]
    fn test_render_new_persona() {
        let mut form = EditForm::<PersonaDraft>::open(None, false, catalog());
        form.set_field(PersonaField::FirstName, "Ana").unwrap();
        form.add_assignment().unwrap();
        form.select_equipment(AssignmentId(2), Some(CatalogId(2))).unwrap();

        let text = render_form(&form);
        assert!(text.starts_with("== New Persona ==\n"));
        assert!(text.contains("first-name      : Ana"));
        assert!(text.contains("[1] (none)"));
        assert!(text.contains("[2] 712J1 - HP"));
        assert!(text.contains("actions: set, add, remove, select, save, cancel"));
    }

    #[test]
    fn test_render_single_row_hides_remove() {
        let form = EditForm::<PersonaDraft>::open(None, false, catalog());
        let text = render_form(&form);
        assert!(text.contains("actions: set, add, select, save, cancel"));
    }

    #[test]
    fn test_render_view_only_equipo() {
        let draft = EquipoDraft::default()
            .with_field(EquipoField::Brand, "HP")
            .unwrap();
        let form = EditForm::open(Some(draft), true, ());
        let text = render_form(&form);
        assert!(text.starts_with("== View Equipo (read-only) =="));
        assert!(text.contains("brand"));
        assert!(text.contains("actions: cancel"));
        assert!(!text.contains("equipment:"));
    }
}
