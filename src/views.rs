//! HTML rendering for the todo pages.
//!
//! Templates are compiled into the binary and registered under `.html` names,
//! which turns on tera's autoescaping for every user-supplied field.

use tera::{Context, Tera};

use crate::models::Todo;

pub const LIST_TEMPLATE: &str = "todo_list.html";
pub const FORM_TEMPLATE: &str = "todo_form.html";
pub const CONFIRM_DELETE_TEMPLATE: &str = "todo_confirm_delete.html";

pub fn templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        (LIST_TEMPLATE, include_str!("../templates/todo_list.html")),
        (FORM_TEMPLATE, include_str!("../templates/todo_form.html")),
        (
            CONFIRM_DELETE_TEMPLATE,
            include_str!("../templates/todo_confirm_delete.html"),
        ),
    ])?;
    Ok(tera)
}

pub fn render_list(tera: &Tera, todos: &[Todo]) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("todos", todos);
    tera.render(LIST_TEMPLATE, &context)
}

/// `todo` is `None` on the create page.
pub fn render_form(
    tera: &Tera,
    form_type: &str,
    todo: Option<&Todo>,
) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("form_type", form_type);
    if let Some(todo) = todo {
        context.insert("todo", todo);
    }
    tera.render(FORM_TEMPLATE, &context)
}

pub fn render_confirm_delete(tera: &Tera, todo: &Todo) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("todo", todo);
    tera.render(CONFIRM_DELETE_TEMPLATE, &context)
}
