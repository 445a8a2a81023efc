use axum::Extension;
use axum::extract::Form;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use serde::Deserialize;
use thiserror::Error;

use super::AuthenticationExt;
use crate::db::DbPool;
use crate::error::Result;
use crate::error::ViewError;
use crate::models::Notepad;

pub const TITLE_MAX_CHARS: usize = 256;

#[derive(Debug, Error)]
enum NotepadError {
    /// Raised for ids that do not exist as well as for ids owned by someone
    /// else: answering differently would confirm the notepad exists.
    #[error("Notepad '{notepad_id}' could not be found")]
    NotFound { notepad_id: i64 },
}

impl ViewError for NotepadError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn error_type(&self) -> &'static str {
        "notepad:NotFound"
    }
}

/// A (title, body) submission, as posted by the creation form.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(serde::Serialize, PartialEq))]
pub(in crate::views) struct NotepadForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

/// A submission that passed validation, ready for record construction.
#[derive(Debug, PartialEq)]
pub(in crate::views) struct ValidNotepad {
    title: String,
    body: String,
}

#[derive(Debug, PartialEq)]
pub(in crate::views) struct FieldError {
    field: &'static str,
    message: String,
}

impl NotepadForm {
    /// Checks the submission without touching any state.
    ///
    /// Both fields are trimmed before the emptiness checks and the trimmed
    /// values are what gets stored. The title bound counts characters, not
    /// bytes.
    fn validate(self) -> std::result::Result<ValidNotepad, Vec<FieldError>> {
        let title = self.title.trim();
        let body = self.body.trim();
        let mut errors = Vec::new();
        if title.is_empty() {
            errors.push(FieldError {
                field: "title",
                message: "This field is required.".to_string(),
            });
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.push(FieldError {
                field: "title",
                message: format!("Field cannot be longer than {TITLE_MAX_CHARS} characters."),
            });
        }
        if body.is_empty() {
            errors.push(FieldError {
                field: "body",
                message: "This field is required.".to_string(),
            });
        }
        if errors.is_empty() {
            Ok(ValidNotepad {
                title: title.to_owned(),
                body: body.to_owned(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Lists the current user's notepads
pub(in crate::views) async fn list(
    State(db_pool): State<DbPool>,
    Extension(auth): AuthenticationExt,
) -> Result<Html<String>> {
    let user = auth.user()?;
    let notepads = Notepad::list_for_user(&db_pool, user.id).await?;
    Ok(Html(render_list(&notepads)))
}

/// Serves the notepad creation form
pub(in crate::views) async fn create_form(
    Extension(auth): AuthenticationExt,
) -> Result<Html<String>> {
    auth.user()?;
    Ok(Html(render_form(&NotepadForm::default(), &[])))
}

/// Persists a new notepad owned by the current user
///
/// A valid submission redirects to the new notepad's page; an invalid one
/// re-renders the form with the field errors and creates nothing.
pub(in crate::views) async fn create(
    State(db_pool): State<DbPool>,
    Extension(auth): AuthenticationExt,
    Form(form): Form<NotepadForm>,
) -> Result<Response> {
    let user = auth.user()?;
    match form.clone().validate() {
        Ok(valid) => {
            let notepad = Notepad::create(&db_pool, user.id, &valid.title, &valid.body).await?;
            Ok(Redirect::to(&format!("/notepad/{}", notepad.id)).into_response())
        }
        Err(errors) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render_form(&form, &errors)),
        )
            .into_response()),
    }
}

/// Returns a single notepad, scoped to the current user
pub(in crate::views) async fn get(
    State(db_pool): State<DbPool>,
    Extension(auth): AuthenticationExt,
    Path(notepad_id): Path<i64>,
) -> Result<Html<String>> {
    let user = auth.user()?;
    let notepad = Notepad::retrieve_for_user(&db_pool, notepad_id, user.id)
        .await?
        .ok_or(NotepadError::NotFound { notepad_id })?;
    Ok(Html(render_view(&notepad)))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><title>{title}</title></head><body>{content}</body></html>"
    )
}

fn render_list(notepads: &[Notepad]) -> String {
    let content = if notepads.is_empty() {
        "<p>You have no notepads.</p>".to_string()
    } else {
        let items: String = notepads
            .iter()
            .map(|notepad| {
                format!(
                    "<li><a href=\"/notepad/{}\">{}</a></li>",
                    notepad.id,
                    escape_html(&notepad.title)
                )
            })
            .collect();
        format!("<ul>{items}</ul>")
    };
    page(
        "My notepads",
        &format!("{content}<p><a href=\"/notepad/create\">New notepad</a></p>"),
    )
}

fn render_form(form: &NotepadForm, errors: &[FieldError]) -> String {
    fn field_errors(errors: &[FieldError], field: &str) -> String {
        errors
            .iter()
            .filter(|error| error.field == field)
            .map(|error| format!("<span class=\"error\">{}</span>", escape_html(&error.message)))
            .collect()
    }
    page(
        "Create notepad",
        &format!(
            "<form method=\"post\" action=\"/notepad\">\
             <label for=\"title\">Title</label>\
             <input type=\"text\" id=\"title\" name=\"title\" value=\"{title}\">{title_errors}\
             <label for=\"body\">Body</label>\
             <textarea id=\"body\" name=\"body\">{body}</textarea>{body_errors}\
             <button type=\"submit\">Save notepad</button>\
             </form>",
            title = escape_html(&form.title),
            body = escape_html(&form.body),
            title_errors = field_errors(errors, "title"),
            body_errors = field_errors(errors, "body"),
        ),
    )
}

fn render_view(notepad: &Notepad) -> String {
    let title = escape_html(&notepad.title);
    page(
        &title,
        &format!(
            "<h1>{title}</h1><p>{}</p><p><a href=\"/notepad\">Back to notepads</a></p>",
            escape_html(&notepad.body)
        ),
    )
}
