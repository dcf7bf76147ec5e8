//! Single-pass `{placeholder}` substitution for message bodies.
//!
//! Placeholders resolve against a job's fields (see [`Job::field`]); `{{` and
//! `}}` escape literal braces. Anything fancier than substitution is a
//! non-goal and belongs to whatever produced the template.

use thiserror::Error;

use crate::job::Job;

/// Substitution failure. Surfaced at the API boundary as a validation error;
/// the send path treats it as recoverable rather than dropping the job.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The template references a field the job does not carry.
    #[error("unresolvable placeholder `{0}`")]
    UnknownPlaceholder(String),

    /// A `{` was opened and never closed.
    #[error("unclosed placeholder starting at byte {0}")]
    Unclosed(usize),
}

/// Render `template` against one job's fields.
///
/// # Errors
///
/// Returns an error if a placeholder cannot be resolved or is unterminated.
pub fn render(template: &str, job: &Job) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((at, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some(&(_, '{')) = chars.peek() {
                    chars.next();
                    out.push('{');
                    continue;
                }

                let mut end = None;
                for (close, next) in chars.by_ref() {
                    if next == '}' {
                        end = Some(close);
                        break;
                    }
                }
                let end = end.ok_or(TemplateError::Unclosed(at))?;

                let key = &template[at + ch.len_utf8()..end];
                let value = job
                    .field(key)
                    .ok_or_else(|| TemplateError::UnknownPlaceholder(key.to_string()))?;
                out.push_str(&value);
            }
            '}' => {
                // Collapse the `}}` escape; a lone `}` stays literal.
                if let Some(&(_, '}')) = chars.peek() {
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push(ch),
        }
    }

    Ok(out)
}

/// Check that every placeholder in `template` resolves against every job.
///
/// Run once at the API boundary so a broken template is rejected up front
/// instead of failing job by job inside the dispatch ladder.
///
/// # Errors
///
/// Returns the first substitution error encountered.
pub fn validate(template: &str, jobs: &[Job]) -> Result<(), TemplateError> {
    for job in jobs {
        render(template, job)?;
    }
    Ok(())
}
