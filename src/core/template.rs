//! File template materialization.
//!
//! Templates are plain text files carrying `${name}` or `${name:default}`
//! placeholders. Only `name` is looked up; the default annotation is kept
//! verbatim when no value is available.
//!
//! Writes are write-then-swap: the rendered text goes to a temporary file next
//! to the template, the original is moved into the `orig/` backup slot, then
//! the temporary file is renamed over the template. If that last rename
//! fails, the backup is moved back.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, trace, warn};

use crate::core::config::FileTarget;
use crate::core::constants::{BACKUP_DIR, DEFAULT_ENVIRONMENT};
use crate::core::types::MappedValues;
use crate::error::{Result, TemplateError};

const OPEN: &str = "${";
const CLOSE: char = '}';

/// Active and backup paths of one environment's template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateTarget {
    pub active: PathBuf,
    pub backup: PathBuf,
}

impl TemplateTarget {
    /// Derive the template paths for an environment.
    ///
    /// `<target_path>/<prefix>[-<environment>][.<ext>]`, with the environment
    /// suffix omitted for `default` and the extension omitted when empty.
    pub fn for_environment(file: &FileTarget, environment: &str) -> Self {
        let name = file_name(&file.prefix, &file.ext, environment);
        Self {
            active: file.target_path.join(&name),
            backup: file.target_path.join(BACKUP_DIR).join(&name),
        }
    }

    /// Whether the active template exists.
    pub fn exists(&self) -> bool {
        self.active.is_file()
    }
}

/// Template file name for an environment.
pub fn file_name(prefix: &str, ext: &str, environment: &str) -> String {
    let mut name = prefix.to_string();
    if environment != DEFAULT_ENVIRONMENT {
        name.push('-');
        name.push_str(environment);
    }
    if !ext.is_empty() {
        name.push('.');
        name.push_str(ext);
    }
    name
}

/// Result of rendering a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Rendered text, every line terminated by `\n`
    pub text: String,
    /// Placeholder keys that received a value
    pub substituted: BTreeSet<String>,
    /// Placeholder keys left intact
    pub unresolved: BTreeSet<String>,
}

/// A `${...}` token found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    start: usize,
    end: usize,
    key: &'a str,
}

/// Find the next token at or after `from`. Matching is non-greedy: the token
/// ends at the first `}` after its `${`. The key is everything before the
/// first `:`; a default annotation after it is never used as a value.
fn next_token(line: &str, from: usize) -> Option<Token<'_>> {
    let start = from + line[from..].find(OPEN)?;
    let inner_start = start + OPEN.len();
    let inner_len = line[inner_start..].find(CLOSE)?;
    let inner = &line[inner_start..inner_start + inner_len];

    let key = inner.split_once(':').map_or(inner, |(key, _)| key);

    Some(Token {
        start,
        end: inner_start + inner_len + CLOSE.len_utf8(),
        key,
    })
}

/// Render a single line, substituting every token independently.
fn render_line(line: &str, mapped: &MappedValues, rendered: &mut Rendered) -> Result<()> {
    let mut cursor = 0;

    while let Some(token) = next_token(line, cursor) {
        rendered.text.push_str(&line[cursor..token.start]);

        match mapped.get(token.key) {
            Some(value) if !value.is_empty() => {
                let text = value.coerce(token.key)?;
                rendered.text.push_str(&text);
                rendered.substituted.insert(token.key.to_string());
                trace!(key = token.key, "placeholder replaced");
            }
            _ => {
                rendered.text.push_str(&line[token.start..token.end]);
                rendered.unresolved.insert(token.key.to_string());
                trace!(key = token.key, "placeholder left intact");
            }
        }

        cursor = token.end;
    }

    rendered.text.push_str(&line[cursor..]);
    rendered.text.push('\n');
    Ok(())
}

/// Render template text against mapped values.
///
/// # Errors
///
/// Returns `SecretError::NotScalar` if a placeholder maps to a nested value.
pub fn render(template: &str, mapped: &MappedValues) -> Result<Rendered> {
    let mut rendered = Rendered {
        text: String::with_capacity(template.len()),
        ..Rendered::default()
    };

    for line in template.lines() {
        render_line(line, mapped, &mut rendered)?;
    }

    Ok(rendered)
}

fn read_template(target: &TemplateTarget) -> Result<String> {
    if !target.exists() {
        return Err(TemplateError::Missing(target.active.clone()).into());
    }
    fs::read_to_string(&target.active).map_err(|source| {
        TemplateError::Read {
            path: target.active.clone(),
            source,
        }
        .into()
    })
}

/// Render an environment's template without writing anything.
///
/// # Errors
///
/// Returns `TemplateError::Missing` or `TemplateError::Read`, or a coercion
/// error from [`render`].
pub fn preview(target: &TemplateTarget, mapped: &MappedValues) -> Result<Rendered> {
    let template = read_template(target)?;
    render(&template, mapped)
}

/// Render an environment's template and replace it in place.
///
/// The previous content ends up in the backup slot.
///
/// # Errors
///
/// - `TemplateError::Missing` if the template does not exist (a skip)
/// - `TemplateError::Read` if it cannot be read
/// - `TemplateError::Backup` if the backup directory or move fails
/// - `TemplateError::Write` if the rendered file cannot be written
pub fn materialize(target: &TemplateTarget, mapped: &MappedValues) -> Result<Rendered> {
    debug!(path = %target.active.display(), keys = mapped.len(), "materializing template");

    let template = read_template(target)?;
    let rendered = render(&template, mapped)?;

    if let Some(dir) = target.backup.parent() {
        fs::create_dir_all(dir).map_err(|source| TemplateError::Backup {
            from: target.active.clone(),
            to: target.backup.clone(),
            source,
        })?;
    }

    let staged = stage(target, &rendered.text)?;

    fs::rename(&target.active, &target.backup).map_err(|source| TemplateError::Backup {
        from: target.active.clone(),
        to: target.backup.clone(),
        source,
    })?;
    trace!(backup = %target.backup.display(), "original moved to backup");

    if let Err(e) = staged.persist(&target.active) {
        if let Err(restore) = fs::rename(&target.backup, &target.active) {
            warn!(
                path = %target.active.display(),
                error = %restore,
                "failed to restore template from backup"
            );
        }
        return Err(TemplateError::Write {
            path: target.active.clone(),
            source: e.error,
        }
        .into());
    }

    debug!(
        path = %target.active.display(),
        substituted = rendered.substituted.len(),
        unresolved = rendered.unresolved.len(),
        "template written"
    );
    Ok(rendered)
}

/// Write rendered text to a temporary file beside the template, carrying over
/// the template's permissions.
fn stage(target: &TemplateTarget, text: &str) -> Result<NamedTempFile> {
    let write_err = |source: std::io::Error| TemplateError::Write {
        path: target.active.clone(),
        source,
    };

    let dir = target
        .active
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staged = NamedTempFile::new_in(dir).map_err(write_err)?;
    staged.write_all(text.as_bytes()).map_err(write_err)?;
    staged.flush().map_err(write_err)?;

    let permissions = fs::metadata(&target.active)
        .map_err(write_err)?
        .permissions();
    fs::set_permissions(staged.path(), permissions).map_err(write_err)?;

    Ok(staged)
}
