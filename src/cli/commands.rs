//! Command handlers
//!
//! Thin wrappers over the library: each handler compiles the template,
//! calls into the core, and routes results through [`Output`].

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::domain::{DatedFile, Template};
use crate::storage::DirectoryView;

use super::output::Output;

/// One dated file, as printed in listings.
#[derive(Debug, Serialize)]
pub struct FileRow {
    pub filename: String,
    pub path: String,
    pub datetime: String,
}

impl FileRow {
    fn new(file: &DatedFile) -> Self {
        Self {
            filename: file.filename().to_string(),
            path: file.path().display().to_string(),
            datetime: format_datetime(file.datetime()),
        }
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn compile(template: &str) -> Result<Template> {
    Template::compile(template).with_context(|| format!("cannot compile template '{template}'"))
}

/// `datefile name <template> <date>` — the filename for a date.
pub fn name(output: &Output, template: &str, date: &str) -> Result<()> {
    let template = compile(template)?;
    let file = template.at(date)?;
    output.verbose(&format!("template '{}' at {}", template, file.datetime()));
    if output.is_json() {
        output.data(&FileRow::new(&file));
    } else {
        output.line(file.filename());
    }
    Ok(())
}

/// `datefile extract <template> <filename>` — the date inside a filename.
pub fn extract(output: &Output, template: &str, filename: &str) -> Result<()> {
    let template = compile(template)?;
    let file = DatedFile::from_filename(&template, filename)?;
    if output.is_json() {
        output.data(&FileRow::new(&file));
    } else {
        output.line(&format_datetime(file.datetime()));
    }
    Ok(())
}

/// `datefile match <template> <filename>` — succeed only on a whole-string
/// match, grep-style.
pub fn match_filename(output: &Output, template: &str, filename: &str) -> Result<()> {
    let template = compile(template)?;
    if !template.is_match(filename) {
        bail!(
            "'{}' does not match template '{}'",
            filename,
            template.template_string()
        );
    }
    output.success(&format!("'{filename}' matches"));
    Ok(())
}

/// Range-filter options for `datefile list`.
#[derive(Debug, Default)]
pub struct ListFilter {
    pub since: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub on_or_before: Option<String>,
    pub first: bool,
    pub last: bool,
}

/// `datefile list <template> <dir>` — the sorted matching files, optionally
/// range-filtered. Bounds combine by intersection.
pub fn list(output: &Output, template: &str, dir: &str, filter: &ListFilter) -> Result<()> {
    let template = compile(template)?;
    let view = DirectoryView::open(&template, dir)?;
    output.verbose(&format!(
        "{} matching file(s) in {}",
        view.len(),
        view.dir().display()
    ));

    let mut files: Vec<&DatedFile> = view.iter().collect();
    if let Some(bound) = &filter.since {
        let target = view.template().resolve(bound.as_str())?;
        files.retain(|f| f.datetime() >= target);
    }
    if let Some(bound) = &filter.after {
        let target = view.template().resolve(bound.as_str())?;
        files.retain(|f| f.datetime() > target);
    }
    if let Some(bound) = &filter.before {
        let target = view.template().resolve(bound.as_str())?;
        files.retain(|f| f.datetime() < target);
    }
    if let Some(bound) = &filter.on_or_before {
        let target = view.template().resolve(bound.as_str())?;
        files.retain(|f| f.datetime() <= target);
    }
    if filter.first {
        files.truncate(1);
    } else if filter.last {
        let len = files.len();
        files = files.into_iter().skip(len.saturating_sub(1)).collect();
    }

    if output.is_json() {
        let rows: Vec<FileRow> = files.iter().map(|f| FileRow::new(f)).collect();
        output.data(&rows);
    } else {
        for file in files {
            output.line(&file.path().display().to_string());
        }
    }
    Ok(())
}

/// `datefile has <template> <dir> <date>` — live existence check for the
/// file a date would name.
pub fn has(output: &Output, template: &str, dir: &str, date: &str) -> Result<()> {
    let template = compile(template)?;
    let view = DirectoryView::open(&template, dir)?;
    let exists = view.has_file_for_date(date)?;
    if output.is_json() {
        output.data(&serde_json::json!({ "exists": exists }));
    } else {
        output.line(if exists { "true" } else { "false" });
    }
    Ok(())
}

/// `datefile daily-since <template> <date>` — one filename per calendar day
/// from the start date forward.
pub fn daily_since(
    output: &Output,
    template: &str,
    date: &str,
    through_yesterday: bool,
    skip_start: bool,
) -> Result<()> {
    let template = compile(template)?;
    let mut files: Vec<DatedFile> = if skip_start {
        template.daily_after(date)?.collect()
    } else if through_yesterday {
        template.daily_through_yesterday(date)?.collect()
    } else {
        template.daily_since(date)?.collect()
    };
    if skip_start && through_yesterday {
        let today = Local::now().date_naive();
        files.retain(|f| f.datetime().date() < today);
    }

    if output.is_json() {
        let rows: Vec<FileRow> = files.iter().map(FileRow::new).collect();
        output.data(&rows);
    } else {
        for file in files {
            output.line(file.filename());
        }
    }
    Ok(())
}
