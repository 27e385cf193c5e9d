//! A template applied to one concrete date
//!
//! A [`DatedFile`] pairs a shared [`Template`] with a canonical date-time
//! and the filename the template produces for it. It never touches the
//! filesystem; it only computes paths. Existence checks and reads/writes
//! belong to the storage layer, which asks a dated file for its path and
//! goes from there.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::dateish::Dateish;
use super::template::{Template, TemplateError};

/// An immutable (template, date, filename) triple.
///
/// Construct one from a date (generate the name) or from an existing
/// filename (parse the name). "Changing" the date means building a new
/// value; the template behind it is shared and never mutated.
#[derive(Debug, Clone)]
pub struct DatedFile {
    template: Template,
    datetime: NaiveDateTime,
    filename: String,
    path: PathBuf,
}

impl DatedFile {
    /// Builds the dated file for a date-ish value, deriving the filename
    /// from the template.
    pub fn from_date(
        template: &Template,
        date_ish: impl Into<Dateish>,
    ) -> Result<DatedFile, TemplateError> {
        let datetime = super::dateish::parse(date_ish)?;
        let filename = template.filename_for(datetime)?;
        Ok(DatedFile {
            template: template.clone(),
            datetime,
            path: PathBuf::from(&filename),
            filename,
        })
    }

    /// Builds a dated file from an existing filename, recovering the
    /// embedded date. Fails with [`TemplateError::Mismatch`] when the name
    /// does not conform to the template.
    pub fn from_filename(template: &Template, filename: &str) -> Result<DatedFile, TemplateError> {
        let datetime = template.extract_datetime(filename)?;
        Ok(DatedFile {
            template: template.clone(),
            datetime,
            filename: filename.to_string(),
            path: PathBuf::from(filename),
        })
    }

    /// Re-roots the path under a directory, leaving the filename itself
    /// untouched.
    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> DatedFile {
        self.path = dir.as_ref().join(&self.filename);
        self
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// The bare filename, without any directory component.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The full path (directory-joined when built through a directory view).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compares against any date-ish value. A string that matches the bound
    /// template is decoded through the template first, so two
    /// differently-formatted names for the same instant compare equal;
    /// anything else goes through the forgiving parser.
    pub fn compare(&self, other: impl Into<Dateish>) -> Result<Ordering, TemplateError> {
        let other = self.template.resolve(other)?;
        Ok(self.datetime.cmp(&other))
    }
}

impl From<&DatedFile> for Dateish {
    fn from(f: &DatedFile) -> Self {
        Dateish::DateTime(f.datetime)
    }
}

/// Dated files order by canonical date-time alone; the template and the
/// rendered name do not participate.
impl PartialEq for DatedFile {
    fn eq(&self, other: &Self) -> bool {
        self.datetime == other.datetime
    }
}

impl Eq for DatedFile {}

impl PartialOrd for DatedFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DatedFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.datetime.cmp(&other.datetime)
    }
}
