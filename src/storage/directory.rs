//! A template instantiated over a real directory
//!
//! [`DirectoryView`] lists a directory once at construction, keeps the
//! children that match its template as a snapshot of [`DatedFile`] values
//! sorted by date ascending, and answers range queries over that snapshot.
//! The one live operation is [`DirectoryView::has_file_for_date`], which
//! asks the filesystem about the single path a date would produce; batch
//! iteration works off the snapshot, "did today's file land yet" works off
//! the current directory state.

use std::path::{Path, PathBuf};

use crate::domain::{DatedFile, Dateish, Template, TemplateError};

use super::fs::{DirectoryError, FileSystem, OsFileSystem};

/// A sorted snapshot of the template-matching files in one directory.
///
/// The snapshot reflects the directory as it was at construction; re-scan
/// by building a new view.
pub struct DirectoryView {
    template: Template,
    dir: PathBuf,
    files: Vec<DatedFile>,
    fs: Box<dyn FileSystem>,
}

impl DirectoryView {
    /// Opens a view over a real directory using the OS filesystem.
    pub fn open(template: &Template, dir: impl AsRef<Path>) -> Result<DirectoryView, DirectoryError> {
        Self::open_with(template, dir, Box::new(OsFileSystem))
    }

    /// Opens a view through an explicit filesystem collaborator.
    pub fn open_with(
        template: &Template,
        dir: impl AsRef<Path>,
        fs: Box<dyn FileSystem>,
    ) -> Result<DirectoryView, DirectoryError> {
        let dir = fs.resolve_real_dir(dir.as_ref())?;
        let mut files: Vec<DatedFile> = fs
            .list_children(&dir)?
            .into_iter()
            .filter(|name| template.is_match(name))
            // A name that fits the pattern but hides a nonsense date is
            // dropped from the snapshot, never a scan failure.
            .filter_map(|name| DatedFile::from_filename(template, &name).ok())
            .map(|file| file.with_dir(&dir))
            .collect();
        // Listing order is platform-dependent; the snapshot is not.
        files.sort();
        Ok(DirectoryView {
            template: template.clone(),
            dir,
            files,
            fs,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// The canonical directory path this view is bound to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The snapshot, sorted by date ascending.
    pub fn files(&self) -> &[DatedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Earliest-dated file in the snapshot, if any.
    pub fn first(&self) -> Option<&DatedFile> {
        self.files.first()
    }

    /// Latest-dated file in the snapshot, if any.
    pub fn last(&self) -> Option<&DatedFile> {
        self.files.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DatedFile> {
        self.files.iter()
    }

    /// Snapshot files dated on or after `date_ish`.
    pub fn since(&self, date_ish: impl Into<Dateish>) -> Result<Vec<&DatedFile>, TemplateError> {
        let target = self.template.resolve(date_ish)?;
        Ok(self.files.iter().filter(|f| f.datetime() >= target).collect())
    }

    /// Snapshot files dated strictly after `date_ish`.
    pub fn after(&self, date_ish: impl Into<Dateish>) -> Result<Vec<&DatedFile>, TemplateError> {
        let target = self.template.resolve(date_ish)?;
        Ok(self.files.iter().filter(|f| f.datetime() > target).collect())
    }

    /// Snapshot files dated strictly before `date_ish`.
    pub fn before(&self, date_ish: impl Into<Dateish>) -> Result<Vec<&DatedFile>, TemplateError> {
        let target = self.template.resolve(date_ish)?;
        Ok(self.files.iter().filter(|f| f.datetime() < target).collect())
    }

    /// Snapshot files dated on or before `date_ish`.
    pub fn on_or_before(
        &self,
        date_ish: impl Into<Dateish>,
    ) -> Result<Vec<&DatedFile>, TemplateError> {
        let target = self.template.resolve(date_ish)?;
        Ok(self.files.iter().filter(|f| f.datetime() <= target).collect())
    }

    /// The dated file this view's template would produce for `date_ish`,
    /// rooted in this directory. The file need not exist.
    pub fn at(&self, date_ish: impl Into<Dateish>) -> Result<DatedFile, TemplateError> {
        Ok(DatedFile::from_date(&self.template, date_ish)?.with_dir(&self.dir))
    }

    /// Live check: does the file this template would name for `date_ish`
    /// exist right now? Deliberately independent of the snapshot.
    pub fn has_file_for_date(&self, date_ish: impl Into<Dateish>) -> Result<bool, TemplateError> {
        let target = self.at(date_ish)?;
        Ok(self.fs.exists(target.path()))
    }
}

impl<'a> IntoIterator for &'a DirectoryView {
    type Item = &'a DatedFile;
    type IntoIter = std::slice::Iter<'a, DatedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn template(s: &str) -> Template {
        Template::compile(s).unwrap()
    }

    fn touch(dir: &TempDir, name: &str) {
        File::create(dir.path().join(name)).unwrap();
    }

    #[test]
    fn snapshot_keeps_matching_files_in_ascending_date_order() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "prefix_20230201.log");
        touch(&dir, "prefix_20230101.log");
        touch(&dir, "other.txt");

        let t = template("prefix_<%Y%m%d>.log");
        let view = DirectoryView::open(&t, dir.path()).unwrap();

        assert_eq!(view.len(), 2);
        let names: Vec<_> = view.iter().map(|f| f.filename().to_string()).collect();
        assert_eq!(names, vec!["prefix_20230101.log", "prefix_20230201.log"]);
        assert_eq!(view.first().unwrap().filename(), "prefix_20230101.log");
        assert_eq!(view.last().unwrap().filename(), "prefix_20230201.log");
    }

    #[test]
    fn snapshot_paths_are_rooted_in_the_directory() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "prefix_20230101.log");

        let t = template("prefix_%Y%m%d.log");
        let view = DirectoryView::open(&t, dir.path()).unwrap();
        let file = view.first().unwrap();
        assert!(file.path().is_absolute());
        assert!(file.path().ends_with("prefix_20230101.log"));
    }

    #[test]
    fn range_queries_follow_comparison_semantics() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "prefix_20230101.log");
        touch(&dir, "prefix_20230201.log");

        let t = template("prefix_%Y%m%d.log");
        let view = DirectoryView::open(&t, dir.path()).unwrap();

        let since: Vec<_> = view.since("20230115").unwrap();
        assert_eq!(since.len(), 1);
        assert_eq!(since[0].filename(), "prefix_20230201.log");

        assert_eq!(view.since("20230101").unwrap().len(), 2);
        assert_eq!(view.after("20230101").unwrap().len(), 1);
        assert_eq!(view.before("20230201").unwrap().len(), 1);
        assert_eq!(view.on_or_before("20230201").unwrap().len(), 2);

        // A filename in the template's own format works as a bound too.
        assert_eq!(view.since("prefix_20230115.log").unwrap().len(), 1);
    }

    #[test]
    fn has_file_for_date_checks_the_live_directory() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "prefix_20230101.log");

        let t = template("prefix_%Y%m%d.log");
        let view = DirectoryView::open(&t, dir.path()).unwrap();

        assert!(view.has_file_for_date("20230101").unwrap());
        assert!(!view.has_file_for_date("20230301").unwrap());

        // Written after the snapshot was taken, still visible to the live
        // check and still invisible to the snapshot.
        touch(&dir, "prefix_20230301.log");
        assert!(view.has_file_for_date("20230301").unwrap());
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn empty_directory_yields_an_empty_view_not_an_error() {
        let dir = TempDir::new().unwrap();
        let t = template("prefix_%Y%m%d.log");
        let view = DirectoryView::open(&t, dir.path()).unwrap();
        assert!(view.is_empty());
        assert!(view.first().is_none());
        assert!(view.last().is_none());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let t = template("prefix_%Y%m%d.log");
        assert!(matches!(
            DirectoryView::open(&t, dir.path().join("missing")),
            Err(DirectoryError::NotFound(_))
        ));
    }

    #[test]
    fn file_path_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "plain.txt");
        let t = template("prefix_%Y%m%d.log");
        assert!(matches!(
            DirectoryView::open(&t, dir.path().join("plain.txt")),
            Err(DirectoryError::NotADirectory(_))
        ));
    }

    #[test]
    fn syntactic_match_with_nonsense_date_is_excluded_not_fatal() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "prefix_20230101.log");
        touch(&dir, "prefix_20231399.log");

        let t = template("prefix_%Y%m%d.log");
        let view = DirectoryView::open(&t, dir.path()).unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view.first().unwrap().filename(), "prefix_20230101.log");
    }

    #[test]
    fn iteration_is_restartable() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "prefix_20230101.log");
        touch(&dir, "prefix_20230201.log");

        let t = template("prefix_%Y%m%d.log");
        let view = DirectoryView::open(&t, dir.path()).unwrap();
        assert_eq!(view.into_iter().count(), 2);
        assert_eq!(view.into_iter().count(), 2);
    }
}
