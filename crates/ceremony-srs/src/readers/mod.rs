//! One reader per ceremony file layout. Every reader streams its files into
//! an [`SrsBuilder`](crate::SrsBuilder) in ascending power order.
use crate::{CeremonyCurve, SetupError, SetupResult, SrsBuilder, Translation};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, span, Level};

mod chunked;
pub use chunked::{ChunkedContributions, HASH_SIZE};

mod sequential;
pub use sequential::{SequentialTranscripts, TranscriptHeader, HEADER_LEN};

mod tagged;
pub use tagged::TaggedFiles;

/// A ceremony file layout that can be read into an SRS over `Self::Curve`
pub trait TranscriptFormat {
    type Curve: CeremonyCurve;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Reads every file of the ceremony in `dir` into `builder`
    fn read(
        &self,
        dir: &Path,
        builder: SrsBuilder<Self::Curve>,
    ) -> SetupResult<SrsBuilder<Self::Curve>>;

    /// Seeds a fresh builder, reads the ceremony into it and seals the SRS
    fn translate(&self, dir: &Path) -> SetupResult<Translation<Self::Curve>> {
        info!(
            "Translating {} ceremony from {} over {}",
            self.name(),
            dir.display(),
            <Self::Curve as CeremonyCurve>::NAME
        );

        let span = span!(Level::TRACE, "translate", ceremony = self.name());
        let _enter = span.enter();

        let builder = self.read(dir, SrsBuilder::new())?;
        builder.finalize()
    }
}

/// Lists the regular files of `dir` as `(name, path)` pairs, in no
/// particular order. Symlinks are followed, so a link to a file counts as a
/// file and a dangling link is an I/O error. Subdirectories and non UTF-8
/// names are skipped.
pub(crate) fn list_files(dir: &Path) -> SetupResult<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| SetupError::io(dir, e))?;

    let mut files = vec![];
    for entry in entries {
        let entry = entry.map_err(|e| SetupError::io(dir, e))?;
        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(|e| SetupError::io(&path, e))?;
        if !metadata.is_file() {
            debug!("Skipping {}: not a regular file", path.display());
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => files.push((name, path)),
            Err(name) => debug!("Skipping non UTF-8 file name {:?}", name),
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn lists_only_regular_files() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a")).unwrap();
        File::create(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let mut names: Vec<_> = list_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_files() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a")).unwrap();
        File::create(elsewhere.path().join("b")).unwrap();
        symlink(elsewhere.path().join("b"), dir.path().join("linked")).unwrap();
        symlink(elsewhere.path(), dir.path().join("linked_dir")).unwrap();

        let mut names: Vec<_> = list_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a", "linked"]);

        symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();
        assert!(matches!(list_files(dir.path()), Err(SetupError::Io { .. })));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            list_files(&dir.path().join("gone")),
            Err(SetupError::Io { .. })
        ));
    }
}
