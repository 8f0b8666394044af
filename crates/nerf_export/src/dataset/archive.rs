//! Dataset archiving: zip the dataset directory, then delete it

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ExportError;

/// Zip the contents of `dir` into `archive`, entries relative to `dir`
///
/// Returns the number of files stored.
pub fn zip_directory(dir: &Path, archive: &Path) -> Result<usize, ExportError> {
    let mut writer = ZipWriter::new(BufWriter::new(File::create(archive)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut files = 0;
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            io::copy(&mut File::open(entry.path())?, &mut writer)?;
            files += 1;
        }
    }

    writer.finish()?;
    Ok(files)
}

/// Zip `dir` into `archive` and remove `dir`
pub fn archive_and_remove(dir: &Path, archive: &Path) -> Result<(), ExportError> {
    let files = zip_directory(dir, archive)?;
    std::fs::remove_dir_all(dir)?;
    log::debug!("Archived {files} file(s) from {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_and_remove() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("dataset");
        std::fs::create_dir_all(dir.join("train")).unwrap();
        std::fs::write(dir.join("transforms_train.json"), "{}").unwrap();
        std::fs::write(dir.join("train/0001.png"), [1u8, 2, 3]).unwrap();

        let archive = root.path().join("dataset.zip");
        archive_and_remove(&dir, &archive).unwrap();

        assert!(!dir.exists());
        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let mut names: Vec<_> = zip.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, ["train/", "train/0001.png", "transforms_train.json"]);

        let mut file = zip.by_name("train/0001.png").unwrap();
        let mut bytes = Vec::new();
        io::Read::read_to_end(&mut file, &mut bytes).unwrap();
        assert_eq!(bytes, [1, 2, 3]);
    }

    #[test]
    fn test_missing_directory_fails() {
        let root = tempfile::tempdir().unwrap();
        let result = archive_and_remove(&root.path().join("missing"), &root.path().join("missing.zip"));
        assert!(result.is_err());
    }
}
