use std::path::{Path, PathBuf};

/// Replace every character that is unsafe in file names with `_`
///
/// ASCII letters, digits, `-` and `_` are kept, as is anything outside Latin-1.
pub fn clean_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || u32::from(c) > 0xFF {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Uncompressed dataset directory, `<save_path>/<clean name>`
pub fn dataset_dir(save_path: impl AsRef<Path>, dataset_name: &str) -> PathBuf {
    save_path.as_ref().join(clean_name(dataset_name))
}

/// Archive written for a dataset directory, `<dir>.zip`
pub fn archive_path(dataset_dir: &Path) -> PathBuf {
    dataset_dir.with_extension("zip")
}
