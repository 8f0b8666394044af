use std::path::PathBuf;

use crate::preview::PreviewRig;
use crate::render::RenderSession;
use crate::scene::SceneHost;

use super::archive::archive_and_remove;
use super::ExportError;

/// Method specific scene cleanup after an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodCleanup {
    /// Nothing to undo
    #[default]
    None,
    /// Remove the sphere helpers the export created
    RemovePreview {
        /// The sphere helper existed before the export
        sphere_existed: bool,
        /// The camera helper existed before the export
        camera_existed: bool,
    },
}

impl MethodCleanup {
    /// Undo the method specific scene changes
    pub fn apply(self, host: &mut dyn SceneHost, preview: &mut PreviewRig) {
        if let Self::RemovePreview { sphere_existed, camera_existed } = self {
            preview.remove_helpers(host, !camera_existed, !sphere_existed);
        }
    }
}

/// Work left once the dataset files are complete
#[derive(Debug, Clone, PartialEq)]
pub struct Finalizer {
    /// Uncompressed dataset directory
    pub dataset_dir: PathBuf,
    /// Archive to produce
    pub archive_path: PathBuf,
    /// Scene cleanup
    pub cleanup: MethodCleanup,
}

/// Restore the scene, clean up, archive the dataset and delete its directory
///
/// Returns the archive path.
pub fn finalize(
    host: &mut dyn SceneHost,
    preview: &mut PreviewRig,
    session: RenderSession,
) -> Result<PathBuf, ExportError> {
    let RenderSession { method, snapshot, finalizer } = session;

    snapshot.restore(host);
    finalizer.cleanup.apply(host, preview);
    archive_and_remove(&finalizer.dataset_dir, &finalizer.archive_path)?;

    log::info!("{method} dataset archived to {}", finalizer.archive_path.display());
    Ok(finalizer.archive_path)
}
