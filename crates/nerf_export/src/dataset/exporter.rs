//! # Dataset exporter
//!
//! Entry point of an export. [`DatasetExporter::export`] validates the request, writes the
//! dataset files and either archives them right away or hands a render job to the host. In the
//! second case the host reports back through [`DatasetExporter::handle_event`], which restores
//! the scene and archives the dataset once the render completes or is cancelled.
//!
//! ## Example
//! ```no_run
//! use nerf_export::prelude::*;
//!
//! let mut scene = SceneDescription::load_from_file("scene.ron")?.build()?;
//! let mut exporter = DatasetExporter::new(ExportSettings::load_from_file("settings.toml")?);
//!
//! if exporter.export(&mut scene, MethodKind::Sof)? == ExportOutcome::Rendering {
//!     while let Some(event) = scene.poll_event()? {
//!         if let Some(archive) = exporter.handle_event(&mut scene, event)? {
//!             println!("{}", archive.display());
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::{Path, PathBuf};

use crate::config::ExportSettings;
use crate::preview::{Echo, PreviewRig};
use crate::render::{RenderLifecycleController, RenderSession, SceneSnapshot, SessionError};
use crate::scene::{HostEvent, SceneHost};

use super::finalize::{finalize, Finalizer};
use super::methods::{cos, dfc, sof, ttc, ExportContext, MethodRun};
use super::paths::{archive_path, dataset_dir};
use super::point_cloud::write_points_ply;
use super::run_log::RunLog;
use super::validation::{validate, ValidationError};
use super::{ExportError, MethodKind, SamplingMethod};

/// Run log file name
pub const LOG_FILE: &str = "log.txt";

/// Gaussian splatting point cloud file name
pub const POINT_CLOUD_FILE: &str = "points3d.ply";

/// Result of a successful export call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Dataset written and archived
    Archived(PathBuf),
    /// Render started; the archive is written when the host reports completion
    Rendering,
}

/// Exporter state: settings, sphere helpers and the render session
#[derive(Debug, Default)]
pub struct DatasetExporter {
    settings: ExportSettings,
    preview: PreviewRig,
    controller: RenderLifecycleController,
    initialized: bool,
}

impl DatasetExporter {
    /// Create an exporter with `settings`
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Current settings
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Mutable settings; call [`Self::push_preview`] after editing the sphere
    pub fn settings_mut(&mut self) -> &mut ExportSettings {
        &mut self.settings
    }

    /// Sphere helper state
    pub fn preview(&self) -> &PreviewRig {
        &self.preview
    }

    /// Render session controller
    pub fn controller(&self) -> &RenderLifecycleController {
        &self.controller
    }

    /// Whether an export render is in flight
    pub fn is_rendering(&self) -> bool {
        self.controller.is_rendering()
    }

    /// One-time setup against the host: an empty save path defaults to the project directory
    pub fn initialize(&mut self, host: &dyn SceneHost) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        if self.settings.common.save_path.is_empty() {
            if let Some(dir) = host.project_dir() {
                log::debug!("Save path defaults to {}", dir.display());
                self.settings.common.save_path = dir.display().to_string();
            }
        }
    }

    /// Show or hide the sphere helper
    pub fn set_show_sphere(&mut self, host: &mut dyn SceneHost, on: bool) {
        self.preview.set_show_sphere(host, &self.settings.cos, on);
    }

    /// Show or hide the sphere camera helper
    pub fn set_show_camera(&mut self, host: &mut dyn SceneHost, on: bool) {
        self.preview.set_show_camera(host, &self.settings.cos, on);
    }

    /// Push sphere settings into the helper objects
    pub fn push_preview(&mut self, host: &mut dyn SceneHost, echo: Echo) {
        self.preview.push_to_scene(host, &self.settings.cos, echo);
    }

    /// Every failed precondition of exporting with `kind`
    pub fn validate(&self, host: &dyn SceneHost, kind: MethodKind) -> Vec<ValidationError> {
        let method = SamplingMethod::from_settings(&self.settings, kind);
        validate(host, &self.settings.common, &method)
    }

    /// Export a dataset with the `kind` sampling method
    ///
    /// Nothing is written and the scene is untouched when validation fails; the first failed
    /// precondition is returned.
    pub fn export(&mut self, host: &mut dyn SceneHost, kind: MethodKind) -> Result<ExportOutcome, ExportError> {
        self.initialize(host);
        if let Some(active) = self.controller.active_method() {
            return Err(SessionError::AlreadyRendering(active).into());
        }

        let method = SamplingMethod::from_settings(&self.settings, kind);
        if let Some(first) = validate(host, &self.settings.common, &method).into_iter().next() {
            log::error!("{kind} export rejected: {first}");
            return Err(ExportError::Invalid(first));
        }

        let dataset_dir = dataset_dir(&self.settings.common.save_path, method.dataset_name());
        let archive_path = archive_path(&dataset_dir);
        log::info!("{kind} export into {}", dataset_dir.display());

        let snapshot = SceneSnapshot::capture(host);
        let run = match self.write_dataset(host, &method, &dataset_dir) {
            Ok(run) => run,
            Err(err) => {
                snapshot.restore(host);
                return Err(err);
            }
        };

        let session = RenderSession {
            method: kind,
            snapshot,
            finalizer: Finalizer {
                dataset_dir,
                archive_path,
                cleanup: run.cleanup,
            },
        };

        match run.render {
            Some(job) => {
                self.controller.begin(host, session, job)?;
                Ok(ExportOutcome::Rendering)
            }
            None => finalize(host, &mut self.preview, session).map(ExportOutcome::Archived),
        }
    }

    fn write_dataset(
        &mut self,
        host: &mut dyn SceneHost,
        method: &SamplingMethod,
        dataset_dir: &Path,
    ) -> Result<MethodRun, ExportError> {
        std::fs::create_dir_all(dataset_dir)?;
        let common = &self.settings.common;

        if common.logs {
            RunLog::new(host, common, method).write(&dataset_dir.join(LOG_FILE))?;
        }
        if common.splats {
            let vertices = host.visible_mesh_vertices();
            write_points_ply(&vertices, &dataset_dir.join(POINT_CLOUD_FILE))?;
            log::debug!("Wrote {} point(s) to {POINT_CLOUD_FILE}", vertices.len());
        }

        let ctx = ExportContext::new(host, common, dataset_dir);
        match method {
            SamplingMethod::SubsetOfFrames(params) => sof::run(host, &ctx, params),
            SamplingMethod::TrainTestCameras(params) => ttc::run(host, &ctx, params),
            SamplingMethod::CameraOnSphere(params) => cos::run(host, &ctx, params, &mut self.preview),
            SamplingMethod::DatasetFromCameras(params) => dfc::run(host, &ctx, params),
        }
    }

    /// Route a host notification
    ///
    /// Returns the archive path when the event finished an export render.
    pub fn handle_event(&mut self, host: &mut dyn SceneHost, event: HostEvent) -> Result<Option<PathBuf>, ExportError> {
        match event {
            HostEvent::FrameChanged(frame) => {
                self.preview.reposition_camera(host, &self.settings.cos.sphere(), frame);
                Ok(None)
            }
            HostEvent::SceneUpdated => {
                self.preview.pull_from_scene(host, &mut self.settings.cos);
                Ok(None)
            }
            HostEvent::RenderComplete | HostEvent::RenderCancelled => {
                let Some(session) = self.controller.end() else {
                    return Ok(None);
                };
                if event == HostEvent::RenderCancelled {
                    log::warn!("{} render cancelled, archiving what was rendered", session.method);
                }
                finalize(host, &mut self.preview, session).map(Some)
            }
        }
    }
}
