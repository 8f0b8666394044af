//! End-to-end exports against the in-memory host

mod export_flow;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::camera::CameraData;
use crate::config::ExportSettings;
use crate::foundation::math::{Transform, Vec3};
use crate::render::FrameRange;
use crate::scene::{MemoryScene, Mesh, MeshPrimitive, ObjectId, SceneHost, TrackAxis};

use super::DatasetExporter;

/// Output path the scene carries before any export
const SCENE_OUTPUT: &str = "/render/out/";

struct Fixture {
    scene: MemoryScene,
    camera: ObjectId,
    save: tempfile::TempDir,
}

impl Fixture {
    /// Small scene: a cube, a target empty and a keyed camera tracking it over frames 1..=6
    fn new() -> Self {
        crate::foundation::logging::init_for_tests();

        let mut scene = MemoryScene::new();
        let render = scene.render_settings_mut();
        render.resolution_x = 32;
        render.resolution_y = 24;
        render.output_path = PathBuf::from(SCENE_OUTPUT);
        scene.set_frame_range(FrameRange::new(1, 6, 1));

        let target = scene.create_empty("Target", Transform::identity(), 1.0);
        scene.add_mesh(
            "Cube",
            Mesh::from_primitive(&MeshPrimitive::Cube { size: 2.0, subdivisions: 2 }, [200, 120, 40]),
            Transform::identity(),
        );

        let camera = scene.create_camera(
            "Camera",
            CameraData::default(),
            Transform::from_position(Vec3::new(0.0, -6.0, 1.0)),
        );
        scene.insert_keyframe(camera, 1, Transform::from_position(Vec3::new(0.0, -6.0, 1.0)));
        scene.insert_keyframe(camera, 6, Transform::from_position(Vec3::new(6.0, 0.0, 1.0)));
        scene.add_track_to(camera, target, TrackAxis::NegativeZ);
        scene.set_active_camera(Some(camera));
        scene.set_frame(1);

        Self {
            scene,
            camera,
            save: tempfile::tempdir().unwrap(),
        }
    }

    fn settings(&self) -> ExportSettings {
        let mut settings = ExportSettings::default();
        settings.common.save_path = self.save.path().display().to_string();
        settings
    }

    fn archive(&self) -> PathBuf {
        self.save.path().join("dataset.zip")
    }

    /// Extra static camera aimed along +Y, optionally linked to `collection`
    fn add_camera(&mut self, name: &str, x: f64, collection: Option<&str>) -> ObjectId {
        let id = self.scene.create_camera(
            name,
            CameraData::default(),
            Transform::from_euler(
                Vec3::new(x, -5.0, 0.0),
                Vec3::new(std::f64::consts::FRAC_PI_2, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 1.0),
            ),
        );
        if let Some(collection) = collection {
            self.scene.link_to_collection(collection, id);
        }
        id
    }

    /// Feed host events to the exporter until the host goes quiet
    fn pump(&mut self, exporter: &mut DatasetExporter) -> Option<PathBuf> {
        let mut archive = None;
        while let Some(event) = self.scene.poll_event().unwrap() {
            if let Some(path) = exporter.handle_event(&mut self.scene, event).unwrap() {
                archive = Some(path);
            }
        }
        archive
    }

    fn assert_scene_restored(&self) {
        assert_eq!(self.scene.frame_range(), FrameRange::new(1, 6, 1));
        assert_eq!(self.scene.render_settings().output_path, PathBuf::from(SCENE_OUTPUT));
        assert_eq!(self.scene.active_camera(), Some(self.camera));
    }
}

/// Sorted entry names of a zip archive
fn entries(archive: &Path) -> Vec<String> {
    let zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut names: Vec<_> = zip.file_names().map(str::to_string).collect();
    names.sort();
    names
}

fn read_entry(archive: &Path, name: &str) -> String {
    let mut zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut contents = String::new();
    zip.by_name(name).unwrap().read_to_string(&mut contents).unwrap();
    contents
}

fn manifest(archive: &Path, name: &str) -> Value {
    serde_json::from_str(&read_entry(archive, name)).unwrap()
}

fn file_paths(manifest: &Value) -> Vec<&str> {
    manifest["frames"]
        .as_array()
        .unwrap()
        .iter()
        .map(|frame| frame["file_path"].as_str().unwrap())
        .collect()
}

/// Translation column of the `index`-th frame pose
fn frame_position(manifest: &Value, index: usize) -> Vec3 {
    let rows = &manifest["frames"][index]["transform_matrix"];
    Vec3::new(
        rows[0][3].as_f64().unwrap(),
        rows[1][3].as_f64().unwrap(),
        rows[2][3].as_f64().unwrap(),
    )
}
