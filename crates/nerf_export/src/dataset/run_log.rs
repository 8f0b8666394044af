//! Run log (`log.txt`): a flat JSON record of the settings an export ran with

use std::path::Path;

use chrono::{DateTime, Local};
use serde_json::{json, Map, Value};

use crate::config::CommonSettings;
use crate::foundation::math::Vec3;
use crate::scene::{ObjectId, SceneHost};

use super::manifest::write_json;
use super::{ExportError, SamplingMethod};

/// Timestamp layout of the run log
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Ordered key/value record of one export
#[derive(Debug, Clone, PartialEq)]
pub struct RunLog {
    entries: Map<String, Value>,
}

impl RunLog {
    /// Record of exporting `method` now
    pub fn new(host: &dyn SceneHost, common: &CommonSettings, method: &SamplingMethod) -> Self {
        Self::at(host, common, method, Local::now())
    }

    /// Record of exporting `method` at `timestamp`
    pub fn at(
        host: &dyn SceneHost,
        common: &CommonSettings,
        method: &SamplingMethod,
        timestamp: DateTime<Local>,
    ) -> Self {
        let mut log = Self { entries: Map::new() };

        log.entry("Exporter Version", env!("CARGO_PKG_VERSION"));
        log.entry("Date and Time", timestamp.format(TIMESTAMP_FORMAT).to_string());
        log.entry("Train", common.train_data);
        log.entry("Test", common.test_data);
        log.entry("AABB", common.aabb);
        log.entry("Render Frames", common.render_frames);
        log.entry("File Format", common.dialect().label());
        log.entry("Save Log File", common.logs);
        log.entry("Gaussian Points", common.splats);
        log.entry(
            "Gaussian Test Camera Poses",
            if common.splats_test_dummy { "Dummy" } else { "Full" },
        );
        log.entry("Save Path", common.save_path.as_str());
        log.entry("Method", method.kind().tag());

        let active_camera = camera_name(host, host.active_camera());
        match method {
            SamplingMethod::SubsetOfFrames(sof) => {
                log.entry("Frame Step", sof.train_frame_steps);
                log.entry("Camera", active_camera);
            }
            SamplingMethod::TrainTestCameras(ttc) => {
                log.entry("Train Camera Name", ttc.train_camera.clone());
                log.entry("Test Camera Name", ttc.test_camera.clone());
                log.entry("Frames", ttc.nb_frames);
            }
            SamplingMethod::CameraOnSphere(cos) => {
                log.entry("Camera", active_camera);
                log.entry("Location", vector(cos.location));
                log.entry("Rotation", vector(cos.rotation.map(f64::to_degrees)));
                log.entry("Scale", vector(cos.scale));
                log.entry("Radius", cos.radius);
                log.entry("Lens", format!("{} mm", cos.focal));
                log.entry("Seed", cos.seed);
                log.entry("Frames", cos.nb_frames);
                log.entry("Upper Views", cos.upper_views);
                log.entry("Outwards", cos.outwards);
            }
            SamplingMethod::DatasetFromCameras(dfc) => {
                log.entry("Train Collection", dfc.train_collection.clone());
                log.entry("Test Collection", dfc.test_collection.clone());
            }
        }

        log.entry("Dataset Name", method.dataset_name());
        log
    }

    fn entry(&mut self, key: &str, value: impl Into<Value>) {
        self.entries.insert(key.to_string(), value.into());
    }

    /// Value recorded under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Keys in recording order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Write as JSON
    pub fn write(&self, path: &Path) -> Result<(), ExportError> {
        write_json(path, &self.entries)
    }
}

fn camera_name(host: &dyn SceneHost, camera: Option<ObjectId>) -> Option<String> {
    camera.and_then(|id| host.object_name(id)).map(str::to_string)
}

fn vector(v: Vec3) -> Value {
    json!([v.x, v.y, v.z])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraData;
    use crate::config::ExportSettings;
    use crate::dataset::MethodKind;
    use crate::foundation::math::Transform;
    use crate::scene::MemoryScene;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn test_sof_entries_in_order() {
        let mut scene = MemoryScene::new();
        let camera = scene.create_camera("Main", CameraData::default(), Transform::identity());
        scene.set_active_camera(Some(camera));

        let settings = ExportSettings::default();
        let method = SamplingMethod::from_settings(&settings, MethodKind::Sof);
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let log = RunLog::at(&scene, &settings.common, &method, timestamp);

        let keys: Vec<_> = log.keys().collect();
        assert_eq!(keys[..3], ["Exporter Version", "Date and Time", "Train"]);
        assert_eq!(keys[keys.len() - 3..], ["Frame Step", "Camera", "Dataset Name"]);
        assert_eq!(log.get("Date and Time"), Some(&json!("2024-03-09 14:05:00")));
        assert_eq!(log.get("Camera"), Some(&json!("Main")));
        assert_eq!(log.get("File Format"), Some(&json!("NGP")));
        assert_eq!(log.get("Method"), Some(&json!("SOF")));
    }

    #[test]
    fn test_cos_entries() {
        let scene = MemoryScene::new();
        let mut settings = ExportSettings::default();
        settings.cos.rotation.z = std::f64::consts::FRAC_PI_2;
        let method = SamplingMethod::from_settings(&settings, MethodKind::Cos);
        let log = RunLog::new(&scene, &settings.common, &method);

        assert_eq!(log.get("Camera"), Some(&Value::Null));
        assert_eq!(log.get("Lens"), Some(&json!("50 mm")));
        let rotation_z = log.get("Rotation").unwrap()[2].as_f64().unwrap();
        assert_relative_eq!(rotation_z, 90.0, epsilon = 1e-9);
        assert_eq!(log.get("Radius"), Some(&json!(4.0)));
    }
}
