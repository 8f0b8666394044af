//! Exports that finish inside the export call: no render, or nothing to render

use approx::assert_relative_eq;

use super::*;
use crate::dataset::{ExportError, ExportOutcome, MethodKind, ValidationError};
use crate::preview::{CAMERA_NAME, SPHERE_NAME};
use crate::sampling::sample_sphere;

fn exporter_without_render(fixture: &Fixture) -> DatasetExporter {
    let mut settings = fixture.settings();
    settings.common.render_frames = false;
    DatasetExporter::new(settings)
}

#[test]
fn test_sof_writes_strided_train_and_full_test() {
    let mut fixture = Fixture::new();
    let mut exporter = exporter_without_render(&fixture);
    exporter.settings_mut().common.logs = true;
    exporter.settings_mut().sof.train_frame_steps = 2;

    let outcome = exporter.export(&mut fixture.scene, MethodKind::Sof).unwrap();
    let archive = fixture.archive();
    assert_eq!(outcome, ExportOutcome::Archived(archive.clone()));
    assert!(!fixture.save.path().join("dataset").exists());

    assert_eq!(entries(&archive), ["log.txt", "transforms_test.json", "transforms_train.json"]);

    let train = manifest(&archive, "transforms_train.json");
    assert_eq!(file_paths(&train), ["train/0001.png", "train/0003.png", "train/0005.png"]);
    assert_eq!(train["aabb_scale"], 4);
    assert_eq!(train["w"], 32);
    assert_eq!(train["h"], 24);

    let test = manifest(&archive, "transforms_test.json");
    assert_eq!(file_paths(&test).len(), 6);
    assert_eq!(file_paths(&test)[5], "test/0006.png");

    // Keyed camera: poses follow the animation
    assert_relative_eq!(frame_position(&test, 0), Vec3::new(0.0, -6.0, 1.0), epsilon = 1e-9);
    assert_relative_eq!(frame_position(&test, 5), Vec3::new(6.0, 0.0, 1.0), epsilon = 1e-9);

    let log: Value = serde_json::from_str(&read_entry(&archive, "log.txt")).unwrap();
    assert!(log.is_object());

    fixture.assert_scene_restored();
    assert_eq!(fixture.scene.frame_current(), 1);
}

#[test]
fn test_nerf_dialect_drops_extension_and_aabb() {
    let mut fixture = Fixture::new();
    let mut exporter = exporter_without_render(&fixture);
    exporter.settings_mut().common.nerf = true;
    // Ignored outside the instant-ngp dialect
    exporter.settings_mut().common.aabb = 3;

    exporter.export(&mut fixture.scene, MethodKind::Sof).unwrap();

    let train = manifest(&fixture.archive(), "transforms_train.json");
    assert_eq!(file_paths(&train), ["train/0001", "train/0004"]);
    assert!(train.get("aabb_scale").is_none());
    assert!(train.get("camera_angle_x").is_some());
}

#[test]
fn test_splats_export_writes_point_cloud_and_placeholder_test() {
    let mut fixture = Fixture::new();
    let mut exporter = exporter_without_render(&fixture);
    exporter.settings_mut().common.splats = true;

    exporter.export(&mut fixture.scene, MethodKind::Sof).unwrap();
    let archive = fixture.archive();

    assert!(entries(&archive).contains(&"points3d.ply".to_string()));
    let ply = read_entry(&archive, "points3d.ply");
    assert!(ply.contains("element vertex 54"));

    let train = manifest(&archive, "transforms_train.json");
    assert_eq!(file_paths(&train)[0], "train/0001");

    let test = manifest(&archive, "transforms_test.json");
    assert!(file_paths(&test).is_empty());
    assert!(test.get("fl_x").is_some());
}

#[test]
fn test_failed_validation_writes_nothing() {
    let mut fixture = Fixture::new();
    fixture.scene.set_active_camera(None);
    let mut exporter = exporter_without_render(&fixture);

    let err = exporter.export(&mut fixture.scene, MethodKind::Sof).unwrap_err();
    assert!(matches!(err, ExportError::Invalid(ValidationError::MissingCamera)));
    assert_eq!(err.to_string(), "Be sure to have a selected camera!");
    assert!(std::fs::read_dir(fixture.save.path()).unwrap().next().is_none());
}

#[test]
fn test_splats_with_jpeg_is_rejected() {
    let mut fixture = Fixture::new();
    fixture.scene.render_settings_mut().file_format = crate::render::ImageFormat::Jpeg;
    let mut exporter = exporter_without_render(&fixture);
    exporter.settings_mut().common.splats = true;

    let err = exporter.export(&mut fixture.scene, MethodKind::Sof).unwrap_err();
    assert!(matches!(err, ExportError::Invalid(ValidationError::SplatsRequirePng)));
}

#[test]
fn test_ttc_uses_both_cameras() {
    let mut fixture = Fixture::new();
    fixture.add_camera("Witness", 3.0, None);
    let mut exporter = exporter_without_render(&fixture);
    let ttc = &mut exporter.settings_mut().ttc;
    ttc.train_camera = Some("Camera".to_string());
    ttc.test_camera = Some("Witness".to_string());
    ttc.nb_frames = 3;

    exporter.export(&mut fixture.scene, MethodKind::Ttc).unwrap();
    let archive = fixture.archive();

    let train = manifest(&archive, "transforms_train.json");
    assert_eq!(file_paths(&train), ["train/0001.png", "train/0002.png", "train/0003.png"]);

    let test = manifest(&archive, "transforms_test.json");
    assert_eq!(file_paths(&test).len(), 6);
    assert_relative_eq!(frame_position(&test, 4), Vec3::new(3.0, -5.0, 0.0), epsilon = 1e-9);

    fixture.assert_scene_restored();
}

#[test]
fn test_ttc_with_unknown_camera_is_rejected() {
    let mut fixture = Fixture::new();
    let mut exporter = exporter_without_render(&fixture);
    exporter.settings_mut().ttc.train_camera = Some("Camera".to_string());
    exporter.settings_mut().ttc.test_camera = Some("Nobody".to_string());

    let err = exporter.export(&mut fixture.scene, MethodKind::Ttc).unwrap_err();
    assert!(matches!(err, ExportError::Invalid(ValidationError::MissingTrainTestCameras)));
}

#[test]
fn test_cos_samples_sphere_and_removes_created_helpers() {
    let mut fixture = Fixture::new();
    let mut exporter = exporter_without_render(&fixture);
    exporter.settings_mut().cos.nb_frames = 4;
    exporter.settings_mut().cos.seed = 7;

    exporter.export(&mut fixture.scene, MethodKind::Cos).unwrap();
    let archive = fixture.archive();

    let train = manifest(&archive, "transforms_train.json");
    assert_eq!(file_paths(&train).len(), 4);
    let sphere = exporter.settings().cos.sphere();
    for (index, frame) in (1..=4).enumerate() {
        assert_relative_eq!(frame_position(&train, index), sample_sphere(&sphere, frame).point, epsilon = 1e-9);
    }

    // Test split comes from the active camera
    let test = manifest(&archive, "transforms_test.json");
    assert_eq!(file_paths(&test).len(), 6);

    assert!(fixture.scene.find_object(CAMERA_NAME).is_none());
    assert!(fixture.scene.find_object(SPHERE_NAME).is_none());
    assert!(!exporter.preview().show_camera());
    fixture.assert_scene_restored();
}

#[test]
fn test_cos_keeps_helpers_that_existed() {
    let mut fixture = Fixture::new();
    let mut exporter = exporter_without_render(&fixture);
    exporter.set_show_sphere(&mut fixture.scene, true);
    exporter.set_show_camera(&mut fixture.scene, true);

    exporter.export(&mut fixture.scene, MethodKind::Cos).unwrap();

    assert!(fixture.scene.find_object(CAMERA_NAME).is_some());
    assert!(fixture.scene.find_object(SPHERE_NAME).is_some());
    assert!(exporter.preview().show_sphere());
    assert!(exporter.preview().show_camera());
}

#[test]
fn test_cos_focal_drives_train_intrinsics() {
    let mut fixture = Fixture::new();
    let mut exporter = exporter_without_render(&fixture);
    exporter.settings_mut().cos.focal = 25.0;

    exporter.export(&mut fixture.scene, MethodKind::Cos).unwrap();
    let archive = fixture.archive();

    let train = manifest(&archive, "transforms_train.json");
    let test = manifest(&archive, "transforms_test.json");
    let train_fl = train["fl_x"].as_f64().unwrap();
    let test_fl = test["fl_x"].as_f64().unwrap();
    assert_relative_eq!(train_fl * 2.0, test_fl, epsilon = 1e-9);
}

#[test]
fn test_dfc_writes_one_pose_per_collection_camera() {
    let mut fixture = Fixture::new();
    fixture.add_camera("Left", -2.0, Some("TrainCams"));
    fixture.add_camera("Right", 2.0, Some("TrainCams"));
    fixture.add_camera("Front", 0.0, Some("TestCams"));

    let mut exporter = exporter_without_render(&fixture);
    exporter.settings_mut().dfc.train_collection = Some("TrainCams".to_string());
    exporter.settings_mut().dfc.test_collection = Some("TestCams".to_string());

    exporter.export(&mut fixture.scene, MethodKind::Dfc).unwrap();
    let archive = fixture.archive();

    let train = manifest(&archive, "transforms_train.json");
    assert_eq!(file_paths(&train), ["train/Left.png", "train/Right.png"]);
    assert_relative_eq!(frame_position(&train, 1), Vec3::new(2.0, -5.0, 0.0), epsilon = 1e-9);

    let test = manifest(&archive, "transforms_test.json");
    assert_eq!(file_paths(&test), ["test/Front.png"]);
}

#[test]
fn test_dfc_missing_collection_is_rejected() {
    let mut fixture = Fixture::new();
    fixture.add_camera("Left", -2.0, Some("TrainCams"));
    let mut exporter = exporter_without_render(&fixture);
    exporter.settings_mut().dfc.train_collection = Some("TrainCams".to_string());

    let err = exporter.export(&mut fixture.scene, MethodKind::Dfc).unwrap_err();
    assert!(matches!(err, ExportError::Invalid(ValidationError::MissingCollection(crate::dataset::Split::Test))));
}

#[test]
fn test_save_path_defaults_to_project_dir() {
    let mut fixture = Fixture::new();
    fixture.scene.set_project_dir(Some(fixture.save.path().to_path_buf()));
    let mut settings = ExportSettings::default();
    settings.common.render_frames = false;
    let mut exporter = DatasetExporter::new(settings);

    let outcome = exporter.export(&mut fixture.scene, MethodKind::Sof).unwrap();
    assert_eq!(outcome, ExportOutcome::Archived(fixture.archive()));
    assert_eq!(exporter.settings().common.save_path, fixture.save.path().display().to_string());
}

#[test]
fn test_dataset_name_is_cleaned() {
    let mut fixture = Fixture::new();
    let mut exporter = exporter_without_render(&fixture);
    exporter.settings_mut().sof.dataset_name = "lego scene.v2".to_string();

    let outcome = exporter.export(&mut fixture.scene, MethodKind::Sof).unwrap();
    assert_eq!(outcome, ExportOutcome::Archived(fixture.save.path().join("lego_scene_v2.zip")));
}
