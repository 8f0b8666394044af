//! # In-memory scene host
//!
//! A complete [`SceneHost`] backed by a slot map of objects. It evaluates keyframed transforms
//! and track-to constraints, keeps named collections, and renders asynchronously: a job handed
//! to [`SceneHost::invoke_render`] only starts when the owner pumps [`MemoryScene::poll_event`],
//! which draws one image per call and reports progress as [`HostEvent`]s.
//!
//! Images are drawn by the point-splat rasterizer in [`super::raster`].

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

use slotmap::SlotMap;

use crate::camera::CameraData;
use crate::foundation::math::{Mat4, Point3, Transform, Vec3};
use crate::render::{FrameRange, RenderJob, RenderSettings};

use super::constraint::track_to_rotation;
use super::mesh::Mesh;
use super::{raster, HostEvent, MeshVertex, ObjectId, SceneError, SceneHost, TrackAxis};

/// Object payload
#[derive(Debug, Clone, PartialEq)]
enum ObjectData {
    Camera(CameraData),
    Empty { display_size: f64 },
    Mesh(Mesh),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TrackTo {
    target: ObjectId,
    axis: TrackAxis,
}

#[derive(Debug, Clone)]
struct SceneObject {
    name: String,
    data: ObjectData,
    transform: Transform,
    /// Sorted by frame
    keyframes: Vec<(i32, Transform)>,
    track_to: Option<TrackTo>,
    visible: bool,
}

impl SceneObject {
    fn new(name: String, data: ObjectData, transform: Transform) -> Self {
        Self {
            name,
            data,
            transform,
            keyframes: Vec::new(),
            track_to: None,
            visible: true,
        }
    }

    /// Keyframed transform at `frame`, held constant outside the keyed range
    fn evaluate(&self, frame: i32) -> Option<Transform> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        if frame <= first.0 {
            return Some(first.1);
        }
        if frame >= last.0 {
            return Some(last.1);
        }

        self.keyframes.windows(2).find_map(|pair| {
            let ((f0, t0), (f1, t1)) = (pair[0], pair[1]);
            (f0..=f1).contains(&frame).then(|| {
                let t = f64::from(frame - f0) / f64::from(f1 - f0);
                t0.interpolate(&t1, t)
            })
        })
    }
}

#[derive(Debug, Clone)]
struct ActiveRender {
    job: RenderJob,
    cursor: usize,
    /// Animation frame entered but not drawn yet
    frame_entered: bool,
}

enum RenderStep {
    Complete,
    EnterFrame(i32),
    Draw { camera: ObjectId, file: PathBuf },
}

/// In-memory scene host
#[derive(Debug, Clone)]
pub struct MemoryScene {
    objects: SlotMap<ObjectId, SceneObject>,
    collections: BTreeMap<String, Vec<ObjectId>>,
    frame_current: i32,
    frame_range: FrameRange,
    render: RenderSettings,
    active_camera: Option<ObjectId>,
    project_dir: Option<PathBuf>,
    events: VecDeque<HostEvent>,
    active_render: Option<ActiveRender>,
    rendered: Vec<PathBuf>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    /// Create an empty scene at frame 1
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            collections: BTreeMap::new(),
            frame_current: 1,
            frame_range: FrameRange::default(),
            render: RenderSettings::default(),
            active_camera: None,
            project_dir: None,
            events: VecDeque::new(),
            active_render: None,
            rendered: Vec::new(),
        }
    }

    /// Number of objects in the scene
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Mutable access to the render settings
    pub fn render_settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.render
    }

    /// Set the directory reported as the project location
    pub fn set_project_dir(&mut self, dir: Option<PathBuf>) {
        self.project_dir = dir;
    }

    /// Add a mesh object
    pub fn add_mesh(&mut self, name: &str, mesh: Mesh, transform: Transform) -> ObjectId {
        self.insert(name, ObjectData::Mesh(mesh), transform)
    }

    /// Key the transform of `id` at `frame`
    pub fn insert_keyframe(&mut self, id: ObjectId, frame: i32, transform: Transform) {
        if let Some(object) = self.objects.get_mut(id) {
            match object.keyframes.binary_search_by_key(&frame, |(f, _)| *f) {
                Ok(index) => object.keyframes[index].1 = transform,
                Err(index) => object.keyframes.insert(index, (frame, transform)),
            }
        }
        self.evaluate_frame();
    }

    /// Show or hide an object in renders and mesh queries
    pub fn set_visible(&mut self, id: ObjectId, visible: bool) {
        if let Some(object) = self.objects.get_mut(id) {
            object.visible = visible;
        }
    }

    /// Append `id` to the collection `name`, creating it if needed
    pub fn link_to_collection(&mut self, name: &str, id: ObjectId) {
        let members = self.collections.entry(name.to_string()).or_default();
        if !members.contains(&id) {
            members.push(id);
        }
    }

    /// Change the frame as an interactive user would, notifying listeners
    pub fn scrub_to(&mut self, frame: i32) {
        self.set_frame(frame);
        self.events.push_back(HostEvent::FrameChanged(frame));
    }

    /// Queue a scene update notification after an external edit
    pub fn notify_scene_updated(&mut self) {
        self.events.push_back(HostEvent::SceneUpdated);
    }

    /// Whether a render job is in progress
    pub fn is_rendering(&self) -> bool {
        self.active_render.is_some()
    }

    /// Abort the render job in progress
    pub fn cancel_render(&mut self) {
        if self.active_render.take().is_some() {
            log::info!("Render cancelled");
            self.events.push_back(HostEvent::RenderCancelled);
        }
    }

    /// Files written by renders so far
    pub fn rendered_files(&self) -> &[PathBuf] {
        &self.rendered
    }

    /// Next host event, advancing the render job as needed
    ///
    /// Returns `Ok(None)` once nothing is queued and no render is in progress. A failed image
    /// write aborts the job with a [`HostEvent::RenderCancelled`] queued behind the error.
    pub fn poll_event(&mut self) -> Result<Option<HostEvent>, SceneError> {
        loop {
            if let Some(event) = self.events.pop_front() {
                return Ok(Some(event));
            }
            if self.active_render.is_none() {
                return Ok(None);
            }
            if let Err(err) = self.advance_render() {
                self.active_render = None;
                self.events.push_back(HostEvent::RenderCancelled);
                return Err(err);
            }
        }
    }

    fn next_step(&self, render: &ActiveRender) -> Result<RenderStep, SceneError> {
        let step = match &render.job {
            RenderJob::Animation { range, output_dir } => {
                match range.frames().nth(render.cursor) {
                    None => RenderStep::Complete,
                    Some(frame) if !render.frame_entered => RenderStep::EnterFrame(frame),
                    Some(frame) => RenderStep::Draw {
                        camera: self.active_camera.ok_or(SceneError::NoCamera)?,
                        file: output_dir
                            .join(format!("{}{}", self.frame_stem(frame), self.render.file_format.extension())),
                    },
                }
            }
            RenderJob::Stills(shots) => match shots.get(render.cursor) {
                None => RenderStep::Complete,
                Some(shot) => RenderStep::Draw {
                    camera: shot.camera,
                    file: shot.output_file.clone(),
                },
            },
        };
        Ok(step)
    }

    fn advance_render(&mut self) -> Result<(), SceneError> {
        let Some(mut render) = self.active_render.take() else {
            return Ok(());
        };

        match self.next_step(&render)? {
            RenderStep::Complete => {
                log::debug!("Render complete: {} image(s)", render.job.image_count());
                self.events.push_back(HostEvent::RenderComplete);
                return Ok(());
            }
            RenderStep::EnterFrame(frame) => {
                self.set_frame(frame);
                self.events.push_back(HostEvent::FrameChanged(frame));
                render.frame_entered = true;
            }
            RenderStep::Draw { camera, file } => {
                self.write_image(camera, &file)?;
                render.cursor += 1;
                render.frame_entered = false;
            }
        }

        self.active_render = Some(render);
        Ok(())
    }

    fn write_image(&mut self, camera: ObjectId, file: &Path) -> Result<(), SceneError> {
        let image = raster::render_view(&*self, camera)?;
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        image.save(file)?;

        log::trace!("Rendered {}", file.display());
        self.rendered.push(file.to_path_buf());
        Ok(())
    }

    fn insert(&mut self, name: &str, data: ObjectData, transform: Transform) -> ObjectId {
        let name = self.unique_name(name);
        self.objects.insert(SceneObject::new(name, data, transform))
    }

    /// `name`, or `name.001`, `name.002`, ... when taken
    fn unique_name(&self, name: &str) -> String {
        if self.find_object(name).is_none() {
            return name.to_string();
        }
        (1..)
            .map(|n| format!("{name}.{n:03}"))
            .find(|candidate| self.find_object(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }

    fn evaluate_frame(&mut self) {
        let frame = self.frame_current;
        for object in self.objects.values_mut() {
            if let Some(transform) = object.evaluate(frame) {
                object.transform = transform;
            }
        }
    }
}

impl SceneHost for MemoryScene {
    fn frame_current(&self) -> i32 {
        self.frame_current
    }

    fn set_frame(&mut self, frame: i32) {
        self.frame_current = frame;
        self.evaluate_frame();
    }

    fn frame_range(&self) -> FrameRange {
        self.frame_range
    }

    fn set_frame_range(&mut self, range: FrameRange) {
        self.frame_range = range;
    }

    fn render_settings(&self) -> &RenderSettings {
        &self.render
    }

    fn set_output_path(&mut self, path: PathBuf) {
        self.render.output_path = path;
    }

    fn invoke_render(&mut self, job: RenderJob) {
        if self.active_render.is_some() {
            log::warn!("Render already in progress, ignoring new job");
            return;
        }
        self.active_render = Some(ActiveRender {
            job,
            cursor: 0,
            frame_entered: false,
        });
    }

    fn active_camera(&self) -> Option<ObjectId> {
        self.active_camera
    }

    fn set_active_camera(&mut self, camera: Option<ObjectId>) {
        self.active_camera = camera.filter(|id| self.objects.contains_key(*id));
    }

    fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find_map(|(id, object)| (object.name == name).then_some(id))
    }

    fn object_name(&self, id: ObjectId) -> Option<&str> {
        self.objects.get(id).map(|object| object.name.as_str())
    }

    fn camera_data(&self, id: ObjectId) -> Option<CameraData> {
        match self.objects.get(id)?.data {
            ObjectData::Camera(data) => Some(data),
            _ => None,
        }
    }

    fn world_matrix(&self, id: ObjectId) -> Option<Mat4> {
        let object = self.objects.get(id)?;
        let mut transform = object.transform;

        if let Some(track) = object.track_to {
            if let Some(target) = self.objects.get(track.target) {
                transform.rotation =
                    track_to_rotation(transform.position, target.transform.position, track.axis);
            }
        }

        Some(transform.to_matrix())
    }

    fn object_transform(&self, id: ObjectId) -> Option<Transform> {
        self.objects.get(id).map(|object| object.transform)
    }

    fn set_object_transform(&mut self, id: ObjectId, transform: Transform) {
        if let Some(object) = self.objects.get_mut(id) {
            object.transform = transform;
        }
    }

    fn empty_display_size(&self, id: ObjectId) -> Option<f64> {
        match self.objects.get(id)?.data {
            ObjectData::Empty { display_size } => Some(display_size),
            _ => None,
        }
    }

    fn set_empty_display_size(&mut self, id: ObjectId, size: f64) {
        if let Some(ObjectData::Empty { display_size }) = self.objects.get_mut(id).map(|o| &mut o.data) {
            *display_size = size;
        }
    }

    fn set_camera_lens(&mut self, id: ObjectId, lens_mm: f64) {
        if let Some(ObjectData::Camera(data)) = self.objects.get_mut(id).map(|o| &mut o.data) {
            data.lens_mm = lens_mm;
        }
    }

    fn track_axis(&self, id: ObjectId) -> Option<TrackAxis> {
        self.objects.get(id)?.track_to.map(|track| track.axis)
    }

    fn set_track_axis(&mut self, id: ObjectId, axis: TrackAxis) {
        if let Some(track) = self.objects.get_mut(id).and_then(|o| o.track_to.as_mut()) {
            track.axis = axis;
        }
    }

    fn collection(&self, name: &str) -> Option<Vec<ObjectId>> {
        self.collections.get(name).cloned()
    }

    fn create_camera(&mut self, name: &str, data: CameraData, transform: Transform) -> ObjectId {
        self.insert(name, ObjectData::Camera(data), transform)
    }

    fn create_empty(&mut self, name: &str, transform: Transform, display_size: f64) -> ObjectId {
        self.insert(name, ObjectData::Empty { display_size }, transform)
    }

    fn add_track_to(&mut self, object: ObjectId, target: ObjectId, axis: TrackAxis) {
        if !self.objects.contains_key(target) {
            return;
        }
        if let Some(object) = self.objects.get_mut(object) {
            object.track_to = Some(TrackTo { target, axis });
        }
    }

    fn remove_object(&mut self, id: ObjectId) {
        if self.objects.remove(id).is_none() {
            return;
        }

        for members in self.collections.values_mut() {
            members.retain(|member| *member != id);
        }
        for object in self.objects.values_mut() {
            if object.track_to.is_some_and(|track| track.target == id) {
                object.track_to = None;
            }
        }
        if self.active_camera == Some(id) {
            self.active_camera = None;
        }
    }

    fn visible_mesh_vertices(&self) -> Vec<MeshVertex> {
        let mut vertices = Vec::new();

        for object in self.objects.values().filter(|object| object.visible) {
            let ObjectData::Mesh(mesh) = &object.data else {
                continue;
            };
            let transform = object.transform;
            let matrix = transform.to_matrix();
            let inverse_scale = transform.scale.map(|s| if s == 0.0 { 0.0 } else { 1.0 / s });

            for (position, normal) in mesh.positions.iter().zip(&mesh.normals) {
                let world_normal = transform.rotation * normal.component_mul(&inverse_scale);
                vertices.push(MeshVertex {
                    position: matrix.transform_point(&Point3::from(*position)).coords,
                    normal: world_normal.try_normalize(1e-12).unwrap_or_else(Vec3::zeros),
                    color: mesh.color,
                });
            }
        }

        vertices
    }

    fn project_dir(&self) -> Option<PathBuf> {
        self.project_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::StillShot;
    use crate::scene::mesh::MeshPrimitive;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    fn drain(scene: &mut MemoryScene) -> Vec<HostEvent> {
        let mut events = Vec::new();
        while let Some(event) = scene.poll_event().unwrap() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_unique_names() {
        let mut scene = MemoryScene::new();
        let a = scene.create_empty("Empty", Transform::identity(), 1.0);
        let b = scene.create_empty("Empty", Transform::identity(), 1.0);
        assert_eq!(scene.object_name(a), Some("Empty"));
        assert_eq!(scene.object_name(b), Some("Empty.001"));
        assert_eq!(scene.find_object("Empty.001"), Some(b));
    }

    #[test]
    fn test_keyframes_interpolate() {
        let mut scene = MemoryScene::new();
        let id = scene.create_empty("Moving", Transform::identity(), 1.0);
        scene.insert_keyframe(id, 1, Transform::from_position(Vec3::zeros()));
        scene.insert_keyframe(id, 11, Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));

        scene.set_frame(6);
        assert_relative_eq!(scene.object_transform(id).unwrap().position.x, 5.0, epsilon = EPSILON);
        scene.set_frame(40);
        assert_relative_eq!(scene.object_transform(id).unwrap().position.x, 10.0, epsilon = EPSILON);
    }

    #[test]
    fn test_track_to_constraint_in_world_matrix() {
        let mut scene = MemoryScene::new();
        let target = scene.create_empty("Target", Transform::from_position(Vec3::new(0.0, 0.0, 1.0)), 1.0);
        let camera = scene.create_camera(
            "Camera",
            CameraData::default(),
            Transform::from_position(Vec3::new(5.0, 0.0, 1.0)),
        );
        scene.add_track_to(camera, target, TrackAxis::NegativeZ);

        let matrix = scene.world_matrix(camera).unwrap();
        let forward = -matrix.fixed_view::<3, 1>(0, 2).into_owned();
        assert_relative_eq!(forward, -Vec3::x(), epsilon = EPSILON);
        assert_relative_eq!(matrix[(0, 3)], 5.0, epsilon = EPSILON);
    }

    #[test]
    fn test_remove_object_unlinks_everything() {
        let mut scene = MemoryScene::new();
        let target = scene.create_empty("Target", Transform::identity(), 1.0);
        let camera = scene.create_camera("Camera", CameraData::default(), Transform::identity());
        scene.add_track_to(camera, target, TrackAxis::NegativeZ);
        scene.link_to_collection("Cameras", camera);
        scene.set_active_camera(Some(camera));

        scene.remove_object(target);
        assert_eq!(scene.track_axis(camera), None);

        scene.remove_object(camera);
        assert_eq!(scene.active_camera(), None);
        assert_eq!(scene.collection("Cameras"), Some(Vec::new()));
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn test_mesh_vertices_in_world_space() {
        let mut scene = MemoryScene::new();
        let mesh = Mesh::from_primitive(&MeshPrimitive::Points(vec![Vec3::new(1.0, 0.0, 0.0)]), [9, 8, 7]);
        let id = scene.add_mesh(
            "Points",
            mesh,
            Transform::from_euler(Vec3::new(0.0, 0.0, 2.0), Vec3::zeros(), Vec3::new(3.0, 3.0, 3.0)),
        );

        let vertices = scene.visible_mesh_vertices();
        assert_eq!(vertices.len(), 1);
        assert_relative_eq!(vertices[0].position, Vec3::new(3.0, 0.0, 2.0), epsilon = EPSILON);
        assert_relative_eq!(vertices[0].normal, Vec3::x(), epsilon = EPSILON);
        assert_eq!(vertices[0].color, [9, 8, 7]);

        scene.set_visible(id, false);
        assert!(scene.visible_mesh_vertices().is_empty());
    }

    #[test]
    fn test_animation_render_events_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = MemoryScene::new();
        scene.render_settings_mut().resolution_percentage = 2;
        let camera = scene.create_camera(
            "Camera",
            CameraData::default(),
            Transform::from_position(Vec3::new(0.0, 0.0, 5.0)),
        );
        scene.set_active_camera(Some(camera));

        scene.invoke_render(RenderJob::Animation {
            range: FrameRange::new(1, 5, 2),
            output_dir: dir.path().join("train"),
        });

        let events = drain(&mut scene);
        assert_eq!(
            events,
            vec![
                HostEvent::FrameChanged(1),
                HostEvent::FrameChanged(3),
                HostEvent::FrameChanged(5),
                HostEvent::RenderComplete,
            ]
        );
        assert!(dir.path().join("train/0001.png").is_file());
        assert!(dir.path().join("train/0005.png").is_file());
        assert_eq!(scene.rendered_files().len(), 3);
        assert!(!scene.is_rendering());
    }

    #[test]
    fn test_stills_render_through_each_camera() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = MemoryScene::new();
        scene.render_settings_mut().resolution_percentage = 2;
        let a = scene.create_camera("A", CameraData::default(), Transform::identity());
        let b = scene.create_camera("B", CameraData::default(), Transform::identity());
        scene.set_active_camera(Some(a));

        scene.invoke_render(RenderJob::Stills(vec![
            StillShot { camera: a, output_file: dir.path().join("a.png") },
            StillShot { camera: b, output_file: dir.path().join("b.png") },
        ]));

        assert_eq!(drain(&mut scene), vec![HostEvent::RenderComplete]);
        assert!(dir.path().join("b.png").is_file());
        assert_eq!(scene.active_camera(), Some(a));
        assert_eq!(scene.frame_current(), 1);
    }

    #[test]
    fn test_cancel_render() {
        let mut scene = MemoryScene::new();
        scene.invoke_render(RenderJob::Stills(Vec::new()));
        scene.cancel_render();
        assert_eq!(drain(&mut scene), vec![HostEvent::RenderCancelled]);
    }

    #[test]
    fn test_missing_camera_aborts_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = MemoryScene::new();
        scene.invoke_render(RenderJob::Animation {
            range: FrameRange::new(1, 2, 1),
            output_dir: dir.path().to_path_buf(),
        });

        assert_eq!(scene.poll_event().unwrap(), Some(HostEvent::FrameChanged(1)));
        assert!(matches!(scene.poll_event(), Err(SceneError::NoCamera)));
        assert_eq!(scene.poll_event().unwrap(), Some(HostEvent::RenderCancelled));
        assert_eq!(scene.poll_event().unwrap(), None);
    }

    #[test]
    fn test_scrub_notifies() {
        let mut scene = MemoryScene::new();
        scene.scrub_to(12);
        assert_eq!(scene.frame_current(), 12);
        assert_eq!(drain(&mut scene), vec![HostEvent::FrameChanged(12)]);
    }
}
