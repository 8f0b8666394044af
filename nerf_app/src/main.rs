//! Command line dataset exporter
//!
//! Builds a scene from a description file, exports a dataset with one of the sampling
//! methods and drives the bundled renderer until the archive is written.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};

use nerf_export::foundation::logging;
use nerf_export::prelude::*;

fn main() -> Result<()> {
    let matches = Command::new("nerf_export")
        .about("Exports NeRF and Gaussian splatting datasets from a scene description")
        .arg(
            Arg::new("scene")
                .value_name("SCENE")
                .help("Scene description (.ron or .toml)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("settings")
                .short('s')
                .long("settings")
                .value_name("FILE")
                .help("Export settings (.ron or .toml); defaults are used when omitted")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("method")
                .short('m')
                .long("method")
                .value_name("METHOD")
                .help("Sampling method: sof, ttc, cos or dfc")
                .default_value("sof")
                .value_parser(|s: &str| s.parse::<MethodKind>()),
        )
        .arg(
            Arg::new("save-path")
                .short('o')
                .long("save-path")
                .value_name("DIR")
                .help("Directory receiving the dataset archive")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("no-render")
                .long("no-render")
                .help("Write manifests only, without rendering images")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Report every failed export precondition and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("write-settings")
                .long("write-settings")
                .value_name("FILE")
                .help("Write the effective settings to FILE and exit")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .get_matches();

    logging::init();

    let mut settings = match matches.get_one::<PathBuf>("settings") {
        Some(path) => ExportSettings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => ExportSettings::default(),
    };
    if let Some(dir) = matches.get_one::<PathBuf>("save-path") {
        settings.common.save_path = dir.display().to_string();
    }
    if matches.get_flag("no-render") {
        settings.common.render_frames = false;
    }

    if let Some(path) = matches.get_one::<PathBuf>("write-settings") {
        settings
            .save_to_file(path)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        println!("Settings written to {}", path.display());
        return Ok(());
    }

    let scene_path = matches.get_one::<PathBuf>("scene").context("Missing scene file")?;
    let method = *matches.get_one::<MethodKind>("method").context("Missing method")?;

    let mut scene = SceneDescription::load_from_file(scene_path)
        .with_context(|| format!("Failed to load scene from {}", scene_path.display()))?
        .build()
        .context("Failed to build scene")?;
    let mut exporter = DatasetExporter::new(settings);
    exporter.initialize(&scene);

    if matches.get_flag("check") {
        let errors = exporter.validate(&scene, method);
        if errors.is_empty() {
            println!("{method}: ready to export");
            return Ok(());
        }
        for error in &errors {
            println!("{method}: {error}");
        }
        bail!("{} failed precondition(s)", errors.len());
    }

    let archive = match exporter.export(&mut scene, method)? {
        ExportOutcome::Archived(path) => path,
        ExportOutcome::Rendering => render_to_completion(&mut scene, &mut exporter)?,
    };

    println!("{}", archive.display());
    Ok(())
}

/// Drive the host renderer, forwarding its events until the export archive is written
fn render_to_completion(scene: &mut MemoryScene, exporter: &mut DatasetExporter) -> Result<PathBuf> {
    let mut archive = None;
    let mut frames = 0usize;

    loop {
        // A failed image write cancels the job; its cancellation still finalizes the export
        let event = match scene.poll_event() {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(err) => {
                log::error!("Render failed: {err}");
                continue;
            }
        };
        if matches!(event, HostEvent::FrameChanged(_)) {
            frames += 1;
        }
        if let Some(path) = exporter.handle_event(scene, event)? {
            archive = Some(path);
        }
    }

    log::info!("Rendered {} file(s) over {frames} frame change(s)", scene.rendered_files().len());
    archive.context("Render ended without producing an archive")
}
