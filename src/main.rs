use bevy::prelude::*;

use bevy::log::LogPlugin;
use bevy::window::WindowResolution;

use tankio::game::GamePlugin;

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_PREFIX: &str = "tankio";
const KEEP_LOG_FILES: usize = 25;

/// Installs stdout + file logging. Returns the log file path, or `None` when
/// the logs directory is unusable and only stdout is active.
fn setup_logging() -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wgpu=error,bevy_render=info,bevy_ecs=info,tankio=info"));

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let log_dir = PathBuf::from("logs");
    if let Err(e) = fs::create_dir_all(&log_dir) {
        tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .init();
        warn!("File logging disabled, cannot create {}: {}", log_dir.display(), e);
        return None;
    }

    cleanup_old_logs(&log_dir, KEEP_LOG_FILES);

    let now = chrono::Local::now();
    let log_filename = format!("{}_{}.log", LOG_PREFIX, now.format("%Y%m%d_%H%M%S"));

    // One file per run
    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Some(log_dir.join(log_filename))
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else { return };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(LOG_PREFIX) && name.ends_with(".log"))
        })
        .collect();

    if log_files.len() <= keep_count {
        return;
    }

    // Oldest first
    log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));
    for file in log_files.iter().take(log_files.len() - keep_count) {
        let _ = fs::remove_file(file.path());
    }
}

fn main() {
    if let Some(log_file) = setup_logging() {
        println!("Tankio - logging to {}", log_file.display());
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Tankio".into(),
                resolution: WindowResolution::new(1280, 720),
                resizable: true,
                ..default()
            }),
            ..default()
        }).build().disable::<LogPlugin>()) // Logging is installed above
        .add_plugins(GamePlugin)
        .run();
}
