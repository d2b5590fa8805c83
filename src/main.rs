use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use geosketch::config::ConfigPlugin;
use geosketch::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use geosketch::host::SketchPlugin;
use geosketch::paths;

/// Console and `sketch-logs/geosketch.log` output for debug builds
#[cfg(debug_assertions)]
fn setup_sketch_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use std::fs::OpenOptions;
    use std::io::Write;
    use tracing_subscriber::prelude::*;

    let logs_dir = paths::logs_dir();
    if std::fs::create_dir_all(&logs_dir).is_err() {
        eprintln!("Failed to create sketch log directory {:?}", logs_dir);
        return None;
    }

    // Separate drawing sessions in the shared log
    if let Ok(mut file) = OpenOptions::new()
        .append(true)
        .open(logs_dir.join(paths::LOG_FILE_NAME))
    {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let rule = "-".repeat(72);
        let _ = writeln!(file, "\n{}\ngeosketch session {}\n{}", rule, timestamp, rule);
    }

    let file_appender = tracing_appender::rolling::never(&logs_dir, paths::LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    // Shape lifecycle logging is at debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,geosketch=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Some(guard)
}

#[cfg(not(debug_assertions))]
fn setup_sketch_logging() -> Option<()> {
    None
}

fn main() {
    let _log_guard = setup_sketch_logging();
    info!(
        "Starting geosketch, drawing preferences at {:?}",
        paths::config_file()
    );

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "geosketch: map shape editor".into(),
                resolution: (DEFAULT_WINDOW_WIDTH as u32, DEFAULT_WINDOW_HEIGHT as u32).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(ConfigPlugin)
        .add_plugins(SketchPlugin)
        .run();
}
