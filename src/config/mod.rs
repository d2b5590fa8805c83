use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::sketch::{EventRegistry, ShapeConfig, ShapeStyle};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Sketch preferences persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchConfigData {
    /// Distance tooltips on line segments
    #[serde(default)]
    pub display_line_distances: bool,

    /// 1-based vertex numbers on line shapes
    #[serde(default)]
    pub display_vertex_numbers: bool,

    /// Tap-only input without cursor previews
    #[serde(default)]
    pub is_touch_device: bool,

    /// Markers and polygons can be dragged as a whole
    #[serde(default = "default_true")]
    pub is_draggable: bool,

    /// Stroke color for new shapes as sRGB components
    #[serde(default = "default_stroke_color")]
    pub stroke_color: [f32; 3],

    /// Stroke weight for new shapes in pixels
    #[serde(default = "default_stroke_weight")]
    pub stroke_weight: f32,
}

fn default_true() -> bool {
    true
}

fn default_stroke_color() -> [f32; 3] {
    [0.2, 0.533, 1.0]
}

fn default_stroke_weight() -> f32 {
    3.0
}

impl Default for SketchConfigData {
    fn default() -> Self {
        Self {
            display_line_distances: false,
            display_vertex_numbers: false,
            is_touch_device: false,
            is_draggable: default_true(),
            stroke_color: default_stroke_color(),
            stroke_weight: default_stroke_weight(),
        }
    }
}

impl SketchConfigData {
    /// Engine configuration with the given listeners attached.
    pub fn shape_config(&self, events: EventRegistry) -> ShapeConfig {
        ShapeConfig {
            display_line_distances: self.display_line_distances,
            display_vertex_numbers: self.display_vertex_numbers,
            is_touch_device: self.is_touch_device,
            is_draggable: self.is_draggable,
            events,
            ..Default::default()
        }
    }

    /// Style for newly drawn shapes.
    pub fn shape_style(&self) -> ShapeStyle {
        let [r, g, b] = self.stroke_color;
        ShapeStyle {
            color: Color::srgb(r, g, b),
            weight: self.stroke_weight,
            ..Default::default()
        }
    }

    pub fn toggle(&mut self, option: SketchOption) -> bool {
        let flag = match option {
            SketchOption::VertexNumbers => &mut self.display_vertex_numbers,
            SketchOption::LineDistances => &mut self.display_line_distances,
            SketchOption::TouchDevice => &mut self.is_touch_device,
            SketchOption::Draggable => &mut self.is_draggable,
        };
        *flag = !*flag;
        *flag
    }
}

/// Boolean preferences that can be flipped from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchOption {
    VertexNumbers,
    LineDistances,
    TouchDevice,
    Draggable,
}

impl SketchOption {
    pub fn display_name(&self) -> &'static str {
        match self {
            SketchOption::VertexNumbers => "Vertex numbers",
            SketchOption::LineDistances => "Line distances",
            SketchOption::TouchDevice => "Touch mode",
            SketchOption::Draggable => "Draggable shapes",
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: SketchConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: SketchConfigData::default(),
            config_path: get_config_path(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to flip one of the boolean preferences
#[derive(Message)]
pub struct ToggleOptionRequest {
    pub option: SketchOption,
}

/// Get the path to the config file (platform-appropriate location)
fn get_config_path() -> PathBuf {
    crate::paths::config_file()
}

/// Result of loading config from disk
struct LoadConfigResult {
    config: AppConfig,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

fn parse_config(json: &str) -> Result<SketchConfigData, serde_json::Error> {
    serde_json::from_str(json)
}

/// Load configuration from disk
fn load_config() -> LoadConfigResult {
    let config_path = get_config_path();

    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match parse_config(&json) {
                Ok(data) => {
                    info!("Loaded config from {:?}", config_path);
                    (data, None)
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}", e);
                    (
                        SketchConfigData::default(),
                        Some(format!("Configuration file was corrupted: {}", e)),
                    )
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    SketchConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (SketchConfigData::default(), None)
    };

    LoadConfigResult {
        config: AppConfig {
            data,
            config_path,
            dirty: false,
        },
        reset_reason,
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    if let Err(e) = crate::paths::ensure_directories() {
        warn!("Failed to create config directories: {}", e);
    }

    let result = load_config();
    config.data = result.config.data;
    config.config_path = result.config.config_path;
    config.dirty = result.config.dirty;

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

/// System to flip a preference and persist it
fn toggle_option_system(
    mut events: MessageReader<ToggleOptionRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        let enabled = config.data.toggle(event.option);
        config.dirty = true;
        save_events.write(SaveConfigRequest);
        info!(
            "{} {}",
            event.option.display_name(),
            if enabled { "enabled" } else { "disabled" }
        );
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<ToggleOptionRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    toggle_option_system.run_if(on_message::<ToggleOptionRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}
