use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};
use wavefront_kinematics::Pose;
use wavefront_navigation::{DiagonalRule, GridCell, NavigatorConfig};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const ENV_PREFIX: &str = "WAVEFRONT";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridSettings {
    pub size: usize,
    pub diagonal_rule: DiagonalRule,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: 12,
            diagonal_rule: DiagonalRule::AvoidCorners,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct CellSettings {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionSettings {
    /// Cells travelled per tick.
    pub speed: f64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

/// A scripted occupancy change, standing in for a range-sensor reading.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ObstacleEvent {
    pub tick: u64,
    pub x: usize,
    pub y: usize,
    #[serde(default = "occupied_by_default")]
    pub occupied: bool,
}

fn occupied_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub tick_ms: u64,
    pub max_ticks: u64,
    /// Log a progress line every this many ticks.
    pub log_every: u64,
    pub map_path: Option<PathBuf>,
    pub obstacle_events: Vec<ObstacleEvent>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_ms: 20,
            max_ticks: 200,
            log_every: 10,
            map_path: None,
            obstacle_events: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub grid: GridSettings,
    pub goal: CellSettings,
    pub robot: CellSettings,
    pub motion: MotionSettings,
    pub simulation: SimulationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridSettings::default(),
            goal: CellSettings { x: 9, y: 9 },
            robot: CellSettings { x: 2, y: 2 },
            motion: MotionSettings::default(),
            simulation: SimulationSettings::default(),
        }
    }
}

impl Settings {
    pub fn navigator_config(&self) -> NavigatorConfig {
        NavigatorConfig {
            grid_size: self.grid.size,
            goal: GridCell::new(self.goal.x, self.goal.y),
            start: Pose::new(self.robot.x as f64, self.robot.y as f64, 0.0),
            speed: self.motion.speed,
            diagonal_rule: self.grid.diagonal_rule,
        }
    }
}

/// Layers `config/default.toml` (optional) and `WAVEFRONT_*` environment
/// variables over the built-in defaults.
pub fn load_settings() -> Result<Settings, ConfigError> {
    info!(path = DEFAULT_CONFIG_PATH, "Loading configuration");

    let settings = Config::builder()
        .add_source(
            File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml)
                .required(false),
        )
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn from_toml(text: &str) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_empty_source_gives_defaults() {
        assert_eq!(from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let settings = from_toml(
            r#"
            [grid]
            size = 20
            diagonal_rule = "cut_corners"

            [goal]
            x = 15
            y = 4

            [simulation]
            tick_ms = 0
            map_path = "maps/demo.map"

            [[simulation.obstacle_events]]
            tick = 5
            x = 7
            y = 7

            [[simulation.obstacle_events]]
            tick = 9
            x = 7
            y = 7
            occupied = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.grid.size, 20);
        assert_eq!(settings.grid.diagonal_rule, DiagonalRule::CutCorners);
        assert_eq!(settings.goal, CellSettings { x: 15, y: 4 });
        assert_eq!(settings.robot, CellSettings { x: 2, y: 2 });
        assert_eq!(settings.motion.speed, 1.0);
        assert_eq!(settings.simulation.tick_ms, 0);
        assert_eq!(settings.simulation.max_ticks, 200);
        let map_path = settings.simulation.map_path.as_deref();
        assert_eq!(map_path, Some(Path::new("maps/demo.map")));
        assert_eq!(settings.simulation.obstacle_events.len(), 2);
        assert!(settings.simulation.obstacle_events[0].occupied);
        assert!(!settings.simulation.obstacle_events[1].occupied);
    }

    #[test]
    fn test_navigator_config_mapping() {
        let settings = Settings::default();
        let config = settings.navigator_config();
        assert_eq!(config.grid_size, 12);
        assert_eq!(config.goal, GridCell::new(9, 9));
        assert_eq!(config.start, Pose::new(2.0, 2.0, 0.0));
        assert_eq!(config.speed, 1.0);
    }

    #[test]
    fn test_bad_type_is_an_error() {
        assert!(from_toml("[grid]\nsize = \"large\"").is_err());
    }
}
