// cli.rs - Command-line interface configuration
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::NavigationConfig;
use crate::loaders::load_scene_file;
use crate::scenes::{self, ScenePreset, PRESET_NAMES};

#[derive(Parser, Debug, Clone)]
#[command(name = "walkthrough")]
#[command(about = "First-person walkthrough navigation for 3D scenes", long_about = None)]
pub struct Cli {
    /// Built-in scene name or path to a scene JSON file
    #[arg(long, default_value = "exterior")]
    pub scene: String,

    /// Input script to replay (headless mode)
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Frames to run when no script is given
    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    /// Fixed frame delta for headless runs, in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Open a window and navigate with keyboard and mouse
    #[arg(long)]
    pub interactive: bool,

    #[arg(long)]
    pub move_speed: Option<f32>,

    #[arg(long)]
    pub look_sensitivity: Option<f32>,

    #[arg(long)]
    pub player_height: Option<f32>,

    #[arg(long)]
    pub player_radius: Option<f32>,
}

impl Cli {
    /// Layer command-line overrides on top of a scene's config
    pub fn apply_overrides(&self, config: &mut NavigationConfig) -> Result<()> {
        if let Some(v) = self.move_speed {
            config.move_speed = v;
        }
        if let Some(v) = self.look_sensitivity {
            config.look_sensitivity = v;
        }
        if let Some(v) = self.player_height {
            config.player_height = v;
        }
        if let Some(v) = self.player_radius {
            config.player_radius = v;
        }
        config.validate()
    }

    /// Resolve `--scene` and apply the overrides
    pub fn load_scene(&self) -> Result<ScenePreset> {
        self.load_named_scene(&self.scene)
    }

    /// Preset name or scene file path
    pub fn load_named_scene(&self, name: &str) -> Result<ScenePreset> {
        let mut preset = match scenes::preset(name) {
            Some(preset) => preset,
            None if name.ends_with(".json") => load_scene_file(name)?,
            None => anyhow::bail!(
                "unknown scene '{}' (built-in: {}, or a .json file)",
                name,
                PRESET_NAMES.join(", ")
            ),
        };
        self.apply_overrides(&mut preset.config)?;
        Ok(preset)
    }
}
