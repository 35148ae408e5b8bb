// init_config.rs
// Handles loading and parsing the canvas and category configuration from init_config.toml

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use ultraviolet::DVec2;

/// Every section and key is optional; anything missing takes the value from
/// `InitConfig::default()`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InitConfig {
    /// Cooling and force parameters shared by both canvases.
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default = "CanvasConfig::menu", deserialize_with = "menu_canvas")]
    pub menu: CanvasConfig,
    #[serde(default = "CanvasConfig::plate", deserialize_with = "plate_canvas")]
    pub plate: CanvasConfig,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
    /// Catalog names placed on the plate at startup. Repeats add copies.
    #[serde(default = "default_plate_names")]
    pub defaults: Vec<String>,
}

/// Geometry of one canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    /// Radius given to every node on this canvas.
    pub radius: f64,
    pub padding: f64,
    pub rows: u32,
    pub cols: u32,
}

/// A canvas section as written in the file. Missing keys are filled from the
/// preset of the canvas being read.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CanvasSection {
    width: Option<f64>,
    height: Option<f64>,
    radius: Option<f64>,
    padding: Option<f64>,
    rows: Option<u32>,
    cols: Option<u32>,
}

impl CanvasSection {
    fn over(self, preset: CanvasConfig) -> CanvasConfig {
        CanvasConfig {
            width: self.width.unwrap_or(preset.width),
            height: self.height.unwrap_or(preset.height),
            radius: self.radius.unwrap_or(preset.radius),
            padding: self.padding.unwrap_or(preset.padding),
            rows: self.rows.unwrap_or(preset.rows),
            cols: self.cols.unwrap_or(preset.cols),
        }
    }
}

fn menu_canvas<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<CanvasConfig, D::Error> {
    Ok(CanvasSection::deserialize(deserializer)?.over(CanvasConfig::menu()))
}

fn plate_canvas<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<CanvasConfig, D::Error> {
    Ok(CanvasSection::deserialize(deserializer)?.over(CanvasConfig::plate()))
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryConfig {
    #[serde(default)]
    pub name: String,
    /// Matches the `type` field of catalog records.
    pub kind: String,
    pub row: u32,
    pub col: u32,
    /// Hex color, with or without a leading `#`.
    pub color: String,
}

fn category(name: &str, kind: &str, row: u32, col: u32, color: &str) -> CategoryConfig {
    CategoryConfig {
        name: name.to_string(),
        kind: kind.to_string(),
        row,
        col,
        color: color.to_string(),
    }
}

fn default_categories() -> Vec<CategoryConfig> {
    vec![
        category("Programming Introduction", "fruit", 1, 1, "#b5bd68"),
        category("Physics or Chemistry", "pastry", 1, 2, "#a3685a"),
        category("Statistics", "beverage", 1, 3, "#81a2be"),
        category("", "egg-meat", 2, 1, "#cc6666"),
        category("", "cereal", 2, 2, "#f0c674"),
        category("", "other", 2, 3, "#b294bb"),
    ]
}

fn default_plate_names() -> Vec<String> {
    vec!["AMS 131".to_string(), "CMPE 107".to_string()]
}

impl CanvasConfig {
    pub fn menu() -> Self {
        Self {
            width: 840.0,
            height: 600.0,
            radius: 32.0,
            padding: 48.0,
            rows: 2,
            cols: 3,
        }
    }

    pub fn plate() -> Self {
        Self {
            width: 440.0,
            height: 600.0,
            radius: 32.0,
            padding: 0.0,
            rows: 1,
            cols: 1,
        }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Anchor of grid cell (`row`, `col`), both 1-based: the middle of the cell,
    /// snapped to whole units.
    pub fn cell_anchor(&self, row: u32, col: u32) -> DVec2 {
        let cols = self.cols.max(1) as f64;
        let rows = self.rows.max(1) as f64;
        let x = col as f64 * (self.width / cols).floor() - (self.width / (2.0 * cols)).floor();
        let y = row as f64 * (self.height / rows).floor() - (self.height / (2.0 * rows)).floor();
        DVec2::new(x, y)
    }

    /// Per-canvas layout parameters: `base` with this canvas's padding, and an
    /// optional spawn point for runtime additions.
    pub fn layout_config(&self, base: &LayoutConfig, spawn: Option<DVec2>) -> LayoutConfig {
        let mut config = base.clone().with_padding(self.padding);
        if let Some(point) = spawn {
            config = config.with_spawn_point(point);
        }
        config
    }

    fn validate(&self, label: &str) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0 && self.radius > 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "{} canvas needs positive width, height and radius",
                label
            )));
        }
        if self.padding < 0.0 || self.rows == 0 || self.cols == 0 {
            return Err(LayoutError::InvalidConfig(format!(
                "{} canvas needs non-negative padding and at least one row and column",
                label
            )));
        }
        Ok(())
    }
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            menu: CanvasConfig::menu(),
            plate: CanvasConfig::plate(),
            categories: default_categories(),
            defaults: default_plate_names(),
        }
    }
}

impl InitConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn load_default() -> Result<Self> {
        Self::load_from_file("init_config.toml")
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: InitConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.menu.validate("menu")?;
        self.plate.validate("plate")?;
        for category in &self.categories {
            let in_grid = (1..=self.menu.rows).contains(&category.row)
                && (1..=self.menu.cols).contains(&category.col);
            if !in_grid {
                return Err(LayoutError::InvalidConfig(format!(
                    "category `{}` sits at row {}, col {} outside the {}x{} menu grid",
                    category.kind, category.row, category.col, self.menu.rows, self.menu.cols
                )));
            }
        }
        Ok(())
    }
}
