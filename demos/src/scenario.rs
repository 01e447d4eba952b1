//! JSON scenarios: terrain, grid parameters, and path requests.

use std::error::Error;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use wayfind_paths::{Grid, GridConfig};
use wayfind_terrain::{Legend, ObstacleField, TerrainLayout, TerrainMap};

/// Where a scenario's terrain comes from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TerrainSource {
    /// ASCII art, one row per string and one character per grid cell
    /// unless `grid` overrides it. The first row is the far (+Z) edge.
    Layout {
        rows: Vec<String>,
        #[serde(default)]
        legend: Legend,
        #[serde(default = "default_cell_size")]
        cell_size: f32,
        #[serde(default)]
        origin: Vec3,
    },
    /// World shapes; the grid comes from the scenario's `grid` section.
    Obstacles {
        #[serde(flatten)]
        field: ObstacleField,
    },
}

fn default_cell_size() -> f32 {
    1.0
}

/// One path request in world coordinates.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Request {
    pub start: Vec3,
    pub end: Vec3,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub terrain: TerrainSource,
    /// Grid parameters. Layout terrain derives them from the layout when
    /// absent; obstacle terrain falls back to the defaults.
    #[serde(default)]
    pub grid: Option<GridConfig>,
    /// Penalty blur applied when the grid is derived from a layout.
    #[serde(default)]
    pub blur_radius: usize,
    #[serde(default)]
    pub requests: Vec<Request>,
}

pub const BUILTIN: &str = r#"{
    "name": "courtyard",
    "blur_radius": 1,
    "terrain": {
        "type": "layout",
        "rows": [
            "....................",
            "..######....::::....",
            "..#....#....::::....",
            "..#....#............",
            "..#.........~~~~~...",
            "..#######...~~~~~...",
            "............~~~~~...",
            ".....##########.....",
            "....................",
            "...................."
        ]
    },
    "requests": [
        { "start": [-9.5, 0.0, -4.5], "end": [9.5, 0.0, 4.5] },
        { "start": [-5.5, 0.0, 1.5],  "end": [6.5, 0.0, -4.5] },
        { "start": [-9.5, 0.0, 4.5],  "end": [-6.5, 0.0, 3.5] }
    ]
}"#;

impl Scenario {
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Ok(serde_json::from_str(BUILTIN)?)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = std::fs::read_to_string(path)?;
        let scenario = serde_json::from_str(&text)?;
        log::info!("loaded scenario from {}", path.display());
        Ok(scenario)
    }

    /// Sample the terrain into a grid.
    pub fn build_grid(&self) -> Result<Grid, Box<dyn Error>> {
        match &self.terrain {
            TerrainSource::Layout {
                rows,
                legend,
                cell_size,
                origin,
            } => {
                let layout = TerrainLayout::parse_with_runes(&rows.join("\n"), &legend.runes())?;
                let map = TerrainMap::new(layout, legend.clone(), *origin, *cell_size)?;
                let config = self
                    .grid
                    .clone()
                    .unwrap_or_else(|| map.grid_config(self.blur_radius));
                Ok(Grid::from_config(&config, &map)?)
            }
            TerrainSource::Obstacles { field } => {
                let config = self.grid.clone().unwrap_or_default();
                Ok(Grid::from_config(&config, field)?)
            }
        }
    }
}
