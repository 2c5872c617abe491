//! Parsing of command-line values and input files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use routescore_lib::costmap::MapCell;
use routescore_lib::{Coordinates, Costmap, EdgeAdjustment, MetadataValue, RouteConfig};

/// Parse `X,Y` into a point.
pub fn parse_point(value: &str) -> std::result::Result<Coordinates, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", value))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid x coordinate in '{}'", value))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|_| format!("invalid y coordinate in '{}'", value))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("coordinates must be finite, got '{}'", value));
    }
    Ok(Coordinates::new(x, y))
}

/// Parse `KEY=VALUE` into a metadata entry.
///
/// Integers and floats keep their numeric type; anything else is text.
pub fn parse_metadata_entry(value: &str) -> std::result::Result<(String, MetadataValue), String> {
    let (key, raw) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE but got '{}'", value))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty metadata key in '{}'", value));
    }

    let raw = raw.trim();
    let parsed = if let Ok(int) = raw.parse::<i64>() {
        MetadataValue::Integer(int)
    } else if let Ok(float) = raw.parse::<f64>() {
        MetadataValue::Float(float)
    } else {
        MetadataValue::Text(raw.to_string())
    };
    Ok((key.to_string(), parsed))
}

/// Parse `EDGE_ID=COST` into a cost override.
pub fn parse_adjustment(value: &str) -> std::result::Result<EdgeAdjustment, String> {
    let (id, cost) = value
        .split_once('=')
        .ok_or_else(|| format!("expected EDGE_ID=COST but got '{}'", value))?;
    let edgeid = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid edge id in '{}'", value))?;
    let cost = cost
        .trim()
        .parse()
        .map_err(|_| format!("invalid cost in '{}'", value))?;
    Ok(EdgeAdjustment { edgeid, cost })
}

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<RouteConfig> {
    match path {
        Some(path) => RouteConfig::from_path(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(RouteConfig::default()),
    }
}

/// One non-default cell of a raster file.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CellCost {
    pub x: u32,
    pub y: u32,
    pub cost: u8,
}

/// On-disk raster description.
///
/// Either `costs` holds every cell in row-major order, or the raster is
/// filled with `default_value` and `cells` lists the exceptions.
#[derive(Debug, Clone, Deserialize)]
pub struct CostmapFile {
    pub size_x: u32,
    pub size_y: u32,
    pub resolution: f64,
    #[serde(default)]
    pub origin: Coordinates,
    #[serde(default)]
    pub default_value: u8,
    #[serde(default)]
    pub costs: Option<Vec<u8>>,
    #[serde(default)]
    pub cells: Vec<CellCost>,
}

impl CostmapFile {
    pub fn into_costmap(self) -> Result<Costmap> {
        let mut costmap = match self.costs {
            Some(costs) => {
                Costmap::from_cells(self.size_x, self.size_y, self.resolution, self.origin, costs)?
            }
            None => Costmap::new(
                self.size_x,
                self.size_y,
                self.resolution,
                self.origin,
                self.default_value,
            )?,
        };

        for cell in &self.cells {
            if !costmap.set_cost(MapCell::new(cell.x, cell.y), cell.cost) {
                anyhow::bail!(
                    "cell ({}, {}) lies outside the {}x{} raster",
                    cell.x,
                    cell.y,
                    self.size_x,
                    self.size_y
                );
            }
        }

        Ok(costmap)
    }
}

/// Read a raster file.
pub fn load_costmap(path: &Path) -> Result<Costmap> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read costmap from {}", path.display()))?;
    let file: CostmapFile = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse costmap from {}", path.display()))?;
    file.into_costmap()
        .with_context(|| format!("invalid costmap in {}", path.display()))
}
