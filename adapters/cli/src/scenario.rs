//! Scenario documents that describe a headless Tank Field session.

use std::{collections::HashSet, fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tank_field_core::{CellCoord, Direction, FieldGrid};

const SUPPORTED_SCENARIO_VERSION: u32 = 1;
const DEFAULT_FRAMES: u32 = 120;
const DEFAULT_DELTA: f32 = 1.0;

/// Parsed and validated scenario.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct Scenario {
    version: u32,
    #[serde(default = "default_frames")]
    pub(crate) frames: u32,
    #[serde(default = "default_delta")]
    pub(crate) delta: f32,
    pub(crate) field: FieldSection,
    #[serde(default)]
    pub(crate) tanks: Vec<TankEntry>,
    #[serde(default)]
    pub(crate) orders: Vec<Order>,
}

/// Dimensions of the field measured in cells and pixels.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub(crate) struct FieldSection {
    columns: u32,
    rows: u32,
    cell_size: f32,
}

impl FieldSection {
    pub(crate) fn grid(&self) -> FieldGrid {
        FieldGrid::new(self.columns, self.rows, self.cell_size)
    }
}

/// Tank placed on the field before the first frame.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct TankEntry {
    pub(crate) name: String,
    cell: [i32; 2],
    pub(crate) facing: Direction,
    pub(crate) speed: f32,
}

impl TankEntry {
    pub(crate) fn cell(&self) -> CellCoord {
        CellCoord::new(self.cell[0], self.cell[1])
    }
}

/// Instruction issued to a named tank at the start of a frame.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum Order {
    /// Start moving one cell along `facing`.
    Move {
        frame: u32,
        tank: String,
        facing: Direction,
    },
    /// Fire a missile along the tank's current facing.
    Fire {
        frame: u32,
        tank: String,
        speed: f32,
    },
}

impl Order {
    pub(crate) fn frame(&self) -> u32 {
        match self {
            Self::Move { frame, .. } | Self::Fire { frame, .. } => *frame,
        }
    }

    pub(crate) fn tank(&self) -> &str {
        match self {
            Self::Move { tank, .. } | Self::Fire { tank, .. } => tank,
        }
    }
}

impl Scenario {
    /// Loads and validates the scenario stored at `path`.
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario at {}", path.display()))
    }

    /// Parses and validates a scenario from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let scenario: Scenario =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        if self.version != SUPPORTED_SCENARIO_VERSION {
            bail!(
                "unsupported scenario version {}; expected {}",
                self.version,
                SUPPORTED_SCENARIO_VERSION
            );
        }
        self.field.grid().validate()?;

        let mut names = HashSet::with_capacity(self.tanks.len());
        for tank in &self.tanks {
            if !names.insert(tank.name.as_str()) {
                bail!("scenario declares tank `{}` twice", tank.name);
            }
        }

        for order in &self.orders {
            if !names.contains(order.tank()) {
                bail!(
                    "order at frame {} references unknown tank `{}`",
                    order.frame(),
                    order.tank()
                );
            }
        }

        Ok(())
    }
}

fn default_frames() -> u32 {
    DEFAULT_FRAMES
}

fn default_delta() -> f32 {
    DEFAULT_DELTA
}
