//! JSON export of the generated geometry and the particle state.

use std::path::Path;

use glam::Vec3;
use magneto_field::{RandomSource, SolarWindField, SplitFlag};
use serde::{Deserialize, Serialize};

/// One particle as written to disk. `split` is `+1` (north) or `-1` (south).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub split: i8,
}

/// Everything a renderer needs to redraw a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ticks completed when the snapshot was taken.
    pub tick: u64,
    /// Control points of every field line.
    pub field_lines: Vec<Vec<[f32; 3]>>,
    pub particles: Vec<ParticleRecord>,
}

impl Snapshot {
    pub fn capture<R: RandomSource>(field_lines: &[Vec<Vec3>], wind: &SolarWindField<R>) -> Self {
        let field_lines = field_lines
            .iter()
            .map(|line| line.iter().map(|p| p.to_array()).collect())
            .collect();

        let particles = wind
            .particles()
            .map(|p| ParticleRecord {
                position: p.position.to_array(),
                velocity: p.velocity.to_array(),
                split: match p.split {
                    SplitFlag::North => 1,
                    SplitFlag::South => -1,
                },
            })
            .collect();

        Self {
            tick: wind.tick_count(),
            field_lines,
            particles,
        }
    }

    /// Write the snapshot as pretty-printed JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}
