//! Level maps: text → typed tile placements
//!
//! One character per grid cell. The last line of the file is row 0, so world
//! Y grows toward the top of the file.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::cell_center;

/// A grid cell's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Empty,
    Wall,
    Vortex,
    Star,
    Finish,
    TeleportA,
    TeleportB,
}

impl Tile {
    /// Map a level character to a tile, `None` if it is not part of the format
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            ' ' => Some(Tile::Empty),
            'x' => Some(Tile::Wall),
            'v' => Some(Tile::Vortex),
            's' => Some(Tile::Star),
            'f' => Some(Tile::Finish),
            't' => Some(Tile::TeleportA),
            'T' => Some(Tile::TeleportB),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => 'x',
            Tile::Vortex => 'v',
            Tile::Star => 's',
            Tile::Finish => 'f',
            Tile::TeleportA => 't',
            Tile::TeleportB => 'T',
        }
    }

    /// Sprite the presentation layer draws for this tile
    pub fn sprite_name(&self) -> Option<&'static str> {
        match self {
            Tile::Empty => None,
            Tile::Wall => Some("block"),
            Tile::Vortex => Some("vortex"),
            Tile::Star => Some("star"),
            Tile::Finish => Some("finish"),
            Tile::TeleportA | Tile::TeleportB => Some("teleport"),
        }
    }

    pub fn is_teleport(&self) -> bool {
        matches!(self, Tile::TeleportA | Tile::TeleportB)
    }
}

/// A tile at a grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub tile: Tile,
    pub row: usize,
    pub column: usize,
}

impl Placement {
    pub fn position(&self) -> Vec2 {
        cell_center(self.row, self.column)
    }
}

/// Why a level map was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// Character outside the tile table (line and column are 1-based, file order)
    UnknownTile { ch: char, line: usize, column: usize },
    /// No non-blank line
    Empty,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::UnknownTile { ch, line, column } => {
                write!(f, "unknown tile {:?} at line {}, column {}", ch, line, column)
            }
            MalformedReason::Empty => write!(f, "level has no rows"),
        }
    }
}

/// Level loading failures
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("level {name:?} not found")]
    NotFound { name: String },
    #[error("level {name:?} is malformed: {reason}")]
    Malformed { name: String, reason: MalformedReason },
    #[error("level {name:?} could not be read: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Parse level text into placements, Empty cells included.
///
/// All-or-nothing: any unknown character rejects the whole level.
pub fn parse_level(name: &str, text: &str) -> Result<Vec<Placement>, LevelError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.iter().all(|line| line.trim().is_empty()) {
        return Err(LevelError::Malformed {
            name: name.to_string(),
            reason: MalformedReason::Empty,
        });
    }

    let line_count = lines.len();
    let mut placements = Vec::new();

    for (row, line) in lines.iter().rev().enumerate() {
        for (column, ch) in line.chars().enumerate() {
            let Some(tile) = Tile::from_char(ch) else {
                return Err(LevelError::Malformed {
                    name: name.to_string(),
                    reason: MalformedReason::UnknownTile {
                        ch,
                        line: line_count - row,
                        column: column + 1,
                    },
                });
            };
            placements.push(Placement { tile, row, column });
        }
    }

    Ok(placements)
}

/// Where level text comes from
pub trait LevelSource {
    fn read_level(&self, name: &str) -> Result<String, LevelError>;
}

/// Reads `<root>/<name>.txt`
#[derive(Debug, Clone)]
pub struct DirLevelSource {
    root: PathBuf,
}

impl DirLevelSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.txt", name))
    }
}

impl LevelSource for DirLevelSource {
    fn read_level(&self, name: &str) -> Result<String, LevelError> {
        let path = self.path_for(name);
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LevelError::NotFound {
                name: name.to_string(),
            },
            _ => LevelError::Io {
                name: name.to_string(),
                source,
            },
        })
    }
}

/// Levels held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLevelSource {
    levels: HashMap<String, String>,
}

impl MemoryLevelSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.levels.insert(name.into(), text.into());
    }
}

impl LevelSource for MemoryLevelSource {
    fn read_level(&self, name: &str) -> Result<String, LevelError> {
        self.levels
            .get(name)
            .cloned()
            .ok_or_else(|| LevelError::NotFound {
                name: name.to_string(),
            })
    }
}
