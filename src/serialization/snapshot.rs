use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::Position;

/// One occupied cell in a host snapshot.
///
/// Hosts usually send `{"position": {"x": .., "y": ..}, "value": ..}`; the
/// position is optional and, when present, must agree with the cell it sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub value: u32,
}

/// Serializable board as exchanged with the host game: `cells[x][y]`, `null`
/// for empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub size: usize,
    pub cells: Vec<Vec<Option<TileState>>>,
}

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported board size {0}, expected 4")]
    Size(usize),
    #[error("expected 4 columns, found {0}")]
    Columns(usize),
    #[error("column {column} has {len} cells, expected 4")]
    Rows { column: usize, len: usize },
    #[error("cell ({x}, {y}) holds {value}, not a power of two in 2..=131072")]
    Value { x: usize, y: usize, value: u32 },
    #[error("cell ({x}, {y}) claims position ({claimed_x}, {claimed_y})")]
    Position { x: usize, y: usize, claimed_x: i32, claimed_y: i32 },
}

impl GridSnapshot {
    /// Parse a host snapshot from JSON.
    ///
    /// ```
    /// use agent_2048::serialization::GridSnapshot;
    /// let json = r#"{"size":4,"cells":[[{"value":2},null,null,null],[null,null,null,null],
    ///               [null,null,null,null],[null,null,null,{"value":4}]]}"#;
    /// let snap = GridSnapshot::from_json(json).unwrap();
    /// assert_eq!(snap.cells[3][3].map(|t| t.value), Some(4));
    /// ```
    pub fn from_json(json: &str) -> Result<GridSnapshot, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<GridSnapshot, SnapshotError> {
        let text = fs::read_to_string(path)?;
        GridSnapshot::from_json(&text)
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
