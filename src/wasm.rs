//! Browser binding: the host game passes its serialized grid and receives a
//! direction code.

use wasm_bindgen::prelude::*;

use crate::expectimax;
use crate::serialization::GridSnapshot;

/// Choose a move for the host's `grid.serialize()` object.
///
/// Returns 0 (up), 1 (right), 2 (down), 3 (left), or `undefined` when no move
/// changes the board.
#[wasm_bindgen(js_name = selectMove)]
pub fn select_move(snapshot: JsValue, depth: u32) -> Result<Option<u8>, JsValue> {
    let snapshot: GridSnapshot =
        serde_wasm_bindgen::from_value(snapshot).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let dir = expectimax::select_move(&snapshot, depth).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(dir.map(|d| d.code()))
}
