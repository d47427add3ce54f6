use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

use bitgrid::config::{BoardConfig, Rgba};
use bitgrid::error::ConfigError;
use bitgrid::pipeline;
use bitgrid::transport;
use bitgrid::unpack::{self, Coverage, UnpackReport};

// Called when the wasm module is instantiated
#[wasm_bindgen(start)]
pub fn start() {
    // a second instantiation in the same worker already has a logger
    let _ = console_log::init_with_level(log::Level::Info);
}

// ── Tsify types for TypeScript interface generation ──

/// Board configuration passed from JavaScript. Missing fields take the
/// 1000x1000 red-on-white defaults.
#[derive(Tsify, Serialize, Deserialize, Default)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct WasmBoardConfig {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// RGBA written for set cells.
    #[serde(default)]
    pub set_color: Option<Rgba>,
    /// RGBA written for clear cells.
    #[serde(default)]
    pub clear_color: Option<Rgba>,
}

/// Result of filling a canvas buffer, returned to JavaScript.
#[derive(Tsify, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[tsify(into_wasm_abi)]
pub struct UnpackSummary {
    pub set_count: usize,
    pub cells_written: usize,
    /// "exact", "truncated" or "overflow".
    pub coverage: String,
    pub missing_cells: usize,
    pub ignored_bytes: usize,
}

impl From<UnpackReport> for UnpackSummary {
    fn from(report: UnpackReport) -> Self {
        let (coverage, missing_cells, ignored_bytes) = match report.coverage {
            Coverage::Exact => ("exact", 0, 0),
            Coverage::Truncated { missing_cells } => ("truncated", missing_cells, 0),
            Coverage::Overflow { ignored_bytes } => ("overflow", 0, ignored_bytes),
        };
        UnpackSummary {
            set_count: report.set_count,
            cells_written: report.cells_written,
            coverage: coverage.to_string(),
            missing_cells,
            ignored_bytes,
        }
    }
}

fn board_config(config: WasmBoardConfig) -> Result<BoardConfig, ConfigError> {
    let mut board = BoardConfig::default();
    if let Some(w) = config.width {
        board.width = w;
    }
    if let Some(h) = config.height {
        board.height = h;
    }
    if let Some(c) = config.set_color {
        board.palette.set = c;
    }
    if let Some(c) = config.clear_color {
        board.palette.clear = c;
    }
    board.validate()?;
    Ok(board)
}

/// Decode a base64 board snapshot into its packed bytes.
#[wasm_bindgen(js_name = decodeTransport)]
pub fn decode_transport(text: &str) -> Result<Vec<u8>, JsError> {
    Ok(transport::decode(text)?)
}

// ── Renderer ──

/// Fills canvas pixel buffers from board snapshots.
///
/// Load this module inside a Web Worker and post the filled buffer back to
/// the page; a superseded request is cancelled by ignoring its reply.
#[wasm_bindgen]
pub struct BoardRenderer {
    config: BoardConfig,
}

#[wasm_bindgen]
impl BoardRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new(config: WasmBoardConfig) -> Result<BoardRenderer, JsError> {
        Ok(BoardRenderer {
            config: board_config(config)?,
        })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.config.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Fill `out` (e.g. `ImageData.data`, width * height * 4 bytes) from packed bytes.
    #[wasm_bindgen(js_name = unpackInto)]
    pub fn unpack_into(&self, packed: &[u8], out: &mut [u8]) -> Result<UnpackSummary, JsError> {
        let report = unpack::unpack_into(packed, out, &self.config)?;
        Ok(report.into())
    }

    /// Decode a base64 snapshot straight into `out`.
    pub fn render(&self, text: &str, out: &mut [u8]) -> Result<UnpackSummary, JsError> {
        let report = pipeline::decode_board_into(text, &self.config, out)?;
        Ok(report.into())
    }

    /// Decode a base64 snapshot into a new RGBA buffer.
    #[wasm_bindgen(js_name = renderRgba)]
    pub fn render_rgba(&self, text: &str) -> Result<Vec<u8>, JsError> {
        let frame = pipeline::decode_board(text, &self.config)?;
        log::info!("{} pixels set", frame.report.set_count);
        Ok(frame.raster.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitgrid::config::{RED, WHITE};

    #[test]
    fn default_config_is_full_board() {
        let board = board_config(WasmBoardConfig::default()).unwrap();
        assert_eq!((board.width, board.height), (1000, 1000));
        assert_eq!(board.palette.set, RED);
        assert_eq!(board.palette.clear, WHITE);
    }

    #[test]
    fn config_overrides() {
        let board = board_config(WasmBoardConfig {
            width: Some(16),
            height: Some(2),
            set_color: Some([0, 0, 0, 255]),
            clear_color: None,
        })
        .unwrap();
        assert_eq!((board.width, board.height), (16, 2));
        assert_eq!(board.palette.set, [0, 0, 0, 255]);
    }

    #[test]
    fn zero_width_rejected() {
        let cfg = WasmBoardConfig {
            width: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            board_config(cfg),
            Err(ConfigError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn renderer_fills_buffer() {
        let renderer = BoardRenderer::new(WasmBoardConfig {
            width: Some(8),
            height: Some(1),
            ..Default::default()
        })
        .ok()
        .unwrap();
        let mut out = vec![0u8; 32];
        let summary = renderer.render("BQ==", &mut out).ok().unwrap();
        assert_eq!(summary.set_count, 2);
        assert_eq!(summary.coverage, "exact");
        assert_eq!(&out[0..4], &RED);
        assert_eq!(&out[4..8], &WHITE);
    }

    #[test]
    fn summary_reports_truncation() {
        let report = UnpackReport {
            set_count: 3,
            cells_written: 8,
            coverage: Coverage::Truncated { missing_cells: 8 },
        };
        assert_eq!(
            UnpackSummary::from(report),
            UnpackSummary {
                set_count: 3,
                cells_written: 8,
                coverage: "truncated".to_string(),
                missing_cells: 8,
                ignored_bytes: 0,
            }
        );
    }
}
