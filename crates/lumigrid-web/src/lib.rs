//! Browser canvas surface for **lumigrid**.
//!
//! [`CanvasSurface`] overlays a transparent `<canvas>` on a host element and
//! implements [`Surface`] with `CanvasRenderingContext2d`. [`LightLayer`]
//! exposes the registry operations and `redraw` to JavaScript, taking the
//! loosely typed values a page hands over and normalizing them through
//! [`lumigrid_core::input`].
//!
//! # Quick start
//!
//! ```html
//! <div id="stage"><canvas width="480" height="360"></canvas></div>
//! <script type="module">
//!   import init, { LightLayer } from './pkg/lumigrid_web.js';
//!   await init();
//!   const layer = new LightLayer();
//!   layer.createCell(0, 0, 10, "cell1", "true");
//!   layer.setLuminance("cell1", 1);
//!   layer.redraw();
//! </script>
//! ```

use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement};

use lumigrid_core::{
    CellRegistry, CellRow, CellSpec, Renderer, Rgba, Surface, SurfaceError, Value,
    input::{clamp_value, int_or_zero, luminance_or_zero, query_position, to_key},
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where and how the overlay canvas is attached.
#[derive(Clone, Debug)]
pub struct CanvasConfig {
    /// `id` given to the created overlay canvas.
    pub canvas_id: String,
    /// CSS selectors tried in order to find the host element. When none
    /// matches, the parent of the first `<canvas>` in the document is used.
    pub host_selectors: Vec<String>,
    /// CSS `z-index` of the overlay.
    pub z_index: i32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            canvas_id: "lumigrid-overlay".into(),
            host_selectors: vec!["#stage".into(), ".stage-wrapper".into()],
            z_index: 999,
        }
    }
}

// ---------------------------------------------------------------------------
// CanvasSurface
// ---------------------------------------------------------------------------

/// A `<canvas>` overlay stretched over its host element.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

fn document() -> Result<Document, SurfaceError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| SurfaceError::HostNotFound("no document".into()))
}

fn find_host(doc: &Document, config: &CanvasConfig) -> Option<Element> {
    for sel in &config.host_selectors {
        if let Ok(Some(el)) = doc.query_selector(sel) {
            return Some(el);
        }
    }
    doc.query_selector("canvas")
        .ok()
        .flatten()
        .and_then(|c| c.parent_element())
}

fn js_err(e: JsValue) -> SurfaceError {
    SurfaceError::Backend(format!("{e:?}"))
}

impl CanvasSurface {
    /// Create the overlay canvas and append it to the host element.
    pub fn attach(config: &CanvasConfig) -> Result<Self, SurfaceError> {
        let doc = document()?;
        let host = find_host(&doc, config)
            .ok_or_else(|| SurfaceError::HostNotFound("stage wrapper not found".into()))?;

        let canvas: HtmlCanvasElement = doc
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| SurfaceError::ContextCast)?;
        canvas.set_id(&config.canvas_id);

        let style = canvas.style();
        let z_index = config.z_index.to_string();
        for (name, value) in [
            ("position", "absolute"),
            ("pointer-events", "none"),
            ("z-index", z_index.as_str()),
            ("top", "0"),
            ("left", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("image-rendering", "pixelated"),
        ] {
            style.set_property(name, value).map_err(js_err)?;
        }

        host.append_child(&canvas).map_err(js_err)?;
        Self::from_canvas(canvas)
    }

    /// Use an existing canvas element.
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| SurfaceError::ContextUnavailable)?
            .ok_or(SurfaceError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::ContextCast)?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn layout_size(&self) -> (u32, u32) {
        (
            self.canvas.offset_width().max(0) as u32,
            self.canvas.offset_height().max(0) as u32,
        )
    }

    fn resize_buffer(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }
}

// ---------------------------------------------------------------------------
// LightLayer — JS bindings
// ---------------------------------------------------------------------------

fn to_value(v: &JsValue) -> Value {
    if let Some(b) = v.as_bool() {
        Value::Bool(b)
    } else if let Some(n) = v.as_f64() {
        Value::Number(n)
    } else if let Some(s) = v.as_string() {
        Value::Text(s)
    } else {
        Value::Text(String::new())
    }
}

fn to_row(entry: &JsValue) -> Option<CellRow> {
    let arr = entry.dyn_ref::<js_sys::Array>()?;
    let at = |i| to_value(&arr.get(i));
    Some(CellRow(at(0), at(1), at(2), at(3), at(4)))
}

/// The registry plus a canvas renderer, driven from JavaScript.
#[wasm_bindgen]
pub struct LightLayer {
    cells: CellRegistry,
    renderer: Renderer<CanvasSurface>,
}

impl Default for LightLayer {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl LightLayer {
    /// Attach with [`CanvasConfig::default`]. If no host is found the layer
    /// still works but never draws.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            cells: CellRegistry::new(),
            renderer: Renderer::attach(CanvasSurface::attach(&CanvasConfig::default())),
        }
    }

    /// NaN in, NaN out.
    #[wasm_bindgen(js_name = clamp)]
    pub fn clamp(&self, value: JsValue, min: f64, max: f64) -> f64 {
        clamp_value(&to_value(&value), min, max)
    }

    #[wasm_bindgen(js_name = createCell)]
    pub fn create_cell(
        &mut self,
        x: JsValue,
        y: JsValue,
        resolution: JsValue,
        key: JsValue,
        blocks_light: JsValue,
    ) {
        let spec = CellSpec::from_values(
            &to_value(&x),
            &to_value(&y),
            &to_value(&resolution),
            &to_value(&key),
            &to_value(&blocks_light),
        );
        self.cells.create_cell(spec);
    }

    #[wasm_bindgen(js_name = moveCell)]
    pub fn move_cell(&mut self, key: JsValue, x: JsValue, y: JsValue) {
        self.cells.move_cell(
            &to_key(&to_value(&key)),
            int_or_zero(&to_value(&x), "x"),
            int_or_zero(&to_value(&y), "y"),
        );
    }

    #[wasm_bindgen(js_name = swapCells)]
    pub fn swap_cells(&mut self, key1: JsValue, key2: JsValue) {
        self.cells
            .swap_cells(&to_key(&to_value(&key1)), &to_key(&to_value(&key2)));
    }

    /// `list` is an array of `[x, y, resolution, key, blocksLight]` arrays.
    #[wasm_bindgen(js_name = createCellsFromList)]
    pub fn create_cells_from_list(&mut self, list: js_sys::Array) {
        let rows: Vec<CellRow> = list
            .iter()
            .filter_map(|entry| {
                let row = to_row(&entry);
                if row.is_none() {
                    debug!("skipping list entry that is not an array: {entry:?}");
                }
                row
            })
            .collect();
        self.cells.create_cells_from_list(rows);
    }

    #[wasm_bindgen(js_name = setLuminance)]
    pub fn set_luminance(&mut self, key: JsValue, value: JsValue) {
        self.cells
            .set_luminance(&to_key(&to_value(&key)), luminance_or_zero(&to_value(&value)));
    }

    #[wasm_bindgen(js_name = setLuminanceAt)]
    pub fn set_luminance_at(&mut self, x: JsValue, y: JsValue, value: JsValue) {
        if let Some(p) = query_position(&to_value(&x), &to_value(&y)) {
            self.cells
                .set_luminance_at(p.x, p.y, luminance_or_zero(&to_value(&value)));
        }
    }

    #[wasm_bindgen(js_name = clearAllLuminance)]
    pub fn clear_all_luminance(&mut self) {
        self.cells.clear_all_luminance();
    }

    pub fn redraw(&mut self) {
        self.renderer.redraw(&self.cells);
    }

    #[wasm_bindgen(getter, js_name = cellCount)]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
