//! minecart
//!
//! A procedurally built, flat-shaded low-poly minecart. The cart is assembled
//! from primitive shapes into a scene group, drawn with instanced batches and
//! spun a fixed step each frame. On request it is exported as a self-contained
//! glTF 2.0 document. Runs natively and on the web.
//!
//! High-level modules
//! - `camera`: camera, projection and their uniforms
//! - `cart`: the factories that assemble the minecart group
//! - `config`: viewer configuration and defaults
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `controls`: the export control (key natively, DOM button on the web)
//! - `data_structures`: geometry, materials, scene graph and GPU models
//! - `export`: glTF serialisation and delivery
//! - `flow`: the application event loop and the flow trait
//! - `pipelines`: the flat-shaded render pipeline and scene lighting
//! - `render`: render composition for pipeline reuse
//! - `viewer`: the minecart viewer flow
//!

pub mod camera;
pub mod cart;
pub mod config;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod export;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod viewer;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Web entry point: starts the viewer as soon as the module is loaded.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    flow::run(vec![viewer::viewer(config::ViewerConfig::default())])
        .map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
