//! The export control.
//!
//! On the web the control is a DOM button, natively it is the `E` key. Both
//! only raise a flag; the viewer consumes it on its next update so the cart
//! is only ever touched from the event loop.

use std::{cell::Cell, rc::Rc};

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Id of the export button in the host page.
pub const EXPORT_BUTTON_ID: &str = "downloadBtn";
pub const EXPORT_KEY: KeyCode = KeyCode::KeyE;

#[derive(Clone, Debug, Default)]
pub struct ExportControl {
    requested: Rc<Cell<bool>>,
}

impl ExportControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.set(true);
    }

    /// Whether an export was requested since the last call.
    pub fn take_request(&self) -> bool {
        self.requested.replace(false)
    }

    pub fn handle_window_event(&self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(EXPORT_KEY),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } = event
        {
            self.request();
        }
    }

    /// Attach to the button with id `id` and enable it.
    ///
    /// The page ships the button disabled so it cannot be clicked before the
    /// cart exists.
    #[cfg(target_arch = "wasm32")]
    pub fn bind_button(&self, id: &str) -> anyhow::Result<()> {
        use anyhow::Context as _;
        use wasm_bindgen::{JsCast, closure::Closure};

        let document = web_sys::window()
            .and_then(|window| window.document())
            .context("no document to look up the export button in")?;
        let element = document
            .get_element_by_id(id)
            .with_context(|| format!("the page has no element with id {id:?}"))?;

        let requested = Rc::clone(&self.requested);
        let on_click = Closure::<dyn FnMut()>::new(move || requested.set(true));
        element
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("failed to listen for clicks on {id:?}: {e:?}"))?;
        // The listener lives as long as the page
        on_click.forget();

        if let Some(button) = element.dyn_ref::<web_sys::HtmlButtonElement>() {
            button.set_disabled(false);
        }
        Ok(())
    }
}
