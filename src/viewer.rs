//! The minecart viewer flow.
//!
//! Builds the cart once, spins it a fixed step per rendered frame and exports
//! it to glTF whenever the export control fires.

use std::path::PathBuf;

use instant::Duration;
use winit::event::WindowEvent;

use crate::{
    cart::{Palette, build_cart},
    config::ViewerConfig,
    context::Context,
    controls::ExportControl,
    data_structures::{material::clear_colour, model::GroupModel, scene_graph::Group},
    export,
    flow::{FlowConstructor, GraphicsFlow, Out},
    render::Render,
};

/// State shared by the viewer's flows.
#[derive(Debug, Default)]
pub struct ViewerState {
    /// Frames rendered since start-up.
    pub frames: u64,
    /// Files written by native exports, oldest first.
    pub exports: Vec<PathBuf>,
}

pub struct CartViewer {
    config: ViewerConfig,
    cart: Group,
    model: GroupModel,
    control: ExportControl,
}

impl CartViewer {
    pub fn new(device: &wgpu::Device, config: ViewerConfig) -> Self {
        let mut rng = config.rng();
        let cart = build_cart(&Palette::default(), &mut rng);
        let model = GroupModel::new(device, &cart);
        Self {
            config,
            cart,
            model,
            control: ExportControl::new(),
        }
    }

    pub fn cart(&self) -> &Group {
        &self.cart
    }

    pub fn control(&self) -> &ExportControl {
        &self.control
    }

    #[cfg(target_arch = "wasm32")]
    fn export(&self) -> Out<ViewerState> {
        let result = export::to_gltf_string(&self.cart)
            .and_then(|document| export::deliver(&document, &self.config.export_file_name));
        if let Err(e) = result {
            log::error!("export failed: {:#}", e);
        }
        Out::Empty
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn export(&self) -> Out<ViewerState> {
        let document = match export::to_gltf_string(&self.cart) {
            Ok(document) => document,
            Err(e) => {
                log::error!("export failed: {:#}", e);
                return Out::Empty;
            }
        };
        let dir = self.config.out_dir.clone();
        let file_name = self.config.export_file_name.clone();
        let write: Box<dyn Future<Output = Box<dyn FnOnce(&mut ViewerState)>>> =
            Box::new(async move {
                let mutation: Box<dyn FnOnce(&mut ViewerState)> =
                    match export::deliver(document, dir, &file_name).await {
                        Ok(path) => Box::new(move |state: &mut ViewerState| state.exports.push(path)),
                        Err(e) => {
                            log::error!("export failed: {:#}", e);
                            Box::new(|_: &mut ViewerState| ())
                        }
                    };
                mutation
            });
        Out::FutFn(vec![write])
    }
}

impl GraphicsFlow<ViewerState> for CartViewer {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ViewerState) -> Out<ViewerState> {
        ctx.clear_colour = clear_colour(self.config.background);
        ctx.set_camera(&self.config.camera);
        ctx.set_lighting(&self.config.lighting);

        #[cfg(target_arch = "wasm32")]
        if let Err(e) = self
            .control
            .bind_button(crate::controls::EXPORT_BUTTON_ID)
        {
            log::error!("export button unavailable: {:#}", e);
        }

        Out::Empty
    }

    fn on_update(
        &mut self,
        ctx: &Context,
        state: &mut ViewerState,
        _: Duration,
    ) -> Out<ViewerState> {
        state.frames += 1;
        self.cart.spin(self.config.spin_per_frame);
        self.model.write_to_buffers(&ctx.queue, &self.cart);

        if self.control.take_request() {
            log::info!("exporting {}", self.config.export_file_name);
            return self.export();
        }
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        _: &mut ViewerState,
        event: &WindowEvent,
    ) -> Out<ViewerState> {
        self.control.handle_window_event(event);
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        (&self.model).into()
    }

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _: &Context,
        _: &mut ViewerState,
        _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<crate::flow::ImageTestResult, anyhow::Error> {
        Ok(crate::flow::ImageTestResult::Waiting)
    }
}

/// A flow constructor building a [`CartViewer`] from `config`.
pub fn viewer(config: ViewerConfig) -> FlowConstructor<ViewerState> {
    Box::new(move |init| {
        Box::pin(async move {
            let flow: Box<dyn GraphicsFlow<ViewerState>> =
                Box::new(CartViewer::new(&init.device, config));
            flow
        })
    })
}
