#![allow(dead_code)]

#[cfg(feature = "integration-tests")]
use minecart::{
    context::Context,
    flow::{GraphicsFlow, ImageTestResult, Out},
    render::Render,
    viewer::ViewerState,
};

/// Grey level the viewer's default background ends up as on an sRGB surface.
pub(crate) const BACKGROUND_GREY: u8 = 0x1a;

pub(crate) fn is_background(pixel: &image::Rgba<u8>) -> bool {
    pixel.0[..3]
        .iter()
        .all(|&channel| channel.abs_diff(BACKGROUND_GREY) <= 1)
}

#[cfg(feature = "integration-tests")]
pub(crate) type Validate = Box<
    dyn Fn(
        &Context,
        &mut ViewerState,
        &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>,
>;

/// Runs `flow` unchanged and checks every rendered frame with `validate`.
#[cfg(feature = "integration-tests")]
pub(crate) struct TestRender {
    pub(crate) flow: Box<dyn GraphicsFlow<ViewerState>>,
    pub(crate) validate: Validate,
}

#[cfg(feature = "integration-tests")]
impl TestRender {
    pub(crate) fn new(
        flow: impl GraphicsFlow<ViewerState> + 'static,
        validate: impl Fn(
            &Context,
            &mut ViewerState,
            &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error>
        + 'static,
    ) -> Self {
        Self {
            flow: Box::new(flow),
            validate: Box::new(validate),
        }
    }
}

#[cfg(feature = "integration-tests")]
impl GraphicsFlow<ViewerState> for TestRender {
    fn on_init(&mut self, ctx: &mut Context, state: &mut ViewerState) -> Out<ViewerState> {
        self.flow.on_init(ctx, state)
    }

    fn on_update(
        &mut self,
        ctx: &Context,
        state: &mut ViewerState,
        dt: std::time::Duration,
    ) -> Out<ViewerState> {
        self.flow.on_update(ctx, state, dt)
    }

    fn on_window_events(
        &mut self,
        ctx: &Context,
        state: &mut ViewerState,
        event: &minecart::WindowEvent,
    ) -> Out<ViewerState> {
        self.flow.on_window_events(ctx, state, event)
    }

    fn on_render(&self) -> Render<'_> {
        self.flow.on_render()
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut ViewerState,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        (self.validate)(ctx, state, texture)
    }
}

/// A flow that draws nothing and only counts frames.
#[cfg(feature = "integration-tests")]
pub(crate) struct Backdrop {
    pub(crate) background: u32,
}

#[cfg(feature = "integration-tests")]
impl GraphicsFlow<ViewerState> for Backdrop {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ViewerState) -> Out<ViewerState> {
        ctx.clear_colour = minecart::data_structures::material::clear_colour(self.background);
        Out::Empty
    }

    fn on_update(
        &mut self,
        _: &Context,
        state: &mut ViewerState,
        _: std::time::Duration,
    ) -> Out<ViewerState> {
        state.frames += 1;
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        _: &mut ViewerState,
        _: &minecart::WindowEvent,
    ) -> Out<ViewerState> {
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        Render::None
    }

    fn render_to_texture(
        &self,
        _: &Context,
        _: &mut ViewerState,
        _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        Ok(ImageTestResult::Waiting)
    }
}

#[macro_export]
macro_rules! golden_image_test {
    ($constructor:expr) => {{
        use minecart::flow::{FlowConstructor, GraphicsFlow};
        use minecart::viewer::ViewerState;
        let constructor: FlowConstructor<ViewerState> = Box::new(|init| {
            Box::pin(async move {
                let g_flow: Box<dyn GraphicsFlow<ViewerState>> = Box::new(($constructor)(init));
                g_flow
            })
        });

        minecart::flow::run(vec![constructor])
            .expect("Failed to run flow for integration test.");
    }};
}
