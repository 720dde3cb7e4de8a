#[cfg(feature = "integration-tests")]
mod common;

/// Frames after which the cart is checked; a long way into the spin.
#[cfg(feature = "integration-tests")]
const SPIN_CYCLES: u64 = 1000;

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_background_colour() {
    use common::test_utils::{Backdrop, TestRender, is_background};
    use minecart::{config::ViewerConfig, context::InitContext, flow::ImageTestResult};

    golden_image_test!(|_: InitContext| {
        TestRender::new(
            Backdrop {
                background: ViewerConfig::default().background,
            },
            |_, state, texture| {
                if state.frames == 0 {
                    return Ok(ImageTestResult::Waiting);
                }
                let (width, height) = (texture.width(), texture.height());
                for pixel in texture.pixels() {
                    assert!(is_background(pixel), "{:?} in a {}x{} frame", pixel, width, height);
                }
                Ok(ImageTestResult::Passed)
            },
        )
    });
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_the_spinning_cart() {
    use common::test_utils::{TestRender, is_background};
    use minecart::{
        config::ViewerConfig, context::InitContext, flow::ImageTestResult, viewer::CartViewer,
    };

    golden_image_test!(|init: InitContext| {
        let config = ViewerConfig {
            seed: Some(5),
            ..ViewerConfig::default()
        };
        TestRender::new(
            CartViewer::new(&init.device, config),
            |_, state, texture| {
                if state.frames < SPIN_CYCLES {
                    return Ok(ImageTestResult::Waiting);
                }
                let centre = texture.get_pixel(texture.width() / 2, texture.height() / 2);
                let covered = texture.pixels().filter(|pixel| !is_background(pixel)).count();
                assert!(covered > 0, "nothing but background after {} frames", state.frames);
                assert!(!is_background(centre), "the cart should cover the centre");
                Ok(ImageTestResult::Passed)
            },
        )
    });
}
