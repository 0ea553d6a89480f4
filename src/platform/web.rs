//! Browser glue: canvas 2D render sink and image loading

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::SimError;
use crate::assets::{AssetRequest, LoadedImage};
use crate::renderer::shapes::{colors, css_color};
use crate::renderer::{DrawCommand, Frame, RenderSink};

/// Load every image; the first failure fails the whole batch
pub async fn load_images(
    requests: &[AssetRequest],
    base_url: &str,
) -> Result<(Vec<HtmlImageElement>, Vec<LoadedImage>), SimError> {
    let mut elements = Vec::with_capacity(requests.len());
    let mut loaded = Vec::with_capacity(requests.len());

    for request in requests {
        let fail = |reason: String| SimError::AssetLoad {
            id: request.id.clone(),
            reason,
        };
        let img = HtmlImageElement::new().map_err(|e| fail(format!("{:?}", e)))?;
        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            img.set_onload(Some(&resolve));
            img.set_onerror(Some(&reject));
        });
        img.set_src(&format!("{}/{}.png", base_url, request.id));
        JsFuture::from(promise)
            .await
            .map_err(|_| fail("image failed to load".to_string()))?;

        loaded.push(LoadedImage {
            id: request.id.clone(),
            natural_width: img.natural_width() as f32,
            natural_height: img.natural_height() as f32,
        });
        elements.push(img);
    }

    log::info!("Loaded {} fruit images", loaded.len());
    Ok((elements, loaded))
}

/// Paints frames onto a 2D canvas
pub struct CanvasSink {
    ctx: CanvasRenderingContext2d,
    images: Vec<HtmlImageElement>,
}

impl CanvasSink {
    pub fn new(canvas: &HtmlCanvasElement, images: Vec<HtmlImageElement>) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx, images })
    }

    fn draw(&self, command: &DrawCommand, frame: &Frame) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Clear { color } => {
                ctx.set_fill_style_str(&css_color(*color, 1.0));
                ctx.fill_rect(0.0, 0.0, frame.width as f64, frame.height as f64);
            }
            DrawCommand::Sprite {
                asset,
                center,
                width,
                height,
                rotation,
            } => {
                if let Some(img) = self.images.get(*asset) {
                    ctx.save();
                    ctx.translate(center.x as f64, center.y as f64)?;
                    ctx.rotate(*rotation as f64)?;
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        -(*width as f64) / 2.0,
                        -(*height as f64) / 2.0,
                        *width as f64,
                        *height as f64,
                    )?;
                    ctx.restore();
                }
            }
            DrawCommand::Polygon { points, color } => {
                if let Some((first, rest)) = points.split_first() {
                    ctx.begin_path();
                    ctx.move_to(first.x as f64, first.y as f64);
                    for p in rest {
                        ctx.line_to(p.x as f64, p.y as f64);
                    }
                    ctx.close_path();
                    ctx.set_fill_style_str(&css_color(*color, 1.0));
                    ctx.fill();
                }
            }
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => {
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.set_stroke_style_str(&css_color(*color, 1.0));
                ctx.set_line_width(*width as f64);
                ctx.stroke();
            }
            DrawCommand::Coating {
                center_x,
                width,
                top,
                bottom,
                ..
            } => {
                let left = (*center_x - *width / 2.0) as f64;
                let gradient =
                    ctx.create_linear_gradient(0.0, *top as f64, 0.0, *bottom as f64);
                gradient.add_color_stop(0.0, &css_color(colors::COATING_EDGE, 1.0))?;
                gradient.add_color_stop(1.0, &css_color(colors::COATING, 1.0))?;
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.fill_rect(left, *top as f64, *width as f64, (*bottom - *top) as f64);
            }
            DrawCommand::Sparkle {
                center,
                size,
                alpha,
            } => {
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *size as f64,
                    0.0,
                    std::f64::consts::TAU,
                )?;
                ctx.set_fill_style_str(&css_color(colors::SPARKLE, *alpha));
                ctx.fill();
            }
        }
        Ok(())
    }
}

impl RenderSink for CanvasSink {
    fn submit(&mut self, frame: &Frame) {
        let scale = frame.scale as f64;
        if let Err(e) = self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0) {
            log::warn!("Canvas transform failed: {:?}", e);
            return;
        }
        for command in &frame.commands {
            if let Err(e) = self.draw(command, frame) {
                log::warn!("Draw failed: {:?}", e);
            }
        }
    }
}
