//! Canvas 2D backend
//!
//! Generated textures are uploaded into offscreen canvases once per cache
//! generation and blitted as sprites.

use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use super::{DrawOp, TextAlign, TextureCache, TextureKind};
use crate::hex_to_css;
use crate::platform::Renderer;

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

fn offscreen_canvas() -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(JsValue::from)
}

/// Renderer drawing into an `HtmlCanvasElement`
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    ball: HtmlCanvasElement,
    paddle: HtmlCanvasElement,
    uploaded: Option<u64>,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        Ok(Self {
            ctx: context_2d(canvas)?,
            ball: offscreen_canvas()?,
            paddle: offscreen_canvas()?,
            uploaded: None,
        })
    }

    fn sprite(&self, kind: TextureKind) -> &HtmlCanvasElement {
        match kind {
            TextureKind::Ball => &self.ball,
            TextureKind::Paddle => &self.paddle,
        }
    }

    fn upload(&self, textures: &TextureCache) -> Result<(), JsValue> {
        for kind in [TextureKind::Ball, TextureKind::Paddle] {
            let raster = textures.get(kind);
            let target = self.sprite(kind);
            target.set_width(raster.width);
            target.set_height(raster.height);

            let data = ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(raster.as_bytes()),
                raster.width,
                raster.height,
            )?;
            context_2d(target)?.put_image_data(&data, 0.0, 0.0)?;
        }
        Ok(())
    }

    fn draw(&self, op: &DrawOp) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match op {
            DrawOp::Clear { color } => {
                let canvas = ctx
                    .canvas()
                    .ok_or_else(|| JsValue::from_str("context lost its canvas"))?;
                ctx.set_global_alpha(1.0);
                ctx.set_fill_style_str(&hex_to_css(*color));
                ctx.fill_rect(
                    0.0,
                    0.0,
                    f64::from(canvas.width()),
                    f64::from(canvas.height()),
                );
            }
            DrawOp::FillRect { rect, color, alpha } => {
                ctx.set_global_alpha(f64::from(*alpha));
                ctx.set_fill_style_str(&hex_to_css(*color));
                ctx.fill_rect(
                    f64::from(rect.x),
                    f64::from(rect.y),
                    f64::from(rect.width),
                    f64::from(rect.height),
                );
            }
            DrawOp::Image {
                texture,
                center,
                size,
            } => {
                ctx.set_global_alpha(1.0);
                ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                    self.sprite(*texture),
                    f64::from(center.x - size.x / 2.0),
                    f64::from(center.y - size.y / 2.0),
                    f64::from(size.x),
                    f64::from(size.y),
                )?;
            }
            DrawOp::Text {
                text,
                pos,
                size_px,
                color,
                bold,
                align,
            } => {
                ctx.set_global_alpha(1.0);
                ctx.set_fill_style_str(&hex_to_css(*color));
                let weight = if *bold { "bold " } else { "" };
                ctx.set_font(&format!("{}{}px Arial, sans-serif", weight, size_px));
                match align {
                    TextAlign::TopLeft => {
                        ctx.set_text_align("left");
                        ctx.set_text_baseline("top");
                    }
                    TextAlign::Center => {
                        ctx.set_text_align("center");
                        ctx.set_text_baseline("middle");
                    }
                }
                ctx.fill_text(text, f64::from(pos.x), f64::from(pos.y))?;
            }
        }
        Ok(())
    }
}

impl Renderer for CanvasRenderer {
    fn present(&mut self, ops: &[DrawOp], textures: &TextureCache) {
        if self.uploaded != Some(textures.generation()) {
            match self.upload(textures) {
                Ok(()) => self.uploaded = Some(textures.generation()),
                Err(e) => log::warn!("Texture upload failed: {:?}", e),
            }
        }

        for op in ops {
            if let Err(e) = self.draw(op) {
                log::warn!("Draw failed: {:?}", e);
                return;
            }
        }
    }
}
