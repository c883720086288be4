use std::path::PathBuf;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{SceneWorld, SpriteDesc, TextLine, TextTone};

use super::overlay::{draw_overlay, OverlayData};
use super::sprites::{LoadedSprite, SpriteCache};
use super::text::{
    draw_filled_rect, draw_rect_outline, draw_text_clipped, line_advance, text_width_px,
};
use super::transform::{Viewport, WorldFit};

const LETTERBOX_COLOR: [u8; 4] = [12, 14, 18, 255];
const SKY_COLOR: [u8; 4] = [132, 196, 232, 255];
const HUD_TEXT_SCALE: i32 = 3;
const HUD_MARGIN: i32 = 12;
const BANNER_TEXT_SCALE: i32 = 3;
const BANNER_INSET: i32 = 18;
const BANNER_BG_COLOR: [u8; 4] = [16, 20, 28, 220];
const BANNER_BORDER_COLOR: [u8; 4] = [236, 200, 96, 255];
const TEXT_SHADOW_COLOR: [u8; 4] = [0, 0, 0, 160];

pub(crate) struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    sprites: SpriteCache,
}

impl Renderer {
    pub(crate) fn new(window: Arc<Window>, asset_root: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            sprites: SpriteCache::new(asset_root),
        })
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width.max(1), height.max(1), surface)
    }

    pub(crate) fn render_world(
        &mut self,
        world: &SceneWorld,
        overlay: Option<&OverlayData>,
    ) -> Result<(), Error> {
        let viewport = self.viewport;
        compose_frame(
            self.pixels.frame_mut(),
            viewport,
            world,
            &mut self.sprites,
            overlay,
        );
        self.pixels.render()
    }
}

fn compose_frame(
    frame: &mut [u8],
    viewport: Viewport,
    world: &SceneWorld,
    sprites: &mut SpriteCache,
    overlay: Option<&OverlayData>,
) {
    let (width, height) = (viewport.width, viewport.height);
    if width == 0 || height == 0 {
        return;
    }
    let fit = WorldFit::new(world.size(), viewport);

    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&LETTERBOX_COLOR);
    }
    let (world_left, world_top) = (fit.offset_x as i32, fit.offset_y as i32);
    draw_filled_rect(
        frame,
        width,
        height,
        world_left,
        world_top,
        fit.scale_length(world.size().width),
        fit.scale_length(world.size().height),
        SKY_COLOR,
    );

    for index in draw_order(world.sprites()) {
        let desc = &world.sprites()[index];
        match sprites.get(desc.key) {
            Some(sprite) => draw_sprite(frame, viewport, &fit, desc, sprite),
            None => draw_fallback(frame, viewport, &fit, desc),
        }
    }

    draw_hud(frame, viewport, world_left + HUD_MARGIN, world_top + HUD_MARGIN, world.hud_lines());
    draw_banner(frame, viewport, &fit, world);

    if let Some(data) = overlay {
        draw_overlay(frame, width, height, data);
    }
}

/// Stable sort by layer, so insertion order breaks ties.
fn draw_order(sprites: &[SpriteDesc]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..sprites.len()).collect();
    indices.sort_by_key(|index| sprites[*index].layer);
    indices
}

fn sprite_screen_rect(fit: &WorldFit, desc: &SpriteDesc) -> (i32, i32, i32, i32) {
    let (left, top) = fit.world_to_screen(desc.center - desc.half_extents);
    let w = fit.scale_length(desc.half_extents.x * 2.0).max(1);
    let h = fit.scale_length(desc.half_extents.y * 2.0).max(1);
    (left, top, w, h)
}

fn draw_fallback(frame: &mut [u8], viewport: Viewport, fit: &WorldFit, desc: &SpriteDesc) {
    let (left, top, w, h) = sprite_screen_rect(fit, desc);
    draw_filled_rect(
        frame,
        viewport.width,
        viewport.height,
        left,
        top,
        w,
        h,
        desc.fallback_color,
    );
}

/// Nearest-neighbour stretch of the sprite onto its world box.
fn draw_sprite(
    frame: &mut [u8],
    viewport: Viewport,
    fit: &WorldFit,
    desc: &SpriteDesc,
    sprite: &LoadedSprite,
) {
    if sprite.width == 0 || sprite.height == 0 {
        return;
    }
    if sprite.rgba.len() < sprite.width as usize * sprite.height as usize * 4 {
        return;
    }

    let (left, top, w, h) = sprite_screen_rect(fit, desc);
    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = (left + w).min(viewport.width as i32);
    let draw_bottom = (top + h).min(viewport.height as i32);
    let frame_width = viewport.width as usize;

    for out_y in draw_top..draw_bottom {
        let src_y = ((out_y - top) as u64 * sprite.height as u64 / h as u64) as usize;
        let src_y = src_y.min(sprite.height as usize - 1);
        for out_x in draw_left..draw_right {
            let src_x = ((out_x - left) as u64 * sprite.width as u64 / w as u64) as usize;
            let src_x = src_x.min(sprite.width as usize - 1);
            let src = (src_y * sprite.width as usize + src_x) * 4;
            if sprite.rgba[src + 3] == 0 {
                continue;
            }
            let dst = (out_y as usize * frame_width + out_x as usize) * 4;
            if let Some(pixel) = frame.get_mut(dst..dst + 4) {
                pixel.copy_from_slice(&sprite.rgba[src..src + 4]);
            }
        }
    }
}

fn tone_color(tone: TextTone) -> [u8; 4] {
    match tone {
        TextTone::Primary => [250, 250, 250, 255],
        TextTone::Dim => [150, 156, 168, 255],
        TextTone::Accent => [255, 214, 64, 255],
        TextTone::Warning => [255, 110, 96, 255],
    }
}

fn draw_shadowed_line(
    frame: &mut [u8],
    viewport: Viewport,
    x: i32,
    y: i32,
    line: &TextLine,
    scale: i32,
) {
    let (width, height) = (viewport.width, viewport.height);
    draw_text_clipped(frame, width, height, x + 1, y + 1, &line.text, scale, TEXT_SHADOW_COLOR);
    draw_text_clipped(frame, width, height, x, y, &line.text, scale, tone_color(line.tone));
}

fn draw_hud(frame: &mut [u8], viewport: Viewport, x: i32, mut y: i32, lines: &[TextLine]) {
    for line in lines {
        draw_shadowed_line(frame, viewport, x, y, line, HUD_TEXT_SCALE);
        y += line_advance(HUD_TEXT_SCALE);
    }
}

fn draw_banner(frame: &mut [u8], viewport: Viewport, fit: &WorldFit, world: &SceneWorld) {
    let lines = world.banner_lines();
    if lines.is_empty() {
        return;
    }

    let text_width = lines
        .iter()
        .map(|line| text_width_px(&line.text, BANNER_TEXT_SCALE))
        .max()
        .unwrap_or(0);
    let panel_width = text_width + BANNER_INSET * 2;
    let panel_height = lines.len() as i32 * line_advance(BANNER_TEXT_SCALE) + BANNER_INSET * 2;
    let (center_x, center_y) = fit.world_to_screen(crate::app::Vec2::new(
        world.size().width * 0.5,
        world.size().height * 0.5,
    ));
    let panel_left = center_x - panel_width / 2;
    let panel_top = center_y - panel_height / 2;

    draw_filled_rect(
        frame,
        viewport.width,
        viewport.height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        BANNER_BG_COLOR,
    );
    draw_rect_outline(
        frame,
        viewport.width,
        viewport.height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        BANNER_BORDER_COLOR,
    );

    let mut y = panel_top + BANNER_INSET;
    for line in lines {
        let line_width = text_width_px(&line.text, BANNER_TEXT_SCALE);
        let x = center_x - line_width / 2;
        draw_shadowed_line(frame, viewport, x, y, line, BANNER_TEXT_SCALE);
        y += line_advance(BANNER_TEXT_SCALE);
    }
}
