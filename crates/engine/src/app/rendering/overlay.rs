use crate::app::LoopMetricsSnapshot;

use super::text::{
    draw_filled_rect, draw_rect_outline, draw_text_clipped, line_advance, text_width_px,
};

const OVERLAY_TEXT_SCALE: i32 = 2;
const OVERLAY_MARGIN: i32 = 8;
const OVERLAY_INSET: i32 = 6;
const OVERLAY_TEXT_COLOR: [u8; 4] = [244, 248, 252, 255];
const OVERLAY_WARN_COLOR: [u8; 4] = [255, 196, 96, 255];
const OVERLAY_PANEL_BG_COLOR: [u8; 4] = [10, 12, 16, 200];
const OVERLAY_PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];

/// Loop diagnostics drawn in the top-right corner when toggled on with F3.
#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub slow_frame_delay_ms: u64,
    pub sprite_count: usize,
}

pub(crate) fn draw_overlay(frame: &mut [u8], width: u32, height: u32, data: &OverlayData) {
    if width == 0 || height == 0 {
        return;
    }

    let lines = build_overlay_lines(data);
    let panel_width = lines
        .iter()
        .map(|line| text_width_px(line, OVERLAY_TEXT_SCALE))
        .max()
        .unwrap_or(0)
        + OVERLAY_INSET * 2;
    let panel_height = lines.len() as i32 * line_advance(OVERLAY_TEXT_SCALE) + OVERLAY_INSET * 2;
    let panel_left = width as i32 - OVERLAY_MARGIN - panel_width;
    let panel_top = OVERLAY_MARGIN;

    draw_filled_rect(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BG_COLOR,
    );
    draw_rect_outline(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BORDER_COLOR,
    );

    let mut y = panel_top + OVERLAY_INSET;
    for line in &lines {
        let color = if line.starts_with("DROP") && data.metrics.dropped_backlog_ms > 0 {
            OVERLAY_WARN_COLOR
        } else {
            OVERLAY_TEXT_COLOR
        };
        draw_text_clipped(
            frame,
            width,
            height,
            panel_left + OVERLAY_INSET,
            y,
            line,
            OVERLAY_TEXT_SCALE,
            color,
        );
        y += line_advance(OVERLAY_TEXT_SCALE);
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let cap = match data.render_fps_cap {
        Some(cap) => cap.to_string(),
        None => "OFF".to_string(),
    };
    let mut lines = vec![
        format!("FPS: {:.1} (CAP {cap})", data.metrics.fps),
        format!("TPS: {:.1}", data.metrics.tps),
        format!("FRAME: {:.2} MS", data.metrics.frame_time_ms),
        format!("DROPPED: {} MS", data.metrics.dropped_backlog_ms),
        format!("SPRITES: {}", data.sprite_count),
    ];
    if data.slow_frame_delay_ms > 0 {
        lines.push(format!("SLOW FRAME: {} MS", data.slow_frame_delay_ms));
    }
    lines
}
