use image::RgbaImage;

use crate::model::Rect;

/// Copies `src_rect` from `src` into `dst` with its top-left at
/// `(dst_x, dst_y)`, clipped to both images' bounds.
///
/// Pixels are copied verbatim, whole rows at a time; no blending, filtering,
/// or resampling.
pub fn copy_rect(src: &RgbaImage, dst: &mut RgbaImage, src_rect: Rect, dst_x: u32, dst_y: u32) {
    let (sw, sh) = src.dimensions();
    let (dw, dh) = dst.dimensions();
    if src_rect.x >= sw || src_rect.y >= sh || dst_x >= dw || dst_y >= dh {
        return;
    }
    let w = src_rect.w.min(sw - src_rect.x).min(dw - dst_x) as usize;
    let h = src_rect.h.min(sh - src_rect.y).min(dh - dst_y);
    if w == 0 {
        return;
    }
    let s_stride = sw as usize * 4;
    let d_stride = dw as usize * 4;
    let src_buf: &[u8] = src.as_raw();
    let dst_buf: &mut [u8] = &mut **dst;
    for row in 0..h {
        let so = ((src_rect.y + row) as usize) * s_stride + (src_rect.x as usize) * 4;
        let d = ((dst_y + row) as usize) * d_stride + (dst_x as usize) * 4;
        dst_buf[d..d + w * 4].copy_from_slice(&src_buf[so..so + w * 4]);
    }
}

/// Replicates the edge rows and columns of `rect` outward by up to `amount`
/// pixels, clamped at the image bounds. Corners are left untouched.
///
/// Used to bleed a packed slot's artwork into its transparent margin so
/// compressed-texture sampling near the slot edge does not pick up
/// transparency.
pub fn extrude_edges(img: &mut RgbaImage, rect: Rect, amount: u32) {
    let (w, h) = img.dimensions();
    let Some(rect) = rect.intersection(&Rect::new(0, 0, w, h)) else {
        return;
    };
    if amount == 0 {
        return;
    }
    let stride = w as usize * 4;
    let buf: &mut [u8] = &mut **img;
    let x0 = rect.x as usize * 4;
    let row_len = rect.w as usize * 4;

    for e in 1..=amount {
        // top edge
        if rect.y >= e {
            let src = (rect.y as usize) * stride + x0;
            let dst = ((rect.y - e) as usize) * stride + x0;
            buf.copy_within(src..src + row_len, dst);
        }
        // bottom edge
        if rect.y_max() + e <= h {
            let last = rect.y_max() - 1;
            let src = (last as usize) * stride + x0;
            let dst = ((last + e) as usize) * stride + x0;
            buf.copy_within(src..src + row_len, dst);
        }
    }

    for y in rect.y..rect.y_max() {
        let row = y as usize * stride;
        for e in 1..=amount {
            // left edge
            if rect.x >= e {
                let src = row + rect.x as usize * 4;
                let dst = row + (rect.x - e) as usize * 4;
                buf.copy_within(src..src + 4, dst);
            }
            // right edge
            if rect.x_max() + e <= w {
                let last = rect.x_max() - 1;
                let src = row + last as usize * 4;
                let dst = row + (last + e) as usize * 4;
                buf.copy_within(src..src + 4, dst);
            }
        }
    }
}
