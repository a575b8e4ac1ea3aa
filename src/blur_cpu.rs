use crate::composite_cpu::over_shifted_in_place;
use crate::foundation::error::{EmojiPadError, EmojiPadResult};

/// Soften a premultiplied RGBA8 bitmap in place by compositing it onto itself at small offsets.
///
/// Offsets walk the grid `-radius..=radius` in steps of 2 on both axes; each tap is drawn at
/// `1 / (2 * radius)` opacity. Taps with non-negative offsets are mirrored to `(-(x-1), -(y-1))`.
/// Every tap reads the bitmap as left by the previous one, so tap order is significant.
pub fn offset_blur_in_place(
    data: &mut [u8],
    width: u32,
    height: u32,
    radius: u32,
) -> EmojiPadResult<()> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| EmojiPadError::render("blur buffer size overflow"))?;
    if data.len() != expected_len {
        return Err(EmojiPadError::render(
            "offset_blur_in_place expects data matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(());
    }

    let alpha = 1.0 / (2.0 * radius as f32);
    let offsets = tap_offsets(radius);
    let mut snapshot = Vec::with_capacity(expected_len);
    for (dx, dy) in offsets {
        snapshot.clear();
        snapshot.extend_from_slice(data);
        over_shifted_in_place(data, &snapshot, width, height, dx, dy, alpha)?;
    }
    Ok(())
}

/// Ordered tap offsets for [`offset_blur_in_place`].
pub fn tap_offsets(radius: u32) -> Vec<(i32, i32)> {
    let r = radius as i32;
    let mut out = Vec::new();
    for x in (-r..=r).step_by(2) {
        for y in (-r..=r).step_by(2) {
            out.push((x, y));
            if x >= 0 && y >= 0 {
                out.push((-(x - 1), -(y - 1)));
            }
        }
    }
    out
}

/// Largest alpha difference between horizontally or vertically adjacent pixels.
pub fn max_alpha_step(data: &[u8], width: u32, height: u32) -> u8 {
    let w = width as usize;
    let h = height as usize;
    let alpha = |x: usize, y: usize| data[(y * w + x) * 4 + 3];
    let mut max = 0u8;
    for y in 0..h {
        for x in 0..w {
            let a = alpha(x, y);
            if x + 1 < w {
                max = max.max(a.abs_diff(alpha(x + 1, y)));
            }
            if y + 1 < h {
                max = max.max(a.abs_diff(alpha(x, y + 1)));
            }
        }
    }
    max
}
