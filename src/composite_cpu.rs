use crate::foundation::error::{EmojiPadError, EmojiPadResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composite `src` onto `dst` translated by `(dx, dy)` pixels, the way a canvas `drawImage(src,
/// dx, dy)` would. Both buffers are `width * height` premultiplied RGBA8; pixels shifted outside
/// the destination are dropped.
pub fn over_shifted_in_place(
    dst: &mut [u8],
    src: &[u8],
    width: u32,
    height: u32,
    dx: i32,
    dy: i32,
    opacity: f32,
) -> EmojiPadResult<()> {
    let expected = (width as usize) * (height as usize) * 4;
    if dst.len() != expected || src.len() != expected {
        return Err(EmojiPadError::render(
            "over_shifted_in_place expects rgba8 buffers matching width*height*4",
        ));
    }

    let w = width as i32;
    let h = height as i32;
    // Destination rows/cols that receive a source pixel.
    let x0 = dx.max(0);
    let x1 = (w + dx).min(w);
    let y0 = dy.max(0);
    let y1 = (h + dy).min(h);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    for y in y0..y1 {
        let sy = y - dy;
        for x in x0..x1 {
            let sx = x - dx;
            let si = ((sy * w + sx) as usize) * 4;
            let di = ((y * w + x) as usize) * 4;
            let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            if s[3] == 0 {
                continue;
            }
            let d = [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]];
            dst[di..di + 4].copy_from_slice(&over(d, s, opacity));
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
