//! Alpha-over blending

use image::{Rgba, RgbaImage};

/// Composite `src` over `dst` in place ("source over", straight alpha).
///
/// Both images must have the same dimensions.
pub(crate) fn blit_over(canvas: &mut RgbaImage, layer: &RgbaImage) {
    for (dst, src) in canvas.pixels_mut().zip(layer.pixels()) {
        // Fully transparent source, skip
        if src[3] == 0 {
            continue;
        }
        // Fully opaque source replaces the destination
        if src[3] == 255 {
            *dst = *src;
            continue;
        }
        *dst = blend_over(src, dst);
    }
}

/// Blend a source pixel over a destination pixel.
///
/// out_alpha = src_alpha + dst_alpha * (1 - src_alpha)
/// out_color = (src * src_alpha + dst * dst_alpha * (1 - src_alpha)) / out_alpha
pub(crate) fn blend_over(src: &Rgba<u8>, dst: &Rgba<u8>) -> Rgba<u8> {
    let src_alpha = src[3] as f32 / 255.0;
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);

    if out_alpha == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let composite = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let result = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (result.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba([
        composite(src[0], dst[0]),
        composite(src[1], dst[1]),
        composite(src[2], dst[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_over_anything() {
        let src = Rgba([10, 20, 30, 255]);
        assert_eq!(blend_over(&src, &Rgba([200, 200, 200, 255])), src);
        assert_eq!(blend_over(&src, &Rgba([0, 0, 0, 0])), src);
    }

    #[test]
    fn test_transparent_over_keeps_destination() {
        let dst = Rgba([200, 100, 50, 128]);
        assert_eq!(blend_over(&Rgba([255, 255, 255, 0]), &dst), dst);
    }

    #[test]
    fn test_translucent_over_empty_keeps_source() {
        let src = Rgba([9, 61, 191, 192]);
        assert_eq!(blend_over(&src, &Rgba([0, 0, 0, 0])), src);
    }

    #[test]
    fn test_half_over_opaque() {
        let out = blend_over(&Rgba([255, 0, 0, 128]), &Rgba([0, 0, 255, 255]));
        assert_eq!(out[3], 255);
        assert_eq!(out[0], 128);
        assert_eq!(out[1], 0);
        assert_eq!(out[2], 127);
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(blend_over(&Rgba([0, 0, 0, 0]), &Rgba([0, 0, 0, 0])), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_blit_over() {
        let mut canvas = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 255, 255]));
        let mut layer = RgbaImage::new(2, 1);
        layer.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        blit_over(&mut canvas, &layer);
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(canvas.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
    }
}
