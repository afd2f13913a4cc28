//! Channel layout conversions into RGB and RGBA.

/// Expand 8-bit luminance to RGB.
pub fn gray_to_rgb(gray: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(gray.len() * 3);
    for &g in gray {
        rgb.extend_from_slice(&[g, g, g]);
    }
    rgb
}

/// Expand 8-bit luminance plus alpha to RGBA.
pub fn gray_alpha_to_rgba(gray_alpha: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(gray_alpha.len() * 2);
    for chunk in gray_alpha.chunks_exact(2) {
        let g = chunk[0];
        rgba.extend_from_slice(&[g, g, g, chunk[1]]);
    }
    rgba
}

/// Reduce big-endian 16-bit luminance to RGB.
pub fn gray16_to_rgb(gray: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(gray.len() / 2 * 3);
    for chunk in gray.chunks_exact(2) {
        let g = chunk[0];
        rgb.extend_from_slice(&[g, g, g]);
    }
    rgb
}

/// Convert CMYK (as stored by Adobe JPEG, already un-inverted) to RGB.
pub fn cmyk_to_rgb(cmyk: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(cmyk.len() / 4 * 3);
    for chunk in cmyk.chunks_exact(4) {
        let k = 255 - u32::from(chunk[3]);
        let channel = |c: u8| ((255 - u32::from(c)) * k / 255) as u8;
        rgb.extend_from_slice(&[channel(chunk[0]), channel(chunk[1]), channel(chunk[2])]);
    }
    rgb
}

/// Drop the alpha channel of RGBA pixels.
pub fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }
    rgb
}

/// Whether every pixel of an RGBA buffer is fully opaque.
pub fn is_opaque(rgba: &[u8]) -> bool {
    rgba.chunks_exact(4).all(|chunk| chunk[3] == 255)
}
