//! Conversions from the raw formats the Kinect kernel driver emits.

/// Raw disparity value the sensor reports when it has no reading.
pub const DISPARITY_INVALID: u16 = 2047;

// disparity -> meters: 1 / (raw * A + B)
const DEPTH_COEFF_A: f64 = -0.0030711;
const DEPTH_COEFF_B: f64 = 3.3309495;

/// Convert one 11-bit disparity sample to millimeters. Invalid or
/// out-of-range samples become 0.
pub fn disparity_to_mm(raw: u16) -> u16 {
    if raw >= DISPARITY_INVALID {
        return 0;
    }
    let denom = raw as f64 * DEPTH_COEFF_A + DEPTH_COEFF_B;
    if denom <= 0.0 {
        return 0;
    }
    let mm = (1000.0 / denom).round();
    if mm >= u16::MAX as f64 { 0 } else { mm as u16 }
}

pub fn disparity_frame_to_mm(raw: &[u16]) -> Vec<u16> {
    raw.iter().map(|&d| disparity_to_mm(d)).collect()
}

/// Unpack Y10B: every 5 bytes carry four 10-bit samples, high bits first,
/// low bits packed into the fifth byte.
pub fn unpack_y10b(data: &[u8], pixel_count: usize) -> Vec<u16> {
    let mut output = Vec::with_capacity(pixel_count);
    for chunk in data.chunks_exact(5) {
        for i in 0..4 {
            if output.len() == pixel_count {
                return output;
            }
            let low = ((chunk[4] as u16) >> (2 * i)) & 0x03;
            output.push(((chunk[i] as u16) << 2) | low);
        }
    }
    output
}

/// Little-endian 16-bit samples (Y16) into a sample vector.
pub fn unpack_y16(data: &[u8], pixel_count: usize) -> Vec<u16> {
    data.chunks_exact(2)
        .take(pixel_count)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Demosaic a GRBG Bayer frame into RGB24.
///
/// Each 2x2 cell `G R / B G` is resolved to one color shared by its four
/// pixels. Width and height are expected to be even; a trailing odd row or
/// column reuses the last full cell.
pub fn grbg_to_rgb(data: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut rgb = vec![0u8; width * height * 3];
    if width < 2 || height < 2 || data.len() < width * height {
        return rgb;
    }
    for y in 0..height {
        let cy = (y & !1).min(height - 2);
        for x in 0..width {
            let cx = (x & !1).min(width - 2);
            let g0 = data[cy * width + cx] as u16;
            let r = data[cy * width + cx + 1];
            let b = data[(cy + 1) * width + cx];
            let g1 = data[(cy + 1) * width + cx + 1] as u16;
            let o = (y * width + x) * 3;
            rgb[o] = r;
            rgb[o + 1] = ((g0 + g1) / 2) as u8;
            rgb[o + 2] = b;
        }
    }
    rgb
}
