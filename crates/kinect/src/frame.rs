use {
    base::Vec2,
    crates_image::{ImageBuffer, Luma, Rgb},
};

/// Depth in millimeters, row-major. 0 means no valid reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthImage {
    pub size: Vec2<usize>,
    pub data: Vec<u16>,
}

/// 8-bit RGB, three bytes per pixel, row-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RgbImage {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
}

/// Player segmentation: 0 is background, n is tracked player n.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerImage {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
}

impl DepthImage {
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            data: vec![0; size.area()],
        }
    }

    pub fn get(&self, u: usize, v: usize) -> Option<u16> {
        if u < self.size.x && v < self.size.y {
            self.data.get(self.size.index(u, v)).copied()
        } else {
            None
        }
    }

    pub fn to_luma16(&self) -> Option<ImageBuffer<Luma<u16>, Vec<u16>>> {
        ImageBuffer::from_raw(self.size.x as u32, self.size.y as u32, self.data.clone())
    }
}

impl RgbImage {
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            data: vec![0; size.area() * 3],
        }
    }

    pub fn get(&self, u: usize, v: usize) -> Option<[u8; 3]> {
        if u < self.size.x && v < self.size.y {
            let i = self.size.index(u, v) * 3;
            self.data.get(i..i + 3).map(|p| [p[0], p[1], p[2]])
        } else {
            None
        }
    }

    pub fn to_rgb8(&self) -> Option<ImageBuffer<Rgb<u8>, Vec<u8>>> {
        ImageBuffer::from_raw(self.size.x as u32, self.size.y as u32, self.data.clone())
    }
}

impl PlayerImage {
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            data: vec![0; size.area()],
        }
    }

    pub fn get(&self, u: usize, v: usize) -> Option<u8> {
        if u < self.size.x && v < self.size.y {
            self.data.get(self.size.index(u, v)).copied()
        } else {
            None
        }
    }
}

/// Nearest-neighbour resample of a row-major buffer with `channels` values per pixel.
///
/// Returns the input unchanged when the sizes already match.
pub(crate) fn resample<T: Copy + Default>(
    src: Vec<T>,
    src_size: Vec2<usize>,
    dst_size: Vec2<usize>,
    channels: usize,
) -> Vec<T> {
    if src_size == dst_size {
        return src;
    }
    let mut dst = vec![T::default(); dst_size.area() * channels];
    if src_size.area() == 0 || src.len() < src_size.area() * channels {
        return dst;
    }
    for v in 0..dst_size.y {
        let sv = v * src_size.y / dst_size.y;
        for u in 0..dst_size.x {
            let su = u * src_size.x / dst_size.x;
            let s = src_size.index(su, sv) * channels;
            let d = dst_size.index(u, v) * channels;
            dst[d..d + channels].copy_from_slice(&src[s..s + channels]);
        }
    }
    dst
}
