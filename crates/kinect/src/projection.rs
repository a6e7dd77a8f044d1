use {
    crate::*,
    base::{Vec2, Vec3},
};

/// Camera intrinsics fixed at initialization. The principal point is the image center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    pub focal_length: f64,
    pub size: Vec2<usize>,
}

impl Intrinsics {
    pub fn principal_point(&self) -> (f64, f64) {
        (self.size.x as f64 / 2.0, self.size.y as f64 / 2.0)
    }
}

/// Pinhole back-projection of depth pixel `(u, v)`.
///
/// Returns millimeters in the sensor frame with `z` equal to the stored depth.
/// Every backend goes through this one function.
pub fn back_project(
    u: i32,
    v: i32,
    depth: &DepthImage,
    focal_length: f64,
) -> Result<Vec3<f64>, KinectError> {
    let size = depth.size;
    if !size.contains(u as i64, v as i64) {
        return Err(KinectError::OutOfBounds { u, v, size });
    }
    let d = depth
        .get(u as usize, v as usize)
        .ok_or(KinectError::OutOfBounds { u, v, size })?;
    if d == 0 {
        return Err(KinectError::InvalidSample { u, v });
    }

    let (cx, cy) = Intrinsics { focal_length, size }.principal_point();
    let z = d as f64;
    let x = (u as f64 - cx) * z / focal_length;
    let y = (v as f64 - cy) * z / focal_length;
    Ok(Vec3::new(x, y, z))
}
