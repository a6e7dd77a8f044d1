use {
    crate::*,
    base::{Vec2, Vec3},
    std::time::Duration,
};

/// Which streams to open and at what size.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    pub depth: Vec2<usize>,
    pub color: Option<Vec2<usize>>,
    pub players: bool,
    pub skeleton: Option<SkeletonRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonRequest {
    /// Size of the backend's joint vocabulary.
    pub joints: usize,
    pub seated: bool,
}

/// What the sensor actually opened.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorInfo {
    pub depth_size: Vec2<usize>,
    pub color_size: Option<Vec2<usize>>,
    pub players: bool,
    pub skeleton: bool,
    /// Horizontal field of view of the depth camera in radians.
    pub horizontal_fov: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawJoint {
    /// Millimeters in the sensor frame.
    pub position: Vec3<f64>,
    pub confidence: f32,
}

/// One tracked body. Joints are indexed by the backend's vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBody {
    pub player: u8,
    pub joints: Vec<RawJoint>,
}

/// Everything the sensor captured at one instant, at its native sizes.
#[derive(Debug, Clone)]
pub struct RawSample {
    pub timestamp: f64,
    pub depth: Vec<u16>,
    pub color: Option<Vec<u8>>,
    pub players: Option<Vec<u8>>,
    pub bodies: Vec<RawBody>,
}

#[derive(Debug, Clone)]
pub enum SensorConfig {
    Synthetic(synthetic::SyntheticConfig),
    #[cfg(feature = "v4l2")]
    V4l2(v4l2::V4l2Config),
}

pub(crate) trait Sensor: Send {
    fn open(&mut self, request: &StreamRequest) -> Result<SensorInfo, KinectError>; // open the device, return what was actually opened
    fn close(&mut self); // close the device, if open
    fn blocking_capture(&mut self, timeout: Duration) -> Result<Option<RawSample>, KinectError>; // None when nothing arrived within timeout
}

pub(crate) fn create_sensor(config: &SensorConfig) -> Box<dyn Sensor> {
    match config {
        SensorConfig::Synthetic(config) => Box::new(synthetic::SyntheticSensor::new(config.clone())),
        #[cfg(feature = "v4l2")]
        SensorConfig::V4l2(config) => Box::new(v4l2::V4l2Sensor::new(config.clone())),
    }
}

pub mod synthetic;

#[cfg(feature = "v4l2")]
pub mod v4l2;
