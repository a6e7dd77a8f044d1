//! Depth sensor driver for Kinect-class devices.
//!
//! A `KinectDriver` puts one sensor behind either NUI or OpenNI semantics and
//! hands out depth, color, player and skeleton frames plus 3D back-projection,
//! the same way for both.

mod error;
pub use error::*;

mod tags;
pub use tags::*;

mod options;
pub use options::*;

mod config;
pub use config::*;

pub mod frame;
pub use frame::{DepthImage, PlayerImage, RgbImage};

mod skeleton;
pub use skeleton::*;

pub mod projection;
pub use projection::Intrinsics;

pub mod convert;

pub mod backend;
pub use backend::{Backend, BackendKind};

pub mod sensor;
pub use sensor::{
    RawBody, RawJoint, RawSample, SensorConfig, SensorInfo, SkeletonRequest, StreamRequest,
    synthetic::SyntheticConfig,
};

#[cfg(feature = "v4l2")]
pub use sensor::v4l2::V4l2Config;

mod worker;

mod driver;
pub use driver::*;
