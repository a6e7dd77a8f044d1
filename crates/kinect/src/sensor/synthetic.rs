use {
    super::Sensor,
    crate::*,
    base::{Vec2, Vec3},
    std::time::Duration,
};

/// A virtual Kinect.
///
/// Depth is a flat plane with an invalid band along the left edge, color is a
/// gradient, every body stands in the middle of the player mask. Failure modes
/// of real hardware (absent device, dropped cable, stalled stream) can be
/// switched on.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    connected: bool,
    native_size: Option<Vec2<usize>>,
    horizontal_fov_deg: f64,
    plane_mm: u16,
    invalid_columns: usize,
    bodies: usize,
    joint_confidence: f32,
    untracked_joints: Vec<usize>,
    color: bool,
    skeleton: bool,
    frame_interval: Duration,
    disconnect_after: Option<u64>,
    stall_after: Option<u64>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            connected: true,
            native_size: None,
            horizontal_fov_deg: 58.5,
            plane_mm: 1000,
            invalid_columns: 8,
            bodies: 1,
            joint_confidence: 1.0,
            untracked_joints: Vec::new(),
            color: true,
            skeleton: true,
            frame_interval: Duration::from_millis(33),
            disconnect_after: None,
            stall_after: None,
        }
    }
}

impl SyntheticConfig {
    /// Behave as if no device is plugged in.
    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    /// Always deliver frames of this size, whatever is requested.
    pub fn with_native_size(mut self, width: usize, height: usize) -> Self {
        self.native_size = Some(Vec2::new(width, height));
        self
    }

    pub fn with_horizontal_fov_deg(mut self, degrees: f64) -> Self {
        self.horizontal_fov_deg = degrees;
        self
    }

    pub fn with_plane_mm(mut self, plane_mm: u16) -> Self {
        self.plane_mm = plane_mm;
        self
    }

    pub fn with_invalid_columns(mut self, columns: usize) -> Self {
        self.invalid_columns = columns;
        self
    }

    pub fn with_bodies(mut self, bodies: usize) -> Self {
        self.bodies = bodies;
        self
    }

    pub fn with_joint_confidence(mut self, confidence: f32) -> Self {
        self.joint_confidence = confidence;
        self
    }

    /// Report joint `index` with zero confidence.
    pub fn with_untracked_joint(mut self, index: usize) -> Self {
        self.untracked_joints.push(index);
        self
    }

    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn without_skeleton(mut self) -> Self {
        self.skeleton = false;
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Fail every capture after `frames` frames.
    pub fn with_disconnect_after(mut self, frames: u64) -> Self {
        self.disconnect_after = Some(frames);
        self
    }

    /// Stop delivering frames after `frames` frames.
    pub fn with_stall_after(mut self, frames: u64) -> Self {
        self.stall_after = Some(frames);
        self
    }

    pub fn plane_mm(&self) -> u16 {
        self.plane_mm
    }

    pub fn invalid_columns(&self) -> usize {
        self.invalid_columns
    }
}

pub(crate) struct SyntheticSensor {
    config: SyntheticConfig,
    opened: Option<(StreamRequest, SensorInfo)>,
    frames: u64,
}

impl SyntheticSensor {
    pub fn new(config: SyntheticConfig) -> Self {
        Self {
            config,
            opened: None,
            frames: 0,
        }
    }

    fn depth(&self, size: Vec2<usize>) -> Vec<u16> {
        let mut depth = vec![self.config.plane_mm; size.area()];
        for row in depth.chunks_exact_mut(size.x.max(1)) {
            let band = self.config.invalid_columns.min(row.len());
            row[..band].fill(0);
        }
        depth
    }

    fn color(size: Vec2<usize>) -> Vec<u8> {
        let mut color = Vec::with_capacity(size.area() * 3);
        for v in 0..size.y {
            for u in 0..size.x {
                color.push((u * 255 / size.x.max(1)) as u8);
                color.push((v * 255 / size.y.max(1)) as u8);
                color.push(128);
            }
        }
        color
    }

    fn players(&self, size: Vec2<usize>) -> Vec<u8> {
        let mut players = vec![0u8; size.area()];
        if self.config.bodies == 0 {
            return players;
        }
        for v in size.y / 4..size.y * 3 / 4 {
            for u in size.x / 4..size.x * 3 / 4 {
                players[size.index(u, v)] = 1;
            }
        }
        players
    }

    fn bodies(&self, joints: usize) -> Vec<RawBody> {
        (0..self.config.bodies)
            .map(|b| RawBody {
                player: (b + 1) as u8,
                joints: (0..joints)
                    .map(|j| RawJoint {
                        position: Vec3::new(
                            b as f64 * 600.0 - 300.0,
                            800.0 - j as f64 * 100.0,
                            self.config.plane_mm as f64 - 200.0,
                        ),
                        confidence: if self.config.untracked_joints.contains(&j) {
                            0.0
                        } else {
                            self.config.joint_confidence
                        },
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Sensor for SyntheticSensor {
    fn open(&mut self, request: &StreamRequest) -> Result<SensorInfo, KinectError> {
        if !self.config.connected {
            return Err(KinectError::Device("no sensor connected".to_string()));
        }
        let native = self.config.native_size;
        let info = SensorInfo {
            depth_size: native.unwrap_or(request.depth),
            color_size: if self.config.color {
                request.color.map(|size| native.unwrap_or(size))
            } else {
                None
            },
            players: request.players,
            skeleton: request.skeleton.is_some() && self.config.skeleton,
            horizontal_fov: self.config.horizontal_fov_deg.to_radians(),
        };
        log::debug!("synthetic sensor: opened {:?}", info);
        self.opened = Some((request.clone(), info.clone()));
        self.frames = 0;
        Ok(info)
    }

    fn close(&mut self) {
        self.opened = None;
    }

    fn blocking_capture(&mut self, timeout: Duration) -> Result<Option<RawSample>, KinectError> {
        let Some((request, info)) = &self.opened else {
            return Err(KinectError::Device("sensor is not open".to_string()));
        };

        if self.config.disconnect_after.is_some_and(|n| self.frames >= n) {
            return Err(KinectError::Device("sensor disconnected".to_string()));
        }
        if self.config.stall_after.is_some_and(|n| self.frames >= n) {
            std::thread::sleep(timeout);
            return Ok(None);
        }

        std::thread::sleep(self.config.frame_interval.min(timeout));

        let joints = match request.skeleton {
            Some(skeleton) if info.skeleton => skeleton.joints,
            _ => 0,
        };
        let sample = RawSample {
            timestamp: base::now_seconds(),
            depth: self.depth(info.depth_size),
            color: info.color_size.map(Self::color),
            players: info.players.then(|| self.players(info.depth_size)),
            bodies: if info.skeleton {
                self.bodies(joints)
            } else {
                Vec::new()
            },
        };
        self.frames += 1;
        Ok(Some(sample))
    }
}
