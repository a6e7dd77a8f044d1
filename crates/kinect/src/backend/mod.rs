use {
    crate::*,
    base::Vec2,
    std::fmt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Proprietary NUI SDK semantics.
    Nui,
    /// OpenNI semantics.
    OpenNi,
}

impl BackendKind {
    pub fn supports_seated(self) -> bool {
        matches!(self, BackendKind::Nui)
    }

    /// Whether `depth_width`/`depth_height` are read from the options.
    pub fn uses_depth_options(self) -> bool {
        matches!(self, BackendKind::OpenNi)
    }

    pub fn create(self) -> Box<dyn Backend> {
        match self {
            BackendKind::Nui => Box::new(nui::Nui),
            BackendKind::OpenNi => Box::new(openni::OpenNi),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Nui => f.write_str("NUI"),
            BackendKind::OpenNi => f.write_str("OpenNI"),
        }
    }
}

/// Per-SDK policy on top of a sensor: joint vocabulary, confidence filtering
/// and focal length.
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Joint names, in the order the sensor reports them.
    fn joint_names(&self) -> &'static [&'static str];

    /// Indices into `joint_names` kept in seated mode.
    fn upper_body_joints(&self) -> &'static [usize];

    /// Whether a joint reported with `confidence` is kept.
    fn is_tracked(&self, confidence: f32) -> bool;

    /// Focal length in pixels for depth images of `depth_size`.
    fn focal_length(&self, info: &SensorInfo, depth_size: Vec2<usize>) -> f64;

    fn stream_request(&self, config: &DriverConfig) -> StreamRequest {
        let info = config.info();
        StreamRequest {
            depth: config.depth_size(),
            color: info.has_rgb().then(|| config.image_size()),
            players: info.has_players(),
            skeleton: info.has_joints().then(|| SkeletonRequest {
                joints: self.joint_names().len(),
                seated: config.seated_mode() && self.kind().supports_seated(),
            }),
        }
    }

    fn skeleton(&self, bodies: &[RawBody], seated: bool) -> SkeletonFrame {
        let names = self.joint_names();
        let seated = seated && self.kind().supports_seated();
        SkeletonFrame {
            bodies: bodies
                .iter()
                .map(|body| Body {
                    player: body.player,
                    joints: body
                        .joints
                        .iter()
                        .zip(names.iter())
                        .enumerate()
                        .filter(|(index, _)| !seated || self.upper_body_joints().contains(index))
                        .filter(|(_, (joint, _))| self.is_tracked(joint.confidence))
                        .map(|(_, (joint, name))| Joint {
                            name: *name,
                            position: joint.position,
                            confidence: joint.confidence,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

pub mod nui;
pub mod openni;
