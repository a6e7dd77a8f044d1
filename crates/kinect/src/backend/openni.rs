use {crate::*, base::Vec2};

const MIN_CONFIDENCE: f32 = 0.5;

pub const JOINT_NAMES: [&str; 15] = [
    "HEAD",
    "NECK",
    "TORSO",
    "LEFT_SHOULDER",
    "LEFT_ELBOW",
    "LEFT_HAND",
    "RIGHT_SHOULDER",
    "RIGHT_ELBOW",
    "RIGHT_HAND",
    "LEFT_HIP",
    "LEFT_KNEE",
    "LEFT_FOOT",
    "RIGHT_HIP",
    "RIGHT_KNEE",
    "RIGHT_FOOT",
];

pub struct OpenNi;

impl Backend for OpenNi {
    fn kind(&self) -> BackendKind {
        BackendKind::OpenNi
    }

    fn joint_names(&self) -> &'static [&'static str] {
        &JOINT_NAMES
    }

    fn upper_body_joints(&self) -> &'static [usize] {
        &[]
    }

    fn is_tracked(&self, confidence: f32) -> bool {
        confidence >= MIN_CONFIDENCE
    }

    fn focal_length(&self, info: &SensorInfo, depth_size: Vec2<usize>) -> f64 {
        (depth_size.x as f64 / 2.0) / (info.horizontal_fov / 2.0).tan()
    }
}
