use {crate::*, base::Vec2};

// nominal depth focal length of the SDK at 320 pixels wide
const NOMINAL_FOCAL_LENGTH: f64 = 285.63;
const NOMINAL_DEPTH_WIDTH: f64 = 320.0;

pub const JOINT_NAMES: [&str; 20] = [
    "HIP_CENTER",
    "SPINE",
    "SHOULDER_CENTER",
    "HEAD",
    "SHOULDER_LEFT",
    "ELBOW_LEFT",
    "WRIST_LEFT",
    "HAND_LEFT",
    "SHOULDER_RIGHT",
    "ELBOW_RIGHT",
    "WRIST_RIGHT",
    "HAND_RIGHT",
    "HIP_LEFT",
    "KNEE_LEFT",
    "ANKLE_LEFT",
    "FOOT_LEFT",
    "HIP_RIGHT",
    "KNEE_RIGHT",
    "ANKLE_RIGHT",
    "FOOT_RIGHT",
];

// SHOULDER_CENTER through HAND_RIGHT
const UPPER_BODY: [usize; 10] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

pub struct Nui;

impl Backend for Nui {
    fn kind(&self) -> BackendKind {
        BackendKind::Nui
    }

    fn joint_names(&self) -> &'static [&'static str] {
        &JOINT_NAMES
    }

    fn upper_body_joints(&self) -> &'static [usize] {
        &UPPER_BODY
    }

    // a joint the SDK does not track reports zero
    fn is_tracked(&self, confidence: f32) -> bool {
        confidence > 0.0
    }

    fn focal_length(&self, _info: &SensorInfo, depth_size: Vec2<usize>) -> f64 {
        NOMINAL_FOCAL_LENGTH * depth_size.x as f64 / NOMINAL_DEPTH_WIDTH
    }
}
