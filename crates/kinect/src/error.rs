use {base::Vec2, std::fmt};

#[derive(Debug, Clone, PartialEq)]
pub enum KinectError {
    Configuration(String),
    Device(String),
    Unsupported(String),
    NotReady(String),
    Closed,
    InvalidSample { u: i32, v: i32 },
    OutOfBounds { u: i32, v: i32, size: Vec2<usize> },
}

impl fmt::Display for KinectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinectError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            KinectError::Device(msg) => write!(f, "device error: {msg}"),
            KinectError::Unsupported(msg) => write!(f, "unsupported operation: {msg}"),
            KinectError::NotReady(msg) => write!(f, "not ready: {msg}"),
            KinectError::Closed => write!(f, "driver is closed"),
            KinectError::InvalidSample { u, v } => {
                write!(f, "no valid depth sample at ({u}, {v})")
            }
            KinectError::OutOfBounds { u, v, size } => {
                write!(f, "pixel ({u}, {v}) outside {size} depth image")
            }
        }
    }
}

impl std::error::Error for KinectError {}

impl From<std::io::Error> for KinectError {
    fn from(err: std::io::Error) -> Self {
        KinectError::Device(err.to_string())
    }
}

impl From<serde_json::Error> for KinectError {
    fn from(err: serde_json::Error) -> Self {
        KinectError::Configuration(err.to_string())
    }
}
