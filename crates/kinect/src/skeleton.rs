use {
    crate::KinectError,
    base::Vec3,
    serde::Serialize,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: &'static str,
    /// Millimeters in the sensor frame.
    pub position: Vec3<f64>,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub player: u8,
    pub joints: Vec<Joint>,
}

impl Body {
    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.joints.iter().find(|joint| joint.name == name)
    }
}

/// All bodies tracked in one sample, in sensor order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonFrame {
    pub bodies: Vec<Body>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointRecord {
    pub name: String,
    pub position: [f64; 3],
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyRecord {
    pub player: u8,
    pub joints: Vec<JointRecord>,
}

impl SkeletonFrame {
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn joint_count(&self) -> usize {
        self.bodies.iter().map(|body| body.joints.len()).sum()
    }

    /// Flatten into the record published to skeleton consumers.
    pub fn to_record(&self) -> Vec<BodyRecord> {
        self.bodies
            .iter()
            .map(|body| BodyRecord {
                player: body.player,
                joints: body
                    .joints
                    .iter()
                    .map(|joint| JointRecord {
                        name: joint.name.to_string(),
                        position: joint.position.to_array(),
                        confidence: joint.confidence,
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, KinectError> {
        Ok(serde_json::to_string(&self.to_record())?)
    }
}
