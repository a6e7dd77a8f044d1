use {
    crate::KinectError,
    std::{fmt, str::FromStr},
};

/// Which streams a driver must populate. Depth is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InformationTag {
    Depth,
    DepthPlayers,
    DepthRgb,
    DepthRgbPlayers,
    DepthJoints,
    #[default]
    All,
}

impl InformationTag {
    pub const ALL_TAGS: [InformationTag; 6] = [
        InformationTag::Depth,
        InformationTag::DepthPlayers,
        InformationTag::DepthRgb,
        InformationTag::DepthRgbPlayers,
        InformationTag::DepthJoints,
        InformationTag::All,
    ];

    pub fn has_rgb(self) -> bool {
        matches!(
            self,
            InformationTag::DepthRgb | InformationTag::DepthRgbPlayers | InformationTag::All
        )
    }

    pub fn has_players(self) -> bool {
        matches!(
            self,
            InformationTag::DepthPlayers | InformationTag::DepthRgbPlayers | InformationTag::All
        )
    }

    pub fn has_joints(self) -> bool {
        matches!(self, InformationTag::DepthJoints | InformationTag::All)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InformationTag::Depth => "DEPTH",
            InformationTag::DepthPlayers => "DEPTH_PLAYERS",
            InformationTag::DepthRgb => "DEPTH_RGB",
            InformationTag::DepthRgbPlayers => "DEPTH_RGB_PLAYERS",
            InformationTag::DepthJoints => "DEPTH_JOINTS",
            InformationTag::All => "ALL",
        }
    }
}

impl fmt::Display for InformationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InformationTag {
    type Err = KinectError;

    // accepts DEPTH_RGB as well as KINECT_TAGS_DEPTH_RGB, in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let short = upper.strip_prefix("KINECT_TAGS_").unwrap_or(upper.as_str());
        match short {
            "DEPTH" => Ok(InformationTag::Depth),
            "DEPTH_PLAYERS" => Ok(InformationTag::DepthPlayers),
            "DEPTH_RGB" => Ok(InformationTag::DepthRgb),
            "DEPTH_RGB_PLAYERS" => Ok(InformationTag::DepthRgbPlayers),
            "DEPTH_JOINTS" => Ok(InformationTag::DepthJoints),
            "ALL" | "ALL_INFO" => Ok(InformationTag::All),
            _ => Err(KinectError::Configuration(format!(
                "unknown information tag \"{}\"",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingMode {
    #[default]
    FullBody,
    Seated,
}
