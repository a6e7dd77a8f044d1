use {
    crate::*,
    base::Vec2,
    std::time::Duration,
};

// bounded wait of update when update_timeout_ms is not given
const DEFAULT_UPDATE_TIMEOUT_MS: u64 = 2000;

/// Largest accepted image or depth width or height.
pub const MAX_DIMENSION: usize = 8192;

pub const KEY_INFO: &str = "info";
pub const KEY_SEATED_MODE: &str = "seatedMode";
pub const KEY_IMG_WIDTH: &str = "img_width";
pub const KEY_IMG_HEIGHT: &str = "img_height";
pub const KEY_DEPTH_WIDTH: &str = "depth_width";
pub const KEY_DEPTH_HEIGHT: &str = "depth_height";
pub const KEY_UPDATE_TIMEOUT_MS: &str = "update_timeout_ms";

/// Validated driver configuration.
///
/// Build it with `from_options`, or with `new` and the `with_*` setters
/// followed by `validate`. `KinectDriver::initialize_with` validates again, so
/// an unvalidated config never reaches a sensor.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverConfig {
    info: InformationTag,
    seated_mode: bool,
    image_size: Vec2<usize>,
    depth_size: Option<Vec2<usize>>,
    update_timeout: Duration,
}

impl DriverConfig {
    pub fn new(image_width: usize, image_height: usize) -> Self {
        Self {
            info: InformationTag::default(),
            seated_mode: false,
            image_size: Vec2::new(image_width, image_height),
            depth_size: None,
            update_timeout: Duration::from_millis(DEFAULT_UPDATE_TIMEOUT_MS),
        }
    }

    /// Set which streams to capture.
    pub fn with_info(mut self, info: InformationTag) -> Self {
        self.info = info;
        self
    }

    /// Request upper-body tracking.
    pub fn with_seated_mode(mut self, seated_mode: bool) -> Self {
        self.seated_mode = seated_mode;
        self
    }

    /// Set the depth stream size. Only the OpenNI backend reads it.
    pub fn with_depth_size(mut self, depth_width: usize, depth_height: usize) -> Self {
        self.depth_size = Some(Vec2::new(depth_width, depth_height));
        self
    }

    /// Set the bounded wait of `KinectDriver::update`.
    pub fn with_update_timeout(mut self, update_timeout: Duration) -> Self {
        self.update_timeout = update_timeout;
        self
    }

    /// Check the config against what `kind` accepts and resolve backend-specific fields.
    pub fn validate(mut self, kind: BackendKind) -> Result<Self, KinectError> {
        check_size("image", self.image_size)?;

        if kind.uses_depth_options() {
            let Some(depth_size) = self.depth_size else {
                return Err(KinectError::Configuration(format!(
                    "{} requires {} and {}",
                    kind, KEY_DEPTH_WIDTH, KEY_DEPTH_HEIGHT
                )));
            };
            check_size("depth", depth_size)?;
        } else {
            if let Some(depth_size) = self.depth_size {
                if depth_size != self.image_size {
                    log::debug!(
                        "{}: ignoring depth size {}, depth follows image size {}",
                        kind,
                        depth_size,
                        self.image_size
                    );
                }
            }
            self.depth_size = Some(self.image_size);
        }

        if self.seated_mode && !kind.supports_seated() {
            log::info!("{}: seated mode not supported, tracking full body", kind);
            self.seated_mode = false;
        }

        if self.update_timeout.is_zero() {
            return Err(KinectError::Configuration(
                "update timeout must be positive".to_string(),
            ));
        }

        Ok(self)
    }

    /// Build a validated config from an options bag. Unknown keys are ignored.
    ///
    /// `img_width` and `img_height` are always required. OpenNI also requires
    /// `depth_width` and `depth_height`, so a bag that works for NUI fails with
    /// `Configuration` on OpenNI until the depth size is added. NUI ignores
    /// them and uses the image size for depth.
    pub fn from_options(kind: BackendKind, options: &Options) -> Result<Self, KinectError> {
        let info = match options.get(KEY_INFO) {
            None => InformationTag::default(),
            Some(value) => match value.as_text() {
                Some(text) => text.parse()?,
                None => {
                    return Err(KinectError::Configuration(format!(
                        "{} must be a tag name, got {}",
                        KEY_INFO, value
                    )));
                }
            },
        };

        let seated_mode = match options.get(KEY_SEATED_MODE) {
            None => false,
            Some(value) => value.as_bool().ok_or_else(|| {
                KinectError::Configuration(format!(
                    "{} must be a boolean, got {}",
                    KEY_SEATED_MODE, value
                ))
            })?,
        };

        let image_width = required_dimension(options, KEY_IMG_WIDTH)?;
        let image_height = required_dimension(options, KEY_IMG_HEIGHT)?;

        let mut config = DriverConfig::new(image_width, image_height)
            .with_info(info)
            .with_seated_mode(seated_mode);

        if kind.uses_depth_options() {
            let depth_width = required_dimension(options, KEY_DEPTH_WIDTH)?;
            let depth_height = required_dimension(options, KEY_DEPTH_HEIGHT)?;
            config = config.with_depth_size(depth_width, depth_height);
        }

        if options.contains(KEY_UPDATE_TIMEOUT_MS) {
            let ms = required_dimension(options, KEY_UPDATE_TIMEOUT_MS)?;
            config = config.with_update_timeout(Duration::from_millis(ms as u64));
        }

        config.validate(kind)
    }

    // Getters
    pub fn info(&self) -> InformationTag {
        self.info
    }

    pub fn seated_mode(&self) -> bool {
        self.seated_mode
    }

    pub fn tracking_mode(&self) -> TrackingMode {
        if self.seated_mode {
            TrackingMode::Seated
        } else {
            TrackingMode::FullBody
        }
    }

    pub fn image_size(&self) -> Vec2<usize> {
        self.image_size
    }

    pub fn image_width(&self) -> usize {
        self.image_size.x
    }

    pub fn image_height(&self) -> usize {
        self.image_size.y
    }

    pub fn depth_size(&self) -> Vec2<usize> {
        self.depth_size.unwrap_or(self.image_size)
    }

    pub fn depth_width(&self) -> usize {
        self.depth_size().x
    }

    pub fn depth_height(&self) -> usize {
        self.depth_size().y
    }

    pub fn update_timeout(&self) -> Duration {
        self.update_timeout
    }
}

fn check_size(what: &str, size: Vec2<usize>) -> Result<(), KinectError> {
    if size.x == 0 || size.y == 0 {
        return Err(KinectError::Configuration(format!(
            "{} size must be positive, got {}",
            what, size
        )));
    }
    if size.x > MAX_DIMENSION || size.y > MAX_DIMENSION || size.checked_area().is_none() {
        return Err(KinectError::Configuration(format!(
            "{} size {} exceeds {}x{}",
            what, size, MAX_DIMENSION, MAX_DIMENSION
        )));
    }
    Ok(())
}

fn required_dimension(options: &Options, key: &str) -> Result<usize, KinectError> {
    let value = options
        .get(key)
        .ok_or_else(|| KinectError::Configuration(format!("missing {}", key)))?;
    match value.as_int().and_then(|n| usize::try_from(n).ok()) {
        Some(n) if n > 0 => Ok(n),
        _ => Err(KinectError::Configuration(format!(
            "{} must be a positive integer, got {}",
            key, value
        ))),
    }
}
