use {
    crate::{frame::resample, worker::StreamWorker, *},
    base::Vec3,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Ready,
    Closed,
}

// newest sample, converted to the configured sizes
#[derive(Default)]
struct Staged {
    depth: Option<(f64, DepthImage)>,
    rgb: Option<(f64, RgbImage)>,
    players: Option<(f64, PlayerImage)>,
    skeleton: Option<(f64, SkeletonFrame)>,
}

struct Session {
    config: DriverConfig,
    info: SensorInfo,
    intrinsics: Intrinsics,
    worker: StreamWorker,
    staged: Staged,
    fault: Option<String>,
}

/// One depth sensor behind one backend.
///
/// `initialize` once, then `update` followed by any of the `read_*` calls as
/// often as needed, then `close`. All reads after an `update` see the same
/// sample.
pub struct KinectDriver {
    backend: Box<dyn Backend>,
    sensor: SensorConfig,
    state: DriverState,
    session: Option<Session>,
}

impl KinectDriver {
    pub fn new(kind: BackendKind, sensor: SensorConfig) -> Self {
        Self {
            backend: kind.create(),
            sensor,
            state: DriverState::Uninitialized,
            session: None,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn backend(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn config(&self) -> Option<&DriverConfig> {
        self.session.as_ref().map(|session| &session.config)
    }

    /// A sensor fault or timeout happened since `initialize`.
    pub fn is_degraded(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.fault.is_some())
    }

    pub async fn initialize(&mut self, options: &Options) -> Result<(), KinectError> {
        if self.state == DriverState::Ready {
            return Err(already_initialized());
        }
        let config = DriverConfig::from_options(self.backend.kind(), options)?;
        self.initialize_with(config).await
    }

    pub async fn initialize_with(&mut self, config: DriverConfig) -> Result<(), KinectError> {
        if self.state == DriverState::Ready {
            return Err(already_initialized());
        }
        let kind = self.backend.kind();
        let config = config.validate(kind)?;
        let request = self.backend.stream_request(&config);

        let (worker, info) = StreamWorker::spawn(&self.sensor, request.clone()).await?;

        // worker is dropped, and the sensor closed, on any early return below
        if request.color.is_some() && info.color_size.is_none() {
            return Err(KinectError::Device(
                "sensor has no color stream".to_string(),
            ));
        }
        if request.players && !info.players {
            return Err(KinectError::Device(
                "sensor has no player segmentation".to_string(),
            ));
        }
        if request.skeleton.is_some() && !info.skeleton {
            return Err(KinectError::Device(
                "sensor has no skeleton tracking".to_string(),
            ));
        }

        let depth_size = config.depth_size();
        let intrinsics = Intrinsics {
            focal_length: self.backend.focal_length(&info, depth_size),
            size: depth_size,
        };
        if info.depth_size != depth_size {
            log::info!(
                "{}: sensor delivers {} depth, resampling to {}",
                kind,
                info.depth_size,
                depth_size
            );
        }
        log::info!(
            "{}: initialized, info {}, depth {}, image {}, {:?}, focal length {:.2}",
            kind,
            config.info(),
            depth_size,
            config.image_size(),
            config.tracking_mode(),
            intrinsics.focal_length
        );

        self.session = Some(Session {
            config,
            info,
            intrinsics,
            worker,
            staged: Staged::default(),
            fault: None,
        });
        self.state = DriverState::Ready;
        Ok(())
    }

    /// Wait for the next sensor sample and stage it for the `read_*` calls.
    pub async fn update(&mut self) -> Result<(), KinectError> {
        let session = ready_session_mut(self.state, &mut self.session)?;
        let timeout = session.config.update_timeout();

        let sample = match session.worker.recv_latest(timeout).await {
            Ok(sample) => sample,
            Err(error) => {
                let message = match error {
                    KinectError::Device(message) => message,
                    other => other.to_string(),
                };
                log::warn!("update failed, driver degraded: {}", message);
                session.fault = Some(message.clone());
                return Err(KinectError::Device(message));
            }
        };

        let backend = &self.backend;
        let info = &session.info;
        let config = &session.config;
        let tag = config.info();
        let depth_size = config.depth_size();
        let image_size = config.image_size();
        let slots = &mut session.staged;

        slots.depth = Some((
            sample.timestamp,
            DepthImage {
                size: depth_size,
                data: resample(sample.depth, info.depth_size, depth_size, 1),
            },
        ));
        if tag.has_rgb() {
            if let (Some(color), Some(color_size)) = (sample.color, info.color_size) {
                slots.rgb = Some((
                    sample.timestamp,
                    RgbImage {
                        size: image_size,
                        data: resample(color, color_size, image_size, 3),
                    },
                ));
            }
        }
        if tag.has_players() {
            if let Some(players) = sample.players {
                slots.players = Some((
                    sample.timestamp,
                    PlayerImage {
                        size: depth_size,
                        data: resample(players, info.depth_size, depth_size, 1),
                    },
                ));
            }
        }
        if tag.has_joints() {
            slots.skeleton = Some((
                sample.timestamp,
                backend.skeleton(&sample.bodies, config.seated_mode()),
            ));
        }
        Ok(())
    }

    pub fn read_depth(&self, image: &mut DepthImage) -> Result<f64, KinectError> {
        let session = self.readable_session()?;
        check_fault(session)?;
        let (timestamp, staged_frame) = staged(&session.staged.depth, "depth")?;
        image.size = staged_frame.size;
        image.data.clone_from(&staged_frame.data);
        Ok(*timestamp)
    }

    pub fn read_rgb(&self, image: &mut RgbImage) -> Result<f64, KinectError> {
        let session = self.readable_session()?;
        if !session.config.info().has_rgb() {
            return Err(not_enabled("rgb", session.config.info()));
        }
        check_fault(session)?;
        let (timestamp, staged_frame) = staged(&session.staged.rgb, "rgb")?;
        image.size = staged_frame.size;
        image.data.clone_from(&staged_frame.data);
        Ok(*timestamp)
    }

    pub fn read_players(&self, image: &mut PlayerImage) -> Result<f64, KinectError> {
        let session = self.readable_session()?;
        if !session.config.info().has_players() {
            return Err(not_enabled("players", session.config.info()));
        }
        check_fault(session)?;
        let (timestamp, staged_frame) = staged(&session.staged.players, "players")?;
        image.size = staged_frame.size;
        image.data.clone_from(&staged_frame.data);
        Ok(*timestamp)
    }

    pub fn read_skeleton(&self, frame: &mut SkeletonFrame) -> Result<f64, KinectError> {
        let session = self.readable_session()?;
        if !session.config.info().has_joints() {
            return Err(not_enabled("skeleton", session.config.info()));
        }
        check_fault(session)?;
        let (timestamp, staged_frame) = staged(&session.staged.skeleton, "skeleton")?;
        frame.bodies.clone_from(&staged_frame.bodies);
        Ok(*timestamp)
    }

    /// 3D point in millimeters behind depth pixel `(u, v)` of the staged frame.
    pub fn get_3d_point(&self, u: i32, v: i32) -> Result<Vec3<f64>, KinectError> {
        let session = self.readable_session()?;
        check_fault(session)?;
        let (_, depth) = staged(&session.staged.depth, "depth")?;
        projection::back_project(u, v, depth, session.intrinsics.focal_length)
    }

    pub fn get_focal_length(&self) -> Result<f64, KinectError> {
        Ok(self.readable_session()?.intrinsics.focal_length)
    }

    pub fn intrinsics(&self) -> Result<Intrinsics, KinectError> {
        Ok(self.readable_session()?.intrinsics)
    }

    /// Stop the sensor and drop all staged frames. Calling it again does nothing.
    pub fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.worker.stop();
            log::info!("{}: closed", self.backend.kind());
        }
        self.state = DriverState::Closed;
    }

    // Ready session, faults not checked yet
    fn readable_session(&self) -> Result<&Session, KinectError> {
        match (self.state, self.session.as_ref()) {
            (DriverState::Closed, _) => Err(KinectError::Closed),
            (DriverState::Ready, Some(session)) => Ok(session),
            _ => Err(KinectError::NotReady("driver is not initialized".to_string())),
        }
    }
}

impl Drop for KinectDriver {
    fn drop(&mut self) {
        self.close();
    }
}

// free function so update can borrow the backend alongside the session
fn ready_session_mut(
    state: DriverState,
    session: &mut Option<Session>,
) -> Result<&mut Session, KinectError> {
    match (state, session.as_mut()) {
        (DriverState::Closed, _) => Err(KinectError::Closed),
        (DriverState::Ready, Some(session)) => {
            check_fault(session)?;
            Ok(session)
        }
        _ => Err(KinectError::NotReady("driver is not initialized".to_string())),
    }
}

fn check_fault(session: &Session) -> Result<(), KinectError> {
    match &session.fault {
        Some(message) => Err(KinectError::Device(format!(
            "{} (close and initialize again)",
            message
        ))),
        None => Ok(()),
    }
}

fn staged<'a, T>(slot: &'a Option<(f64, T)>, what: &str) -> Result<(&'a f64, &'a T), KinectError> {
    match slot {
        Some((timestamp, frame)) => Ok((timestamp, frame)),
        None => Err(KinectError::NotReady(format!(
            "no {} frame staged, call update first",
            what
        ))),
    }
}

fn not_enabled(stream: &str, info: InformationTag) -> KinectError {
    KinectError::Unsupported(format!("{} stream not enabled by {}", stream, info))
}

fn already_initialized() -> KinectError {
    KinectError::Unsupported("driver is already initialized, close it first".to_string())
}
