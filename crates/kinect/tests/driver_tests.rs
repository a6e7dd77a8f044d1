use {
    kinect::{
        BackendKind, DepthImage, DriverConfig, DriverState, InformationTag, KinectDriver,
        KinectError, Options, PlayerImage, RgbImage, SensorConfig, SkeletonFrame, SyntheticConfig,
    },
    std::time::{Duration, Instant},
};

fn synthetic() -> SyntheticConfig {
    SyntheticConfig::default().with_frame_interval(Duration::from_millis(5))
}

fn options(info: &str) -> Options {
    Options::new()
        .with("info", info)
        .with("img_width", 320)
        .with("img_height", 240)
}

async fn ready_driver(kind: BackendKind, sensor: SyntheticConfig, options: &Options) -> KinectDriver {
    let mut driver = KinectDriver::new(kind, SensorConfig::Synthetic(sensor));
    driver.initialize(options).await.unwrap();
    driver
}

#[tokio::test]
async fn test_depth_rgb_scenario() {
    let mut driver = ready_driver(BackendKind::Nui, synthetic(), &options("DEPTH_RGB")).await;
    assert_eq!(driver.state(), DriverState::Ready);
    driver.update().await.unwrap();

    let mut depth = DepthImage::default();
    let depth_ts = driver.read_depth(&mut depth).unwrap();
    assert!(depth_ts > 0.0);
    assert_eq!((depth.size.x, depth.size.y), (320, 240));
    assert_eq!(depth.data.len(), 320 * 240);

    let mut rgb = RgbImage::default();
    let rgb_ts = driver.read_rgb(&mut rgb).unwrap();
    assert_eq!((rgb.size.x, rgb.size.y), (320, 240));
    assert_eq!(rgb.data.len(), 320 * 240 * 3);
    // captured together
    assert_eq!(rgb_ts, depth_ts);

    let mut skeleton = SkeletonFrame::default();
    assert!(matches!(
        driver.read_skeleton(&mut skeleton),
        Err(KinectError::Unsupported(_))
    ));
    let mut players = PlayerImage::default();
    assert!(matches!(
        driver.read_players(&mut players),
        Err(KinectError::Unsupported(_))
    ));
}

#[tokio::test]
async fn test_center_point_projection() {
    // 160 / tan(hfov / 2) = 525
    let hfov_deg = 2.0 * (160.0f64 / 525.0).atan().to_degrees();
    let sensor = synthetic().with_horizontal_fov_deg(hfov_deg).with_plane_mm(1000);
    let options = options("DEPTH")
        .with("depth_width", 320)
        .with("depth_height", 240);
    let mut driver = ready_driver(BackendKind::OpenNi, sensor, &options).await;

    let focal_length = driver.get_focal_length().unwrap();
    assert!((focal_length - 525.0).abs() < 1e-9, "focal length {}", focal_length);

    driver.update().await.unwrap();
    let point = driver.get_3d_point(160, 120).unwrap();
    assert_eq!(point.x, 0.0);
    assert_eq!(point.y, 0.0);
    assert_eq!(point.z, 1000.0);
}

#[tokio::test]
async fn test_nui_focal_length_scales_with_depth_width() {
    let driver = ready_driver(BackendKind::Nui, synthetic(), &options("DEPTH")).await;
    assert!((driver.get_focal_length().unwrap() - 285.63).abs() < 1e-9);

    let options = Options::new()
        .with("info", "DEPTH")
        .with("img_width", 640)
        .with("img_height", 480);
    let driver = ready_driver(BackendKind::Nui, synthetic(), &options).await;
    assert!((driver.get_focal_length().unwrap() - 571.26).abs() < 1e-9);
}

#[tokio::test]
async fn test_point_errors_follow_staged_depth() {
    let sensor = synthetic().with_invalid_columns(8);
    let mut driver = ready_driver(BackendKind::Nui, sensor, &options("DEPTH")).await;
    assert!(matches!(
        driver.get_3d_point(100, 100),
        Err(KinectError::NotReady(_))
    ));
    driver.update().await.unwrap();

    assert_eq!(
        driver.get_3d_point(3, 100),
        Err(KinectError::InvalidSample { u: 3, v: 100 })
    );
    assert!(matches!(
        driver.get_3d_point(320, 100),
        Err(KinectError::OutOfBounds { .. })
    ));
    assert!(matches!(
        driver.get_3d_point(-1, 100),
        Err(KinectError::OutOfBounds { .. })
    ));
    assert_eq!(driver.get_3d_point(8, 100).map(|p| p.z), Ok(1000.0));
}

#[tokio::test]
async fn test_initialize_then_close() {
    let mut driver = ready_driver(BackendKind::Nui, synthetic(), &options("ALL")).await;
    driver.close();
    assert_eq!(driver.state(), DriverState::Closed);

    assert_eq!(
        driver.read_depth(&mut DepthImage::default()),
        Err(KinectError::Closed)
    );
    assert_eq!(driver.read_rgb(&mut RgbImage::default()), Err(KinectError::Closed));
    assert_eq!(
        driver.read_players(&mut PlayerImage::default()),
        Err(KinectError::Closed)
    );
    assert_eq!(
        driver.read_skeleton(&mut SkeletonFrame::default()),
        Err(KinectError::Closed)
    );
    assert_eq!(driver.update().await, Err(KinectError::Closed));
    assert_eq!(driver.get_3d_point(0, 0), Err(KinectError::Closed));
    assert_eq!(driver.get_focal_length(), Err(KinectError::Closed));
    assert!(driver.config().is_none());

    // idempotent
    driver.close();
    assert_eq!(driver.state(), DriverState::Closed);
}

#[tokio::test]
async fn test_reinitialize_after_close() {
    let mut driver = ready_driver(BackendKind::Nui, synthetic(), &options("DEPTH")).await;
    driver.close();
    driver.initialize(&options("DEPTH_RGB")).await.unwrap();
    assert_eq!(driver.state(), DriverState::Ready);
    assert_eq!(driver.config().map(|c| c.info()), Some(InformationTag::DepthRgb));
    driver.update().await.unwrap();
    assert!(driver.read_rgb(&mut RgbImage::default()).is_ok());
}

#[tokio::test]
async fn test_initialize_twice_is_unsupported() {
    let mut driver = ready_driver(BackendKind::Nui, synthetic(), &options("DEPTH")).await;
    assert!(matches!(
        driver.initialize(&options("DEPTH")).await,
        Err(KinectError::Unsupported(_))
    ));
    assert_eq!(driver.state(), DriverState::Ready);
}

#[tokio::test]
async fn test_not_ready_before_initialize_and_update() {
    let mut driver = KinectDriver::new(BackendKind::Nui, SensorConfig::Synthetic(synthetic()));
    assert_eq!(driver.state(), DriverState::Uninitialized);
    assert!(matches!(
        driver.read_depth(&mut DepthImage::default()),
        Err(KinectError::NotReady(_))
    ));
    assert!(matches!(driver.get_focal_length(), Err(KinectError::NotReady(_))));
    assert!(matches!(driver.update().await, Err(KinectError::NotReady(_))));

    driver.initialize(&options("ALL")).await.unwrap();
    assert!(matches!(
        driver.read_depth(&mut DepthImage::default()),
        Err(KinectError::NotReady(_))
    ));
    assert!(matches!(
        driver.read_skeleton(&mut SkeletonFrame::default()),
        Err(KinectError::NotReady(_))
    ));
}

#[tokio::test]
async fn test_configuration_error_leaves_driver_uninitialized() {
    let mut driver = KinectDriver::new(BackendKind::OpenNi, SensorConfig::Synthetic(synthetic()));
    // OpenNI needs depth_width/depth_height
    assert!(matches!(
        driver.initialize(&options("DEPTH")).await,
        Err(KinectError::Configuration(_))
    ));
    assert_eq!(driver.state(), DriverState::Uninitialized);
}

#[tokio::test]
async fn test_absent_sensor_is_device_error_and_retriable() {
    let sensor = synthetic().disconnected();
    let mut driver = KinectDriver::new(BackendKind::Nui, SensorConfig::Synthetic(sensor));
    for _ in 0..2 {
        assert!(matches!(
            driver.initialize(&options("DEPTH")).await,
            Err(KinectError::Device(_))
        ));
        assert_eq!(driver.state(), DriverState::Uninitialized);
    }
}

#[tokio::test]
async fn test_missing_stream_is_device_error() {
    let mut driver = KinectDriver::new(
        BackendKind::Nui,
        SensorConfig::Synthetic(synthetic().without_skeleton()),
    );
    assert!(matches!(
        driver.initialize(&options("DEPTH_JOINTS")).await,
        Err(KinectError::Device(_))
    ));
    assert_eq!(driver.state(), DriverState::Uninitialized);
    // a tag without joints still works on the same sensor
    driver.initialize(&options("DEPTH_RGB")).await.unwrap();

    let mut driver = KinectDriver::new(
        BackendKind::Nui,
        SensorConfig::Synthetic(synthetic().without_color()),
    );
    assert!(matches!(
        driver.initialize(&options("DEPTH_RGB")).await,
        Err(KinectError::Device(_))
    ));
}

#[tokio::test]
async fn test_seated_nui_reports_upper_body_only() {
    let options = options("DEPTH_JOINTS").with("seatedMode", true);
    let mut driver = ready_driver(BackendKind::Nui, synthetic(), &options).await;
    driver.update().await.unwrap();

    let mut skeleton = SkeletonFrame::default();
    let ts = driver.read_skeleton(&mut skeleton).unwrap();
    assert!(ts > 0.0);
    assert_eq!(skeleton.bodies.len(), 1);
    let body = &skeleton.bodies[0];
    assert_eq!(body.joints.len(), 10);
    assert!(body.joint("HEAD").is_some());
    assert!(body.joint("HAND_RIGHT").is_some());
    assert!(body.joint("HIP_CENTER").is_none());
    assert!(body.joint("FOOT_LEFT").is_none());
}

#[tokio::test]
async fn test_seated_openni_is_accepted_and_ignored() {
    let options = options("DEPTH_JOINTS")
        .with("depth_width", 320)
        .with("depth_height", 240)
        .with("seatedMode", true);
    let mut driver = ready_driver(BackendKind::OpenNi, synthetic(), &options).await;
    assert_eq!(driver.config().map(|c| c.seated_mode()), Some(false));
    driver.update().await.unwrap();

    let mut skeleton = SkeletonFrame::default();
    driver.read_skeleton(&mut skeleton).unwrap();
    assert_eq!(skeleton.bodies[0].joints.len(), 15);
    assert!(skeleton.bodies[0].joint("RIGHT_FOOT").is_some());
}

#[tokio::test]
async fn test_untracked_joint_is_omitted() {
    let sensor = synthetic().with_untracked_joint(3).with_bodies(2);
    let mut driver = ready_driver(BackendKind::Nui, sensor, &options("DEPTH_JOINTS")).await;
    driver.update().await.unwrap();

    let mut skeleton = SkeletonFrame::default();
    driver.read_skeleton(&mut skeleton).unwrap();
    assert_eq!(skeleton.bodies.len(), 2);
    for body in &skeleton.bodies {
        assert_eq!(body.joints.len(), 19);
        assert!(body.joint("HEAD").is_none());
    }
    let json = skeleton.to_json().unwrap();
    assert!(json.starts_with(r#"[{"player":1,"joints":[{"name":"HIP_CENTER""#));
}

#[tokio::test]
async fn test_players_share_depth_timestamp() {
    let mut driver = ready_driver(BackendKind::Nui, synthetic(), &options("DEPTH_PLAYERS")).await;
    driver.update().await.unwrap();

    let mut depth = DepthImage::default();
    let mut players = PlayerImage::default();
    let depth_ts = driver.read_depth(&mut depth).unwrap();
    let players_ts = driver.read_players(&mut players).unwrap();
    assert_eq!(depth_ts, players_ts);
    assert_eq!(players.size, depth.size);
    assert_eq!(players.get(160, 120), Some(1));
    assert_eq!(players.get(0, 0), Some(0));
    assert!(matches!(
        driver.read_rgb(&mut RgbImage::default()),
        Err(KinectError::Unsupported(_))
    ));
}

#[tokio::test]
async fn test_each_update_stages_a_newer_frame() {
    let mut driver = ready_driver(BackendKind::Nui, synthetic(), &options("DEPTH")).await;
    let mut depth = DepthImage::default();

    driver.update().await.unwrap();
    let first = driver.read_depth(&mut depth).unwrap();
    // reading again returns the same staged frame
    assert_eq!(driver.read_depth(&mut depth).unwrap(), first);

    tokio::time::sleep(Duration::from_millis(20)).await;
    driver.update().await.unwrap();
    let second = driver.read_depth(&mut depth).unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn test_update_after_pause_stages_a_fresh_frame() {
    let mut driver = ready_driver(BackendKind::Nui, synthetic(), &options("ALL")).await;
    driver.update().await.unwrap();

    // the sensor keeps capturing while nobody calls update
    tokio::time::sleep(Duration::from_millis(500)).await;
    driver.update().await.unwrap();

    let mut depth = DepthImage::default();
    let timestamp = driver.read_depth(&mut depth).unwrap();
    let age = base::now_seconds() - timestamp;
    assert!(age < 0.1, "staged depth is {:.3}s old", age);

    let mut rgb = RgbImage::default();
    assert_eq!(driver.read_rgb(&mut rgb).unwrap(), timestamp);
    let mut skeleton = SkeletonFrame::default();
    assert_eq!(driver.read_skeleton(&mut skeleton).unwrap(), timestamp);
}

#[tokio::test]
async fn test_intrinsics_match_depth_stream() {
    let options = options("DEPTH")
        .with("depth_width", 640)
        .with("depth_height", 480);
    let driver = ready_driver(BackendKind::OpenNi, synthetic(), &options).await;

    let intrinsics = driver.intrinsics().unwrap();
    assert_eq!((intrinsics.size.x, intrinsics.size.y), (640, 480));
    assert_eq!(intrinsics.principal_point(), (320.0, 240.0));
    assert_eq!(Ok(intrinsics.focal_length), driver.get_focal_length());

    let mut driver = driver;
    driver.close();
    assert_eq!(driver.intrinsics(), Err(KinectError::Closed));
}

#[tokio::test]
async fn test_native_size_is_resampled() {
    let sensor = synthetic().with_native_size(640, 480).with_invalid_columns(8);
    let mut driver = ready_driver(BackendKind::Nui, sensor, &options("DEPTH_RGB")).await;
    driver.update().await.unwrap();

    let mut depth = DepthImage::default();
    driver.read_depth(&mut depth).unwrap();
    assert_eq!((depth.size.x, depth.size.y), (320, 240));
    assert_eq!(depth.data.len(), 320 * 240);
    // the 8 column invalid band shrinks to 4
    assert_eq!(depth.get(3, 10), Some(0));
    assert_eq!(depth.get(4, 10), Some(1000));

    let mut rgb = RgbImage::default();
    driver.read_rgb(&mut rgb).unwrap();
    assert_eq!(rgb.data.len(), 320 * 240 * 3);

    // focal length follows the configured size, not the native one
    assert!((driver.get_focal_length().unwrap() - 285.63).abs() < 1e-9);

    let luma = depth.to_luma16().unwrap();
    assert_eq!(luma.dimensions(), (320, 240));
    let color = rgb.to_rgb8().unwrap();
    assert_eq!(color.dimensions(), (320, 240));
}

#[tokio::test]
async fn test_disconnect_degrades_driver() {
    let sensor = synthetic().with_disconnect_after(0);
    let mut driver = ready_driver(BackendKind::Nui, sensor, &options("DEPTH")).await;
    assert!(!driver.is_degraded());

    assert!(matches!(driver.update().await, Err(KinectError::Device(_))));
    assert!(driver.is_degraded());
    assert_eq!(driver.state(), DriverState::Ready);
    assert!(matches!(
        driver.read_depth(&mut DepthImage::default()),
        Err(KinectError::Device(_))
    ));
    assert!(matches!(driver.get_3d_point(0, 0), Err(KinectError::Device(_))));
    assert!(matches!(driver.update().await, Err(KinectError::Device(_))));

    // close and initialize recovers
    driver.close();
    assert!(!driver.is_degraded());
}

#[tokio::test]
async fn test_disconnect_after_frames_eventually_degrades() {
    let sensor = synthetic().with_disconnect_after(3);
    let mut driver = ready_driver(BackendKind::Nui, sensor, &options("DEPTH")).await;

    let mut failed = false;
    for _ in 0..10 {
        match driver.update().await {
            Ok(()) => {}
            Err(KinectError::Device(_)) => {
                failed = true;
                break;
            }
            Err(other) => panic!("unexpected error {:?}", other),
        }
    }
    assert!(failed);
    assert!(driver.is_degraded());
}

#[tokio::test]
async fn test_stall_times_out() {
    let sensor = synthetic().with_stall_after(0);
    let options = options("DEPTH").with("update_timeout_ms", 200);
    let mut driver = ready_driver(BackendKind::Nui, sensor, &options).await;

    let start = Instant::now();
    assert!(matches!(driver.update().await, Err(KinectError::Device(_))));
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_secs(2));
    assert!(driver.is_degraded());
}

#[tokio::test]
async fn test_initialize_with_config() {
    let config = DriverConfig::new(160, 120).with_info(InformationTag::DepthRgbPlayers);
    let mut driver = KinectDriver::new(BackendKind::Nui, SensorConfig::Synthetic(synthetic()));
    driver.initialize_with(config).await.unwrap();
    assert_eq!(driver.backend(), BackendKind::Nui);
    driver.update().await.unwrap();

    let mut players = PlayerImage::default();
    driver.read_players(&mut players).unwrap();
    assert_eq!((players.size.x, players.size.y), (160, 120));
}

#[tokio::test]
async fn test_drop_closes_sensor() {
    let driver = ready_driver(BackendKind::Nui, synthetic(), &options("ALL")).await;
    drop(driver);
}

#[test]
fn test_driver_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<KinectDriver>();
}
