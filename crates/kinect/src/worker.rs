use {
    crate::*,
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        thread::JoinHandle,
        time::Duration,
    },
    tokio::sync::{oneshot, watch},
};

// upper bound of a single blocking capture, so cancelation is noticed quickly
const CAPTURE_POLL_MS: u64 = 100;

pub(crate) type SampleResult = Result<RawSample, KinectError>;

/// Background thread owning the sensor.
///
/// The sensor is opened, read and closed on this thread only. Only the newest
/// capture is kept; each one replaces the previous. A capture fault replaces
/// the newest sample and ends the thread.
pub(crate) struct StreamWorker {
    receiver: watch::Receiver<Option<SampleResult>>,
    cancel: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
}

impl StreamWorker {
    pub async fn spawn(
        config: &SensorConfig,
        request: StreamRequest,
    ) -> Result<(Self, SensorInfo), KinectError> {
        let mut sensor = sensor::create_sensor(config);
        let (sender, receiver) = watch::channel::<Option<SampleResult>>(None);
        let cancel = Arc::new(AtomicBool::new(false));

        // open() must run on the same OS thread as blocking_capture(), vendor SDKs
        // have thread affinity
        let (init_tx, init_rx) = oneshot::channel::<Result<SensorInfo, KinectError>>();

        let join_handle = std::thread::Builder::new()
            .name("kinect-sensor".to_string())
            .spawn({
                let cancel = Arc::clone(&cancel);
                move || {
                    match sensor.open(&request) {
                        Ok(info) => {
                            if init_tx.send(Ok(info)).is_err() {
                                sensor.close();
                                return;
                            }
                        }
                        Err(error) => {
                            let _ = init_tx.send(Err(error));
                            return;
                        }
                    }

                    log::debug!("sensor worker: starting capture loop");
                    let poll = Duration::from_millis(CAPTURE_POLL_MS);
                    while !cancel.load(Ordering::Relaxed) {
                        match sensor.blocking_capture(poll) {
                            Ok(Some(sample)) => {
                                if sender.send(Some(Ok(sample))).is_err() {
                                    break; // driver dropped the receiver
                                }
                            }
                            Ok(None) => {}
                            Err(error) => {
                                log::error!("sensor worker: capture failed: {}", error);
                                sender.send_replace(Some(Err(error)));
                                break;
                            }
                        }
                    }
                    sensor.close();
                    log::debug!("sensor worker: stopped");
                }
            })?;

        let info = match init_rx.await {
            Ok(result) => result,
            Err(_) => Err(KinectError::Device(
                "sensor thread died during open".to_string(),
            )),
        };
        let info = match info {
            Ok(info) => info,
            Err(error) => {
                let _ = join_handle.join();
                return Err(error);
            }
        };

        Ok((
            Self {
                receiver,
                cancel,
                join_handle: Some(join_handle),
            },
            info,
        ))
    }

    /// Wait up to `timeout` for a sample captured after the previous call.
    ///
    /// Returns the newest one; older captures were already overwritten.
    pub async fn recv_latest(&mut self, timeout: Duration) -> Result<RawSample, KinectError> {
        match tokio::time::timeout(timeout, self.receiver.changed()).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => {
                return Err(KinectError::Device("sensor stream ended".to_string()));
            }
            Err(_) => {
                return Err(KinectError::Device(format!(
                    "no frame within {} ms",
                    timeout.as_millis()
                )));
            }
        }
        match self.receiver.borrow_and_update().clone() {
            Some(result) => result,
            None => Err(KinectError::Device("sensor stream ended".to_string())),
        }
    }

    /// Stop the thread and wait until the sensor is closed.
    pub fn stop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                log::error!("sensor worker panicked");
            }
        }
    }
}

impl Drop for StreamWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
