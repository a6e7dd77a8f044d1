use {
    super::Sensor,
    crate::*,
    base::Vec2,
    std::{io::ErrorKind, path::PathBuf, time::Duration},
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

// horizontal field of view of the Kinect depth camera
const KINECT_DEPTH_HFOV_DEG: f64 = 58.5;

const BUFFER_COUNT: u32 = 4;

/// Kinect through the kernel driver, which exposes depth and color as two
/// separate video nodes. No player segmentation, no skeleton.
#[derive(Debug, Clone)]
pub struct V4l2Config {
    pub depth_path: PathBuf,
    pub color_path: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq)]
enum DepthFormat {
    Y16,
    Y10b,
}

pub(crate) struct V4l2Sensor {
    config: V4l2Config,
    depth_stream: Option<MmapStream<'static>>,
    color_stream: Option<MmapStream<'static>>,
    depth_size: Vec2<usize>,
    depth_format: DepthFormat,
    color_size: Vec2<usize>,
}

impl V4l2Sensor {
    pub fn new(config: V4l2Config) -> Self {
        Self {
            config,
            depth_stream: None,
            color_stream: None,
            depth_size: Vec2::zero(),
            depth_format: DepthFormat::Y16,
            color_size: Vec2::zero(),
        }
    }

    fn open_depth(&mut self, size: Vec2<usize>) -> Result<(), KinectError> {
        let device = Device::with_path(&self.config.depth_path)?;

        // 11-bit disparity in 16-bit words, fall back to packed 10-bit
        let actual = match Capture::set_format(
            &device,
            &Format::new(size.x as u32, size.y as u32, FourCC::new(b"Y16 ")),
        ) {
            Ok(format) if format.fourcc == FourCC::new(b"Y16 ") => format,
            _ => Capture::set_format(
                &device,
                &Format::new(size.x as u32, size.y as u32, FourCC::new(b"Y10B")),
            )?,
        };
        self.depth_format = match &actual.fourcc.repr {
            b"Y16 " => DepthFormat::Y16,
            b"Y10B" => DepthFormat::Y10b,
            _ => {
                return Err(KinectError::Device(format!(
                    "unsupported depth format: {}",
                    actual.fourcc
                )));
            }
        };
        self.depth_size = Vec2::new(actual.width as usize, actual.height as usize);
        self.depth_stream = Some(
            MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)
                .map_err(|error| KinectError::Device(error.to_string()))?,
        );
        Ok(())
    }

    fn open_color(&mut self, path: PathBuf, size: Vec2<usize>) -> Result<(), KinectError> {
        let device = Device::with_path(&path)?;
        let actual = Capture::set_format(
            &device,
            &Format::new(size.x as u32, size.y as u32, FourCC::new(b"GRBG")),
        )?;
        if actual.fourcc != FourCC::new(b"GRBG") {
            return Err(KinectError::Device(format!(
                "unsupported color format: {}",
                actual.fourcc
            )));
        }
        self.color_size = Vec2::new(actual.width as usize, actual.height as usize);
        self.color_stream = Some(
            MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)
                .map_err(|error| KinectError::Device(error.to_string()))?,
        );
        Ok(())
    }

    // Ok(None) on timeout
    fn next_frame(
        stream: &mut MmapStream<'static>,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>, KinectError> {
        stream.set_timeout(timeout);
        match CaptureStream::next(stream) {
            Ok((data, _metadata)) => Ok(Some(data.to_vec())),
            Err(error) if error.kind() == ErrorKind::TimedOut => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

impl Sensor for V4l2Sensor {
    fn open(&mut self, request: &StreamRequest) -> Result<SensorInfo, KinectError> {
        self.close();

        self.open_depth(request.depth)?;
        if let Some(color) = request.color {
            if let Some(path) = self.config.color_path.clone() {
                self.open_color(path, color)?;
            }
        }

        Ok(SensorInfo {
            depth_size: self.depth_size,
            color_size: self.color_stream.as_ref().map(|_| self.color_size),
            players: false,
            skeleton: false,
            horizontal_fov: KINECT_DEPTH_HFOV_DEG.to_radians(),
        })
    }

    fn close(&mut self) {
        self.depth_stream.take();
        self.color_stream.take();
    }

    fn blocking_capture(&mut self, timeout: Duration) -> Result<Option<RawSample>, KinectError> {
        let Some(depth_stream) = self.depth_stream.as_mut() else {
            return Err(KinectError::Device("depth stream is not open".to_string()));
        };
        let Some(raw) = Self::next_frame(depth_stream, timeout)? else {
            return Ok(None);
        };
        let timestamp = base::now_seconds();

        let pixel_count = self.depth_size.area();
        let disparity = match self.depth_format {
            DepthFormat::Y16 => convert::unpack_y16(&raw, pixel_count),
            // packed mode drops the lowest disparity bit
            DepthFormat::Y10b => convert::unpack_y10b(&raw, pixel_count)
                .into_iter()
                .map(|d| d << 1)
                .collect(),
        };
        let mut depth = convert::disparity_frame_to_mm(&disparity);
        depth.resize(pixel_count, 0);

        let color = match self.color_stream.as_mut() {
            Some(color_stream) => Self::next_frame(color_stream, timeout)?
                .map(|raw| convert::grbg_to_rgb(&raw, self.color_size.x, self.color_size.y)),
            None => None,
        };

        Ok(Some(RawSample {
            timestamp,
            depth,
            color,
            players: None,
            bodies: Vec::new(),
        }))
    }
}
