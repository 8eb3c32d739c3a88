use std::{
    iter::Sum,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use cpal::{
    Sample,
    traits::{DeviceTrait, StreamTrait},
};
use crossbeam_channel::{Receiver, Sender};
use num_traits::{FromPrimitive, Num};

use crate::recorder::{AcquireError, CaptureStream, TrackConstraints};

use super::{constants::CLOCK_DELAY, macros::build_stream_expansion};

/// Where the capture callback forwards converted samples, if anywhere.
pub(crate) type Tap = Arc<Mutex<Option<Sender<Vec<i16>>>>>;

/// Samples the capture callback can convert.
pub trait CaptureSample: cpal::SizedSample + dasp_sample::ToSample<f32> + Send + 'static {}

impl CaptureSample for i8 {}
impl CaptureSample for i16 {}
impl CaptureSample for i32 {}
impl CaptureSample for i64 {}
impl CaptureSample for u8 {}
impl CaptureSample for u16 {}
impl CaptureSample for u32 {}
impl CaptureSample for u64 {}
impl CaptureSample for f32 {}
impl CaptureSample for f64 {}

/// Layout of the samples a capture delivers after conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Clone)]
struct SamplePipe {
    tap: Tap,
    signal: Arc<Mutex<bool>>,
    /// Device channel count to average down to mono, if requested.
    downmix_from: Option<u16>,
}

/// A live microphone stream.
///
/// The cpal stream lives on its own thread for as long as the capture is
/// active; dropping the capture ends it.
#[derive(Debug)]
pub struct CpalCapture {
    /// True while the stream is running.
    signal: Arc<Mutex<bool>>,
    tap: Tap,
    format: CaptureFormat,
    device_name: String,
}

impl CpalCapture {
    /// Opens `device`, honouring the sample rate and channel count in
    /// `constraints` when the device supports them.
    #[tracing::instrument(skip(device))]
    pub fn open(
        device: cpal::Device,
        constraints: Option<&TrackConstraints>,
    ) -> Result<Self, AcquireError> {
        let device_name = device.name().unwrap_or(String::from("Unknown"));
        tracing::debug!("Using input device: {:?}", device_name);

        let config = select_config(&device, constraints)?;
        let device_channels = config.channels();

        let downmix_from = match constraints.and_then(|c| c.channel_count) {
            Some(1) if device_channels > 1 => Some(device_channels),
            _ => None,
        };
        let format = CaptureFormat {
            sample_rate: config.sample_rate().0,
            channels: if downmix_from.is_some() { 1 } else { device_channels },
        };
        tracing::debug!("Capture format: {:?}", format);

        let signal = Arc::new(Mutex::new(true));
        let tap: Tap = Arc::new(Mutex::new(None));
        let pipe = SamplePipe {
            tap: tap.clone(),
            signal: signal.clone(),
            downmix_from,
        };

        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), AcquireError>>(1);

        tracing::debug!("Begin capturing...");
        thread::spawn(move || {
            let sample_format = config.sample_format();
            let stream_config: cpal::StreamConfig = config.into();
            let signal = pipe.signal.clone();

            let built = build_stream_expansion!(sample_format, &device, &stream_config, pipe);
            let stream = match built {
                Ok(stream) => stream,
                Err(e) => {
                    mark_inactive(&signal);
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            if let Err(e) = stream.play() {
                tracing::error!("Failed to play stream: {}", e);
                mark_inactive(&signal);
                let _ = ready_tx.send(Err(AcquireError::DeviceUnavailable(format!(
                    "Failed to play stream: {e}"
                ))));
                return;
            }

            tracing::info!("Capture stream started");
            let _ = ready_tx.send(Ok(()));

            while is_set(&signal) {
                thread::sleep(Duration::from_millis(CLOCK_DELAY as _));
            }

            tracing::debug!("Dropping capture stream");
            drop(stream);
            tracing::info!("Capture stopped");
        });

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(CpalCapture {
                signal,
                tap,
                format,
                device_name,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(AcquireError::DeviceUnavailable(
                "Capture thread exited before the stream started".to_string(),
            )),
        }
    }

    pub fn format(&self) -> CaptureFormat {
        self.format
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Routes converted samples to a new receiver, replacing any previous one.
    pub(crate) fn attach(&self) -> Receiver<Vec<i16>> {
        let (tx, rx) = crossbeam_channel::unbounded();
        match self.tap.lock() {
            Ok(mut tap) => *tap = Some(tx),
            Err(e) => tracing::error!("Failed to lock the capture tap: {}", e),
        }
        rx
    }

    pub(crate) fn tap(&self) -> Tap {
        self.tap.clone()
    }

    pub(crate) fn signal(&self) -> Arc<Mutex<bool>> {
        self.signal.clone()
    }
}

impl CaptureStream for CpalCapture {
    fn is_active(&self) -> bool {
        is_set(&self.signal)
    }
}

impl Drop for CpalCapture {
    fn drop(&mut self) {
        tracing::debug!("Releasing capture on {}", self.device_name);
        detach(&self.tap);
        mark_inactive(&self.signal);
    }
}

/// Removes the receiver, closing its channel once buffered samples drain.
pub(crate) fn detach(tap: &Tap) {
    match tap.lock() {
        Ok(mut tap) => *tap = None,
        Err(e) => tracing::error!("Failed to lock the capture tap: {}", e),
    }
}

pub(crate) fn is_set(signal: &Mutex<bool>) -> bool {
    match signal.lock() {
        Ok(signal) => *signal,
        Err(e) => {
            tracing::error!("Failed to lock the capture signal: {}", e);
            false
        }
    }
}

fn mark_inactive(signal: &Mutex<bool>) {
    match signal.lock() {
        Ok(mut signal) => *signal = false,
        Err(e) => tracing::error!("Failed to lock the capture signal: {}", e),
    }
}

fn select_config(
    device: &cpal::Device,
    constraints: Option<&TrackConstraints>,
) -> Result<cpal::SupportedStreamConfig, AcquireError> {
    let default_config = match device.default_input_config() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Failed to get default input config: {}", error);
            return Err(AcquireError::DeviceUnavailable(
                "Failed to get default input config".to_string(),
            ));
        }
    };

    let Some(constraints) = constraints else {
        return Ok(default_config);
    };
    if constraints.sample_rate.is_none() && constraints.channel_count.is_none() {
        return Ok(default_config);
    }

    let rate = constraints
        .sample_rate
        .unwrap_or(default_config.sample_rate().0);
    let channels = constraints.channel_count;

    let ranges = match device.supported_input_configs() {
        Ok(ranges) => ranges,
        Err(error) => {
            tracing::warn!("Failed to list input configs, using default: {}", error);
            return Ok(default_config);
        }
    };

    for range in ranges {
        let channels_match = channels.is_none_or(|c| c == range.channels());
        if channels_match
            && range.min_sample_rate().0 <= rate
            && rate <= range.max_sample_rate().0
        {
            return Ok(range.with_sample_rate(cpal::SampleRate(rate)));
        }
    }

    tracing::warn!(
        "No input config matches {:?}, using default {:?}",
        constraints,
        default_config
    );
    Ok(default_config)
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    pipe: SamplePipe,
) -> Result<cpal::Stream, AcquireError>
where
    T: CaptureSample,
{
    let err_signal = pipe.signal.clone();

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| pipe.forward(data),
        move |err| {
            tracing::error!("an error occurred on stream: {}", err);
            mark_inactive(&err_signal);
        },
        None,
    );

    match stream {
        Ok(stream) => Ok(stream),
        Err(error) => {
            tracing::error!("Failed to build input stream: {}", error);
            Err(AcquireError::DeviceUnavailable(format!(
                "Failed to build input stream: {error}"
            )))
        }
    }
}

impl SamplePipe {
    fn forward<T: CaptureSample>(&self, data: &[T]) {
        let tap = match self.tap.lock() {
            Ok(tap) => tap,
            Err(e) => {
                tracing::error!("Failed to lock the capture tap: {}", e);
                return;
            }
        };
        let Some(tx) = tap.as_ref() else {
            return;
        };

        let mut samples: Vec<f32> = data.iter().map(|s| s.to_sample::<f32>()).collect();
        if let Some(channels) = self.downmix_from {
            if samples.len() % channels as usize == 0 {
                samples = channels_to_mono(samples, channels);
            }
        }

        let converted = samples.into_iter().map(|s| s.to_sample::<i16>()).collect();
        if let Err(e) = tx.send(converted) {
            tracing::debug!("Failed to send samples: {}", e);
        }
    }
}

/// Converts interleaved multi-channel audio to mono by averaging each frame.
///
/// # Panics
///
/// Panics if the length of `interleaved` is not a multiple of `channels`.
pub fn channels_to_mono<T>(interleaved: Vec<T>, channels: u16) -> Vec<T>
where
    T: Num + Copy + Sum + FromPrimitive,
{
    let channels = channels as usize;

    assert!(
        interleaved.len() % channels == 0,
        "Data length must be a multiple of the number of channels"
    );

    let Some(divisor) = T::from_usize(channels) else {
        return interleaved;
    };

    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().copied().sum::<T>() / divisor)
        .collect()
}
