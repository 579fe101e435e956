//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};
use yt_engine::Frame;

use crate::traits::{AudioError, AudioOutput};

/// Seconds of audio the ring holds between the renderer and the device.
const RING_SECONDS: f64 = 0.05;

/// CPAL output fed through a lock-free frame ring.
///
/// Not `Send` on every platform; create it on the thread that renders.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    producer: HeapProd<Frame>,
    running: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Open the default output device.
    ///
    /// Returns the ring consumer to hand to [`build_stream`](Self::build_stream).
    pub fn new() -> Result<(Self, HeapCons<Frame>), AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;
        let config: StreamConfig = supported.into();

        if let Ok(name) = device.name() {
            info!(device = %name, rate = config.sample_rate.0, channels = config.channels, "audio device");
        }

        let capacity = ((config.sample_rate.0 as f64 * RING_SECONDS) as usize).max(64);
        let (producer, consumer) = HeapRb::<Frame>::new(capacity).split();

        let output = Self {
            device,
            config,
            stream: None,
            producer,
            running: Arc::new(AtomicBool::new(false)),
        };
        Ok((output, consumer))
    }

    /// Build and start the device stream.
    pub fn build_stream(&mut self, mut consumer: HeapCons<Frame>) -> Result<(), AudioError> {
        let running = self.running.clone();
        let channels = self.config.channels as usize;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !running.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }
                    for chunk in data.chunks_mut(channels) {
                        let frame = consumer.try_pop().unwrap_or_default();
                        write_device_frame(chunk, frame);
                    }
                },
                |err| error!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }
}

/// Spread one stereo frame over a device frame of any channel count.
fn write_device_frame(chunk: &mut [f32], frame: Frame) {
    match chunk {
        [mono] => *mono = (frame.left_f32() + frame.right_f32()) * 0.5,
        [left, right, rest @ ..] => {
            *left = frame.left_f32();
            *right = frame.right_f32();
            rest.fill(0.0);
        }
        [] => {}
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn write(&mut self, frames: &[Frame]) -> usize {
        self.producer.push_slice(frames)
    }

    fn write_all(&mut self, mut frames: &[Frame]) {
        while !frames.is_empty() {
            let written = self.producer.push_slice(frames);
            frames = &frames[written..];
            if written == 0 {
                std::thread::yield_now();
            }
        }
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running.store(true, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_frame_on_multichannel_device() {
        let mut chunk = [1.0f32; 4];
        write_device_frame(&mut chunk, Frame { left: 16384, right: -16384 });
        assert_eq!(chunk, [0.5, -0.5, 0.0, 0.0]);
    }

    #[test]
    fn stereo_frame_on_mono_device() {
        let mut chunk = [1.0f32; 1];
        write_device_frame(&mut chunk, Frame { left: 16384, right: 0 });
        assert_eq!(chunk, [0.25]);
    }
}
