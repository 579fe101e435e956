//! The synth rendered on a background thread into the sound card.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use tracing::{debug, info, warn};
use yt_audio::{AudioError, AudioOutput, CpalOutput};
use yt_engine::{AudioGraph, BusId, Frame, ScopeData, Synth, ToneHandle, Waveform};

/// Frames rendered per lock of the synth.
const BLOCK_FRAMES: usize = 256;

/// Silence written after the render loop ends so the device drains cleanly.
const TAIL_FRAMES: usize = 4096;

type Startup = Result<(Arc<Mutex<Synth>>, u32), AudioError>;

/// [`AudioGraph`] backed by a [`Synth`] that a render thread feeds to cpal.
///
/// The clock is the synth's rendered position, which runs ahead of the
/// speaker by at most the output ring's length.
pub struct RealtimeGraph {
    synth: Arc<Mutex<Synth>>,
    sample_rate: u32,
    stop_signal: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl RealtimeGraph {
    /// Open the default device and start rendering.
    pub fn start(master_gain: f32) -> Result<Self, AudioError> {
        let stop_signal = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel::<Startup>();

        let stop = stop_signal.clone();
        let thread = std::thread::Builder::new()
            .name("yt-render".into())
            .spawn(move || render_thread(master_gain, stop, tx))
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        let (synth, sample_rate) = match rx.recv() {
            Ok(Ok(started)) => started,
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(AudioError::RenderThread);
            }
        };
        info!(sample_rate, "realtime output started");

        Ok(Self {
            synth,
            sample_rate,
            stop_signal,
            thread: Some(thread),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Whether the render thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Synth> {
        self.synth.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AudioGraph for RealtimeGraph {
    fn current_time(&self) -> f64 {
        self.lock().current_time()
    }

    fn create_bus(&mut self, gain: f32) -> BusId {
        self.lock().create_bus(gain)
    }

    fn start_tone(
        &mut self,
        bus: BusId,
        waveform: Waveform,
        frequency: f64,
        start: f64,
    ) -> ToneHandle {
        self.lock().start_tone(bus, waveform, frequency, start)
    }

    fn stop_tone(&mut self, handle: ToneHandle, at: f64) {
        self.lock().stop_tone(handle, at)
    }

    fn read_scope(&mut self, bus: BusId, out: &mut ScopeData) {
        self.lock().read_scope(bus, out)
    }
}

impl Drop for RealtimeGraph {
    fn drop(&mut self) {
        self.stop_signal.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
        debug!("realtime output stopped");
    }
}

fn render_thread(master_gain: f32, stop_signal: Arc<AtomicBool>, startup: mpsc::Sender<Startup>) {
    let mut output = match open_output() {
        Ok(output) => output,
        Err(e) => {
            let _ = startup.send(Err(e));
            return;
        }
    };

    let sample_rate = output.sample_rate();
    let mut synth = Synth::new(sample_rate);
    synth.set_master_gain(master_gain);
    let synth = Arc::new(Mutex::new(synth));
    if startup.send(Ok((synth.clone(), sample_rate))).is_err() {
        return;
    }

    let mut block = [Frame::silence(); BLOCK_FRAMES];
    while !stop_signal.load(Ordering::Relaxed) {
        synth
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .render(&mut block);
        output.write_all(&block);
    }

    let silence = [Frame::silence(); BLOCK_FRAMES];
    for _ in 0..TAIL_FRAMES / BLOCK_FRAMES {
        output.write_all(&silence);
    }
    if let Err(e) = output.stop() {
        warn!("failed to stop output: {}", e);
    }
}

fn open_output() -> Result<CpalOutput, AudioError> {
    let (mut output, consumer) = CpalOutput::new()?;
    output.build_stream(consumer)?;
    output.start()?;
    Ok(output)
}
