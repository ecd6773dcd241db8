use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Deterministic test signal: `offset + amplitude * sin(2π f t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineWave {
    pub amplitude: f64,
    pub frequency_hz: f64,
    pub offset: f64,
}

impl Default for SineWave {
    fn default() -> Self {
        Self {
            amplitude: 0.05,
            frequency_hz: 0.2,
            offset: 0.0,
        }
    }
}

impl SineWave {
    pub fn value_at(&self, time_s: f64) -> f64 {
        self.offset + self.amplitude * (TAU * self.frequency_hz * time_s).sin()
    }
}

/// Produces samples of a [`SineWave`] on a background thread at a live
/// adjustable rate. Samples are drained on the UI thread.
pub struct SineSource {
    receiver: Receiver<f64>,
    stop: Arc<AtomicBool>,
    rate_bits: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl SineSource {
    pub fn spawn(wave: SineWave, sample_rate: f64) -> Self {
        let (sender, receiver) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let rate_bits = Arc::new(AtomicU64::new(sanitize_rate(sample_rate).to_bits()));

        let thread_stop = Arc::clone(&stop);
        let thread_rate = Arc::clone(&rate_bits);
        let handle = thread::Builder::new()
            .name("sismo-source".to_string())
            .spawn(move || {
                let mut time_s = 0.0;
                while !thread_stop.load(Ordering::Relaxed) {
                    let rate = f64::from_bits(thread_rate.load(Ordering::Relaxed));
                    let period = 1.0 / rate;
                    if sender.send(wave.value_at(time_s)).is_err() {
                        break;
                    }
                    time_s += period;
                    thread::sleep(Duration::from_secs_f64(period));
                }
                log::debug!("sample source stopped at t = {time_s:.3} s");
            })
            .map_err(|err| log::error!("failed to spawn sample source: {err}"))
            .ok();

        Self {
            receiver,
            stop,
            rate_bits,
            handle,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        f64::from_bits(self.rate_bits.load(Ordering::Relaxed))
    }

    pub fn set_sample_rate(&self, sample_rate: f64) {
        self.rate_bits
            .store(sanitize_rate(sample_rate).to_bits(), Ordering::Relaxed);
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.sample_rate())
    }

    /// Everything produced since the last drain, oldest first.
    pub fn drain(&self) -> Vec<f64> {
        let mut samples = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(sample) => samples.push(sample),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        samples
    }
}

impl Drop for SineSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn sanitize_rate(rate: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        1.0
    }
}
