// ─────────────────────────────────────────────────────────────────────
// ChaosLink — WAV Sample I/O
// ─────────────────────────────────────────────────────────────────────
//! Reads a WAV message into a continuous `Signal` (linear interpolation
//! between samples, channels mixed to mono) and writes signals back out
//! as 32-bit float WAV. Float output is deliberate: a transmitted
//! secret signal rides on the chaotic carrier and exceeds [-1, 1].

use std::path::Path;

use chaoslink_types::{ChaosLinkError, ChaosLinkResult, Signal};

use crate::noise::NoiseConfig;

/// A sample vector viewed as a continuous function of time.
///
/// Lookup interpolates linearly between adjacent samples and clamps to
/// the first/last sample outside the recording — smoother driving input
/// for the adaptive integrator than nearest-sample steps.
#[derive(Debug, Clone)]
pub struct SampledSignal {
    samples: Vec<f64>,
    sample_rate: f64,
}

impl SampledSignal {
    pub fn from_samples(samples: Vec<f64>, sample_rate: f64) -> ChaosLinkResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(ChaosLinkError::InvalidArgument(format!(
                "sample_rate must be finite and > 0, got {sample_rate}"
            )));
        }
        if samples.is_empty() {
            return Err(ChaosLinkError::InvalidArgument(
                "sampled signal needs at least one sample".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Seconds covered by the samples.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

impl Signal for SampledSignal {
    fn value_at(&self, t: f64) -> f64 {
        let pos = t * self.sample_rate;
        if pos <= 0.0 {
            return self.samples[0];
        }
        let last = self.samples.len() - 1;
        if pos >= last as f64 {
            return self.samples[last];
        }
        let i = pos.floor() as usize;
        let frac = pos - i as f64;
        self.samples[i] * (1.0 - frac) + self.samples[i + 1] * frac
    }
}

/// A message decoded from an audio container.
#[derive(Debug)]
pub struct LoadedMessage {
    /// The continuous message function.
    pub signal: SampledSignal,
    /// Mono sample count.
    pub num_samples: usize,
    /// Container sampling rate in Hz.
    pub sample_rate: u32,
}

/// Read a WAV file into a continuous message function.
///
/// Integer and float sample formats are accepted; multi-channel input
/// is mixed to mono by averaging. When `noise` is given, zero-mean
/// Gaussian noise is added to each sample before the function is built.
pub fn read_message(path: &Path, noise: Option<&NoiseConfig>) -> ChaosLinkResult<LoadedMessage> {
    if let Some(cfg) = noise {
        cfg.validate()?;
    }

    let mut reader = hound::WavReader::open(path)
        .map_err(|e| ChaosLinkError::Audio(format!("open {}: {e}", path.display())))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(ChaosLinkError::Audio(format!(
            "{}: zero channels",
            path.display()
        )));
    }

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max))
                .collect::<Result<_, _>>()
                .map_err(|e| ChaosLinkError::Audio(format!("read {}: {e}", path.display())))?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<Result<_, _>>()
            .map_err(|e| ChaosLinkError::Audio(format!("read {}: {e}", path.display())))?,
    };

    let num_samples = interleaved.len() / channels;
    let mut samples = Vec::with_capacity(num_samples);
    for frame in 0..num_samples {
        let mut acc = 0.0;
        for ch in 0..channels {
            acc += interleaved[frame * channels + ch];
        }
        samples.push(acc / channels as f64);
    }

    if let Some(cfg) = noise {
        cfg.apply(&mut samples);
    }

    let signal = SampledSignal::from_samples(samples, spec.sample_rate as f64)?;
    Ok(LoadedMessage {
        signal,
        num_samples,
        sample_rate: spec.sample_rate,
    })
}

/// Sample a signal at `num_samples` points and write a mono 32-bit
/// float WAV. Non-finite samples are written as 0 and counted in a
/// warning.
pub fn write_message(
    signal: &dyn Signal,
    sample_rate: u32,
    num_samples: usize,
    path: &Path,
) -> ChaosLinkResult<()> {
    if sample_rate == 0 {
        return Err(ChaosLinkError::InvalidArgument(
            "sample_rate must be > 0".to_string(),
        ));
    }
    if num_samples == 0 {
        return Err(ChaosLinkError::InvalidArgument(
            "num_samples must be > 0".to_string(),
        ));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| ChaosLinkError::Audio(format!("create {}: {e}", path.display())))?;

    let mut non_finite = 0usize;
    for i in 0..num_samples {
        let t = i as f64 / sample_rate as f64;
        let mut v = signal.value_at(t);
        if !v.is_finite() {
            non_finite += 1;
            v = 0.0;
        }
        writer
            .write_sample(v as f32)
            .map_err(|e| ChaosLinkError::Audio(format!("write {}: {e}", path.display())))?;
    }
    writer
        .finalize()
        .map_err(|e| ChaosLinkError::Audio(format!("finalize {}: {e}", path.display())))?;

    if non_finite > 0 {
        log::warn!(
            "write_message: {non_finite}/{num_samples} non-finite samples written as 0"
        );
    }
    Ok(())
}
