//! Audio ingestion and normalization
//!
//! Uploaded audio (WAV, MP3, or M4A) is decoded, downmixed to mono, and
//! resampled to 16 kHz before transcription. The canonical output is a
//! 16-bit PCM mono WAV at [`SAMPLE_RATE`].

mod decode;
mod resample;

use std::io::Write;

use crate::{Error, Result};

/// Sample rate required by the transcription API (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Supported upload container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    M4a,
}

impl AudioFormat {
    /// Detect format from a declared MIME type
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for unsupported MIME types
    pub fn from_mime(mime: &str) -> Result<Self> {
        match mime.split(';').next().unwrap_or(mime).trim() {
            "audio/wav" | "audio/wave" | "audio/x-wav" => Ok(Self::Wav),
            "audio/mpeg" | "audio/mp3" => Ok(Self::Mp3),
            "audio/mp4" | "audio/x-m4a" | "audio/m4a" | "audio/aac" => Ok(Self::M4a),
            other => Err(Error::Decode(format!("unsupported MIME type: {other}"))),
        }
    }

    /// Detect format from a file extension
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for unsupported extensions
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Ok(Self::Wav),
            "mp3" => Ok(Self::Mp3),
            "m4a" => Ok(Self::M4a),
            other => Err(Error::Decode(format!("unsupported file extension: {other}"))),
        }
    }
}

/// Decoded audio samples with format metadata
///
/// Samples are interleaved f32 in [-1.0, 1.0].
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioBuffer {
    /// Whether this buffer satisfies the transcription input invariant
    #[must_use]
    pub const fn is_normalized(&self) -> bool {
        self.channels == 1 && self.sample_rate == SAMPLE_RATE
    }

    /// Downmix interleaved channels to mono by averaging each frame
    #[must_use]
    pub fn downmix_to_mono(self) -> Self {
        if self.channels <= 1 {
            return Self {
                channels: 1,
                ..self
            };
        }

        let channels = usize::from(self.channels);
        #[allow(clippy::cast_precision_loss)]
        let scale = 1.0 / channels as f32;
        let samples = self
            .samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() * scale)
            .collect();

        Self {
            samples,
            sample_rate: self.sample_rate,
            channels: 1,
        }
    }
}

/// Decode uploaded bytes and normalize to mono 16kHz
///
/// # Errors
///
/// Returns [`Error::Decode`] for corrupt or unsupported input and
/// [`Error::Audio`] if resampling fails
pub fn ingest(data: &[u8], format: AudioFormat) -> Result<AudioBuffer> {
    let decoded = match format {
        AudioFormat::Wav => decode::decode_wav(data)?,
        AudioFormat::Mp3 => decode::decode_mp3(data)?,
        AudioFormat::M4a => decode::decode_m4a(data)?,
    };

    if decoded.samples.is_empty() {
        return Err(Error::Decode("no audio samples in upload".to_string()));
    }

    tracing::debug!(
        sample_rate = decoded.sample_rate,
        channels = decoded.channels,
        samples = decoded.samples.len(),
        "decoded upload"
    );

    let mono = decoded.downmix_to_mono();

    let normalized = if mono.sample_rate == SAMPLE_RATE {
        mono
    } else {
        let samples = resample::resample(&mono.samples, mono.sample_rate, SAMPLE_RATE)?;
        AudioBuffer {
            samples,
            sample_rate: SAMPLE_RATE,
            channels: 1,
        }
    };

    Ok(normalized)
}

/// Convert f32 samples to WAV bytes for STT APIs
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            // Convert f32 [-1.0, 1.0] to i16
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

/// Write audio bytes to a scoped temporary file
///
/// The file is deleted when the returned handle drops, on every exit path.
///
/// # Errors
///
/// Returns error if the file cannot be created or written
pub fn write_temp_audio(bytes: &[u8], suffix: &str) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}
