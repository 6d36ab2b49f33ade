//! Container decoders for supported upload formats

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::AudioBuffer;
use crate::{Error, Result};

/// Decode a WAV container using hound
pub fn decode_wav(data: &[u8]) -> Result<AudioBuffer> {
    let mut reader = hound::WavReader::new(Cursor::new(data))
        .map_err(|e| Error::Decode(format!("WAV parse error: {e}")))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Decode(format!("WAV decode error: {e}")))?,
        hound::SampleFormat::Int => {
            #[allow(clippy::cast_precision_loss)]
            let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| {
                    #[allow(clippy::cast_precision_loss)]
                    s.map(|v| v as f32 / max)
                })
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| Error::Decode(format!("WAV decode error: {e}")))?
        }
    };

    Ok(AudioBuffer {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Decode an MP3 stream using minimp3
#[allow(clippy::cast_sign_loss)]
pub fn decode_mp3(data: &[u8]) -> Result<AudioBuffer> {
    let mut decoder = minimp3::Decoder::new(data);
    let mut samples: Vec<f32> = Vec::new();
    let mut sample_rate = 0_u32;
    let mut channels = 0_u16;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                sample_rate = frame.sample_rate as u32;
                #[allow(clippy::cast_possible_truncation)]
                {
                    channels = frame.channels as u16;
                }
                for &s in &frame.data {
                    samples.push(f32::from(s) / 32768.0);
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => {
                return Err(Error::Decode(format!("MP3 decode error: {e}")));
            }
        }
    }

    if samples.is_empty() {
        return Err(Error::Decode("no MP3 frames found".to_string()));
    }

    Ok(AudioBuffer {
        samples,
        sample_rate,
        channels,
    })
}

/// Decode an M4A/AAC container using symphonia
pub fn decode_m4a(data: &[u8]) -> Result<AudioBuffer> {
    let source = MediaSourceStream::new(
        Box::new(Cursor::new(data.to_vec())),
        symphonia::core::io::MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    hint.with_extension("m4a");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Decode(format!("M4A probe error: {e}")))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| Error::Decode("no audio track in M4A container".to_string()))?;
    let track_id = track.id;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::Decode("M4A track missing sample rate".to_string()))?;
    #[allow(clippy::cast_possible_truncation)]
    let channels = track
        .codec_params
        .channels
        .map_or(1, |c| c.count() as u16);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::Decode(format!("M4A decoder init error: {e}")))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(Error::Decode(format!("M4A read error: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::new(decoded.capacity() as u64, *decoded.spec())
                });
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            // Recoverable corrupt packet; skip and continue
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                tracing::warn!(error = %e, "skipping corrupt M4A packet");
            }
            Err(e) => return Err(Error::Decode(format!("M4A decode error: {e}"))),
        }
    }

    if samples.is_empty() {
        return Err(Error::Decode("no decodable audio in M4A".to_string()));
    }

    Ok(AudioBuffer {
        samples,
        sample_rate,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_roundtrip_preserves_metadata() {
        let samples: Vec<f32> = (0..1600)
            .map(|i| (f32::from(i16::try_from(i).unwrap()) * 0.001).sin() * 0.5)
            .collect();
        let wav = crate::audio::samples_to_wav(&samples, 8000).unwrap();

        let decoded = decode_wav(&wav).unwrap();
        assert_eq!(decoded.sample_rate, 8000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), samples.len());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode_wav(b"not a wav file"),
            Err(Error::Decode(_))
        ));
        assert!(matches!(
            decode_m4a(b"not an mp4 container"),
            Err(Error::Decode(_))
        ));
    }
}
