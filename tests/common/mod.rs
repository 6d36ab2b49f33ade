//! Shared test utilities: mock provider clients and audio fixtures

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use parley_gateway::session::Message;
use parley_gateway::{ChatCompleter, Error, Result, Synthesizer, Transcriber, VoicePipeline};

/// Scripted transcriber that records invocations
pub struct MockStt {
    pub transcript: String,
    pub fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl MockStt {
    pub fn returning(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            transcript: String::new(),
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Transcriber for MockStt {
    async fn transcribe(&self, wav: &[u8]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!wav.is_empty(), "transcriber received empty WAV");
        if self.fail {
            return Err(Error::Transcription(
                "simulated network failure".to_string(),
            ));
        }
        Ok(self.transcript.clone())
    }
}

/// Scripted chat completer that records the histories it was given
pub struct MockChat {
    pub reply: String,
    pub fail: bool,
    pub calls: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockChat {
    pub fn returning(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        let mut mock = Self::returning("");
        mock.fail = true;
        mock
    }
}

#[async_trait]
impl ChatCompleter for MockChat {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(messages.to_vec());
        if self.fail {
            return Err(Error::ChatCompletion(
                "simulated network failure".to_string(),
            ));
        }
        Ok(self.reply.clone())
    }
}

/// Scripted synthesizer that records the texts it was given
pub struct MockTts {
    pub audio: Vec<u8>,
    pub fail: bool,
    pub calls: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl MockTts {
    pub fn returning(audio: &[u8]) -> Self {
        Self {
            audio: audio.to_vec(),
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        let mut mock = Self::returning(b"");
        mock.fail = true;
        mock
    }
}

#[async_trait]
impl Synthesizer for MockTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(Error::Synthesis("simulated network failure".to_string()));
        }
        Ok(self.audio.clone())
    }
}

/// Build a pipeline from mocks
pub fn pipeline(stt: MockStt, chat: MockChat, tts: MockTts) -> VoicePipeline {
    VoicePipeline::new(Arc::new(stt), Arc::new(chat), Arc::new(tts))
}

/// Generate a mono sine-wave WAV fixture
pub fn sine_wav(sample_rate: u32, duration_secs: f32) -> Vec<u8> {
    sine_wav_channels(sample_rate, 1, duration_secs)
}

/// Generate an interleaved sine-wave WAV fixture with the given channel count
pub fn sine_wav_channels(sample_rate: u32, channels: u16, duration_secs: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let num_frames = (sample_rate as f32 * duration_secs) as usize;
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..num_frames {
            let t = i as f32 / sample_rate as f32;
            let sample = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5;
            let sample_i16 = (sample * 32767.0) as i16;
            for _ in 0..channels {
                writer.write_sample(sample_i16).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}
