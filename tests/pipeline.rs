//! Voice pipeline integration tests with mocked provider clients

use std::sync::atomic::Ordering;

use parley_gateway::audio::{AudioFormat, SAMPLE_RATE};
use parley_gateway::session::{Role, Session};
use parley_gateway::Error;

mod common;
use common::{MockChat, MockStt, MockTts, pipeline, sine_wav};

#[tokio::test]
async fn successful_turn_returns_transcript_reply_and_speech() {
    let pipeline = pipeline(
        MockStt::returning("what time is it?"),
        MockChat::returning("It is noon."),
        MockTts::returning(b"fake-audio"),
    );
    let mut session = Session::new();
    let upload = sine_wav(SAMPLE_RATE, 0.2);

    let turn = pipeline
        .run_turn(&mut session, &upload, AudioFormat::Wav)
        .await
        .unwrap();

    assert_eq!(turn.transcript, "what time is it?");
    assert_eq!(turn.reply, "It is noon.");
    assert_eq!(turn.speech, b"fake-audio");
}

#[tokio::test]
async fn n_turns_produce_2n_alternating_messages() {
    let pipeline = pipeline(
        MockStt::returning("hello"),
        MockChat::returning("hi there"),
        MockTts::returning(b"audio"),
    );
    let mut session = Session::new();
    let upload = sine_wav(SAMPLE_RATE, 0.2);

    let n = 3;
    for _ in 0..n {
        pipeline
            .run_turn(&mut session, &upload, AudioFormat::Wav)
            .await
            .unwrap();
    }

    let log = session.snapshot();
    assert_eq!(log.len(), 2 * n);
    for (i, message) in log.iter().enumerate() {
        let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(message.role, expected, "message {i} has wrong role");
    }
}

#[tokio::test]
async fn chat_sees_transcript_as_last_user_message() {
    let chat = MockChat::returning("reply");
    let seen = chat.seen.clone();

    let pipeline = pipeline(
        MockStt::returning("the transcript T"),
        chat,
        MockTts::returning(b"audio"),
    );
    let mut session = Session::new();
    let upload = sine_wav(SAMPLE_RATE, 0.2);

    pipeline
        .run_turn(&mut session, &upload, AudioFormat::Wav)
        .await
        .unwrap();

    let histories = seen.lock().unwrap();
    let last = histories[0].last().unwrap();
    assert_eq!(last.role, Role::User);
    assert_eq!(last.content, "the transcript T");
}

#[tokio::test]
async fn synthesizer_receives_reply_exactly() {
    let tts = MockTts::returning(b"audio");
    let seen = tts.seen.clone();

    let pipeline = pipeline(
        MockStt::returning("hello"),
        MockChat::returning("the reply R"),
        tts,
    );
    let mut session = Session::new();
    let upload = sine_wav(SAMPLE_RATE, 0.2);

    pipeline
        .run_turn(&mut session, &upload, AudioFormat::Wav)
        .await
        .unwrap();

    assert_eq!(seen.lock().unwrap().as_slice(), ["the reply R"]);
}

#[tokio::test]
async fn decode_failure_invokes_no_clients() {
    let stt = MockStt::returning("hello");
    let chat = MockChat::returning("hi");
    let tts = MockTts::returning(b"audio");
    let (stt_calls, chat_calls, tts_calls) =
        (stt.calls.clone(), chat.calls.clone(), tts.calls.clone());

    let pipeline = pipeline(stt, chat, tts);
    let mut session = Session::new();

    let err = pipeline
        .run_turn(&mut session, b"not audio at all", AudioFormat::Wav)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
    assert_eq!(stt_calls.load(Ordering::SeqCst), 0);
    assert_eq!(chat_calls.load(Ordering::SeqCst), 0);
    assert_eq!(tts_calls.load(Ordering::SeqCst), 0);
    assert!(session.is_empty());
}

#[tokio::test]
async fn transcription_failure_aborts_before_chat() {
    let chat = MockChat::returning("hi");
    let chat_calls = chat.calls.clone();

    let pipeline = pipeline(MockStt::failing(), chat, MockTts::returning(b"audio"));
    let mut session = Session::new();
    let upload = sine_wav(SAMPLE_RATE, 0.2);

    let err = pipeline
        .run_turn(&mut session, &upload, AudioFormat::Wav)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), "transcription");
    assert_eq!(chat_calls.load(Ordering::SeqCst), 0);
    assert!(session.is_empty());
}

#[tokio::test]
async fn empty_transcript_aborts_before_chat() {
    let chat = MockChat::returning("hi");
    let chat_calls = chat.calls.clone();

    let pipeline = pipeline(MockStt::returning("   "), chat, MockTts::returning(b"audio"));
    let mut session = Session::new();
    let upload = sine_wav(SAMPLE_RATE, 0.2);

    let err = pipeline
        .run_turn(&mut session, &upload, AudioFormat::Wav)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transcription(_)));
    assert_eq!(chat_calls.load(Ordering::SeqCst), 0);
    assert!(session.is_empty());
}

#[tokio::test]
async fn chat_failure_aborts_before_synthesis() {
    let tts = MockTts::returning(b"audio");
    let tts_calls = tts.calls.clone();

    let pipeline = pipeline(MockStt::returning("hello"), MockChat::failing(), tts);
    let mut session = Session::new();
    let upload = sine_wav(SAMPLE_RATE, 0.2);

    let err = pipeline
        .run_turn(&mut session, &upload, AudioFormat::Wav)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), "chat");
    assert_eq!(tts_calls.load(Ordering::SeqCst), 0);
    // The user turn was accepted before the chat stage failed
    assert_eq!(session.len(), 1);
    assert_eq!(session.snapshot()[0].role, Role::User);
}

#[tokio::test]
async fn empty_reply_aborts_before_synthesis() {
    let tts = MockTts::returning(b"audio");
    let tts_calls = tts.calls.clone();

    let pipeline = pipeline(MockStt::returning("hello"), MockChat::returning("  "), tts);
    let mut session = Session::new();
    let upload = sine_wav(SAMPLE_RATE, 0.2);

    let err = pipeline
        .run_turn(&mut session, &upload, AudioFormat::Wav)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ChatCompletion(_)));
    assert_eq!(tts_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn synthesis_failure_keeps_both_messages() {
    let pipeline = pipeline(
        MockStt::returning("hello"),
        MockChat::returning("hi there"),
        MockTts::failing(),
    );
    let mut session = Session::new();
    let upload = sine_wav(SAMPLE_RATE, 0.2);

    let err = pipeline
        .run_turn(&mut session, &upload, AudioFormat::Wav)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), "synthesis");
    assert_eq!(session.len(), 2);
}

#[tokio::test]
async fn speech_temp_file_is_scoped() {
    let pipeline = pipeline(
        MockStt::returning("hello"),
        MockChat::returning("hi"),
        MockTts::returning(b"fake-wav-bytes"),
    );
    let mut session = Session::new();
    let upload = sine_wav(SAMPLE_RATE, 0.2);

    let turn = pipeline
        .run_turn(&mut session, &upload, AudioFormat::Wav)
        .await
        .unwrap();

    let file = turn.speech_temp_file().unwrap();
    let path = file.path().to_path_buf();
    assert_eq!(std::fs::read(&path).unwrap(), b"fake-wav-bytes");

    drop(file);
    assert!(!path.exists(), "temp file leaked after drop");
}
