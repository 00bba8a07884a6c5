//! AI Speech - Speech-to-Text and Text-to-Speech abstractions
//!
//! Provides traits and implementations for speech processing:
//! - `SpeechToText` - Transcribe audio to text (ASR)
//! - `SpeechSynthesis` - Synthesize speech from text (TTS)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//! - `session` holds the single-resolution state machine driving the
//!   transient websocket recognition session
//!
//! # Supported Providers
//!
//! - FunASR websocket service (local ASR)
//! - GPT-SoVITS HTTP service (local TTS)
//! - DashScope managed API (cloud ASR + TTS)

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod session;
pub mod types;

pub use config::{CloudSpeechConfig, FunAsrConfig, SovitsConfig};
pub use error::SpeechError;
pub use ports::{SpeechSynthesis, SpeechToText};
pub use providers::dashscope::DashScopeSpeechProvider;
pub use providers::funasr::FunAsrTranscriber;
pub use providers::sovits::SovitsSynthesizer;
pub use session::RecognitionSession;
pub use types::{AudioData, AudioFormat, SynthesizedAudio, Transcription};
