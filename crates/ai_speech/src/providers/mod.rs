//! Speech provider adapters
//!
//! Concrete implementations of the `SpeechToText` and `SpeechSynthesis`
//! ports. `funasr` and `sovits` talk to local services; `dashscope` covers
//! both capabilities through the managed cloud API.

pub mod dashscope;
pub mod funasr;
pub mod sovits;
