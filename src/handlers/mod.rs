//! HTTP request handlers
//!
//! - `api` - Health check and provider status
//! - `explain` - Tutor explanation with spoken audio
//! - `speak` - Text-to-speech and the TTS self-test
//! - `transcribe` - Speech-to-text for recorded answers

pub mod api;
pub mod explain;
pub mod speak;
pub mod transcribe;
