//! Remote data sources for the reader.
//!
//! Two independent APIs feed the reader:
//!
//! - a text API serving the chapter catalog and per-chapter editions
//!   (source text and translation), and
//! - a recitation API serving the reciter roster, whose entries carry the
//!   audio server each chapter URL is derived from.
//!
//! All requests go through [`MushafClient`]. Responses are decoded by the
//! pure functions in [`wire`], so payload handling is testable offline.

pub mod catalog;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod wire;

mod recitation;

pub use catalog::ChapterPayload;
pub use client::MushafClient;
pub use config::{DEFAULT_AUDIO_API, DEFAULT_TEXT_API, Editions, Endpoints};
pub use download::{DownloadProgress, format_bytes};
pub use error::{ClientError, Result};
pub use wire::{parse_chapter_list, parse_chapter_verses, parse_reciter_roster};
