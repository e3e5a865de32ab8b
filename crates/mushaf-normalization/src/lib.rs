//! Verse text normalization for the mushaf reader.
//!
//! - [`basmala`]: recognise and strip the opening formula of a verse
//! - [`paging`]: per-chapter display sequence with dense numbering
//! - [`collation`]: base-strength ordering and search of reciter names
//! - [`audio`]: recitation file URLs

pub mod audio;
pub mod basmala;
pub mod collation;
pub mod paging;

pub use audio::{audio_url, download_file_name};
pub use basmala::{FORMULA_TEXT, starts_with_formula, strip_formula};
pub use collation::{
    compare_base, featured, filter_reciters, first_name_match, matches_search, sort_key,
    sort_reciters,
};
pub use paging::{BasmalaPolicy, VerseNormalizer};
