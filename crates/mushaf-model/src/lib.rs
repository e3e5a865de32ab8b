pub mod chapter;
pub mod error;
pub mod ids;
pub mod reciter;
pub mod verse;

pub use chapter::{Chapter, RevelationType};
pub use error::{ModelError, Result};
pub use ids::{CHAPTER_COUNT, ChapterOrdinal, ReciterId};
pub use reciter::{Moshaf, Reciter};
pub use verse::{ChapterText, NormalizationResult, RawVerse, Verse};
