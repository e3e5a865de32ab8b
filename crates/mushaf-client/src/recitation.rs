//! Reciter roster source.

use mushaf_model::Reciter;
use mushaf_normalization::sort_reciters;
use tracing::info;

use crate::client::MushafClient;
use crate::error::Result;
use crate::wire::parse_reciter_roster;

impl MushafClient {
    /// Fetch the roster, sorted by name at base strength.
    pub async fn fetch_reciter_roster(&self) -> Result<Vec<Reciter>> {
        let body = self.get_text(&self.endpoints.reciters_url()).await?;
        let mut reciters = parse_reciter_roster(&body)?;
        sort_reciters(&mut reciters);
        info!(count = reciters.len(), "reciter roster loaded");
        Ok(reciters)
    }
}
