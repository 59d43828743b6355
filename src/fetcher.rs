use crate::config::OutputOptions;
use crate::models::SnapshotRow;
use crate::utils;
use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// A site that can be turned into one snapshot of offers.
pub trait OfferSource {
    type Offer: Serialize + SnapshotRow;

    fn name(&self) -> &str;

    /// Prefix of the snapshot file name.
    fn dataset(&self) -> &str;

    fn fetch_offers(&self) -> Result<Vec<Self::Offer>>;
}

pub struct FetchResult {
    pub offer_count: usize,
    pub output_path: PathBuf,
}

pub fn snapshot_path<T: OfferSource>(source: &T, options: &OutputOptions) -> PathBuf {
    match &options.output {
        Some(path) => path.clone(),
        None => utils::dated_output_path(&options.output_dir, source.dataset(), Local::now().date_naive()),
    }
}

/// Fetches every offer of `source` and writes them to today's snapshot.
pub fn run_fetcher<T: OfferSource>(source: &T, options: &OutputOptions) -> Result<FetchResult> {
    info!("{} offer fetcher", source.name());

    let offers = source.fetch_offers()?;
    info!("Fetched {} offers from {}", offers.len(), source.name());

    let output_path = snapshot_path(source, options);
    utils::save_offers_to_csv(&offers, &output_path)?;

    Ok(FetchResult {
        offer_count: offers.len(),
        output_path,
    })
}
