use std::sync::Arc;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::constants::STORAGE_SAVE_INTERVAL;
use crate::models::Data;
use crate::storage;

/// Start the background task that periodically writes the channel registry
/// to disk. The write is skipped while the registry is unchanged.
pub fn start_save_scheduler(data: Arc<Data>) {
    tokio::spawn(async move {
        info!("Storage save scheduler started");

        let mut timer = interval(STORAGE_SAVE_INTERVAL);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the registry was just loaded
        timer.tick().await;

        loop {
            timer.tick().await;

            if !data.storage_dirty() {
                debug!("Channel registry unchanged, skipping save");
                continue;
            }

            if let Err(e) = storage::save(&data).await {
                error!("Failed to save storage file: {}", e);
            }
        }
    });
}
