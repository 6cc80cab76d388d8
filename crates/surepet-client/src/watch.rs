// # Timeline Watcher
//
// Polling watcher over the household timeline.
//
// ## Purpose
//
// The vendor offers no push channel, so "watching" means polling the
// timeline endpoint at a fixed interval and emitting entries that have not
// been seen before. The official app does the same thing.
//
// ## Behavior
//
// - The first successful poll establishes a baseline; history is not
//   replayed
// - Later polls emit entries with an id above the baseline, oldest first
// - Transport errors are logged and the loop keeps polling
// - The loop stops when the stream receiver is dropped

use std::pin::Pin;
use std::time::Duration;

use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

use surepet_core::traits::PetcareApi;
use surepet_core::types::{SessionToken, TimelineEntry};

use crate::SureHubClient;

impl SureHubClient {
    /// Watch the household timeline by polling
    ///
    /// Returns a stream of timeline entries that appeared after the first
    /// poll. The polling task runs until the returned stream is dropped.
    pub fn watch_timeline(
        &self,
        token: SessionToken,
        household_id: i64,
        poll_interval: Duration,
    ) -> Pin<Box<dyn Stream<Item = TimelineEntry> + Send + 'static>> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let client = self.clone();

        tokio::spawn(async move {
            tracing::info!(
                "Starting timeline monitoring (household={}, interval={:?})",
                household_id,
                poll_interval
            );

            let mut baseline: Option<i64> = None;

            loop {
                if tx.is_closed() {
                    tracing::debug!("Receiver dropped, stopping monitor");
                    return;
                }

                match client.timeline(&token, household_id).await {
                    Ok(entries) => {
                        let newest = entries.iter().map(|e| e.id).max();

                        match baseline {
                            None => {
                                // First poll: remember where history ends
                                baseline = newest.or(Some(0));
                            }
                            Some(seen) => {
                                let mut fresh: Vec<TimelineEntry> =
                                    entries.into_iter().filter(|e| e.id > seen).collect();
                                fresh.sort_by_key(|e| e.id);

                                for entry in fresh {
                                    if tx.send(entry).is_err() {
                                        tracing::debug!("Receiver dropped, stopping monitor");
                                        return;
                                    }
                                }

                                if let Some(newest) = newest
                                    && newest > seen
                                {
                                    baseline = Some(newest);
                                }
                            }
                        }
                    }
                    Err(err) => {
                        tracing::warn!("Timeline poll failed: {}", err);
                    }
                }

                tokio::time::sleep(poll_interval).await;
            }
        });

        Box::pin(UnboundedReceiverStream::new(rx))
    }
}
