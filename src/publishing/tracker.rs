//! # Publication Tracker
//!
//! Append-only, concurrency-safe history of publication attempts keyed by
//! post id. Each post accumulates one `PublicationStatus` entry per tracked
//! attempt (multiple platforms per id are allowed and history is never
//! deduplicated); "current" status is the most recently appended entry.
//!
//! The map is a `DashMap` so validations running in parallel can track
//! different posts without interference, while same-id operations serialize
//! on the entry's shard lock (append-then-read consistency).

use crate::publishing::types::{PublicationResult, PublicationStatus, StatusUpdate};
use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashMap;

/// In-memory id → history store for publication status.
#[derive(Debug, Default)]
pub struct PublicationTracker {
    publications: DashMap<String, Vec<PublicationStatus>>,
}

impl PublicationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a status entry derived from a publish result. No-op when the
    /// result carries no post id (nothing remote to track).
    pub fn track_publication(
        &self,
        result: &PublicationResult,
        platform: &str,
    ) -> Option<PublicationStatus> {
        let post_id = result.post_id.clone()?;

        let status = PublicationStatus {
            post_id: post_id.clone(),
            platform: platform.to_string(),
            status: result.status,
            url: result.url.clone(),
            published_at: result.published_at,
            last_checked: Utc::now(),
            error: result.error.clone(),
        };

        self.publications
            .entry(post_id)
            .or_default()
            .push(status.clone());

        Some(status)
    }

    /// Most recently appended entry for a post, if any.
    pub fn publication_status(&self, post_id: &str) -> Option<PublicationStatus> {
        self.publications
            .get(post_id)
            .and_then(|history| history.last().cloned())
    }

    /// Full history for a post, oldest first.
    pub fn publication_history(&self, post_id: &str) -> Vec<PublicationStatus> {
        self.publications
            .get(post_id)
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    /// Merge partial fields into the first entry for the given platform,
    /// bumping `last_checked`. No-op when the id or platform entry is
    /// absent. Returns whether an entry was updated.
    pub fn update_publication_status(
        &self,
        post_id: &str,
        platform: &str,
        update: StatusUpdate,
    ) -> bool {
        let Some(mut history) = self.publications.get_mut(post_id) else {
            return false;
        };

        let Some(entry) = history.iter_mut().find(|s| s.platform == platform) else {
            return false;
        };

        if let Some(status) = update.status {
            entry.status = status;
        }
        if let Some(url) = update.url {
            entry.url = Some(url);
        }
        if let Some(published_at) = update.published_at {
            entry.published_at = Some(published_at);
        }
        if let Some(error) = update.error {
            entry.error = Some(error);
        }
        entry.last_checked = Utc::now();
        true
    }

    /// Delete the entire history for a post. Returns whether anything was
    /// removed.
    pub fn remove_publication(&self, post_id: &str) -> bool {
        self.publications.remove(post_id).is_some()
    }

    /// Snapshot copy of the full id → history map.
    pub fn all_publications(&self) -> HashMap<String, Vec<PublicationStatus>> {
        self.publications
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Number of tracked post ids.
    pub fn len(&self) -> usize {
        self.publications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
    }
}
