//! Startup content reconciliation.
//!
//! Brings the document store in line with [`ContentManifest`] in three
//! passes: seed empty collections, replace the podcast catalog wholesale, and
//! patch any documents still pointing at placeholder images. Every step is
//! independent; a failure is recorded in the report and the next step runs.

pub mod manifest;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::store::{to_documents, Collection, DocumentStore, StoreError};

pub use manifest::{ContentManifest, PLACEHOLDER_HOST};

const IMAGE_FIELD: &str = "thumbnail";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    SeedIfEmpty,
    ReplaceAll,
    PatchPlaceholders,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepKind::SeedIfEmpty => "seed_if_empty",
            StepKind::ReplaceAll => "replace_all",
            StepKind::PatchPlaceholders => "patch_placeholders",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Seeded { inserted: u64 },
    AlreadyPopulated { existing: u64 },
    Replaced { deleted: u64, inserted: u64 },
    Patched { modified: u64 },
    /// No placeholder images were found.
    Clean,
}

impl StepOutcome {
    /// Documents written by the step.
    pub fn writes(&self) -> u64 {
        match *self {
            StepOutcome::Seeded { inserted } => inserted,
            StepOutcome::Replaced { deleted, inserted } => deleted + inserted,
            StepOutcome::Patched { modified } => modified,
            StepOutcome::AlreadyPopulated { .. } | StepOutcome::Clean => 0,
        }
    }
}

#[derive(Debug)]
pub struct StepReport {
    pub kind: StepKind,
    pub collection: Collection,
    pub result: Result<StepOutcome, StoreError>,
}

#[derive(Debug, Default)]
pub struct ReconciliationReport {
    pub steps: Vec<StepReport>,
}

impl ReconciliationReport {
    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.result.is_err())
    }

    pub fn total_writes(&self) -> u64 {
        self.steps
            .iter()
            .filter_map(|s| s.result.as_ref().ok())
            .map(StepOutcome::writes)
            .sum()
    }

    /// One line per step, then a summary.
    pub fn log(&self) {
        for step in &self.steps {
            let collection = step.collection.name();
            match &step.result {
                Ok(outcome) => info!(
                    step = %step.kind,
                    collection,
                    writes = outcome.writes(),
                    "Reconciliation step finished: {outcome:?}"
                ),
                Err(e) => warn!(
                    step = %step.kind,
                    collection,
                    "Reconciliation step failed: {e}"
                ),
            }
        }
        info!(
            steps = self.steps.len(),
            failed = self.failures().count(),
            writes = self.total_writes(),
            "Content reconciliation complete"
        );
    }
}

pub struct Reconciler {
    store: Arc<dyn DocumentStore>,
    manifest: ContentManifest,
}

impl Reconciler {
    pub fn new(store: Arc<dyn DocumentStore>, manifest: ContentManifest) -> Self {
        Self { store, manifest }
    }

    /// Runs every step in order. Never fails; inspect the report.
    pub async fn run(&self) -> ReconciliationReport {
        let m = &self.manifest;
        let mut report = ReconciliationReport::default();

        let seeds = [
            (Collection::Courses, to_documents(&m.courses)),
            (Collection::Resources, to_documents(&m.resources)),
            (Collection::CommunityPosts, to_documents(&m.community_posts)),
            (Collection::NewsArticles, to_documents(&m.news_articles)),
        ];
        for (collection, docs) in seeds {
            let result = match docs {
                Ok(docs) => self.seed_if_empty(collection, docs).await,
                Err(e) => Err(e),
            };
            report.steps.push(StepReport {
                kind: StepKind::SeedIfEmpty,
                collection,
                result,
            });
        }

        let result = match to_documents(&m.podcast_episodes) {
            Ok(docs) => self.replace_all(Collection::PodcastEpisodes, docs).await,
            Err(e) => Err(e),
        };
        report.steps.push(StepReport {
            kind: StepKind::ReplaceAll,
            collection: Collection::PodcastEpisodes,
            result,
        });

        for collection in [
            Collection::Courses,
            Collection::PodcastEpisodes,
            Collection::NewsArticles,
        ] {
            let result = self.patch_placeholders(collection).await;
            report.steps.push(StepReport {
                kind: StepKind::PatchPlaceholders,
                collection,
                result,
            });
        }

        report
    }

    pub async fn seed_if_empty(
        &self,
        collection: Collection,
        docs: Vec<Value>,
    ) -> Result<StepOutcome, StoreError> {
        let existing = self.store.count(collection).await?;
        if existing > 0 {
            return Ok(StepOutcome::AlreadyPopulated { existing });
        }
        let inserted = self.store.insert_many(collection, docs).await?;
        Ok(StepOutcome::Seeded { inserted })
    }

    /// Swaps the collection for `docs`. A failure leaves the old contents.
    pub async fn replace_all(
        &self,
        collection: Collection,
        docs: Vec<Value>,
    ) -> Result<StepOutcome, StoreError> {
        let (deleted, inserted) = self.store.replace_all(collection, docs).await?;
        Ok(StepOutcome::Replaced { deleted, inserted })
    }

    pub async fn patch_placeholders(&self, collection: Collection) -> Result<StepOutcome, StoreError> {
        let stale = self
            .store
            .count_containing(collection, IMAGE_FIELD, PLACEHOLDER_HOST)
            .await?;
        if stale == 0 {
            return Ok(StepOutcome::Clean);
        }

        let mut modified = 0;
        for fix in self.manifest.corrections_for(collection) {
            modified += self
                .store
                .set_field_where(
                    collection,
                    "title",
                    fix.title,
                    IMAGE_FIELD,
                    Value::String(fix.url.to_string()),
                )
                .await?;
        }
        Ok(StepOutcome::Patched { modified })
    }
}

#[cfg(test)]
impl ReconciliationReport {
    pub fn outcome(&self, kind: StepKind, collection: Collection) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|s| s.kind == kind && s.collection == collection)
            .and_then(|s| s.result.as_ref().ok())
    }
}
