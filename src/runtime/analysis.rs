// Background project analysis with last-request-wins results

use crate::runtime::inspect::{InspectError, Inspector};
use crate::runtime::version_key::VersionKey;
use log::debug;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    Idle,
    Loading,
    Ready,
}

/// Outcome of one inspection request.
#[derive(Debug)]
pub struct AnalysisResult {
    pub generation: u64,
    pub path: PathBuf,
    pub required: Result<VersionKey, InspectError>,
}

#[derive(Debug)]
struct Slot {
    status: AnalysisStatus,
    generation: u64,
    result: Option<AnalysisResult>,
}

/// Runs inspections on the blocking pool and exposes a pollable status.
///
/// Every request bumps the generation. A worker that finishes after a newer
/// request was made drops its result, so only the latest request can ever
/// become `Ready`.
#[derive(Debug, Clone)]
pub struct Analysis {
    inspector: Inspector,
    slot: Arc<Mutex<Slot>>,
}

impl Analysis {
    pub fn new(inspector: Inspector) -> Self {
        Self {
            inspector,
            slot: Arc::new(Mutex::new(Slot {
                status: AnalysisStatus::Idle,
                generation: 0,
                result: None,
            })),
        }
    }

    /// Start inspecting `path` and return the request's generation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&self, path: PathBuf) -> u64 {
        let generation = {
            let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
            slot.generation += 1;
            slot.status = AnalysisStatus::Loading;
            slot.result = None;
            slot.generation
        };
        debug!("Analysis {} started for {}", generation, path.display());

        let inspector = self.inspector.clone();
        let slot = Arc::clone(&self.slot);
        tokio::task::spawn_blocking(move || {
            let required = inspector.inspect(&path);

            let mut slot = slot.lock().unwrap_or_else(|e| e.into_inner());
            if slot.generation != generation {
                debug!(
                    "Discarding stale analysis {} (current is {})",
                    generation, slot.generation
                );
                return;
            }
            slot.result = Some(AnalysisResult {
                generation,
                path,
                required,
            });
            slot.status = AnalysisStatus::Ready;
        });

        generation
    }

    pub fn status(&self) -> AnalysisStatus {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).status
    }

    /// Hand over a finished result and go back to `Idle`.
    pub fn take_result(&self) -> Option<AnalysisResult> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if slot.status != AnalysisStatus::Ready {
            return None;
        }
        slot.status = AnalysisStatus::Idle;
        slot.result.take()
    }
}
