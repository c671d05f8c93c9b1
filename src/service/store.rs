//! Session storage
//!
//! Everything is scoped by [`OwnerId`]; one owner can never see another's
//! analyses, loops or log.

use crate::service::types::{AnalysisRecord, LoopSession, OwnerId, TemporalEntry};
use std::collections::HashMap;
use uuid::Uuid;

/// Backing store for the healing service
pub trait SessionStore {
    /// Append an analysis to the owner's history
    fn push_analysis(&mut self, owner: &OwnerId, record: AnalysisRecord);

    fn find_analysis(&self, owner: &OwnerId, analysis_id: Uuid) -> Option<AnalysisRecord>;

    /// Last `n` analyses, oldest first
    fn recent_analyses(&self, owner: &OwnerId, n: usize) -> Vec<AnalysisRecord>;

    /// Insert or replace a loop
    fn put_loop(&mut self, owner: &OwnerId, session: LoopSession);

    fn get_loop(&self, owner: &OwnerId, loop_id: Uuid) -> Option<LoopSession>;

    fn remove_loop(&mut self, owner: &OwnerId, loop_id: Uuid) -> Option<LoopSession>;

    fn append_log(&mut self, owner: &OwnerId, entry: TemporalEntry);

    /// Last `limit` log entries, oldest first, and the total count
    fn log_tail(&self, owner: &OwnerId, limit: usize) -> (Vec<TemporalEntry>, usize);
}

#[derive(Debug, Default)]
struct OwnerData {
    analyses: Vec<AnalysisRecord>,
    loops: HashMap<Uuid, LoopSession>,
    log: Vec<TemporalEntry>,
}

/// Process-local store, lost on exit
///
/// Retention is unbounded: analyses and log entries are never evicted, and a
/// loop stays registered until `remove_loop` is called for it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    owners: HashMap<OwnerId, OwnerData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn owner_mut(&mut self, owner: &OwnerId) -> &mut OwnerData {
        self.owners.entry(owner.clone()).or_default()
    }
}

impl SessionStore for MemoryStore {
    fn push_analysis(&mut self, owner: &OwnerId, record: AnalysisRecord) {
        self.owner_mut(owner).analyses.push(record);
    }

    fn find_analysis(&self, owner: &OwnerId, analysis_id: Uuid) -> Option<AnalysisRecord> {
        self.owners
            .get(owner)?
            .analyses
            .iter()
            .find(|r| r.analysis.id == analysis_id)
            .cloned()
    }

    fn recent_analyses(&self, owner: &OwnerId, n: usize) -> Vec<AnalysisRecord> {
        self.owners
            .get(owner)
            .map(|data| tail(&data.analyses, n).to_vec())
            .unwrap_or_default()
    }

    fn put_loop(&mut self, owner: &OwnerId, session: LoopSession) {
        self.owner_mut(owner)
            .loops
            .insert(session.state.loop_id, session);
    }

    fn get_loop(&self, owner: &OwnerId, loop_id: Uuid) -> Option<LoopSession> {
        self.owners.get(owner)?.loops.get(&loop_id).cloned()
    }

    fn remove_loop(&mut self, owner: &OwnerId, loop_id: Uuid) -> Option<LoopSession> {
        self.owners.get_mut(owner)?.loops.remove(&loop_id)
    }

    fn append_log(&mut self, owner: &OwnerId, entry: TemporalEntry) {
        self.owner_mut(owner).log.push(entry);
    }

    fn log_tail(&self, owner: &OwnerId, limit: usize) -> (Vec<TemporalEntry>, usize) {
        match self.owners.get(owner) {
            Some(data) => (tail(&data.log, limit).to_vec(), data.log.len()),
            None => (Vec::new(), 0),
        }
    }
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}
