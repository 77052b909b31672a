//! Whole-record in-memory storage.
//!
//! Persistence is the caller's responsibility; this store exists so the
//! workflow engines' copy-on-write discipline has a collaborator to commit
//! into: a transition reads the current record, computes a new value and
//! atomically replaces it in the collection. No record is ever mutated in
//! place.

use std::collections::BTreeMap;
use uuid::Uuid;

/// A record addressable by its unique id.
pub trait Identified {
    fn id(&self) -> Uuid;
}

impl Identified for crate::workflows::leave::LeaveRequest {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identified for crate::workflows::plan::RehabPlan {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identified for crate::clinical::MedicalProfile {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identified for crate::beneficiary::Beneficiary {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// An in-memory collection with whole-record replacement semantics.
#[derive(Clone, Debug)]
pub struct MemoryStore<R> {
    records: BTreeMap<Uuid, R>,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<R: Identified> MemoryStore<R> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Reads the current record value, if present.
    pub fn get(&self, id: Uuid) -> Option<&R> {
        self.records.get(&id)
    }

    /// Commits a record, replacing any previous value wholesale.
    ///
    /// Returns the replaced value so callers can audit what was displaced.
    pub fn put(&mut self, record: R) -> Option<R> {
        self.records.insert(record.id(), record)
    }

    /// Removes a record, returning it if it was present.
    pub fn remove(&mut self, id: Uuid) -> Option<R> {
        self.records.remove(&id)
    }

    /// Iterates the records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::{Actor, Role};
    use crate::config::CoreConfig;
    use crate::workflows::leave::{LeaveRequest, LeaveType, LeaveWorkflow, NewLeaveRequest};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn request(workflow: &LeaveWorkflow) -> LeaveRequest {
        let social_worker =
            Actor::new("u-sw", "Sara A.", Role::SocialWorker).expect("valid actor");
        workflow
            .create(
                &social_worker,
                NewLeaveRequest {
                    beneficiary_id: Uuid::new_v4(),
                    beneficiary_name: "Ahmed M.".into(),
                    leave_type: LeaveType::HomeVisit,
                    start_date: NaiveDate::from_ymd_opt(2023, 12, 1).expect("valid date"),
                    end_date: NaiveDate::from_ymd_opt(2023, 12, 3).expect("valid date"),
                    guardian_name: "Mohammed A.".into(),
                    guardian_phone: "0500000000".into(),
                    reason: "Weekend family visit".into(),
                },
                None,
            )
            .expect("social worker may create")
    }

    #[test]
    fn put_then_get_round_trips() {
        let workflow = LeaveWorkflow::new(Arc::new(CoreConfig::default()));
        let mut store = MemoryStore::new();

        let created = request(&workflow);
        let id = created.id;
        assert!(store.put(created).is_none());
        assert_eq!(store.get(id).expect("stored").history.len(), 1);
    }

    #[test]
    fn transitions_commit_as_whole_record_replacements() {
        let workflow = LeaveWorkflow::new(Arc::new(CoreConfig::default()));
        let doctor = Actor::new("u-dr", "Dr. M.", Role::Doctor).expect("valid actor");
        let mut store = MemoryStore::new();

        let created = request(&workflow);
        let id = created.id;
        store.put(created);

        let current = store.get(id).expect("stored").clone();
        let advanced = workflow
            .approve(&current, &doctor, Some("fit to travel"))
            .expect("doctor approves");
        let displaced = store.put(advanced).expect("replacement displaces the old value");

        assert_eq!(displaced.history.len(), 1);
        assert_eq!(store.get(id).expect("stored").history.len(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_returns_the_record() {
        let workflow = LeaveWorkflow::new(Arc::new(CoreConfig::default()));
        let mut store = MemoryStore::new();

        let created = request(&workflow);
        let id = created.id;
        store.put(created);

        assert!(store.remove(id).is_some());
        assert!(store.is_empty());
        assert!(store.get(id).is_none());
    }
}
