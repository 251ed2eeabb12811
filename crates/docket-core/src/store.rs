use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::datastore::{Backend, decode_records, encode_records};
use crate::datetime::is_canonical_date;
use crate::error::{StoreError, ValidationError};
use crate::record::{Draft, TaskRecord};

/// Owns the ordered collection. Records are appended in insertion order and
/// identified to callers by position; the uuid on each record is the stable
/// handle that survives deletes.
pub struct RecordStore {
    records: Vec<TaskRecord>,
    backend: Box<dyn Backend>,
}

impl RecordStore {
    #[tracing::instrument(skip(backend))]
    pub fn open(backend: Box<dyn Backend>) -> Self {
        let records = match backend.load() {
            Ok(Some(blob)) => decode_records(&blob),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "failed to load records, starting empty");
                Vec::new()
            }
        };

        info!(count = records.len(), "record store opened");
        Self { records, backend }
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[tracing::instrument(skip(self, draft), fields(date = %draft.date))]
    pub fn add(&mut self, draft: Draft) -> Result<TaskRecord, StoreError> {
        validate_draft(&draft)?;

        let record = TaskRecord {
            uuid: Uuid::new_v4(),
            title: draft.title,
            date: draft.date,
            client: draft.client,
            owner: draft.owner,
            status: draft.status.unwrap_or_default(),
            completed: false,
        };

        self.records.push(record.clone());
        self.persist()?;

        debug!(count = self.records.len(), "record added");
        Ok(record)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, index: usize) -> Result<TaskRecord, StoreError> {
        self.check_index(index)?;
        let removed = self.records.remove(index);
        self.persist()?;

        info!(uuid = %removed.uuid, index, "record deleted");
        Ok(removed)
    }

    #[tracing::instrument(skip(self))]
    pub fn toggle_completed(&mut self, index: usize) -> Result<bool, StoreError> {
        self.check_index(index)?;
        self.records[index].completed = !self.records[index].completed;
        let now = self.records[index].completed;
        self.persist()?;

        info!(uuid = %self.records[index].uuid, completed = now, "completion toggled");
        Ok(now)
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index >= self.records.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }

    // Whole-collection replacement after every mutation; there is no
    // incremental write path.
    fn persist(&self) -> Result<(), StoreError> {
        let blob = encode_records(&self.records).map_err(StoreError::Persistence)?;
        self.backend.save(&blob).map_err(StoreError::Persistence)
    }
}

fn validate_draft(draft: &Draft) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::MissingField("title"));
    }
    if draft.date.is_empty() {
        return Err(ValidationError::MissingField("date"));
    }
    if !is_canonical_date(&draft.date) {
        return Err(ValidationError::InvalidDateFormat(draft.date.clone()));
    }
    Ok(())
}
