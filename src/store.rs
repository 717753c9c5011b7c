//! Per-frame marker storage
//!
//! [`FrameRecordStore`] holds one list of [`MarkerRecord`]s per frame. Frames
//! that were never touched are logically empty. Every record's `frame` field
//! is re-stamped to the frame that owns it whenever a list is written.
//!
//! Instead of listeners, mutations return a [`StoreChange`] and advance
//! [`FrameRecordStore::revision`]. [`SaveStatus`] polls the revision to
//! decide whether there is unsaved work.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Deref, DerefMut};

use crate::model::MarkerRecord;

/// Emitted when a frame's records changed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChange {
    pub frame: u32,
    /// Store revision after the change
    pub revision: u64,
}

/// Sparse, growable sequence of per-frame marker lists
#[derive(Debug, Clone, Default)]
pub struct FrameRecordStore {
    /// Non-empty lists only
    frames: BTreeMap<u32, Vec<MarkerRecord>>,
    /// Logical length of the sequence: highest frame ever touched plus one
    len: u64,
    revision: u64,
}

fn restamp(frame: u32, records: &mut [MarkerRecord]) {
    for record in records {
        record.frame = frame;
    }
}

impl FrameRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for `frame`. Empty if nothing was ever stored there.
    #[must_use]
    pub fn records_for(&self, frame: u32) -> &[MarkerRecord] {
        self.frames.get(&frame).map(Vec::as_slice).unwrap_or_default()
    }

    /// Edit the list for `frame` in place, materializing it if needed.
    ///
    /// Changes are committed when the returned guard is dropped.
    pub fn records_for_mut(&mut self, frame: u32) -> FrameEdit<'_> {
        self.grow(frame);
        let list = self.frames.remove(&frame).unwrap_or_default();
        FrameEdit {
            before: list.clone(),
            list,
            frame,
            committed: false,
            store: self,
        }
    }

    /// Replace the list for `frame` wholesale.
    ///
    /// Returns a change event if the new list differs by value from the old.
    pub fn set_records(&mut self, frame: u32, mut records: Vec<MarkerRecord>) -> Option<StoreChange> {
        restamp(frame, &mut records);
        let changed = self.records_for(frame) != records.as_slice();
        self.store_list(frame, records);
        changed.then(|| self.bump(frame))
    }

    /// Append a record to `frame`
    pub fn push(&mut self, frame: u32, mut record: MarkerRecord) -> StoreChange {
        record.frame = frame;
        self.grow(frame);
        self.frames.entry(frame).or_default().push(record);
        self.bump(frame)
    }

    /// Remove the record at `position` in `frame`'s list
    pub fn remove(&mut self, frame: u32, position: usize) -> Option<MarkerRecord> {
        let list = self.frames.get_mut(&frame)?;
        if position >= list.len() {
            return None;
        }
        let removed = list.remove(position);
        if list.is_empty() {
            self.frames.remove(&frame);
        }
        self.bump(frame);
        Some(removed)
    }

    /// Move a record to another frame, updating its `frame` field
    pub fn move_record(&mut self, from: u32, position: usize, to: u32) -> Option<StoreChange> {
        if from == to {
            return None;
        }
        let record = self.remove(from, position)?;
        Some(self.push(to, record))
    }

    /// Populated frames in ascending order. Frames with no records are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[MarkerRecord])> + '_ {
        self.frames
            .iter()
            .map(|(frame, list)| (*frame, list.as_slice()))
    }

    /// Every record, in frame order
    pub fn records(&self) -> impl Iterator<Item = &MarkerRecord> + '_ {
        self.iter().flat_map(|(_, list)| list.iter())
    }

    /// Length of the frame sequence, including empty frames
    #[must_use]
    pub fn frame_count(&self) -> usize {
        usize::try_from(self.len).unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Distinct focal ant ids, ascending
    #[must_use]
    pub fn subject_ids(&self) -> BTreeSet<u32> {
        self.records().map(|record| record.subject_id).collect()
    }

    /// Monotonic counter advanced by every change
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn grow(&mut self, frame: u32) {
        self.len = self.len.max(u64::from(frame) + 1);
    }

    /// Store `list` under `frame`, dropping the entry when it is empty
    fn store_list(&mut self, frame: u32, list: Vec<MarkerRecord>) {
        self.grow(frame);
        if list.is_empty() {
            self.frames.remove(&frame);
        } else {
            self.frames.insert(frame, list);
        }
    }

    fn bump(&mut self, frame: u32) -> StoreChange {
        self.revision += 1;
        StoreChange {
            frame,
            revision: self.revision,
        }
    }
}

impl PartialEq for FrameRecordStore {
    /// Stores are equal when every frame holds equal records
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for FrameRecordStore {}

/// In-place edit of one frame's list, committed on drop
pub struct FrameEdit<'a> {
    store: &'a mut FrameRecordStore,
    frame: u32,
    list: Vec<MarkerRecord>,
    before: Vec<MarkerRecord>,
    committed: bool,
}

impl FrameEdit<'_> {
    /// Commit now and return the change event, if any
    pub fn commit(mut self) -> Option<StoreChange> {
        self.finish()
    }

    fn finish(&mut self) -> Option<StoreChange> {
        if self.committed {
            return None;
        }
        self.committed = true;
        let mut list = std::mem::take(&mut self.list);
        restamp(self.frame, &mut list);
        let changed = list != self.before;
        self.store.store_list(self.frame, list);
        changed.then(|| self.store.bump(self.frame))
    }
}

impl Deref for FrameEdit<'_> {
    type Target = Vec<MarkerRecord>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl DerefMut for FrameEdit<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.list
    }
}

impl Drop for FrameEdit<'_> {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}

/// Tracks whether a store has changed since it was last saved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveStatus {
    /// `None` until the store has been saved once
    saved_revision: Option<u64>,
}

impl SaveStatus {
    /// Start tracking with `store` considered saved
    #[must_use]
    pub fn new(store: &FrameRecordStore) -> Self {
        Self {
            saved_revision: Some(store.revision()),
        }
    }

    /// Start tracking a store that has never been written
    #[must_use]
    pub fn unsaved() -> Self {
        Self {
            saved_revision: None,
        }
    }

    #[must_use]
    pub fn has_unsaved_changes(&self, store: &FrameRecordStore) -> bool {
        self.saved_revision != Some(store.revision())
    }

    /// Record that `store` was written successfully
    pub fn mark_saved(&mut self, store: &FrameRecordStore) {
        self.saved_revision = Some(store.revision());
    }
}
