use crate::record::{NewScanRecord, ScanRecord};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Append-only, in-memory history of scans.
///
/// Sequence numbers start at 1 and equal the store length right after
/// the append that produced them. Records are never updated or removed
/// and are lost when the process exits.
#[derive(Debug, Default)]
pub struct ScanRecordStore {
    records: RwLock<Vec<ScanRecord>>,
}

impl ScanRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number and store a record, returning its sequence number.
    pub fn append(&self, record: NewScanRecord) -> u64 {
        let mut records = self.write();
        let sequence_number = records.len() as u64 + 1;
        records.push(ScanRecord::numbered(sequence_number, record));
        drop(records);

        tracing::debug!(sequence_number, "Scan record appended");
        sequence_number
    }

    /// Snapshot of every record in insertion order.
    pub fn list_all(&self) -> Vec<ScanRecord> {
        self.read().clone()
    }

    pub fn get(&self, sequence_number: u64) -> Option<ScanRecord> {
        let index = usize::try_from(sequence_number.checked_sub(1)?).ok()?;
        self.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panicking writer cannot leave a half-pushed record behind, so a
    // poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Vec<ScanRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<ScanRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PatientInfo, ResultLabel};
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn new_record(name: &str, result: ResultLabel) -> NewScanRecord {
        NewScanRecord {
            timestamp: "2024-03-01 10:15:00".to_string(),
            image_base64: "aGVsbG8=".to_string(),
            image_mime: "image/png",
            result,
            patient: PatientInfo {
                name: name.to_string(),
                age: "42".to_string(),
                gender: "F".to_string(),
                doctor: "Dr. Osei".to_string(),
                scan_date: "2024-03-01".to_string(),
                hospital_id: "H-17".to_string(),
            },
        }
    }

    #[test]
    fn test_empty_store() {
        let store = ScanRecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.list_all().is_empty());
        assert!(store.get(0).is_none());
        assert!(store.get(1).is_none());
    }

    /// Sequence numbers start at 1 and follow insertion order
    #[test]
    fn test_append_assigns_sequential_numbers() {
        let store = ScanRecordStore::new();

        assert_eq!(store.append(new_record("Ada", ResultLabel::Normal)), 1);
        assert_eq!(store.append(new_record("Ben", ResultLabel::Covid19)), 2);
        assert_eq!(
            store.append(new_record("Cleo", ResultLabel::PredictionFailed)),
            3
        );

        let all = store.list_all();
        assert_eq!(all.len(), 3);

        let names: Vec<_> = all.iter().map(|r| r.patient.name.as_str()).collect();
        assert_eq!(names, ["Ada", "Ben", "Cleo"]);

        let numbers: Vec<_> = all.iter().map(|r| r.sequence_number).collect();
        assert_eq!(numbers, [1, 2, 3]);
    }

    #[test]
    fn test_record_contents_preserved() {
        let store = ScanRecordStore::new();
        let submitted = new_record("Dana", ResultLabel::Covid19);
        let seq = store.append(submitted.clone());

        let stored = store.get(seq).unwrap();
        assert_eq!(stored.sequence_number, seq);
        assert_eq!(stored.timestamp, submitted.timestamp);
        assert_eq!(stored.image_base64, submitted.image_base64);
        assert_eq!(stored.image_mime, "image/png");
        assert_eq!(stored.result, ResultLabel::Covid19);
        assert_eq!(stored.patient, submitted.patient);
    }

    /// Snapshots are not affected by later appends
    #[test]
    fn test_list_all_is_a_snapshot() {
        let store = ScanRecordStore::new();
        store.append(new_record("Eli", ResultLabel::Normal));

        let snapshot = store.list_all();
        store.append(new_record("Fay", ResultLabel::Normal));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    /// Concurrent appends still yield exactly 1..=N
    #[test]
    fn test_concurrent_appends_are_unique_and_gap_free() {
        const THREADS: usize = 16;
        const PER_THREAD: usize = 50;

        let store = Arc::new(ScanRecordStore::new());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = store.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    (0..PER_THREAD)
                        .map(|i| store.append(new_record(&format!("{}-{}", t, i), ResultLabel::Normal)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut returned = HashSet::new();
        for handle in handles {
            for seq in handle.join().unwrap() {
                assert!(returned.insert(seq), "duplicate sequence number {}", seq);
            }
        }

        let total = (THREADS * PER_THREAD) as u64;
        assert_eq!(returned, (1..=total).collect::<HashSet<_>>());

        let all = store.list_all();
        assert_eq!(all.len() as u64, total);
        for (index, record) in all.iter().enumerate() {
            assert_eq!(
                record.sequence_number,
                index as u64 + 1,
                "stored order must match sequence numbers"
            );
        }
    }

    /// Reads never observe a length without its record
    #[test]
    fn test_reads_during_appends() {
        let store = Arc::new(ScanRecordStore::new());

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    store.append(new_record(&i.to_string(), ResultLabel::Normal));
                }
            })
        };

        let mut last_len = 0;
        while !writer.is_finished() {
            let snapshot = store.list_all();
            assert!(snapshot.len() >= last_len, "store must never shrink");
            for (index, record) in snapshot.iter().enumerate() {
                assert_eq!(record.sequence_number, index as u64 + 1);
            }
            last_len = snapshot.len();
        }

        writer.join().unwrap();
        assert_eq!(store.len(), 200);
    }
}
