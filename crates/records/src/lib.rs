pub mod record;
pub mod store;

pub use record::{NewScanRecord, PatientInfo, ResultLabel, ScanRecord};
pub use store::ScanRecordStore;
