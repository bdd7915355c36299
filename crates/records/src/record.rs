use std::fmt;

/// Outcome stored for a scan, including the failed-prediction case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultLabel {
    Covid19,
    Normal,
    PredictionFailed,
}

impl ResultLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultLabel::Covid19 => "COVID-19",
            ResultLabel::Normal => "Normal",
            ResultLabel::PredictionFailed => "Prediction failed",
        }
    }
}

impl fmt::Display for ResultLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form metadata submitted with an upload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatientInfo {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub doctor: String,
    pub scan_date: String,
    pub hospital_id: String,
}

/// A record before the store has numbered it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewScanRecord {
    pub timestamp: String,
    /// Base64 of the uploaded file bytes
    pub image_base64: String,
    pub image_mime: &'static str,
    pub result: ResultLabel,
    pub patient: PatientInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    pub sequence_number: u64,
    pub timestamp: String,
    pub image_base64: String,
    pub image_mime: &'static str,
    pub result: ResultLabel,
    pub patient: PatientInfo,
}

impl ScanRecord {
    pub(crate) fn numbered(sequence_number: u64, record: NewScanRecord) -> Self {
        Self {
            sequence_number,
            timestamp: record.timestamp,
            image_base64: record.image_base64,
            image_mime: record.image_mime,
            result: record.result,
            patient: record.patient,
        }
    }
}
