use crate::pipeline::{PipelineError, ScanUpload};
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use records::PatientInfo;
use std::collections::HashMap;

const FILE_FIELD: &str = "file";

/// Parsed `/predict` submission.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// `None` when no file part was sent or its filename was empty
    pub file: Option<ScanUpload>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !file_name.is_empty() {
                    form.file = Some(ScanUpload { file_name, bytes });
                }
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// All six metadata fields; the first absent one fails the request.
    pub fn patient(&self) -> Result<PatientInfo, PipelineError> {
        let required = |name: &'static str| {
            self.field(name)
                .map(str::to_string)
                .ok_or(PipelineError::MissingField(name))
        };

        Ok(PatientInfo {
            name: required("name")?,
            age: required("age")?,
            gender: required("gender")?,
            doctor: required("doctor")?,
            scan_date: required("scan_date")?,
            hospital_id: required("hospital_id")?,
        })
    }
}
