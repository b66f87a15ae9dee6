use serde::{Deserialize, Serialize};

use crate::{error::ConvertError, result::StrudelResult};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExportFormat {
    Code,
    Json,
}

pub trait ResultExporter {
    fn export(&self, result: &StrudelResult, format: ExportFormat) -> Result<Vec<u8>, ConvertError>;
}

pub struct JsonExporter;

impl ResultExporter for JsonExporter {
    fn export(&self, result: &StrudelResult, format: ExportFormat) -> Result<Vec<u8>, ConvertError> {
        match format {
            ExportFormat::Json => serde_json::to_vec_pretty(result)
                .map_err(|err| ConvertError::Serialization(err.to_string())),
            other => Err(ConvertError::validation(format!(
                "JsonExporter cannot handle {:?}",
                other
            ))),
        }
    }
}

/// Emits the raw pattern code, ready to paste into a Strudel session.
pub struct CodeExporter;

impl ResultExporter for CodeExporter {
    fn export(&self, result: &StrudelResult, format: ExportFormat) -> Result<Vec<u8>, ConvertError> {
        match format {
            ExportFormat::Code => Ok(result.code.clone().into_bytes()),
            other => Err(ConvertError::validation(format!(
                "CodeExporter cannot handle {:?}",
                other
            ))),
        }
    }
}
