//! Table export formats

mod format;
mod json;
mod pasm;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

pub use format::ExportFormat;
pub use json::{JsonExporter, format_json_entry};
pub use pasm::PasmExporter;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    #[default]
    Pasm,
    Json,
    /// Raw destination records, back to back
    Bin,
}

impl ExportKind {
    pub fn extension(&self) -> &'static str {
        (*self).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_export_kind_parse() {
        assert_eq!(ExportKind::from_str("pasm").unwrap(), ExportKind::Pasm);
        assert_eq!(ExportKind::from_str("JSON").unwrap(), ExportKind::Json);
        assert!(ExportKind::from_str("tsv").is_err());
        assert_eq!(ExportKind::Json.extension(), "json");
        assert_eq!(ExportKind::Pasm.to_string(), "pasm");
        assert_eq!(ExportKind::from_str("bin").unwrap().extension(), "bin");
    }
}
