//! `tablescan.toml` configuration.
//!
//! Every key is optional; anything left out falls back to the built-in NES
//! monster table setup.
//!
//! ```toml
//! console = "nes"
//! output_dir = "out"
//!
//! [table]
//! bank = 6
//! cpu_address = 0xA2A2
//! search_distance = 0x2000
//!
//! [locator]
//! min_run = 1
//! max_records = 200
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tablescan_core::monster::{self, FieldMapping};
use tablescan_core::{
    AddressSpec, BankLayout, Console, LocatorOptions, PlausibilityWindow, RecordLayout,
    to_file_offset,
};
use tracing::{info, warn};

/// Where the source table starts: a raw file offset, or a bank/CPU address
/// resolved against the image's bank layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLocation {
    pub file_offset: Option<usize>,
    pub bank: Option<u32>,
    pub cpu_address: Option<u16>,
    /// Bytes either side of the expected start searched by `--fallback`
    pub search_distance: usize,
}

impl Default for TableLocation {
    fn default() -> Self {
        Self {
            file_offset: None,
            bank: Some(6),
            cpu_address: Some(0xA2A2),
            search_distance: 0x2000,
        }
    }
}

impl TableLocation {
    /// Resolve to a file offset; `None` when nothing is configured.
    pub fn resolve(&self, layout: &BankLayout, image_len: usize) -> Result<Option<usize>> {
        if let Some(offset) = self.file_offset {
            return Ok(Some(offset));
        }
        match (self.bank, self.cpu_address) {
            (Some(bank), Some(cpu_address)) => {
                let spec = AddressSpec::new(bank, cpu_address, layout);
                let offset = to_file_offset(&spec, Some(image_len))
                    .with_context(|| format!("Failed to resolve {}", spec))?;
                Ok(Some(offset))
            }
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TablescanConfig {
    /// Used when the image carries no recognisable header
    pub console: Console,
    pub table: TableLocation,
    pub source_layout: RecordLayout,
    pub target_layout: RecordLayout,
    pub scan_window: PlausibilityWindow,
    pub confirm_window: PlausibilityWindow,
    pub target_window: PlausibilityWindow,
    pub mapping: FieldMapping,
    pub locator: LocatorOptions,
    pub output_dir: PathBuf,
}

impl Default for TablescanConfig {
    fn default() -> Self {
        Self {
            console: Console::Nes,
            table: TableLocation::default(),
            source_layout: monster::source_layout(),
            target_layout: monster::target_layout(),
            scan_window: monster::scan_window(),
            confirm_window: monster::confirm_window(),
            target_window: monster::target_window(),
            mapping: FieldMapping::monster_v1(),
            locator: LocatorOptions::default()
                .with_max_records(Some(tablescan_core::locate::DEFAULT_MAX_RECORDS)),
            output_dir: PathBuf::from("out"),
        }
    }
}

impl TablescanConfig {
    pub fn builder() -> TablescanConfigBuilder {
        TablescanConfigBuilder::default()
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise built-in defaults. A missing file is
    /// not fatal; a malformed one is.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            warn!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.source_layout.validate()?;
        self.target_layout.validate()?;
        self.mapping.validate(&self.source_layout, &self.target_layout)?;
        Ok(())
    }
}

/// Builder applying command-line overrides on top of a loaded config
#[derive(Debug, Clone, Default)]
pub struct TablescanConfigBuilder {
    base: Option<TablescanConfig>,
    console: Option<Console>,
    file_offset: Option<usize>,
    min_run: Option<usize>,
    max_records: Option<usize>,
}

impl TablescanConfigBuilder {
    /// Start from `config` instead of the defaults
    pub fn base(mut self, config: TablescanConfig) -> Self {
        self.base = Some(config);
        self
    }

    pub fn console(mut self, console: Option<Console>) -> Self {
        self.console = console;
        self
    }

    pub fn file_offset(mut self, offset: Option<usize>) -> Self {
        self.file_offset = offset;
        self
    }

    pub fn min_run(mut self, min_run: Option<usize>) -> Self {
        self.min_run = min_run;
        self
    }

    pub fn max_records(mut self, max_records: Option<usize>) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn build(self) -> TablescanConfig {
        let mut config = self.base.unwrap_or_default();
        if let Some(console) = self.console {
            config.console = console;
        }
        if let Some(offset) = self.file_offset {
            config.table.file_offset = Some(offset);
        }
        if let Some(min_run) = self.min_run {
            config.locator = config.locator.with_min_run(min_run);
        }
        if let Some(max) = self.max_records {
            config.locator = config.locator.with_max_records(Some(max));
        }
        config
    }
}
