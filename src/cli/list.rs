//! List command.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use super::OutputFormat;
use crate::config::MaintainersConfig;
use crate::data::ListReport;
use crate::matcher::is_file_name_match;
use crate::resolve::ResolvedSet;

/// Lists segments, optionally only those owning a path.
#[derive(Parser)]
pub struct ListCommand {
    /// Only list segments whose file rules match this path.
    pub path: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl ListCommand {
    /// Executes the list command.
    pub fn execute(self, config: &MaintainersConfig) -> Result<()> {
        let output = self.render(config)?;
        print!("{output}");
        Ok(())
    }

    /// Builds the report text without printing it.
    pub fn render(&self, config: &MaintainersConfig) -> Result<String> {
        let path = self.path.as_deref();
        let segments: ResolvedSet = config
            .segments()
            .iter()
            .filter(|segment| path.map_or(true, |p| is_file_name_match(segment, p)))
            .collect();
        debug!(path, matched = segments.len(), "Listing segments");

        self.format.render(&ListReport::new(path, &segments))
    }
}
