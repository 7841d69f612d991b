//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::search::SearchResult;

/// JSON formatter - outputs the report with distances as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON report"
    }

    fn format(&self, result: &SearchResult, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(&result.report())?)
    }
}
