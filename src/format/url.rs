//! URL output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::search::SearchResult;

/// URL formatter - one map link per hospital
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URLs with optional provider override
    pub fn format_with_provider(
        &self,
        result: &SearchResult,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        let mut output = String::new();
        for record in &result.facilities {
            let url = config.format_url(provider, record.location.lat, record.location.lng)?;
            output.push_str(&format!("{}\t{}\n", record.name, url));
        }
        Ok(output)
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map link for each hospital"
    }

    fn format(&self, result: &SearchResult, config: &Config) -> Result<String> {
        self.format_with_provider(result, config, None)
    }
}
