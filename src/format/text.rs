//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::search::SearchResult;

/// Text formatter - one numbered entry per hospital, in service order
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable list"
    }

    fn format(&self, result: &SearchResult, _config: &Config) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "Hospitals near {} within {}m\n",
            result.origin, result.radius
        ));
        output.push_str(&format!("{}\n", result.summary()));

        for (idx, entry) in result.annotated().iter().enumerate() {
            let record = entry.record;
            output.push_str(&format!("\n{:>3}. {}\n", idx + 1, record.name));

            let meta = [record.street(), Some(entry.distance_label())]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" - ");
            if !meta.is_empty() {
                output.push_str(&format!("     {}\n", meta));
            }

            if let Some(phone) = record.phone() {
                output.push_str(&format!("     Phone: {}\n", phone));
            }
            if record.has_emergency() {
                output.push_str("     Emergency department\n");
            }
        }

        Ok(output)
    }
}
