//! GPX output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::search::SearchResult;

/// GPX formatter - origin plus one waypoint per hospital
pub struct GpxFormatter;

/// Escape text for XML element content
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoint file"
    }

    fn format(&self, result: &SearchResult, _config: &Config) -> Result<String> {
        let mut gpx = String::new();

        // XML header
        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="hosp-locate">"#);
        gpx.push('\n');

        // Metadata
        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!("    <name>hosp-locate search {}</name>\n", result.id));
        gpx.push_str(&format!("    <time>{}</time>\n", result.timestamp));
        gpx.push_str("  </metadata>\n");

        // Origin waypoint
        gpx.push_str(&format!(
            r#"  <wpt lat="{}" lon="{}">"#,
            result.origin.lat, result.origin.lng
        ));
        gpx.push('\n');
        gpx.push_str("    <name>You are here</name>\n");
        gpx.push_str(&format!(
            "    <desc>Search radius: {}m</desc>\n",
            result.radius
        ));
        gpx.push_str("  </wpt>\n");

        for entry in result.annotated() {
            let record = entry.record;
            gpx.push_str(&format!(
                r#"  <wpt lat="{}" lon="{}">"#,
                record.location.lat, record.location.lng
            ));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>{}</name>\n", escape(&record.name)));

            let desc = [record.phone().map(str::to_string), Some(entry.distance_label())]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            if !desc.is_empty() {
                gpx.push_str(&format!("    <desc>{}</desc>\n", escape(&desc)));
            }

            gpx.push_str(&format!("    <link href=\"{}\"/>\n", record.id.osm_url()));
            gpx.push_str("    <sym>hospital</sym>\n");
            gpx.push_str("  </wpt>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
