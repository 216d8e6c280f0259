use std::collections::HashMap;

use super::DmarcRecord;
use super::spf::starts_with_ignore_ascii_case;

/// First `v=DMARC1` record among `records`, with its policy tag parsed.
pub(crate) fn find(records: &[String]) -> Option<DmarcRecord> {
    let record = records
        .iter()
        .map(|record| record.trim())
        .find(|trimmed| starts_with_ignore_ascii_case(trimmed, "v=dmarc1"))?
        .to_string();

    let tags = parse_tags(&record);
    let policy = tags.get("p").map(|p| p.to_ascii_lowercase());
    Some(DmarcRecord { record, policy })
}

fn parse_tags(record: &str) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    for part in record.split(';') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (key, value) = trimmed.split_once('=').unwrap_or((trimmed, ""));
        tags.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
    }
    tags
}
