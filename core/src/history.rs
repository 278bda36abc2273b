use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Win/loss classification stored in the past-results list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Win,
    Loss,
}

/// One finished round, as kept in the player's JSON-encoded history list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: String,
    pub result: RoundResult,
    pub solution: String,
}

/// Appends `record` to a JSON-encoded list of past results. A missing or
/// empty list reads as `[]`; the list is only ever appended to.
pub fn append_record(existing: Option<&str>, record: GameRecord) -> serde_json::Result<String> {
    let mut records = match existing {
        Some(raw) if !raw.is_empty() => decode_records(raw)?,
        _ => Vec::new(),
    };
    records.push(record);
    serde_json::to_string(&records)
}

pub fn decode_records(raw: &str) -> serde_json::Result<Vec<GameRecord>> {
    serde_json::from_str(raw)
}
