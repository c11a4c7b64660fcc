use super::record::ToolRecord;
use std::collections::HashMap;
use tracing::{debug, info};

/// Collapses records that share an identity key
///
/// Output order follows the first occurrence of each key. On a collision the
/// record with the strictly longer description wins, and the survivor's tags
/// become the union of both. Records without an identity key are dropped.
pub fn dedupe(records: &[ToolRecord]) -> Vec<ToolRecord> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<ToolRecord> = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for record in records {
        let key = record.identity_key();
        if key.is_empty() {
            dropped += 1;
            continue;
        }

        match index.get(&key) {
            Some(&slot) => reconcile(&mut unique[slot], record),
            None => {
                index.insert(key, unique.len());
                unique.push(record.clone());
            }
        }
    }

    if dropped > 0 {
        debug!("Dropped {} record(s) with neither url nor name", dropped);
    }
    info!(
        "Deduplicated {} record(s) into {}",
        records.len(),
        unique.len()
    );
    unique
}

fn reconcile(stored: &mut ToolRecord, incoming: &ToolRecord) {
    let mut tags = std::mem::take(&mut stored.tags);
    tags.extend(incoming.tags.iter().cloned());

    // The winner keeps its own unmodelled keys; the loser only fills gaps
    let loser_extra = if incoming.description_len() > stored.description_len() {
        std::mem::replace(stored, incoming.clone()).extra
    } else {
        incoming.extra.clone()
    };
    stored.absorb_extra(loser_extra);
    stored.tags = tags;
}
