// This module turns multi-value fields into something that fits in a single csv cell.
use itertools::Itertools;

use crate::records::{GtmEvents, Record};

/// Joins list-valued `gtmEvents` with commas. Order and count of records are preserved
/// and no other field is touched. Already joined values are left as they are.
pub fn flatten(records: Vec<Record>) -> Vec<Record> {
    records.into_iter().map(flatten_record).collect()
}

fn flatten_record(mut record: Record) -> Record {
    if let Some(GtmEvents::List(events)) = &record.gtm_events {
        record.gtm_events = Some(GtmEvents::Joined(events.iter().join(",")));
    }
    record
}
