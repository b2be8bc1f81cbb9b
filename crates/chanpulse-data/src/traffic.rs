use std::collections::HashMap;

use chanpulse_core::{normalize_keyword, Month};

use crate::ingest::{parse_count, parse_optional_rank, Table};
use crate::store::MonthStore;
use crate::DataError;

pub const TRAFFIC_FILE: &str = "traffic.csv";

/// Monthly search-interest figures for one keyword, joined onto products by
/// normalized keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficRecord {
    pub keyword: String,
    pub search_volume: u64,
    pub search_rank: Option<u32>,
}

/// Load the companion search-volume export for `month`, keyed by normalized
/// keyword.
///
/// The file is optional: an absent `traffic.csv` yields an empty map and the
/// join simply leaves search fields at their zero/absent defaults. Malformed
/// rows are skipped and counted.
///
/// # Errors
///
/// Returns [`DataError`] only for a present-but-unreadable file.
pub fn load_traffic(
    store: &MonthStore,
    month: &Month,
) -> Result<(HashMap<String, TrafficRecord>, usize), DataError> {
    let path = store.raw_file(month, TRAFFIC_FILE);
    if !path.is_file() {
        return Ok((HashMap::new(), 0));
    }

    let table = Table::read(&path)?;
    let keyword_col = table.column("keyword")?;
    let volume_col = table.column("search_volume")?;
    let rank_col = table.column("search_rank")?;

    let mut map = HashMap::new();
    let mut skipped = 0usize;
    for record in table.records() {
        let keyword = table.cell(record, keyword_col);
        if keyword.is_empty() {
            skipped += 1;
            continue;
        }
        let Some(search_volume) = parse_count(table.cell(record, volume_col)) else {
            tracing::debug!(keyword, path = table.path(), "skipping malformed traffic row");
            skipped += 1;
            continue;
        };
        map.insert(
            normalize_keyword(keyword),
            TrafficRecord {
                keyword: keyword.to_string(),
                search_volume,
                search_rank: parse_optional_rank(table.cell(record, rank_col)),
            },
        );
    }

    Ok((map, skipped))
}
