//! Video export parsing: upload counts plus a flat comment total per keyword.
//! The export has no reply breakdown, so engagement is comments alone.

use crate::ingest::{parse_count, Table};
use crate::DataError;

use super::{ActivityRow, ChannelRows};

pub fn parse_activity(table: &Table) -> Result<ChannelRows, DataError> {
    let keyword_col = table.column("keyword")?;
    let posts_col = table.column("posts")?;
    let comments_col = table.column("comments")?;

    let mut rows = ChannelRows::default();
    for record in table.records() {
        let keyword = table.cell(record, keyword_col);
        if keyword.is_empty() {
            rows.skipped += 1;
            continue;
        }

        let parsed = (
            parse_count(table.cell(record, posts_col)),
            parse_count(table.cell(record, comments_col)),
        );
        let (Some(posts), Some(comments)) = parsed else {
            tracing::debug!(
                keyword,
                path = table.path(),
                "skipping malformed video activity row"
            );
            rows.skipped += 1;
            continue;
        };

        rows.activity.push(ActivityRow {
            keyword: keyword.to_string(),
            posts,
            comments,
            replies: 0,
            sub_type: None,
        });
    }

    Ok(rows)
}
