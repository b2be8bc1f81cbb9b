//! News export parsing: article volume only. The news channel has no comment
//! thread structure, so engagement fields read as zero.

use crate::ingest::{parse_count, Table};
use crate::DataError;

use super::{ActivityRow, ChannelRows};

pub fn parse_activity(table: &Table) -> Result<ChannelRows, DataError> {
    let keyword_col = table.column("keyword")?;
    let posts_col = table.column("posts")?;

    let mut rows = ChannelRows::default();
    for record in table.records() {
        let keyword = table.cell(record, keyword_col);
        if keyword.is_empty() {
            rows.skipped += 1;
            continue;
        }

        let Some(posts) = parse_count(table.cell(record, posts_col)) else {
            tracing::debug!(
                keyword,
                path = table.path(),
                "skipping malformed news activity row"
            );
            rows.skipped += 1;
            continue;
        };

        rows.activity.push(ActivityRow {
            keyword: keyword.to_string(),
            posts,
            comments: 0,
            replies: 0,
            sub_type: None,
        });
    }

    Ok(rows)
}
