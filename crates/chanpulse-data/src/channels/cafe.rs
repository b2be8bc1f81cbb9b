//! Cafe export parsing: one row per keyword with post, comment, reply, and
//! view counts. Views are a presentation-only figure and are not carried into
//! the dataset.

use crate::ingest::{parse_count, Table};
use crate::DataError;

use super::{ActivityRow, ChannelRows};

pub fn parse_activity(table: &Table) -> Result<ChannelRows, DataError> {
    let keyword_col = table.column("keyword")?;
    let posts_col = table.column("posts")?;
    let comments_col = table.column("comments")?;
    let replies_col = table.column("replies")?;

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
            parse_count(table.cell(record, replies_col)),
        );
        let (Some(posts), Some(comments), Some(replies)) = parsed else {
            tracing::debug!(
                keyword,
                path = table.path(),
                "skipping malformed cafe activity row"
            );
            rows.skipped += 1;
            continue;
        };

        rows.activity.push(ActivityRow {
            keyword: keyword.to_string(),
            posts,
            comments,
            replies,
            sub_type: None,
        });
    }

    Ok(rows)
}
