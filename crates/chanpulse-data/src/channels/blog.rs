//! Blog export parsing.
//!
//! The blog export is grouped: a product's first row carries the keyword and
//! subsequent sub-type rows (hospital, place, general) leave the keyword cell
//! blank, so parsing carries the last seen keyword forward. The companion
//! author export uses the same carry-forward convention.

use crate::ingest::{parse_count, Table};
use crate::DataError;

use super::{ActivityRow, AuthorRow, ChannelRows};

pub const AUTHOR_FILE: &str = "blog_user_rank.csv";

pub fn parse_activity(table: &Table) -> Result<ChannelRows, DataError> {
    let keyword_col = table.column("keyword")?;
    let type_col = table.column("blog_type")?;
    let posts_col = table.column("posts")?;
    let comments_col = table.column("comments")?;
    let replies_col = table.column("replies")?;

    let mut rows = ChannelRows::default();
    let mut current_keyword = String::new();

    for record in table.records() {
        let cell = table.cell(record, keyword_col);
        if !cell.is_empty() {
            current_keyword = cell.to_string();
        }
        if current_keyword.is_empty() {
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
                keyword = current_keyword,
                path = table.path(),
                "skipping malformed blog activity row"
            );
            rows.skipped += 1;
            continue;
        };

        let sub_type = {
            let label = table.cell(record, type_col);
            (!label.is_empty()).then(|| label.to_string())
        };

        rows.activity.push(ActivityRow {
            keyword: current_keyword.clone(),
            posts,
            comments,
            replies,
            sub_type,
        });
    }

    Ok(rows)
}

pub fn parse_authors(table: &Table) -> Result<(Vec<AuthorRow>, usize), DataError> {
    let keyword_col = table.column("keyword")?;
    let author_col = table.column("author")?;
    let url_col = table.column("url")?;
    let posts_col = table.column("posts")?;

    let mut authors = Vec::new();
    let mut skipped = 0usize;
    let mut current_keyword = String::new();

    for record in table.records() {
        let cell = table.cell(record, keyword_col);
        if !cell.is_empty() {
            current_keyword = cell.to_string();
        }
        let name = table.cell(record, author_col);
        if current_keyword.is_empty() || name.is_empty() {
            skipped += 1;
            continue;
        }

        let Some(posts) = parse_count(table.cell(record, posts_col)) else {
            tracing::debug!(
                keyword = current_keyword,
                author = name,
                path = table.path(),
                "skipping malformed blog author row"
            );
            skipped += 1;
            continue;
        };

        let url = {
            let raw = table.cell(record, url_col);
            (!raw.is_empty()).then(|| raw.to_string())
        };

        authors.push(AuthorRow {
            keyword: current_keyword.clone(),
            name: name.to_string(),
            url,
            posts,
        });
    }

    Ok((authors, skipped))
}
