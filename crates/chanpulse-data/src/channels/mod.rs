mod blog;
mod cafe;
mod news;
mod video;

use std::str::FromStr;

use serde::Serialize;

use chanpulse_core::Month;

use crate::ingest::Table;
use crate::store::MonthStore;
use crate::views::VolumeMetric;
use crate::DataError;

/// One marketing data source category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Blog,
    Cafe,
    News,
    Video,
}

impl Channel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Blog => "blog",
            Channel::Cafe => "cafe",
            Channel::News => "news",
            Channel::Video => "video",
        }
    }

    /// Raw export file carrying this channel's per-product activity.
    #[must_use]
    pub fn raw_file(self) -> &'static str {
        match self {
            Channel::Blog => "blog_rank.csv",
            Channel::Cafe => "cafe_rank.csv",
            Channel::News => "news_rank.csv",
            Channel::Video => "video_rank.csv",
        }
    }

    /// The volume metric used as the x axis in correlation views. Video
    /// activity volume is search-driven; the text channels use post counts.
    #[must_use]
    pub fn volume_metric(self) -> VolumeMetric {
        match self {
            Channel::Video => VolumeMetric::SearchVolume,
            Channel::Blog | Channel::Cafe | Channel::News => VolumeMetric::Posts,
        }
    }

    /// Whether the channel ships a per-contributor export. Only the blog
    /// export carries author rows; the other channels build empty author
    /// lists with the same dataset shape.
    #[must_use]
    pub fn author_capable(self) -> bool {
        matches!(self, Channel::Blog)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(Channel::Blog),
            "cafe" => Ok(Channel::Cafe),
            "news" => Ok(Channel::News),
            "video" => Ok(Channel::Video),
            _ => Err(()),
        }
    }
}

/// One activity row from a channel export, before catalog matching and
/// aggregation. `sub_type` carries the sub-channel label (e.g. hospital vs.
/// general blog) for channels that break volume down that way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub keyword: String,
    pub posts: u64,
    pub comments: u64,
    pub replies: u64,
    pub sub_type: Option<String>,
}

/// One contributor row from an author-capable channel export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRow {
    pub keyword: String,
    pub name: String,
    pub url: Option<String>,
    pub posts: u64,
}

/// Raw parse output of one channel-month, prior to assembly.
#[derive(Debug, Default)]
pub struct ChannelRows {
    pub activity: Vec<ActivityRow>,
    pub authors: Vec<AuthorRow>,
    /// Malformed rows dropped during parsing, retained for diagnostics.
    pub skipped: usize,
}

/// Parse the channel's raw export(s) for `month` into row records.
///
/// # Errors
///
/// Returns [`DataError`] when a required export file is missing or unreadable
/// — distinct from "month not available", which the resolver catches earlier.
pub fn parse_channel_rows(
    store: &MonthStore,
    channel: Channel,
    month: &Month,
) -> Result<ChannelRows, DataError> {
    let table = Table::read(&store.raw_file(month, channel.raw_file()))?;

    let mut rows = match channel {
        Channel::Blog => blog::parse_activity(&table)?,
        Channel::Cafe => cafe::parse_activity(&table)?,
        Channel::News => news::parse_activity(&table)?,
        Channel::Video => video::parse_activity(&table)?,
    };

    if channel.author_capable() {
        let authors_path = store.raw_file(month, blog::AUTHOR_FILE);
        if authors_path.is_file() {
            let author_table = Table::read(&authors_path)?;
            let (authors, skipped) = blog::parse_authors(&author_table)?;
            rows.authors = authors;
            rows.skipped += skipped;
        }
    }

    if rows.skipped > 0 {
        tracing::debug!(
            channel = %channel,
            month = %month,
            skipped = rows.skipped,
            "skipped malformed rows while parsing channel export"
        );
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_from_str_round_trips() {
        for channel in [Channel::Blog, Channel::Cafe, Channel::News, Channel::Video] {
            assert_eq!(channel.as_str().parse::<Channel>(), Ok(channel));
        }
        assert!("podcast".parse::<Channel>().is_err());
    }

    #[test]
    fn only_blog_is_author_capable() {
        assert!(Channel::Blog.author_capable());
        assert!(!Channel::Cafe.author_capable());
        assert!(!Channel::News.author_capable());
        assert!(!Channel::Video.author_capable());
    }

    #[test]
    fn video_correlates_on_search_volume() {
        assert_eq!(Channel::Video.volume_metric(), VolumeMetric::SearchVolume);
        assert_eq!(Channel::Blog.volume_metric(), VolumeMetric::Posts);
        assert_eq!(Channel::News.volume_metric(), VolumeMetric::Posts);
    }

    #[test]
    fn missing_export_file_is_a_build_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("raw").join("2025-09")).expect("mkdir");
        let store = MonthStore::new(dir.path());
        let month: Month = "2025-09".parse().expect("valid month");
        let err = parse_channel_rows(&store, Channel::Cafe, &month).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
