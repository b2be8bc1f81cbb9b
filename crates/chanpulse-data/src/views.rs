//! Derived read views over a built [`Dataset`]: technology segments,
//! volume/engagement correlation points, leaderboards, and rollup summaries.
//! Every function here is a pure transformation of the product list.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use chanpulse_core::Technology;

use crate::dataset::{Author, Product, Totals};

/// Which per-product figure serves as the volume axis of a correlation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeMetric {
    Posts,
    SearchVolume,
}

/// A dataset's product list split by device technology. `all` keeps the
/// original list; `rf` and `hifu` partition it, so their concatenation is a
/// permutation of `all`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Segments<T> {
    pub all: Vec<T>,
    pub rf: Vec<T>,
    pub hifu: Vec<T>,
}

/// Split products into technology segments, preserving relative order.
#[must_use]
pub fn segment(products: &[Product]) -> Segments<Product> {
    let mut rf = Vec::new();
    let mut hifu = Vec::new();
    for product in products {
        match product.technology {
            Technology::Rf => rf.push(product.clone()),
            Technology::Hifu => hifu.push(product.clone()),
        }
    }
    Segments {
        all: products.to_vec(),
        rf,
        hifu,
    }
}

/// One point on a volume/engagement scatter view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationPoint {
    pub keyword: String,
    pub technology: Technology,
    /// Volume axis: posts or search volume, depending on the channel.
    pub x: u64,
    /// Engagement axis: comments plus replies.
    pub y: u64,
    pub is_asterasys: bool,
}

/// Map products to correlation points in input order. Zero-volume products are
/// kept so the view shows the full competitive field, not just active names.
#[must_use]
pub fn correlate(products: &[Product], metric: VolumeMetric) -> Vec<CorrelationPoint> {
    products
        .iter()
        .map(|product| CorrelationPoint {
            keyword: product.keyword.clone(),
            technology: product.technology,
            x: match metric {
                VolumeMetric::Posts => product.total_posts,
                VolumeMetric::SearchVolume => product.search_volume,
            },
            y: product.total_engagement,
            is_asterasys: product.is_asterasys,
        })
        .collect()
}

/// Total ordering used for ranked product listings: rank ascending with
/// unranked products last, then posts descending, engagement descending, and
/// keyword ascending so equal rows still land in one deterministic order.
pub(crate) fn rank_order(a: &Product, b: &Product) -> Ordering {
    let rank_key = |p: &Product| p.rank.unwrap_or(u32::MAX);
    rank_key(a)
        .cmp(&rank_key(b))
        .then_with(|| b.total_posts.cmp(&a.total_posts))
        .then_with(|| b.total_engagement.cmp(&a.total_engagement))
        .then_with(|| a.keyword.cmp(&b.keyword))
}

/// Order products into a leaderboard. Sorting an already sorted leaderboard is
/// a no-op; the ordering has no ties left to break arbitrarily.
#[must_use]
pub fn leaderboard(products: &[Product]) -> Vec<Product> {
    let mut board = products.to_vec();
    board.sort_by(rank_order);
    board
}

/// Sum a product list into channel totals, including the monitored brand's
/// share of post volume.
#[must_use]
pub fn summarize(products: &[Product]) -> Totals {
    let mut totals = Totals::default();
    for product in products {
        totals.total_posts += product.total_posts;
        totals.total_comments += product.total_comments;
        totals.total_replies += product.total_replies;
        totals.total_engagement += product.total_engagement;
        totals.search_volume += product.search_volume;
        if product.is_asterasys {
            totals.asterasys_posts += product.total_posts;
            totals.asterasys_engagement += product.total_engagement;
        }
    }
    if totals.total_posts > 0 {
        #[allow(clippy::cast_precision_loss)]
        {
            totals.asterasys_share =
                100.0 * totals.asterasys_posts as f64 / totals.total_posts as f64;
        }
    }
    totals
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCounts {
    pub total: usize,
    pub asterasys: usize,
}

/// Contributor rollup for an author-capable channel-month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    /// Authors grouped by product keyword, each group in rank order.
    pub grouped: BTreeMap<String, Vec<Author>>,
    pub summary: AuthorCounts,
    /// Contributors holding a top-ten slot in any product, ordered by their
    /// product-local rank. Ranks from different products are listed as-is.
    pub top_authors: Vec<Author>,
}

/// Build the contributor rollup from a dataset's author list.
#[must_use]
pub fn summarize_authors(authors: &[Author]) -> AuthorSummary {
    let mut grouped: BTreeMap<String, Vec<Author>> = BTreeMap::new();
    for author in authors {
        grouped
            .entry(author.product.clone())
            .or_default()
            .push(author.clone());
    }

    let summary = AuthorCounts {
        total: authors.len(),
        asterasys: authors.iter().filter(|a| a.is_asterasys).count(),
    };

    let mut top_authors: Vec<Author> = authors
        .iter()
        .filter(|a| a.rank.is_some_and(|r| r <= 10))
        .cloned()
        .collect();
    top_authors.sort_by(|a, b| {
        let rank_key = |author: &Author| author.rank.unwrap_or(u32::MAX);
        rank_key(a)
            .cmp(&rank_key(b))
            .then_with(|| b.total_posts.cmp(&a.total_posts))
            .then_with(|| a.name.cmp(&b.name))
    });

    AuthorSummary {
        grouped,
        summary,
        top_authors,
    }
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;
