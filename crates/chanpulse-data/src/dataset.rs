use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use chanpulse_core::{normalize_keyword, Catalog, Month, Technology};

use crate::channels::{parse_channel_rows, AuthorRow, Channel, ChannelRows};
use crate::store::MonthStore;
use crate::traffic::{load_traffic, TrafficRecord};
use crate::views;
use crate::DataError;

/// One tracked product's aggregated activity for a channel-month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog display keyword (the raw export's spelling is normalized away).
    pub keyword: String,
    pub technology: Technology,
    /// 1-based position by volume; `None` for products with no activity.
    pub rank: Option<u32>,
    pub total_posts: u64,
    pub total_comments: u64,
    pub total_replies: u64,
    /// Comments plus replies.
    pub total_engagement: u64,
    /// Percentage share of the channel-month's post volume; the shares of one
    /// dataset sum to 100 within rounding tolerance.
    pub participation: f64,
    pub search_volume: u64,
    pub search_rank: Option<u32>,
    /// `search_volume / total_posts`, defined as 0 when there are no posts.
    pub search_to_post_ratio: f64,
    /// Sub-channel labels that contributed volume (blog only), sorted.
    pub blog_types: Vec<String>,
    pub is_asterasys: bool,
}

/// One contributor scoped to a single product within a channel-month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Keyword of the product this contributor was observed under.
    pub product: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub total_posts: u64,
    /// Product-local 1-based position; unique within the product only.
    pub rank: Option<u32>,
    pub is_asterasys: bool,
}

/// Channel-wide sums over a dataset's full product list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_posts: u64,
    pub total_comments: u64,
    pub total_replies: u64,
    pub total_engagement: u64,
    pub search_volume: u64,
    pub asterasys_posts: u64,
    pub asterasys_engagement: u64,
    /// Monitored products' percentage share of channel post volume.
    pub asterasys_share: f64,
}

/// The per-request unit of work: one channel-month, built fresh from source
/// files on every request and never cached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub month: Month,
    pub products: Vec<Product>,
    pub authors: Vec<Author>,
    pub totals: Totals,
    /// Rows dropped during parsing (malformed or outside the catalog),
    /// retained for diagnostics and never surfaced as a failure.
    pub skipped_rows: usize,
}

/// Build one channel's dataset for `month`.
///
/// The caller is expected to have already resolved the month via
/// [`crate::resolve`]; a missing raw export at this point is a genuine build
/// failure, not an availability miss.
///
/// # Errors
///
/// Returns [`DataError`] if a required export is missing or unreadable.
pub fn build_dataset(
    store: &MonthStore,
    catalog: &Catalog,
    channel: Channel,
    month: &Month,
) -> Result<Dataset, DataError> {
    let rows = parse_channel_rows(store, channel, month)?;
    let (traffic, traffic_skipped) = load_traffic(store, month)?;
    Ok(assemble(catalog, month.clone(), rows, &traffic, traffic_skipped))
}

struct ProductAccum<'c> {
    keyword: &'c str,
    technology: Technology,
    monitored: bool,
    posts: u64,
    comments: u64,
    replies: u64,
    blog_types: BTreeSet<String>,
}

/// Assemble parsed rows into a normalized dataset: catalog matching,
/// aggregation, search join, ranking, and participation shares.
pub(crate) fn assemble(
    catalog: &Catalog,
    month: Month,
    rows: ChannelRows,
    traffic: &HashMap<String, TrafficRecord>,
    extra_skipped: usize,
) -> Dataset {
    let mut skipped = rows.skipped + extra_skipped;
    let mut accums: HashMap<String, ProductAccum<'_>> = HashMap::new();

    for row in &rows.activity {
        let Some(entry) = catalog.lookup(&row.keyword) else {
            tracing::debug!(keyword = row.keyword, "dropping row for unknown keyword");
            skipped += 1;
            continue;
        };

        let accum = accums
            .entry(normalize_keyword(&entry.keyword))
            .or_insert_with(|| ProductAccum {
                keyword: &entry.keyword,
                technology: entry.technology,
                monitored: entry.monitored,
                posts: 0,
                comments: 0,
                replies: 0,
                blog_types: BTreeSet::new(),
            });
        accum.posts += row.posts;
        accum.comments += row.comments;
        accum.replies += row.replies;
        if let Some(sub_type) = &row.sub_type {
            accum.blog_types.insert(sub_type.clone());
        }
    }

    let mut products: Vec<Product> = accums
        .into_iter()
        .map(|(normalized, accum)| {
            let total_engagement = accum.comments + accum.replies;
            let joined = traffic.get(&normalized);
            let search_volume = joined.map_or(0, |t| t.search_volume);
            #[allow(clippy::cast_precision_loss)]
            let search_to_post_ratio = if accum.posts > 0 {
                search_volume as f64 / accum.posts as f64
            } else {
                0.0
            };

            Product {
                keyword: accum.keyword.to_string(),
                technology: accum.technology,
                rank: None,
                total_posts: accum.posts,
                total_comments: accum.comments,
                total_replies: accum.replies,
                total_engagement,
                participation: 0.0,
                search_volume,
                search_rank: joined.and_then(|t| t.search_rank),
                search_to_post_ratio,
                blog_types: accum.blog_types.into_iter().collect(),
                is_asterasys: accum.monitored,
            }
        })
        .collect();

    // Deterministic ranking order: volume desc, engagement desc, keyword asc.
    // Inactive products (no posts, no engagement) sort behind every active one
    // and stay unranked.
    products.sort_by(views::rank_order);
    let mut next_rank = 0u32;
    for product in &mut products {
        if product.total_posts > 0 || product.total_engagement > 0 {
            next_rank += 1;
            product.rank = Some(next_rank);
        }
    }

    let post_sum: u64 = products.iter().map(|p| p.total_posts).sum();
    if post_sum > 0 {
        #[allow(clippy::cast_precision_loss)]
        for product in &mut products {
            product.participation = 100.0 * product.total_posts as f64 / post_sum as f64;
        }
    }

    let (authors, author_skipped) = assemble_authors(catalog, &rows.authors);
    skipped += author_skipped;

    let totals = views::summarize(&products);

    Dataset {
        month,
        products,
        authors,
        totals,
        skipped_rows: skipped,
    }
}

fn assemble_authors(catalog: &Catalog, rows: &[AuthorRow]) -> (Vec<Author>, usize) {
    let mut skipped = 0usize;
    let mut authors: Vec<Author> = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(entry) = catalog.lookup(&row.keyword) else {
            tracing::debug!(keyword = row.keyword, "dropping author row for unknown keyword");
            skipped += 1;
            continue;
        };
        authors.push(Author {
            product: entry.keyword.clone(),
            name: row.name.clone(),
            url: row.url.clone(),
            total_posts: row.posts,
            rank: None,
            is_asterasys: entry.monitored,
        });
    }

    // Product-local ranks use the same volume-then-alphabetical rule as the
    // product ranking, scoped to one product at a time.
    authors.sort_by(|a, b| {
        a.product
            .cmp(&b.product)
            .then_with(|| b.total_posts.cmp(&a.total_posts))
            .then_with(|| a.name.cmp(&b.name))
    });
    let mut current_product = String::new();
    let mut next_rank = 0u32;
    for author in &mut authors {
        if author.product != current_product {
            current_product.clone_from(&author.product);
            next_rank = 0;
        }
        if author.total_posts > 0 {
            next_rank += 1;
            author.rank = Some(next_rank);
        }
    }

    (authors, skipped)
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
