use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use chanpulse_core::Month;
use chanpulse_data::views::{
    self, AuthorSummary, CorrelationPoint, Segments,
};
use chanpulse_data::{build_dataset, resolve, Author, Channel, Dataset, Product, SourceKind, Totals};

use crate::api::{run_blocking, ApiError, AppState};
use crate::middleware::RequestId;

/// Which projection of a channel dataset a request asks for. The resource
/// path segment is `{channel}-{view}`, e.g. `blog-products`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Products,
    Authors,
    Engagement,
}

fn parse_resource(resource: &str) -> Option<(Channel, View)> {
    let (channel, view) = resource.split_once('-')?;
    let channel: Channel = channel.parse().ok()?;
    let view = match view {
        "products" => View::Products,
        "authors" => View::Authors,
        "engagement" => View::Engagement,
        _ => return None,
    };
    Some((channel, view))
}

#[derive(Debug, Deserialize)]
pub(crate) struct MonthQuery {
    month: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Overview {
    total_products: usize,
    totals: Totals,
}

#[derive(Debug, Serialize)]
struct ProductsResponse {
    success: bool,
    month: Month,
    products: Vec<Product>,
    overview: Overview,
}

#[derive(Debug, Serialize)]
struct AuthorsResponse {
    success: bool,
    month: Month,
    authors: Vec<Author>,
    #[serde(flatten)]
    rollup: AuthorSummary,
}

#[derive(Debug, Serialize)]
struct EngagementResponse {
    success: bool,
    month: Month,
    correlation: Segments<CorrelationPoint>,
    leaderboard: Segments<Product>,
    totals: Totals,
}

pub async fn get_dataset(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(resource): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, ApiError> {
    let Some((channel, view)) = parse_resource(&resource) else {
        return Err(ApiError::not_found(format!("unknown resource: {resource}")));
    };

    let ctx = {
        let store = state.store.clone();
        let requested = query.month.clone();
        run_blocking(move || resolve(&store, requested.as_deref(), &[SourceKind::Raw])).await?
    };
    let Some(month) = ctx.resolved().cloned() else {
        return Err(ApiError::from_context(&ctx));
    };

    let dataset = {
        let store = state.store.clone();
        let catalog = Arc::clone(&state.catalog);
        let month = month.clone();
        run_blocking(move || build_dataset(&store, &catalog, channel, &month)).await?
    }
    .map_err(|e| {
        tracing::error!(
            request_id = req_id.0,
            channel = %channel,
            month = %month,
            error = %e,
            "dataset build failed"
        );
        ApiError::internal()
    })?;

    Ok(match view {
        View::Products => Json(products_response(dataset)).into_response(),
        View::Authors => Json(authors_response(dataset)).into_response(),
        View::Engagement => Json(engagement_response(channel, dataset)).into_response(),
    })
}

fn products_response(dataset: Dataset) -> ProductsResponse {
    ProductsResponse {
        success: true,
        month: dataset.month,
        overview: Overview {
            total_products: dataset.products.len(),
            totals: dataset.totals,
        },
        products: dataset.products,
    }
}

fn authors_response(dataset: Dataset) -> AuthorsResponse {
    let rollup = views::summarize_authors(&dataset.authors);
    AuthorsResponse {
        success: true,
        month: dataset.month,
        authors: dataset.authors,
        rollup,
    }
}

fn engagement_response(channel: Channel, dataset: Dataset) -> EngagementResponse {
    let metric = channel.volume_metric();
    let segments = views::segment(&dataset.products);

    EngagementResponse {
        success: true,
        month: dataset.month,
        correlation: Segments {
            all: views::correlate(&segments.all, metric),
            rf: views::correlate(&segments.rf, metric),
            hifu: views::correlate(&segments.hifu, metric),
        },
        leaderboard: Segments {
            all: views::leaderboard(&segments.all),
            rf: views::leaderboard(&segments.rf),
            hifu: views::leaderboard(&segments.hifu),
        },
        totals: dataset.totals,
    }
}
