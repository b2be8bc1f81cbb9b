use chanpulse_core::Technology;

use super::*;

fn product(keyword: &str, technology: Technology, rank: Option<u32>, posts: u64) -> Product {
    Product {
        keyword: keyword.to_string(),
        technology,
        rank,
        total_posts: posts,
        total_comments: posts / 2,
        total_replies: 0,
        total_engagement: posts / 2,
        participation: 0.0,
        search_volume: posts * 10,
        search_rank: None,
        search_to_post_ratio: 0.0,
        blog_types: vec![],
        is_asterasys: false,
    }
}

fn author(product: &str, name: &str, rank: Option<u32>, monitored: bool) -> Author {
    Author {
        product: product.to_string(),
        name: name.to_string(),
        url: None,
        total_posts: 5,
        rank,
        is_asterasys: monitored,
    }
}

#[test]
fn segments_partition_the_product_list() {
    let products = vec![
        product("coolphase", Technology::Rf, Some(2), 10),
        product("shrink", Technology::Hifu, Some(1), 20),
        product("thermage", Technology::Rf, Some(3), 5),
    ];
    let segments = segment(&products);

    assert_eq!(segments.all.len(), 3);
    assert_eq!(segments.rf.len() + segments.hifu.len(), segments.all.len());
    assert!(segments.rf.iter().all(|p| p.technology == Technology::Rf));
    assert!(segments.hifu.iter().all(|p| p.technology == Technology::Hifu));
    // Relative order within a segment follows the input list.
    assert_eq!(segments.rf[0].keyword, "coolphase");
    assert_eq!(segments.rf[1].keyword, "thermage");
}

#[test]
fn correlation_keeps_zero_volume_points_in_input_order() {
    let mut ghost = product("ulthera", Technology::Hifu, None, 0);
    ghost.total_engagement = 0;
    let products = vec![product("shrink", Technology::Hifu, Some(1), 20), ghost];

    let points = correlate(&products, VolumeMetric::Posts);
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].keyword, "shrink");
    assert_eq!(points[0].x, 20);
    assert_eq!(points[0].y, 10);
    assert_eq!(points[1].x, 0);
    assert_eq!(points[1].y, 0);
}

#[test]
fn correlation_volume_axis_follows_the_metric() {
    let products = vec![product("shrink", Technology::Hifu, Some(1), 20)];
    assert_eq!(correlate(&products, VolumeMetric::Posts)[0].x, 20);
    assert_eq!(correlate(&products, VolumeMetric::SearchVolume)[0].x, 200);
}

#[test]
fn leaderboard_sorts_by_rank_with_unranked_last() {
    let products = vec![
        product("ulthera", Technology::Hifu, None, 0),
        product("coolphase", Technology::Rf, Some(2), 10),
        product("shrink", Technology::Hifu, Some(1), 20),
    ];
    let board = leaderboard(&products);
    let order: Vec<&str> = board.iter().map(|p| p.keyword.as_str()).collect();
    assert_eq!(order, vec!["shrink", "coolphase", "ulthera"]);

    // Idempotent: reordering a leaderboard changes nothing.
    let again = leaderboard(&board);
    let same: Vec<&str> = again.iter().map(|p| p.keyword.as_str()).collect();
    assert_eq!(same, order);
}

#[test]
fn unranked_ties_fall_back_to_keyword_order() {
    let products = vec![
        product("ulthera", Technology::Hifu, None, 0),
        product("linearfirm", Technology::Hifu, None, 0),
    ];
    let board = leaderboard(&products);
    assert_eq!(board[0].keyword, "linearfirm");
    assert_eq!(board[1].keyword, "ulthera");
}

#[test]
fn summarize_sums_every_product_and_monitored_share() {
    let mut monitored = product("coolphase", Technology::Rf, Some(2), 30);
    monitored.is_asterasys = true;
    let products = vec![monitored, product("shrink", Technology::Hifu, Some(1), 70)];

    let totals = summarize(&products);
    assert_eq!(totals.total_posts, 100);
    assert_eq!(totals.total_engagement, 50);
    assert_eq!(totals.search_volume, 1000);
    assert_eq!(totals.asterasys_posts, 30);
    assert!((totals.asterasys_share - 30.0).abs() < 1e-9);
}

#[test]
fn summarize_of_empty_list_is_all_zeros() {
    let totals = summarize(&[]);
    assert_eq!(totals, Totals::default());
}

#[test]
fn author_summary_groups_counts_and_selects_top_ten() {
    let authors = vec![
        author("shrink", "beauty-clinic", Some(1), false),
        author("shrink", "derma-note", Some(11), false),
        author("coolphase", "skin-lab", Some(1), true),
        author("coolphase", "aesthetic-diary", Some(2), true),
        author("shrink", "ghost-writer", None, false),
    ];
    let summary = summarize_authors(&authors);

    assert_eq!(summary.summary.total, 5);
    assert_eq!(summary.summary.asterasys, 2);
    assert_eq!(summary.grouped.len(), 2);
    assert_eq!(summary.grouped["shrink"].len(), 3);

    // Rank 11 and unranked contributors fall outside the top list; the two
    // rank-1 holders from different products both appear.
    let names: Vec<&str> = summary.top_authors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["beauty-clinic", "skin-lab", "aesthetic-diary"]);
}
