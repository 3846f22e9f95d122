use super::{Row, raw_dataset};
use crate::error::EdaError;
use crate::pipeline::*;
use anyhow::Result;
use polars::prelude::*;

fn cleaned(rows: &[Row<'_>]) -> Result<CleanDataset> {
    let (dataset, _) = clean(raw_dataset(rows)?, ParsePolicy::Fail)?;
    Ok(dataset)
}

const SAMPLE: [Row<'static>; 7] = [
    ["Pixel Dash", "Games", "4.3", "2000", "100,000+", "$0", "Arcade"],
    ["Hex Solver", "Games", "4.8", "150", "10,000+", "$1.99", "Puzzle"],
    ["Quick Notes", "Tools", "4.2", "80", "10,000+", "$0", "Tools"],
    ["Star Quest", "Games", "4.8", "900", "50,000+", "$2.99", "Arcade"],
    ["Byte Clean", "Tools", "3.9", "40", "1,000+", "$0.99", "Tools"],
    ["Word Nest", "Family", "4.0", "10", "1,000+", "$4.99", "Puzzle"],
    ["Tiny Farm", "Family", "3.6", "12", "10,000+", "$0", "Simulation"],
];

#[test]
fn test_top_rated_two_categories() -> Result<()> {
    let dataset = cleaned(&[
        ["A", "Games", "4.5", "10", "100+", "$0", "Arcade"],
        ["B", "Tools", "4.2", "10", "100+", "$0", "Tools"],
        ["C", "Games", "4.8", "10", "100+", "$0", "Arcade"],
        ["D", "Tools", "3.1", "10", "100+", "$0", "Tools"],
    ])?;

    let top = top_rated_by_category(&dataset)?;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].category, "Games");
    assert_eq!(top[0].app, "C");
    assert_eq!(top[0].rating, 4.8);
    assert_eq!(top[1].category, "Tools");
    assert_eq!(top[1].app, "B");
    Ok(())
}

#[test]
fn test_top_rated_first_occurrence_wins_ties() -> Result<()> {
    let dataset = cleaned(&SAMPLE)?;

    let top = top_rated_by_category(&dataset)?;
    let games = top.iter().find(|r| r.category == "Games");
    // Hex Solver and Star Quest share 4.8; Hex Solver comes first.
    assert_eq!(games.map(|r| r.app.as_str()), Some("Hex Solver"));
    Ok(())
}

#[test]
fn test_top_rated_matches_partition_maximum() -> Result<()> {
    let dataset = cleaned(&SAMPLE)?;
    let records = dataset.records()?;
    let top = top_rated_by_category(&dataset)?;

    let mut categories: Vec<&str> = records.iter().map(|r| r.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();
    assert_eq!(top.len(), categories.len());

    for winner in &top {
        let expected = records
            .iter()
            .filter(|r| r.category == winner.category)
            .fold(None::<&Record>, |best, r| match best {
                Some(b) if b.rating >= r.rating => Some(b),
                _ => Some(r),
            });
        assert_eq!(Some(winner), expected);
    }

    for pair in top.windows(2) {
        assert!(pair[0].rating >= pair[1].rating);
    }
    Ok(())
}

#[test]
fn test_top_rated_equal_ratings_ordered_by_category() -> Result<()> {
    let dataset = cleaned(&[
        ["T", "Tools", "4.0", "1", "10+", "$0", "Tools"],
        ["A", "Art", "4.0", "1", "10+", "$0", "Art"],
    ])?;

    let top = top_rated_by_category(&dataset)?;
    let order: Vec<&str> = top.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(order, vec!["Art", "Tools"]);
    Ok(())
}

#[test]
fn test_category_counts() -> Result<()> {
    let dataset = cleaned(&SAMPLE)?;

    let counts = category_counts(&dataset)?;
    let counts: Vec<(&str, u64)> = counts.iter().map(|c| (c.category.as_str(), c.apps)).collect();
    // Tools and Family tie on count and are ordered by name.
    assert_eq!(counts, vec![("Games", 3), ("Family", 2), ("Tools", 2)]);
    Ok(())
}

#[test]
fn test_average_rating_by_category() -> Result<()> {
    let dataset = cleaned(&[
        ["A", "Games", "4.5", "1", "10+", "$0", "Arcade"],
        ["B", "Games", "4.0", "1", "10+", "$0", "Arcade"],
        ["C", "Tools", "5.0", "1", "10+", "$0", "Tools"],
        ["D", "Family", "3.0", "1", "10+", "$0", "Puzzle"],
    ])?;

    let ratings = average_rating_by_category(&dataset)?;
    assert_eq!(ratings.len(), 3);
    assert_eq!(ratings[0].category, "Tools");
    assert_eq!(ratings[1].category, "Games");
    assert_eq!(ratings[1].mean_rating, 4.25);
    assert_eq!(ratings[1].apps, 2);
    assert_eq!(ratings[2].category, "Family");
    Ok(())
}

#[test]
fn test_average_rating_ties_ordered_by_category() -> Result<()> {
    let dataset = cleaned(&[
        ["A", "Tools", "4.0", "1", "10+", "$0", "Tools"],
        ["B", "Games", "4.5", "1", "10+", "$0", "Arcade"],
        ["C", "Art", "4.0", "1", "10+", "$0", "Art"],
    ])?;

    let ratings = average_rating_by_category(&dataset)?;
    let order: Vec<&str> = ratings.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(order, vec!["Games", "Art", "Tools"]);
    Ok(())
}

#[test]
fn test_top_rated_with_colliding_extra_column() -> Result<()> {
    let df = df!(
        "App" => &["A", "B"],
        "Category" => &["Games", "Games"],
        "Rating" => &["4.1", "4.6"],
        "Reviews" => &["1", "2"],
        "Installs" => &["10+", "10+"],
        "Price" => &["$0", "$0"],
        "Genres" => &["Arcade", "Arcade"],
        "__row" => &["x", "y"]
    )?;
    let (dataset, _) = clean(Dataset::new(df)?, ParsePolicy::Fail)?;

    let top = top_rated_by_category(&dataset)?;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].app, "B");
    Ok(())
}

#[test]
fn test_rating_by_installs_sorted_by_tier() -> Result<()> {
    let dataset = cleaned(&SAMPLE)?;

    let tiers = rating_by_installs(&dataset)?;
    let installs: Vec<i64> = tiers.iter().map(|t| t.installs).collect();
    assert_eq!(installs, vec![1_000, 10_000, 50_000, 100_000]);

    let ten_k = &tiers[1];
    assert_eq!(ten_k.apps, 3);
    assert!((ten_k.mean_rating - 4.2).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_revenue_is_price_times_installs() -> Result<()> {
    let dataset = compute_revenue(cleaned(&SAMPLE)?)?;

    for record in dataset.records()? {
        assert_eq!(record.revenue, Some(record.price * record.installs as f64));
    }
    Ok(())
}

#[test]
fn test_compute_revenue_overwrites_existing_column() -> Result<()> {
    let once = compute_revenue(cleaned(&SAMPLE)?)?;
    let width = once.frame().width();

    let twice = compute_revenue(once.clone())?;
    assert_eq!(twice.frame().width(), width);
    assert_eq!(twice.records()?, once.records()?);
    Ok(())
}

#[test]
fn test_revenue_by_genre() -> Result<()> {
    let dataset = compute_revenue(cleaned(&SAMPLE)?)?;

    let genres = revenue_by_genre(&dataset)?;
    assert_eq!(genres.len(), 4);
    assert_eq!(genres[0].genre, "Arcade");
    assert_eq!(genres[0].revenue, 2.99 * 50_000.0);

    let puzzle = genres.iter().find(|g| g.genre == "Puzzle");
    assert_eq!(
        puzzle.map(|g| g.revenue),
        Some(1.99 * 10_000.0 + 4.99 * 1_000.0)
    );

    for pair in genres.windows(2) {
        assert!(pair[0].revenue >= pair[1].revenue);
    }
    Ok(())
}

#[test]
fn test_revenue_by_genre_requires_revenue() -> Result<()> {
    let dataset = cleaned(&SAMPLE)?;

    let result = revenue_by_genre(&dataset);
    assert!(matches!(result, Err(EdaError::DataProcessing(_))));
    Ok(())
}
