//! Integration tests for the full load → derive bands → query flow.
//!
//! These tests write small catalog and reference files to a temporary
//! directory and drive them through the public API of every crate.

use std::path::{Path, PathBuf};

use attune_core::{compute_averages, compute_std_devs, make_range, FeatureSet};
use attune_etl::{load_catalog, load_reference, IngestError};
use attune_search::{query, suggest, Strategy};
use tempfile::TempDir;

const CATALOG: &str = "\
id,name,artists,popularity,danceability,energy,valence,tempo,loudness,acousticness,instrumentalness,speechiness
t1,Delta,\"['Quartet', 'Guest']\",40,0.48,0.48,0.48,119,-6.2,0.48,0.48,0.48
t2,Alpha,['Quartet'],55,0.5,0.5,0.5,120,-6,0.5,0.5,0.5
t3,Charlie,Solo,80,0.9,0.9,0.9,180,-1,0.9,0.9,0.9
t4,Echo,Solo,10,0.5,loud,0.5,120,-6,0.5,0.5,0.5
t5,,Nobody,10,0.5,0.5,0.5,120,-6,0.5,0.5,0.5
t6,Bravo,Duo,60,0.52,0.52,0.52,121,-5.8,0.52,0.52,0.52
";

const REFERENCE: &str = "\
label,danceability,energy,valence,tempo,loudness,acousticness,instrumentalness,speechiness
mean,0.5,0.5,0.5,120,-6,0.5,0.5,0.5
";

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture");
    path
}

fn names(tracks: &[&attune_core::Track]) -> Vec<String> {
    tracks.iter().map(|t| t.name.clone()).collect()
}

/// Test the reference-file flow end to end
#[test]
fn test_reference_file_recommendations() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = write(&temp_dir, "tracks.csv", CATALOG);
    let reference_path = write(&temp_dir, "averages.csv", REFERENCE);

    let catalog = load_catalog(&catalog_path).expect("Failed to load catalog");
    assert_eq!(catalog.report.rows_read, 6);
    assert_eq!(catalog.report.rows_accepted, 4);
    assert_eq!(catalog.report.rows_skipped, 2);

    let reference = load_reference(&reference_path).expect("Failed to load reference");
    assert_eq!(reference.len(), 1);

    let features = FeatureSet::standard();
    let averages = compute_averages(&reference.rows, &features).unwrap();
    let std_devs = compute_std_devs(&catalog.tracks, &averages).unwrap();
    let range = make_range(&averages, &std_devs, 0.5);

    let tree = catalog.into_tree();
    assert_eq!(tree.len(), 4);

    let in_order = query(&tree, &range, Strategy::InOrder);
    assert_eq!(names(&in_order), vec!["Alpha", "Bravo", "Delta"]);

    // Delta was inserted first, so it is the root.
    let level_order = query(&tree, &range, Strategy::LevelOrder);
    assert_eq!(names(&level_order), vec!["Delta", "Alpha", "Bravo"]);
}

/// Test that seeds picked by name produce the reference averages
#[test]
fn test_seed_selection_recommendations() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = write(&temp_dir, "tracks.csv", CATALOG);

    let catalog = load_catalog(&catalog_path).unwrap();
    let selection = catalog.select_named(&["alpha", "BRAVO", "Zulu"]);
    assert_eq!(selection.matched.len(), 2);
    assert_eq!(selection.missing, vec!["Zulu".to_string()]);

    let features = FeatureSet::standard();
    let averages = compute_averages(selection.matched.iter().copied(), &features).unwrap();
    let std_devs = compute_std_devs(&catalog.tracks, &averages).unwrap();
    let range = make_range(&averages, &std_devs, 0.5);

    let tree = catalog.clone().into_tree();
    let found = names(&query(&tree, &range, Strategy::InOrder));
    assert!(found.contains(&"Alpha".to_string()));
    assert!(found.contains(&"Bravo".to_string()));
    assert!(!found.contains(&"Charlie".to_string()));
}

/// Test that a wide tolerance admits the whole catalog
#[test]
fn test_wide_tolerance_matches_everything() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = write(&temp_dir, "tracks.csv", CATALOG);
    let reference_path = write(&temp_dir, "averages.csv", REFERENCE);

    let catalog = load_catalog(&catalog_path).unwrap();
    let reference = load_reference(&reference_path).unwrap();

    let averages = compute_averages(&reference.rows, &FeatureSet::standard()).unwrap();
    let std_devs = compute_std_devs(&catalog.tracks, &averages).unwrap();
    let range = make_range(&averages, &std_devs, 3.0);

    let tree = catalog.into_tree();
    assert_eq!(query(&tree, &range, Strategy::InOrder).len(), tree.len());
}

/// Test that artists survive quoting in the catalog file
#[test]
fn test_catalog_artists() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = write(&temp_dir, "tracks.csv", CATALOG);

    let catalog = load_catalog(&catalog_path).unwrap();
    let delta = catalog.tracks.iter().find(|t| t.name == "Delta").unwrap();
    assert_eq!(delta.artists, vec!["Quartet", "Guest"]);
    assert_eq!(delta.popularity, 40);
}

/// Test name suggestions against a loaded catalog
#[test]
fn test_suggestions_from_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = write(&temp_dir, "tracks.csv", CATALOG);

    let tree = load_catalog(&catalog_path).unwrap().into_tree();
    assert_eq!(suggest(&tree, "b", 10), vec!["Bravo"]);
    assert!(suggest(&tree, "bravo", 10).is_empty());
}

/// Test that missing files are reported as unavailable sources
#[test]
fn test_missing_sources() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.csv");

    let err = load_catalog(&missing).unwrap_err();
    assert!(err.is_source_unavailable());
    assert!(err.to_string().contains("nope.csv"));

    let err = load_reference(&missing).unwrap_err();
    assert!(matches!(err, IngestError::SourceUnavailable { .. }));
}

/// Test that an empty catalog file loads as an empty catalog
#[test]
fn test_empty_catalog_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(&temp_dir, "empty.csv", "");

    let catalog = load_catalog(&path).unwrap();
    assert!(catalog.is_empty());

    let features = FeatureSet::standard();
    let err = compute_averages(&catalog.tracks, &features).unwrap_err();
    assert!(err.is_empty_input());
}

/// Test that a catalog without a name column is rejected
#[test]
fn test_catalog_without_name_column() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(&temp_dir, "bad.csv", "id,energy\n1,0.5\n");

    let err = load_catalog(Path::new(&path)).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "name"));
}

/// Test that rows after a badly encoded or oddly quoted row still load
#[test]
fn test_bad_rows_do_not_hide_the_rest_of_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mixed.csv");
    let mut contents = b"name,energy\n12\" Mix,0.5\nGood,0.5\n".to_vec();
    contents.extend_from_slice(b"Caf\xE9,0.5\nAlso Good,0.6\n");
    std::fs::write(&path, contents).unwrap();

    let catalog = load_catalog(&path).unwrap();
    assert_eq!(catalog.report.rows_read, 4);
    assert_eq!(catalog.report.rows_accepted, 3);
    assert_eq!(catalog.report.rows_skipped, 1);
    let names: Vec<&str> = catalog.tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["12\" Mix", "Good", "Also Good"]);
}
