//! Pairing pipeline integration tests
//!
//! Builds image folders in a TempDir and runs discovery, grouping, sampling
//! and mask pairing end to end.

use hqc_common::config::TomlConfig;
use hqc_common::Hemisphere;
use hqc_review::services::RegionVocabulary;
use hqc_review::{PairingPipeline, PairingWarning};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"").unwrap();
    path
}

/// Raw scan plus a `.jpeg` mask
fn touch_pair(dir: &Path, stem: &str) -> PathBuf {
    touch(dir, &format!("{}_Object Predictions.jpeg", stem));
    touch(dir, &format!("{}.tif", stem))
}

fn pipeline(labels: &[&str]) -> PairingPipeline {
    PairingPipeline::new(
        RegionVocabulary::new(labels.iter().copied()),
        &TomlConfig::default(),
    )
}

#[test]
fn test_end_to_end_three_pairs() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    touch_pair(dir, "Rat1_s01_Hippo_CA1_RH");
    touch_pair(dir, "Rat1_s02_Hippo_CA1_LH");
    touch_pair(dir, "Rat1_s03_Hippo_CA3_RH");

    let mut rng = StdRng::seed_from_u64(1);
    let report = pipeline(&["CA1", "CA3"]).run(dir, "Rat1", &mut rng).unwrap();

    assert_eq!(report.discovered, 3);
    assert_eq!(report.sampled, 3);
    assert!(report.unresolved.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(report.pairs.len(), 3);

    let regions: Vec<&str> = report
        .pairs
        .iter()
        .map(|p| p.metadata.region.as_deref().unwrap())
        .collect();
    let hemispheres: Vec<Hemisphere> = report
        .pairs
        .iter()
        .map(|p| p.metadata.hemisphere.unwrap())
        .collect();
    assert_eq!(regions, vec!["CA1", "CA1", "CA3"]);
    assert_eq!(
        hemispheres,
        vec![Hemisphere::Right, Hemisphere::Left, Hemisphere::Right]
    );

    for pair in &report.pairs {
        let stem = pair.raw.file_stem().unwrap().to_string_lossy().into_owned();
        assert_eq!(
            pair.mask.file_name().unwrap().to_string_lossy(),
            format!("{}_Object Predictions.jpeg", stem)
        );
    }
}

#[test]
fn test_empty_directory_reports_no_files() {
    let temp_dir = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let report = pipeline(&["CA1"]).run(temp_dir.path(), "Rat1", &mut rng).unwrap();

    assert!(report.pairs.is_empty());
    assert!(report.no_files_found());
    assert_eq!(
        report.warnings,
        vec![PairingWarning::NoFilesFound {
            directory: temp_dir.path().to_path_buf(),
            subject: "Rat1".to_string(),
        }]
    );
}

#[test]
fn test_other_subjects_ignored() {
    let temp_dir = TempDir::new().unwrap();
    touch_pair(temp_dir.path(), "Rat2_CA1_RH");
    let mut rng = StdRng::seed_from_u64(1);

    let report = pipeline(&["CA1"]).run(temp_dir.path(), "Rat1", &mut rng).unwrap();
    assert!(report.no_files_found());
}

#[test]
fn test_missing_directory_is_error() {
    let mut rng = StdRng::seed_from_u64(1);
    let result = pipeline(&["CA1"]).run(Path::new("/nonexistent/hqc"), "Rat1", &mut rng);
    assert!(result.is_err());
}

#[test]
fn test_cap_one_from_five_candidates() {
    let temp_dir = TempDir::new().unwrap();
    let candidates: Vec<PathBuf> = (1..=5)
        .map(|i| touch_pair(temp_dir.path(), &format!("Rat1_s{}_CA1_RH", i)))
        .collect();

    let mut rng = StdRng::seed_from_u64(99);
    let report = pipeline(&["CA1"]).run(temp_dir.path(), "Rat1", &mut rng).unwrap();

    assert_eq!(report.discovered, 5);
    assert_eq!(report.pairs.len(), 1);
    assert!(candidates.contains(&report.pairs[0].raw));
}

#[test]
fn test_unresolved_files_excluded() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    touch_pair(dir, "Rat1_CA1_RH");
    // No hemisphere token
    touch_pair(dir, "Rat1_CA1_overview");
    // Region only as a substring of a longer token
    touch_pair(dir, "Rat1_PrL2_LH");

    let mut rng = StdRng::seed_from_u64(1);
    let report = pipeline(&["CA1", "PrL"]).run(dir, "Rat1", &mut rng).unwrap();

    assert_eq!(report.discovered, 3);
    assert_eq!(report.unresolved.len(), 2);
    assert_eq!(report.pairs.len(), 1);
    assert_eq!(report.pairs[0].metadata.region.as_deref(), Some("CA1"));
}

#[test]
fn test_missing_mask_skipped_with_warning() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    touch_pair(dir, "Rat1_CA1_RH");
    let orphan = touch(dir, "Rat1_CA1_LH.tif");
    // Secondary extension is enough
    touch(dir, "Rat1_CA3_RH.tif");
    touch(dir, "Rat1_CA3_RH_Object Predictions.jpg");

    let mut rng = StdRng::seed_from_u64(1);
    let report = pipeline(&["CA1", "CA3"]).run(dir, "Rat1", &mut rng).unwrap();

    assert_eq!(report.sampled, 3);
    assert_eq!(report.pairs.len(), 2);
    let missing: Vec<&Path> = report.missing_companions().collect();
    assert_eq!(missing, vec![orphan.as_path()]);

    let ca3 = report
        .pairs
        .iter()
        .find(|p| p.metadata.region.as_deref() == Some("CA3"))
        .unwrap();
    assert_eq!(ca3.mask, dir.join("Rat1_CA3_RH_Object Predictions.jpg"));
}

#[test]
fn test_export_pairs_json() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    touch_pair(dir, "Rat1_DG_LH");

    let mut rng = StdRng::seed_from_u64(1);
    let report = pipeline(&["DG"]).run(dir, "Rat1", &mut rng).unwrap();

    let export = dir.join("pairs.json");
    report.write_json(&export).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    let pairs = value.as_array().unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0]["metadata"]["region"], "DG");
    assert_eq!(pairs[0]["metadata"]["hemisphere"], "LH");
}
