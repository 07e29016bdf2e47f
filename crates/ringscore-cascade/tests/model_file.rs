use ringscore_cascade::{CascadeDetector, DetectParams, ModelLoadError, RegionDetector};
use ringscore_core::GrayImage;
use std::fs;

const BLOB_MODEL: &str = r#"{
  "window": [20, 20],
  "stages": [
    { "threshold": 0.5,
      "stumps": [ { "feature": 0, "threshold": 0.3, "left": 0.0, "right": 1.0 } ] }
  ],
  "features": [
    { "rects": [
        { "x": 0, "y": 0, "width": 20, "height": 20, "weight": -1.0 },
        { "x": 5, "y": 5, "width": 10, "height": 10, "weight": 2.0 }
    ] }
  ]
}"#;

#[test]
fn model_loaded_from_disk_detects_two_blobs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("blob.json");
    fs::write(&path, BLOB_MODEL).expect("write model");

    let det = CascadeDetector::from_json_file(&path).expect("load");
    let mut img = GrayImage::new(160, 80);
    img.fill_rect(25, 25, 10, 10, 255);
    img.fill_rect(115, 35, 10, 10, 255);

    let params = DetectParams {
        min_window: [20, 20],
        ..DetectParams::default()
    };
    let regions = det.detect(&img.view(), &params).expect("detect");
    assert_eq!(regions.len(), 2, "regions: {regions:?}");
    // Scan order is row-major, so the blob closer to the top comes first.
    assert!(regions[0].center().x < 80.0);
    assert!(regions[1].center().x > 80.0);
}

#[test]
fn malformed_model_fails_once_at_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{"window": [20, 20], "stages": [], "features": []}"#).expect("write");

    let err = CascadeDetector::from_json_file(&path).expect_err("empty cascade");
    assert!(matches!(err, ModelLoadError::EmptyCascade));
}
