use std::fs;

use glam::DVec3;

use manipulator_lab::point_cloud::{scan_file, PointCloudScanner};
use manipulator_lab::LabError;

#[test]
fn scanning_a_file_reports_maxima_in_order() {
    let path = std::env::temp_dir().join(format!("search_space_{}.txt", std::process::id()));
    fs::write(&path, "3 0 0\n0 4 0\n1 1 1\n-5 0 0\n").unwrap();
    let mut printed = Vec::new();
    let scan = scan_file(&path, PointCloudScanner::retaining(), |maximum| {
        printed.push(maximum.to_string())
    })
    .unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(
        printed,
        vec![
            "new max dist: 3.0>-inf",
            "new max dist: 4.0>3.0",
            "new max dist: 5.0>4.0",
        ]
    );
    assert_eq!(scan.axis_maxima, DVec3::new(3.0, 4.0, 1.0));
    assert_eq!(scan.count, 4);
    assert_eq!(scan.points.len(), 4);
}

#[test]
fn missing_cloud_is_an_io_error() {
    let result = scan_file("no/such/search_space.txt", PointCloudScanner::default(), |_| {});
    assert!(matches!(result, Err(LabError::Io { .. })));
}
