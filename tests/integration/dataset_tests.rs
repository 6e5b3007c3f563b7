//! Dataset indexing and retrieval tests.
//!
//! Tests verify:
//! - Size matches the number of `<x>_<y>.jpg` files
//! - Coordinates follow the listing order
//! - Error taxonomy for bad indices, names and files

use image::DynamicImage;

use patch_dataset::{
    DatasetError, Identity, IndexedDataset, PatchDataset, TileCoord, TransformRegistry,
};

use super::test_utils::{file_name, PatchDir};

fn identity_dataset(dir: &PatchDir) -> PatchDataset<DynamicImage> {
    PatchDataset::new(
        dir.path(),
        TransformRegistry::new().with("identity", Identity),
    )
    .unwrap()
}

// =============================================================================
// Indexing
// =============================================================================

#[test]
fn test_size_matches_patch_count() {
    for n in [0usize, 1, 5, 12] {
        let names: Vec<String> = (0..n).map(|i| format!("{}_{}.jpg", i * 256, i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let dir = PatchDir::with_patches(&refs);

        let dataset = PatchDataset::<DynamicImage>::without_transforms(dir.path()).unwrap();
        assert_eq!(dataset.len(), n);
        assert_eq!(dataset.is_empty(), n == 0);
    }
}

#[test]
fn test_two_patch_scenario() {
    let dir = PatchDir::with_patches(&["10_20.jpg", "5_5.jpg"]);
    let dataset = PatchDataset::<DynamicImage>::without_transforms(dir.path()).unwrap();

    assert_eq!(dataset.len(), 2);

    let index = dataset
        .paths()
        .iter()
        .position(|p| file_name(p) == "5_5.jpg")
        .unwrap();
    let sample = dataset.get(index).unwrap();
    assert_eq!(sample.coord, TileCoord::new(5, 5));
    assert_eq!(sample.coords(), [5, 5]);
}

#[test]
fn test_coordinates_follow_listing_order() {
    let dir = PatchDir::with_patches(&["0_0.jpg", "0_512.jpg", "1024_256.jpg", "256_0.jpg"]);
    let dataset = identity_dataset(&dir);

    for (index, path) in dataset.paths().iter().enumerate() {
        let expected = TileCoord::from_path(path).unwrap();
        assert_eq!(dataset.get(index).unwrap().coord, expected);
    }

    let names: Vec<_> = dataset.paths().iter().map(|p| file_name(p)).collect();
    assert_eq!(names, ["0_0.jpg", "0_512.jpg", "1024_256.jpg", "256_0.jpg"]);
}

#[test]
fn test_only_jpg_files_indexed() {
    let dir = PatchDir::with_patches(&["1_1.jpg", "2_2.jpg"]);
    dir.write_raw("3_3.png", b"png");
    dir.write_raw("4_4.jpg.tmp", b"partial");
    dir.write_raw("README", b"patches");

    let dataset = identity_dataset(&dir);
    assert_eq!(dataset.len(), 2);
}

#[test]
fn test_listing_is_not_refreshed() {
    let dir = PatchDir::with_patches(&["1_1.jpg"]);
    let dataset = identity_dataset(&dir);

    dir.write_patch("2_2.jpg", 9);
    assert_eq!(dataset.len(), 1);
}

// =============================================================================
// Transforms
// =============================================================================

#[test]
fn test_empty_registry_returns_coordinate_only() {
    let dir = PatchDir::with_patches(&["7_9.jpg", "8_9.jpg"]);
    let dataset = PatchDataset::<DynamicImage>::without_transforms(dir.path()).unwrap();

    for index in 0..dataset.len() {
        let sample = dataset.get(index).unwrap();
        assert!(sample.outputs.is_empty());
    }
    assert_eq!(dataset.get(1).unwrap().coord, TileCoord::new(8, 9));
}

#[test]
fn test_identity_returns_decoded_image() {
    let dir = PatchDir::with_patches(&["32_64.jpg"]);
    let dataset = identity_dataset(&dir);

    let sample = dataset.get(0).unwrap();
    assert_eq!(sample.outputs.len(), 1);
    assert_eq!(sample.outputs.keys().next().map(String::as_str), Some("identity"));
    assert_eq!(sample.get("identity"), Some(&dir.decode("32_64.jpg")));
}

#[test]
fn test_decode_matches_get() {
    let dir = PatchDir::with_patches(&["1_2.jpg"]);
    let dataset = identity_dataset(&dir);

    let (image, coord) = dataset.decode(0).unwrap();
    let sample = dataset.get(0).unwrap();
    assert_eq!(sample.get("identity"), Some(&image));
    assert_eq!(sample.coord, coord);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_index_out_of_range() {
    let dir = PatchDir::with_patches(&["0_0.jpg", "0_1.jpg", "0_2.jpg"]);
    let dataset = identity_dataset(&dir);

    match dataset.get(3) {
        Err(DatasetError::IndexOutOfRange { index, len }) => {
            assert_eq!(index, 3);
            assert_eq!(len, 3);
        }
        other => panic!("Expected IndexOutOfRange, got {:?}", other),
    }
    assert!(matches!(
        dataset.get(usize::MAX),
        Err(DatasetError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_empty_dataset_rejects_index_zero() {
    let dir = PatchDir::new();
    let dataset = identity_dataset(&dir);

    assert!(dataset.is_empty());
    assert!(matches!(
        dataset.get(0),
        Err(DatasetError::IndexOutOfRange { index: 0, len: 0 })
    ));
}

#[test]
fn test_malformed_filename() {
    let dir = PatchDir::with_patches(&["notanumber_5.jpg"]);
    let dataset = identity_dataset(&dir);

    match dataset.get(0) {
        Err(DatasetError::MalformedFilename { path, .. }) => {
            assert_eq!(file_name(&path), "notanumber_5.jpg");
        }
        other => panic!("Expected MalformedFilename, got {:?}", other),
    }
}

#[test]
fn test_malformed_filename_variants() {
    let dir = PatchDir::with_patches(&["1_2_3.jpg", "12.jpg", "-4_5.jpg", "_.jpg"]);
    let dataset = identity_dataset(&dir);

    for index in 0..dataset.len() {
        assert!(
            matches!(dataset.get(index), Err(DatasetError::MalformedFilename { .. })),
            "{} should be rejected",
            file_name(dataset.path(index).unwrap())
        );
    }
}

#[test]
fn test_corrupt_jpeg() {
    let dir = PatchDir::new();
    dir.write_raw("0_0.jpg", &[0xFF, 0xD8, 0x00, 0x01, 0x02]);

    let dataset = identity_dataset(&dir);
    match dataset.get(0) {
        Err(DatasetError::ImageDecode { path, .. }) => {
            assert_eq!(file_name(&path), "0_0.jpg");
        }
        other => panic!("Expected ImageDecode, got {:?}", other),
    }
}

#[test]
fn test_file_removed_after_listing() {
    let dir = PatchDir::with_patches(&["0_0.jpg"]);
    let dataset = identity_dataset(&dir);
    dir.remove("0_0.jpg");

    assert!(matches!(
        dataset.get(0),
        Err(DatasetError::ImageDecode { .. })
    ));
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_counted_and_fails_on_decode() {
    let dir = PatchDir::with_patches(&["1_1.jpg"]);
    std::os::unix::fs::symlink(dir.path().join("gone.jpg"), dir.path().join("2_2.jpg")).unwrap();

    let dataset = identity_dataset(&dir);
    assert_eq!(dataset.len(), 2);
    assert!(dataset.get(0).is_ok());

    match dataset.get(1) {
        Err(DatasetError::ImageDecode { path, .. }) => assert_eq!(file_name(&path), "2_2.jpg"),
        other => panic!("expected ImageDecode, got {other:?}"),
    }
}

#[test]
fn test_missing_directory() {
    let dir = PatchDir::new();
    let missing = dir.path().join("nope");

    assert!(matches!(
        PatchDataset::<DynamicImage>::without_transforms(&missing),
        Err(DatasetError::DirectoryAccess { .. })
    ));
}

#[test]
fn test_path_is_a_file() {
    let dir = PatchDir::with_patches(&["0_0.jpg"]);
    let file = dir.path().join("0_0.jpg");

    assert!(matches!(
        PatchDataset::<DynamicImage>::without_transforms(&file),
        Err(DatasetError::DirectoryAccess { .. })
    ));
}

// =============================================================================
// Iteration
// =============================================================================

#[test]
fn test_iteration_continues_past_failures() {
    let dir = PatchDir::with_patches(&["0_0.jpg", "bad_name.jpg", "0_1.jpg"]);
    let dataset = identity_dataset(&dir);

    let results: Vec<_> = dataset.iter().collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);

    let coords: Vec<_> = (&dataset)
        .into_iter()
        .filter_map(Result::ok)
        .map(|sample| sample.coord)
        .collect();
    assert_eq!(coords, [TileCoord::new(0, 0), TileCoord::new(0, 1)]);
}

#[test]
fn test_generic_consumer() {
    fn count_ok<D: IndexedDataset>(dataset: &D) -> usize {
        (0..dataset.len()).filter(|&i| dataset.get(i).is_ok()).count()
    }

    let dir = PatchDir::with_patches(&["0_0.jpg", "1_0.jpg"]);
    assert_eq!(count_ok(&identity_dataset(&dir)), 2);
}
