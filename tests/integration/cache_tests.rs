//! Decoded-image cache integration tests.
//!
//! Tests verify:
//! - Cached retrievals return the same samples as uncached ones
//! - Repeated epochs are served from the cache
//! - Transforms still run on every cached retrieval

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::DynamicImage;

use patch_dataset::{
    BoxError, CachedPatchDataset, DatasetError, Identity, IndexedDataset, PatchDataset,
    TransformRegistry,
};

use super::test_utils::PatchDir;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}_0.jpg", i * 128)).collect()
}

fn patch_dir(n: usize) -> PatchDir {
    let names = names(n);
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    PatchDir::with_patches(&refs)
}

#[test]
fn test_cached_matches_uncached() {
    let dir = patch_dir(5);
    let plain = PatchDataset::new(
        dir.path(),
        TransformRegistry::<DynamicImage>::new().with("identity", Identity),
    )
    .unwrap();
    let cached = CachedPatchDataset::new(
        PatchDataset::new(
            dir.path(),
            TransformRegistry::<DynamicImage>::new().with("identity", Identity),
        )
        .unwrap(),
    );

    assert_eq!(cached.len(), plain.len());
    for index in 0..plain.len() {
        assert_eq!(cached.get(index).unwrap(), plain.get(index).unwrap());
    }
}

#[test]
fn test_epochs_hit_cache() {
    let dir = patch_dir(4);
    let dataset = CachedPatchDataset::with_capacity(
        PatchDataset::<DynamicImage>::without_transforms(dir.path()).unwrap(),
        8,
    )
    .unwrap();

    for _epoch in 0..3 {
        for sample in dataset.iter() {
            sample.unwrap();
        }
    }

    let stats = dataset.stats();
    assert_eq!(stats.misses, 4);
    assert_eq!(stats.hits, 8);
    assert_eq!(stats.entries, 4);
}

#[test]
fn test_transforms_run_on_cache_hits() {
    let dir = patch_dir(1);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let transforms = TransformRegistry::new().with_fn("count", move |_: &DynamicImage| {
        Ok::<_, BoxError>(counter.fetch_add(1, Ordering::SeqCst))
    });
    let dataset = CachedPatchDataset::new(PatchDataset::new(dir.path(), transforms).unwrap());

    let first = dataset.get(0).unwrap();
    let second = dataset.get(0).unwrap();

    assert_eq!(first.get("count"), Some(&0));
    assert_eq!(second.get("count"), Some(&1));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(dataset.stats().hits, 1);
}

#[test]
fn test_failed_decode_not_cached() {
    let dir = PatchDir::new();
    dir.write_raw("0_0.jpg", b"broken");

    let dataset = CachedPatchDataset::new(
        PatchDataset::<DynamicImage>::without_transforms(dir.path()).unwrap(),
    );

    assert!(matches!(dataset.get(0), Err(DatasetError::ImageDecode { .. })));

    dir.write_patch("0_0.jpg", 1);
    assert!(dataset.get(0).is_ok());

    let stats = dataset.stats();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.entries, 1);
}

#[test]
fn test_cached_dataset_through_trait() {
    fn first_coord<D>(dataset: &D) -> Option<[u32; 2]>
    where
        D: IndexedDataset<Item = patch_dataset::PatchSample<DynamicImage>>,
    {
        dataset.get(0).ok().map(|sample| sample.coords())
    }

    let dir = patch_dir(2);
    let dataset = CachedPatchDataset::new(
        PatchDataset::<DynamicImage>::without_transforms(dir.path()).unwrap(),
    );

    assert_eq!(first_coord(&dataset), Some([0, 0]));
    assert_eq!(first_coord(dataset.inner()), Some([0, 0]));
}
