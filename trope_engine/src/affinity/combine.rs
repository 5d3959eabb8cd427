//! Neighbor combiners.

use trope_corpus::{NeighborMap, Trope};

/// Keep only keys present in every map, summing their weights.
///
/// A single map is returned as-is and no maps yield an empty result.
/// Output order is unspecified.
pub fn sum_intersection(maps: &[&NeighborMap]) -> NeighborMap {
    let Some(pivot) = smallest(maps) else {
        return NeighborMap::new();
    };

    pivot
        .keys()
        .filter_map(|key| {
            maps.iter()
                .try_fold(0u64, |acc, map| map.get(key).map(|w| acc.saturating_add(*w)))
                .map(|total| (key.clone(), total))
        })
        .collect()
}

/// Keys present in every map, sorted ascending.
pub fn shared_keys(maps: &[&NeighborMap]) -> Vec<Trope> {
    let Some(pivot) = smallest(maps) else {
        return Vec::new();
    };

    let mut keys: Vec<Trope> = pivot
        .keys()
        .filter(|key| maps.iter().all(|map| map.contains_key(*key)))
        .cloned()
        .collect();
    keys.sort();
    keys
}

// Iterating the smallest map bounds the work by the narrowest neighbor set.
fn smallest<'a>(maps: &[&'a NeighborMap]) -> Option<&'a NeighborMap> {
    maps.iter().min_by_key(|m| m.len()).copied()
}
