//! Bounded top-N selection.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// A value with a total order, so rankings stay consistent for any input.
///
/// Floats use IEEE 754 `totalOrder`: a positive NaN ranks above every number
/// and a negative NaN below.
pub trait Weight {
    fn weight_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! ord_weight {
    ($($t:ty),*) => {
        $(impl Weight for $t {
            fn weight_cmp(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        })*
    };
}

ord_weight!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl Weight for f64 {
    fn weight_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl Weight for f32 {
    fn weight_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

/// Entry ordered so that better entries compare as smaller: higher value
/// first, then lower key.
struct Ranked<K, V> {
    key: K,
    value: V,
}

impl<K: Ord, V: Weight> PartialEq for Ranked<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord, V: Weight> Eq for Ranked<K, V> {}

impl<K: Ord, V: Weight> Ord for Ranked<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .value
            .weight_cmp(&self.value)
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl<K: Ord, V: Weight> PartialOrd for Ranked<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The `n` highest-valued entries of `weights`, best first.
///
/// Ties are broken by ascending key. When `n` covers the whole map every
/// entry is returned; an empty map gives an empty result.
pub fn top_n<K, V>(weights: &HashMap<K, V>, n: usize) -> Vec<(K, V)>
where
    K: Ord + Clone,
    V: Weight + Copy,
{
    select_top(weights.iter().map(|(k, v)| (k.clone(), *v)), n)
}

/// Top-`n` selection over any stream of `(key, value)` pairs.
///
/// Keeps at most `n` entries in a heap whose root is the worst kept entry,
/// so the cost is `O(m log n)` for `m` inputs.
pub fn select_top<K, V, I>(entries: I, n: usize) -> Vec<(K, V)>
where
    K: Ord,
    V: Weight,
    I: IntoIterator<Item = (K, V)>,
{
    if n == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<Ranked<K, V>> = BinaryHeap::new();

    for (key, value) in entries {
        let entry = Ranked { key, value };
        if heap.len() < n {
            heap.push(entry);
        } else if heap.peek().is_some_and(|worst| entry < *worst) {
            heap.pop();
            heap.push(entry);
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|r| (r.key, r.value))
        .collect()
}
