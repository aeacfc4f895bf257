use serde::{Deserialize, Serialize};

use super::rng::Lcg64;
use crate::data::features::N_FEATURES;

// ---------------------------------------------------------------------------
// Array-based tree representation
// ---------------------------------------------------------------------------

/// A node in the decision tree.
///
/// Leaves use `feature = -2` and `left = right = -1`; `counts` holds the
/// class distribution of the training rows that reached the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Feature index to split on (`-2` for leaf nodes).
    pub feature: i32,
    /// Split threshold (features <= threshold go left).
    pub threshold: f64,
    /// Index of left child (`-1` for leaf).
    pub left: i32,
    /// Index of right child (`-1` for leaf).
    pub right: i32,
    /// Training rows per class: [negatives, positives].
    pub counts: [u32; 2],
}

impl TreeNode {
    /// Returns `true` if this node is a leaf (no children).
    pub const fn is_leaf(&self) -> bool {
        self.feature < 0
    }
}

/// Growth limits applied while fitting a tree.
#[derive(Debug, Clone)]
pub struct GrowParams {
    /// Maximum node depth (root is depth 0).
    pub max_depth: usize,
    /// Minimum rows on each side of a split.
    pub min_samples_leaf: usize,
    /// Features considered per split (⌊√n_features⌋ for a forest).
    pub n_split_features: usize,
}

// ---------------------------------------------------------------------------
// DecisionTree – CART with gini splits
// ---------------------------------------------------------------------------

/// A binary decision tree, grown greedily on gini impurity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Grow a tree on the rows selected by `sample` (indices into `rows`,
    /// duplicates allowed for bootstrap resampling). `sample` must be
    /// non-empty and `rows`/`labels` row-aligned.
    pub fn fit(
        rows: &[[f64; N_FEATURES]],
        labels: &[bool],
        sample: &[usize],
        params: &GrowParams,
        rng: &mut Lcg64,
    ) -> Self {
        debug_assert_eq!(rows.len(), labels.len());
        debug_assert!(!sample.is_empty());

        let mut tree = DecisionTree { nodes: Vec::new() };
        tree.grow(rows, labels, sample.to_vec(), 0, params, rng);
        tree
    }

    fn grow(
        &mut self,
        rows: &[[f64; N_FEATURES]],
        labels: &[bool],
        idx: Vec<usize>,
        depth: usize,
        params: &GrowParams,
        rng: &mut Lcg64,
    ) -> i32 {
        let mut counts = [0u32; 2];
        for &i in &idx {
            counts[usize::from(labels[i])] += 1;
        }

        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            feature: -2,
            threshold: 0.0,
            left: -1,
            right: -1,
            counts,
        });

        let pure = counts[0] == 0 || counts[1] == 0;
        if depth >= params.max_depth || pure || idx.len() < 2 * params.min_samples_leaf {
            return id as i32;
        }
        let Some(split) = best_split(rows, labels, &idx, params, rng) else {
            return id as i32;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = idx
            .into_iter()
            .partition(|&i| rows[i][split.feature] <= split.threshold);
        let left = self.grow(rows, labels, left_idx, depth + 1, params, rng);
        let right = self.grow(rows, labels, right_idx, depth + 1, params, rng);

        let node = &mut self.nodes[id];
        node.feature = split.feature as i32;
        node.threshold = split.threshold;
        node.left = left;
        node.right = right;
        id as i32
    }

    /// Proportion of positive training rows in the leaf `x` falls into.
    pub fn predict_proba(&self, x: &[f64; N_FEATURES]) -> f64 {
        let mut node = &self.nodes[0];
        while !node.is_leaf() {
            let next = if x[node.feature as usize] <= node.threshold {
                node.left
            } else {
                node.right
            };
            node = &self.nodes[next as usize];
        }
        let total = node.counts[0] + node.counts[1];
        if total == 0 {
            0.0
        } else {
            f64::from(node.counts[1]) / f64::from(total)
        }
    }

    /// Number of nodes in the tree.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}

// ---------------------------------------------------------------------------
// Split search
// ---------------------------------------------------------------------------

struct Split {
    feature: usize,
    threshold: f64,
    score: f64,
}

/// Lowest weighted-gini split over a random feature subset, or `None` when
/// no feature in the subset has two distinct values that satisfy the leaf
/// minimum.
fn best_split(
    rows: &[[f64; N_FEATURES]],
    labels: &[bool],
    idx: &[usize],
    params: &GrowParams,
    rng: &mut Lcg64,
) -> Option<Split> {
    let mut best: Option<Split> = None;

    for f in feature_subset(params.n_split_features, rng) {
        let mut order = idx.to_vec();
        order.sort_by(|&a, &b| rows[a][f].total_cmp(&rows[b][f]));

        let total_pos = order.iter().filter(|&&i| labels[i]).count() as f64;
        let mut left_pos = 0.0;

        for k in 0..order.len() - 1 {
            if labels[order[k]] {
                left_pos += 1.0;
            }
            let v = rows[order[k]][f];
            let v_next = rows[order[k + 1]][f];
            if v == v_next {
                continue;
            }
            let n_left = k + 1;
            let n_right = order.len() - n_left;
            if n_left < params.min_samples_leaf || n_right < params.min_samples_leaf {
                continue;
            }

            let nl = n_left as f64;
            let nr = n_right as f64;
            let score = nl * gini(left_pos, nl) + nr * gini(total_pos - left_pos, nr);
            if best.as_ref().map_or(true, |b| score < b.score) {
                best = Some(Split {
                    feature: f,
                    threshold: (v + v_next) / 2.0,
                    score,
                });
            }
        }
    }
    best
}

/// Gini impurity of a side with `pos` positives out of `n` rows, scaled to
/// the binary case: `1 - p² - (1-p)² = 2p(1-p)`.
fn gini(pos: f64, n: f64) -> f64 {
    if n == 0.0 {
        return 0.0;
    }
    let p = pos / n;
    2.0 * p * (1.0 - p)
}

/// A random subset of feature indices of size `m` (clamped to `[1, N]`).
fn feature_subset(m: usize, rng: &mut Lcg64) -> Vec<usize> {
    let mut feats: Vec<usize> = (0..N_FEATURES).collect();
    rng.shuffle(&mut feats);
    feats.truncate(m.clamp(1, N_FEATURES));
    feats
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: GrowParams = GrowParams {
        max_depth: 16,
        min_samples_leaf: 1,
        n_split_features: N_FEATURES,
    };

    fn row(lat: f64) -> [f64; N_FEATURES] {
        [lat, 37.0, 300.0, 6.0, 15.0, 12.0]
    }

    #[test]
    fn separable_data_fits_exactly() {
        let rows: Vec<[f64; N_FEATURES]> =
            vec![row(1.0), row(2.0), row(3.0), row(10.0), row(11.0), row(12.0)];
        let labels = vec![false, false, false, true, true, true];
        let sample: Vec<usize> = (0..rows.len()).collect();
        let mut rng = Lcg64::new(42);

        let tree = DecisionTree::fit(&rows, &labels, &sample, &PARAMS, &mut rng);
        for (r, &label) in rows.iter().zip(&labels) {
            let p = tree.predict_proba(r);
            assert_eq!(p >= 0.5, label, "row {r:?}");
        }
    }

    #[test]
    fn pure_sample_yields_single_leaf() {
        let rows = vec![row(1.0), row(2.0)];
        let labels = vec![true, true];
        let mut rng = Lcg64::new(42);

        let tree = DecisionTree::fit(&rows, &labels, &[0, 1], &PARAMS, &mut rng);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_proba(&row(5.0)), 1.0);
    }

    #[test]
    fn fit_is_deterministic_for_a_seed() {
        let rows: Vec<[f64; N_FEATURES]> = (0..30).map(|i| row(f64::from(i))).collect();
        let labels: Vec<bool> = (0..30).map(|i| i % 3 == 0).collect();
        let sample: Vec<usize> = (0..rows.len()).collect();

        let a = DecisionTree::fit(&rows, &labels, &sample, &PARAMS, &mut Lcg64::new(7));
        let b = DecisionTree::fit(&rows, &labels, &sample, &PARAMS, &mut Lcg64::new(7));
        assert_eq!(a, b);
    }

    #[test]
    fn min_samples_leaf_is_respected() {
        let rows: Vec<[f64; N_FEATURES]> = (0..8).map(|i| row(f64::from(i))).collect();
        let labels = vec![false, true, false, true, false, true, false, true];
        let params = GrowParams {
            min_samples_leaf: 4,
            ..PARAMS
        };

        let tree = DecisionTree::fit(
            &rows,
            &labels,
            &(0..8).collect::<Vec<_>>(),
            &params,
            &mut Lcg64::new(42),
        );
        // Only the 4/4 split is allowed, so the tree is at most 3 nodes deep.
        assert!(tree.n_nodes() <= 3);
    }
}
