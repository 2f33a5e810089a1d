//! CART regression trees.

use car_structs::FEATURE_COUNT;
use serde::{Deserialize, Serialize};

use crate::{EncodedTable, ForestConfig};

/// A node in a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal split node; rows with `row[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Leaf node holding the mean target of its training rows.
    Leaf { value: f64 },
}

/// A regression tree stored as a flat node array rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Grows a tree on the rows of `data` listed in `sample`.
    ///
    /// `sample` may repeat rows (bootstrap) and is reordered in place.
    /// It must not be empty.
    pub(crate) fn fit(data: &EncodedTable, sample: &mut [usize], config: &ForestConfig) -> Self {
        let mut builder = TreeBuilder {
            data,
            config,
            nodes: Vec::new(),
        };
        builder.grow(sample, 0);

        Self {
            nodes: builder.nodes,
        }
    }

    /// Predicts the target for one encoded row.
    #[must_use]
    pub fn predict(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    #[must_use]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }
}

/// Best split found for a node.
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// Number of sorted sample rows going left.
    position: usize,
    /// `sum_left² / n_left + sum_right² / n_right`; larger means lower squared error.
    score: f64,
}

struct TreeBuilder<'a> {
    data: &'a EncodedTable,
    config: &'a ForestConfig,
    nodes: Vec<TreeNode>,
}

impl TreeBuilder<'_> {
    fn value(&self, row: usize, feature: usize) -> f64 {
        self.data.row(row)[feature]
    }

    fn sort_by_feature(&self, sample: &mut [usize], feature: usize) {
        sample.sort_by(|&a, &b| self.value(a, feature).total_cmp(&self.value(b, feature)));
    }

    /// Grows the subtree for `sample` and returns its node index.
    fn grow(&mut self, sample: &mut [usize], depth: usize) -> usize {
        let n = sample.len();
        let targets = sample.iter().map(|&i| self.data.target(i));
        let mean = targets.clone().sum::<f64>() / n as f64;
        let (min, max) = targets.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

        let stop = n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf
            || self.config.max_depth.is_some_and(|limit| depth >= limit)
            || max <= min;

        let split = if stop { None } else { self.best_split(sample) };

        let Some(split) = split else {
            self.nodes.push(TreeNode::Leaf { value: mean });
            return self.nodes.len() - 1;
        };

        // Reserve the slot so the root stays at index 0; children fill it in below.
        let index = self.nodes.len();
        self.nodes.push(TreeNode::Leaf { value: mean });

        self.sort_by_feature(sample, split.feature);
        let (left_sample, right_sample) = sample.split_at_mut(split.position);
        let left = self.grow(left_sample, depth + 1);
        let right = self.grow(right_sample, depth + 1);

        self.nodes[index] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        index
    }

    /// Exhaustive search over every feature and every boundary between
    /// distinct sorted values.
    fn best_split(&self, sample: &mut [usize]) -> Option<SplitCandidate> {
        let n = sample.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let total: f64 = sample.iter().map(|&i| self.data.target(i)).sum();
        let mut best: Option<SplitCandidate> = None;

        for feature in 0..FEATURE_COUNT {
            self.sort_by_feature(sample, feature);

            let mut left_sum = 0.0;
            for position in 1..n {
                let previous = sample[position - 1];
                left_sum += self.data.target(previous);

                if position < min_leaf || n - position < min_leaf {
                    continue;
                }

                let lo = self.value(previous, feature);
                let hi = self.value(sample[position], feature);
                if hi <= lo {
                    continue;
                }

                let right_sum = total - left_sum;
                let score = left_sum * left_sum / position as f64
                    + right_sum * right_sum / (n - position) as f64;

                if best.is_none_or(|current| score > current.score) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        position,
                        score,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_with(feature: usize, value: f64) -> [f64; FEATURE_COUNT] {
        let mut row = [0.0; FEATURE_COUNT];
        row[feature] = value;
        row
    }

    fn step_table() -> EncodedTable {
        let rows = (0..10).map(|i| row_with(3, f64::from(i))).collect();
        let targets = (0..10).map(|i| if i < 5 { 100.0 } else { 300.0 }).collect();
        EncodedTable::from_parts(rows, targets)
    }

    #[test]
    fn test_fits_a_step_exactly() {
        let data = step_table();
        let mut sample: Vec<usize> = (0..data.len()).collect();
        let tree = RegressionTree::fit(&data, &mut sample, &ForestConfig::default());

        assert!((tree.predict(&row_with(3, 2.0)) - 100.0).abs() < 1e-9);
        assert!((tree.predict(&row_with(3, 7.0)) - 300.0).abs() < 1e-9);
        assert_eq!(tree.leaf_count(), 2);

        match &tree.nodes()[0] {
            TreeNode::Split {
                feature, threshold, ..
            } => {
                assert_eq!(*feature, 3);
                assert!((threshold - 4.5).abs() < 1e-9);
            }
            TreeNode::Leaf { .. } => panic!("root should split"),
        }
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let rows = (0..5).map(|i| row_with(0, f64::from(i))).collect();
        let data = EncodedTable::from_parts(rows, vec![42.0; 5]);
        let mut sample: Vec<usize> = (0..5).collect();

        let tree = RegressionTree::fit(&data, &mut sample, &ForestConfig::default());

        assert_eq!(tree.nodes().len(), 1);
        assert!((tree.predict(&row_with(0, 99.0)) - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_features_cannot_split() {
        let data = EncodedTable::from_parts(vec![row_with(1, 1.0); 4], vec![1.0, 2.0, 3.0, 4.0]);
        let mut sample: Vec<usize> = (0..4).collect();

        let tree = RegressionTree::fit(&data, &mut sample, &ForestConfig::default());

        assert_eq!(tree.leaf_count(), 1);
        assert!((tree.predict(&row_with(1, 1.0)) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let rows = (0..16).map(|i| row_with(2, f64::from(i))).collect();
        let targets = (0..16).map(f64::from).collect();
        let data = EncodedTable::from_parts(rows, targets);
        let mut sample: Vec<usize> = (0..16).collect();
        let config = ForestConfig::default().with_max_depth(Some(2));

        let tree = RegressionTree::fit(&data, &mut sample, &config);

        assert!(tree.leaf_count() <= 4);
    }
}
