//! Native tree-ensemble backend
//!
//! A random-forest regressor stored inline in the artifact. Each tree is a
//! flat node array rooted at index 0; children always come after their
//! parent, so evaluation terminates. Split rule: `x[feature] <= threshold`
//! goes left. The ensemble prediction is the mean over trees.

use serde::{Deserialize, Serialize};

use super::inference::{check_width, finite, InferenceError, RulModel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

pub type Tree = Vec<TreeNode>;

/// Built through `new` so every forest in memory has been validated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestModel {
    n_features: usize,
    trees: Vec<Tree>,
}

impl ForestModel {
    /// Build and validate a forest
    pub fn new(n_features: usize, trees: Vec<Tree>) -> Result<Self, InferenceError> {
        let model = Self { n_features, trees };
        model.validate()?;
        Ok(model)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn validate(&self) -> Result<(), InferenceError> {
        if self.n_features == 0 {
            return Err(InferenceError::Load("forest declares zero features".to_string()));
        }
        if self.trees.is_empty() {
            return Err(InferenceError::Load("forest has no trees".to_string()));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.is_empty() {
                return Err(InferenceError::Load(format!("tree {} is empty", t)));
            }
            for (i, node) in tree.iter().enumerate() {
                match node {
                    TreeNode::Split { feature, threshold, left, right } => {
                        if *feature >= self.n_features {
                            return Err(InferenceError::Load(format!(
                                "tree {} node {}: feature {} out of range (n_features = {})",
                                t, i, feature, self.n_features
                            )));
                        }
                        if threshold.is_nan() {
                            return Err(InferenceError::Load(format!("tree {} node {}: NaN threshold", t, i)));
                        }
                        for child in [*left, *right] {
                            if child <= i || child >= tree.len() {
                                return Err(InferenceError::Load(format!(
                                    "tree {} node {}: child index {} invalid",
                                    t, i, child
                                )));
                            }
                        }
                    }
                    TreeNode::Leaf { value } => {
                        if !value.is_finite() {
                            return Err(InferenceError::Load(format!("tree {} node {}: non-finite leaf", t, i)));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn eval_tree(tree: &[TreeNode], features: &[f32]) -> f64 {
        let mut index = 0;
        loop {
            match &tree[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split { feature, threshold, left, right } => {
                    index = if (features[*feature] as f64) <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl RulModel for ForestModel {
    fn backend(&self) -> &'static str {
        "forest"
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict(&self, features: &[f32]) -> Result<f64, InferenceError> {
        check_width(Some(self.n_features), features)?;

        let sum: f64 = self.trees.iter()
            .map(|tree| Self::eval_tree(tree, features))
            .sum();

        finite(sum / self.trees.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> Tree {
        vec![
            TreeNode::Split { feature, threshold, left: 1, right: 2 },
            TreeNode::Leaf { value: low },
            TreeNode::Leaf { value: high },
        ]
    }

    #[test]
    fn test_single_stump() {
        // error_count <= 2 -> long life
        let forest = ForestModel::new(4, vec![stump(3, 2.0, 2400.0, 400.0)]).unwrap();
        assert_eq!(forest.predict(&[1.0, 1200.0, 45.0, 1.0]).unwrap(), 2400.0);
        assert_eq!(forest.predict(&[1.0, 1200.0, 45.0, 2.0]).unwrap(), 2400.0);
        assert_eq!(forest.predict(&[1.0, 1200.0, 45.0, 3.0]).unwrap(), 400.0);
    }

    #[test]
    fn test_mean_over_trees() {
        let forest = ForestModel::new(
            4,
            vec![stump(1, 5000.0, 3000.0, 1000.0), stump(2, 60.0, 1000.0, 200.0)],
        )
        .unwrap();
        assert_eq!(forest.tree_count(), 2);
        assert_eq!(forest.predict(&[0.0, 100.0, 30.0, 0.0]).unwrap(), 2000.0);
        assert_eq!(forest.predict(&[0.0, 8000.0, 80.0, 0.0]).unwrap(), 600.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let forest = ForestModel::new(11, vec![vec![TreeNode::Leaf { value: 1.0 }]]).unwrap();
        assert_eq!(
            forest.predict(&[1.0, 1200.0, 45.0, 1.0]),
            Err(InferenceError::ShapeMismatch { expected: 11, actual: 4 })
        );
    }

    #[test]
    fn test_rejects_bad_trees() {
        assert!(ForestModel::new(4, vec![]).is_err());
        assert!(ForestModel::new(4, vec![vec![]]).is_err());
        assert!(ForestModel::new(4, vec![stump(9, 1.0, 0.0, 1.0)]).is_err());

        // Child pointing back to root would loop forever
        let cyclic = vec![
            TreeNode::Split { feature: 0, threshold: 1.0, left: 0, right: 1 },
            TreeNode::Leaf { value: 1.0 },
        ];
        assert!(ForestModel::new(4, vec![cyclic]).is_err());
    }

    #[test]
    fn test_node_json_shapes() {
        let nodes: Tree = serde_json::from_str(
            r#"[{"feature":3,"threshold":2.5,"left":1,"right":2},{"value":900.0},{"value":100.0}]"#,
        )
        .unwrap();
        assert_eq!(nodes, stump(3, 2.5, 900.0, 100.0));
    }
}
