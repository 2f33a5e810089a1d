//! ML model crate for car price prediction.
//!
//! Label-encodes the categorical car attributes, fits a random forest of
//! regression trees on the encoded table, and persists both together as a
//! single [`TrainedArtifact`].

mod artifact;
mod dataset;
mod encoder;
mod error;
mod forest;
mod training;
mod tree;

pub use artifact::TrainedArtifact;
pub use dataset::{EncodedTable, TrainingTable, train_test_split};
pub use encoder::{EncoderSet, LabelEncoder};
pub use error::{ArtifactError, ModelError};
pub use forest::{ForestConfig, RandomForest};
pub use training::{TEST_FRACTION, TrainingOutput, mean_absolute_error, train};
pub use tree::{RegressionTree, TreeNode};
