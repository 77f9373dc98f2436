use thiserror::Error;

/// Failures raised while loading datasets into a [`crate::DatasetCollection`].
///
/// The charting path itself never fails; these only guard the loader boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("a dataset with id `{0}` is already loaded")]
    DuplicateId(String),

    #[error("a dataset named `{0}` is already loaded")]
    DuplicateName(String),

    #[error("dataset `{dataset}` has a row with undeclared column `{column}`")]
    UnknownColumn { dataset: String, column: String },
}
