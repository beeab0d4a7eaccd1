//! Errors raised while merging a duplicate group and transferring provenance.

use nsi_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A group named a master id that isn't present among its own members.
    #[error("master item {0} is not a member of its own duplicate group")]
    MasterNotInGroup(String),
}
