// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git integration module.
//!
//! Reads commits into the normalized [`crate::commit::Commit`] model and
//! answers the branch questions rules ask through
//! [`crate::rules::CommitAnalyzer`].

mod repo;

pub use repo::{CommitReader, Repository};
