// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit data and subject-line parsing.

mod message;
mod model;

pub use message::{is_conventional, subject_text, ConventionalHeader};
pub use model::Commit;
