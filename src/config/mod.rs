// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration module for msglint.
//!
//! This module handles loading, parsing, and merging configuration from
//! files, and compiling it into the snapshot the rules read.

pub mod default;
mod loader;
mod rules;
mod schema;

pub use loader::{
    find_config_file, find_config_file_from, load_config, merge_configs, parse_config,
    user_config_file,
};
pub use rules::{
    BodyPolicy, ConventionalPolicy, JiraPolicy, RepoPolicy, RuleConfiguration, SigningPolicy,
    SpellPolicy, SubjectPolicy,
};
pub use schema::*;
