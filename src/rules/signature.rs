// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit signature presence and kind.
//!
//! Only the armor of the signature block is inspected. Whether the
//! signature verifies against a key is a question for `git verify-commit`.

use std::fmt;

use crate::commit::Commit;
use crate::config::RuleConfiguration;

use super::result::{ErrorCode, ValidationError};
use super::rule::Rule;

const PGP_ARMOR: &str = "-----BEGIN PGP SIGNATURE-----";
const SSH_ARMOR: &str = "-----BEGIN SSH SIGNATURE-----";

/// Signature kind, as named in `signing.allowed_types`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
    Gpg,
    Ssh,
}

impl SignatureKind {
    /// Detect the kind from a raw signature block.
    pub fn detect(signature: &str) -> Option<Self> {
        match signature.trim_start().lines().next()?.trim_end() {
            PGP_ARMOR => Some(SignatureKind::Gpg),
            SSH_ARMOR => Some(SignatureKind::Ssh),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureKind::Gpg => "gpg",
            SignatureKind::Ssh => "ssh",
        }
    }
}

impl fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Requires every commit to carry a signature of an allowed kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignatureRule;

impl SignatureRule {
    const NAME: &'static str = "Signature";
}

impl Rule for SignatureRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn id(&self) -> &'static str {
        "signature"
    }

    fn description(&self) -> &'static str {
        "Commit is signed with an allowed signature type"
    }

    fn validate(&self, commit: &Commit, config: &RuleConfiguration) -> Vec<ValidationError> {
        let Some(signature) = commit.signature.as_deref() else {
            return vec![ValidationError::new(
                Self::NAME,
                ErrorCode::MissingSignature,
                "Commit is not signed",
            )
            .with_help("Sign commits with 'git commit -S' or set commit.gpgsign=true")];
        };

        let Some(kind) = SignatureKind::detect(signature) else {
            return vec![ValidationError::new(
                Self::NAME,
                ErrorCode::UnknownSignatureFormat,
                "Signature is neither a PGP nor an SSH signature",
            )
            .with_help("Use gpg.format=openpgp or gpg.format=ssh")];
        };

        let allowed = &config.signing.allowed_types;
        if allowed.iter().any(|t| t == kind.as_str()) {
            return Vec::new();
        }

        vec![ValidationError::new(
            Self::NAME,
            ErrorCode::DisallowedSignatureType,
            format!("Signature type '{}' is not allowed", kind),
        )
        .with_context("type", kind)
        .with_context("allowed_types", allowed.join(", "))
        .with_help(format!("Sign with one of: {}", allowed.join(", ")))]
    }
}
