//! Salary proof verification lifecycle, shared by salary reports and the
//! profile's self-reported salary.
//!
//! ```text
//! None ──submit──▶ Pending ──approve──▶ Verified
//!                   │  ▲
//!            reject │  │ submit
//!                   ▼  │
//!                 Rejected
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    #[default]
    None,
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::None => "None",
            VerificationStatus::Pending => "Pending",
            VerificationStatus::Verified => "Verified",
            VerificationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(VerificationStatus::None),
            "Pending" => Ok(VerificationStatus::Pending),
            "Verified" => Ok(VerificationStatus::Verified),
            "Rejected" => Ok(VerificationStatus::Rejected),
            other => Err(VerificationError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("cannot {action} a salary proof in status {from}")]
    InvalidTransition {
        from: VerificationStatus,
        action: &'static str,
    },

    #[error("unknown verification status '{0}'")]
    UnknownStatus(String),

    #[error("a rejection needs a reason")]
    MissingReason,
}

/// Verification fields carried by anything that accepts a salary proof.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub status: VerificationStatus,
    pub proof_key: Option<String>,
    pub rejection_reason: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl Verification {
    /// Attaches a new proof and queues it for review. A pending proof is replaced.
    pub fn submit_proof(&mut self, proof_key: String) -> Result<(), VerificationError> {
        if self.status == VerificationStatus::Verified {
            return Err(VerificationError::InvalidTransition {
                from: self.status,
                action: "submit",
            });
        }
        self.status = VerificationStatus::Pending;
        self.proof_key = Some(proof_key);
        self.rejection_reason = None;
        Ok(())
    }

    pub fn approve(&mut self, now: DateTime<Utc>) -> Result<(), VerificationError> {
        self.require_pending("approve")?;
        self.status = VerificationStatus::Verified;
        self.verified_at = Some(now);
        Ok(())
    }

    pub fn reject(&mut self, reason: &str) -> Result<(), VerificationError> {
        self.require_pending("reject")?;
        if reason.trim().is_empty() {
            return Err(VerificationError::MissingReason);
        }
        self.status = VerificationStatus::Rejected;
        self.rejection_reason = Some(reason.trim().to_string());
        Ok(())
    }

    /// Applies an admin decision: approve, or reject with `reason`.
    pub fn review(
        &mut self,
        approve: bool,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        if approve {
            self.approve(now)
        } else {
            self.reject(reason.unwrap_or_default())
        }
    }

    /// Clears any proof state, e.g. after the underlying salary changes.
    pub fn reset(&mut self) {
        *self = Verification::default();
    }

    fn require_pending(&self, action: &'static str) -> Result<(), VerificationError> {
        if self.status != VerificationStatus::Pending {
            return Err(VerificationError::InvalidTransition {
                from: self.status,
                action,
            });
        }
        Ok(())
    }
}
