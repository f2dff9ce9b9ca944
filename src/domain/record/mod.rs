//! The verification record and the payload rules per verification type.

use crate::crypto::hashing::content_hash;
use crate::error::VerificationError;
use primitive_types::H256;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

pub mod samples;

/// Upper bound on the remark stored on-chain (bytes).
pub const MAX_REMARK_LEN: usize = 200;

/// The fixed set of verification kinds the ledger accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationType {
    #[serde(rename = "GPA")]
    Gpa,
    Employment,
    Degree,
}

impl VerificationType {
    pub const ALL: [VerificationType; 3] = [
        VerificationType::Gpa,
        VerificationType::Employment,
        VerificationType::Degree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationType::Gpa => "GPA",
            VerificationType::Employment => "Employment",
            VerificationType::Degree => "Degree",
        }
    }

    /// Payload fields that must be present for this kind of verification.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            VerificationType::Gpa => &["name", "university", "gpa"],
            VerificationType::Employment => &["name", "employer", "title"],
            VerificationType::Degree => &["name", "institution", "degree"],
        }
    }

    /// Validates the payload shape for this verification type.
    pub fn validate_payload(&self, payload: &JsonValue) -> Result<(), VerificationError> {
        let obj = payload.as_object().ok_or_else(|| {
            VerificationError::InvalidPayload("payload must be a JSON object".to_string())
        })?;
        for field in self.required_fields() {
            match obj.get(*field) {
                None | Some(JsonValue::Null) => {
                    return Err(VerificationError::InvalidPayload(format!(
                        "{} payload is missing field '{}'",
                        self, field
                    )))
                }
                Some(_) => {}
            }
        }
        if let Some(gpa) = obj.get("gpa") {
            if !gpa.is_number() {
                return Err(VerificationError::InvalidPayload(
                    "'gpa' must be a number".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for VerificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationType {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VerificationType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                VerificationError::InvalidPayload(format!("unknown verification type: {}", s))
            })
    }
}

/// A verification outcome about one subject.
///
/// The content hash is computed from the payload at construction and is not
/// settable afterwards, so it always matches the payload.
#[derive(Debug, Clone)]
pub struct VerificationRecord {
    pub subject_name: String,
    pub verification_type: VerificationType,
    pub payload: JsonValue,
    content_hash: H256,
    pub is_verified: bool,
    pub remark: String,
}

impl VerificationRecord {
    pub fn new(
        subject_name: impl Into<String>,
        verification_type: VerificationType,
        payload: JsonValue,
        is_verified: bool,
        remark: impl Into<String>,
    ) -> Self {
        let content_hash = content_hash(&payload);
        Self {
            subject_name: subject_name.into(),
            verification_type,
            payload,
            content_hash,
            is_verified,
            remark: remark.into(),
        }
    }

    pub fn content_hash(&self) -> H256 {
        self.content_hash
    }

    /// Checks the payload and the ledger size limits.
    pub fn validate(&self) -> Result<(), VerificationError> {
        self.verification_type.validate_payload(&self.payload)?;
        if self.remark.len() > MAX_REMARK_LEN {
            return Err(VerificationError::InvalidPayload(format!(
                "remark is {} bytes, limit is {}",
                self.remark.len(),
                MAX_REMARK_LEN
            )));
        }
        Ok(())
    }

    pub fn submission(&self) -> LedgerSubmission {
        LedgerSubmission {
            content_hash: self.content_hash,
            is_verified: self.is_verified,
            verification_type: self.verification_type,
            remark: self.remark.clone(),
        }
    }
}

/// The tuple written to the ledger for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSubmission {
    pub content_hash: H256,
    pub is_verified: bool,
    pub verification_type: VerificationType,
    pub remark: String,
}
