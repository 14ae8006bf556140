// File: zta-common/src/models/redeem_code.rs

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Codes are exactly this many uppercase ASCII letters.
pub const CODE_LEN: usize = 15;

/// Suffix stamped onto generated codes (PLANETHUNTERZTA, COSMOSMASTERZTA, ...).
const CODE_SUFFIX: &str = "ZTA";

/// A single-use rank code. Once `used` is set the code is permanently
/// inert: `used_by` records the one claimant and is never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RedeemCode {
    pub code: String,
    /// The rank granted to whoever claims this code.
    pub role: String,
    pub used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
}

/// Result of an atomic claim attempt against the code registry.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// The code was unused; it is now burned and the role merged onto the
    /// claimant's profile, both in the same transaction.
    Claimed(RedeemCode),
    NotFound,
    AlreadyClaimed,
}

impl RedeemCode {
    /// `code` must already be normalized (see [`RedeemCode::normalize`]).
    pub fn new(code: &str, role: &str) -> Self {
        Self {
            code: code.to_string(),
            role: role.to_string(),
            used: false,
            used_by: None,
            used_at: None,
        }
    }

    /// Trims and upper-cases user input, then checks the 15-letter A-Z
    /// shape. Purely local; the registry is never consulted on the
    /// reject path.
    pub fn normalize(input: &str) -> Result<String, Error> {
        let code = input.trim().to_uppercase();
        if code.len() != CODE_LEN || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(Error::Validation(
                "Code must be exactly 15 letters (A-Z only)".to_string(),
            ));
        }
        Ok(code)
    }

    /// Mints a fresh well-formed code ending in the `ZTA` suffix.
    pub fn generate(role: &str, rng: &mut impl Rng) -> Self {
        let body: String = (0..CODE_LEN - CODE_SUFFIX.len())
            .map(|_| rng.random_range(b'A'..=b'Z') as char)
            .collect();
        Self::new(&format!("{body}{CODE_SUFFIX}"), role)
    }
}
