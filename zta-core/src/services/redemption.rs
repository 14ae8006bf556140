// src/services/redemption.rs

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use zta_common::models::{ClaimOutcome, RedeemCode};
use zta_common::traits::RedeemCodeRepository;

use crate::Error;

/// Exactly-once consumption of single-use rank codes, plus the admin-side
/// registry operations. The atomicity contract lives in
/// [`RedeemCodeRepository::claim`]; this layer validates input locally and
/// maps outcomes onto user-facing errors.
pub struct RedemptionService {
    codes: Arc<dyn RedeemCodeRepository>,
}

impl RedemptionService {
    pub fn new(codes: Arc<dyn RedeemCodeRepository>) -> Self {
        Self { codes }
    }

    /// Redeems `raw_input` for the signed-in identity `user_id`.
    ///
    /// Malformed input is rejected before the registry is touched. On
    /// success the returned record carries the granted role for display;
    /// the code is burned and the role merged onto the profile in one
    /// transaction, so a burned code without a grant cannot occur.
    pub async fn redeem(&self, user_id: Uuid, raw_input: &str) -> Result<RedeemCode, Error> {
        let code = RedeemCode::normalize(raw_input)?;

        match self.codes.claim(&code, user_id).await? {
            ClaimOutcome::Claimed(claimed) => {
                info!("{user_id} claimed '{}' -> role '{}'", claimed.code, claimed.role);
                Ok(claimed)
            }
            ClaimOutcome::NotFound => Err(Error::CodeNotFound),
            ClaimOutcome::AlreadyClaimed => Err(Error::CodeAlreadyClaimed),
        }
    }

    /// Registers a new unused code with the given role grant.
    pub async fn create_code(&self, code: &str, role: &str) -> Result<RedeemCode, Error> {
        let code = RedeemCode::normalize(code)?;
        if self.codes.get(&code).await?.is_some() {
            return Err(Error::Validation(format!("code {code} already exists")));
        }
        let record = RedeemCode::new(&code, role);
        self.codes.create(&record).await?;
        info!("registered code '{}' granting '{}'", record.code, record.role);
        Ok(record)
    }

    /// Mints a random well-formed code for `role` and registers it.
    pub async fn generate_code(&self, role: &str) -> Result<RedeemCode, Error> {
        let record = RedeemCode::generate(role, &mut rand::rng());
        self.codes.create(&record).await?;
        info!("minted code '{}' granting '{}'", record.code, record.role);
        Ok(record)
    }

    pub async fn list_codes(&self) -> Result<Vec<RedeemCode>, Error> {
        self.codes.list_all().await
    }

    /// Removes a code from the registry entirely (used or not).
    pub async fn revoke_code(&self, code: &str) -> Result<(), Error> {
        let code = RedeemCode::normalize(code)?;
        self.codes.delete(&code).await
    }
}
