// zta-core/tests/redemption_flow.rs
//
// End-to-end redemption semantics against an in-memory registry whose
// claim path honors the same atomicity contract as the Postgres one.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use zta_common::models::{ClaimOutcome, RedeemCode, UserAccount};
use zta_common::traits::RedeemCodeRepository;
use zta_common::Error;
use zta_core::services::RedemptionService;

/// Registry + profile store under one lock, so a claim burns the code and
/// merges the role as a single step, like the SQL transaction does.
#[derive(Default)]
struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    codes: HashMap<String, RedeemCode>,
    users: HashMap<Uuid, UserAccount>,
}

impl MemoryStore {
    async fn add_user(&self, user: UserAccount) {
        self.inner.lock().await.users.insert(user.user_id, user);
    }

    async fn user(&self, user_id: Uuid) -> Option<UserAccount> {
        self.inner.lock().await.users.get(&user_id).cloned()
    }

    async fn code(&self, code: &str) -> Option<RedeemCode> {
        self.inner.lock().await.codes.get(code).cloned()
    }
}

#[async_trait]
impl RedeemCodeRepository for MemoryStore {
    async fn create(&self, code: &RedeemCode) -> Result<(), Error> {
        self.inner
            .lock()
            .await
            .codes
            .insert(code.code.clone(), code.clone());
        Ok(())
    }

    async fn get(&self, code: &str) -> Result<Option<RedeemCode>, Error> {
        Ok(self.inner.lock().await.codes.get(code).cloned())
    }

    async fn claim(&self, code: &str, user_id: Uuid) -> Result<ClaimOutcome, Error> {
        let mut inner = self.inner.lock().await;
        let Some(record) = inner.codes.get_mut(code) else {
            return Ok(ClaimOutcome::NotFound);
        };
        if record.used {
            return Ok(ClaimOutcome::AlreadyClaimed);
        }
        record.used = true;
        record.used_by = Some(user_id);
        record.used_at = Some(Utc::now());
        let claimed = record.clone();
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.role = Some(claimed.role.clone());
        }
        Ok(ClaimOutcome::Claimed(claimed))
    }

    async fn list_all(&self) -> Result<Vec<RedeemCode>, Error> {
        Ok(self.inner.lock().await.codes.values().cloned().collect())
    }

    async fn delete(&self, code: &str) -> Result<(), Error> {
        self.inner.lock().await.codes.remove(code);
        Ok(())
    }
}

fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::default())
}

#[tokio::test]
async fn fresh_code_is_claimed_exactly_once() {
    let store = memory_store();
    store
        .create(&RedeemCode::new("PLANETHUNTERZTA", "Planet Hunter"))
        .await
        .unwrap();

    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();
    store.add_user(UserAccount::new(u1, "u1", "u1@example.com")).await;
    store.add_user(UserAccount::new(u2, "u2", "u2@example.com")).await;

    let svc = RedemptionService::new(store.clone());

    // U1 redeems: code burns, profile gains the role.
    let claimed = svc.redeem(u1, "PLANETHUNTERZTA").await.unwrap();
    assert_eq!(claimed.role, "Planet Hunter");

    let record = store.code("PLANETHUNTERZTA").await.unwrap();
    assert!(record.used);
    assert_eq!(record.used_by, Some(u1));
    assert!(record.used_at.is_some());
    assert_eq!(
        store.user(u1).await.unwrap().role.as_deref(),
        Some("Planet Hunter")
    );

    // U2 is rejected and left untouched.
    let err = svc.redeem(u2, "PLANETHUNTERZTA").await.unwrap_err();
    assert!(matches!(err, Error::CodeAlreadyClaimed));
    assert_eq!(store.user(u2).await.unwrap().role, None);
    // The claimant on record never changes.
    assert_eq!(
        store.code("PLANETHUNTERZTA").await.unwrap().used_by,
        Some(u1)
    );
}

#[tokio::test]
async fn later_redemption_overwrites_the_earlier_role() {
    let store = memory_store();
    store
        .create(&RedeemCode::new("PLANETHUNTERZTA", "Planet Hunter"))
        .await
        .unwrap();
    store
        .create(&RedeemCode::new("COSMOSMASTERZTA", "Cosmos Master"))
        .await
        .unwrap();

    let u1 = Uuid::new_v4();
    store.add_user(UserAccount::new(u1, "u1", "u1@example.com")).await;

    let svc = RedemptionService::new(store.clone());
    svc.redeem(u1, "PLANETHUNTERZTA").await.unwrap();
    svc.redeem(u1, "COSMOSMASTERZTA").await.unwrap();

    // Merge semantics: the grant overwrites, it does not accumulate.
    assert_eq!(
        store.user(u1).await.unwrap().role.as_deref(),
        Some("Cosmos Master")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_claims_yield_one_winner() {
    let store = memory_store();
    store
        .create(&RedeemCode::new("COSMOSMASTERZTA", "Cosmos Master"))
        .await
        .unwrap();

    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();
    store.add_user(UserAccount::new(u1, "u1", "u1@example.com")).await;
    store.add_user(UserAccount::new(u2, "u2", "u2@example.com")).await;

    let svc = Arc::new(RedemptionService::new(store.clone()));
    let a = {
        let svc = svc.clone();
        tokio::spawn(async move { svc.redeem(u1, "COSMOSMASTERZTA").await })
    };
    let b = {
        let svc = svc.clone();
        tokio::spawn(async move { svc.redeem(u2, "COSMOSMASTERZTA").await })
    };

    let (ra, rb) = (a.await.unwrap(), b.await.unwrap());
    let wins = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one concurrent claim may succeed");

    let loser = if ra.is_ok() { rb } else { ra };
    assert!(matches!(loser, Err(Error::CodeAlreadyClaimed)));

    let record = store.code("COSMOSMASTERZTA").await.unwrap();
    assert!(record.used_by == Some(u1) || record.used_by == Some(u2));
}

#[tokio::test]
async fn unknown_code_leaves_the_registry_unmodified() {
    let store = memory_store();
    store
        .create(&RedeemCode::new("PLANETHUNTERZTA", "Planet Hunter"))
        .await
        .unwrap();

    let svc = RedemptionService::new(store.clone());
    let err = svc
        .redeem(Uuid::new_v4(), "NEBULAWATCHERAA")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CodeNotFound));

    let record = store.code("PLANETHUNTERZTA").await.unwrap();
    assert!(!record.used);
}
