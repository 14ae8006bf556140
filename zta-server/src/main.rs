use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::{watch, Mutex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zta_core::auth::{AdminGate, LocalState, PostgresAuthProvider, SessionManager};
use zta_core::presence::PresenceRecorder;
use zta_core::repositories::{
    PostgresPresenceRepository, PostgresRedeemCodeRepository, PostgresUserRepository,
};
use zta_core::services::RedemptionService;
use zta_core::tasks::presence_sweep::spawn_presence_sweep_task;
use zta_core::tasks::starfield::{spawn_starfield_task, ParticleField, NUM_PARTICLES};
use zta_core::Database;

mod console;

#[derive(Parser, Debug, Clone)]
#[command(name = "zta-server")]
#[command(author, version, about = "ZTA astrophotography site backend: accounts, presence, and rank code redemption")]
struct Args {
    /// Postgres connection URL (DATABASE_URL overrides).
    #[arg(long, default_value = "postgres://zta@localhost:5432/zta")]
    db_url: String,

    /// Master password for the admin gate.
    #[arg(long, default_value = "89OQBSADETWNA")]
    admin_password: String,

    /// How often the presence sweeper runs, in seconds.
    #[arg(long, default_value_t = 60)]
    presence_sweep_secs: u64,

    /// How long an un-refreshed "online" marker survives, in seconds.
    #[arg(long, default_value_t = 300)]
    presence_ttl_secs: i64,

    /// Register this code and exit (requires --seed-role).
    #[arg(long)]
    seed_code: Option<String>,

    /// Role granted by --seed-code.
    #[arg(long)]
    seed_role: Option<String>,

    /// Run background tasks only, without the interactive console.
    #[arg(long, default_value_t = false)]
    headless: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let db_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| args.db_url.clone());

    let db = Database::new(&db_url).await?;
    db.migrate().await?;

    let users = Arc::new(PostgresUserRepository::new(db.pool().clone()));
    let codes = Arc::new(PostgresRedeemCodeRepository::new(db.pool().clone()));
    let presence_repo = Arc::new(PostgresPresenceRepository::new(db.pool().clone()));
    let provider = Arc::new(PostgresAuthProvider::new(db.pool().clone()));

    let redemption = Arc::new(RedemptionService::new(codes));

    if let Some(code) = &args.seed_code {
        let Some(role) = &args.seed_role else {
            anyhow::bail!("--seed-code requires --seed-role");
        };
        let record = redemption.create_code(code, role).await?;
        info!("seeded code '{}' granting '{}'", record.code, record.role);
        return Ok(());
    }

    let state = Arc::new(LocalState::new());
    let recorder = PresenceRecorder::new(presence_repo.clone());
    let sessions = Arc::new(SessionManager::new(
        provider,
        users.clone(),
        recorder,
        state.clone(),
    ));
    let admin = Arc::new(AdminGate::new(args.admin_password.clone(), state));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweep_handle = spawn_presence_sweep_task(
        presence_repo,
        Duration::from_secs(args.presence_sweep_secs),
        chrono::Duration::seconds(args.presence_ttl_secs),
        shutdown_rx.clone(),
    );

    // The decorative star background; nothing else reads it.
    let field = Arc::new(Mutex::new(ParticleField::new(
        1920.0,
        1080.0,
        NUM_PARTICLES,
        &mut rand::rng(),
    )));
    let starfield_handle = spawn_starfield_task(field, Duration::from_millis(16), shutdown_rx);

    if args.headless {
        info!("running headless; ctrl-c to stop");
        tokio::signal::ctrl_c().await?;
    } else {
        console::run(sessions, redemption, users, admin).await?;
    }

    info!("shutting down");
    let _ = shutdown_tx.send(true);
    if let Err(e) = sweep_handle.await {
        error!("presence sweeper did not stop cleanly: {e}");
    }
    if let Err(e) = starfield_handle.await {
        error!("starfield task did not stop cleanly: {e}");
    }

    Ok(())
}
