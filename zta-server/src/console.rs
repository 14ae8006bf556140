// zta-server/src/console.rs
//
// Line-based operator console standing in for the site's forms: sign-up,
// login, code redemption, and the admin pages.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use zta_common::traits::UserRepository;
use zta_core::auth::{AdminGate, SessionManager};
use zta_core::services::RedemptionService;
use zta_core::Error;

pub async fn run(
    sessions: Arc<SessionManager>,
    redemption: Arc<RedemptionService>,
    users: Arc<dyn UserRepository>,
    admin: Arc<AdminGate>,
) -> anyhow::Result<()> {
    println!("ZTA console ready. Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if matches!(line, "quit" | "exit") {
                    break;
                }
                dispatch(line, &sessions, &redemption, &users, &admin).await;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let _ = sessions.sign_out();
    Ok(())
}

async fn dispatch(
    line: &str,
    sessions: &SessionManager,
    redemption: &RedemptionService,
    users: &Arc<dyn UserRepository>,
    admin: &AdminGate,
) {
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let outcome = match (cmd, args.as_slice()) {
        ("help", _) => {
            print_help();
            Ok(())
        }
        ("signup", [username, email, password]) => {
            sessions.sign_up(username, email, password).await.map(|u| {
                println!("welcome, {}! you can now log in.", u.username);
            })
        }
        ("login", [email, password]) => {
            sessions.sign_in(email, password).await.map(|u| {
                match &u.role {
                    Some(role) => println!("logged in as {} ({role})", u.username),
                    None => println!("logged in as {}", u.username),
                }
            })
        }
        ("logout", _) => {
            let _ = sessions.sign_out();
            println!("logged out.");
            Ok(())
        }
        ("whoami", _) => match sessions.current_user().await {
            Ok(Some(u)) => {
                println!(
                    "{} <{}> rank: {}",
                    u.username,
                    u.email,
                    u.role.as_deref().unwrap_or("none")
                );
                Ok(())
            }
            Ok(None) => {
                println!("not signed in.");
                Ok(())
            }
            Err(e) => Err(e),
        },
        ("redeem", [code]) => redeem(sessions, redemption, code).await,
        ("admin", [password]) => {
            if admin.check_password(password) {
                println!("admin access granted.");
            } else {
                println!("wrong admin password.");
            }
            Ok(())
        }
        ("codes", _) => match admin.require_admin() {
            Ok(()) => redemption.list_codes().await.map(|codes| {
                for c in &codes {
                    let status = match c.used_by {
                        Some(claimant) => format!("claimed by {claimant}"),
                        None => "unused".to_string(),
                    };
                    println!("{}  {}  [{status}]", c.code, c.role);
                }
                println!("{} code(s).", codes.len());
            }),
            Err(e) => Err(e),
        },
        ("mint", rest) if !rest.is_empty() => match admin.require_admin() {
            Ok(()) => redemption.generate_code(&rest.join(" ")).await.map(|c| {
                println!("minted {} granting '{}'", c.code, c.role);
            }),
            Err(e) => Err(e),
        },
        ("addcode", [code, rest @ ..]) if !rest.is_empty() => match admin.require_admin() {
            Ok(()) => redemption.create_code(code, &rest.join(" ")).await.map(|c| {
                println!("registered {} granting '{}'", c.code, c.role);
            }),
            Err(e) => Err(e),
        },
        ("revoke", [code]) => match admin.require_admin() {
            Ok(()) => redemption.revoke_code(code).await.map(|()| {
                println!("revoked.");
            }),
            Err(e) => Err(e),
        },
        ("ban", [email]) => set_banned(users, admin, email, true).await,
        ("unban", [email]) => set_banned(users, admin, email, false).await,
        ("users", _) => match admin.require_admin() {
            Ok(()) => users.list_all().await.map(|list| {
                for u in &list {
                    println!(
                        "{}  {} <{}>  rank: {}{}",
                        u.user_id,
                        u.username,
                        u.email,
                        u.role.as_deref().unwrap_or("none"),
                        if u.banned { "  [banned]" } else { "" }
                    );
                }
                println!("{} account(s).", list.len());
            }),
            Err(e) => Err(e),
        },
        _ => {
            println!("unrecognized command; try 'help'.");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        if e.is_persistence() {
            println!("Something went wrong. Try again.");
            tracing::error!("console command '{cmd}' failed: {e}");
        } else {
            println!("{e}");
        }
    }
}

async fn redeem(
    sessions: &SessionManager,
    redemption: &RedemptionService,
    code: &str,
) -> Result<(), Error> {
    let user_id: Uuid = sessions.require_user()?;
    let claimed = redemption.redeem(user_id, code).await?;
    println!("CLAIMED!");
    println!("  {}", claimed.role);
    println!("Your rank is now permanent");
    Ok(())
}

async fn set_banned(
    users: &Arc<dyn UserRepository>,
    admin: &AdminGate,
    email: &str,
    banned: bool,
) -> Result<(), Error> {
    admin.require_admin()?;
    let user = users
        .get_by_email(email)
        .await?
        .ok_or_else(|| Error::NotFound(format!("no account for '{email}'")))?;
    users.set_banned(user.user_id, banned).await?;
    println!(
        "{} is now {}.",
        user.username,
        if banned { "banned" } else { "unbanned" }
    );
    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  signup <username> <email> <password>");
    println!("  login <email> <password>");
    println!("  logout");
    println!("  whoami");
    println!("  redeem <code>");
    println!("  admin <password>");
    println!("  codes | mint <role> | addcode <code> <role> | revoke <code>   (admin)");
    println!("  users | ban <email> | unban <email>                           (admin)");
    println!("  quit");
}
