use anyhow::{Context, Result};
use clap::Parser;
use uuid::Uuid;

use expense_tracker::services::auth::TokenIssuer;

/// Mint an HS256 access token accepted by the expense API.
///
/// Meant for local development and manual testing; production tokens come from
/// the identity service. Reads `JWT_SECRET` from the environment (or `.env`).
#[derive(Parser, Debug)]
#[command(name = "issue-token", version, about)]
struct Args {
    /// User id to embed as `user.id`. Default: random UUID v4.
    #[arg(long)]
    user: Option<Uuid>,

    /// Shared signing secret
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    secret: String,

    /// Lifetime in seconds
    #[arg(long, env = "TOKEN_TTL_SECONDS", default_value_t = 3600)]
    ttl: u64,

    /// Print only the token (no extra lines)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let user = args.user.unwrap_or_else(Uuid::new_v4);
    let issuer = TokenIssuer::new(&args.secret, args.ttl).context("building token issuer")?;
    let token = issuer.issue(user).context("signing token")?;

    if args.quiet {
        println!("{token}");
        return Ok(());
    }

    println!("x-auth-token: {token}");
    println!("user.id: {user}");
    println!("expires in: {}s", issuer.ttl_seconds());

    Ok(())
}
