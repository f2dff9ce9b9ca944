use verification_ledger::infra::config;
use verification_ledger::solana::{deployment, SolanaConnection, SolanaLedger};
use verification_ledger::Ledger;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--init-registry-if-missing]\n\
         \n\
         Requires env vars:\n\
           SOLANA_RPC_URL, SOLANA_PROGRAM_ID\n\
         And a Solana payer key:\n\
           SOLANA_KEYPAIR_PATH (default ~/.config/solana/id.json)\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_env();
    config::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let init_if_missing = args.iter().any(|a| a == "--init-registry-if-missing");

    // Force-read config (nice error messages if missing)
    let rpc_url = config::solana_rpc_url()?;
    let program_id_str = config::solana_program_id()?;
    let compute_limit = config::compute_unit_limit()?;

    println!("> Preflight:");
    println!("  SOLANA_RPC_URL={}", rpc_url);
    println!("  SOLANA_PROGRAM_ID={}", program_id_str);
    println!("  LEDGER_COMPUTE_UNIT_LIMIT={}", compute_limit);
    for (name, present) in [
        ("DATABASE_URL", config::database_url().is_ok()),
        ("MAIL_RELAY_URL", config::mail_relay_url().is_ok()),
        ("MAIL_FROM", config::mail_from().is_ok()),
    ] {
        if !present {
            eprintln!("  Warning: {} is not set (needed by the notification sweep).", name);
        }
    }

    let conn = SolanaConnection::from_env()?;
    let client = conn.rpc();

    // Basic RPC connectivity
    let version = client.get_version().await?;
    println!("  RPC version: {}", version.solana_core);

    // Payer balance
    let balance_lamports = client.get_balance(&conn.payer()).await?;
    let sol = balance_lamports as f64 / 1_000_000_000_f64;
    println!("  Payer: {}", conn.payer());
    println!("  Payer balance: {} lamports (~{:.6} SOL)", balance_lamports, sol);
    if balance_lamports < 10_000_000 {
        eprintln!("  Warning: payer balance looks low; transactions may fail.");
    }

    // Program account existence
    let program_acct = conn
        .fetch_account(&conn.program_id())
        .await?
        .ok_or_else(|| anyhow::anyhow!("Program account not found on cluster: {}", conn.program_id()))?;
    if !program_acct.executable {
        eprintln!("  Warning: program account exists but is not marked executable.");
    } else {
        println!("  Program account is deployed + executable.");
    }

    // Registry existence
    let registry = conn.registry_address();
    println!("  Registry PDA: {}", registry);
    if conn.fetch_account(&registry).await?.is_some() {
        println!("  Registry account exists.");
    } else if init_if_missing {
        println!("  Registry missing -> initializing...");
        conn.initialize_registry().await?;
        deployment::save_address(&config::deployment_file(), &registry)?;
        println!("  Registry initialized.");
    } else {
        return Err(anyhow::anyhow!(
            "Verification registry does not exist. Run the deploy binary or re-run with --init-registry-if-missing"
        ));
    }

    // Deployment file must point at the same registry
    let ledger = SolanaLedger::new(conn, deployment::load_address(&config::deployment_file())?, compute_limit)?;
    let count = ledger.verification_count().await?;
    println!("  Registry readable (ok). Verification count={}", count);

    println!("> Preflight OK.");
    Ok(())
}
