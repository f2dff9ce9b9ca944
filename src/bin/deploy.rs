// src/bin/deploy.rs
//
// Initializes the on-chain verification registry, records its address in the
// deployment file and optionally authorizes a second verifier account.

use verification_ledger::infra::config;
use verification_ledger::solana::client::parse_pubkey;
use verification_ledger::solana::{deployment, SolanaConnection};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin deploy\n\
         \n\
         Requires env vars:\n\
           SOLANA_RPC_URL, SOLANA_PROGRAM_ID\n\
         Optional:\n\
           SOLANA_KEYPAIR_PATH (default ~/.config/solana/id.json)\n\
           DEPLOYMENT_FILE (default deployment.json)\n\
           AUTHORIZED_VERIFIER (pubkey allowed to store results)\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    config::load_env();
    config::init_tracing();

    if std::env::args().skip(1).any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    if let Err(e) = run().await {
        eprintln!("> Deployment failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let conn = SolanaConnection::from_env()?;
    println!("> Deploying verification registry for program {}", conn.program_id());
    println!("> Authority: {}", conn.payer());

    let registry = conn.initialize_registry().await?;
    let path = config::deployment_file();
    deployment::save_address(&path, &registry)?;
    println!("> Registry address: {}", registry);
    println!("> Wrote {}", path.display());

    if let Some(raw) = config::authorized_verifier() {
        let verifier = parse_pubkey("AUTHORIZED_VERIFIER", &raw)?;
        match conn.authorize_verifier(&verifier).await? {
            Some(signature) => println!("> Authorized {} (tx {})", verifier, signature),
            None => println!("> {} was already authorized", verifier),
        }
    }

    println!("> Deployment OK.");
    Ok(())
}
