mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use rp_core::config::{ServerConfig, ToolsConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelpress=trace,rp_server=trace,rp_fetch=trace,rp_av=trace,rp_core=trace,tower_http=debug".to_string()
        } else {
            "reelpress=debug,rp_server=debug,rp_fetch=debug,rp_av=debug,rp_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(rp_server::serve(ServerConfig { host, port }))?;
            Ok(())
        }
        Commands::CheckTools => check_tools(),
    }
}

fn check_tools() -> Result<()> {
    let registry = rp_av::ToolRegistry::discover(&ToolsConfig::from_env());

    let mut all_found = true;
    for info in registry.check_all() {
        if info.available {
            println!(
                "✓ {} - {}",
                info.name,
                info.version.as_deref().unwrap_or("unknown version")
            );
        } else {
            println!("✗ {} - not found", info.name);
            all_found = false;
        }
    }

    if !all_found {
        anyhow::bail!("Some required tools are missing");
    }
    Ok(())
}
