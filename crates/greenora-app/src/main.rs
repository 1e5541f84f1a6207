//! Greenora application binary - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Initialize tracing
//! 3. Load the plant knowledge base
//! 4. Either serve the REST API or run a terminal chat session

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use greenora_api::routes;
use greenora_api::state::AppState;
use greenora_chat::{
    ChatOrchestrator, DialogueController, DialogueOptions, KnowledgeBase, SubmitOutcome,
    QUICK_QUESTIONS,
};
use greenora_client::MarketplaceClient;
use greenora_core::config::GreenoraConfig;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config comes first so its log level can seed the filter.
    let config_file = args.resolve_config_path();
    let loaded = GreenoraConfig::load(&config_file);
    let mut config = match &loaded {
        Ok(c) => c.clone(),
        Err(_) => GreenoraConfig::default(),
    };
    config.apply_env_overrides();
    args.apply(&mut config);

    // Tracing. RUST_LOG wins over everything else.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Greenora v{}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(_) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
    }

    // Knowledge base.
    let knowledge_path: Option<PathBuf> = config
        .assistant
        .knowledge_path
        .as_deref()
        .map(cli::expand_home);
    let knowledge = match KnowledgeBase::load_or_builtin(knowledge_path.as_deref()) {
        Ok(kb) => Arc::new(kb),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load plant knowledge");
            return Err(e.into());
        }
    };
    tracing::info!(plants = knowledge.len(), "Plant knowledge ready");

    let options = DialogueOptions::from_config(&config.assistant);

    if args.chat {
        run_chat(knowledge, options, &config).await?;
        return Ok(());
    }

    // === API server ===

    let state = AppState::new(config.clone(), ChatOrchestrator::new(knowledge, options));
    routes::start_server(&config, state, shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::warn!(error = %e, "Failed to listen for Ctrl-C"),
    }
}

/// Interactive terminal session. `/quit` or end of input stops it.
async fn run_chat(
    knowledge: Arc<KnowledgeBase>,
    options: DialogueOptions,
    config: &GreenoraConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = DialogueController::new(Arc::clone(&knowledge), options);
    let mut stdout = tokio::io::stdout();

    for message in controller.session().messages() {
        print_block(&mut stdout, "VrikshaVed AI", message.paragraphs()).await?;
    }
    let mut intro = String::from("Quick questions:\n");
    for question in QUICK_QUESTIONS {
        intro.push_str(&format!("• {}\n", question));
    }
    intro.push_str("Commands: /plants (marketplace catalog), /quit");
    print_block(&mut stdout, "", intro.lines()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"you> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "/quit" => break,
            "/plants" => {
                let catalog = catalog_listing(config, &knowledge).await;
                print_block(&mut stdout, "", catalog.lines()).await?;
                continue;
            }
            _ => {}
        }

        match controller.submit(&line) {
            SubmitOutcome::Accepted { .. } => {
                stdout.write_all("VrikshaVed AI is typing...\n".as_bytes()).await?;
                stdout.flush().await?;
                if let Some(reply) = controller.settle().await {
                    print_block(&mut stdout, "VrikshaVed AI", reply.paragraphs()).await?;
                }
            }
            SubmitOutcome::Ignored(reason) => {
                tracing::debug!(%reason, "Input ignored");
            }
        }
    }

    tracing::info!(messages = controller.session().len(), "Chat session ended");
    Ok(())
}

/// Backend catalog, or the assistant's own plants if the backend is down.
async fn catalog_listing(config: &GreenoraConfig, knowledge: &KnowledgeBase) -> String {
    let fetched = match MarketplaceClient::from_config(&config.backend) {
        Ok(client) => client.list_plants().await,
        Err(e) => Err(e),
    };
    match fetched {
        Ok(plants) if !plants.is_empty() => plants
            .iter()
            .map(|p| {
                let benefits: Vec<&str> =
                    p.headline_benefits().iter().map(String::as_str).collect();
                format!("• {} ({}) {}", p.name, p.price_label(), benefits.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Ok(_) => "The marketplace catalog is empty.".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch catalog, listing known plants");
            let names: Vec<String> = knowledge
                .plants()
                .iter()
                .map(|p| format!("• {} ({})", p.display_name, p.price_range))
                .collect();
            format!("Marketplace unavailable. Plants I know about:\n{}", names.join("\n"))
        }
    }
}

/// One chat bubble: speaker line, then each paragraph indented.
async fn print_block<'a>(
    stdout: &mut tokio::io::Stdout,
    speaker: &str,
    paragraphs: impl IntoIterator<Item = &'a str>,
) -> std::io::Result<()> {
    let mut out = String::new();
    if !speaker.is_empty() {
        out.push_str(speaker);
        out.push_str(":\n");
    }
    for paragraph in paragraphs {
        out.push_str("  ");
        out.push_str(paragraph);
        out.push('\n');
    }
    out.push('\n');
    stdout.write_all(out.as_bytes()).await?;
    stdout.flush().await
}
