pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod http;
pub mod identity;
pub mod pagination;
pub mod pipeline;
pub mod rate_limiter;
pub mod rating;
pub mod reference;
pub mod report;
pub mod services;
pub mod sources;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::Cli;

use crate::api::ChessComClient;
use crate::cache::Cache;
use crate::cli::{AnalyzeArgs, Command};
use crate::config::settings::AppConfig;
use crate::reference::RatingColumn;
use crate::services::{AnalysisRequest, AnalysisService, ReferenceBuildService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = args.to_config();
    let request = AnalysisRequest {
        player: args.player.clone(),
        since: args.since,
        until: args.until,
    };
    let top_opponents = config.analysis.top_opponents;

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(async {
        let mut client = ChessComClient::new(&config.scraper, &config.analysis)?;
        if !args.no_cache {
            client = client.with_cache(Cache::new(config.scraper.cache_dir)?);
        }

        let mut service = AnalysisService::new(config, client)?;
        if !args.no_save {
            let pool = database::create_pool(&AppConfig::database_path())?;
            service = service.with_database(pool);
        }
        service.run(&request).await
    })?;

    crate::report::print_report(&request.player, &report, top_opponents);
    Ok(())
}

pub fn handle_build_reference(
    input: &str,
    output: &str,
    min_rating: i32,
    column: RatingColumn,
) -> Result<()> {
    let service = ReferenceBuildService::new(input, output, min_rating, column);
    let store = service.run()?;
    println!("Wrote {} reference ratings to {}", store.len(), output);
    Ok(())
}

pub fn handle_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
