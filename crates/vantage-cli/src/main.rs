//! Vantage CLI - Command Line Interface
//!
//! Terminal front end for the Vantage dashboard query core. Reads from JSON
//! fixture files or a REST backend, depending on configuration.
//!
//! Key Features:
//! - Ranked, filtered and paginated user directory listing
//! - vCenter / cluster / tag scope resolution
//! - Resource usage series with combined and fallback sources
//! - Live watch mode with periodic polling
//!
//! @version 0.1.0
//! @author Vantage Development Team

mod fixtures;
mod render;
mod rest;

use clap::{Args, Parser, Subcommand};
use fixtures::FixtureSource;
use rest::RestSource;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use vantage_common::{DashboardConfig, Result, SelectionOption, SourceMode, VantageError};
use vantage_directory::{Directory, ListFilters, ListParams};
use vantage_selection::SelectionScope;
use vantage_streaming::{DirectorySource, MetricSource, MetricsPipeline, SelectionPipeline, SelectionSource};
use vantage_timeseries::MetricsView;

// =============================================================================
// CLI Arguments
// =============================================================================

#[derive(Parser)]
#[command(name = "vantage")]
#[command(author = "Vantage Development Team")]
#[command(version = "0.1.0")]
#[command(about = "Vantage infrastructure dashboard CLI", long_about = None)]
struct Cli {
    /// Configuration file; defaults apply when it does not exist
    #[arg(short, long, default_value = "vantage.toml", global = true)]
    config: PathBuf,

    /// Override the fixture data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ScopeArgs {
    /// vCenter to select instead of the first one listed
    #[arg(long)]
    vcenter: Option<String>,

    /// Cluster to select instead of the first one listed
    #[arg(long)]
    cluster: Option<String>,

    /// Tag filter; repeat for several tags
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// How long to wait for each selection list, in milliseconds
    #[arg(long, default_value_t = 3000)]
    settle_ms: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// List users, ranked by search relevance
    Users {
        /// Free-text search over name, id, email, Slack handle, manager and business unit
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        org: Option<String>,
        #[arg(long)]
        business_unit: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print the available filter values instead of users
        #[arg(long)]
        facets: bool,
    },
    /// Show a single user
    User { id: String },
    /// Resolve and print the vCenter / cluster / tag selection
    Scope(ScopeArgs),
    /// Print resource usage for a scope
    Metrics(ScopeArgs),
    /// Poll selection and usage continuously
    Watch {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Stop after this many usage updates
        #[arg(long)]
        cycles: Option<usize>,
    },
}

// =============================================================================
// Sources
// =============================================================================

struct Sources {
    directory: Arc<dyn DirectorySource>,
    selection: Arc<dyn SelectionSource>,
    metrics: Arc<dyn MetricSource>,
}

impl Sources {
    fn from_config(config: &DashboardConfig) -> Result<Self> {
        match config.sources.mode {
            SourceMode::Mock => {
                tracing::info!(data_dir = %config.sources.data_dir.display(), "Using fixture sources");
                let source = Arc::new(FixtureSource::new(&config.sources.data_dir));
                Ok(Self {
                    directory: source.clone(),
                    selection: source.clone(),
                    metrics: source,
                })
            }
            SourceMode::Rest => {
                let base_url = config.sources.base_url.as_deref().ok_or_else(|| {
                    VantageError::Configuration("rest source mode requires sources.base_url".to_string())
                })?;
                tracing::info!(base_url, "Using REST sources");
                let source = Arc::new(RestSource::new(base_url));
                Ok(Self {
                    directory: source.clone(),
                    selection: source.clone(),
                    metrics: source,
                })
            }
        }
    }
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = if cli.config.exists() {
        tracing::info!(path = %cli.config.display(), "Loading configuration");
        DashboardConfig::from_file(&cli.config)?
    } else {
        tracing::debug!(path = %cli.config.display(), "No configuration file, using defaults");
        DashboardConfig::default()
    };

    if let Some(data_dir) = &cli.data_dir {
        config.sources.data_dir = data_dir.clone();
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| VantageError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Commands
// =============================================================================

async fn load_directory(sources: &Sources, config: &DashboardConfig) -> Result<Directory> {
    let records = sources.directory.fetch().await?;
    tracing::debug!(records = records.len(), "Loaded directory");
    Ok(Directory::with_pagination(records, config.pagination.clone()))
}

/// Drive the selection pipeline until `done` holds or `limit` passes.
async fn wait_for(pipeline: &mut SelectionPipeline, limit: Duration, done: impl Fn(&SelectionScope) -> bool) {
    let settled = tokio::time::timeout(limit, async {
        while !done(pipeline.scope()) {
            if pipeline.next_effects().await.is_none() {
                break;
            }
        }
    })
    .await;

    if settled.is_err() {
        tracing::warn!(?limit, "Selection did not settle");
    }
}

async fn resolve_scope(pipeline: &mut SelectionPipeline, args: &ScopeArgs) -> SelectionScope {
    let limit = Duration::from_millis(args.settle_ms);
    pipeline.start();
    wait_for(pipeline, limit, |scope| scope.v_center_id.is_some()).await;

    if let Some(vcenter) = &args.vcenter {
        pipeline.select_vcenter(vcenter.clone());
    }
    for tag in &args.tags {
        pipeline.toggle_tag(tag.clone());
    }

    wait_for(pipeline, limit, |scope| scope.cluster_id.is_some()).await;
    if let Some(cluster) = &args.cluster {
        pipeline.select_cluster(cluster.clone());
    }

    pipeline.scope().clone()
}

async fn metrics_once(pipeline: &mut MetricsPipeline, limit: Duration) -> MetricsView {
    let settled = tokio::time::timeout(limit, async {
        while let Some(view) = pipeline.next_view().await {
            if view.loading.loading_complete {
                break;
            }
        }
    })
    .await;

    if settled.is_err() {
        tracing::warn!(?limit, "Usage sources still loading");
    }
    pipeline.view()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScopeReport<'a> {
    scope: &'a SelectionScope,
    vcenters: &'a [SelectionOption],
    clusters: &'a [SelectionOption],
    tags: &'a [SelectionOption],
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let sources = Sources::from_config(&config)?;

    match cli.command {
        Commands::Users {
            search,
            role,
            org,
            business_unit,
            active,
            page,
            limit,
            facets,
        } => {
            let directory = load_directory(&sources, &config).await?;
            if facets {
                let facets = directory.facets();
                return if cli.json {
                    print_json(&facets)
                } else {
                    println!("roles:          {}", facets.roles.join(", "));
                    println!("orgs:           {}", facets.orgs.join(", "));
                    println!("business units: {}", facets.business_units.join(", "));
                    Ok(())
                };
            }

            let mut params = ListParams::page(page).with_filters(ListFilters {
                search,
                role,
                org,
                business_unit,
                is_active: active,
            });
            if let Some(limit) = limit {
                params = params.with_limit(limit);
            }

            let result = directory.list(&params);
            if cli.json {
                print_json(&result)?;
            } else {
                print!("{}", render::users_table(&result));
            }
        }

        Commands::User { id } => {
            let directory = load_directory(&sources, &config).await?;
            let user = directory.get(&id)?;
            if cli.json {
                print_json(user)?;
            } else {
                print!("{}", render::user_detail(user));
            }
        }

        Commands::Scope(args) => {
            let mut selection = SelectionPipeline::from_config(sources.selection.clone(), &config.polling);
            resolve_scope(&mut selection, &args).await;

            let state = selection.state();
            if cli.json {
                print_json(&ScopeReport {
                    scope: &state.scope,
                    vcenters: &state.vcenters,
                    clusters: &state.clusters,
                    tags: &state.tags,
                })?;
            } else {
                print!("{}", render::selection(state));
            }
            selection.shutdown().await;
        }

        Commands::Metrics(args) => {
            let mut selection = SelectionPipeline::from_config(sources.selection.clone(), &config.polling);
            let scope = resolve_scope(&mut selection, &args).await;
            selection.shutdown().await;

            let mut metrics = MetricsPipeline::from_config(sources.metrics.clone(), &config.polling);
            metrics.set_scope(scope);
            let view = metrics_once(&mut metrics, Duration::from_millis(args.settle_ms)).await;
            metrics.shutdown().await;

            if cli.json {
                print_json(&view)?;
            } else {
                print!("{}", render::metrics(&view));
            }
        }

        Commands::Watch { scope, cycles } => {
            watch(&sources, &config, &scope, cycles, cli.json).await?;
        }
    }

    Ok(())
}

async fn watch(
    sources: &Sources,
    config: &DashboardConfig,
    args: &ScopeArgs,
    cycles: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut selection = SelectionPipeline::from_config(sources.selection.clone(), &config.polling);
    let scope = resolve_scope(&mut selection, args).await;

    let mut metrics = MetricsPipeline::from_config(sources.metrics.clone(), &config.polling);
    metrics.set_scope(scope);

    let mut clock = tokio::time::interval(config.polling.clock());
    let mut summary = tokio::time::interval(config.polling.metrics_table());
    summary.tick().await;
    let mut updates = 0usize;

    let outcome = loop {
        tokio::select! {
            effects = selection.next_effects() => {
                let Some(effects) = effects else {
                    break Err(VantageError::ChannelClosed("selection updates".to_string()));
                };
                if !effects.is_empty() {
                    tracing::info!(?effects, "Selection changed");
                    metrics.set_scope(selection.scope().clone());
                }
            }
            view = metrics.next_view() => {
                let Some(view) = view else {
                    break Err(VantageError::ChannelClosed("metrics updates".to_string()));
                };
                if json {
                    if let Err(e) = print_json(&view) {
                        break Err(e);
                    }
                } else {
                    print!("{}", render::metrics(&view));
                }
                updates += 1;
                if cycles.is_some_and(|max| updates >= max) {
                    break Ok(());
                }
            }
            _ = summary.tick() => {
                let view = metrics.view();
                if !json && !view.loading.is_loading && !view.loading.is_empty {
                    print!("{}", render::summary(&view));
                }
            }
            _ = clock.tick() => {
                tracing::info!(time = %chrono::Utc::now().format("%Y-%m-%d %H:%M UTC"), "Dashboard clock");
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break Ok(());
            }
        }
    };

    metrics.shutdown().await;
    selection.shutdown().await;
    outcome
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(retryable = e.is_retryable(), "{}", e);
        std::process::exit(if e.is_user_error() { 2 } else { 1 });
    }
}
