//! reqtrace CLI — requirements-traceability ledger.
//!
//! A thin host around the library crates: the link collection is persisted
//! as a JSON dump, entity and topology snapshots are JSON files exported by
//! the external model, and every analyzer prints its findings without ever
//! mutating anything.

mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser};
use serde::Serialize;

use reqtrace_analysis::{
    build_report, find_cycles, find_orphans, find_uncovered, format_report, impact_of,
    run_health_checks, OutputFormat,
};
use reqtrace_core::{
    EntityCatalog, EntityId, EntityRecord, LinkEndpoint, LinkRecord, LinkSide, LinkStatus,
    LinkType, TopologyEdge,
};
use reqtrace_ledger::{LinkDraft, LinkStore, Mutation};

use config::CliConfig;

#[derive(Parser)]
#[command(name = "reqtrace")]
#[command(version)]
#[command(about = "Requirements-traceability ledger")]
struct Cli {
    /// Config file location.
    #[arg(long, global = true, default_value = config::CONFIG_FILE)]
    config: PathBuf,

    /// Override the ledger dump path from the config.
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// Override the entity snapshot path from the config.
    #[arg(long, global = true)]
    entities: Option<PathBuf>,

    /// Override the topology edge snapshot path from the config.
    #[arg(long, global = true)]
    edges: Option<PathBuf>,

    /// Verbose logging to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Write a starter config and an empty ledger
    Init,
    /// Add a link between two entities
    Add {
        /// Source entity id
        source: String,
        /// Target entity id
        target: String,
        /// Relationship kind: derives, refines, implements, satisfies,
        /// verifies, or relates
        link_type: String,
        /// Pin the source side at this version
        #[arg(long)]
        source_version: Option<String>,
        /// Pin the target side at this version
        #[arg(long)]
        target_version: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
        /// Recorded as created_by; defaults to the config actor, then $USER
        #[arg(long)]
        actor: Option<String>,
    },
    /// Remove a link
    Rm {
        link_id: String,
    },
    /// Set the curation status of a link (never derived from health checks)
    SetStatus {
        link_id: String,
        /// active, needsReview, proposed, deprecated, or broken
        status: String,
    },
    /// Pin one side of a link to a version
    Pin {
        link_id: String,
        /// source or target
        side: String,
        version: String,
    },
    /// Return one side of a link to floating
    Unpin {
        link_id: String,
        side: String,
    },
    /// Pin every floating side to the entity snapshot's current version
    Baseline,
    /// List links touching an entity, in insertion order
    Links {
        item_id: String,
        /// Only links where the entity is the target
        #[arg(long, conflicts_with = "outgoing")]
        incoming: bool,
        /// Only links where the entity is the source
        #[arg(long)]
        outgoing: bool,
    },
    /// Health-check every link against the entity snapshot
    Check,
    /// Entities touched by neither links nor topology edges
    Orphans,
    /// Cycles in the hierarchical link subset
    Cycles,
    /// Requirement entities without a satisfying downstream link
    Coverage,
    /// Links affected if an entity's version changes
    Impact {
        item_id: String,
    },
    /// Run every analyzer over one snapshot and format the findings
    Report {
        /// json, table, or markdown
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CliConfig::load(&cli.config)?;
    let ledger_path = cli.ledger.clone().unwrap_or_else(|| config.ledger.clone());
    let entities_path = cli
        .entities
        .clone()
        .unwrap_or_else(|| config.entities.clone());
    let edges_path = cli.edges.clone().unwrap_or_else(|| config.edges.clone());

    match cli.command {
        Commands::Init => {
            if !cli.config.exists() {
                fs::write(&cli.config, CliConfig::default_toml()?)
                    .with_context(|| format!("writing {}", cli.config.display()))?;
            }
            if !ledger_path.exists() {
                fs::write(&ledger_path, "[]\n")
                    .with_context(|| format!("writing {}", ledger_path.display()))?;
            }
            println!("Initialized reqtrace ledger at {}", ledger_path.display());
        }

        Commands::Add {
            source,
            target,
            link_type,
            source_version,
            target_version,
            notes,
            actor,
        } => {
            let link_type: LinkType = link_type.parse()?;
            let created_by = actor
                .or_else(|| config.actor.clone())
                .or_else(|| std::env::var("USER").ok())
                .unwrap_or_else(|| "unknown".to_string());

            let mut store = load_store(&ledger_path)?;
            let record = store.add_link(
                LinkDraft::new(
                    LinkEndpoint {
                        item_id: EntityId::from(source),
                        version: source_version,
                    },
                    LinkEndpoint {
                        item_id: EntityId::from(target),
                        version: target_version,
                    },
                    link_type,
                )
                .notes(notes)
                .created_by(created_by),
            );
            save_store(&ledger_path, &store)?;
            print_json(&record)?;
        }

        Commands::Rm { link_id } => {
            let mut store = load_store(&ledger_path)?;
            require_applied(store.remove_link(&link_id), &link_id)?;
            save_store(&ledger_path, &store)?;
            println!("removed {link_id}");
        }

        Commands::SetStatus { link_id, status } => {
            let status: LinkStatus = status.parse()?;
            let mut store = load_store(&ledger_path)?;
            require_applied(store.update_status(&link_id, status), &link_id)?;
            save_store(&ledger_path, &store)?;
            println!("{link_id} -> {status}");
        }

        Commands::Pin {
            link_id,
            side,
            version,
        } => {
            let side: LinkSide = side.parse()?;
            let mut store = load_store(&ledger_path)?;
            require_applied(store.pin_link(&link_id, side, version), &link_id)?;
            save_store(&ledger_path, &store)?;
            println!("pinned {side} of {link_id}");
        }

        Commands::Unpin { link_id, side } => {
            let side: LinkSide = side.parse()?;
            let mut store = load_store(&ledger_path)?;
            require_applied(store.unpin_link(&link_id, side), &link_id)?;
            save_store(&ledger_path, &store)?;
            println!("unpinned {side} of {link_id}");
        }

        Commands::Baseline => {
            let entities = load_entities(&entities_path)?;
            let mut store = load_store(&ledger_path)?;
            let pinned = store.baseline(&EntityCatalog::new(&entities));
            save_store(&ledger_path, &store)?;
            println!("pinned {pinned} side(s)");
        }

        Commands::Links {
            item_id,
            incoming,
            outgoing,
        } => {
            let store = load_store(&ledger_path)?;
            let item_id = EntityId::from(item_id);
            let links = if incoming {
                store.incoming(&item_id)
            } else if outgoing {
                store.outgoing(&item_id)
            } else {
                store.links_for(&item_id)
            };
            print_json(&links)?;
        }

        Commands::Check => {
            let entities = load_entities(&entities_path)?;
            let store = load_store(&ledger_path)?;
            let issues = run_health_checks(store.records(), &EntityCatalog::new(&entities));
            print_json(&issues)?;
        }

        Commands::Orphans => {
            let entities = load_entities(&entities_path)?;
            let edges = load_edges(&edges_path)?;
            let store = load_store(&ledger_path)?;
            let orphans: Vec<&EntityRecord> = find_orphans(&entities, store.records(), &edges);
            print_json(&orphans)?;
        }

        Commands::Cycles => {
            let store = load_store(&ledger_path)?;
            print_json(&find_cycles(store.records()))?;
        }

        Commands::Coverage => {
            let entities = load_entities(&entities_path)?;
            let store = load_store(&ledger_path)?;
            let uncovered: Vec<&EntityRecord> = find_uncovered(&entities, store.records());
            print_json(&uncovered)?;
        }

        Commands::Impact { item_id } => {
            let store = load_store(&ledger_path)?;
            print_json(&impact_of(&EntityId::from(item_id), store.records()))?;
        }

        Commands::Report { format } => {
            let format = parse_format(&format)?;
            let entities = load_entities(&entities_path)?;
            let edges = load_edges(&edges_path)?;
            let store = load_store(&ledger_path)?;
            let report = build_report(store.records(), &entities, &edges);
            println!("{}", format_report(&report, format));
        }

        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "reqtrace",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the ledger dump, or an empty store if none exists yet.
fn load_store(path: &Path) -> anyhow::Result<LinkStore> {
    if !path.exists() {
        return Ok(LinkStore::new());
    }
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading ledger {}", path.display()))?;
    let records: Vec<LinkRecord> =
        serde_json::from_str(&raw).with_context(|| format!("parsing ledger {}", path.display()))?;
    Ok(LinkStore::from_records(records))
}

fn save_store(path: &Path, store: &LinkStore) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(store.records()).context("serializing ledger")?;
    fs::write(path, json + "\n").with_context(|| format!("writing ledger {}", path.display()))
}

fn load_entities(path: &Path) -> anyhow::Result<Vec<EntityRecord>> {
    let raw = fs::read_to_string(path).with_context(|| {
        format!(
            "reading entity snapshot {} (export it from the host model)",
            path.display()
        )
    })?;
    serde_json::from_str(&raw).with_context(|| format!("parsing entity snapshot {}", path.display()))
}

/// Topology edges are only consulted for orphan detection; a missing file
/// means the host has no non-link edges.
fn load_edges(path: &Path) -> anyhow::Result<Vec<TopologyEdge>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading edges {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing edges {}", path.display()))
}

fn require_applied(result: Mutation, link_id: &str) -> anyhow::Result<()> {
    if result.is_applied() {
        Ok(())
    } else {
        bail!("link '{link_id}' not found")
    }
}

fn parse_format(name: &str) -> anyhow::Result<OutputFormat> {
    match name {
        "json" => Ok(OutputFormat::Json),
        "table" => Ok(OutputFormat::Table),
        "markdown" => Ok(OutputFormat::Markdown),
        other => bail!("unknown format '{other}' (expected json, table, or markdown)"),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("serializing output")?
    );
    Ok(())
}
