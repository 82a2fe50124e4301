//! Rowscope CLI - browse, search and summarise CSV datasets from the terminal

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rowscope_connectors::{
    export_to_dir, remote_base_url, source_from_config, write_catalog, Catalog, DatasetEntry,
    DatasetSource,
};
use rowscope_core::{
    cell, display_columns, paginate, statistics, unique_values, Dataset, GroupCount, Query,
    DEFAULT_DISPLAY_COLUMNS, DEFAULT_PAGE_SIZE,
};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "rowscope")]
#[command(about = "Search, filter and summarise heterogeneous CSV datasets")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding *_data.csv files
    #[arg(long, global = true, env = "ROWSCOPE_DATA_DIR", default_value = "./public/data")]
    data_dir: PathBuf,

    /// Remote mirror of the data directory; takes precedence over --data-dir
    #[arg(long, global = true, env = "ROWSCOPE_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct QueryArgs {
    /// Match against name, phone or email
    #[arg(short, long)]
    search: Option<String>,

    /// Keep records whose location contains this text
    #[arg(long)]
    location: Option<String>,

    /// Keep records whose building contains this text
    #[arg(long)]
    building: Option<String>,
}

impl QueryArgs {
    fn to_query(&self) -> Query {
        Query {
            search: self.search.clone(),
            location: self.location.clone(),
            building: self.building.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List available datasets
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,

        /// Also write the catalog to this file (local data directory only)
        #[arg(long)]
        write: Option<PathBuf>,
    },

    /// Show record counts grouped by building and location
    Stats {
        /// Dataset value or file name
        dataset: String,

        #[command(flatten)]
        query: QueryArgs,

        /// Number of groups to print per dimension
        #[arg(long, default_value_t = 10)]
        top: usize,

        #[arg(long)]
        json: bool,
    },

    /// Print a page of matching records
    Search {
        /// Dataset value or file name
        dataset: String,

        #[command(flatten)]
        query: QueryArgs,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        #[arg(long)]
        json: bool,
    },

    /// List distinct values of the first non-empty field among those given
    Unique {
        /// Dataset value or file name
        dataset: String,

        /// Candidate field, in priority order (repeatable)
        #[arg(short, long = "field", required = true)]
        fields: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Export matching records to CSV
    Export {
        /// Dataset value or file name
        dataset: String,

        #[command(flatten)]
        query: QueryArgs,

        /// Directory to write the export into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays parseable
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let source = source_from_config(&cli.data_dir, cli.base_url.as_deref())
        .context("Invalid dataset source configuration")?;
    info!("Using dataset source {}", source.describe());

    match cli.command {
        Commands::Catalog { json, write } => {
            let remote = remote_base_url(cli.base_url.as_deref()).is_some();
            show_catalog(source.as_ref(), &cli.data_dir, remote, json, write).await?;
        }
        Commands::Stats { dataset, query, top, json } => {
            show_stats(source.as_ref(), &dataset, &query.to_query(), top, json).await?;
        }
        Commands::Search { dataset, query, page, page_size, json } => {
            show_page(source.as_ref(), &dataset, &query.to_query(), page, page_size, json).await?;
        }
        Commands::Unique { dataset, fields, json } => {
            show_unique(source.as_ref(), &dataset, &fields, json).await?;
        }
        Commands::Export { dataset, query, output_dir } => {
            export(source.as_ref(), &dataset, &query.to_query(), &output_dir).await?;
        }
    }

    Ok(())
}

async fn load_dataset(source: &dyn DatasetSource, key: &str) -> Result<(DatasetEntry, Dataset)> {
    let catalog = source.catalog().await.context("Failed to list datasets")?;
    let entry = catalog.get(key)?.clone();
    let dataset = source
        .load(&entry)
        .await
        .with_context(|| format!("Failed to load dataset '{}'", entry.file_name))?;
    Ok((entry, dataset))
}

async fn show_catalog(
    source: &dyn DatasetSource,
    data_dir: &PathBuf,
    remote: bool,
    json: bool,
    write: Option<PathBuf>,
) -> Result<()> {
    let catalog: Catalog = match write {
        Some(output) => {
            if remote {
                anyhow::bail!("--write only works with a local data directory");
            }
            write_catalog(data_dir, &output).await?
        }
        None => source.catalog().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("\n=== Datasets ({}) ===", catalog.len());
    for entry in &catalog.locations {
        println!("  {:<30} {}", entry.value, entry.label);
    }
    Ok(())
}

fn print_groups(title: &str, groups: &[GroupCount]) {
    println!("\n{}:", title);
    let width = groups.iter().map(|g| g.name.chars().count()).max().unwrap_or(0);
    for group in groups {
        println!("  {:<width$}  {}", group.name, group.count, width = width);
    }
}

async fn show_stats(source: &dyn DatasetSource, key: &str, query: &Query, top: usize, json: bool) -> Result<()> {
    let (entry, dataset) = load_dataset(source, key).await?;
    let matched = query.apply(&dataset.records);
    let stats = statistics(matched);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\n=== {} ===", entry.label);
    println!("Total records:    {}", stats.total);
    println!("Unique buildings: {}", stats.unique_building_count());
    println!("Unique locations: {}", stats.unique_location_count());
    print_groups(&format!("Top {} buildings", top), stats.top_buildings(top));
    print_groups(&format!("Top {} locations", top), stats.top_locations(top));
    Ok(())
}

async fn show_page(
    source: &dyn DatasetSource,
    key: &str,
    query: &Query,
    page: usize,
    page_size: usize,
    json: bool,
) -> Result<()> {
    let (_, dataset) = load_dataset(source, key).await?;
    let matched = query.apply(&dataset.records);
    let page = paginate(matched, page, page_size);

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.records.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    let columns = display_columns(&dataset.headers, DEFAULT_DISPLAY_COLUMNS);
    println!("#\t{}", columns.join("\t"));
    for (i, record) in page.records.iter().enumerate() {
        let cells: Vec<&str> = columns.iter().map(|c| cell(record, c)).collect();
        println!("{}\t{}", page.start + i, cells.join("\t"));
    }
    println!(
        "\nShowing {} to {} of {} records (page {} of {})",
        page.start, page.end, page.total_records, page.page, page.total_pages
    );
    Ok(())
}

async fn show_unique(source: &dyn DatasetSource, key: &str, fields: &[String], json: bool) -> Result<()> {
    let (_, dataset) = load_dataset(source, key).await?;
    let values = unique_values(&dataset.records, fields);

    if json {
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for value in &values {
            println!("{}", value);
        }
    }
    Ok(())
}

async fn export(source: &dyn DatasetSource, key: &str, query: &Query, output_dir: &PathBuf) -> Result<()> {
    let (entry, dataset) = load_dataset(source, key).await?;
    let matched = query.apply(&dataset.records);
    let count = matched.len();
    let path = export_to_dir(matched, &dataset.headers, output_dir, &entry.label)
        .context("Export failed")?;

    println!("Exported {} records to {:?}", count, path);
    Ok(())
}
