use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{info, warn};

use seat_matrix::app::ports::StudentSourcePort;
use seat_matrix::app::{SearchController, SearchEvent, SearchOutcome, ViewState};
use seat_matrix::config::{Config, DEFAULT_CONFIG_PATH};
use seat_matrix::constants::{self, EXPORT_FILE_STEM};
use seat_matrix::domain::{CasteGroup, Category, FilterState, FILTER_KEYS};
use seat_matrix::export::{render_table, ExportDocument, ExportFormat, ExportHeader};
use seat_matrix::infra::{JsonFileSource, ReqwestStudentSource};
use seat_matrix::logging;

#[derive(Parser)]
#[command(name = "seat_matrix")]
#[command(about = "Filter, sort and export admission-seat rank records")]
#[command(version)]
struct Cli {
    /// Config file (default: ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data source base URL
    #[arg(long, global = true)]
    source_url: Option<String>,

    /// Read records from a local JSON file instead of the HTTP source
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Branch code, e.g. CSE ("All" for no filter)
    #[arg(long)]
    branch: Option<String>,
    /// District code, e.g. HYD ("All" for no filter)
    #[arg(long)]
    district: Option<String>,
    /// Category label ("OC Boys"), field key ("ocBoys") or group ("oc")
    #[arg(long)]
    caste: Option<String>,
    #[arg(long)]
    min_rank: Option<String>,
    #[arg(long)]
    max_rank: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> FilterState {
        let params = [
            ("branch", &self.branch),
            ("district", &self.district),
            ("caste", &self.caste),
            ("minRank", &self.min_rank),
            ("maxRank", &self.max_rank),
        ];
        let filter = params.iter().fold(FilterState::new(), |filter, (key, value)| match value {
            Some(value) => filter.with_param(key, value).unwrap_or(filter),
            None => filter,
        });
        warn_unknown_codes(&filter);
        filter
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, filter and print matching seats
    Search {
        #[command(flatten)]
        filters: FilterArgs,
        /// Print the result set as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Fetch, filter and write the result to a file
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// csv, tsv or json (default from config)
        #[arg(long)]
        format: Option<String>,
        /// Output path (default: <output_dir>/students.<ext>)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Student name for the header block
        #[arg(long, default_value = "")]
        name: String,
        /// Student rank for the header block
        #[arg(long, default_value = "")]
        rank: String,
        /// Student caste for the header block
        #[arg(long, default_value = "")]
        student_caste: String,
    },
    /// List categories and caste groups
    Categories,
    /// Read filter changes from stdin and re-run the search on each one
    Interactive,
}

fn warn_unknown_codes(filter: &FilterState) {
    if let Some(branch) = &filter.branch {
        if !constants::is_known_branch(branch) {
            warn!(branch = %branch, "branch code is not in the known list");
        }
    }
    if let Some(district) = &filter.district {
        if !constants::is_known_district(district) {
            warn!(district = %district, "district code is not in the known list");
        }
    }
}

fn build_source(cli: &Cli, config: &Config) -> anyhow::Result<Arc<dyn StudentSourcePort>> {
    if let Some(path) = &cli.input {
        return Ok(Arc::new(JsonFileSource::new(path.clone())));
    }
    Ok(Arc::new(ReqwestStudentSource::new(&config.source)?))
}

fn print_warnings(filter: &FilterState) {
    for warning in filter.warnings() {
        println!("⚠️  {}", warning);
    }
}

/// Run one search and return the applied result, or the failure as an error
async fn search_once(
    controller: &SearchController,
    filter: FilterState,
) -> anyhow::Result<(seat_matrix::ResultSet, seat_matrix::pipeline::IngestReport)> {
    print_warnings(&filter);
    match controller.handle(SearchEvent::FilterChanged(filter)).await {
        SearchOutcome::Applied { .. } => match controller.view().await {
            ViewState::Ready { result, report, .. } => {
                if report.rejected > 0 {
                    println!("⚠️  {} malformed record(s) were skipped", report.rejected);
                }
                Ok((result, report))
            }
            other => Err(anyhow!("unexpected view state after search: {:?}", other)),
        },
        SearchOutcome::Failed { message, .. } => Err(anyhow!(message)),
        SearchOutcome::Stale { seq, latest } => {
            Err(anyhow!("response {} superseded by {}", seq, latest))
        }
    }
}

fn print_categories() {
    println!("Categories:");
    for category in Category::ALL {
        println!("  {:<14} {}", category.label(), category.field_key());
    }
    println!("\nCaste groups:");
    for group in CasteGroup::ALL {
        let members: Vec<_> = group.members().iter().map(|c| c.label()).collect();
        println!("  {:<11} {}", group.key(), members.join(", "));
    }
}

async fn print_view(controller: &SearchController) {
    match controller.view().await {
        ViewState::Idle => println!("(no search yet)"),
        ViewState::Loading { seq } => println!("⏳ search #{} in progress", seq),
        ViewState::Ready { seq, filter, result, .. } => {
            println!("\n#{} {} → {} row(s)", seq, filter, result.len());
            print!("{}", render_table(&result));
        }
        ViewState::Failed { seq, message } => println!("❌ search #{} failed: {}", seq, message),
    }
}

fn parse_command(line: &str, current: &FilterState) -> Result<Option<SearchEvent>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    match verb {
        "refresh" => Ok(Some(SearchEvent::Refresh)),
        "reset" => Ok(Some(SearchEvent::Reset)),
        "set" => {
            let mut filter = current.clone();
            for pair in words {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("expected key=value, got '{}'", pair))?;
                // Category labels contain spaces; accept '_' in their place
                let value = value.replace('_', " ");
                filter = filter.with_param(key, &value).ok_or_else(|| {
                    format!("unknown filter '{}' (expected one of {})", key, FILTER_KEYS.join(", "))
                })?;
            }
            Ok(Some(SearchEvent::FilterChanged(filter)))
        }
        "clear" => {
            let mut filter = current.clone();
            for key in words {
                filter = filter
                    .with_param(key, "")
                    .ok_or_else(|| format!("unknown filter '{}'", key))?;
            }
            Ok(Some(SearchEvent::FilterChanged(filter)))
        }
        other => Err(format!("unknown command '{}'", other)),
    }
}

/// Each command runs as its own task so searches can overlap. Returns once
/// the input ends and every started search has finished.
async fn run_interactive<R>(controller: Arc<SearchController>, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!("Commands: set key=value ... | clear key ... | refresh | reset | show | quit");
    println!("Filter keys: {}", FILTER_KEYS.join(", "));

    let mut searches = JoinSet::new();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "quit" | "exit" => break,
            "show" => {
                print_view(&controller).await;
                continue;
            }
            _ => {}
        }

        let current = controller.filter().await;
        let event = match parse_command(line, &current) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(message) => {
                println!("⚠️  {}", message);
                continue;
            }
        };
        if let SearchEvent::FilterChanged(filter) = &event {
            warn_unknown_codes(filter);
            print_warnings(filter);
        }

        let controller = controller.clone();
        searches.spawn(async move {
            match controller.handle(event).await {
                SearchOutcome::Applied { .. } | SearchOutcome::Failed { .. } => {
                    print_view(&controller).await
                }
                SearchOutcome::Stale { .. } => {}
            }
        });
    }

    while let Some(joined) = searches.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "search task did not complete");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config_path =
        cli.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    if let Some(url) = &cli.source_url {
        config.source.base_url = url.clone();
    }

    let _guard = logging::init_logging(&config.logging.dir);

    if let Commands::Categories = cli.command {
        print_categories();
        return Ok(());
    }

    let source = build_source(&cli, &config)?;
    let controller = Arc::new(SearchController::new(source, config.source.timeout()));

    match &cli.command {
        Commands::Search { filters, json } => {
            let (result, _) = search_once(&controller, filters.to_filter()).await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_table(&result));
                println!("📊 {} row(s), {} column(s)", result.len(), result.columns.len());
            }
        }
        Commands::Export { filters, format, out, name, rank, student_caste } => {
            let format = match format {
                Some(f) => f.parse::<ExportFormat>()?,
                None => config.export.format,
            };
            let (result, _) = search_once(&controller, filters.to_filter()).await?;
            if result.is_empty() {
                println!("⚠️  No matching rows; writing column headers only");
            }

            let header = ExportHeader {
                name: name.clone(),
                rank: rank.clone(),
                caste: student_caste.clone(),
            };
            let doc =
                ExportDocument { title: &config.export.title, header: &header, result: &result };
            let path = out.clone().unwrap_or_else(|| {
                config.export.output_dir.join(format!("{}.{}", EXPORT_FILE_STEM, format.ext()))
            });
            doc.write_to(&path, format)?;

            info!(path = %path.display(), "export complete");
            println!(
                "✅ Wrote {} row(s) to {} ({} page)",
                result.len(),
                path.display(),
                doc.page_size()
            );
        }
        Commands::Interactive => {
            run_interactive(controller, BufReader::new(tokio::io::stdin())).await?
        }
        Commands::Categories => {}
    }
    Ok(())
}
