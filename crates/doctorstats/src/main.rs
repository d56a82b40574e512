//! doctorstats - command-line client for the Doctor Stats analysis service

mod cli;
mod components;
mod pages;

use anyhow::Result;
use clap::{Parser, Subcommand};
use doctorstats_core::config::{DEFAULT_API_URL, DEFAULT_POLL_INTERVAL};
use doctorstats_core::ClientConfig;
use pages::analysis::Selection;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "doctorstats",
    version,
    about = "Upload medical CSV data, run statistical analyses, read the results",
    long_about = "Command-line client for the Doctor Stats analysis service.\n\
                  \n\
                  Upload a CSV dataset, request one of five analyses (descriptive statistics,\n\
                  correlation, comparative, chi-square, regression) and read the results as\n\
                  tables and text charts. The session token is kept between runs.\n\
                  \n\
                  Examples:\n\
                    doctorstats                                   # Landing page\n\
                    doctorstats register --email ada@example.com --name Ada\n\
                    doctorstats login --email ada@example.com\n\
                    doctorstats datasets upload trial.csv\n\
                    doctorstats analyze 42 --type basic --column age --column bmi\n\
                    doctorstats analyze 42 --type regression --dependent weight --independent age\n\
                    doctorstats analysis list --json\n\
                    doctorstats visualize create 42 --type scatter --column age --column weight\n\
                  \n\
                  Environment Variables:\n\
                    DOCTORSTATS_API_URL                 # API base URL\n\
                    DOCTORSTATS_DATA_DIR                # Where the session token is stored\n\
                    DOCTORSTATS_POLL_INTERVAL_MS        # Analysis status poll interval\n\
                    DOCTORSTATS_REQUEST_TIMEOUT_SECS    # Per-request timeout\n\
                    DOCTORSTATS_NO_COLOR                # Disable ANSI colors\n\
                    RUST_LOG                            # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// API base URL
    #[arg(long, global = true, env = "DOCTORSTATS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Directory holding the session token (default: platform data dir)
    #[arg(long, global = true, env = "DOCTORSTATS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Analysis status poll interval in milliseconds
    #[arg(long, global = true, env = "DOCTORSTATS_POLL_INTERVAL_MS")]
    poll_interval_ms: Option<u64>,

    /// Per-request timeout in seconds (default: none)
    #[arg(long, global = true, env = "DOCTORSTATS_REQUEST_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Output raw JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, global = true, env = "DOCTORSTATS_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Log in and keep the session for later commands
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Prompted when omitted
        #[arg(long, env = "DOCTORSTATS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account, then log in
    Register {
        #[arg(long)]
        email: Option<String>,
        /// Full name
        #[arg(long)]
        name: Option<String>,
        #[arg(long, env = "DOCTORSTATS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Forget the stored session (local only)
    Logout,
    /// Greeting plus recent analyses, datasets, visualizations and reports
    Dashboard,
    /// Upload and inspect datasets
    Datasets {
        #[command(subcommand)]
        command: DatasetCommand,
    },
    /// Submit an analysis and wait for its results
    Analyze {
        /// Dataset ID
        dataset: String,
        /// basic, correlation, comparative, chi_square, regression
        #[arg(long = "type", short = 't')]
        analysis_type: String,
        /// Column to analyze (basic, correlation); repeatable
        #[arg(long = "column", short = 'c')]
        columns: Vec<String>,
        /// Outcome column (comparative)
        #[arg(long)]
        target: Option<String>,
        /// Grouping column (comparative)
        #[arg(long)]
        group: Option<String>,
        /// First variable (chi-square)
        #[arg(long)]
        var1: Option<String>,
        /// Second variable (chi-square)
        #[arg(long)]
        var2: Option<String>,
        /// Dependent variable (regression)
        #[arg(long)]
        dependent: Option<String>,
        /// Independent variable (regression)
        #[arg(long)]
        independent: Option<String>,
        /// Submit and return without polling
        #[arg(long)]
        no_wait: bool,
    },
    /// Inspect submitted analyses
    Analysis {
        #[command(subcommand)]
        command: AnalysisCommand,
    },
    /// Generate and list charts
    Visualize {
        #[command(subcommand)]
        command: VisualizeCommand,
    },
    /// Create and read reports
    Reports {
        #[command(subcommand)]
        command: ReportCommand,
    },
    /// Account details and subscription
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommand>,
    },
}

#[derive(Subcommand)]
enum DatasetCommand {
    /// Upload a CSV file
    Upload {
        file: PathBuf,
        #[arg(long, short = 'd')]
        description: Option<String>,
        /// Content type to check and send (default: text/csv)
        #[arg(long)]
        mime: Option<String>,
    },
    List,
    /// Dataset details and columns
    Show { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum AnalysisCommand {
    /// Status, and results when completed
    Show { id: String },
    List,
    /// Fetch results directly (reports "in progress" while running)
    Results {
        id: String,
        /// Result shape; read from the analysis when omitted
        #[arg(long = "type", short = 't')]
        analysis_type: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum VisualizeCommand {
    /// Generate a chart from dataset columns
    Create {
        /// Dataset ID
        dataset: String,
        /// bar, pie, line, scatter, box, heatmap
        #[arg(long = "type", short = 't', default_value = "")]
        chart_type: String,
        /// Column to plot; repeatable
        #[arg(long = "column", short = 'c')]
        columns: Vec<String>,
        #[arg(long)]
        name: Option<String>,
    },
    List,
    Delete { id: String },
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Collect analyses and visualizations into a report
    Create {
        /// Dataset ID
        dataset: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Analysis ID to include; repeatable
        #[arg(long = "analysis")]
        analyses: Vec<String>,
        /// Visualization ID to include; repeatable
        #[arg(long = "visualization")]
        visualizations: Vec<String>,
    },
    List,
    Show { id: String },
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show,
    /// Change name and/or organization
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        organization: Option<String>,
    },
    Subscription,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    init_tracing();

    if let Err(err) = run(args).await {
        eprintln!("{}", cli::render_error(&err));
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> Result<()> {
    let mut config = ClientConfig::default()
        .with_api_url(args.api_url)
        .with_poll_interval(
            args.poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
        )
        .with_request_timeout(args.timeout_secs.map(Duration::from_secs));
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }

    let output = cli::Output {
        json: args.json,
        no_color: args.no_color,
    };
    let app = cli::App::open(config, output)?;

    let Some(mode) = args.mode else {
        pages::landing::run(&app);
        return Ok(());
    };

    match mode {
        Mode::Login { email, password } => {
            pages::auth::run_login(&app, pages::auth::Credentials { email, password }).await
        }
        Mode::Register {
            email,
            name,
            password,
            confirm_password,
        } => {
            pages::auth::run_register(
                &app,
                pages::auth::Registration {
                    email,
                    name,
                    password,
                    confirm_password,
                },
            )
            .await
        }
        Mode::Logout => pages::auth::run_logout(&app),
        Mode::Dashboard => pages::dashboard::run(&app).await,
        Mode::Datasets { command } => match command {
            DatasetCommand::Upload {
                file,
                description,
                mime,
            } => pages::datasets::run_upload(&app, &file, description.as_deref(), mime).await,
            DatasetCommand::List => pages::datasets::run_list(&app).await,
            DatasetCommand::Show { id } => pages::datasets::run_show(&app, &id).await,
            DatasetCommand::Delete { id } => pages::datasets::run_delete(&app, &id).await,
        },
        Mode::Analyze {
            dataset,
            analysis_type,
            columns,
            target,
            group,
            var1,
            var2,
            dependent,
            independent,
            no_wait,
        } => {
            let selection = Selection {
                columns,
                target,
                group,
                variable1: var1,
                variable2: var2,
                dependent,
                independent,
            };
            pages::analysis::run_analyze(&app, &dataset, &analysis_type, selection, !no_wait).await
        }
        Mode::Analysis { command } => match command {
            AnalysisCommand::Show { id } => pages::analysis::run_show(&app, &id).await,
            AnalysisCommand::List => pages::analysis::run_list(&app).await,
            AnalysisCommand::Results { id, analysis_type } => {
                pages::analysis::run_results(&app, &id, analysis_type.as_deref()).await
            }
            AnalysisCommand::Delete { id } => pages::analysis::run_delete(&app, &id).await,
        },
        Mode::Visualize { command } => match command {
            VisualizeCommand::Create {
                dataset,
                chart_type,
                columns,
                name,
            } => {
                pages::visualizations::run_create(
                    &app,
                    pages::visualizations::ChartRequest {
                        dataset_id: dataset,
                        chart_type,
                        columns,
                        name,
                    },
                )
                .await
            }
            VisualizeCommand::List => pages::visualizations::run_list(&app).await,
            VisualizeCommand::Delete { id } => pages::visualizations::run_delete(&app, &id).await,
        },
        Mode::Reports { command } => match command {
            ReportCommand::Create {
                dataset,
                title,
                description,
                analyses,
                visualizations,
            } => {
                pages::reports::run_create(
                    &app,
                    pages::reports::NewReport {
                        dataset_id: dataset,
                        title,
                        description,
                        analyses,
                        visualizations,
                    },
                )
                .await
            }
            ReportCommand::List => pages::reports::run_list(&app).await,
            ReportCommand::Show { id } => pages::reports::run_show(&app, &id).await,
        },
        Mode::Profile { command } => match command.unwrap_or(ProfileCommand::Show) {
            ProfileCommand::Show => pages::profile::run_show(&app).await,
            ProfileCommand::Update { name, organization } => {
                pages::profile::run_update(&app, name, organization).await
            }
            ProfileCommand::Subscription => pages::profile::run_subscription(&app).await,
        },
    }
}
