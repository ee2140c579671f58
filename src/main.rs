use std::io::{self, BufRead, Read, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shaft_sizer::api::{AppState, create_router};
use shaft_sizer::calculation::run_sizing;
use shaft_sizer::config::ConfigLoader;
use shaft_sizer::models::{FlowModel, SizingInput};
use shaft_sizer::report::{CsiSpec, SizingReport};
use shaft_sizer::wizard::{Role, Step, WizardSession};

#[derive(Debug, Parser)]
#[command(name = "shaft-sizer", version, about = "Exhaust shaft sizing engine")]
struct Cli {
    /// Directory holding the equipment catalog.
    #[arg(
        long,
        global = true,
        env = "SHAFT_SIZER_CONFIG",
        default_value = "./config/lf_systems"
    )]
    config: PathBuf,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "SHAFT_SIZER_ADDR", default_value = "127.0.0.1:8501")]
        addr: SocketAddr,
    },
    /// Size a shaft described in a JSON or YAML file.
    Size {
        /// Input file, or `-` for JSON on stdin.
        #[arg(short, long)]
        input: PathBuf,
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Report date (YYYY-MM-DD); today when omitted.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Size a shaft by answering questions on the terminal.
    Chat {
        /// How airflow is distributed along the shaft.
        #[arg(long, value_enum, default_value_t = Airflow::Cumulative)]
        airflow: Airflow,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
    /// CSI Section 23 34 00 specification.
    Csi,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Airflow {
    Cumulative,
    Uniform,
}

impl From<Airflow> for FlowModel {
    fn from(airflow: Airflow) -> Self {
        match airflow {
            Airflow::Cumulative => FlowModel::Cumulative,
            Airflow::Uniform => FlowModel::Uniform,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loader = ConfigLoader::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    tracing::info!(
        system = %loader.system().name,
        fans = loader.config().fans().len(),
        "Configuration loaded"
    );

    match cli.command {
        None => serve(loader, default_addr()).await,
        Some(Command::Serve { addr }) => serve(loader, addr).await,
        Some(Command::Size {
            input,
            format,
            date,
        }) => size(&loader, &input, format, date),
        Some(Command::Chat { airflow }) => chat(&loader, airflow.into()),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "shaft_sizer=debug"
    } else {
        "shaft_sizer=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8501))
}

async fn serve(loader: ConfigLoader, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(AppState::new(loader));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("Listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn size(
    loader: &ConfigLoader,
    path: &Path,
    format: OutputFormat,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let input = read_input(path)?;
    let result = run_sizing(&input, loader.config())?;

    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Markdown => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            SizingReport::new(&result, loader.config(), date).to_string()
        }
        OutputFormat::Csi => CsiSpec::new(&result, loader.config()).to_string(),
    };
    println!("{}", output);
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<SizingInput> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(serde_json::from_str(&text)?);
    }

    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let input = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(&text)?,
        Some("json") | None => serde_json::from_str(&text)?,
        Some(other) => bail!("unsupported input format: .{}", other),
    };
    Ok(input)
}

fn chat(loader: &ConfigLoader, flow_model: FlowModel) -> anyhow::Result<()> {
    let mut session = WizardSession::with_flow_model(flow_model);
    let mut stdout = io::stdout();
    let mut shown = print_new_messages(&session, 0, &mut stdout)?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        let answer = line.trim();

        if answer == "quit" || answer == "exit" {
            break;
        }
        if let Some(number) = answer.strip_prefix("edit ") {
            match number.trim().parse().ok().and_then(Step::from_number) {
                Some(step) => match session.edit(step) {
                    Ok(()) => {
                        if let Some(last) = session.last_message() {
                            writeln!(stdout, "{}\n", last.text)?;
                        }
                        shown = session.messages().len();
                    }
                    Err(e) => writeln!(stdout, "{}\n", e)?,
                },
                None => writeln!(stdout, "Unknown step: {}\n", number.trim())?,
            }
            continue;
        }

        session.respond(answer, loader.config());
        if session.messages().len() < shown {
            shown = 0;
        }
        shown = print_new_messages(&session, shown, &mut stdout)?;
    }
    Ok(())
}

fn print_new_messages(
    session: &WizardSession,
    from: usize,
    out: &mut impl Write,
) -> io::Result<usize> {
    for message in session.messages().get(from..).unwrap_or_default() {
        if message.role == Role::Assistant {
            writeln!(out, "{}\n", message.text)?;
        }
    }
    let replies = session.quick_replies();
    if !replies.is_empty() {
        writeln!(out, "[{}]", replies.join(" / "))?;
    }
    write!(out, "> ")?;
    out.flush()?;
    Ok(session.messages().len())
}
