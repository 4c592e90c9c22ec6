use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use tabular_feed::common::constants::NO_ARTICLES_NOTICE;
use tabular_feed::config::Config;
use tabular_feed::infra::http_client::ReqwestHttp;
use tabular_feed::logging;
use tabular_feed::metrics::FeedMetrics;
use tabular_feed::render;
use tabular_feed::sources::{Category, NewsApiSource, NewsRequest, WeatherFixture};
use tabular_feed::{Field, FeedSource, IngestError, Query, View};

#[derive(Parser)]
#[command(name = "tabular_feed")]
#[command(about = "Weather table and news headline dashboards")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// City weather table from the built-in markup fixture
    Weather {
        /// Sort by temperature, highest first
        #[arg(long)]
        sort_by_temp: bool,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Latest news headlines
    News {
        /// Category filter: all, business, entertainment, general, health,
        /// science, sports, technology
        #[arg(long, default_value = "all")]
        category: String,
        /// First publication date (YYYY-MM-DD), default today
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last publication date (YYYY-MM-DD), default today
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Articles per request (1-100), default from config
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        page_size: Option<u32>,
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Case-insensitive substring matched against the title
    #[arg(long, default_value = "")]
    search: String,
    /// Field to sort by (title, temperature, condition, author, published, source)
    #[arg(long)]
    sort: Option<Field>,
    /// Sort descending
    #[arg(long)]
    desc: bool,
    /// Print the view as JSON
    #[arg(long)]
    json: bool,
}

impl ViewArgs {
    fn query(&self) -> Query {
        let query = Query::new().search(self.search.clone());
        match self.sort {
            Some(field) => query.sort_by(field, self.desc),
            None => query,
        }
    }
}

fn print_view(view: &View<'_>, json: bool, text: fn(&View<'_>) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", render::render_json(view)?);
    } else {
        print!("{}", text(view));
    }
    Ok(())
}

/// Empty payloads are a normal outcome; only source failures set a failing exit code.
fn report_ingest_error(err: &IngestError, empty_notice: Option<&str>) -> ExitCode {
    match err {
        IngestError::EmptyPayload { .. } => {
            warn!("{}", err);
            println!("⚠️  {}", render::render_ingest_error(err, empty_notice));
            ExitCode::SUCCESS
        }
        _ => {
            error!("{}", err);
            eprintln!("❌ {}", render::render_ingest_error(err, empty_notice));
            ExitCode::FAILURE
        }
    }
}

async fn run_weather(config: &Config, sort_by_temp: bool, args: &ViewArgs) -> anyhow::Result<ExitCode> {
    let source = WeatherFixture::from_config(&config.weather);
    let records = match source.load().await {
        Ok(records) => records,
        Err(e) => return Ok(report_ingest_error(&e, None)),
    };
    info!("Loaded {} cities", records.len());

    let mut query = args.query();
    if sort_by_temp {
        query = query.sort_by(Field::PrimaryValue, true);
    }
    print_view(&records.query(&query), args.json, render::render_weather)?;
    Ok(ExitCode::SUCCESS)
}

async fn run_news(config: &Config, request: NewsRequest, args: &ViewArgs) -> anyhow::Result<ExitCode> {
    let http = ReqwestHttp::new(config.news.timeout())
        .map_err(anyhow::Error::msg)
        .context("building HTTP client")?;
    let source = NewsApiSource::new(config.news.clone(), request, Arc::new(http));

    let records = match source.load().await {
        Ok(records) => records,
        Err(e) => return Ok(report_ingest_error(&e, Some(NO_ARTICLES_NOTICE))),
    };
    info!("Loaded {} articles", records.len());

    print_view(&records.query(&args.query()), args.json, render::render_articles)?;
    Ok(ExitCode::SUCCESS)
}

async fn run(cli: Cli, config: &Config) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Weather { sort_by_temp, view } => run_weather(config, sort_by_temp, &view).await,
        Commands::News {
            category,
            from,
            to,
            page_size,
            view,
        } => {
            let mut request = NewsRequest::today(page_size.unwrap_or(config.news.page_size));
            request.category = Category::parse_filter(&category).map_err(anyhow::Error::msg)?;
            if let Some(from) = from {
                request.from = from;
            }
            if let Some(to) = to {
                request.to = to;
            }
            run_news(config, request, &view).await
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;

    // Keep the guard alive so file logs are flushed on exit
    let _guard = logging::init_logging(&config.logging);
    match &config.origin {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    let metrics = match &config.metrics.dump_path {
        Some(path) => Some((FeedMetrics::install()?, path.clone())),
        None => None,
    };

    let code = run(cli, &config).await?;

    if let Some((handle, path)) = metrics {
        if let Err(e) = FeedMetrics::dump(&handle, &path) {
            warn!("Could not write metrics: {}", e);
        }
    }
    Ok(code)
}
