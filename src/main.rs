use anyhow::bail;
use clap::{ Parser, Subcommand };
use solnav::api::Fetcher;
use solnav::config::{ load_config, Config, DEFAULT_CONFIG_PATH };
use solnav::render::Container;
use solnav::terminal::TreePrinter;
use solnav::{ html, load_solution_links, scan };
use std::io::stdout;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt, EnvFilter };

#[derive(Parser)]
#[command(name = "solnav", version, about = "Render a solutions directory listing as nested links")]
struct Cli {
    /// YAML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Listing endpoint, overrides `list_url`
    #[arg(long)]
    url: Option<String>,

    /// Base for relative endpoints, overrides `base_url`
    #[arg(long)]
    base_url: Option<String>,

    /// Path prepended to file links, overrides `link_prefix`
    #[arg(long)]
    link_prefix: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the listing and print it as a tree
    Show {
        #[arg(long)]
        no_color: bool,
    },
    /// Fetch the listing and print it as HTML
    Html {
        /// Emit a whole document instead of the container element
        #[arg(long)]
        page: bool,
    },
    /// Print the listing JSON for a local directory
    Scan {
        dir: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber
            ::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber
            ::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn fetch_container(config: &Config) -> anyhow::Result<Container> {
    let fetcher = Fetcher::new(Some(config.resolve_base()?));
    let mut container = Container::new(&config.container_id);
    if !load_solution_links(&fetcher, &config.list_url, &config.link_prefix, &mut container).await {
        bail!("couldn't load listing from '{}'", config.list_url);
    }
    Ok(container)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(url) = cli.url {
        config.list_url = url;
    }
    if cli.base_url.is_some() {
        config.base_url = cli.base_url;
    }
    if let Some(prefix) = cli.link_prefix {
        config.link_prefix = prefix;
    }
    init_tracing(config.log_json);

    match cli.command {
        Command::Show { no_color } => {
            let container = fetch_container(&config).await?;
            TreePrinter { color: !no_color }.print_container(&mut stdout(), &container)?;
        }
        Command::Html { page } => {
            let container = fetch_container(&config).await?;
            if page {
                print!("{}", html::page(&container));
            } else {
                println!("{}", container.to_html());
            }
        }
        Command::Scan { dir, pretty } => {
            let listing = scan::scan_listing(&dir)?;
            info!(dir = %dir.display(), entries = listing.entries.len(), "scanned listing");
            let text = if pretty {
                serde_json::to_string_pretty(&listing)?
            } else {
                serde_json::to_string(&listing)?
            };
            println!("{}", text);
        }
    }
    Ok(())
}
