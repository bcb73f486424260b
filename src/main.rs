use clap::{Parser, Subcommand};
use navstitch::location::{Location, resolve_current_page_id};
use navstitch::sitemap::SitemapStatus;
use navstitch::{config, countries, generate, href, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "navstitch")]
#[command(about = "Build-time includes, breadcrumbs and related links for static sites")]
#[command(long_about = "\
Build-time includes, breadcrumbs and related links for static sites

Pages stay hand-written HTML. A sitemap document lists every page's title,
breadcrumb trail and related pages; navstitch fills the marked containers.

Site structure:

  site/
  ├── navstitch.toml               # Optional config (see gen-config)
  ├── data/links.json              # Sitemap: pages + optional titles shortcuts
  ├── partials/nav.html            # Shared fragment, pulled in by data-include
  ├── index.html                   # <nav data-breadcrumb></nav>
  └── countries/
      └── germany/visa.html        # <div data-related-links></div>

Sitemap shape:

  { \"pages\": { \"countries/germany/visa.html\": {
        \"title\": \"Germany Visa\",
        \"breadcrumb\": [\"Home\", \"Countries\", \"Germany\", \"Visa\"],
        \"related\": [\"about.html\"] } },
    \"titles\": { \"Visa Guides\": \"/guides/visa.html\" } }

Run 'navstitch gen-config' to generate a documented navstitch.toml.")]
#[command(version)]
struct Cli {
    /// Site directory
    #[arg(long, default_value = ".", global = true)]
    site: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Config file (default: navstitch.toml in the site directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log progress at info level (otherwise RUST_LOG, default warn)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site: stitch includes and fill navigation on every page
    Build,
    /// Show the navigation rendered for one location
    Render {
        /// URL, served path or file path of the page
        location: String,
    },
    /// Print the page id a location resolves to
    Resolve {
        /// URL, served path or file path of the page
        location: String,
    },
    /// Print the relative href from one page id to another
    Href {
        from: String,
        to: String,
        /// Also resolve the href back and report whether it lands on `to`
        #[arg(long)]
        check: bool,
    },
    /// Show sitemap diagnostics as seen from one location
    Inspect {
        /// URL, served path or file path of the page
        #[arg(default_value = "/")]
        location: String,
        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the overview cards for a country key
    Country {
        key: String,
        /// Print the card markup instead of a summary
        #[arg(long)]
        html: bool,
    },
    /// Print a stock navstitch.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.site, cli.config.as_deref())?;
            println!(
                "==> Building {} \u{2192} {}",
                cli.site.display(),
                cli.output.display()
            );
            let report = generate::generate(&cli.site, &cli.output, &site_config)?;
            output::print_build_report(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Render { location } => {
            let site_config = config::load_config(&cli.site, cli.config.as_deref())?;
            let location = Location::parse(&location);
            let nav = generate::render_location(&cli.site, &location, &site_config);
            output::print_page_navigation(&nav);
        }
        Command::Resolve { location } => {
            let site_config = config::load_config(&cli.site, cli.config.as_deref())?;
            let location = Location::parse(&location);
            println!(
                "{}",
                resolve_current_page_id(&location, &site_config.resolve_options())
            );
        }
        Command::Href { from, to, check } => {
            let link = href::compute_relative_href(&from, &to);
            println!("{}", link);
            if check {
                let expected = to.trim_start_matches('/');
                match href::resolve_href(&from, &link) {
                    Some(target) if target == expected => println!("ok: {}", target),
                    Some(target) => {
                        return Err(format!("{} resolves to {}, expected {}", link, target, expected).into());
                    }
                    None => return Err(format!("{} does not resolve to a page", link).into()),
                }
            }
        }
        Command::Inspect { location, json } => {
            let site_config = config::load_config(&cli.site, cli.config.as_deref())?;
            let location = Location::parse(&location);
            let nav = generate::render_location(&cli.site, &location, &site_config);
            let Some(diagnostics) = nav.diagnostics else {
                let reason = match nav.sitemap {
                    SitemapStatus::Malformed => "malformed",
                    _ => "unreachable",
                };
                return Err(format!("sitemap for {} is {}", nav.id, reason).into());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&diagnostics)?);
            } else {
                output::print_diagnostics(&diagnostics);
            }
        }
        Command::Country { key, html } => {
            let Some(info) = countries::lookup(&key) else {
                return Err("country key must not be empty".into());
            };
            if html {
                println!("{}", countries::render_cards(&key).into_string());
            } else {
                output::print_country(&info);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `--verbose` enables info; otherwise `RUST_LOG`, falling back to warn.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
