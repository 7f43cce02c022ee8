use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mdwx::article::{self, FormatOptions};
use mdwx::markdown::{front_matter, render_html};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mdwx", version, about = "Prepare Markdown articles for WeChat and Hugo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, env = "MDWX_CONFIG", help = "Config file path")]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Verbose logging")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Standardize front matter and collapse blank lines in place
    Format {
        /// Files or directories (defaults to the source directory)
        paths: Vec<PathBuf>,
        #[arg(long, help = "Report files that would change without writing")]
        check: bool,
        #[arg(long, help = "Leave front matter lines as they are")]
        no_standardize: bool,
    },
    /// Report front matter lines not in key="value" form
    Lint {
        paths: Vec<PathBuf>,
    },
    /// Report local images that are missing
    Check {
        /// Article directory (defaults to the source directory)
        dir: Option<PathBuf>,
    },
    /// Print article metadata as JSON
    Meta {
        file: PathBuf,
        #[arg(long, help = "Pretty-print JSON output")]
        pretty: bool,
    },
    /// Render the article body to HTML
    Render {
        file: PathBuf,
        #[arg(long = "image-url", value_parser = parse_mapping, help = "Replace an image path: LOCAL=URL")]
        image_urls: Vec<(String, String)>,
    },
    Config(ConfigCommand),
}

#[derive(Parser)]
struct ConfigCommand {
    #[command(subcommand)]
    subcommand: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    Init {
        #[arg(long)]
        global: bool,
    },
    Show,
    Path {
        #[arg(long)]
        global: bool,
    },
}

fn parse_mapping(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(local, url)| (local.to_string(), url.to_string()))
        .ok_or_else(|| format!("expected LOCAL=URL, got {:?}", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Config(cmd) => handle_config(cmd, cli.config.as_ref()),
        Command::Format {
            paths,
            check,
            no_standardize,
        } => {
            let config = mdwx::Config::load(cli.config.as_ref(), None)?;
            let paths = resolve_paths(paths, &config)?;
            let opts = FormatOptions {
                standardize_front_matter: config.format.standardize_front_matter && !no_standardize,
                check,
            };

            let summary = article::format_paths(&paths, &opts)?;
            for path in &summary.changed {
                let verb = if check { "would reformat" } else { "reformatted" };
                println!("{}: {}", verb, path.display());
            }

            if !summary.failed.is_empty() {
                anyhow::bail!("Failed to format {} file(s)", summary.failed.len());
            }
            if check && !summary.changed.is_empty() {
                anyhow::bail!("{} file(s) would be reformatted", summary.changed.len());
            }
            Ok(())
        }
        Command::Lint { paths } => {
            let config = mdwx::Config::load(cli.config.as_ref(), None)?;
            let mut found = 0;
            for path in resolve_paths(paths, &config)? {
                let files = if path.is_dir() {
                    article::scan_markdown_files(&path)?
                } else {
                    vec![path]
                };
                for file in files {
                    let content = std::fs::read_to_string(&file)
                        .with_context(|| format!("Failed to read {:?}", file))?;
                    for violation in front_matter::check_format(&content) {
                        println!("{}:{}: {}", file.display(), violation.line_number, violation.message);
                        found += 1;
                    }
                }
            }

            if found > 0 {
                anyhow::bail!("Found {} front matter violation(s)", found);
            }
            Ok(())
        }
        Command::Check { dir } => {
            let config = mdwx::Config::load(cli.config.as_ref(), dir)?;
            let source_dir = config.source_dir()?;
            let report = article::find_missing_images(source_dir, &config.images.extensions)?;

            if report.is_empty() {
                println!("No missing images");
                return Ok(());
            }

            for entry in &report {
                println!("{}", entry.file.display());
                for image in &entry.missing {
                    println!("  - {}", image);
                }
            }
            anyhow::bail!("Found missing images in {} file(s)", report.len());
        }
        Command::Meta { file, pretty } => {
            let article = article::load_article(&file)?;
            output_json(&article.meta, pretty)
        }
        Command::Render { file, image_urls } => {
            let article = article::load_article(&file)?;
            let image_urls: HashMap<String, String> = image_urls.into_iter().collect();
            print!("{}", render_html(&article.body, &image_urls));
            Ok(())
        }
    }
}

fn resolve_paths(paths: Vec<PathBuf>, config: &mdwx::Config) -> Result<Vec<PathBuf>> {
    if !paths.is_empty() {
        return Ok(paths);
    }
    Ok(vec![config.source_dir()?.to_path_buf()])
}

fn handle_config(cmd: ConfigCommand, config_path: Option<&PathBuf>) -> Result<()> {
    match cmd.subcommand {
        ConfigSubcommand::Init { global } => {
            let path = mdwx::Config::init_config(global)?;
            println!("Created config file: {:?}", path);
            Ok(())
        }
        ConfigSubcommand::Show => {
            let config = mdwx::Config::load(config_path, None)?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigSubcommand::Path { global } => {
            let path = if global {
                mdwx::Config::global_config_path()
            } else {
                // Try project config first, fall back to global
                mdwx::Config::project_config_path().or_else(mdwx::Config::global_config_path)
            };

            if let Some(p) = path {
                println!("{}", p.display());
            } else {
                anyhow::bail!("Config file not found");
            }
            Ok(())
        }
    }
}

fn output_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
