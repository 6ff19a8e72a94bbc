//! CLI entry point for `mailquote`.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};

use mailquote::config::{self, Config};
use mailquote::html::{self, RenderContext};
use mailquote::parser::{eml, quote, uri};
use mailquote::reply;

#[derive(Parser)]
#[command(
    name = "mailquote",
    version,
    about = "Render plain-text email as quote-aware HTML, and back"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Where the message comes from.
#[derive(Args)]
struct Input {
    /// Input file (`-` or omitted for stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Treat the input as a raw RFC 5322 message and use its body
    #[arg(long)]
    eml: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a plain-text body as HTML
    Render {
        #[command(flatten)]
        input: Input,
        /// Add the dark-mode stylesheet
        #[arg(long)]
        dark: bool,
        /// Use a monospace font
        #[arg(long)]
        fixed_width: bool,
    },
    /// Render a plain-text body as an inline HTML fragment
    Fragment {
        #[command(flatten)]
        input: Input,
    },
    /// Convert HTML to plain text
    ToText {
        #[command(flatten)]
        input: Input,
    },
    /// Show the quote sections of a plain-text body
    Sections {
        #[command(flatten)]
        input: Input,
        #[arg(long)]
        json: bool,
    },
    /// List the URIs found in a plain-text body
    Links {
        #[command(flatten)]
        input: Input,
        #[arg(long)]
        json: bool,
    },
    /// Quote a plain-text body for a reply
    Quote {
        #[command(flatten)]
        input: Input,
        /// Quote prefix (defaults to the configured one)
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
        /// Keep the original signature
        #[arg(long)]
        keep_signature: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::load_config();

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Render {
            input,
            dark,
            fixed_width,
        } => cmd_render(&input, dark, fixed_width, &config),
        Commands::Fragment { input } => {
            let text = read_plain_text(&input)?;
            write_output(&html::text_to_html_fragment(&text))
        }
        Commands::ToText { input } => cmd_to_text(&input),
        Commands::Sections { input, json } => cmd_sections(&input, json),
        Commands::Links { input, json } => cmd_links(&input, json),
        Commands::Quote {
            input,
            prefix,
            keep_signature,
        } => cmd_quote(&input, prefix, keep_signature, &config),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Try to set up file logging
    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "mailquote.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Read the whole input from a file or stdin.
fn read_raw(input: &Input) -> anyhow::Result<Vec<u8>> {
    match input.file.as_deref() {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            Ok(std::fs::read(path)?)
        }
        _ => {
            let mut data = Vec::new();
            std::io::stdin().read_to_end(&mut data)?;
            Ok(data)
        }
    }
}

/// The plain-text body to work on.
fn read_plain_text(input: &Input) -> anyhow::Result<String> {
    let data = read_raw(input)?;
    if !input.eml {
        return Ok(String::from_utf8_lossy(&data).into_owned());
    }
    let body = eml::parse_message(&data)?;
    match body.plain_text() {
        Some(text) => Ok(text.into_owned()),
        None => anyhow::bail!("Message has no text body"),
    }
}

fn write_output(text: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn cmd_render(input: &Input, dark: bool, fixed_width: bool, config: &Config) -> anyhow::Result<()> {
    let text = read_plain_text(input)?;
    let configured = config.render_context();
    let context = RenderContext::new(
        dark || configured.dark_mode,
        fixed_width || configured.fixed_width_font,
    );
    write_output(&html::render_to_html(&text, &context))
}

fn cmd_to_text(input: &Input) -> anyhow::Result<()> {
    let data = read_raw(input)?;
    if input.eml {
        let body = eml::parse_message(&data)?;
        return match (body.html, body.text) {
            (Some(html), _) => write_output(&html::html_to_plain_text(&html)),
            (None, Some(text)) => write_output(&text),
            (None, None) => anyhow::bail!("Message has no body"),
        };
    }
    write_output(&html::html_to_plain_text(&String::from_utf8_lossy(&data)))
}

fn cmd_sections(input: &Input, json: bool) -> anyhow::Result<()> {
    let text = read_plain_text(input)?;
    let sections = quote::segment_by_quote_depth(&text);

    if json {
        let values: Vec<serde_json::Value> = sections
            .iter()
            .map(|section| {
                serde_json::json!({
                    "quote_depth": section.quote_depth(),
                    "text": section.text(),
                    "segments": section.segments(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    println!();
    println!("  {} section(s)", sections.len());
    println!();
    for (i, section) in sections.iter().enumerate() {
        println!("  #{:<4} depth {}", i + 1, section.quote_depth());
        for line in section.text().lines() {
            println!("  {}| {}", "  ".repeat(section.quote_depth()), line);
        }
    }
    Ok(())
}

fn cmd_links(input: &Input, json: bool) -> anyhow::Result<()> {
    let text = read_plain_text(input)?;
    let links = uri::find_uris(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    for link in &links {
        println!("  {:>8}..{:<8} {}", link.start_index, link.end_index, link.uri);
    }
    Ok(())
}

fn cmd_quote(
    input: &Input,
    prefix: Option<String>,
    keep_signature: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let text = read_plain_text(input)?;
    let mut options = config.reply.clone();
    if let Some(prefix) = prefix {
        options.quote_prefix = prefix;
    }
    if keep_signature {
        options.strip_signature = false;
    }
    write_output(&reply::quote_for_reply(&text, &options))
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mailquote", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::stdout().write_all(&buf)?;
    Ok(())
}
