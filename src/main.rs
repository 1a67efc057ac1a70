use anyhow::{Context, Result};
use clap::{Args, Parser as ClapParser, Subcommand};
use log::info;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mjmlify::{
    DiagnosticSink, NullSink, Parser, RenderConfig, Renderer, Transport, ValidationLevel,
};

#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    render: RenderArgs,

    /// Path to the YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the mjml executable (overrides config if provided)
    #[arg(long, global = true)]
    bin: Option<PathBuf>,

    /// Minify the rendered HTML
    #[arg(long, global = true)]
    minify: bool,

    /// Validation level: strict, soft or skip
    #[arg(long, global = true)]
    validation_level: Option<ValidationLevel>,
}

#[derive(Args, Clone, Debug)]
struct RenderArgs {
    /// Template file, or `-` for stdin
    input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// On failure exit non-zero without reporting renderer diagnostics
    #[arg(long)]
    lenient: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template to HTML (default command)
    Render(RenderArgs),
    /// Show the detected renderer
    Version,
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Version) => {
            show_version(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Render(args)) => render(config, &args),
        None => render(config, &cli.render),
    }
}

fn load_config(cli: &Cli) -> Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            RenderConfig::load(path).context("Failed to load config")?
        }
        None => RenderConfig::default(),
    };
    if let Some(bin) = &cli.bin {
        config = config.with_bin_path(bin);
    }
    if cli.minify {
        config = config.with_minify(true);
    }
    if let Some(level) = cli.validation_level {
        config = config.with_validation_level(level);
    }
    Ok(config)
}

fn show_version(config: &RenderConfig) -> Result<()> {
    let renderer = Renderer::detect(config)?;
    println!("path:    {}", renderer.path.display());
    println!("version: {}", renderer.version);
    println!("dialect: {}", renderer.version.dialect());
    Ok(())
}

fn render(config: RenderConfig, args: &RenderArgs) -> Result<ExitCode> {
    let parser = Parser::new(config)?;
    info!("Using renderer {}", parser.renderer());

    let template = read_template(args.input.as_deref())?;
    let Some(html) = render_html(parser, &template, args.lenient)? else {
        return Ok(ExitCode::FAILURE);
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write output file {:?}", path))?;
            info!("{:?}", path);
        }
        None => {
            std::io::stdout()
                .write_all(html.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Lenient mode silences the diagnostic sink and reports failure as `None`.
fn render_html<T: Transport, S: DiagnosticSink>(
    parser: Parser<T, S>,
    template: &str,
    lenient: bool,
) -> Result<Option<String>> {
    if lenient {
        return Ok(parser.with_sink(NullSink).call(template));
    }
    Ok(Some(parser.try_call(template)?))
}

fn read_template(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template file {:?}", path)),
        _ => {
            let mut template = String::new();
            std::io::stdin()
                .read_to_string(&mut template)
                .context("Failed to read template from stdin")?;
            Ok(template)
        }
    }
}
