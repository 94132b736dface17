use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use xicon::Project;

/// Generates android and ios app icons from `assets/logo.png`.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Project root containing `assets/logo.png`
    #[clap(long, default_value = ".")]
    root: PathBuf,
}

fn main() {
    use tracing_subscriber::EnvFilter;
    tracing_log::LogTracer::init().ok();
    let env = std::env::var("XICON_LOG").unwrap_or_else(|_| "error".into());
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(env))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
    log_panics::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("{} {:#}", style("[ERROR]").red(), err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let root = std::path::absolute(&args.root)
        .with_context(|| format!("failed to resolve `{}`", args.root.display()))?;
    let project = Project::new(root);
    tracing::info!("project root {}", project.root().display());
    xicon::generate(&project)
}
