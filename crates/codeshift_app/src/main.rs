mod platform;

use std::path::PathBuf;

use clap::Parser;

/// Upload a zipped project, watch the conversion stream in, and print the download link.
#[derive(Debug, Parser)]
#[command(name = "codeshift", version, about)]
pub struct Cli {
    /// Project archive (.zip) to convert.
    pub archive: PathBuf,

    /// Settings file; defaults are used when it does not exist.
    #[arg(long, default_value = "codeshift.ron")]
    pub config: PathBuf,

    /// Backend base URL, overriding the settings file.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Show plain text panes instead of viewer widgets.
    #[arg(long)]
    pub raw: bool,

    /// After the run, show the result at this index instead of the first.
    #[arg(long)]
    pub select: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::run_app(cli).await
}
