use std::path::PathBuf;

use clap::Parser;

mod platform;

use platform::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "wordsync")]
#[command(about = "Keeps a word count field in markdown frontmatter up to date")]
#[command(version)]
pub struct Cli {
    /// Directory holding the markdown documents
    #[arg(long, default_value = ".")]
    pub vault: PathBuf,

    /// Settings file (created on first change)
    #[arg(long, default_value = ".wordsync.ron")]
    pub settings: PathBuf,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::logging::initialize(cli.log);
    platform::app::run_app(&cli)
}
