use anyhow::Result;
use clap::Parser;
use lotto_icon_gen::icon_gen::{self, IconSet};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(
    name = "lotto-icon-gen",
    version,
    about = "Generate the lotto analyzer icons into ./icons"
)]
struct Args {}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let _args = Args::parse();

    let set = IconSet::lotto()?;
    icon_gen::generate_icons(&set)?;
    Ok(())
}
