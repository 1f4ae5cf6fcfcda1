use std::env;

use resnet_nas::{Args, cli};
use search_space::Registry;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse(env::args().skip(1))?;
    let registry = Registry::with_defaults();
    let report = cli::run(&args, &registry)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
