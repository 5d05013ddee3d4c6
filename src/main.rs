use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use command_canvas::{config::Config, demo, repl::Session};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: command-canvas [--demo] [--seed <u64>] [--config <path>]";

#[derive(Debug, Default)]
struct Args {
    demo: bool,
    seed: Option<u64>,
    config: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => parsed.demo = true,
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                parsed.seed = Some(value.parse().with_context(|| format!("bad seed `{value}`"))?);
            }
            "--config" => {
                parsed.config = Some(args.next().context("--config needs a path")?.into());
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unexpected argument `{other}`\n{USAGE}"),
        }
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = Config::load(args.config.as_deref()).context("load configuration")?;
    info!(?config, "starting");

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(config, rng);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.demo {
        demo::run(&mut session, &mut out).context("run demo")?;
        // The walkthrough's commands do not carry over into the interactive session.
        session.reset();
    }

    session
        .run(io::stdin().lock(), &mut out)
        .context("interactive session")?;
    out.flush()?;
    Ok(())
}
