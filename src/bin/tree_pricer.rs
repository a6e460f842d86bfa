//! Command-line pricer for binomial and trinomial tree models.
//!
//! ```text
//! tree_pricer --config model.json --family american --tree binomial [--json]
//! tree_pricer --config model.json --convergence 10,50,100,500
//! ```

use std::path::PathBuf;

use clap::Parser;
use openlattice::core::{OptionFamily, TreeKind};
use openlattice::engines::tree::{TreeModel, TreeModelBuilder};
use openlattice::pricing::ConvergenceStudy;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Price an option on a recombining tree
#[derive(Parser, Debug)]
#[command(name = "tree_pricer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Model configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Option family: european, american, digital, power, strangle
    #[arg(short, long, default_value = "european")]
    family: OptionFamily,

    /// Tree: binomial or trinomial
    #[arg(short, long, default_value = "binomial")]
    tree: TreeKind,

    /// Print the full valuation (lattices and distribution) as JSON
    #[arg(long)]
    json: bool,

    /// Comma-separated step counts for a convergence study
    #[arg(long, value_delimiter = ',')]
    convergence: Option<Vec<usize>>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TREE_PRICER_LOG", default_value = "warn")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let raw = std::fs::read_to_string(&args.config)?;
    let builder = TreeModelBuilder::from_json(&raw)?;
    info!(config = %args.config.display(), family = %args.family, tree = %args.tree, "loaded model configuration");

    if let Some(steps) = args.convergence {
        let points = ConvergenceStudy::new(builder, args.family).run(&steps)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&points)?);
        } else {
            println!("{:>8} {:>14} {:>14} {:>14}", "steps", "binomial", "trinomial", "reference");
            for p in points {
                let reference = p.reference.map_or_else(|| "-".to_string(), |r| format!("{r:.8}"));
                println!(
                    "{:>8} {:>14.8} {:>14.8} {:>14}",
                    p.steps, p.binomial, p.trinomial, reference
                );
            }
        }
        return Ok(());
    }

    let model = builder.build(args.tree)?;
    let valuation = model.price(args.family)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&valuation)?);
    } else {
        println!(
            "{} {} price={:.10} delta={:.10}",
            args.tree,
            args.family,
            valuation.price,
            valuation.root_delta()
        );
    }
    Ok(())
}
