use clap::{Parser, Subcommand};

use mimalloc::MiMalloc;

use crate::{refine::RefineArgs, schema::SchemaKind};

mod artifact_store;
mod parsers;
mod refine;
mod schema;
mod summary;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resubmit a problem until every route carries the target load
    #[command(visible_alias = "r")]
    Refine {
        #[command(flatten)]
        args: RefineArgs,
    },
    /// Print the JSON schema of the problem or solution format
    Schema {
        #[arg(value_enum, default_value_t = SchemaKind::Problem)]
        kind: SchemaKind,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Refine { args }) => refine::run(args).await?,
        Some(Commands::Schema { kind }) => schema::run(kind)?,
        None => {}
    }

    Ok(())
}
