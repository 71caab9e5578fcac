use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use reqwest::Client;
use tracing::error;

use todolist::docs::{self, DocsConfig, SqliteFtsIndex, TextIndex};
use todolist::telemetry;

const PREVIEW_CHARS: usize = 200;

/// Download a documentation archive, index its markdown files and query it.
#[derive(Debug, Parser)]
#[command(name = "docsearch")]
struct Args {
    /// Zip archive to download.
    #[arg(long, env = "DOCS_ARCHIVE_URL", default_value = docs::DEFAULT_ARCHIVE_URL)]
    url: String,

    /// Directory the archive is saved and unpacked in.
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// File name of the downloaded archive inside the workdir.
    #[arg(long, default_value = docs::DEFAULT_ARCHIVE_NAME)]
    archive_name: String,

    /// Top-level directory the archive unpacks to.
    #[arg(long, default_value = docs::DEFAULT_EXTRACT_DIR)]
    extract_dir: String,

    /// File extensions to index.
    #[arg(long = "ext", value_delimiter = ',', default_values_t = [String::from("md"), String::from("mdx")])]
    extensions: Vec<String>,

    /// Free-text query.
    #[arg(short, long, default_value = "demo")]
    query: String,

    #[arg(short = 'n', long, default_value_t = 5)]
    num_results: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    telemetry::init("todolist=info,docsearch=info");

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = DocsConfig {
        archive_url: args.url,
        workdir: args.workdir,
        archive_name: args.archive_name,
        extract_dir: args.extract_dir,
        extensions: args.extensions,
    };

    let client = Client::builder().build()?;
    let index = SqliteFtsIndex::in_memory().await?;

    docs::run(&config, &client, &index).await?;

    let rule = "=".repeat(70);
    println!("{rule}");
    println!("Searching for: '{}'", args.query);
    println!("{rule}");

    let results = index.search(&args.query, args.num_results).await?;

    println!("\nFound {} results:\n", results.len());
    for (i, hit) in results.iter().enumerate() {
        println!("{}. {}", i + 1, hit.filename);
        println!("   Preview: {}...", hit.preview(PREVIEW_CHARS));
        println!();
    }

    match results.first() {
        Some(top) => {
            println!("{rule}");
            println!("First file returned for query '{}': {}", args.query, top.filename);
            println!("{rule}");
        }
        None => println!("No results found!"),
    }

    Ok(())
}
