use std::process::ExitCode;

use clap::Parser;

use todolist::scrape::{self, JinaReader};
use todolist::telemetry;

const EDGE_CHARS: usize = 500;
const SAMPLE_LIMIT: usize = 5;
const SAMPLE_RADIUS: usize = 50;

/// Fetch a page as text through the reader service.
#[derive(Debug, Parser)]
#[command(name = "scrape")]
struct Args {
    /// Page to fetch.
    url: String,

    /// Count case-insensitive occurrences of this word instead of printing
    /// the page edges.
    #[arg(long)]
    count: Option<String>,

    /// Reader service the URL is appended to.
    #[arg(long, env = "READER_BASE_URL", default_value = scrape::DEFAULT_READER_BASE)]
    reader: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    telemetry::init("todolist=info,scrape=info");

    let args = Args::parse();

    let reader = match JinaReader::new(&args.reader) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rule = "=".repeat(50);
    println!("Scraping: {}", args.url);
    println!("{rule}");

    let content = scrape::scrape_web(&reader, &args.url).await;
    if content.starts_with("Error scraping") {
        println!("Error occurred: {content}");
        return ExitCode::FAILURE;
    }

    println!("\nContent length: {} characters", content.chars().count());

    match args.count {
        Some(word) => {
            let count = scrape::count_occurrences(&content, &word);
            println!("Number of times '{word}' appears: {count}");

            println!("\n{rule}");
            println!("Sample occurrences (first {SAMPLE_LIMIT}):");
            println!("{}", "-".repeat(50));
            for context in scrape::occurrence_contexts(&content, &word, SAMPLE_LIMIT, SAMPLE_RADIUS) {
                println!("  ...{context}...");
            }
        }
        None => {
            let total = content.chars().count();
            let head: String = content.chars().take(EDGE_CHARS).collect();
            let tail: String = content.chars().skip(total.saturating_sub(EDGE_CHARS)).collect();

            println!("\nFirst {EDGE_CHARS} characters:");
            println!("{}", "-".repeat(50));
            println!("{head}");
            println!("{}", "-".repeat(50));
            println!("\nLast {EDGE_CHARS} characters:");
            println!("{}", "-".repeat(50));
            println!("{tail}");
            println!("{}", "-".repeat(50));
        }
    }

    ExitCode::SUCCESS
}
