// src/main.rs
// =============================================================================
// This is the entry point of the demo CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build a Crawler from them and run it
// 3. Summarise every page (size + <title>) and print the records
// 4. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use level_crawler::{sort_records, CrawlRecord, Crawler};
use scraper::{Html, Selector};
use serde::Serialize;
use std::convert::Infallible;

// What we keep of each page instead of its raw bytes
#[derive(Debug, Clone, PartialEq, Serialize)]
struct PageSummary {
    bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let crawler = Crawler::from_config(cli.crawl_config())?.with_transform(summarize);
    eprintln!("🔍 Crawling {} (origin {})", crawler.start_url(), crawler.origin());

    let mut records = crawler.run().await?;
    sort_records(&mut records);

    print_results(&records, cli.json)?;
    Ok(0)
}

// The content transform handed to the crawler. It cannot fail.
fn summarize(raw: &[u8]) -> Result<PageSummary, Infallible> {
    let html = String::from_utf8_lossy(raw);
    let document = Html::parse_document(&html);

    let title = Selector::parse("title").ok().and_then(|selector| {
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    });

    Ok(PageSummary {
        bytes: raw.len(),
        title,
    })
}

// Prints the records either as a table or JSON
fn print_results(records: &[CrawlRecord<PageSummary>], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(records)?;
        println!("{}", json_output);
    } else {
        print_table(records);
    }
    Ok(())
}

fn print_table(records: &[CrawlRecord<PageSummary>]) {
    println!("{:<6} {:<60} {:>10}  {}", "DEPTH", "URL", "BYTES", "TITLE");
    println!("{}", "=".repeat(100));

    for record in records {
        // Truncate URL if too long for display
        let url_display = if record.url.chars().count() > 57 {
            format!("{}...", record.url.chars().take(57).collect::<String>())
        } else {
            record.url.clone()
        };

        match &record.content {
            Some(page) => println!(
                "{:<6} {:<60} {:>10}  {}",
                record.depth,
                url_display,
                page.bytes,
                page.title.as_deref().unwrap_or("")
            ),
            None => println!("{:<6} {:<60} {:>10}  ", record.depth, url_display, "FAILED"),
        }
    }

    println!();

    let failed = records.iter().filter(|r| r.content.is_none()).count();
    println!("📊 Summary:");
    println!("   ✅ Fetched: {}", records.len() - failed);
    println!("   ❌ Failed: {}", failed);
    println!("   📋 Total: {}", records.len());
}
