use anyhow::Result;
use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use page_mirror::{FetchResult, MirrorCommand, MirrorReport, PageMirror, ReqwestFetch};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = MirrorCommand::parse();

    match run(&args).await {
        Ok(report) => print_summary(&report),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: &MirrorCommand) -> Result<MirrorReport> {
    let client = ReqwestFetch::new()?;
    let mirror = PageMirror::new(&args.url, &args.output, client)?;
    Ok(mirror.download_page().await?)
}

fn print_summary(report: &MirrorReport) {
    println!("{}", "Page downloaded".green());
    println!("Saved to: {}", report.page_path.display());

    if !report.outcomes.is_empty() {
        println!(
            "Resources: {} downloaded, {} failed",
            report.downloaded_count(),
            report.failed_count()
        );
        for outcome in &report.outcomes {
            if outcome.result == FetchResult::Failed {
                let reason = outcome.error.as_deref().unwrap_or("unknown error");
                eprintln!(
                    "{} {} ({})",
                    "failed:".yellow(),
                    outcome.source_url,
                    reason
                );
            }
        }
    }
}
