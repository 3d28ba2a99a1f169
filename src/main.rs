use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use howto_gallery::config::GalleryConfig;
use howto_gallery::gallery;
use howto_gallery::session::{Session, play};
use sample_host::{MockAdapter, TestFilter, TestRunConfig, TestRunner};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "howto-gallery", about = "Chat-triggered scripting samples on a mock host")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a scripted chat session and print the chat transcript
    Play {
        session: PathBuf,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run registered gameplay tests (selection from GAMETEST_* unless tags are given)
    Gametest {
        tags: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// List chat samples and gameplay tests
    List,
}

fn main() -> Result<ExitCode> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GalleryConfig::from_env()?;
    let gallery = gallery(&config);

    match cli.command {
        Command::Play { session, json } => {
            let session = Session::from_file(&session)?;
            let report = play(&session, gallery.manager);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in &report.chat {
                    println!("{line}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Gametest { tags, json } => {
            let filter = if tags.is_empty() {
                config.test_filter()
            } else {
                TestFilter::by_tags(tags)
            };

            let adapter = MockAdapter::new();
            let runner = TestRunner::new(&adapter, TestRunConfig::default());
            let summary = runner.run_registry(&gallery.gametests.borrow(), &filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }
            Ok(if summary.failed_tests == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::List => {
            println!("Samples:");
            for name in gallery.manager.sample_names() {
                println!("  {name}");
            }
            println!("Gameplay tests:");
            let registry = gallery.gametests.borrow();
            for name in registry.list_test_names() {
                println!("  {name}");
            }
            println!("Tags: {}", registry.list_tags().join(", "));
            Ok(ExitCode::SUCCESS)
        }
    }
}
