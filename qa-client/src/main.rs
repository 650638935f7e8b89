use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use qa_client::{AskForm, HttpAskTransport, SubmitOutcome, transport::DEFAULT_TIMEOUT_SECS};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "qa-client", version, about = "Ask the Q&A server from the terminal")]
struct Cli {
    /// Base URL of the Q&A server.
    #[arg(long, env = "QA_API_URL", default_value = "http://localhost:3001")]
    api_url: String,

    /// Ask a single question and exit.
    #[arg(short, long)]
    question: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let transport = HttpAskTransport::new(&cli.api_url, Duration::from_secs(cli.timeout_secs))
        .context("failed to build HTTP client")?;
    let mut form = AskForm::new();

    if let Some(question) = cli.question {
        form.set_question(question);
        let outcome = form.submit(&transport).await;
        render(&form, &outcome);
        return Ok(());
    }

    println!("Asking {} (empty line is ignored, `exit` quits)", transport.ask_url());
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        stdout.write_all(b"? ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        form.set_question(line);
        let outcome = form.submit(&transport).await;
        render(&form, &outcome);
    }

    Ok(())
}

fn render(form: &AskForm, outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Skipped => {}
        SubmitOutcome::Answered | SubmitOutcome::Failed => println!("{}\n", form.answer()),
        SubmitOutcome::Rejected { error } => {
            eprintln!("server error: {}\n", error.as_deref().unwrap_or("unknown"));
        }
    }
}
