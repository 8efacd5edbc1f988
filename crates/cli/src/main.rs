mod args;

use anyhow::{bail, Context, Result};
use args::Cli;
use chainq_client::StateClient;
use chainq_query::{execute, export, NormalizedTable, TracingDiagnostics};
use clap::Parser;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let spec = cli.query_spec();
    spec.validate()?;

    let url = url::Url::parse(&cli.url)
        .with_context(|| format!("invalid endpoint url: {}", cli.url))?;
    let client = StateClient::builder(url)
        .build()
        .context("failed to build state client")?;

    // Fail before querying when the endpoint is unreachable, like a
    // connection-oriented client would at construction time.
    if let Err(err) = client.health().await {
        bail!("cannot reach {}: {err}", cli.url);
    }

    let result = execute(&client, &spec, &TracingDiagnostics).await?;

    export::dump_json(&result, cli.out.as_deref())?;

    let table = NormalizedTable::from_result(&result);
    export::dump_csv(&table, Path::new(export::TABLE_FILE))?;
    info!(rows = table.rows.len(), "wrote {}", export::TABLE_FILE);

    Ok(())
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,chainq=info"));
    let _ = fmt().with_env_filter(env_filter).try_init();
}
