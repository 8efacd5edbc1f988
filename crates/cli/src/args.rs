use chainq_query::{QuerySpec, StorageKind};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the chainq query tool.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chainq",
    version = env!("CARGO_PKG_VERSION"),
    about = "Query a remote chain-state store and export the result",
    long_about = "chainq resolves a storage item, keyed collection or constant from a \
remote chain-state store over JSON-RPC, dumps the full result as JSON, and writes a \
comma-delimited table of the normalized rows to out.csv in the working directory."
)]
pub struct Cli {
    /// Storage category to query
    #[arg(short = 'm', long = "module", value_name = "NAME")]
    pub module: String,

    /// Storage item to query
    #[arg(short = 's', long = "storage", value_name = "NAME")]
    pub storage: String,

    /// Storage kind: item, map, double or const (anything else queries an item)
    #[arg(short = 't', long = "type", value_name = "KIND", default_value = "item")]
    pub kind: String,

    /// Primary key (required for double maps, optional for maps)
    #[arg(short = 'a', long = "arg", value_name = "KEY", default_value = "")]
    pub arg: String,

    /// Secondary key for double map queries
    #[arg(short = 'd', long = "double", value_name = "KEY", default_value = "")]
    pub double: String,

    /// Allow-list file restricting bulk map results
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// JSON-RPC endpoint of the chain-state store
    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        default_value = "http://localhost:9933"
    )]
    pub url: String,

    /// Output path for the JSON dump (stdout when omitted)
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    pub out: Option<PathBuf>,
}

impl Cli {
    /// Builds the normalized query spec for this invocation.
    ///
    /// `QuerySpec::new` applies the precedence rules: empty key strings
    /// count as absent, and a filter file on a map query clears the
    /// primary key.
    pub fn query_spec(&self) -> QuerySpec {
        QuerySpec::new(
            self.module.clone(),
            self.storage.clone(),
            StorageKind::classify(&self.kind),
            Some(self.arg.clone()),
            Some(self.double.clone()),
            self.file.clone(),
        )
    }
}
