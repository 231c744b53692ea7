use clap::Parser;
use std::io::Read;
use std::time::Instant;

use string_filter::config::FilterConfig;
use string_filter::logging;
use string_filter::records::{self, RecordFormat};
use string_filter::{Filter, JsonTester, StringMatchMode};

#[derive(Parser, Debug)]
#[command(name = "string-filter")]
#[command(about = "Filters JSON or YAML records with a query like `size>10mb & name:ferr`")]
struct Args {
    /// Filter query
    query: String,

    /// Records file (.json, .yaml or .yml); JSON from stdin when omitted
    #[arg(short, long)]
    input: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Field tested by terms without a key (overrides config file)
    #[arg(long)]
    default_key: Option<String>,

    /// String match mode: included_within, starts_with or complete_match
    #[arg(long)]
    mode: Option<StringMatchMode>,

    /// Plain substring matching instead of word starts
    #[arg(long)]
    simple: bool,

    #[arg(long)]
    case_sensitive: bool,

    /// Print the number of matching records only
    #[arg(long)]
    count: bool,

    /// Print the parsed query tree and exit
    #[arg(long)]
    explain: bool,

    /// Debug logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logging::init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => FilterConfig::load_from_file(path)
            .map_err(|e| format!("Failed to load configuration: {}", e))?,
        None => FilterConfig::default(),
    };

    // Override with command line arguments if provided
    if let Some(key) = args.default_key {
        config.default_key = key;
    }
    if let Some(mode) = args.mode {
        config.matching.mode = mode;
    }
    if args.simple {
        config.matching.simple = true;
    }
    if args.case_sensitive {
        config.matching.case_sensitive = true;
    }

    let options = config.to_options();
    let filter = Filter::create(
        JsonTester::with_default_key(config.default_key.clone()),
        &args.query,
        &options,
    );

    if args.explain {
        println!("{}", filter.root());
        println!("terms: {}", filter.root().leaf_count());
        return Ok(());
    }

    let records = match &args.input {
        Some(path) => records::load_records(path)?,
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            records::parse_records(&content, RecordFormat::Json)?
        }
    };

    let start = Instant::now();
    let matched = filter.filter_items(&records);
    logging::log_filter_run(&args.query, records.len(), matched.len(), start.elapsed());

    if args.count {
        println!("{}", matched.len());
    } else {
        for record in matched {
            println!("{}", serde_json::to_string(record)?);
        }
    }

    Ok(())
}
