use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use arxives::{
    format::Formatter, ArxivConfig, ArxivError, HttpTransport, PaginatedRetriever, QuerySpec,
};

/// Search arXiv by title, author, abstract or id and print the matching papers.
#[derive(Parser, Debug)]
#[command(name = "arxives", version)]
struct Cli {
    /// Term that must appear in the title (repeatable)
    #[arg(short, long = "title")]
    titles: Vec<String>,

    /// Author name term (repeatable)
    #[arg(short, long = "author")]
    authors: Vec<String>,

    /// Term that must appear in the abstract (repeatable)
    #[arg(short = 's', long = "abstract")]
    abstracts: Vec<String>,

    /// arXiv id to restrict the search to (repeatable)
    #[arg(short, long = "id")]
    ids: Vec<String>,

    /// Offset of the first result
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Results per request; defaults to ARXIV_PAGE_SIZE or 10
    #[arg(long)]
    page_size: Option<usize>,

    /// Stop after this many pages
    #[arg(long)]
    max_pages: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Readme)]
    format: OutputFormat,

    /// Allow a query with no terms, listing everything
    #[arg(long)]
    browse: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Readme,
    Jsonl,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("arxives=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(ArxivError::ServiceReported { message }) => {
            eprintln!("arXiv rejected the query: {}", message);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> arxives::Result<()> {
    let config = ArxivConfig::from_env()?;
    let query = QuerySpec::builder()
        .titles(&cli.titles)
        .authors(&cli.authors)
        .abstracts(&cli.abstracts)
        .ids(&cli.ids)
        .start(cli.start)
        .max_results(cli.page_size.unwrap_or(config.page_size))
        .allow_empty(cli.browse)
        .build()?;

    let transport = HttpTransport::new(&config)?;
    let pages = PaginatedRetriever::new(transport, config, query)?.retrieve()?;
    eprintln!("# results: {}", pages.total_results());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for page in pages.take(cli.max_pages.unwrap_or(usize::MAX)) {
        let page = page?;
        let cursor = page.cursor;
        for (i, record) in page {
            let line = match cli.format {
                OutputFormat::Readme => Formatter::to_readme(cursor + i + 1, &record),
                OutputFormat::Jsonl => Formatter::to_jsonl(&record)?,
            };
            if let Err(e) = out.write_all(line.as_bytes()) {
                // closed pipe, e.g. `| head`
                if e.kind() == io::ErrorKind::BrokenPipe {
                    return Ok(());
                }
                return Err(e.into());
            }
        }
    }
    Ok(())
}
