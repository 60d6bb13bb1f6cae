use crate::cli::PackArgs;
use colored::*;
use promptpack::output::{self, OutputFormat, RunSummary};
use promptpack::{
    discover, read_list, tokens, validate_files, validate_request, AssemblyPipeline, Config,
    Error, FsReader, FuzzyRanker, SelectionEngine, Settings, TerminalPrompter, Tokenizer,
};
use std::fs;
use std::path::{Path, PathBuf};

pub fn run(args: PackArgs, mut config: Config) -> Result<(), Box<dyn std::error::Error>> {
    config.merge(args.overrides());
    let settings = config.resolve();

    if config.no_color.unwrap_or(false) {
        colored::control::set_override(false);
    }

    let format = if let Some(ref fmt) = args.format {
        fmt.parse::<OutputFormat>()?
    } else {
        OutputFormat::Text
    };

    let tokenizer = tokens::load(&settings.encoding);
    let reader = FsReader;
    let mut prompter = TerminalPrompter::new(&settings);

    let files = if args.has_explicit_files() {
        let list = explicit_files(&args, &settings)?;
        if args.interactive {
            select(list, &settings, &reader, tokenizer.as_ref(), &mut prompter)?
        } else {
            list
        }
    } else {
        let root = args.dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let pool = discover(&root, &settings)?;
        select(pool, &settings, &reader, tokenizer.as_ref(), &mut prompter)?
    };

    let pipeline = AssemblyPipeline::new(&reader, tokenizer.as_ref());

    let advisory = pipeline.advisory_total(&files)?;
    eprintln!(
        "{} files, {} tokens before the request",
        files.len(),
        advisory.to_string().bold()
    );
    if advisory > settings.token_threshold {
        eprintln!(
            "{}",
            format!(
                "warning: {} tokens exceeds the {} token threshold",
                advisory, settings.token_threshold
            )
            .yellow()
            .bold()
        );
    }

    let request = match args.request {
        Some(ref request) => request.clone(),
        None => prompter.prompt_request()?,
    };
    let request = validate_request(&request)?;

    let document = pipeline.assemble(&files, &request)?;
    write_document(&settings.output, document.body())?;

    let summary = RunSummary::new(&settings.output, &document, settings.token_threshold);
    match format {
        OutputFormat::Text => print_summary(&summary),
        OutputFormat::Json => output::json::output_summary(&summary)?,
    }

    Ok(())
}

fn explicit_files(args: &PackArgs, settings: &Settings) -> Result<Vec<String>, Error> {
    let mut ids = args.files.clone();
    let source = match args.list {
        Some(ref list) => {
            ids.extend(read_list(list)?);
            list.display().to_string()
        }
        None => "arguments".to_string(),
    };

    validate_files(&ids, settings, &source)
}

fn select(
    pool: Vec<String>,
    settings: &Settings,
    reader: &FsReader,
    tokenizer: &dyn Tokenizer,
    prompter: &mut TerminalPrompter,
) -> Result<Vec<String>, Error> {
    let mut engine = SelectionEngine::new(
        pool,
        settings,
        reader,
        tokenizer,
        Box::new(FuzzyRanker::new()),
    );
    let selection = engine.run(prompter)?;

    if selection.files.is_empty() {
        return Err(Error::NothingSelected);
    }
    Ok(selection.files)
}

fn write_document(path: &Path, body: &str) -> Result<(), Error> {
    fs::write(path, body).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn print_summary(summary: &RunSummary) {
    println!("{} {}", "Wrote".green().bold(), summary.output);
    for file in &summary.files {
        println!("  {:>8} {}", file.tokens, file.path);
    }
    println!("  {:>8} {}", summary.request_tokens, "(request)".dimmed());

    let total = format!("{} tokens", summary.total_tokens);
    if summary.over_threshold {
        println!("Total: {}", total.yellow().bold());
    } else {
        println!("Total: {}", total.bold());
    }
}
