use clap::Parser;
use jrep::cli::{generate_completions, AppConfig, Args, Commands};
use jrep::diagnostic::render_diagnostics;
use jrep::json;
use jrep::report::{self, Document, IssueKind, Report};
use jrep::table;
use owo_colors::OwoColorize;
use std::io::{self, Read, Write};
use std::path::Path;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting jrep");

    let paths_text = match read_paths_input(&args, &config) {
        Ok(s) => s,
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    };

    let columns = report::parse_path_expressions(&paths_text);
    if columns.is_empty() {
        error_message(&config, "No usable path expressions provided.");
        std::process::exit(1);
    }
    verbose_log(&config, &format!("Parsed {} path expressions", columns.len()));

    let documents = match load_documents(&args, &config) {
        Ok(docs) => docs,
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    };

    let report = report::build_report(&documents, &columns);
    report_issues(&report, &config);
    verbose_log(
        &config,
        &format!("Report built: {} rows, {} columns", report.rows.len(), report.columns.len()),
    );

    let rendered = format!("{}\n", table::render_table(&report, config.compact));

    match &args.out {
        None => {
            print!("{}", rendered);
            io::stdout().flush().unwrap();
        }
        Some(out_path) => {
            verbose_log(&config, &format!("Writing output to file: {}", out_path.display()));
            if let Err(e) = std::fs::write(out_path, rendered.as_bytes()) {
                error_message(&config, &format!("Error writing to output file: {}", e));
                std::process::exit(1);
            }
        }
    }
}

fn read_paths_input(args: &Args, config: &AppConfig) -> Result<String, String> {
    if let Some(paths) = &args.paths {
        verbose_log(config, "Using path expressions from command-line argument");
        Ok(paths.clone())
    } else if let Some(paths_file) = &args.paths_file {
        verbose_log(
            config,
            &format!("Reading path expressions from file: {}", paths_file.display()),
        );
        read_file(paths_file)
    } else {
        Err("No path expressions provided. Use --paths or --paths-file".to_string())
    }
}

fn load_documents(args: &Args, config: &AppConfig) -> Result<Vec<Document>, String> {
    if args.files.is_empty() {
        verbose_log(config, "Reading JSON from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;

        if buffer.trim().is_empty() {
            return Err("No input provided. Pass JSON files or JSON via stdin".to_string());
        }

        return Ok(vec![match json::parse_document(&buffer) {
            Ok(value) => Document::parsed("stdin", value),
            Err(e) => Document::failed("stdin", e),
        }]);
    }

    let mut documents = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let name = document_name(file);
        verbose_log(config, &format!("Reading JSON from file: {}", file.display()));
        let document = match read_file(file).and_then(|text| json::parse_document(&text)) {
            Ok(value) => Document::parsed(name, value),
            Err(e) => Document::failed(name, e),
        };
        documents.push(document);
    }
    Ok(documents)
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn report_issues(report: &Report, config: &AppConfig) {
    for issue in &report.issues {
        match &issue.kind {
            IssueKind::Document { message } => {
                warn_message(
                    config,
                    &format!("{}: JSON parse error: {}", issue.source, message),
                );
            }
            IssueKind::Cell {
                alias,
                expression,
                failure,
            } => {
                warn_message(
                    config,
                    &format!(
                        "{}: expression '{}' could not be evaluated: {}",
                        issue.source, alias, failure
                    ),
                );
                if config.verbose {
                    let rendered = render_diagnostics(
                        expression,
                        alias,
                        &[failure.to_diagnostic()],
                        config.color_enabled,
                    );
                    eprint!("{}", rendered);
                }
            }
        }
    }
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[jrep:debug] {}", message);
    }
}

fn warn_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.yellow());
    } else {
        eprintln!("{}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
