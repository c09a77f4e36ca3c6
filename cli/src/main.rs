use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use search_core::{load_jsonl_file, DocumentStatus, RankedDocument, SearchServer};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "searchctl")]
#[command(about = "Load documents and run TF-IDF queries against them", long_about = None)]
struct Cli {
    /// Input path (JSONL file, or a directory searched for *.jsonl)
    #[arg(long)]
    input: String,
    /// Space separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for a query
    Query {
        #[arg(long)]
        query: String,
        /// Only documents with this status (default: actual)
        #[arg(long)]
        status: Option<DocumentStatus>,
        /// Only documents rated at least this high
        #[arg(long)]
        min_rating: Option<i32>,
    },
    /// Print the query words found in one document
    Match {
        #[arg(long)]
        query: String,
        #[arg(long)]
        id: i32,
    },
    /// Print the document count and the ids in ascending order
    Stats,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let mut server = SearchServer::with_stop_words(&cli.stop_words).context("invalid stop words")?;
    let files = collect_inputs(Path::new(&cli.input));
    if files.is_empty() {
        tracing::warn!(input = %cli.input, "no input files found");
    }
    for file in &files {
        load_jsonl_file(&mut server, file).with_context(|| format!("loading {}", file.display()))?;
    }
    tracing::info!(documents = server.document_count(), files = files.len(), "documents loaded");

    match cli.command {
        Commands::Query { query, status, min_rating } => {
            let found = run_query(&server, &query, status, min_rating)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                for doc in &found {
                    println!("{doc}");
                }
            }
        }
        Commands::Match { query, id } => {
            let matched = server.match_document(&query, id)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&matched)?);
            } else {
                let words: Vec<&str> = matched.words.iter().map(String::as_str).collect();
                println!("{{ document_id = {id}, status = {}, words = {} }}", matched.status, words.join(" "));
            }
        }
        Commands::Stats => {
            let count = server.document_count();
            let ids = (0..count as i32).map(|i| server.document_id(i)).collect::<Result<Vec<_>, _>>()?;
            if cli.json {
                println!("{}", serde_json::json!({ "count": count, "ids": ids }));
            } else {
                println!("documents: {count}");
                for id in ids {
                    println!("{id}");
                }
            }
        }
    }
    Ok(())
}

fn run_query(
    server: &SearchServer,
    query: &str,
    status: Option<DocumentStatus>,
    min_rating: Option<i32>,
) -> Result<Vec<RankedDocument>> {
    let found = match (status, min_rating) {
        (None, None) => server.find_top_documents(query)?,
        (Some(status), None) => server.find_top_documents_by_status(query, status)?,
        (status, Some(min)) => server.find_top_documents_with(query, |_, doc_status, rating| {
            status.map_or(true, |s| s == doc_status) && rating >= min
        })?,
    };
    Ok(found)
}

fn collect_inputs(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable input entry");
                    continue;
                }
            };
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("jsonl") {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn query_and_id_are_flags() {
        let cli = Cli::try_parse_from([
            "searchctl", "--input", "docs", "match", "--query", "cat -city", "--id", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Match { query, id } => {
                assert_eq!(query, "cat -city");
                assert_eq!(id, 3);
            }
            _ => panic!("expected match subcommand"),
        }
        assert!(Cli::try_parse_from(["searchctl", "--input", "docs", "query", "cat"]).is_err());
    }

    #[test]
    fn collects_jsonl_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.jsonl"), "").unwrap();
        fs::write(dir.path().join("nested/b.jsonl"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let files = collect_inputs(dir.path());
        let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
        assert_eq!(names, vec!["a.jsonl", "b.jsonl"]);
        assert!(collect_inputs(&dir.path().join("missing")).is_empty());
    }
}
