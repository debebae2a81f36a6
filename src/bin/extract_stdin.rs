//! Simple CLI that reads HTML from stdin and outputs an article as JSON.
//!
//! Usage: `extract_stdin <config.json> [url]`
//! Falls back to the generic preset config when no config path is given.

use std::io::{self, Read};
use std::sync::Arc;

use article_extractor::{presets, Article, ParserConfig};

fn main() {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match ParserConfig::from_path(&path) {
            Ok(config) => Arc::new(config),
            Err(err) => {
                eprintln!("Failed to load config {path}: {err}");
                std::process::exit(1);
            }
        },
        None => presets::generic_config(),
    };
    let url = args.next();

    let mut html = String::new();
    if io::stdin().read_to_string(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    match Article::from_html(&html, &config, url.as_deref()) {
        Ok(mut article) => {
            article.chunk_by_char(2000, 200, true);
            println!("{}", serde_json::to_string_pretty(&article).unwrap_or_default());
        }
        Err(err) => {
            eprintln!("Extraction failed: {err}");
            std::process::exit(1);
        }
    }
}
