//! `pyglot extract`: scan, extract in parallel, write the requested format.

use std::{
    env,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use colored::Colorize;
use rayon::prelude::*;
use tracing::debug;

use super::super::{
    args::{ExtractArgs, OutputFormat},
    exit_status::ExitStatus,
    report::{SUCCESS_MARK, print_summary_to, report_to},
};
use crate::{
    catalog::{Catalog, write_json, write_pot},
    config::{Config, ConfigLoadResult, load_config},
    core::{
        collect::CommentTag,
        data::Message,
        extract::{ExtractOptions, PythonExtractor},
        file_scanner::scan_files,
    },
};

pub fn extract(args: ExtractArgs) -> Result<ExitStatus> {
    let cwd = env::current_dir().context("Failed to read current directory.")?;
    let ConfigLoadResult { config, from_file } = load_config(&cwd)?;
    debug!(from_file, "configuration loaded");

    let options = extract_options(&config, &args);
    let extractor = PythonExtractor::new(&options).context("Invalid keyword specification.")?;

    let includes = if args.paths.is_empty() {
        &config.includes
    } else {
        &args.paths
    };
    let scan = scan_files(Path::new("."), includes, &config.ignores);
    let files: Vec<&String> = scan.files.iter().collect();

    // The reported error is the first one in path order.
    let results: Vec<Result<Vec<Message>>> = files
        .par_iter()
        .map(|file| extract_file(&extractor, file, args.lineno))
        .collect();
    let mut messages = Vec::new();
    for result in results {
        messages.extend(result?);
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_output(args.format, &messages, files.len(), &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} {}",
                SUCCESS_MARK.green(),
                format!(
                    "Wrote {} {} to {}",
                    messages.len(),
                    if messages.len() == 1 { "message" } else { "messages" },
                    path.display()
                )
                .green()
            );
        }
        None => write_output(args.format, &messages, files.len(), &mut io::stdout().lock())?,
    }

    Ok(ExitStatus::Success)
}

/// Merge config file values with command-line overrides.
fn extract_options(config: &Config, args: &ExtractArgs) -> ExtractOptions {
    let comment_tag = if args.add_comments {
        CommentTag::All
    } else {
        match &args.comment_tag {
            Some(tag) if tag.is_empty() => CommentTag::All,
            Some(tag) => CommentTag::Tagged(tag.clone()),
            None => config.comment_tag(),
        }
    };

    ExtractOptions {
        keywords: config
            .keywords
            .iter()
            .chain(&args.keywords)
            .cloned()
            .collect(),
        comment_tag,
        domain: args.domain.clone().or_else(|| config.domain.clone()),
        default_domain: args
            .default_domain
            .clone()
            .or_else(|| config.default_domain.clone()),
    }
}

fn extract_file(extractor: &PythonExtractor, file: &str, lineno: usize) -> Result<Vec<Message>> {
    let source = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))?;
    let messages = extractor.extract_all(file, &source, lineno)?;
    debug!(file, messages = messages.len(), "extracted");
    Ok(messages)
}

fn write_output<W: Write>(
    format: OutputFormat,
    messages: &[Message],
    file_count: usize,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            report_to(messages, writer)?;
            print_summary_to(messages.len(), file_count, writer)?;
        }
        OutputFormat::Json => write_json(messages, writer)?,
        OutputFormat::Pot => {
            let catalog: Catalog = messages.iter().cloned().collect();
            write_pot(&catalog, writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use crate::cli::args::{Arguments, Command};
    use crate::cli::commands::extract::*;
    use crate::config::CommentTagSetting;

    fn parse(args: &[&str]) -> ExtractArgs {
        let args = Arguments::try_parse_from(std::iter::once("pyglot").chain(args.iter().copied()))
            .unwrap();
        match args.command {
            Some(Command::Extract(extract)) => extract,
            other => panic!("expected extract, got {:?}", other),
        }
    }

    #[test]
    fn test_config_values_are_used() {
        let config = Config {
            keywords: vec!["lazy_gettext".to_string()],
            comment_tag: CommentTagSetting::Tag("I18N:".to_string()),
            domain: Some("django".to_string()),
            ..Default::default()
        };
        let options = extract_options(&config, &parse(&["extract"]));

        assert_eq!(options.keywords, vec!["lazy_gettext"]);
        assert_eq!(options.comment_tag, CommentTag::Tagged("I18N:".to_string()));
        assert_eq!(options.domain.as_deref(), Some("django"));
        assert_eq!(options.default_domain, None);
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = Config {
            keywords: vec!["lazy_gettext".to_string()],
            comment_tag: CommentTagSetting::Tag("I18N:".to_string()),
            domain: Some("django".to_string()),
            ..Default::default()
        };
        let args = parse(&[
            "extract", "-k", "tr:2", "--add-comments", "--domain", "admin", "--default-domain",
            "admin",
        ]);
        let options = extract_options(&config, &args);

        assert_eq!(options.keywords, vec!["lazy_gettext", "tr:2"]);
        assert_eq!(options.comment_tag, CommentTag::All);
        assert_eq!(options.domain.as_deref(), Some("admin"));
        assert_eq!(options.default_domain.as_deref(), Some("admin"));
    }

    #[test]
    fn test_comment_tag_flag() {
        let options = extract_options(
            &Config::default(),
            &parse(&["extract", "--comment-tag", "NOTE"]),
        );
        assert_eq!(options.comment_tag, CommentTag::Tagged("NOTE".to_string()));
    }
}
