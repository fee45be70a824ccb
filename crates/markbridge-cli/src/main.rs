//! markbridge CLI - convert between markdown and HTML.
//!
//! Provides commands for:
//! - `to-html`: Render markdown as sanitized HTML
//! - `to-markdown`: Serialize HTML back to markdown

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use markbridge::{Converter, Options};

/// Convert between a small markdown dialect and sanitized HTML.
#[derive(Parser)]
#[command(name = "markbridge", version, about)]
struct Cli {
    /// Enable debug logging (otherwise RUST_LOG applies)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown as HTML.
    ToHtml(ToHtmlArgs),
    /// Convert HTML to markdown.
    ToMarkdown(IoArgs),
}

#[derive(Args)]
struct IoArgs {
    /// Input file; reads stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Output file; writes stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ToHtmlArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Additional URL scheme to allow in links (repeatable)
    #[arg(long = "allow-scheme", value_name = "SCHEME")]
    allow_schemes: Vec<String>,

    /// Open rendered links in the same tab
    #[arg(long)]
    same_tab: bool,

    /// Label of the fallback link inside PDF embeds
    #[arg(long, value_name = "TEXT")]
    pdf_label: Option<String>,
}

impl ToHtmlArgs {
    fn options(&self) -> Options {
        let mut options = Options::default();
        options.allowed_schemes.extend(self.allow_schemes.iter().cloned());
        options.open_links_in_new_tab = !self.same_tab;
        if let Some(label) = &self.pdf_label {
            options.pdf_link_label = label.clone();
        }
        options
    }
}

impl IoArgs {
    fn read_input(&self) -> markbridge::Result<String> {
        match self.input.as_deref() {
            Some(path) if path.as_os_str() != "-" => Ok(fs::read_to_string(path)?),
            _ => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
        }
    }

    fn write_output(&self, content: &str) -> markbridge::Result<()> {
        match &self.output {
            Some(path) => fs::write(path, format!("{content}\n"))?,
            None => writeln!(io::stdout().lock(), "{content}")?,
        }
        Ok(())
    }
}

fn run(command: Commands) -> markbridge::Result<()> {
    match command {
        Commands::ToHtml(args) => {
            let converter = Converter::with_options(args.options())?;
            let markdown = args.io.read_input()?;
            tracing::debug!(bytes = markdown.len(), "Converting markdown to HTML");
            args.io.write_output(&converter.markdown_to_html(&markdown))
        }
        Commands::ToMarkdown(args) => {
            let converter = Converter::new();
            let html = args.read_input()?;
            tracing::debug!(bytes = html.len(), "Converting HTML to markdown");
            args.write_output(&converter.html_to_markdown(&html))
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_to_html_options() {
        let cli = Cli::parse_from([
            "markbridge",
            "to-html",
            "--allow-scheme",
            "tel",
            "--same-tab",
            "--pdf-label",
            "Download",
            "notes.md",
        ]);
        let Commands::ToHtml(args) = cli.command else {
            panic!("expected to-html");
        };
        let options = args.options();
        assert_eq!(options.allowed_schemes, vec!["http", "https", "mailto", "tel"]);
        assert!(!options.open_links_in_new_tab);
        assert_eq!(options.pdf_link_label, "Download");
        assert_eq!(args.io.input, Some(PathBuf::from("notes.md")));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let md_path = dir.path().join("in.md");
        let html_path = dir.path().join("out.html");
        fs::write(&md_path, "# Title\n\n- a\n- b\n").unwrap();

        run(Commands::ToHtml(ToHtmlArgs {
            io: IoArgs {
                input: Some(md_path.clone()),
                output: Some(html_path.clone()),
            },
            allow_schemes: Vec::new(),
            same_tab: false,
            pdf_label: None,
        }))
        .unwrap();
        assert_eq!(
            fs::read_to_string(&html_path).unwrap(),
            "<h1>Title</h1>\n<ul><li>a</li><li>b</li></ul>\n"
        );

        let back_path = dir.path().join("back.md");
        run(Commands::ToMarkdown(IoArgs {
            input: Some(html_path),
            output: Some(back_path.clone()),
        }))
        .unwrap();
        assert_eq!(fs::read_to_string(&back_path).unwrap(), "# Title\n\n- a\n- b\n");
    }

    #[test]
    fn test_invalid_scheme_is_rejected() {
        let args = ToHtmlArgs {
            io: IoArgs {
                input: None,
                output: None,
            },
            allow_schemes: vec!["javascript".to_string()],
            same_tab: false,
            pdf_label: None,
        };
        assert!(run(Commands::ToHtml(args)).is_err());
    }
}
