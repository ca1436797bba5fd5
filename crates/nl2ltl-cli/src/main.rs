//! nl2ltl CLI
//!
//! Command-line interface for:
//! - Browsing the DECLARE template catalog and its LTLf/PPLTL lowering
//! - Explaining one instantiated template with its conflicts and subsumptions
//! - Translating recorded classifier/generator payloads offline
//! - Parsing and re-rendering formulas

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use nl2ltl::{
    conflicts, render_results, subsumes, translate, ClassifierEngine, Engine, FilterKind,
    GeneratorEngine, KindMatcher, SimilarityMatcher, Template, TemplateKind, TranslateConfig,
    WeightedTemplates,
};
use nl2ltl_logic::{parse_formula, Atom, Logic};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

mod recorded;

use recorded::{RecordedCompletion, RecordedPayload};

#[derive(Parser)]
#[command(name = "nl2ltl")]
#[command(
    author,
    version,
    about = "nl2ltl: natural-language intents to DECLARE templates, LTLf and PPLTL"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the template catalog.
    Templates {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Instantiate one template and show its lowering and relations.
    Explain {
        /// Template kind (misspellings are tolerated)
        kind: String,
        /// First operand
        a: String,
        /// Second operand (binary templates only)
        b: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Translate a recorded engine response.
    ///
    /// `classifier` expects a parse payload (JSON with `intent`, `entities`,
    /// `intent_ranking`); `generator` expects a completion with `PATTERN:`
    /// and `SYMBOLS:` lines.
    Translate {
        /// Input file (`-` for stdin)
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, value_enum)]
        format: PayloadFormat,
        /// Filter override (basic|greedy)
        #[arg(long)]
        filter: Option<FilterKind>,
        /// Translation config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Utterance to report alongside a generator completion
        #[arg(long, default_value = "")]
        utterance: String,
        #[arg(long)]
        json: bool,
    },

    /// Parse a formula and print its canonical form.
    Parse {
        formula: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PayloadFormat {
    Classifier,
    Generator,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Templates { json } => cmd_templates(json),
        Commands::Explain { kind, a, b, json } => cmd_explain(&kind, &a, b.as_deref(), json),
        Commands::Translate {
            input,
            format,
            filter,
            config,
            utterance,
            json,
        } => cmd_translate(&input, format, filter, config.as_deref(), &utterance, json),
        Commands::Parse { formula, json } => cmd_parse(&formula, json),
    }
}

// ============================================================================
// JSON views
// ============================================================================

#[derive(Serialize)]
struct CatalogEntry {
    name: &'static str,
    arity: usize,
    ltlf: String,
    ppltl: String,
    text: String,
}

#[derive(Serialize)]
struct Explanation {
    template: Template,
    display: String,
    ltlf: String,
    ppltl: String,
    text: String,
    conflicts: Vec<String>,
    subsumes: Vec<String>,
}

#[derive(Serialize)]
struct Candidate {
    template: Template,
    display: String,
    ltlf: String,
    ppltl: String,
    text: String,
    confidence: f64,
}

#[derive(Serialize)]
struct ParsedFormula {
    formula: String,
    logic: Logic,
    past_dual: String,
}

/// Instantiate `kind` over the placeholder atoms `a` and `b`.
fn placeholder(kind: TemplateKind) -> Result<Template> {
    let atoms = ["a", "b"]
        .into_iter()
        .take(kind.arity())
        .map(Atom::new)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Template::from_atoms(kind, atoms)?)
}

fn catalog() -> Result<Vec<CatalogEntry>> {
    TemplateKind::ALL
        .into_iter()
        .map(|kind| {
            let t = placeholder(kind)?;
            Ok(CatalogEntry {
                name: kind.name(),
                arity: kind.arity(),
                ltlf: t.to_future_logic().to_string(),
                ppltl: t.to_past_logic().to_string(),
                text: t.to_text(),
            })
        })
        .collect()
}

fn explain(template: &Template) -> Explanation {
    Explanation {
        template: template.clone(),
        display: template.to_string(),
        ltlf: template.to_future_logic().to_string(),
        ppltl: template.to_past_logic().to_string(),
        text: template.to_text(),
        conflicts: conflicts(template).iter().map(|t| t.to_string()).collect(),
        subsumes: subsumes(template).iter().map(|t| t.to_string()).collect(),
    }
}

fn candidates(result: &WeightedTemplates) -> Vec<Candidate> {
    result
        .iter()
        .map(|(template, &confidence)| Candidate {
            template: template.clone(),
            display: template.to_string(),
            ltlf: template.to_future_logic().to_string(),
            ppltl: template.to_past_logic().to_string(),
            text: template.to_text(),
            confidence,
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_templates(json: bool) -> Result<()> {
    let entries = catalog()?;
    if json {
        return print_json(&entries);
    }
    for entry in entries {
        println!("{} (arity {})", entry.name.green().bold(), entry.arity);
        println!("  LTLf:  {}", entry.ltlf);
        println!("  PPLTL: {}", entry.ppltl);
        println!("  {}", entry.text.dimmed());
    }
    Ok(())
}

fn cmd_explain(kind: &str, a: &str, b: Option<&str>, json: bool) -> Result<()> {
    let kind = SimilarityMatcher::default()
        .resolve(kind)
        .ok_or_else(|| anyhow!("no template kind matches `{kind}`"))?;
    let atoms = std::iter::once(a)
        .chain(b)
        .map(Atom::new)
        .collect::<Result<Vec<_>, _>>()
        .context("invalid operand")?;
    let template = Template::from_atoms(kind, atoms)?;
    let explanation = explain(&template);

    if json {
        return print_json(&explanation);
    }
    println!("{}", explanation.display.green().bold());
    println!("  LTLf:     {}", explanation.ltlf);
    println!("  PPLTL:    {}", explanation.ppltl);
    println!("  English:  {}", explanation.text);
    println!("  Conflicts: {}", list_or_none(&explanation.conflicts));
    println!("  Subsumes:  {}", list_or_none(&explanation.subsumes));
    Ok(())
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn cmd_translate(
    input: &Path,
    format: PayloadFormat,
    filter: Option<FilterKind>,
    config: Option<&Path>,
    utterance: &str,
    json: bool,
) -> Result<()> {
    let mut config = match config {
        Some(path) => TranslateConfig::from_path(path)?,
        None => TranslateConfig::default(),
    };
    if let Some(filter) = filter {
        config.filter = filter;
    }

    let text = read_input(input)?;
    let engine: Box<dyn Engine> = match format {
        PayloadFormat::Classifier => {
            let payload: serde_json::Value =
                serde_json::from_str(&text).context("classifier payload is not valid JSON")?;
            Box::new(ClassifierEngine::new(RecordedPayload(payload)).with_matcher(config.matcher()))
        }
        PayloadFormat::Generator => Box::new(
            GeneratorEngine::new(RecordedCompletion(text), "").with_matcher(config.matcher()),
        ),
    };

    let filter = config.filter.filter();
    tracing::info!(engine = engine.name(), filter = filter.name(), "translating recorded payload");
    let result = translate(utterance, engine.as_ref(), Some(filter.as_ref()))?;

    if json {
        return print_json(&candidates(&result));
    }
    if result.is_empty() {
        eprintln!("{} no template could be grounded", "info:".yellow().bold());
        return Ok(());
    }
    print!("{}", render_results(&result));
    Ok(())
}

fn cmd_parse(formula: &str, json: bool) -> Result<()> {
    let parsed = parse_formula(formula)?;
    let view = ParsedFormula {
        formula: parsed.to_string(),
        logic: parsed.logic(),
        past_dual: parsed.past_dual().to_string(),
    };
    if json {
        return print_json(&view);
    }
    println!("{}  [{}]", view.formula.bold(), view.logic);
    if view.logic == Logic::Future || view.logic == Logic::Mixed {
        println!("  past dual: {}", view.past_dual);
    }
    Ok(())
}
