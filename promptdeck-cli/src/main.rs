mod config;

use crate::config::get_store;
use anyhow::{bail, Context, Result};
use arboard::Clipboard;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use promptdeck_core::assembler::truncate_for_delivery;
use promptdeck_core::editor::EditorState;
use promptdeck_core::template::PromptTemplate;
use promptdeck_core::token::TokenSelection;

#[derive(Parser, Debug)]
#[command(version,
display_name = "promptdeck",
bin_name = "promptdeck",
about = "Assemble AI generation prompts from reusable templates",
long_about = "Assemble AI generation prompts from reusable templates")]
struct Args {
    #[arg(short = 'p', long)]
    storage_path: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// List every token in the catalog
    Tokens,
    /// List every template
    Templates,
    /// Show a template's slots and derived format string
    Show {
        #[arg(short = 't', long)]
        template: String,
    },
    /// Assemble a prompt from a template and token=value selections
    Build {
        #[arg(short = 't', long)]
        template: String,
        #[arg(short = 's', long = "set", value_name = "TOKEN=VALUE")]
        set: Vec<String>,
        #[arg(long)]
        style: bool,
        #[arg(short = 'c', long)]
        copy: bool,
    },
    /// Preview a template with default values
    Preview {
        #[arg(short = 't', long)]
        template: String,
        #[arg(long)]
        style: bool,
    },
    /// Check that required tokens are selected
    Validate {
        #[arg(short = 't', long)]
        template: String,
        #[arg(short = 's', long = "set", value_name = "TOKEN=VALUE")]
        set: Vec<String>,
    },
    /// Discard the saved configuration and restore the built-in catalog
    Reset,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let (store, storage_key) = get_store(args.storage_path.clone());

    let mut state = EditorState::default();
    state.load_config(&store, &storage_key);
    if let Some(error) = &state.error {
        eprintln!("Warning: {error} (using built-in defaults)");
    }

    match &args.cmd {
        Commands::Tokens => {
            let assembler = state.assembler();
            for token in assembler.all_tokens() {
                println!(
                    "{:<16} {:<24} [{:?}/{:?}]",
                    token.id, token.label, token.category, token.inclusion_rule
                );
            }
        }
        Commands::Templates => {
            for template in &state.templates {
                println!(
                    "{:<28} {:<16} {:?} ({} slots)",
                    template.id,
                    template.name,
                    template.module_id,
                    template.slots.len()
                );
            }
        }
        Commands::Show { template } => {
            let template = find_template(&state, template)?;
            println!("{} ({:?})", template.name, template.module_id);
            println!("format: {}", template.format_string(&state.tokens));
            for slot in &template.slots {
                println!(
                    "  {:<16} prefix={:?} suffix={:?} conditional={:?}",
                    slot.token_id, slot.prefix, slot.suffix, slot.conditional_prefix
                );
            }
        }
        Commands::Build {
            template,
            set,
            style,
            copy,
        } => {
            let template = find_template(&state, template)?;
            let selections = parse_selections(set, &state)?;
            let assembler = state.assembler();
            let built = assembler.build_prompt(template, &selections, *style);

            for warning in &built.warnings {
                eprintln!("Warning: {warning}");
            }
            println!("{}", built.full);
            if let Some(motion) = &built.motion {
                println!(
                    "motion: {}",
                    assembler.build_motion_prompt(&built.base, Some(motion))
                );
            }
            if let Some(audio) = &built.audio {
                for (field, value) in [
                    ("dialog", &audio.dialog),
                    ("voiceover", &audio.voiceover),
                    ("ambient", &audio.ambient),
                    ("music", &audio.music),
                ] {
                    if let Some(value) = value {
                        println!("{field}: {value}");
                    }
                }
            }

            if *copy {
                let mut clipboard =
                    Clipboard::new().context("Failed to access clipboard")?;
                clipboard
                    .set_text(truncate_for_delivery(&built.full))
                    .context("Failed to copy prompt to clipboard")?;
                eprintln!("Copied to clipboard.");
            }
        }
        Commands::Preview { template, style } => {
            let template = find_template(&state, template)?;
            println!("{}", state.assembler().build_preview(template, *style));
        }
        Commands::Validate { template, set } => {
            let template = find_template(&state, template)?;
            let selections = parse_selections(set, &state)?;
            let report = state.assembler().validate_selections(template, &selections);
            if report.valid {
                println!("OK");
            } else {
                for error in &report.errors {
                    eprintln!("{error}");
                }
                std::process::exit(exitcode::DATAERR);
            }
        }
        Commands::Reset => {
            state.reset_to_defaults(&store, &storage_key);
            match &state.error {
                Some(error) => bail!("Failed to reset configuration: {error}"),
                None => println!("Configuration reset to defaults."),
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Args::command();
            clap_complete::generate(*shell, &mut cmd, "promptdeck", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn find_template<'a>(state: &'a EditorState, needle: &str) -> Result<&'a PromptTemplate> {
    state
        .templates
        .iter()
        .find(|t| t.id == needle || t.name == needle)
        .with_context(|| format!("Template not found: {needle}"))
}

fn parse_selections(set: &[String], state: &EditorState) -> Result<Vec<TokenSelection>> {
    let mut selections = Vec::new();
    for pair in set {
        let Some((token_id, value)) = pair.split_once('=') else {
            bail!("Invalid selection '{pair}', expected TOKEN=VALUE");
        };
        let selection = match state.token(token_id) {
            Some(token) if token.allow_custom && token.option(value).is_none() => {
                TokenSelection::custom(token_id, value)
            }
            _ => TokenSelection::new(token_id, value),
        };
        selections.push(selection);
    }
    Ok(selections)
}
