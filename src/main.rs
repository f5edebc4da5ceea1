use clap::{Parser, Subcommand};
use newsdeck::config::{self, ViewerConfig};
use newsdeck::data::{self, Newsletter};
use newsdeck::filter::{self, ViewMode};
use newsdeck::input::Key;
use newsdeck::persist::{FileStore, MemoryStore, ViewStore};
use newsdeck::render::Recorder;
use newsdeck::tags::TagIndex;
use newsdeck::viewer::Viewer;
use newsdeck::{output, slides};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "newsdeck")]
#[command(about = "Slide viewer for weekly newsletters")]
#[command(long_about = "\
Slide viewer for weekly newsletters

A newsletter document lists sections; sections hold posts and bundles of
posts; every asset of a post becomes one slide. The reader moves with the
arrow keys: left/right through slides, up/down between sections.

Document structure:

  newsletter:
    title: Weekly AI Digest
    new_tags: [Agents]
    sections:
      - name: News
        items:
          - id: 101                       # plain post
            url: https://example.com/101
            assets:
              - {type: image, source: assets/a.png, tags: [LLM, highlight]}
          - items:                        # bundle of posts
              - id: 102
                assets:
                  - {type: video, source: assets/c.mp4, tags: [Vision]}

Keys in a play script:
  ArrowRight ArrowLeft ArrowDown ArrowUp (or right left down up)
  m (mode)  f (tag panel)  h (onboarding)  Escape (or esc)
  tag:NAME toggles a tag, wait:MS lets time pass

Run 'newsdeck gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Newsletter document (overrides `data` in the config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Viewer config file (stock defaults when absent)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Log debug detail to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the flattened slide deck
    Slides {
        /// Apply a view mode before listing
        #[arg(long, default_value = "all")]
        mode: ViewMode,
        /// Comma-separated tags selected for personalized mode
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// List every tag with its slide count
    Tags,
    /// Validate the config and newsletter without opening a session
    Check,
    /// Run a headless viewing session from a key script
    Play {
        /// Comma-separated keys, e.g. "right,right,down,m"
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,
        /// Start position as `section/n`
        #[arg(long)]
        location: Option<String>,
        /// JSON file holding the persisted view state (memory only when absent)
        #[arg(long)]
        state: Option<PathBuf>,
        /// Milliseconds that pass after each key
        #[arg(long, default_value_t = 500)]
        step_ms: u64,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "newsdeck=debug" } else { "newsdeck=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(cli: &Cli) -> Result<(ViewerConfig, Newsletter), Box<dyn std::error::Error>> {
    let config = config::load_config(&cli.config)?;
    let path = cli.data.clone().unwrap_or_else(|| PathBuf::from(&config.data));
    let newsletter = data::load_newsletter(&path)?;
    Ok((config, newsletter))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Slides { mode, tags } => {
            let (config, newsletter) = load(&cli)?;
            let all = slides::build(&newsletter, &config);
            let selected: BTreeSet<String> = tags.iter().map(|t| t.to_lowercase()).collect();
            output::print_slides(&filter::apply(&all, *mode, &selected));
        }
        Command::Tags => {
            let (config, newsletter) = load(&cli)?;
            let all = slides::build(&newsletter, &config);
            let index = TagIndex::build(&all, &newsletter.new_tags);
            output::print_tags(&index, &all);
        }
        Command::Check => {
            let (config, newsletter) = load(&cli)?;
            let all = slides::build(&newsletter, &config);
            let index = TagIndex::build(&all, &newsletter.new_tags);
            output::print_summary(newsletter.title.as_deref(), &all, &index);
            println!("==> Config and newsletter OK");
        }
        Command::Play {
            keys,
            location,
            state,
            step_ms,
        } => {
            let (config, newsletter) = load(&cli)?;
            let script = parse_script(keys)?;
            let location = location.as_deref();
            match state {
                Some(path) => {
                    let store = FileStore::open_or_reset(path)?;
                    play(&newsletter, config, store, location, &script, *step_ms)?;
                }
                None => {
                    play(&newsletter, config, MemoryStore::new(), location, &script, *step_ms)?;
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

// ============================================================================
// play
// ============================================================================

enum Step {
    Key(String, Key),
    Tag(String),
    Wait(u64),
}

fn parse_script(tokens: &[String]) -> Result<Vec<Step>, String> {
    tokens
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|token| {
            if let Some(tag) = token.strip_prefix("tag:") {
                return Ok(Step::Tag(tag.to_string()));
            }
            if let Some(ms) = token.strip_prefix("wait:") {
                return ms
                    .parse()
                    .map(Step::Wait)
                    .map_err(|_| format!("bad wait duration: {ms}"));
            }
            token.parse().map(|key| Step::Key(token.to_string(), key))
        })
        .collect()
}

fn play<S: ViewStore>(
    newsletter: &Newsletter,
    config: ViewerConfig,
    store: S,
    location: Option<&str>,
    script: &[Step],
    step_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut viewer = Viewer::open(newsletter, config, Recorder::new(), store, location)?;
    if let Some(title) = viewer.title() {
        println!("{}", title);
    }
    println!(
        "start       {}  {} slides  mode {}",
        viewer.location().unwrap_or_default(),
        viewer.visible_slides().len(),
        viewer.mode()
    );
    print_events(&mut viewer);

    for step in script {
        match step {
            Step::Key(name, key) => {
                let transition = viewer.handle_key(*key);
                let location = viewer.location();
                println!(
                    "{}",
                    output::format_step(name, transition.as_ref(), location.as_deref())
                );
            }
            Step::Tag(tag) => {
                let on = viewer.toggle_tag(tag);
                println!("tag:{:<7} {}", tag, if on { "selected" } else { "cleared" });
            }
            Step::Wait(ms) => {
                let now = viewer.now_ms() + ms;
                viewer.advance(now);
            }
        }
        print_events(&mut viewer);
        let now = viewer.now_ms() + step_ms;
        viewer.advance(now);
    }

    println!(
        "end         {}  {} slides  mode {}",
        viewer.location().unwrap_or_default(),
        viewer.visible_slides().len(),
        viewer.mode()
    );
    Ok(())
}

fn print_events<S: ViewStore>(viewer: &mut Viewer<Recorder, S>) {
    let events = viewer.renderer_mut().take();
    for line in output::format_render_events(&events) {
        println!("{}", line);
    }
}
