use handsfree::buffer::Buffer;
use handsfree::config::{Config, DEFAULT_CONFIG_PATH};
use handsfree::dispatch;
use handsfree::report::StderrReporter;
use handsfree::session::{Ended, Session};
use handsfree::source::{ScriptSource, StdinSource, TranscriptSource};
use handsfree::state::StopSignal;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "handsfree", version, about = "Voice commands for hands-free code editing")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print session stats on exit
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interpret utterances from stdin, one per line (default)
    Listen(EditorArgs),
    /// Interpret a recorded script of utterances
    Replay {
        script: PathBuf,
        #[command(flatten)]
        editor: EditorArgs,
    },
    /// Show how a transcript would be dispatched, without running it
    Explain {
        #[arg(required = true)]
        transcript: Vec<String>,
    },
}

#[derive(Args, Default)]
struct EditorArgs {
    /// Edit this file instead of an empty buffer
    #[arg(long)]
    open: Option<PathBuf>,

    /// Write the buffer back to the opened file on exit
    #[arg(long, requires = "open")]
    save: bool,
}

#[hotpath::main]
fn main() -> Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::load(&cli.config)?;

    match cli.command.unwrap_or(Command::Listen(EditorArgs::default())) {
        Command::Explain { transcript } => {
            let explanation = dispatch::explain(&transcript.join(" "), &config.tables());
            print!("{}", explanation);
            Ok(())
        }
        Command::Listen(editor) => {
            let mut source = StdinSource::new();
            if let Some(silence) = config.listen.silence() {
                source = source.with_silence(silence);
            }
            eprintln!("Listening on stdin, one utterance per line. Say \"stop\" or press Ctrl+C to end.");
            run_session(&config, &mut source, &editor, cli.stats).await
        }
        Command::Replay { script, editor } => {
            let mut source = ScriptSource::from_file(&script).await?;
            eprintln!("Replaying {} utterances from {}", source.remaining(), script.display());
            run_session(&config, &mut source, &editor, cli.stats).await
        }
    }
}

async fn open_buffer(path: Option<&Path>) -> Result<Buffer> {
    let Some(path) = path else {
        return Ok(Buffer::default());
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    Ok(Buffer::from_text(&text).with_path(path))
}

async fn run_session(
    config: &Config,
    source: &mut dyn TranscriptSource,
    args: &EditorArgs,
    print_stats: bool,
) -> Result<()> {
    let mut buffer = open_buffer(args.open.as_deref()).await?;

    let stop = StopSignal::new();
    let handler = stop.clone();
    ctrlc::set_handler(move || {
        if handler.is_stopped() {
            // second Ctrl+C while waiting for input
            std::process::exit(130);
        }
        eprintln!("\n[STOPPING] finishing current utterance (Ctrl+C again to quit)");
        handler.stop();
    })?;

    let mut session = Session::new(config.tables())
        .with_fuzzy_stop(config.dictation.fuzzy_stop)
        .with_stop_signal(stop);
    let mut reporter = StderrReporter { echo: config.listen.echo };

    let ended = session.run(source, &mut buffer, &mut reporter).await;
    log::debug!("final state: {} ({:?})", session.state(), ended);

    match (&args.open, args.save) {
        (Some(path), true) => {
            tokio::fs::write(path, buffer.text())
                .await
                .with_context(|| format!("saving {}", path.display()))?;
            eprintln!("Saved {}", path.display());
        }
        (Some(_), false) => {}
        (None, _) => print!("{}", buffer.text()),
    }

    if print_stats {
        eprintln!("\n{}", session.stats().summary());
    }
    if ended == Ended::SourceFailed {
        anyhow::bail!("transcription source kept failing");
    }
    Ok(())
}
