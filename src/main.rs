use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use bracket_terminal::prelude::*;
use clap::Parser;
use cursed_labyrinth::{
    audio::{CueSink, RecordingSink, TerminalBell},
    config::{Config, DEFAULT_CONFIG_PATH},
    error::AppError,
    input::command_for_key,
    render,
    scripted_input::{ScriptedInput, replay, summary},
    session::{GameSession, SessionOptions},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SCRIPT_SEED: u64 = 0x5eed;

#[derive(Parser, Debug)]
#[command(
    name = "cursed-labyrinth",
    version,
    about = "Walk four cursed labyrinths and break the Warden's curse"
)]
struct Cli {
    /// JSON config file; missing means defaults
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Seed for hostile movement and decorations
    #[arg(long)]
    seed: Option<u64>,

    /// Save file path
    #[arg(long)]
    save: Option<PathBuf>,

    /// Replay a key script headlessly and print the final state
    #[arg(long)]
    script: Option<PathBuf>,

    /// -v for debug, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(save) = &self.save {
            config.save_path = save.clone();
        }
    }
}

fn init_tracing(verbose: u8, log_file: Option<&Path>, headless: bool) -> Result<(), AppError> {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if headless => builder.with_writer(std::io::stderr).init(),
        None => {}
    }
    Ok(())
}

struct LabyrinthState {
    session: GameSession,
    bell: TerminalBell,
}

impl GameState for LabyrinthState {
    fn tick(&mut self, ctx: &mut BTerm) {
        self.handle_input(ctx);
        if self.session.quit_requested() {
            info!("quit");
            ctx.quit();
            return;
        }
        let elapsed = Duration::try_from_secs_f32(ctx.frame_time_ms / 1000.0).unwrap_or_default();
        self.session.advance(elapsed);
        for cue in self.session.drain_cues() {
            self.bell.play(cue);
        }
        render::draw_session(ctx, &self.session);
    }
}

impl LabyrinthState {
    fn handle_input(&mut self, ctx: &mut BTerm) {
        let Some(key) = ctx.key else {
            return;
        };
        if self.session.notice().is_some() {
            self.session.dismiss_notice();
            return;
        }
        if let Some(command) = command_for_key(self.session.phase(), key, self.session.has_save()) {
            self.session.apply(command);
        }
    }
}

fn run_script(config: &Config, path: &Path) -> Result<(), AppError> {
    let mut script = ScriptedInput::from_file(path)?;
    let mut session = GameSession::new(SessionOptions {
        seed: Some(config.seed.unwrap_or(SCRIPT_SEED)),
        ..SessionOptions::from(config)
    });
    let mut cues = RecordingSink::default();
    let keys = replay(&mut session, &mut script, &mut cues);
    info!(keys, cues = cues.played.len(), "script_finished");
    print!("{}", summary(&session));
    if !cues.played.is_empty() {
        println!("cues: {}", cues.played.join(" "));
    }
    Ok(())
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    cli.apply(&mut config);
    init_tracing(cli.verbose, config.log_file.as_deref(), cli.script.is_some())?;

    if let Some(path) = &cli.script {
        return run_script(&config, path);
    }

    let context = BTermBuilder::simple80x50()
        .with_title("The Cursed Labyrinth")
        .build()
        .map_err(|error| AppError::Terminal(error.to_string()))?;
    let state = LabyrinthState {
        session: GameSession::new(SessionOptions::from(&config)),
        bell: TerminalBell::new(config.bell),
    };
    info!(save = %config.save_path.display(), "terminal_started");
    main_loop(context, state).map_err(|error| AppError::Terminal(error.to_string()))
}
