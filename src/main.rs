use std::{error::Error, fs, sync::mpsc, thread};

use clap::{Parser, Subcommand};
use eframe::{egui::ViewportBuilder, run_native};
use focus_clock::{
    checker,
    config::Config,
    session::{self, Session},
    sound::{Player, BUNDLED_CHIME, BUNDLED_CHIME_FILE},
    FocusClock,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Option<Command>,
    /// keep the window above all others
    #[clap(long)]
    always_on_top: bool,
    /// start a pomodoro as soon as the window opens
    #[clap(long)]
    pomodoro: bool,
}
#[derive(Subcommand)]
enum Command {
    /// write the default config and the bundled chime to disk
    Init {
        #[clap(long, short)]
        force: bool,
    },
}

fn init(force: bool) -> Result<(), Box<dyn Error>> {
    if Config::is_config_present() && !force {
        println!(
            "config already exists at {}, use --force to overwrite",
            Config::config_path()?.display()
        );
        return Ok(());
    }
    // write alarm sound (from assets folder) so it can be swapped out
    let sounds = Config::sounds_path()?;
    fs::create_dir_all(&sounds)?;
    let chime = sounds.join(BUNDLED_CHIME_FILE);
    fs::write(&chime, BUNDLED_CHIME)?;

    let mut config = Config::new();
    config.sound.path = Some(chime);
    let path = Config::config_path()?;
    config.save(path.clone())?;
    println!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // initilize the logger
    simple_file_logger::init_logger!("focus_clock")
        .map_err(|e| format!("couldn't initialize logger: {e:?}"))?;

    let args = Args::parse();
    if let Some(Command::Init { force }) = args.command {
        return init(force);
    }

    let mut config = Config::load_or_default();
    config.always_on_top |= args.always_on_top;

    let mut viewport = ViewportBuilder::default()
        .with_title("FocusClock")
        .with_inner_size([420.0, 420.0])
        .with_min_inner_size([400.0, 350.0]);
    if config.always_on_top {
        viewport = viewport.with_always_on_top();
    }
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let (tx, rx) = mpsc::channel();
    let sound_settings = config.sound.clone();
    // the output stream can't leave the thread that opened it
    thread::spawn(move || Player::new(sound_settings).run(&rx));

    let session = Session::new().shared();
    if args.pomodoro {
        session::lock(&session)
            .start_pomodoro(chrono::Local::now().naive_local(), config.pomodoro_minutes);
    }

    log::info!("starting FocusClock");
    // run the gui
    run_native(
        "FocusClock",
        native_options,
        Box::new(move |cc| {
            checker::spawn_checker(session.clone(), tx.clone(), cc.egui_ctx.clone());
            Ok(Box::new(FocusClock::new(config, session, tx)))
        }),
    )
    .map_err(Into::into)
}
