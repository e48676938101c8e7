use handheld_shell::backlight::{Backlight, FileBacklight, NoBacklight, DEFAULT_MAX_DUTY};
use handheld_shell::config::{load_config, ConfigFile};
use handheld_shell::display::Display;
use handheld_shell::emu::ProcessEngine;
use handheld_shell::input::Buttons;
use handheld_shell::sdl::{SdlDisplay, SdlInput, SCREEN_H, SCREEN_W};
use handheld_shell::shell::{Shell, ShellOptions, ShellState, TerminalAction};
use handheld_shell::storage::FsStorage;
use handheld_shell::style::{load_style, UiColors};
use handheld_shell::{Result, ShellError};
use sdl2::event::Event;
use std::env;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);

type HostShell<'ttf> = Shell<SdlDisplay<'ttf>, FsStorage, ProcessEngine, Box<dyn Backlight>>;

// font path preference order: config.font_path -> FONT_PATH env -> common system fonts
fn find_font(config: &ConfigFile) -> Option<String> {
    config
        .font_path
        .clone()
        .or_else(|| env::var("FONT_PATH").ok())
        .or_else(|| {
            let candidates = [
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            ];
            candidates
                .iter()
                .find(|p| Path::new(p).exists())
                .map(|s| s.to_string())
        })
}

fn open_backlight(config: &ConfigFile) -> Box<dyn Backlight> {
    match config.backlight.as_ref() {
        Some(b) => Box::new(FileBacklight::new(&b.path, b.max_duty.unwrap_or(DEFAULT_MAX_DUTY))),
        None => Box::new(NoBacklight),
    }
}

fn boot<'ttf>(display: SdlDisplay<'ttf>, config: &ConfigFile, roms_dir: &Path, colors: &UiColors) -> HostShell<'ttf> {
    let options = ShellOptions {
        title: config.title().to_string(),
        extension: config.extension().to_string(),
        settings_record: config.settings_record().to_string(),
        colors: *colors,
    };
    let engine = ProcessEngine::new(config.emulator.clone().unwrap_or_default());
    let mut shell = Shell::new(
        display,
        FsStorage::new(roms_dir),
        engine,
        open_backlight(config),
        options,
    );
    shell.start(Instant::now());
    shell
}

// the previous banner is cleared first, Reset relaunches under it
fn draw_running(display: &mut impl Display, name: &str, colors: &UiColors) {
    display.clear(colors.screen);
    display.draw_text(name, 10, 10, colors.text);
    display.draw_text("Running. Press pause for the menu.", 10, 30, colors.disabled);
    display.present();
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let roms_arg = env::args().nth(1);
    let config = load_config();
    let colors = load_style();

    // CLI arg wins over config.default_roms_path
    let roms_dir = roms_arg
        .or_else(|| config.default_roms_path.clone())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./roms"));

    let sdl_ctx = sdl2::init().map_err(ShellError::Sdl)?;
    // keep receiving controller input while the emulator window has focus
    sdl2::hint::set("SDL_JOYSTICK_ALLOW_BACKGROUND_EVENTS", "1");
    let video = sdl_ctx.video().map_err(ShellError::Sdl)?;
    let controller_subsystem = sdl_ctx.game_controller().map_err(ShellError::Sdl)?;

    let scale = config.scale.unwrap_or(3).max(1);
    let window = video
        .window(config.title(), SCREEN_W * scale, SCREEN_H * scale)
        .position_centered()
        .build()
        .map_err(|e| ShellError::Sdl(e.to_string()))?;
    let canvas = window
        .into_canvas()
        .present_vsync()
        .build()
        .map_err(|e| ShellError::Sdl(e.to_string()))?;

    let ttf_ctx = sdl2::ttf::init().map_err(|e| ShellError::Font(e.to_string()))?;
    let font_path = find_font(&config).ok_or_else(|| {
        ShellError::Font("no TTF font found; set font_path in config or FONT_PATH".to_string())
    })?;
    let font = ttf_ctx
        .load_font(&font_path, config.font_size.unwrap_or(10))
        .map_err(ShellError::Font)?;
    log::info!("Using font {}", font_path);

    // pads present at startup arrive as ControllerDeviceAdded events too
    let mut input = SdlInput::new(config.controller_map.as_ref());

    let mut events = sdl_ctx.event_pump().map_err(ShellError::Sdl)?;
    let display = SdlDisplay::new(canvas, font)?;
    let mut shell = boot(display, &config, &roms_dir, &colors);

    loop {
        let now = Instant::now();
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => return Ok(()),
                Event::ControllerDeviceAdded { which, .. } => match controller_subsystem.open(which) {
                    Ok(gc) => input.attach(gc),
                    Err(e) => log::warn!("Failed opening controller {}: {}", which, e),
                },
                Event::ControllerDeviceRemoved { which, .. } => input.detach(which),
                _ => {}
            }
            input.handle_event(&event);
            if input.is_pause(&event) {
                shell.pause(now);
            }
        }

        let restart = match shell.state() {
            ShellState::Running => {
                let exited = shell.engine_mut().has_exited();
                if exited {
                    log::info!("Emulator exited, returning to the browser");
                }
                exited
            }
            _ => match shell.tick(Buttons::sample(&input), now) {
                Some(TerminalAction::Restart) => true,
                Some(TerminalAction::Launched) | Some(TerminalAction::Resumed) => {
                    let name = shell
                        .engine()
                        .cartridge()
                        .map(|c| c.name())
                        .unwrap_or_default();
                    draw_running(shell.display_mut(), &name, &colors);
                    false
                }
                None => false,
            },
        };

        if restart {
            let (display, _, mut engine, _) = shell.into_parts();
            engine.stop();
            shell = boot(display, &config, &roms_dir, &colors);
        }

        std::thread::sleep(FRAME);
    }
}
