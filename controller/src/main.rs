// controller/src/main.rs

use std::{
    cell::{
        Ref,
        RefCell,
    },
    fs::File,
    io::BufReader,
    path::{
        Path,
        PathBuf,
    },
    rc::Rc,
    time::{
        Duration,
        Instant,
    },
};

use anyhow::Context;
use clap::Parser;
use enhancements::{
    Enhancement,
    FrameContext,
    TargetESP,
    TriggerBot,
};
use input::{
    LoggingPointer,
    PointerInput,
    UnsupportedPointer,
};
use overlay::{
    DisplaySurface,
    PrimitiveRenderer,
    RecordingSurface,
};
use scene::{
    SceneDescription,
    SimulatedScene,
    StateSceneHandle,
};
use settings::{
    load_app_settings,
    AppSettings,
};
use tokio::{
    runtime,
    time::MissedTickBehavior,
};
use utils_state::StateRegistry;
use view::ViewController;

mod enhancements;
mod input;
mod settings;
mod view;

#[cfg(test)]
mod testing;

const DEMO_SCENE: &str = include_str!("../resources/demo_scene.yaml");

pub struct UpdateContext<'a> {
    pub states: &'a StateRegistry,
    pub pointer: &'a dyn PointerInput,
    pub now: Instant,
}

pub struct Application {
    pub app_state: StateRegistry,
    pub renderer: PrimitiveRenderer,
    pub enhancements: Vec<Rc<RefCell<dyn Enhancement>>>,
}

impl Application {
    pub fn new(app_state: StateRegistry, renderer: PrimitiveRenderer) -> Self {
        Self {
            app_state,
            renderer,
            enhancements: vec![
                Rc::new(RefCell::new(TargetESP::new())),
                Rc::new(RefCell::new(TriggerBot::new())),
            ],
        }
    }

    pub fn settings(&self) -> anyhow::Result<Ref<'_, AppSettings>> {
        self.app_state.resolve::<AppSettings>(())
    }

    pub fn update(
        &mut self,
        resolution: [f32; 2],
        pointer: &dyn PointerInput,
        now: Instant,
    ) -> anyhow::Result<()> {
        self.app_state.invalidate_states();
        self.app_state
            .resolve_mut::<ViewController>(())
            .context("view controller")?
            .update_screen_bounds(mint::Vector2::from(resolution));

        let update_context = UpdateContext {
            states: &self.app_state,
            pointer,
            now,
        };

        for enhancement in self.enhancements.iter() {
            let mut enhancement = enhancement.borrow_mut();
            if let Err(err) = enhancement.update(&update_context) {
                log::error!("{:#}", err);
            }
        }

        Ok(())
    }

    pub fn render(&mut self, surface: &mut dyn DisplaySurface) {
        let mut frame = FrameContext {
            renderer: &self.renderer,
            surface,
        };

        for enhancement in self.enhancements.iter() {
            let mut enhancement = enhancement.borrow_mut();
            if let Err(err) = enhancement.render(&self.app_state, &mut frame) {
                log::error!("{:#}", err);
            }
        }
    }
}

fn load_scene(path: Option<&Path>) -> anyhow::Result<SimulatedScene> {
    let description: SceneDescription = match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open scene at {}", path.display()))?;
            serde_yaml::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse scene at {}", path.display()))?
        }
        None => serde_yaml::from_str(DEMO_SCENE).context("failed to parse demo scene")?,
    };

    Ok(SimulatedScene::from_description(&description))
}

fn main() {
    let args = match AppArgs::try_parse() {
        Ok(args) => args,
        Err(error) => error.exit(),
    };

    env_logger::builder()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let runtime = match runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            log::error!("Failed to create runtime: {}", error);
            std::process::exit(1);
        }
    };

    if let Err(error) = runtime.block_on(real_main(&args)) {
        log::error!("{:#}", error);
        std::process::exit(1);
    }
}

#[derive(Debug, Parser)]
#[clap(name = "overlay-controller", version)]
struct AppArgs {
    /// Enable trace logging
    #[clap(short, long)]
    verbose: bool,

    /// Settings file, defaults to the managed config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene description, defaults to the built in demo scene
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 300)]
    frames: u64,

    /// Treat synthesized pointer input as unsupported
    #[arg(long)]
    no_input: bool,

    #[arg(long, default_value_t = 1920.0)]
    width: f32,

    #[arg(long, default_value_t = 1080.0)]
    height: f32,
}

async fn real_main(args: &AppArgs) -> anyhow::Result<()> {
    log::info!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let settings = load_app_settings(args.config.as_deref())?;
    if let Ok(value) = serde_json::to_string(&settings) {
        log::debug!("Active settings: {}", value);
    }

    let scene = Rc::new(load_scene(args.scene.as_deref())?);
    let frame_time = Duration::from_secs_f64(1.0 / settings.target_frame_rate.max(1) as f64);
    let renderer = PrimitiveRenderer::new(settings.esp.text_style());

    let mut app_state = StateRegistry::new(1024);
    app_state.set(StateSceneHandle::new(scene.clone()), ())?;
    app_state.set(settings, ())?;

    let mut app = Application::new(app_state, renderer);
    let resolution = [args.width, args.height];
    let crosshair = Some([args.width / 2.0, args.height / 2.0]);
    let logging_pointer = LoggingPointer::new(crosshair);
    let unsupported_pointer = UnsupportedPointer {
        position: crosshair,
    };
    let pointer: &dyn PointerInput = if args.no_input {
        &unsupported_pointer
    } else {
        &logging_pointer
    };
    let mut surface = RecordingSurface::new(resolution);

    log::info!(
        "App initialized. Running {} frames at {:?} per frame.",
        args.frames,
        frame_time
    );

    let mut interval = tokio::time::interval(frame_time);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut update_fail_count = 0;
    let mut last_frame = Instant::now();
    for frame in 0..args.frames {
        interval.tick().await;

        let now = Instant::now();
        scene.advance(now.duration_since(last_frame).as_secs_f32());
        last_frame = now;

        if let Err(err) = app.update(resolution, pointer, now) {
            if update_fail_count >= 10 {
                log::error!("Over 10 errors occurred. Waiting 1s and try again.");
                log::error!("Last error: {:#}", err);
                tokio::time::sleep(Duration::from_millis(1000)).await;
                update_fail_count = 0;
            } else {
                update_fail_count += 1;
            }
            continue;
        }

        app.render(&mut surface);
        let commands = surface.take_commands();
        log::debug!("Frame {}: {} draw commands", frame, commands.len());
    }

    if app.settings()?.trigger_enabled {
        log::info!(
            "Finished. {} pointer presses, {} releases.",
            logging_pointer.presses(),
            logging_pointer.releases()
        );
    } else {
        log::info!("Finished.");
    }
    Ok(())
}
