use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::AsyncBufReadExt as _;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser, Debug)]
#[command(name = "mathviz", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the topics that have an animation.
    Topics(CommonArgs),
    /// Render one frame of a topic as a PNG.
    Frame(FrameArgs),
    /// Record a full topic animation to video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Interactive session: create animations and download their recordings.
    Studio(CommonArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Video container of recordings.
    #[arg(long, value_enum)]
    container: Option<ContainerChoice>,

    /// Frame pacing.
    #[arg(long, value_enum)]
    pacing: Option<mathviz::PacingMode>,

    /// Regular label font file.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Bold label font file.
    #[arg(long, requires = "font")]
    bold_font: Option<PathBuf>,

    /// Do not fall back to system fonts; labels without a font file are skipped.
    #[arg(long)]
    no_system_fonts: bool,

    /// Simulated explanation lookup latency in milliseconds.
    #[arg(long)]
    lookup_delay_ms: Option<u64>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Topic, e.g. "pythagoras" or "Unit Circle".
    #[arg(long)]
    topic: String,

    /// Number of updates before the drawn frame (clamped to the animation length).
    #[arg(long, default_value_t = 0)]
    step: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Topic, e.g. "slope".
    #[arg(long)]
    topic: String,

    /// Output directory; the file is named `<topic>-animation.<ext>`.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ContainerChoice {
    Webm,
    Mp4,
}

impl From<ContainerChoice> for mathviz::Container {
    fn from(c: ContainerChoice) -> Self {
        match c {
            ContainerChoice::Webm => mathviz::Container::Webm,
            ContainerChoice::Mp4 => mathviz::Container::Mp4,
        }
    }
}

impl CommonArgs {
    fn load_config(&self) -> anyhow::Result<mathviz::StudioConfig> {
        let mut cfg = match &self.config {
            Some(path) => mathviz::StudioConfig::from_path(path)?,
            None => mathviz::StudioConfig::default(),
        };
        if let Some(container) = self.container {
            cfg.container = container.into();
        }
        if let Some(pacing) = self.pacing {
            cfg.pacing = pacing;
        }
        if let Some(font) = &self.font {
            cfg.fonts.regular = Some(font.clone());
            cfg.fonts.bold = self.bold_font.clone();
        }
        if self.no_system_fonts {
            cfg.fonts.system = false;
        }
        if let Some(ms) = self.lookup_delay_ms {
            cfg.lookup_delay_ms = ms;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mathviz=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Topics(args) => cmd_topics(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args).await,
        Command::Studio(args) => cmd_studio(args).await,
    }
}

fn cmd_topics(args: CommonArgs) -> anyhow::Result<()> {
    let cfg = args.load_config()?;
    let catalog = cfg.catalog()?;
    let registry = mathviz::Registry::builtin();
    for key in registry.keys() {
        let title = mathviz::AnimationKey::normalize(key)
            .and_then(|k| catalog.get(&k).map(|e| e.title.clone()))
            .unwrap_or_default();
        println!("{key}\t{title}");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = args.common.load_config()?;
    let fonts = cfg.font_book()?;

    let key = mathviz::AnimationKey::normalize(&args.topic).context("topic must not be empty")?;
    let mut animation = mathviz::Registry::builtin()
        .resolve(&key)
        .with_context(|| format!("no animation for topic '{key}'"))?;
    animation.seek(args.step);

    let mut surface = mathviz::Surface::new(cfg.canvas);
    animation.update(&mut surface);

    let mut rasterizer = mathviz::CpuRasterizer::new(cfg.canvas, cfg.background, &fonts)?;
    let frame = rasterizer.render(&surface)?;
    mathviz::save_png(&frame, cfg.background, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = args.common.load_config()?;
    if args.common.pacing.is_none() {
        cfg.pacing = mathviz::PacingMode::Unpaced;
    }
    if let Some(dir) = args.out_dir {
        cfg.out_dir = dir;
    }

    let mut studio = open_studio(&cfg).await?;
    let created = studio.create(&args.topic).await?;
    eprintln!("{}: {}", created.explanation.title, created.explanation.body);

    studio
        .run_to_completion()
        .await?
        .context("animation ended without a recording")?;
    let path = studio.download(&downloader(&cfg))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

async fn cmd_studio(args: CommonArgs) -> anyhow::Result<()> {
    let cfg = args.load_config()?;
    let mut studio = open_studio(&cfg).await?;

    let (line_tx, mut lines) = tokio::sync::mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut stdin = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = stdin.next_line().await {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("commands: create <topic> | download [dir] | topics | state | quit");
    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                match ReplCommand::parse(&line) {
                    ReplCommand::Create(query) => match studio.create(&query).await {
                        Ok(created) => {
                            println!("{}\n{}", created.explanation.title, created.explanation.body);
                            println!("animating '{}' ({} frames)", created.key, created.frame_count);
                        }
                        Err(mathviz::CreateError::AnimationUnavailable { explanation }) => {
                            println!("{}\n{}", explanation.title, explanation.body);
                            println!("Sorry, an animation for this topic isn't available yet.");
                        }
                        Err(e) => println!("{e}"),
                    },
                    ReplCommand::Download(dir) => {
                        let target = match dir {
                            Some(dir) => mathviz::DirectoryDownloader::new(dir)
                                .with_overwrite(cfg.overwrite),
                            None => downloader(&cfg),
                        };
                        match studio.download(&target) {
                            Ok(path) => println!("wrote {}", path.display()),
                            Err(e) => println!("{e}"),
                        }
                    }
                    ReplCommand::Topics => {
                        println!("{}", studio.registry().keys().collect::<Vec<_>>().join(", "));
                    }
                    ReplCommand::State => println!("{:?}", studio.state()),
                    ReplCommand::Quit => break,
                    ReplCommand::Empty => {}
                    ReplCommand::Unknown(cmd) => println!("unknown command '{cmd}'"),
                }
            }
            _ = studio.wait_for_frame() => {
                match studio.step().await {
                    Ok(mathviz::StepOutcome::Finished(artifact)) => {
                        println!("ready: {} ({} bytes)", artifact.filename, artifact.data.len());
                    }
                    Ok(_) => {}
                    Err(e) => println!("recording failed: {e}"),
                }
            }
        }
    }

    studio.cancel();
    Ok(())
}

async fn open_studio(cfg: &mathviz::StudioConfig) -> anyhow::Result<mathviz::Studio> {
    if !mathviz::is_ffmpeg_on_path().await {
        anyhow::bail!("ffmpeg is required for recording, but was not found on PATH");
    }
    let fonts = cfg.font_book()?;
    if fonts.is_empty() {
        tracing::warn!("no label font available, text will not be drawn");
    }
    let capture = mathviz::FfmpegCapture::new(cfg.capture_config())?;
    Ok(mathviz::Studio::new(
        cfg,
        Arc::new(cfg.catalog()?),
        Arc::new(capture),
        &fonts,
    )?)
}

fn downloader(cfg: &mathviz::StudioConfig) -> mathviz::DirectoryDownloader {
    mathviz::DirectoryDownloader::new(&cfg.out_dir).with_overwrite(cfg.overwrite)
}

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Create(String),
    Download(Option<PathBuf>),
    Topics,
    State,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match cmd {
            "" => Self::Empty,
            "create" => Self::Create(rest.to_owned()),
            "download" => Self::Download((!rest.is_empty()).then(|| Path::new(rest).to_path_buf())),
            "topics" => Self::Topics,
            "state" => Self::State,
            "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_owned()),
        }
    }
}
