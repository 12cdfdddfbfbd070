use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use bannerkit::readme::{API_BASE_URL, DEFAULT_MONTHS};
use bannerkit::{
    Canvas, DEFAULT_STILL_T, GitHubClient, IterateOpts, Mode, ParamsSource, Preset, Quality,
    ReadmeJob, RenderJob,
};

#[derive(Parser, Debug)]
#[command(name = "bannerkit", version, about = "Profile banner and README generator")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a still, a contact sheet or the looping GIF (GIF requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render the built-in variants, write a comparison gallery and promote the best one.
    Iterate(IterateArgs),
    /// Regenerate the profile README from the GitHub API.
    Readme(ReadmeArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Still,
    Sheet,
    Gif,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[arg(long, value_enum, default_value_t = ModeChoice::Gif)]
    mode: ModeChoice,

    /// Output path (`.png` for still and sheet, `.gif` for gif).
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = Canvas::BANNER.width)]
    width: u32,

    #[arg(long, default_value_t = Canvas::BANNER.height)]
    height: u32,

    /// Supersampling factor; frames are rendered at `scale` times the output size.
    #[arg(long, default_value_t = 2)]
    scale: u32,

    #[arg(long, default_value_t = 24)]
    fps: u32,

    /// Loop length in seconds.
    #[arg(long, default_value_t = 3.0)]
    seconds: f64,

    /// Normalized loop time for `--mode still`.
    #[arg(long, default_value_t = DEFAULT_STILL_T)]
    t: f64,

    /// Normalized loop times for `--mode sheet`.
    #[arg(long, value_delimiter = ',', default_values_t = [0.0, 0.25, 0.5, 0.75])]
    times: Vec<f64>,

    /// Contact sheet columns.
    #[arg(long, default_value_t = 2)]
    columns: u32,

    #[arg(long, value_enum, default_value_t = Quality::Final)]
    quality: Quality,

    /// Base preset when the params payload names none.
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Inline JSON params, merged over `--params-file`.
    #[arg(long)]
    params: Option<String>,

    #[arg(long)]
    params_file: Option<PathBuf>,

    /// Also write the resolved params beside the output.
    #[arg(long)]
    save_params: bool,

    /// Kill `ffmpeg` if it has not finished after this many seconds (0 waits forever).
    #[arg(long, env = "BANNERKIT_FFMPEG_TIMEOUT_SECS", default_value_t = 300)]
    timeout_secs: u64,

    /// Font used for the nameplate and HUD text.
    #[arg(long, env = "BANNERKIT_FONT")]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct IterateArgs {
    #[arg(long, default_value = "tmp/banner-iterate")]
    out_dir: PathBuf,

    /// Where the winning variant is rendered.
    #[arg(long, default_value = "assets/banner.gif")]
    banner: PathBuf,

    /// Skip promoting the winner to `--banner`.
    #[arg(long)]
    no_banner: bool,

    /// Only render stills for the gallery.
    #[arg(long)]
    no_preview_gifs: bool,

    #[arg(long, env = "BANNERKIT_FFMPEG_TIMEOUT_SECS", default_value_t = 300)]
    timeout_secs: u64,

    #[arg(long, env = "BANNERKIT_FONT")]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ReadmeArgs {
    /// GitHub user whose repositories are listed.
    #[arg(long)]
    owner: String,

    #[arg(long, default_value = "README.template.md")]
    template: PathBuf,

    #[arg(long, default_value = "README.md")]
    out: PathBuf,

    /// Optional curated content; ignored when missing.
    #[arg(long, default_value = "README.overrides.json")]
    overrides: PathBuf,

    /// Repos pushed within this many months are listed as active.
    #[arg(long, default_value_t = DEFAULT_MONTHS)]
    months: u32,

    #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL)]
    api_url: String,

    /// API token; falls back to `GH_TOKEN`.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let res = match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Iterate(args) => cmd_iterate(args),
        Command::Readme(args) => cmd_readme(args),
    };
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let canvas = Canvas::new(args.width, args.height)?;
    let source = ParamsSource {
        file: args.params_file,
        inline: args.params,
    };
    let params = bannerkit::resolve_source(args.preset, &source).context("resolve scene params")?;

    let mode = match args.mode {
        ModeChoice::Still => Mode::Still { t: args.t },
        ModeChoice::Sheet => Mode::Sheet {
            times: args.times,
            columns: args.columns,
        },
        ModeChoice::Gif => Mode::Gif,
    };

    let mut job = RenderJob::new(mode, args.out, params);
    job.canvas = canvas;
    job.scale = args.scale;
    job.fps = args.fps;
    job.seconds = args.seconds;
    job.quality = args.quality;
    job.timeout = Duration::from_secs(args.timeout_secs);
    job.save_params = args.save_params;
    job.font = args.font;

    let report = bannerkit::run(&job).with_context(|| format!("render {}", job.out.display()))?;
    eprintln!("wrote {} ({} frames)", report.out.display(), report.frames);
    if let Some(p) = report.params_path {
        eprintln!("wrote {}", p.display());
    }
    Ok(())
}

fn cmd_iterate(args: IterateArgs) -> anyhow::Result<()> {
    let opts = IterateOpts {
        out_dir: args.out_dir,
        banner: (!args.no_banner).then_some(args.banner),
        preview_gifs: !args.no_preview_gifs,
        timeout: Duration::from_secs(args.timeout_secs),
        font: args.font,
        ..IterateOpts::default()
    };
    let report = bannerkit::run_iterate(&opts).context("iterate banner variants")?;
    eprintln!("best: {}", report.best);
    eprintln!("wrote {}", report.gallery.display());
    if let Some(banner) = report.banner {
        eprintln!("wrote {}", banner.display());
    }
    Ok(())
}

fn cmd_readme(args: ReadmeArgs) -> anyhow::Result<()> {
    let token = args
        .token
        .filter(|t| !t.trim().is_empty())
        .or_else(|| std::env::var("GH_TOKEN").ok());
    let client = GitHubClient::new(args.api_url, token.as_deref()).context("build GitHub client")?;

    let job = ReadmeJob {
        owner: args.owner,
        template: args.template,
        out: args.out,
        overrides: Some(args.overrides),
        months: args.months,
    };
    let report = bannerkit::update_readme(&job, &client, chrono::Utc::now())
        .with_context(|| format!("update {}", job.out.display()))?;
    eprintln!("wrote {} ({} repos fetched)", report.out.display(), report.fetched);
    Ok(())
}
