use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use palette_dither::{presets, Ditherer, Palette};
use vidither::api;
use vidither::models::AppConfig;
use vidither::server;
use vidither::services::{pipeline, Ffmpeg, VideoPipeline};

#[derive(Parser)]
#[command(name = "vidither")]
#[command(about = "Retro palette dithering for video")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Dither a video (or a single .png frame) directly to a file
    Dither {
        /// Input video, or a .png still image
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Preset palette name (run without arguments for the list)
        #[arg(short, long, conflicts_with = "colors")]
        preset: Option<String>,

        /// Custom palette as comma-separated hex colors (e.g. "#000000,#FFFFFF")
        #[arg(short, long)]
        colors: Option<String>,

        /// Error diffusion intensity (1.0 = full Floyd-Steinberg)
        #[arg(long, default_value_t = 1.0)]
        intensity: f32,

        /// Frame sampling rate for video input
        #[arg(long)]
        fps: Option<u32>,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidither API",
        description = "Retro palette dithering for video",
        version = "0.4.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_process,
        api::handle_download,
        api::handle_palettes,
    ),
    components(schemas(
        api::ProcessForm,
        api::ProcessResponse,
        api::ProcessedVideo,
        api::PaletteInfo,
    )),
    tags(
        (name = "Processing", description = "Video upload, dithering, and download"),
        (name = "Palettes", description = "Preset palette registry")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Dither {
            input,
            output,
            preset,
            colors,
            intensity,
            fps,
        }) => run_dither_command(&input, &output, preset, colors, intensity, fps).await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidither=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(AppConfig::load());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    // Frame extraction and reassembly run through the system ffmpeg; refuse
    // to start without it rather than failing on the first upload.
    let ffmpeg = Ffmpeg::new();
    ffmpeg
        .check_available()
        .await
        .map_err(|e| anyhow::anyhow!("ffmpeg check failed: {e}"))?;
    tracing::info!("ffmpeg is installed and accessible");

    tokio::fs::create_dir_all(&config.output_dir).await?;
    tokio::fs::create_dir_all(&config.work_dir).await?;
    tracing::info!(
        output_dir = %config.output_dir.display(),
        work_dir = %config.work_dir.display(),
        frame_rate = config.frame_rate,
        "Directories ready"
    );

    let state = server::create_app_state(config);

    // Build router: shared API routes plus production-only surfaces
    let app = server::build_router(state)
        // OpenAPI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Upload page
        .fallback_service(ServeDir::new("./static"));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Vidither server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Dither a single file without a server
async fn run_dither_command(
    input: &PathBuf,
    output: &PathBuf,
    preset: Option<String>,
    colors: Option<String>,
    intensity: f32,
    fps: Option<u32>,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidither=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let palette = resolve_cli_palette(preset.as_deref(), colors.as_deref())?;
    let ditherer = Ditherer::new(palette).intensity(intensity);

    let is_still_image = input
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);

    if is_still_image {
        pipeline::dither_image_file(input, output, &ditherer)
            .map_err(|e| anyhow::anyhow!("Dither error: {e}"))?;
    } else {
        let mut config = AppConfig::load();
        if let Some(fps) = fps {
            config.frame_rate = fps;
        }
        let config = Arc::new(config);

        let ffmpeg = Ffmpeg::new();
        ffmpeg
            .check_available()
            .await
            .map_err(|e| anyhow::anyhow!("ffmpeg check failed: {e}"))?;

        tokio::fs::create_dir_all(&config.work_dir).await?;
        let video_pipeline = VideoPipeline::new(config, ffmpeg);
        video_pipeline
            .process_video(input, output, Arc::new(ditherer))
            .await
            .map_err(|e| anyhow::anyhow!("Processing error: {e}"))?;
    }

    println!("Wrote {}", output.display());
    Ok(())
}

fn resolve_cli_palette(preset: Option<&str>, colors: Option<&str>) -> anyhow::Result<Palette> {
    match (preset, colors) {
        (Some(name), _) => presets::preset(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown preset: {name} (run `vidither` for the list)")),
        (None, Some(list)) => {
            Palette::parse_list(list).map_err(|e| anyhow::anyhow!("Invalid palette: {e}"))
        }
        (None, None) => anyhow::bail!("Either --preset or --colors is required"),
    }
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Read environment variables
    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let ffmpeg_path = std::env::var("FFMPEG_PATH").ok();

    // Header
    println!("Vidither v{VERSION}");
    println!("Retro palette dithering for video\n");

    // Environment variables section
    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  FFMPEG_PATH = {}",
        ffmpeg_path.as_deref().unwrap_or("ffmpeg (default)")
    );

    // Preset palettes section
    println!("\nPreset Palettes:");
    for name in presets::preset_names() {
        if let Some(palette) = presets::preset(name) {
            let colors: Vec<String> = palette.colors().iter().map(|c| c.to_string()).collect();
            println!("  {:<18} {}", name, colors.join(" "));
        }
    }

    // Commands section
    println!("\nCommands:");
    println!("  vidither serve     Start the HTTP server");
    println!("  vidither dither    Dither a video or image to a file");
    println!("\nRun 'vidither --help' for more details.");
}
