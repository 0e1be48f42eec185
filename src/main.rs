mod cli;

use visionary::{
    config,
    report::{render_table, LibraryFilter, LibraryRow},
    scanner::{Scanner, TracingReporter},
};
use visionary_av::{
    plan_remux, remux, tools, FfprobeProber, MediaFile, MediaStream, PlanOptions, Prober,
};
use visionary_common::{format_size, ExtensionSet};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "visionary=debug,visionary_av=debug,visionary_common=debug".to_string()
        } else {
            "visionary=info,visionary_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan {
            root,
            extensions,
            dolby_vision,
            atmos,
            json,
        } => {
            let filter = LibraryFilter {
                dolby_vision,
                atmos,
            };
            scan_library(
                root.as_deref(),
                &extensions,
                filter,
                json,
                cli.config.as_deref(),
            )
        }
        Commands::Probe { file, json } => probe_file(&file, json, cli.config.as_deref()),
        Commands::Extract {
            file,
            dry_run,
            output_dir,
            no_video,
            no_audio,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            if output_dir.is_some() {
                config.remux.output_dir = output_dir;
            }
            let mut options = config.remux.to_plan_options();
            options.extract_video &= !no_video;
            options.extract_audio &= !no_audio;
            extract_file(&file, &config, &options, dry_run)
        }
        Commands::CheckTools => check_tools(),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("visionary {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn build_prober(config: &config::Config) -> Result<FfprobeProber> {
    let path = tools::get_tool_path("ffprobe", config.tools.ffprobe_path.as_deref())?;
    Ok(FfprobeProber::new(path))
}

fn scan_library(
    root: Option<&Path>,
    extensions: &[String],
    filter: LibraryFilter,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let root: PathBuf = match root {
        Some(root) => root.to_path_buf(),
        None => config
            .library
            .root
            .clone()
            .context("No library root given and library.root is not configured")?,
    };

    if !root.is_dir() {
        anyhow::bail!("Library root does not exist: {:?}", root);
    }

    let extensions = if extensions.is_empty() {
        ExtensionSet::new(&config.library.extensions)?
    } else {
        ExtensionSet::new(extensions)?
    };

    let prober: Arc<dyn Prober> = Arc::new(build_prober(&config)?);
    let scanner = Scanner::new(prober, Arc::new(TracingReporter))
        .with_extensions(extensions)
        .with_policy(config.selection.to_policy())
        .with_parallel(config.scan.parallel);

    let summary = scanner.scan(&root)?;
    let listed = filter.apply(&summary.media_files);

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
    } else {
        let rows: Vec<LibraryRow> = listed.iter().map(|m| LibraryRow::from(*m)).collect();
        print!("{}", render_table(&rows));
        println!();
        println!(
            "{} files considered, {} listed, {} failed to probe",
            summary.considered,
            rows.len(),
            summary.failed.len()
        );
    }

    Ok(())
}

fn load_media(file: &Path, config: &config::Config) -> Result<MediaFile> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let prober = build_prober(config)?;
    let media = visionary_av::load_media_file_with(&prober, file, &config.selection.to_policy())
        .with_context(|| format!("Failed to probe {:?}", file))?;
    Ok(media)
}

fn describe_language(language: Option<&str>) -> String {
    language.map(|l| format!(" ({})", l)).unwrap_or_default()
}

fn probe_file(file: &Path, json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let media = load_media(file, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&media)?);
        return Ok(());
    }

    println!("File: {}", media.path().display());
    println!("Name: {}", media.name());
    println!("Extension: {}", media.extension());
    if let Some(size) = media.size() {
        println!("Size: {}", format_size(size));
    }
    println!("Streams: {}", media.stream_count());

    println!("\nVideo Streams: {}", media.video_streams().len());
    for video in media.video_streams() {
        print!(
            "  [{}] {}",
            video.index(),
            video.codec_name().unwrap_or("unknown")
        );
        if let Some(ref aspect) = video.aspect_ratio {
            print!(" {}", aspect);
        }
        print!("{}", describe_language(video.language()));
        if video.is_dolby_vision {
            match video.dv_profile {
                Some(profile) => print!(" [Dolby Vision P{}]", profile),
                None => print!(" [Dolby Vision]"),
            }
        }
        println!();
    }

    println!("\nAudio Streams: {}", media.audio_streams().len());
    for audio in media.audio_streams() {
        print!(
            "  [{}] {}",
            audio.index(),
            audio.codec_name().unwrap_or("unknown")
        );
        if let Some(channels) = audio.channels {
            print!(" {}ch", channels);
        }
        print!("{}", describe_language(audio.language()));
        if audio.is_atmos {
            print!(" [Atmos]");
        }
        println!();
    }

    println!("\nSubtitle Streams: {}", media.subtitle_streams().len());
    for subtitle in media.subtitle_streams() {
        println!(
            "  [{}] {}{}",
            subtitle.index(),
            subtitle.codec_name().unwrap_or("unknown"),
            describe_language(subtitle.language())
        );
    }

    println!();
    match media.best_video() {
        Some(video) => println!("Best video: stream {}", video.index()),
        None => println!("Best video: none"),
    }
    match media.best_audio() {
        Some(audio) => println!("Best audio: stream {}", audio.index()),
        None => println!("Best audio: none"),
    }

    Ok(())
}

fn extract_file(
    file: &Path,
    config: &config::Config,
    options: &PlanOptions,
    dry_run: bool,
) -> Result<()> {
    if !options.extract_video && !options.extract_audio {
        anyhow::bail!("Nothing to extract: both video and audio are disabled");
    }

    let media = load_media(file, config)?;
    let plan = plan_remux(&media, options);

    if plan.is_empty() {
        println!("No streams to extract from {:?}", file);
        return Ok(());
    }

    let ffmpeg = tools::get_tool_path("ffmpeg", config.tools.ffmpeg_path.as_deref())?;

    println!("Extraction plan for {}:", media.path().display());
    for directive in &plan.directives {
        let args = remux::ffmpeg_args(&plan, directive);
        println!("  {} {}", ffmpeg.display(), args.join(" "));
    }

    if dry_run {
        println!("\n[DRY RUN] Would run {} ffmpeg commands", plan.directives.len());
        return Ok(());
    }

    let outcomes = remux::execute_plan(&ffmpeg, &plan);
    let mut failed = 0;
    for outcome in &outcomes {
        match outcome.result {
            Ok(()) => println!("✓ {}", outcome.directive.output.display()),
            Err(ref e) => {
                failed += 1;
                tracing::error!(
                    "Failed to extract {} stream {}: {}",
                    outcome.directive.kind,
                    outcome.directive.stream_index,
                    e
                );
                println!("✗ {}", outcome.directive.output.display());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} extractions failed", failed, outcomes.len());
    }

    Ok(())
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");

    let tools = tools::check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to probe and extract streams.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    match config.library.root {
        Some(ref root) => println!("  Library root: {}", root.display()),
        None => println!("  Library root: (not set)"),
    }
    println!("  Extensions: {}", config.library.extensions.join(", "));
    println!(
        "  Preferred language: {}",
        config.selection.preferred_language
    );
    println!(
        "  Extract: video={} audio={}",
        config.remux.extract_video, config.remux.extract_audio
    );
    println!("  Parallel scan: {}", config.scan.parallel);

    Ok(())
}
