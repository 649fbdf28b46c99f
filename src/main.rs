use clap::Parser;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tunegrab::{
    AudioFormat, Config, DownloadClient, DownloadSession, MediaPreview, classify, resolve_preview,
    save,
};

#[derive(Parser)]
#[command(
    name = "tunegrab",
    about = "Download music through the tunegrab service",
    long_about = "Preview and download audio from YouTube and Spotify links, playlists,\n\
    or free-text search, via a tunegrab download server.\n\n\
    Examples:\n\
      tunegrab https://www.youtube.com/watch?v=dQw4w9WgXcQ    # Download a track\n\
      tunegrab \"lofi hip hop radio\"                           # Search, then download\n\
      tunegrab -i https://open.spotify.com/track/abc          # Show preview only\n\
      tunegrab -f m4a -d ./music https://youtu.be/xyz         # Format and directory\n\
      tunegrab --pick 2 \"never gonna give you up\"             # Take the 2nd search match"
)]
struct Args {
    /// Link or search phrase
    #[arg(help = "YouTube/Spotify link, playlist link, or free-text search")]
    input: String,

    /// Audio format to request (mp3, m4a, opus, wav)
    #[arg(short = 'f', long = "format", help = "Audio format to request (mp3, m4a, opus, wav)")]
    format: Option<String>,

    /// Download to specified directory
    #[arg(short = 'd', long = "dir", help = "Download to specified directory")]
    output_dir: Option<String>,

    /// Output filename
    #[arg(short = 'o', long = "output", help = "Output filename")]
    output_name: Option<String>,

    /// Show the preview only, no download
    #[arg(short = 'i', long = "info-only", help = "Show the preview only, no download")]
    info_only: bool,

    /// Pick the n-th search match instead of the best one (1-based)
    #[arg(long = "pick", help = "Pick the n-th search match instead of the best one (1-based)")]
    pick: Option<usize>,

    /// Bearer token for the download service (overrides TUNEGRAB_TOKEN)
    #[arg(long = "token", help = "Bearer token for the download service")]
    token: Option<String>,

    /// Search API key (overrides TUNEGRAB_YOUTUBE_API_KEY)
    #[arg(long = "api-key", help = "Search API key")]
    api_key: Option<String>,
}

fn parse_format(format_str: &str) -> Option<AudioFormat> {
    match format_str.to_lowercase().as_str() {
        "mp3" => Some(AudioFormat::Mp3),
        "m4a" => Some(AudioFormat::M4A),
        "opus" => Some(AudioFormat::Opus),
        "wav" => Some(AudioFormat::Wav),
        _ => {
            eprintln!("Warning: Unsupported format '{}', using mp3", format_str);
            None
        }
    }
}

fn display_preview(preview: &MediaPreview) {
    println!("{} — {}", preview.title, preview.author);
    println!("    Platform: {:?}", preview.platform);
    if preview.is_collection {
        match preview.item_count {
            Some(count) => println!("    Playlist with {} items", count),
            None => println!("    Playlist"),
        }
    }
    if !preview.artwork_url.is_empty() {
        println!("    Artwork: {}", preview.artwork_url);
    }

    if !preview.alternates.is_empty() {
        println!();
        println!("Matches:");
        for (index, alt) in preview.alternates.iter().enumerate() {
            println!("  [{}] {} — {}", index + 1, alt.title, alt.author);
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = Config::from_env();
    if let Some(token) = args.token.clone() {
        cfg = cfg.with_token(token);
    }
    if let Some(key) = args.api_key.clone() {
        cfg = cfg.with_api_key(key);
    }

    let Some(descriptor) = classify(&args.input) else {
        eprintln!("Error: not a recognized link or search phrase: {}", args.input);
        std::process::exit(1);
    };

    let mut preview = match resolve_preview(&cfg, &descriptor).await {
        Ok(preview) => preview,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    display_preview(&preview);

    if let Some(pick) = args.pick {
        match preview.alternates.get(pick.saturating_sub(1)) {
            Some(alt) => {
                let mut chosen = alt.clone();
                chosen.alternates = preview.alternates.clone();
                println!();
                println!("Picked [{}]: {} — {}", pick, chosen.title, chosen.author);
                preview = chosen;
            }
            None => {
                eprintln!("Error: --pick {} is out of range", pick);
                std::process::exit(1);
            }
        }
    }

    if args.info_only {
        return;
    }

    let format = args
        .format
        .as_deref()
        .and_then(parse_format)
        .unwrap_or_default();

    let mut session = DownloadSession::new();
    let client = DownloadClient::new(&cfg);

    // Echo the session's simulated progress while the request is in flight
    let progress = session.progress_handle();
    let echo = tokio::spawn(async move {
        let mut last = 0;
        loop {
            tokio::time::sleep(Duration::from_millis(300)).await;
            let now = progress.load(Ordering::Relaxed);
            if now != last {
                use std::io::Write;
                print!("\rDownloading... {}%", now);
                let _ = std::io::stdout().flush();
                last = now;
            }
            if now >= 100 {
                break;
            }
        }
    });

    println!();
    if let Err(e) = client.download(&preview, format, &mut session).await {
        echo.abort();
        println!();
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    echo.abort();
    println!();

    if let Some(name) = &args.output_name {
        // Keep the computed extension when the override has none
        let name = if Path::new(name).extension().is_some() {
            name.clone()
        } else {
            format!("{}{}", name, format.extension())
        };
        session.filename = Some(name);
    }

    let out_dir = args.output_dir.as_deref().unwrap_or(".");
    match save(&session, Path::new(out_dir)) {
        Ok(path) => println!("✓ Saved to: {}", path.display()),
        Err(e) => {
            eprintln!("✗ Error saving file: {}", e);
            std::process::exit(1);
        }
    }
}
