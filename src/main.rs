use anyhow::{Context as _, bail};
use clap::Parser;
use yamusic::{Context, Extractor, ExtractorInfo, Track, YandexConfig, YandexMusicExtractor};

#[derive(Parser)]
#[command(
    name = "yamusic",
    about = "Resolve Yandex Music links and searches into playable tracks",
    long_about = "Resolve Yandex Music track, album, playlist and artist links, or a free-text\n\
    search, into track metadata and stream URLs.\n\n\
    Examples:\n\
      yamusic https://music.yandex.ru/album/123/track/456       # Show track info\n\
      yamusic -s https://music.yandex.ru/album/123/track/456    # Also print stream URLs\n\
      yamusic -r https://music.yandex.ru/album/123/track/456    # Related tracks\n\
      yamusic --radio genre:rock                                 # Radio station tracks\n\
      yamusic --json \"never gonna give you up\"                  # Search, JSON output"
)]
struct Args {
    /// Link or search text
    #[arg(help = "Yandex Music link or free-text search", required_unless_present = "radio")]
    query: Option<String>,

    /// OAuth token for the Yandex Music API
    #[arg(short = 't', long = "token", env = "YANDEX_MUSIC_TOKEN")]
    token: Option<String>,

    /// JSON file with client options, takes precedence over --token
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Resolve and print stream URLs
    #[arg(short = 's', long = "stream")]
    stream: bool,

    /// Print tracks related to the first resolved track
    #[arg(short = 'r', long = "related")]
    related: bool,

    /// Play a radio station such as genre:rock
    #[arg(long = "radio")]
    radio: Option<String>,

    /// Continue a radio station after this track id
    #[arg(long = "queue", requires = "radio")]
    queue: Option<String>,

    /// Name recorded as the requester of resolved tracks
    #[arg(long = "requested-by")]
    requested_by: Option<String>,

    /// Print the result as JSON
    #[arg(long = "json")]
    json: bool,
}

fn load_options(args: &Args) -> anyhow::Result<Option<YandexConfig>> {
    if let Some(path) = &args.config {
        let config = YandexConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?;
        return Ok(Some(config));
    }
    Ok(args.token.as_ref().map(YandexConfig::new))
}

fn display_track(index: usize, track: &Track) {
    println!("[{}] {}", index + 1, track.title);
    println!("    Author: {}", track.author);
    println!("    Duration: {}", track.duration);
    println!("    URL: {}", track.url);
    if let Some(thumbnail) = &track.thumbnail {
        println!("    Thumbnail: {}", thumbnail);
    }
    if let Some(user) = &track.requested_by {
        println!("    Requested by: {}", user);
    }
}

fn display_info(info: &ExtractorInfo) {
    if let Some(playlist) = &info.playlist {
        println!("{} ({}) by {}", playlist.title, playlist.kind, playlist.author.name);
        if !playlist.description.is_empty() {
            println!("{}", playlist.description);
        }
        println!();
    }

    if info.tracks.is_empty() {
        println!("No tracks found.");
        return;
    }

    println!("Found {} track(s):", info.tracks.len());
    println!();
    for (index, track) in info.tracks.iter().enumerate() {
        display_track(index, track);
    }
}

fn print_info(info: &ExtractorInfo, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(info)?);
    } else {
        display_info(info);
    }
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut extractor = YandexMusicExtractor::new()?;
    extractor.activate(load_options(&args)?.as_ref())?;

    let info = if let Some(station) = &args.radio {
        extractor
            .radio_tracks(station, args.queue.as_deref())
            .await?
    } else {
        let Some(query) = &args.query else {
            bail!("Either a query or --radio is required");
        };
        let context = Context {
            requested_by: args.requested_by.clone(),
        };
        log::info!("Resolving: {}", query);
        extractor.handle(query, &context).await?
    };

    print_info(&info, args.json)?;

    if args.stream {
        println!();
        for (index, track) in info.tracks.iter().enumerate() {
            match extractor.stream(track).await {
                Ok(url) => println!("[{}] {}", index + 1, url),
                Err(e) => eprintln!("[{}] Failed to resolve stream: {}", index + 1, e),
            }
        }
    }

    if args.related
        && let Some(first) = info.tracks.first()
    {
        println!();
        let related = extractor.related_tracks(first).await?;
        print_info(&related, args.json)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
