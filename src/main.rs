use anyhow::{Result, bail};
use clap::Parser;
use nodedl::{DownloadOptions, DownloaderError, NodeFile, ReleaseClient};
use std::path::PathBuf;

/// nodedl - Node.js release downloader
///
/// Resolve release metadata, download platform artifacts and extract the
/// downloaded archives.
///
/// Examples:
///   nodedl download linux-x64 --version v11.0.0
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Release mirror URL (defaults to https://nodejs.org/download/release)
    #[arg(
        long = "base-url",
        env = "NODEDL_BASE_URL",
        value_name = "URL",
        global = true
    )]
    pub base_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show the metadata of one release
    Release(ReleaseArgs),

    /// Download one release artifact
    Download(DownloadArgs),

    /// Extract a downloaded archive into a sibling directory
    Extract(ExtractArgs),
}

#[derive(clap::Args, Debug)]
pub struct ReleaseArgs {
    /// The release tag, e.g. "v11.0.0"
    #[arg(value_name = "VERSION")]
    pub version: String,
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// The artifact kind, e.g. "linux-x64" or "headers"
    #[arg(value_name = "FILE")]
    pub file: NodeFile,

    /// Release tag (defaults to the local `node --version`)
    #[arg(long, short = 'v', value_name = "VERSION")]
    pub version: Option<String>,

    /// Destination directory (defaults to the current directory)
    #[arg(long, short = 'd', value_name = "PATH")]
    pub dest: Option<PathBuf>,

    /// Extract the archive after downloading it
    #[arg(long, short = 'x')]
    pub extract: bool,
}

#[derive(clap::Args, Debug)]
pub struct ExtractArgs {
    /// Path of a downloaded .tar.gz or .zip archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Release(args) => {
            let client = release_client(cli.base_url)?;
            show_release(&client, &args.version).await?
        }
        Commands::Download(args) => {
            let client = release_client(cli.base_url)?;
            let options = DownloadOptions {
                version: args.version,
                destination: args.dest,
            };
            let path = nodedl::download_node_file(&client, args.file, &options).await?;
            println!("{}", path.display());
            if args.extract {
                let dest = nodedl::extract(&path)?;
                println!("{}", dest.display());
            }
        }
        Commands::Extract(args) => {
            let dest = nodedl::extract(&args.archive)?;
            println!("{}", dest.display());
        }
    }
    Ok(())
}

fn release_client(base_url: Option<String>) -> Result<ReleaseClient> {
    match base_url {
        Some(url) => Ok(ReleaseClient::new(
            reqwest::Client::builder()
                .timeout(nodedl::DEFAULT_TIMEOUT)
                .build()?,
            Some(url),
        )),
        None => ReleaseClient::with_defaults(),
    }
}

async fn show_release(client: &ReleaseClient, version: &str) -> Result<()> {
    let Some(release) = client.release(version).await? else {
        bail!(DownloaderError::ReleaseNotFound(version.to_string()));
    };

    println!("version: {}", release.version);
    println!("name:    {}", release.name);
    println!("date:    {}", release.date);
    println!("lts:     {}", release.lts);
    if let Some(npm) = &release.npm {
        println!("npm:     {}", npm);
    }
    if let Some(v8) = &release.v8 {
        println!("v8:      {}", v8);
    }
    if let Some(uv) = &release.uv {
        println!("uv:      {}", uv);
    }
    if let Some(zlib) = &release.zlib {
        println!("zlib:    {}", zlib);
    }
    if let Some(openssl) = &release.openssl {
        println!("openssl: {}", openssl);
    }
    if let Some(modules) = release.modules {
        println!("modules: {}", modules);
    }
    let mut files: Vec<_> = release.files.iter().cloned().collect();
    files.sort();
    println!("files:   {}", files.join(", "));
    Ok(())
}
