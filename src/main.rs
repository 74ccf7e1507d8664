//! shelfmatch CLI: batch filename matching, photo identification, and
//! barcode canonicalization against a catalog snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use shelfmatch::services::assets::FsAssetStore;
use shelfmatch::services::catalog::{CatalogSnapshot, ProductCatalog};
use shelfmatch::services::gtin;
use shelfmatch::services::photo::{self, PhotoMatchConfig};
use shelfmatch::services::resolver::{
    batch, CandidateIndex, ResolutionResult, Vocabulary,
};
use shelfmatch::services::vision::remote::{RemoteVisionClient, RemoteVisionConfig};

#[derive(Parser)]
#[command(name = "shelfmatch", version, about = "Product identity resolution for the grocery catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Match a directory of image files against the catalog and record assets.
    ScanImages {
        /// Directory containing image files to match.
        dir: PathBuf,
        /// Path to the catalog snapshot JSON.
        #[arg(long)]
        catalog: PathBuf,
        /// Asset store root directory.
        #[arg(long, default_value = "assets")]
        assets: PathBuf,
        /// Provenance source label recorded with created assets.
        #[arg(long, default_value = "filename-import")]
        source: String,
        /// Resolve only; do not write to the asset store.
        #[arg(long)]
        dry_run: bool,
    },
    /// Identify the product on a photo and print the match payload.
    Identify {
        /// Photo file (jpeg, png or webp).
        image: PathBuf,
        /// Path to the catalog snapshot JSON.
        #[arg(long)]
        catalog: PathBuf,
        /// Recognition engine endpoint; falls back to SHELFMATCH_VISION_URL.
        #[arg(long)]
        engine_url: Option<String>,
        /// Recognition engine API key; falls back to SHELFMATCH_VISION_KEY.
        #[arg(long)]
        engine_key: Option<String>,
    },
    /// Canonicalize and validate a scanned barcode.
    Gtin {
        /// Free-form digit string, separators allowed.
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::ScanImages {
            dir,
            catalog,
            assets,
            source,
            dry_run,
        } => scan_images(&dir, &catalog, &assets, source, dry_run),
        Command::Identify {
            image,
            catalog,
            engine_url,
            engine_key,
        } => identify(&image, &catalog, engine_url, engine_key).await,
        Command::Gtin { code } => canonicalize_gtin(&code),
    }
}

fn scan_images(
    dir: &Path,
    catalog_path: &Path,
    assets_root: &Path,
    source: String,
    dry_run: bool,
) -> Result<()> {
    let snapshot = CatalogSnapshot::from_file(catalog_path)
        .with_context(|| format!("loading catalog snapshot {catalog_path:?}"))?;
    let vocabulary = Vocabulary::default();
    let index = CandidateIndex::build(&snapshot, &vocabulary)?;
    let config = batch::BatchConfig {
        source,
        vocabulary,
        ..batch::BatchConfig::default()
    };

    if dry_run {
        let resolutions = batch::resolve_directory(dir, &index, &config);
        for item in &resolutions {
            println!("{} → {}", item.path.display(), describe(&item.resolution));
        }
        println!("{} files resolved (dry run, nothing written)", resolutions.len());
        return Ok(());
    }

    let store = FsAssetStore::new(assets_root);
    let report = batch::match_image_directory(dir, &index, &store, &config);
    for (path, outcome) in &report.outcomes {
        println!("{} → {}", path.display(), serde_json::to_string(outcome)?);
    }
    println!("{}", report.summary);
    Ok(())
}

fn describe(resolution: &ResolutionResult) -> String {
    match resolution {
        ResolutionResult::Resolved {
            product_id,
            display_name,
            score,
        } => format!("resolved: {display_name} (#{product_id}, score {score})"),
        ResolutionResult::Ambiguous { candidates } => {
            let names: Vec<String> = candidates
                .iter()
                .map(|c| format!("{} ({})", c.display_name, c.score))
                .collect();
            format!("ambiguous: {}", names.join(", "))
        }
        ResolutionResult::Unresolved { reason } => format!("unresolved: {reason}"),
    }
}

async fn identify(
    image: &Path,
    catalog_path: &Path,
    engine_url: Option<String>,
    engine_key: Option<String>,
) -> Result<()> {
    let engine_url = engine_url.or_else(|| std::env::var("SHELFMATCH_VISION_URL").ok());
    let engine_key = engine_key.or_else(|| std::env::var("SHELFMATCH_VISION_KEY").ok());
    let Some(engine_url) = engine_url else {
        bail!("no recognition engine configured; pass --engine-url or set SHELFMATCH_VISION_URL");
    };

    let snapshot = CatalogSnapshot::from_file(catalog_path)
        .with_context(|| format!("loading catalog snapshot {catalog_path:?}"))?;
    let products = snapshot.active_products()?;

    let bytes = std::fs::read(image).with_context(|| format!("reading photo {image:?}"))?;
    let content_type = content_type_for(image)?;

    let mut engine_config = RemoteVisionConfig::new(engine_url);
    if let Some(key) = engine_key {
        engine_config = engine_config.with_api_key(key);
    }
    let recognizer =
        Arc::new(RemoteVisionClient::new(engine_config).context("building recognition client")?);

    let payload = photo::identify_photo(
        bytes,
        content_type,
        products,
        recognizer,
        PhotoMatchConfig::default(),
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn content_type_for(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        other => bail!("unsupported photo extension: {other:?}"),
    }
}

fn canonicalize_gtin(code: &str) -> Result<()> {
    match gtin::canonicalize(code) {
        Ok(canonical) => {
            println!("{canonical}");
            Ok(())
        }
        Err(error) => bail!("{error}"),
    }
}
