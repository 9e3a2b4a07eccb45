use app_state::{AppSettings, load_app_settings};
use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_types::{AlbumId, AssetPreview, ItemId, MediaTypeFilter, asset_url, preview_for};
use curation::album_items::{CollectionSnapshot, OrderedCollectionController, Visibility};
use curation::gallery_client::GalleryClient;
use curation::media_library::{FetchStatus, MediaPicker};
use curation::slideshow::SlideshowController;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(version, about = "Curate gallery albums from the terminal", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the media library
    Library {
        #[clap(long, short)]
        query: Option<String>,
        /// all, image, video or pdf
        #[clap(long, short)]
        media_type: Option<MediaTypeFilter>,
    },
    /// List one page of an album
    Items {
        album: i64,
        #[clap(long, default_value_t = 0)]
        page: u32,
        #[clap(long)]
        size: Option<u32>,
        #[clap(long, default_value_t = false, action)]
        only_visible: bool,
    },
    /// Move an item onto the slot of another item
    Reorder {
        album: i64,
        dragged: i64,
        target: i64,
        #[clap(long, default_value_t = 0)]
        page: u32,
    },
    /// Remove an item from an album
    DeleteItem {
        album: i64,
        item: i64,
        #[clap(long, default_value_t = 0)]
        page: u32,
    },
    /// Play the visible images of an album
    Slideshow {
        album: i64,
        #[clap(long, default_value_t = 5)]
        steps: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let settings = load_app_settings()?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = Arc::new(GalleryClient::new(
        reqwest::Client::new(),
        &settings.api.base_url,
        settings.secrets.api_token.clone(),
    ));

    match Args::parse().command {
        Command::Library { query, media_type } => {
            library(client, &settings, query, media_type).await
        }
        Command::Items {
            album,
            page,
            size,
            only_visible,
        } => {
            let visibility = if only_visible {
                Visibility::OnlyVisible
            } else {
                Visibility::All
            };
            let size = size.unwrap_or(settings.curation.manager_page_size);
            let controller =
                OrderedCollectionController::new(client.clone(), AlbumId(album), visibility, size);
            let snapshot = controller.load(page, size).await?;
            print_items(client.base(), &snapshot);
            Ok(())
        }
        Command::Reorder {
            album,
            dragged,
            target,
            page,
        } => {
            let controller = manager(client.clone(), &settings, album);
            controller
                .load(page, settings.curation.manager_page_size)
                .await?;
            let before = controller.order();
            let order = controller.reorder(ItemId(dragged), ItemId(target)).await?;
            if order == before {
                warn!("Nothing moved, both items must be on page {page}");
            }
            print_items(client.base(), &controller.snapshot());
            Ok(())
        }
        Command::DeleteItem { album, item, page } => {
            let controller = manager(client.clone(), &settings, album);
            controller
                .load(page, settings.curation.manager_page_size)
                .await?;
            controller.delete(ItemId(item)).await?;
            info!("Deleted item {item} from album {album}");
            print_items(client.base(), &controller.snapshot());
            Ok(())
        }
        Command::Slideshow { album, steps } => slideshow(client, &settings, album, steps).await,
    }
}

fn manager(
    client: Arc<GalleryClient>,
    settings: &AppSettings,
    album: i64,
) -> OrderedCollectionController<GalleryClient> {
    OrderedCollectionController::new(
        client,
        AlbumId(album),
        Visibility::All,
        settings.curation.manager_page_size,
    )
}

async fn library(
    client: Arc<GalleryClient>,
    settings: &AppSettings,
    query: Option<String>,
    media_type: Option<MediaTypeFilter>,
) -> Result<()> {
    let mut picker = MediaPicker::new(
        client.clone(),
        settings.curation.search_debounce,
        settings.curation.default_media_type,
    );
    let mut updates = picker.subscribe();
    picker.open();

    let status = updates
        .wait_for(|state| state.status != FetchStatus::Loading)
        .await?
        .status
        .clone();
    if let FetchStatus::Failed(message) = status {
        return Err(eyre!("Could not fetch the media library: {message}"));
    }

    if let Some(media_type) = media_type {
        picker.set_media_type(media_type);
    }
    if let Some(query) = query {
        picker.set_query(query.clone());
        updates
            .wait_for(|state| state.criteria.query == query)
            .await?;
    }

    let view = picker.state();
    picker.close();
    info!(
        "{} of {} assets match {:?} ({})",
        view.results.len(),
        view.library_len(),
        view.criteria.query,
        view.criteria.media_type
    );
    for asset in &view.results {
        match preview_for(client.base(), asset) {
            AssetPreview::Poster { url } => {
                println!("#{:<6} {:<40} {url}", asset.id, asset.original_filename);
            }
            AssetPreview::FileCard {
                filename,
                content_type,
            } => println!("#{:<6} {filename:<40} ({content_type})", asset.id),
        }
    }
    Ok(())
}

async fn slideshow(
    client: Arc<GalleryClient>,
    settings: &AppSettings,
    album: i64,
    steps: usize,
) -> Result<()> {
    let controller = OrderedCollectionController::new(
        client.clone(),
        AlbumId(album),
        Visibility::OnlyVisible,
        settings.curation.gallery_page_size,
    );
    controller
        .load(0, settings.curation.gallery_page_size)
        .await?;

    let mut slideshow =
        SlideshowController::new(controller.subscribe(), settings.curation.slideshow_interval);
    let mut updates = slideshow.subscribe();
    slideshow.open(0);
    if !slideshow.state().is_open {
        return Err(eyre!("Album {album} has no visible images"));
    }
    slideshow.toggle_autoplay(true);

    for _ in 0..steps {
        if let Some(item) = slideshow.current_item() {
            println!(
                "{:<30} {}",
                item.display_title(),
                asset_url(client.base(), item.asset_id)
            );
        }
        updates.changed().await?;
    }
    slideshow.close();
    Ok(())
}

fn print_items(base: &str, snapshot: &CollectionSnapshot) {
    info!(
        "Album {} page {}/{}",
        snapshot.album_id,
        snapshot.page + 1,
        snapshot.total_pages
    );
    for item in &snapshot.items {
        println!(
            "{:>4} #{:<6} {:<30} {:<8} {}",
            item.position,
            item.id,
            item.display_title(),
            if item.visible { "visible" } else { "hidden" },
            asset_url(base, item.asset_id)
        );
    }
}
