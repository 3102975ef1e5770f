//! # CLI Module
//!
//! Command definitions and implementations.
//!
//! Every `cmd_*` function returns the JSON document the binary prints, so
//! the commands can be exercised without spawning a process.

use clap::{ArgAction, Args, Parser, Subcommand};
use hexapi_client::{
    AirbusSession, ClientConfig, ClientError, GeoStoreClient, HeadFinderClient, ImageSource,
    OneAtlasClient, Result, TaskingClient,
};
use hexapi_core::endpoints::DEFAULT_EPSG;
use hexapi_core::headfinder::MAX_SCENES;
use hexapi_core::{
    BoundingBox, Endpoints, GeoStoreFeature, GeoStoreQuery, HeadFinderQuery, ImageSize,
    OneAtlasFeature, OneAtlasQuery, TileCoord,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// =============================================================================
// CLI DEFINITIONS
// =============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "hexapi",
    about = "Search satellite imagery catalogues: Airbus OneAtlas, GeoStore, Tasking and HEADFinder",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Airbus API key
    #[arg(long, global = true, env = "HEXAPI_AIRBUS_API_KEY", hide_env_values = true)]
    pub airbus_key: Option<String>,

    /// HEADFinder user key
    #[arg(long, global = true, env = "HEXAPI_HEADFINDER_USER_KEY", hide_env_values = true)]
    pub headfinder_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "HEXAPI_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    /// Client-side limit on requests per second
    #[arg(long, global = true, env = "HEXAPI_RPS")]
    pub rps: Option<NonZeroU32>,

    /// Where quicklooks are written (default: system temp dir)
    #[arg(long, global = true, env = "HEXAPI_DOWNLOAD_DIR")]
    pub download_dir: Option<PathBuf>,

    /// Send every request to this base URL instead of the production hosts
    #[arg(long, global = true, env = "HEXAPI_API_BASE", hide = true)]
    pub api_base: Option<String>,

    /// Log at info level
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that the Airbus API key is accepted
    Token,

    /// Show account information
    Me,

    /// Show the services available to the account
    Roles,

    /// Show consumption of the first limited subscription
    Usage,

    /// Airbus OneAtlas catalogue
    #[command(name = "oneatlas")]
    OneAtlas {
        #[command(subcommand)]
        subcommand: OneAtlasCommand,
    },

    /// Airbus GeoStore catalogue
    #[command(name = "geostore")]
    GeoStore {
        #[command(subcommand)]
        subcommand: GeoStoreCommand,
    },

    /// Airbus Tasking listings
    Tasking {
        #[command(subcommand)]
        subcommand: TaskingCommand,
    },

    /// HEAD Aerospace HEADFinder catalogue
    #[command(name = "headfinder")]
    HeadFinder {
        #[command(subcommand)]
        subcommand: HeadFinderCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum OneAtlasCommand {
    /// Search the catalogue
    Search(OneAtlasSearchArgs),
    /// Download a quicklook
    Quicklook(QuicklookSource),
    /// Download one WMTS tile
    Tile(TileArgs),
}

#[derive(Debug, Subcommand)]
pub enum GeoStoreCommand {
    /// Search the catalogue
    Search(GeoStoreSearchArgs),
    /// Download a quicklook
    Quicklook {
        #[command(flatten)]
        source: QuicklookSource,
        /// SMALL, MEDIUM or LARGE
        #[arg(long, default_value = "large")]
        size: ImageSize,
    },
}

#[derive(Debug, Subcommand)]
pub enum TaskingCommand {
    /// List CIS contract ids
    Contracts,
    /// List taskings, for one contract or all of them
    List {
        #[arg(long)]
        contract: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HeadFinderCommand {
    /// Search the catalogue
    Search(HeadFinderSearchArgs),
}

/// Where a quicklook comes from.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct QuicklookSource {
    /// Preview URL
    #[arg(long)]
    pub url: Option<String>,
    /// JSON file holding one search result feature
    #[arg(long)]
    pub feature_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct TileArgs {
    pub item_id: String,
    pub z: u32,
    pub x: u32,
    pub y: u32,
    #[arg(long, default_value_t = DEFAULT_EPSG)]
    pub epsg: u32,
    /// Output file
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct OneAtlasSearchArgs {
    /// min_lon,min_lat,max_lon,max_lat
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: Option<BoundingBox>,
    /// WKT or GeoJSON geometry
    #[arg(long)]
    pub geometry: Option<String>,
    #[arg(long, num_args = 2, value_names = ["START", "END"], action = ArgAction::Set)]
    pub acquisition_date: Vec<String>,
    #[arg(long, num_args = 2, value_names = ["START", "END"], action = ArgAction::Set)]
    pub publication_date: Vec<String>,
    /// Maximum cloud cover in percent
    #[arg(long)]
    pub cloud_cover: Option<f64>,
    /// Maximum snow cover in percent
    #[arg(long)]
    pub snow_cover: Option<f64>,
    /// Maximum incidence angle
    #[arg(long)]
    pub incidence_angle: Option<f64>,
    /// Maximum resolution
    #[arg(long)]
    pub resolution: Option<f64>,
    #[arg(long)]
    pub commercial_reference: Option<String>,
    #[arg(long)]
    pub parent_identifier: Option<String>,
    #[arg(long)]
    pub source_identifier: Option<String>,
    #[arg(long)]
    pub workspace: Option<String>,
    /// Default: PHR,SPOT
    #[arg(long, value_delimiter = ',')]
    pub constellation: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub platform: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub product_type: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub production_status: Vec<String>,
    /// Default: SENSOR,ALBUM
    #[arg(long, value_delimiter = ',')]
    pub processing_level: Vec<String>,
    #[arg(long)]
    pub count: Option<u32>,
    #[arg(long)]
    pub start_page: Option<u32>,
    /// Default: -acquisitionDate,cloudCover
    #[arg(long, allow_hyphen_values = true)]
    pub sort_key: Option<String>,
}

impl OneAtlasSearchArgs {
    /// Query with unset flags falling back to the catalogue defaults.
    pub fn to_query(&self) -> OneAtlasQuery {
        let defaults = OneAtlasQuery::default();
        OneAtlasQuery {
            bbox: self.bbox,
            geometry: self.geometry.clone(),
            acquisition_date_range: date_pair(&self.acquisition_date),
            publication_date_range: date_pair(&self.publication_date),
            cloud_cover: self.cloud_cover.or(defaults.cloud_cover),
            snow_cover: self.snow_cover.or(defaults.snow_cover),
            commercial_reference: self.commercial_reference.clone(),
            constellation: list_or(&self.constellation, defaults.constellation),
            incidence_angle: self.incidence_angle,
            parent_identifier: self.parent_identifier.clone(),
            platform: self.platform.clone(),
            product_type: self.product_type.clone(),
            production_status: self.production_status.clone(),
            resolution: self.resolution,
            source_identifier: self.source_identifier.clone(),
            workspace: self.workspace.clone(),
            processing_level: list_or(&self.processing_level, defaults.processing_level),
            count: self.count.unwrap_or(defaults.count),
            start_page: self.start_page.unwrap_or(defaults.start_page),
            sort_key: self.sort_key.clone().unwrap_or(defaults.sort_key),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct GeoStoreSearchArgs {
    /// min_lon,min_lat,max_lon,max_lat
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: Option<BoundingBox>,
    #[arg(long)]
    pub geometry: Option<String>,
    #[arg(long, value_delimiter = ',')]
    pub constellation: Vec<String>,
    #[arg(long, num_args = 2, value_names = ["START", "END"], action = ArgAction::Set)]
    pub acquisition_date: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub polarisation_channels: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub product_type: Vec<String>,
    #[arg(long)]
    pub resolution: Option<f64>,
    #[arg(long)]
    pub cloud_cover: Option<f64>,
    #[arg(long)]
    pub snow_cover: Option<f64>,
    #[arg(long)]
    pub incidence_angle: Option<f64>,
    #[arg(long)]
    pub sensor_type: Option<String>,
    #[arg(long)]
    pub antenna_look_direction: Option<String>,
    #[arg(long)]
    pub orbit_direction: Option<String>,
    #[arg(long, default_value_t = 20)]
    pub count: u32,
    #[arg(long, default_value_t = 1)]
    pub start_page: u32,
    /// `date` or `cloud_rate`, `-` prefix for descending
    #[arg(long, default_value = "-date", allow_hyphen_values = true)]
    pub sort_key: String,
}

impl GeoStoreSearchArgs {
    pub fn to_query(&self) -> GeoStoreQuery {
        GeoStoreQuery {
            bbox: self.bbox,
            geometry: self.geometry.clone(),
            constellation: self.constellation.clone(),
            acquisition_date_range: date_pair(&self.acquisition_date),
            polarisation_channels: self.polarisation_channels.clone(),
            product_type: self.product_type.clone(),
            resolution: self.resolution,
            cloud_cover: self.cloud_cover,
            snow_cover: self.snow_cover,
            incidence_angle: self.incidence_angle,
            sensor_type: self.sensor_type.clone(),
            antenna_look_direction: self.antenna_look_direction.clone(),
            orbit_direction: self.orbit_direction.clone(),
            count: self.count,
            start_page: self.start_page,
            sort_key: self.sort_key.clone(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct HeadFinderSearchArgs {
    /// min_lon,min_lat,max_lon,max_lat
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: Option<BoundingBox>,
    /// HEADFinder area expression, wins over --bbox
    #[arg(long)]
    pub geometry: Option<String>,
    /// Default: SuperView,EarthScanner-KF1
    #[arg(long, value_delimiter = ',')]
    pub satellites: Vec<String>,
    #[arg(long)]
    pub scene_name: Option<String>,
    /// Match the scene name partially instead of exactly
    #[arg(long)]
    pub partial_match: bool,
    #[arg(long, default_value_t = MAX_SCENES)]
    pub max_scenes: u32,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    /// Maximum cloud cover in percent, 0 disables the filter
    #[arg(long, default_value_t = 100)]
    pub cloud_cover: u32,
    /// Maximum off-nadir angle, 0 disables the filter
    #[arg(long, default_value_t = 60)]
    pub incidence_angle: u32,
}

impl HeadFinderSearchArgs {
    pub fn to_query(&self) -> HeadFinderQuery {
        HeadFinderQuery {
            bbox: self.bbox,
            geometry: self.geometry.clone(),
            satellites: self.satellites.clone(),
            scene_name: self.scene_name.clone(),
            scene_name_exact_match: !self.partial_match,
            max_scenes: self.max_scenes,
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            cloud_cover: self.cloud_cover,
            incidence_angle: self.incidence_angle,
        }
    }
}

impl Cli {
    /// Environment settings overridden by command line flags.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;
        if let Some(key) = &self.airbus_key {
            config.airbus_api_key = Some(key.clone());
        }
        if let Some(key) = &self.headfinder_key {
            config.headfinder_user_key = Some(key.clone());
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        if self.rps.is_some() {
            config.requests_per_second = self.rps;
        }
        if let Some(dir) = &self.download_dir {
            config.download_dir = Some(dir.clone());
        }
        if let Some(base) = &self.api_base {
            config.endpoints = Endpoints::with_base(base);
        }
        Ok(config)
    }
}

fn date_pair(values: &[String]) -> Option<(String, String)> {
    match values {
        [start, end] => Some((start.clone(), end.clone())),
        _ => None,
    }
}

fn list_or(values: &[String], default: Vec<String>) -> Vec<String> {
    if values.is_empty() {
        default
    } else {
        values.to_vec()
    }
}

async fn read_feature<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}

fn path_output(path: &Path) -> Value {
    json!({ "path": path.display().to_string() })
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Dispatch a parsed command line.
pub async fn run(cli: &Cli) -> Result<Value> {
    let config = cli.client_config()?;
    match &cli.command {
        Commands::Token => cmd_token(&config).await,
        Commands::Me => cmd_me(&config).await,
        Commands::Roles => cmd_roles(&config).await,
        Commands::Usage => cmd_usage(&config).await,
        Commands::OneAtlas { subcommand } => match subcommand {
            OneAtlasCommand::Search(args) => cmd_oneatlas_search(&config, args).await,
            OneAtlasCommand::Quicklook(source) => cmd_oneatlas_quicklook(&config, source).await,
            OneAtlasCommand::Tile(args) => cmd_oneatlas_tile(&config, args).await,
        },
        Commands::GeoStore { subcommand } => match subcommand {
            GeoStoreCommand::Search(args) => cmd_geostore_search(&config, args).await,
            GeoStoreCommand::Quicklook { source, size } => {
                cmd_geostore_quicklook(&config, source, *size).await
            }
        },
        Commands::Tasking { subcommand } => match subcommand {
            TaskingCommand::Contracts => cmd_tasking_contracts(&config).await,
            TaskingCommand::List { contract } => {
                cmd_tasking_list(&config, contract.as_deref()).await
            }
        },
        Commands::HeadFinder { subcommand } => match subcommand {
            HeadFinderCommand::Search(args) => cmd_headfinder_search(&config, args).await,
        },
    }
}

/// `{"valid": bool}` for the configured API key.
pub async fn cmd_token(config: &ClientConfig) -> Result<Value> {
    let session = AirbusSession::new(config)?;
    let valid = session.authenticator().verify_api_key().await?;
    Ok(json!({ "valid": valid }))
}

pub async fn cmd_me(config: &ClientConfig) -> Result<Value> {
    let session = AirbusSession::new(config)?;
    session.authenticator().me().await
}

pub async fn cmd_roles(config: &ClientConfig) -> Result<Value> {
    let session = AirbusSession::new(config)?;
    session.authenticator().roles().await
}

/// Fails with [`ClientError::NoLimitedSubscriptions`] when nothing is limited.
pub async fn cmd_usage(config: &ClientConfig) -> Result<Value> {
    let session = AirbusSession::new(config)?;
    let usage = session
        .authenticator()
        .usage()
        .await?
        .ok_or(ClientError::NoLimitedSubscriptions)?;
    Ok(serde_json::to_value(usage)?)
}

pub async fn cmd_oneatlas_search(config: &ClientConfig, args: &OneAtlasSearchArgs) -> Result<Value> {
    let client = OneAtlasClient::connect(config).await?;
    let page = client.search(&args.to_query()).await?;
    info!(total = page.total_results, "OneAtlas search done");
    Ok(serde_json::to_value(page)?)
}

pub async fn cmd_oneatlas_quicklook(
    config: &ClientConfig,
    source: &QuicklookSource,
) -> Result<Value> {
    let client = OneAtlasClient::connect(config).await?;
    let path = match (&source.url, &source.feature_file) {
        (Some(url), _) => client.download_quicklook(ImageSource::Url(url)).await?,
        (None, Some(file)) => {
            let feature: OneAtlasFeature = read_feature(file).await?;
            client
                .download_quicklook(ImageSource::Feature(&feature))
                .await?
        }
        (None, None) => return Err(missing_source()),
    };
    Ok(path_output(&path))
}

pub async fn cmd_oneatlas_tile(config: &ClientConfig, args: &TileArgs) -> Result<Value> {
    let client = OneAtlasClient::connect(config).await?;
    let tile = TileCoord::new(args.z, args.x, args.y);
    let bytes = client.wmts_tile_in(&args.item_id, tile, args.epsg).await?;
    tokio::fs::write(&args.out, &bytes).await?;
    Ok(json!({
        "path": args.out.display().to_string(),
        "bytes": bytes.len(),
    }))
}

pub async fn cmd_geostore_search(config: &ClientConfig, args: &GeoStoreSearchArgs) -> Result<Value> {
    let client = GeoStoreClient::connect(config).await?;
    let page = client.search(&args.to_query()).await?;
    info!(total = page.total_results, "GeoStore search done");
    Ok(serde_json::to_value(page)?)
}

pub async fn cmd_geostore_quicklook(
    config: &ClientConfig,
    source: &QuicklookSource,
    size: ImageSize,
) -> Result<Value> {
    let client = GeoStoreClient::connect(config).await?;
    let path = match (&source.url, &source.feature_file) {
        (Some(url), _) => {
            client
                .download_quicklook(ImageSource::Url(url), size)
                .await?
        }
        (None, Some(file)) => {
            let feature: GeoStoreFeature = read_feature(file).await?;
            client
                .download_quicklook(ImageSource::Feature(&feature), size)
                .await?
        }
        (None, None) => return Err(missing_source()),
    };
    Ok(path_output(&path))
}

pub async fn cmd_tasking_contracts(config: &ClientConfig) -> Result<Value> {
    let client = TaskingClient::connect(config).await?;
    let ids = client.cis_contract_ids().await?;
    Ok(json!({ "contracts": ids }))
}

/// Taskings as `[{"contract": id, "taskings": ...}]`.
pub async fn cmd_tasking_list(config: &ClientConfig, contract: Option<&str>) -> Result<Value> {
    let client = TaskingClient::connect(config).await?;
    let listings = match contract {
        Some(id) => vec![(id.to_string(), client.taskings(id).await?)],
        None => client.taskings_for_all_contracts().await?,
    };
    Ok(Value::Array(
        listings
            .into_iter()
            .map(|(contract, taskings)| json!({ "contract": contract, "taskings": taskings }))
            .collect(),
    ))
}

pub async fn cmd_headfinder_search(
    config: &ClientConfig,
    args: &HeadFinderSearchArgs,
) -> Result<Value> {
    let client = HeadFinderClient::new(config)?;
    let scenes = client.search(&args.to_query()).await?;
    info!(scenes = scenes.scenes.len(), hits = ?scenes.hits, "HEADFinder search done");
    Ok(serde_json::to_value(scenes)?)
}

fn missing_source() -> ClientError {
    ClientError::Config("either --url or --feature-file is required".to_string())
}
