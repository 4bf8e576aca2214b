//! dinepick - pick a random restaurant nearby
//!
//! This is the command line front end. It wires together:
//! - Configuration loading
//! - Store initialization
//! - The picker engine and roulette
//! - Local collaborators (dataset search, log notifier, stdout share)

mod collaborators;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use collaborators::{DatasetSearch, LogNotifier, StdoutShare};
use dinepick_api::{Filters, Location, PreferencesUpdate, Restaurant};
use dinepick_config::{Settings, load_config, load_config_or_default};
use dinepick_core::{
    OriginSource, PickOutcome, Picker, RouletteWheel, Selection, SpinOutcome, available_cuisines,
    directions_url, loading_message, share_payload,
};
use dinepick_provider_api::ShareSink;
use dinepick_store::{KeyValueStore, SqliteKv};
use dinepick_util::{
    DINEPICK_CONFIG_ENV, DINEPICK_DATA_DIR_ENV, DinepickError, RestaurantId, default_config_path,
    format_ago, format_datetime_full,
};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// dinepick - let chance decide where you eat
#[derive(Parser, Debug)]
#[command(name = "dinepick", version)]
#[command(about = "Pick a random restaurant nearby", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/dinepick/config.toml)
    #[arg(short, long, env = DINEPICK_CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(short, long, env = DINEPICK_DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Restaurant dataset override (JSON array of restaurants)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Clone)]
struct OriginArgs {
    /// Search latitude (defaults to the favorite location)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Search longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Name for the search location
    #[arg(long)]
    name: Option<String>,

    /// Search around a restaurant or address from the dataset
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    near: Option<String>,

    /// Search radius in kilometers (defaults to the preferred radius)
    #[arg(long)]
    radius: Option<f64>,
}

impl OriginArgs {
    fn location(&self) -> Option<Location> {
        let (lat, lon) = (self.lat?, self.lon?);
        Some(Location {
            lat,
            lon,
            name: self.name.clone(),
        })
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick a restaurant
    Pick {
        #[command(flatten)]
        origin: OriginArgs,

        /// Exact cuisine tag
        #[arg(long)]
        cuisine: Option<String>,

        /// Acceptable price tier (1-4), repeatable
        #[arg(long = "price", value_parser = clap::value_parser!(u8).range(1..=4))]
        prices: Vec<u8>,

        /// Only restaurants open now
        #[arg(long)]
        open_now: bool,

        /// Skip restaurants picked recently
        #[arg(long)]
        exclude_visited: bool,

        /// Only favorites
        #[arg(long)]
        favorites_only: bool,

        /// Spin the roulette instead of waiting
        #[arg(long)]
        roulette: bool,
    },

    /// List cuisines found nearby
    Cuisines {
        #[command(flatten)]
        origin: OriginArgs,
    },

    /// Show past picks
    History {
        /// Remove every entry
        #[arg(long)]
        clear: bool,
    },

    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Rate a restaurant from 1 to 5 stars
    Rate {
        id: String,

        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,

        #[arg(long)]
        note: Option<String>,
    },

    /// Show the rating of a restaurant
    Rating { id: String },

    /// Print a shareable link to a restaurant
    Share { id: String },

    /// Write all local data to a JSON file
    Export { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    List,
    Add { id: String },
    Remove { id: String },
    Toggle { id: String },
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    Show,
    Set {
        #[arg(long)]
        dark_mode: Option<bool>,

        #[arg(long)]
        notifications: Option<bool>,

        /// Default search radius in kilometers
        #[arg(long)]
        default_radius: Option<f64>,

        #[arg(long)]
        exclude_visited: Option<bool>,

        #[arg(long)]
        animations: Option<bool>,

        /// `lat,lon` or `lat,lon,name`
        #[arg(long, value_parser = parse_location, allow_hyphen_values = true, conflicts_with = "clear_favorite_location")]
        favorite_location: Option<Location>,

        #[arg(long)]
        clear_favorite_location: bool,
    },
    Reset,
}

fn parse_location(value: &str) -> std::result::Result<Location, String> {
    let mut parts = value.splitn(3, ',');
    let mut coordinate = |what: &str| -> std::result::Result<f64, String> {
        parts
            .next()
            .map(str::trim)
            .ok_or_else(|| format!("missing {}", what))?
            .parse()
            .map_err(|_| format!("invalid {}", what))
    };
    let lat = coordinate("latitude")?;
    let lon = coordinate("longitude")?;
    let name = parts
        .next()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from);

    Ok(Location { lat, lon, name })
}

/// Everything a command needs
struct App {
    settings: Settings,
    picker: Picker,
    dataset: Option<PathBuf>,
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => load_config(path)
                .map_err(DinepickError::from)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => load_config_or_default(default_config_path())
                .map_err(DinepickError::from)
                .context("Failed to load default config")?,
        };
        if let Some(data_dir) = &args.data_dir {
            settings.storage.data_dir = data_dir.clone();
        }

        let data_dir = &settings.storage.data_dir;
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        let db_path = settings.storage.database_path();
        let kv: Arc<dyn KeyValueStore> = Arc::new(
            SqliteKv::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );
        if !kv.is_healthy() {
            warn!(db_path = %db_path.display(), "Store reports unhealthy");
        }
        info!(db_path = %db_path.display(), "Store initialized");

        let picker = Picker::new(
            kv,
            Arc::new(LogNotifier),
            settings.picker.clone(),
            &settings.history,
        )
        .with_search_settings(&settings.search);
        let dataset = args.dataset.clone().or_else(|| settings.search.dataset.clone());

        Ok(Self {
            settings,
            picker,
            dataset,
        })
    }

    fn load_dataset(&self) -> Result<DatasetSearch> {
        match &self.dataset {
            Some(path) => DatasetSearch::load(path),
            None => bail!("No restaurant dataset configured; set [search] dataset or pass --dataset"),
        }
    }

    /// Find a restaurant by id in the dataset, favorites or history
    fn resolve(&self, id: &str) -> Result<Restaurant> {
        let id = RestaurantId::new(id);

        if self.dataset.is_some() {
            if let Some(found) = self.load_dataset()?.find(&id) {
                let mut found = found.clone();
                self.picker.overlay(std::slice::from_mut(&mut found));
                return Ok(found);
            }
        }

        let known = self
            .picker
            .favorites()
            .list()
            .into_iter()
            .find(|r| r.id == id)
            .or_else(|| self.picker.history().find(&id));

        match known {
            Some(mut found) => {
                self.picker.overlay(std::slice::from_mut(&mut found));
                Ok(found)
            }
            None => Err(DinepickError::invalid_input(format!("unknown restaurant '{}'", id)).into()),
        }
    }

    async fn search(&self, origin: &OriginArgs, filters: &Filters) -> Result<(Location, Vec<Restaurant>)> {
        let search = self.load_dataset()?;
        let source = match (origin.location(), &origin.near) {
            (Some(point), _) => OriginSource::Point(point),
            (None, Some(query)) => OriginSource::Address {
                geocoder: &search,
                query: query.clone(),
            },
            (None, None) => OriginSource::Saved,
        };
        let location = self.picker.locate(source).await?;
        let found = self.picker.search(&search, &location, filters).await?;
        Ok((location, found))
    }

    async fn run(self, command: Command) -> Result<()> {
        match command {
            Command::Pick {
                origin,
                cuisine,
                prices,
                open_now,
                exclude_visited,
                favorites_only,
                roulette,
            } => {
                let filters = Filters {
                    cuisine,
                    price_levels: (!prices.is_empty()).then(|| prices.into_iter().collect::<BTreeSet<_>>()),
                    open_now,
                    radius_km: origin.radius,
                    exclude_visited,
                    favorites_only,
                };
                self.pick(&origin, &filters, roulette).await
            }

            Command::Cuisines { origin } => {
                let filters = Filters {
                    radius_km: origin.radius,
                    ..Default::default()
                };
                let (_, found) = self.search(&origin, &filters).await?;
                for cuisine in available_cuisines(&found) {
                    println!("{}", cuisine);
                }
                Ok(())
            }

            Command::History { clear } => {
                let history = self.picker.history();
                if clear {
                    history.clear().context("Failed to clear history")?;
                    println!("History cleared");
                    return Ok(());
                }

                let now = dinepick_util::now();
                let entries = history.list();
                if entries.is_empty() {
                    println!("No picks yet");
                }
                for entry in entries {
                    println!(
                        "{}  {}  {}  ({}, from {})",
                        format_datetime_full(&entry.selected_at),
                        entry.restaurant.id,
                        entry.restaurant.name,
                        format_ago(&entry.selected_at, &now),
                        entry.location.display_name()
                    );
                }
                Ok(())
            }

            Command::Favorites { action } => self.favorites(action),

            Command::Prefs { action } => self.prefs(action),

            Command::Rate { id, rating, note } => {
                let restaurant = self.resolve(&id)?;
                self.picker
                    .rate(&restaurant, rating, note)
                    .context("Failed to save rating")?;
                println!("Rated {} {}/5", restaurant.name, rating);
                Ok(())
            }

            Command::Rating { id } => {
                let rating = self.picker.ratings().get(&RestaurantId::new(id.as_str()));
                match rating.rating {
                    Some(stars) => println!("{}/5", stars),
                    None => println!("Not rated"),
                }
                if let Some(note) = rating.note {
                    println!("{}", note);
                }
                Ok(())
            }

            Command::Share { id } => {
                let restaurant = self.resolve(&id)?;
                let payload = share_payload(&restaurant, &self.settings.share.base_url);
                StdoutShare.share(&payload).await?;
                Ok(())
            }

            Command::Export { file } => {
                let snapshot = self.picker.export(dinepick_util::now());
                let json = serde_json::to_string_pretty(&snapshot)?;
                std::fs::write(&file, json)
                    .with_context(|| format!("Failed to write export to {:?}", file))?;
                println!("Exported to {}", file.display());
                Ok(())
            }
        }
    }

    async fn pick(&self, origin: &OriginArgs, filters: &Filters, roulette: bool) -> Result<()> {
        let (location, found) = self.search(origin, filters).await?;
        if found.is_empty() {
            eprintln!("No restaurants found in this area. Try a larger radius.");
            return Err(DinepickError::NoMatches.into());
        }

        let candidates = self.picker.candidates(&found, filters, dinepick_util::now());
        if candidates.is_empty() {
            return Err(DinepickError::NoMatches.into());
        }

        let selection = if roulette {
            self.spin(candidates, &location).await?
        } else {
            eprintln!("{}", loading_message());
            match self.picker.pick(&candidates, &location).await {
                PickOutcome::Picked(selection) => Some(selection),
                PickOutcome::NoMatches => None,
            }
        };

        match selection {
            Some(selection) => {
                print_selection(&selection);
                Ok(())
            }
            None => Err(DinepickError::NoMatches.into()),
        }
    }

    async fn spin(&self, candidates: Vec<Restaurant>, location: &Location) -> Result<Option<Selection>> {
        let animations = self.picker.preferences().get().animations_enabled;
        let names: Vec<String> = candidates.iter().map(|r| r.name.clone()).collect();

        let mut wheel = RouletteWheel::new(self.settings.roulette.clone());
        let mut handle = wheel.spin(candidates, animations);

        let mut frames = handle.frames();
        let ticker = tokio::spawn(async move {
            while frames.changed().await.is_ok() {
                let index = frames.borrow_and_update().index;
                if let Some(name) = names.get(index) {
                    eprint!("\r\x1b[2K🎰 {}", name);
                    let _ = std::io::stderr().flush();
                }
            }
        });

        let outcome = tokio::select! {
            result = handle.result() => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };
        ticker.abort();
        eprintln!();

        let Some(outcome) = outcome else {
            handle.cancel();
            bail!("Spin cancelled");
        };

        match outcome {
            Ok(SpinOutcome::Selected(restaurant)) => {
                Ok(Some(self.picker.complete_selection(restaurant, location)))
            }
            Ok(SpinOutcome::NoSelection) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn favorites(&self, action: FavoritesAction) -> Result<()> {
        let favorites = self.picker.favorites();
        match action {
            FavoritesAction::List => {
                let list = favorites.list();
                if list.is_empty() {
                    println!("No favorites yet");
                }
                for r in list {
                    println!("{}  {}", r.id, r.name);
                }
            }
            FavoritesAction::Add { id } => {
                let restaurant = self.resolve(&id)?;
                if favorites.is_favorite(&restaurant.id) {
                    println!("{} is already a favorite", restaurant.name);
                } else {
                    self.picker.toggle_favorite(&restaurant)?;
                    println!("Added {} to favorites", restaurant.name);
                }
            }
            FavoritesAction::Remove { id } => {
                favorites.remove(&RestaurantId::new(id.as_str()))?;
                println!("Removed {}", id);
            }
            FavoritesAction::Toggle { id } => {
                let restaurant = self.resolve(&id)?;
                if self.picker.toggle_favorite(&restaurant)? {
                    println!("Added {} to favorites", restaurant.name);
                } else {
                    println!("Removed {} from favorites", restaurant.name);
                }
            }
        }
        Ok(())
    }

    fn prefs(&self, action: PrefsAction) -> Result<()> {
        let preferences = self.picker.preferences();
        let prefs = match action {
            PrefsAction::Show => preferences.get(),
            PrefsAction::Set {
                dark_mode,
                notifications,
                default_radius,
                exclude_visited,
                animations,
                favorite_location,
                clear_favorite_location,
            } => {
                let update = PreferencesUpdate {
                    dark_mode,
                    notifications,
                    default_radius,
                    exclude_visited_by_default: exclude_visited,
                    animations_enabled: animations,
                    favorite_location: if clear_favorite_location {
                        Some(None)
                    } else {
                        favorite_location.map(Some)
                    },
                };
                if update.is_empty() {
                    warn!("No preference given, nothing to change");
                }
                preferences.update(update).context("Failed to save preferences")?
            }
            PrefsAction::Reset => {
                preferences.reset().context("Failed to reset preferences")?;
                preferences.get()
            }
        };

        println!("{}", serde_json::to_string_pretty(&prefs)?);
        Ok(())
    }
}

fn print_selection(selection: &Selection) {
    let r = &selection.restaurant;
    debug!(restaurant_id = %r.id, "Printing selection");

    println!("{}", selection.message);
    println!();
    println!("  {}", r.name);
    if let Some(cuisine) = &r.cuisine {
        println!("  Cuisine:  {}", cuisine);
    }
    if let Some(level) = r.price_level {
        println!("  Price:    {}", "€".repeat(level as usize));
    }
    if let Some(distance) = r.distance {
        if distance < 1000.0 {
            println!("  Distance: {:.0} m", distance);
        } else {
            println!("  Distance: {:.1} km", distance / 1000.0);
        }
    }
    if let Some(address) = &r.address {
        println!("  Address:  {}", address);
    }
    if let Some(phone) = &r.phone {
        println!("  Phone:    {}", phone);
    }
    if let Some(website) = &r.website {
        println!("  Website:  {}", website);
    }
    if let Some(rating) = r.user_rating {
        println!("  Your rating: {}", "★".repeat(rating as usize));
    }
    if r.is_favorite {
        println!("  ⭐ Favorite");
    }
    println!("  Directions: {}", directions_url(r));
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    debug!(version = env!("CARGO_PKG_VERSION"), "dinepick starting");
    if dinepick_util::is_mock_time_active() {
        warn!("Mock time is active");
    }

    let app = App::new(&args)?;
    match app.run(args.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => match e.downcast_ref::<DinepickError>() {
            Some(err) if err.is_user_recoverable() => {
                eprintln!("{}", err);
                if matches!(err, DinepickError::NoLocation) {
                    eprintln!("Pass --lat and --lon or --near, or set one with `dinepick prefs set --favorite-location`");
                }
                Ok(ExitCode::FAILURE)
            }
            _ => Err(e),
        },
    }
}
