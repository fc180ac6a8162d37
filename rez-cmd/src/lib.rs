//! Command implementations for the REZ CLI.
//!
//! Provides subcommands for encoding filters, generating zones and
//! starting raw-data exports against the zoning backend.

use clap::Subcommand;

pub mod encode;
pub mod export;
pub mod inputs;
pub mod zones;

#[derive(Subcommand)]
pub enum Command {
    /// Print the backend query fragment for a set of filters
    Encode {
        /// Filter definitions (JSON array)
        #[arg(short = 'f', long, default_value = "fixtures/filters.json")]
        filters_json: String,

        /// Resource the filters are encoded for ("Solar PV", "wind", ...)
        #[arg(short = 'r', long)]
        resource: String,

        /// Shareable query string overriding filter values
        #[arg(short = 'q', long)]
        query: Option<String>,

        /// Explorer config (JSON)
        #[arg(short = 'c', long)]
        config: Option<String>,
    },

    /// Request scored zones for an area and optionally write them as CSV
    Zones {
        /// Area list (JSON array)
        #[arg(short = 'a', long, default_value = "fixtures/areas.json")]
        areas_json: String,

        /// Filter definitions (JSON array)
        #[arg(short = 'f', long)]
        filters_json: Option<String>,

        /// EEZ features (GeoJSON FeatureCollection), enables offshore
        #[arg(long)]
        eez_json: Option<String>,

        /// Shareable query string to start from
        #[arg(short = 'q', long)]
        query: Option<String>,

        /// Area id, overrides the query string
        #[arg(long)]
        area: Option<String>,

        /// Resource, overrides the query string
        #[arg(short = 'r', long)]
        resource: Option<String>,

        /// Zone type (boundaries, grid-9, grid-25, grid-50)
        #[arg(short = 'z', long)]
        zone_type: Option<String>,

        /// Write the zones to this CSV ("-" for a generated file name)
        #[arg(long)]
        csv: Option<String>,

        /// Explorer config (JSON)
        #[arg(short = 'c', long)]
        config: Option<String>,

        /// Backend endpoint, overrides config and environment
        #[arg(short = 'e', long)]
        endpoint: Option<String>,
    },

    /// Start a raw-data export for a country
    Export {
        /// Area list (JSON array)
        #[arg(short = 'a', long, default_value = "fixtures/areas.json")]
        areas_json: String,

        /// Country id
        #[arg(long)]
        area: String,

        /// lcoe or score
        #[arg(short = 'o', long, default_value = "lcoe")]
        operation: String,

        /// State database recording pending downloads
        #[arg(short = 'd', long, default_value = "rez-state.db")]
        db: String,

        /// Explorer config (JSON)
        #[arg(short = 'c', long)]
        config: Option<String>,

        /// Backend endpoint, overrides config and environment
        #[arg(short = 'e', long)]
        endpoint: Option<String>,
    },

    /// List raw-data exports that have not been collected
    Downloads {
        /// State database recording pending downloads
        #[arg(short = 'd', long, default_value = "rez-state.db")]
        db: String,

        /// Forget this download id
        #[arg(long)]
        remove: Option<String>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Encode {
            filters_json,
            resource,
            query,
            config,
        } => encode::run_encode(&filters_json, &resource, query.as_deref(), config.as_deref()),
        Command::Zones {
            areas_json,
            filters_json,
            eez_json,
            query,
            area,
            resource,
            zone_type,
            csv,
            config,
            endpoint,
        } => {
            let args = zones::ZonesArgs {
                areas_json,
                filters_json,
                eez_json,
                query,
                area,
                resource,
                zone_type,
                csv,
                config,
                endpoint,
            };
            zones::run_zones(args).await
        }
        Command::Export {
            areas_json,
            area,
            operation,
            db,
            config,
            endpoint,
        } => {
            let config = inputs::load_config(config.as_deref(), endpoint.as_deref())?;
            export::run_export(&config, &areas_json, &area, &operation, &db).await
        }
        Command::Downloads { db, remove } => export::run_downloads(&db, remove.as_deref()),
    }
}
