use demand_forecast::{
    AppConfig, DataLoader, FilterCache, ForecastEngine, ForecastError, ForecastSummarizer,
    ModelInfo, ProductOverview, ProductSelection,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Forecast one product from the configured dataset and save the export.
//
// Usage: forecast_product [CONFIG_FILE]
fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demand_forecast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load_from(&path)?,
        None => AppConfig::load()?,
    };
    let params = config.forecast_parameters()?;
    tracing::info!(data_path = %config.data_path.display(), "configuration loaded");

    let dataset = DataLoader::from_csv(&config.data_path)?;
    let mut cache = FilterCache::new();
    let filtered = cache.get_or_filter(&dataset, &config.filter);

    let selection = ProductSelection::at(config.product_index, filtered.product_ids().len());
    println!("{}", selection.caption());

    let Some(overview) = ProductOverview::for_selection(filtered, &selection) else {
        return Ok(());
    };
    println!("{}", overview);

    let records = filtered.product_records(&overview.product_id);
    let result = match ForecastEngine::new().forecast_records(&records, params) {
        Ok(result) => result,
        Err(err) if err.is_recoverable() => {
            report(&err);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let summary =
        ForecastSummarizer::new().summarize(&result, &overview.product_id, &overview.description)?;
    println!("{}", summary);
    println!("{}", ModelInfo::from_result(&result));

    let path = summary.save_csv(&config.output_dir)?;
    println!("Forecast saved to {}", path.display());

    Ok(())
}

fn report(err: &ForecastError) {
    eprintln!("Error generating forecast: {}", err);
    if let Some(suggestion) = err.suggestion() {
        eprintln!("{}", suggestion);
    }
}
