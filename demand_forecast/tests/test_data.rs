use demand_forecast::data::{DataLoader, ProductFilter};
use demand_forecast::error::ForecastError;
use demand_forecast::series::TimeSeriesBuilder;
use demand_forecast::FilterCache;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str =
    "Date,Demand,Product ID,Product Description,Product Category,Customer Name,Customer Class";

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn sample_file() -> NamedTempFile {
    write_csv(&[
        HEADER,
        "2023-01-31,120,P001,Blue Widget,Tools,Acme,A",
        "2023-02-28,135,P001,Blue Widget,Tools,Acme,A",
        "2023-01-31,40,P001,Blue Widget,Tools,Globex,B",
        "2023-01-31,80,P002,Garden Hose,Garden,Globex,B",
        "2023-02-28,95,P002,Garden Hose,Garden,Globex,B",
        "2023-01-31,15,P003,Drill Bit,Tools,Initech,C",
    ])
}

#[test]
fn test_data_loader_from_csv() {
    let file = sample_file();
    let dataset = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(dataset.len(), 6);
    assert!(!dataset.is_empty());
    assert_eq!(dataset.product_ids(), vec!["P001", "P002", "P003"]);
    assert_eq!(dataset.categories(), vec!["Tools", "Garden"]);
    assert_eq!(dataset.customer_classes(), vec!["A", "B", "C"]);

    let first = &dataset.records()[0];
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2023, 1, 31).unwrap());
    assert_eq!(first.demand, 120.0);
    assert_eq!(first.product_description, "Blue Widget");
    assert_eq!(first.customer, "Acme");
}

#[test]
fn test_alternative_date_format() {
    let file = write_csv(&[HEADER, "01/31/2023,5.5,P001,Blue Widget,Tools,Acme,A"]);
    let dataset = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(dataset.records()[0].date, NaiveDate::from_ymd_opt(2023, 1, 31).unwrap());
    assert_eq!(dataset.records()[0].demand, 5.5);
}

#[test]
fn test_data_loader_error_handling() {
    assert!(matches!(
        DataLoader::from_csv("nonexistent_file.csv"),
        Err(ForecastError::IoError(_))
    ));

    let missing_column = write_csv(&[
        "Date,Demand,Product ID,Product Description,Product Category,Customer Name",
        "2023-01-31,120,P001,Blue Widget,Tools,Acme",
    ]);
    let err = DataLoader::from_csv(missing_column.path()).unwrap_err();
    assert!(matches!(err, ForecastError::DataError(_)));
    assert!(err.to_string().contains("Customer Class"));

    let bad_date = write_csv(&[HEADER, "sometime,120,P001,Blue Widget,Tools,Acme,A"]);
    let err = DataLoader::from_csv(bad_date.path()).unwrap_err();
    assert!(matches!(err, ForecastError::DataError(_)));
    assert!(err.to_string().contains("Row 1"));
}

#[test]
fn test_non_numeric_demand_becomes_nan() {
    let file = write_csv(&[
        HEADER,
        "2023-01-31,120,P001,Blue Widget,Tools,Acme,A",
        "2023-02-28,n/a,P001,Blue Widget,Tools,Acme,A",
    ]);
    let dataset = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(dataset.records()[0].demand, 120.0);
    assert!(dataset.records()[1].demand.is_nan());
}

#[test]
fn test_filters() {
    let file = sample_file();
    let dataset = DataLoader::from_csv(file.path()).unwrap();

    let tools = dataset.filter(&ProductFilter::all().with_category("Tools"));
    assert_eq!(tools.product_ids(), vec!["P001", "P003"]);

    let globex_tools = dataset.filter(
        &ProductFilter::all()
            .with_category("Tools")
            .with_customer("Globex"),
    );
    assert_eq!(globex_tools.len(), 1);
    assert_eq!(globex_tools.records()[0].demand, 40.0);

    let class_c = dataset.filter(&ProductFilter::all().with_customer_class("C"));
    assert_eq!(class_c.product_ids(), vec!["P003"]);

    let nothing = dataset.filter(&ProductFilter::all().with_category("Toys"));
    assert!(nothing.is_empty());
    assert!(nothing.product_ids().is_empty());

    assert_eq!(dataset.filter(&ProductFilter::all()), dataset);
}

#[test]
fn test_filter_cache_reuses_views() {
    let file = sample_file();
    let dataset = DataLoader::from_csv(file.path()).unwrap();
    let mut cache = FilterCache::new();

    let filter = ProductFilter::all().with_category("Garden");
    assert_eq!(cache.get_or_filter(&dataset, &filter).len(), 2);
    assert_eq!(cache.get_or_filter(&dataset, &filter).len(), 2);
    assert_eq!(cache.len(), 1);

    cache.get_or_filter(&dataset, &ProductFilter::all());
    assert_eq!(cache.len(), 2);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_product_series_sums_customers() {
    let file = sample_file();
    let dataset = DataLoader::from_csv(file.path()).unwrap();

    let records = dataset.product_records("P001");
    assert_eq!(records.len(), 3);

    let series = TimeSeriesBuilder::new().build(&records).unwrap();
    assert_eq!(series.product_id(), "P001");
    assert_eq!(series.values(), &[160.0, 135.0]);
    assert_eq!(
        series.dates(),
        &[
            NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap(),
        ]
    );
}
