#[cfg(not(feature = "http"))]
compile_error!("This example requires the 'http' feature");

use cloudmask::export::{ExportConfig, ExportRequest};
use cloudmask::query::{CollectionQuery, DateRange};
use cloudmask::{submit_export, Credentials, Crs, HttpService, Polygon, Visualization};
use std::env;

const SERVICE_URL_ENV_VAR: &str = "CLOUDMASK_SERVICE_URL";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();
    println!("Example: cloudmask export");

    let region = Polygon::new(vec![
        (41.23379702387932, 55.327254680594635),
        (41.23379702387932, 40.24345594801423),
        (90.18887514887932, 40.24345594801423),
        (90.18887514887932, 55.327254680594635),
    ])
    .unwrap();
    let dates = DateRange::parse("2017-01-01", "2017-03-31").unwrap();

    // Sentinel-2 SR RGB + QA60, <20% cloudy scenes, masked, newest on top
    let query = CollectionQuery::sentinel2_surface_reflectance(region.clone(), dates).unwrap();
    let export = ExportConfig::builder(region.clone())
        .with_folder("new")
        .with_scale(100.0)
        .with_crs("EPSG:4326".parse::<Crs>().unwrap())
        .with_description("test_14_6")
        .build()
        .unwrap();
    let request = ExportRequest::new(query, Visualization::default(), export).unwrap();
    println!("Region bounds: {:?}", region.bounds().as_tuple());

    let url = env::var(SERVICE_URL_ENV_VAR).unwrap();
    let service = HttpService::new(url.as_str()).unwrap();
    let credentials = Credentials::from_env().unwrap();

    match submit_export(&service, &credentials, &request).await {
        Ok(task) => println!("Started {task}"),
        Err(e) => println!("Export failed: {e}"),
    }
}
