//! Integration tests against a running server.
//!
//! These tests require `rowscope-server` to be running with at least one
//! dataset in its data directory. Set `ROWSCOPE_API_URL` to point elsewhere
//! than `http://localhost:3001`; tests are skipped when nothing answers.

use serde::Deserialize;

fn api_url() -> String {
    std::env::var("ROWSCOPE_API_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetEntry {
    value: String,
    label: String,
    file_name: String,
}

#[derive(Debug, Deserialize)]
struct Catalog {
    locations: Vec<DatasetEntry>,
}

#[derive(Debug, Deserialize)]
struct GroupCount {
    #[allow(dead_code)]
    name: String,
    count: usize,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    total: usize,
    by_building: Vec<GroupCount>,
    by_location: Vec<GroupCount>,
}

#[derive(Debug, Deserialize)]
struct RecordsPage {
    total_records: usize,
    total_pages: usize,
    page: usize,
    records: Vec<serde_json::Value>,
}

async fn ensure_server() -> Option<reqwest::Client> {
    let client = reqwest::Client::new();
    match client.get(format!("{}/health", api_url())).send().await {
        Ok(_) => Some(client),
        Err(_) => {
            println!("Skipping test: Server not running at {}", api_url());
            None
        }
    }
}

async fn first_dataset(client: &reqwest::Client) -> Option<DatasetEntry> {
    let catalog: Catalog = client
        .get(format!("{}/api/locations", api_url()))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid catalog JSON");
    if catalog.locations.is_empty() {
        println!("Skipping test: no datasets available");
    }
    catalog.locations.into_iter().next()
}

#[tokio::test]
async fn test_catalog_entries_are_well_formed() {
    let Some(client) = ensure_server().await else { return };

    let catalog: Catalog = client
        .get(format!("{}/api/locations", api_url()))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid catalog JSON");

    for entry in &catalog.locations {
        assert!(entry.file_name.ends_with("_data.csv"));
        assert!(entry.file_name.starts_with(&entry.value));
        assert!(!entry.label.is_empty());
    }
}

#[tokio::test]
async fn test_statistics_counts_match_total() {
    let Some(client) = ensure_server().await else { return };
    let Some(dataset) = first_dataset(&client).await else { return };

    let stats: Statistics = client
        .get(format!("{}/api/datasets/{}/statistics", api_url(), dataset.value))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid statistics JSON");

    let building_sum: usize = stats.by_building.iter().map(|g| g.count).sum();
    let location_sum: usize = stats.by_location.iter().map(|g| g.count).sum();
    assert_eq!(building_sum, stats.total);
    assert_eq!(location_sum, stats.total);
}

#[tokio::test]
async fn test_blank_search_returns_everything() {
    let Some(client) = ensure_server().await else { return };
    let Some(dataset) = first_dataset(&client).await else { return };

    let all: RecordsPage = client
        .get(format!("{}/api/datasets/{}/records", api_url(), dataset.value))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid records JSON");

    let blank: RecordsPage = client
        .get(format!("{}/api/datasets/{}/records?search=%20%20", api_url(), dataset.value))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid records JSON");

    assert_eq!(all.total_records, blank.total_records);
    assert_eq!(all.page, 1);
    assert!(all.records.len() <= all.total_records);
    assert!(all.total_pages >= 1 || all.total_records == 0);
}

#[tokio::test]
async fn test_unknown_dataset_returns_404() {
    let Some(client) = ensure_server().await else { return };

    let response = client
        .get(format!("{}/api/datasets/no_such_place/statistics", api_url()))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 404, "Unknown dataset should return 404");
}
