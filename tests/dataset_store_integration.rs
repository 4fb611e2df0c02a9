//! Dataset store tests against HTTP sources.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scoremate::config::DatasetConfig;
use scoremate::context::format_dataset_summary;
use scoremate::dataset::{DatasetSource, DatasetStore};

mod common;

#[tokio::test]
async fn test_http_source_loads_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/credit_score.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::SAMPLE_CSV))
        .expect(1)
        .mount(&server)
        .await;

    let config = DatasetConfig {
        source: format!("{}/data/credit_score.csv", server.uri()),
        timeout_seconds: 5,
    };
    let store = Arc::new(DatasetStore::from_config(&config).unwrap());
    assert!(matches!(store.source(), DatasetSource::Http(_)));

    let (a, b) = tokio::join!(store.load(), store.load());
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.len(), 3);
    assert!(a.find("c02coqevyu").is_some());

    let stats = a.statistics().unwrap();
    assert_eq!(stats.average, 700);
    assert_eq!(stats.defaulted, 1);
}

#[tokio::test]
async fn test_http_404_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let source = DatasetSource::parse(&format!("{}/missing.csv", server.uri())).unwrap();
    let store = DatasetStore::new(source).with_timeout(Duration::from_secs(5));

    let dataset = store.load().await;
    assert!(dataset.is_fallback());
    assert!(dataset.find("C03PVPPHOY").is_none());
    assert!(format_dataset_summary(dataset.statistics())
        .contains("Customer-level data is currently unavailable."));

    // The fallback is cached: no second request is made
    let again = store.load().await;
    assert!(Arc::ptr_eq(&dataset, &again));
}

#[tokio::test]
async fn test_local_file_source() {
    let (_dir, path) = common::temp_dataset_file(common::SAMPLE_CSV);
    let config = DatasetConfig {
        source: path.to_string_lossy().to_string(),
        timeout_seconds: 5,
    };
    let store = DatasetStore::from_config(&config).unwrap();
    let dataset = store.load().await;
    assert!(!dataset.is_fallback());
    assert_eq!(dataset.statistics().unwrap().total_records, 3);
}
