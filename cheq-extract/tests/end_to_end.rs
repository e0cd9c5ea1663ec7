use cheq_extract::configuration::{Credentials, Endpoints, ExtractConfig};
use cheq_extract::error::ExtractError;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str = "Timestamp,IP,User Agent,Platform Origin,Campaign Name,Source,URL,Device,Detection,Threat Group,Term,Platform,Medium,Content,GTM Events";

async fn stub_platform(data_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authorize"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "T1"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/data"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"timestamp": "t", "ip": "1.2.3.4", "gtmEvents": ["view", "click"]}]
        })))
        .expect(data_calls)
        .mount(&server)
        .await;
    server
}

fn config_for(server: &MockServer, output_dir: &std::path::Path) -> ExtractConfig {
    let credentials = Credentials {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
    };
    ExtractConfig::new(credentials)
        .with_endpoints(Endpoints {
            auth_url: format!("{}/authorize", server.uri()),
            data_url: format!("{}/data", server.uri()),
        })
        .with_output_dir(output_dir.to_path_buf())
}

#[tokio::test]
async fn five_pages_are_written_with_joined_events() {
    let server = stub_platform(5).await;
    let temp_dir = TempDir::new().unwrap();

    let summary = cheq_extract::run(&config_for(&server, temp_dir.path()))
        .await
        .unwrap();

    assert_eq!(summary.files.len(), 5);
    assert_eq!(summary.records_written, 5);
    for page in 1..=5 {
        let file = temp_dir.path().join(format!("page_{}.csv", page));
        assert_eq!(summary.files[page - 1], file);
        let contents = std::fs::read_to_string(&file).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec![HEADER, "t,1.2.3.4,,,,,,,,,,,,,\"view,click\""]);
    }
}

#[tokio::test]
async fn every_page_is_requested_once_for_the_same_window() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authorize"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "T1"})),
        )
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, temp_dir.path());
    let date_window = common_utils::date_utils::DateWindow::for_run();
    for page in 1..=5 {
        Mock::given(method("POST"))
            .and(path("/data"))
            .and(body_partial_json(serde_json::json!({
                "startDate": date_window.start_date(),
                "endDate": date_window.end_date(),
                "page": page
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let summary = cheq_extract::run_for_window(&config, date_window.clone())
        .await
        .unwrap();
    assert_eq!(summary.date_window, date_window);
    assert_eq!(summary.records_written, 0);
}

#[tokio::test]
async fn write_failure_stops_the_run_and_keeps_earlier_pages() {
    let server = stub_platform(3).await;
    let temp_dir = TempDir::new().unwrap();
    // A directory where page 3 should go makes its file uncreatable.
    std::fs::create_dir(temp_dir.path().join("page_3.csv")).unwrap();

    let result = cheq_extract::run(&config_for(&server, temp_dir.path())).await;

    match result {
        Err(ExtractError::Write { page, .. }) => assert_eq!(page, 3),
        other => panic!("expected a write error, got {:?}", other),
    }
    for page in 1..=2 {
        let contents =
            std::fs::read_to_string(temp_dir.path().join(format!("page_{}.csv", page))).unwrap();
        assert!(contents.starts_with(HEADER));
    }
    assert!(!temp_dir.path().join("page_4.csv").exists());
    assert!(!temp_dir.path().join("page_5.csv").exists());
}

#[tokio::test]
async fn failed_authentication_fetches_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authorize"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let result = cheq_extract::run(&config_for(&server, temp_dir.path())).await;

    assert!(matches!(result, Err(ExtractError::Auth(_))));
    assert!(!temp_dir.path().join("page_1.csv").exists());
}

#[tokio::test]
async fn persistent_fetch_failure_aborts_remaining_pages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authorize"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "T1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/data"))
        .and(body_partial_json(serde_json::json!({"page": 2})))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let result = cheq_extract::run(&config_for(&server, temp_dir.path())).await;

    match result {
        Err(err @ ExtractError::Fetch { .. }) => {
            assert_eq!(err.page(), Some(2));
            assert!(err.to_string().contains("boom"));
        }
        other => panic!("expected a fetch error, got {:?}", other),
    }
    assert!(temp_dir.path().join("page_1.csv").exists());
    assert!(!temp_dir.path().join("page_2.csv").exists());
}

#[tokio::test]
async fn records_without_ip_are_kept_with_an_empty_cell() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authorize"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "T1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"timestamp": "t1", "gtmEvents": 7},
                {"timestamp": "t2", "ip": "1.2.3.4"}
            ]
        })))
        .expect(5)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let summary = cheq_extract::run(&config_for(&server, temp_dir.path()))
        .await
        .unwrap();

    assert_eq!(summary.records_written, 10);
    let contents = std::fs::read_to_string(temp_dir.path().join("page_1.csv")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            HEADER,
            "t1,,,,,,,,,,,,,,7",
            "t2,1.2.3.4,,,,,,,,,,,,,",
        ]
    );
}
