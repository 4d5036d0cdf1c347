use bridge_demo::demo::{DemoSummary, run_handshake, run_request};

use bridge_core::config::BridgeConfig;

use models::HttpRequestOptions;

use tempfile::TempDir;

/// **VALUE**: Verifies a config saved to disk drives both demo runs and the summary
/// renders as JSON.
///
/// **WHY THIS MATTERS**: This is what the binary does with a config directory argument.
#[tokio::test(start_paused = true)]
async fn given_saved_config_when_demo_run_then_summary_reflects_it() {
    // GIVEN: A config on disk mounting into body with settling disabled
    let dir = TempDir::new().unwrap();
    let mut config = BridgeConfig::default();
    config.loader.parent_selector = Some(String::from("body"));
    config.http = HttpRequestOptions {
        timeout_ms: 2_000,
        redirect_timeout_ms: 0,
    };
    config.save(dir.path()).unwrap();
    let loaded = BridgeConfig::load(dir.path()).unwrap();

    // WHEN: Running both parts
    let summary = DemoSummary {
        handshake: run_handshake(&loaded).unwrap(),
        request: run_request(&loaded).await.unwrap(),
    };

    // THEN: The summary carries both outcomes
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["request"]["data"], "Redirecting...");
    assert_eq!(json["handshake"]["events"][3], "mounted");
    assert_eq!(
        json["handshake"]["session_id"],
        summary.handshake.session_id.as_str()
    );
}
