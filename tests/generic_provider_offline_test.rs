//! Generic provider tests that never touch the network.

mod support;

use provision_licenses::execution::http::RequestPayload;
use provision_licenses::prelude::*;
use serde_json::json;
use support::{RecordingTransport, json_response};

fn create_only() -> GenericConfiguration {
    GenericConfiguration::builder()
        .access_token("token")
        .create_endpoint("https://licenses.example.com/create", HttpMethod::Post)
        .build()
        .unwrap()
}

#[tokio::test]
async fn unconfigured_operations_fail_before_any_request() {
    let transport = RecordingTransport::new();
    let provider = GenericProvider::with_transport(create_only(), transport.clone());

    let suspend = provider.suspend(SuspendParams::new("LK-1")).await.unwrap_err();
    assert_eq!(suspend.kind(), ErrorKind::NotConfigured);
    assert_eq!(
        suspend.to_string(),
        "No suspend endpoint set in this configuration"
    );

    let usage = provider
        .get_usage_data(GetUsageParams::new("LK-1"))
        .await
        .unwrap_err();
    assert_eq!(usage.kind(), ErrorKind::NotConfigured);

    let renew = provider.renew(RenewParams::new("LK-1")).await.unwrap_err();
    assert_eq!(renew.kind(), ErrorKind::NotSupported);

    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn configuration_from_flat_settings() {
    let transport = RecordingTransport::replying([json_response(
        200,
        json!({"data": {"license_key": "LK-9"}, "result": "success"}),
    )]);
    let configuration = GenericConfiguration::from_value(json!({
        "access_token": "",
        "create_endpoint_url": "https://licenses.example.com/create",
        "create_endpoint_http_method": "GET",
        "has_reissue": "1",
        "reissue_endpoint_url": "https://licenses.example.com/reissue",
        "reissue_endpoint_http_method": "patch",
        "debug": "0"
    }))
    .unwrap();
    assert!(configuration.access_token().is_none());
    assert!(!configuration.debug());

    let provider = GenericProvider::with_transport(configuration, transport.clone());
    let result = provider
        .reissue(ReissueParams::new("LK-1"))
        .await
        .unwrap_err();
    // The reply has no top-level license key.
    assert_eq!(result.kind(), ErrorKind::ResponseMissingLicenseKey);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Patch);
    assert_eq!(requests[0].url, "https://licenses.example.com/reissue");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn usage_data_is_returned_whole() {
    let body = json!({"units_consumed": 4.9, "sites": ["a.example", "b.example"]});
    let transport = RecordingTransport::replying([json_response(200, body.clone())]);
    let configuration = GenericConfiguration::builder()
        .create_endpoint("https://licenses.example.com/create", HttpMethod::Post)
        .endpoint(
            Operation::GetUsageData,
            "https://licenses.example.com/usage",
            HttpMethod::Get,
        )
        .build()
        .unwrap();
    let provider = GenericProvider::with_transport(configuration, transport.clone());

    let extra = json!({"period": "month"}).as_object().cloned().unwrap();
    let result = provider
        .get_usage_data(GetUsageParams::new("LK-1").with_extra(extra))
        .await
        .unwrap();

    assert_eq!(result.units_consumed, Some(4));
    assert_eq!(result.usage_data, Some(body));

    let requests = transport.requests();
    match &requests[0].payload {
        RequestPayload::Query(pairs) => {
            assert!(pairs.contains(&("license_key".to_string(), "LK-1".to_string())));
            assert!(pairs.contains(&("period".to_string(), "month".to_string())));
            assert!(!pairs.iter().any(|(key, _)| key == "extra"));
        }
        other => panic!("expected a query payload, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_units_are_reported() {
    let transport =
        RecordingTransport::replying([json_response(200, json!({"units_consumed": "many"}))]);
    let configuration = GenericConfiguration::builder()
        .create_endpoint("https://licenses.example.com/create", HttpMethod::Post)
        .endpoint(
            Operation::GetUsageData,
            "https://licenses.example.com/usage",
            HttpMethod::Post,
        )
        .build()
        .unwrap();
    let provider = GenericProvider::with_transport(configuration, transport);

    let error = provider
        .get_usage_data(GetUsageParams::new("LK-1"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::ResponseMissingUsageData);
    assert_eq!(
        error.to_string(),
        "Unable to parse units_consumed from service response"
    );
}

#[tokio::test]
async fn transport_failures_propagate() {
    let transport = RecordingTransport::new();
    let provider = GenericProvider::with_transport(create_only(), transport.clone());

    let error = provider
        .create(CreateParams::new("Jane Doe", "jane@example.com"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Transport);
    assert_eq!(transport.call_count(), 1);
}
