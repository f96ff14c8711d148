//! Gauge provider and block lookup tests against mock upstream APIs

use chrono::{TimeZone, Utc};
use gauge_vote::config::Endpoints;
use gauge_vote::gauges::{provider_for, GaugeProvider, PendleGauges};
use gauge_vote::http::HttpClient;
use gauge_vote::schedule::BlockClient;
use gauge_vote::Space;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer, space: Space) -> Box<dyn GaugeProvider> {
    let http = HttpClient::new().unwrap();
    provider_for(space, &http, &Endpoints::all_at(&server.uri()))
}

#[tokio::test]
async fn curve_filters_killed_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/getAllGauges"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            // Raw body: key order is part of what is under test
            r#"{
                "success": true,
                "data": {
                    "ethereum/tricrypto2": {"gauge": "0xDeFd8FdD20e0f34115C7018CCfb655796F6B2168", "hasNoCrv": false, "is_killed": false},
                    "ethereum/dead": {"gauge": "0x0000000000000000000000000000000000000001", "is_killed": true},
                    "ethereum/3pool": {"gauge": "0xbFcF63294aD7105dEa65aA58F8AE5BE2D9d0952A"},
                    "fantom/nocrv": {"gauge": "0x0000000000000000000000000000000000000002", "hasNoCrv": true}
                }
            }"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let gauges = provider(&server, Space::Crv).fetch_gauges().await.unwrap();
    assert_eq!(
        gauges,
        vec![
            "ethereum/tricrypto2 - 0xDeFd8FdD20e0f34…68".to_string(),
            "ethereum/3pool - 0xbFcF63294aD7105…2A".to_string(),
        ]
    );
}

#[tokio::test]
async fn balancer_excludes_testnets_and_killed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/balancer/voting-gauges.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"address": "0xb78543e00712C3ABBA10D0852f6E38FDE2AaBA4d", "network": 1, "isKilled": false, "pool": {"symbol": "veBAL"}},
            {"address": "0x0000000000000000000000000000000000000005", "network": 5, "isKilled": false, "pool": {"symbol": "GOERLI"}},
            {"address": "0x0000000000000000000000000000000000000042", "network": 42, "isKilled": false, "pool": {"symbol": "KOVAN"}},
            {"address": "0x0000000000000000000000000000000000000099", "network": 137, "isKilled": true, "pool": {"symbol": "KILLED"}},
            {"address": "0xfb0265841C49A6b19D70055E596b212B0dA3f606", "network": 137, "isKilled": false, "pool": {"symbol": "B-stMATIC-STABLE"}}
        ])))
        .mount(&server)
        .await;

    let gauges = provider(&server, Space::Bal).fetch_gauges().await.unwrap();
    assert_eq!(
        gauges,
        vec![
            "veBAL - 0xb78543e00712C3A…4d".to_string(),
            "B-stMATIC-STABLE - 0xfb0265841C49A6b…06".to_string(),
        ]
    );
}

#[tokio::test]
async fn angle_skips_deprecated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/dao"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "gauges": {
                "list": {
                    "0x3785Ce82be62a342052b9E5431e9D3a839cfB581": {
                        "name": "agEUR/ETH", "address": "0x3785Ce82be62a342052b9E5431e9D3a839cfB581", "deprecated": false
                    },
                    "0x0000000000000000000000000000000000000abc": {
                        "name": "old", "address": "0x0000000000000000000000000000000000000abc", "deprecated": true
                    }
                }
            }
        })))
        .mount(&server)
        .await;

    let gauges = provider(&server, Space::Angle).fetch_gauges().await.unwrap();
    assert_eq!(gauges, vec!["agEUR/ETH - 0x3785Ce82be62a34…81".to_string()]);
}

#[tokio::test]
async fn frax_lists_every_gauge() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/gauges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "gauges": [
                {"name": "Convex FRAXBP", "address": "0x963f487796d54d2f27bA6F3Fbe91154cA103b199"},
                {"name": "Fraxswap FRAX/FXS", "address": "0xdb7cbbb1d5D5124F86E92001C9dFDC37a7ff8Fa6"}
            ]
        })))
        .mount(&server)
        .await;

    let gauges = provider(&server, Space::Fxs).fetch_gauges().await.unwrap();
    assert_eq!(
        gauges,
        vec![
            "Convex FRAXBP - 0x963f487796d54d2…99".to_string(),
            "Fraxswap FRAX/FXS - 0xdb7cbbb1d5D5124…a6".to_string(),
        ]
    );
}

#[tokio::test]
async fn pendle_formats_chain_and_full_address() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/core/v1/1/markets"))
        .and(query_param("limit", "20"))
        .and(query_param("is_expired", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "results": [
                {"address": "0xd0354d4e7bcf345fb117cabe41acadb724eccca2", "pt": {"name": "PT stETH", "chainId": 1}},
                {"address": "0x08a152834de126d2ef83d612ff36e4523fd0017f", "pt": {"name": "rETH-WETH", "chainId": 42161}}
            ]
        })))
        .mount(&server)
        .await;

    let http = HttpClient::new().unwrap();
    let gauges = PendleGauges::new(http, &server.uri()).fetch_gauges().await.unwrap();
    assert_eq!(
        gauges,
        vec![
            "stETH - 1-0xd0354d4e7bcf345fb117cabe41acadb724eccca2".to_string(),
            "rETH-WETH - 42161-0x08a152834de126d2ef83d612ff36e4523fd0017f".to_string(),
        ]
    );
}

#[tokio::test]
async fn http_error_fails_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/gauges"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = provider(&server, Space::Fxs).fetch_gauges().await.unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Failed to fetch Frax gauges"));
    assert!(message.contains("502"));
}

#[tokio::test]
async fn malformed_shape_fails_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/dao"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"gauges": []})))
        .mount(&server)
        .await;

    let result = provider(&server, Space::Angle).fetch_gauges().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn block_lookup_uses_snapshot_timestamp() {
    let server = MockServer::start().await;
    let now = Utc.with_ymd_and_hms(2024, 3, 14, 17, 45, 0).unwrap();
    let two_am = Utc.with_ymd_and_hms(2024, 3, 14, 2, 0, 0).unwrap().timestamp();

    Mock::given(method("GET"))
        .and(path(format!("/block/ethereum/{}", two_am)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"height": 19_431_000, "timestamp": two_am - 5})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let blocks = BlockClient::new(HttpClient::new().unwrap(), &server.uri());
    assert_eq!(blocks.resolve_snapshot_block(now).await.unwrap(), 19_431_000);
}

#[tokio::test]
async fn block_lookup_without_height_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    let blocks = BlockClient::new(HttpClient::new().unwrap(), &server.uri());
    assert!(blocks.block_at("ethereum", 1_700_000_000).await.is_err());
}
