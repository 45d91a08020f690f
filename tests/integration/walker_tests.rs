//! Integration tests for the channel walker
//!
//! These tests run the walker against a wiremock Discord API and check
//! pagination, filtering, role caching and the retry policy.

use post_harvester::config::{DiscordConfig, HttpConfig};
use post_harvester::discord::{DiscordClient, PageWalker, WalkSettings};
use post_harvester::{ApiError, ExclusionRules, HarvestError};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const GUILD: u64 = 1;
const CHANNEL: u64 = 2;
const MESSAGES_PATH: &str = "/channels/2/messages";

fn http_config() -> HttpConfig {
    HttpConfig {
        timeout_secs: 5,
        max_retries: 3,
        retry_delay_ms: 10,
        enrichment_retry_delay_ms: 10,
        default_retry_after_ms: 10,
    }
}

fn client(server: &MockServer) -> DiscordClient {
    let config = DiscordConfig {
        token: "test-token".to_string(),
        guild_id: GUILD,
        channel_id: CHANNEL,
        api_base: server.uri(),
        page_limit: 2,
        request_delay_ms: 0,
    };
    DiscordClient::new(&config, &http_config()).unwrap()
}

fn settings(max_unique: usize) -> WalkSettings {
    WalkSettings {
        guild_id: GUILD,
        channel_id: CHANNEL,
        max_unique,
        page_delay: Duration::ZERO,
        rules: ExclusionRules::new("Super OG", "billions_ntwk", "billions_ntwk"),
    }
}

fn message(id: &str, author: &str, content: &str) -> Value {
    json!({
        "id": id,
        "content": content,
        "author": {"id": author, "username": format!("user_{}", author), "discriminator": "0"}
    })
}

fn post_link(id: u32) -> String {
    format!("see https://x.com/alice/status/{}?s=20", id)
}

/// Mounts the role catalogue and one member entry per `(user, role id)`
///
/// An empty role id gives the member no roles.
async fn mount_roles(server: &MockServer, members: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path(format!("/guilds/{}/roles", GUILD)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "r1", "name": "Super OG"},
            {"id": "r2", "name": "Member"}
        ])))
        .mount(server)
        .await;

    for (user, role) in members {
        let roles: Vec<&str> = Some(*role).filter(|r| !r.is_empty()).into_iter().collect();
        Mock::given(method("GET"))
            .and(path(format!("/guilds/{}/members/{}", GUILD, user)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "roles": roles })))
            .mount(server)
            .await;
    }
}

/// Mounts history pages; `pages[0]` is the newest page
///
/// Cursor-specific mocks are mounted before the newest-page mock, which would
/// otherwise match every history request.
async fn mount_pages(server: &MockServer, pages: &[(Option<&str>, Value)]) {
    for (before, body) in pages.iter().filter(|(before, _)| before.is_some()) {
        Mock::given(method("GET"))
            .and(path(MESSAGES_PATH))
            .and(query_param("before", before.unwrap_or_default()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(server)
            .await;
    }

    for (_, body) in pages.iter().filter(|(before, _)| before.is_none()) {
        Mock::given(method("GET"))
            .and(path(MESSAGES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(server)
            .await;
    }
}

async fn history_requests(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == MESSAGES_PATH)
        .collect()
}

fn before_param(request: &Request) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == "before")
        .map(|(_, value)| value.into_owned())
}

fn five_messages() -> Vec<(Option<&'static str>, Value)> {
    vec![
        (
            None,
            json!([message("300", "u1", &post_link(1)), message("299", "u1", &post_link(2))]),
        ),
        (
            Some("299"),
            json!([message("200", "u1", &post_link(3)), message("199", "u1", &post_link(4))]),
        ),
        (Some("199"), json!([message("100", "u1", &post_link(5))])),
        (Some("100"), json!([])),
    ]
}

#[tokio::test]
async fn test_walk_stops_mid_page_at_target() {
    let server = MockServer::start().await;
    mount_roles(&server, &[("u1", "")]).await;
    mount_pages(&server, &five_messages()).await;

    let client = client(&server);
    let outcome = PageWalker::new(&client, settings(3)).walk().await.unwrap();

    let ids: Vec<&str> = outcome.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(outcome.jobs[0].canonical_url, "https://x.com/alice/status/1");
    assert_eq!(outcome.pages_fetched, 2);

    let requests = history_requests(&server).await;
    assert_eq!(requests.len(), 2);
    assert_eq!(before_param(&requests[0]), None);
    assert_eq!(before_param(&requests[1]).as_deref(), Some("299"));
}

#[tokio::test]
async fn test_walk_follows_cursor_to_end_of_history() {
    let server = MockServer::start().await;
    mount_roles(&server, &[("u1", "")]).await;
    mount_pages(&server, &five_messages()).await;

    let client = client(&server);
    let outcome = PageWalker::new(&client, settings(50)).walk().await.unwrap();

    assert_eq!(outcome.jobs.len(), 5);
    assert_eq!(outcome.messages_seen, 5);
    assert_eq!(outcome.pages_fetched, 4);

    let cursors: Vec<u64> = history_requests(&server)
        .await
        .iter()
        .filter_map(before_param)
        .map(|c| c.parse().unwrap())
        .collect();
    assert_eq!(cursors, vec![299, 199, 100]);
    assert!(cursors.windows(2).all(|w| w[1] < w[0]));
}

#[tokio::test]
async fn test_role_exclusion_and_later_sighting() {
    let server = MockServer::start().await;
    mount_roles(&server, &[("og", "r1"), ("u1", "r2")]).await;
    mount_pages(
        &server,
        &[
            (
                None,
                json!([
                    message("50", "og", &post_link(7)),
                    message("49", "u1", &post_link(7)),
                    message("48", "og", &post_link(8)),
                ]),
            ),
            (Some("48"), json!([])),
        ],
    )
    .await;

    let client = client(&server);
    let outcome = PageWalker::new(&client, settings(10)).walk().await.unwrap();

    let ids: Vec<&str> = outcome.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["7"]);

    let sources = &outcome.provenance["7"];
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].message_id, "49");
    assert_eq!(sources[0].author_id, "u1");
    assert_eq!(sources[0].author_roles, vec!["Member".to_string()]);
    assert_eq!(sources[0].author_role_ids, vec!["r2".to_string()]);
    assert_eq!(sources[0].message_url, "https://discord.com/channels/1/2/49");
}

#[tokio::test]
async fn test_excluded_link_skips_role_lookup() {
    let server = MockServer::start().await;
    mount_roles(&server, &[("u1", "")]).await;

    // The author of a message with only excluded links is never looked up
    Mock::given(method("GET"))
        .and(path(format!("/guilds/{}/members/u3", GUILD)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"roles": []})))
        .expect(0)
        .mount(&server)
        .await;

    mount_pages(
        &server,
        &[
            (
                None,
                json!([
                    message("20", "u3", "https://x.com/Billions_Ntwk/status/9"),
                    message("19", "u3", "no links here"),
                    message("18", "u1", &post_link(10)),
                ]),
            ),
            (Some("18"), json!([])),
        ],
    )
    .await;

    let client = client(&server);
    let outcome = PageWalker::new(&client, settings(10)).walk().await.unwrap();

    let ids: Vec<&str> = outcome.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["10"]);
    assert!(!outcome.provenance.contains_key("9"));
}

#[tokio::test]
async fn test_member_lookup_happens_once_per_author() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/guilds/{}/roles", GUILD)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/guilds/{}/members/u1", GUILD)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"roles": []})))
        .expect(1)
        .mount(&server)
        .await;

    mount_pages(
        &server,
        &[
            (
                None,
                json!([
                    message("30", "u1", &post_link(1)),
                    message("29", "u1", &post_link(2)),
                    message("28", "u1", &post_link(1)),
                ]),
            ),
            (Some("28"), json!([])),
        ],
    )
    .await;

    let client = client(&server);
    let outcome = PageWalker::new(&client, settings(10)).walk().await.unwrap();

    assert_eq!(outcome.jobs.len(), 2);
    assert_eq!(outcome.provenance["1"].len(), 2);
}

#[tokio::test]
async fn test_failed_role_catalogue_is_not_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/guilds/{}/roles", GUILD)))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/guilds/{}/members/u1", GUILD)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"roles": ["r9"]})))
        .mount(&server)
        .await;

    mount_pages(
        &server,
        &[
            (None, json!([message("5", "u1", &post_link(4))])),
            (Some("5"), json!([])),
        ],
    )
    .await;

    let client = client(&server);
    let outcome = PageWalker::new(&client, settings(10)).walk().await.unwrap();

    // Unknown role ids fall back to the raw id
    assert_eq!(outcome.provenance["4"][0].author_roles, vec!["r9".to_string()]);
}

#[tokio::test]
async fn test_server_errors_exhaust_retry_budget() {
    let server = MockServer::start().await;
    mount_roles(&server, &[]).await;

    Mock::given(method("GET"))
        .and(path(MESSAGES_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let client = client(&server);
    let result = PageWalker::new(&client, settings(10)).walk().await;

    match result {
        Err(HarvestError::Source(ApiError::Server { status, .. })) => assert_eq!(status, 500),
        other => panic!("expected server error, got {:?}", other.map(|o| o.jobs)),
    }
}

#[tokio::test]
async fn test_client_error_is_fatal_without_retry() {
    let server = MockServer::start().await;
    mount_roles(&server, &[]).await;

    Mock::given(method("GET"))
        .and(path(MESSAGES_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "401: Unauthorized"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let result = PageWalker::new(&client, settings(10)).walk().await;

    assert!(matches!(
        result,
        Err(HarvestError::Source(ApiError::Status { status: 401, .. }))
    ));
}

#[tokio::test]
async fn test_rate_limit_is_waited_out_without_using_budget() {
    let server = MockServer::start().await;
    mount_roles(&server, &[("u1", "")]).await;

    // More 429s than the retry budget allows; none of them count
    Mock::given(method("GET"))
        .and(path(MESSAGES_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"retry_after": 0.01})))
        .up_to_n_times(4)
        .mount(&server)
        .await;

    mount_pages(
        &server,
        &[
            (Some("7"), json!([])),
            (None, json!([message("7", "u1", &post_link(3))])),
        ],
    )
    .await;

    let client = client(&server);
    let outcome = PageWalker::new(&client, settings(10)).walk().await.unwrap();

    assert_eq!(outcome.jobs.len(), 1);
    assert_eq!(history_requests(&server).await.len(), 6);
}

#[tokio::test]
async fn test_unreachable_source_is_fatal_after_retries() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = DiscordConfig {
        token: "test-token".to_string(),
        guild_id: GUILD,
        channel_id: CHANNEL,
        api_base: format!("http://{}", addr),
        page_limit: 2,
        request_delay_ms: 0,
    };
    let client = DiscordClient::new(&config, &http_config()).unwrap();

    let result = PageWalker::new(&client, settings(10)).walk().await;

    match result {
        Err(HarvestError::Source(ApiError::Transport { url, .. })) => {
            assert!(url.contains("/channels/2/messages"));
        }
        other => panic!("expected transport error, got {:?}", other.map(|o| o.jobs)),
    }
}
