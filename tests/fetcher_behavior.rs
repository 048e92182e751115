//! Behaviour of the multi-endpoint retrying fetcher.

mod support;

use std::collections::BTreeMap;
use std::time::Duration;

use hqtick_core::{Charset, FetchError, HttpErrorKind};
use support::{endpoints, fetcher, gbk, ok, status, timeout, RecordingSleeper, ScriptedClient};

#[tokio::test]
async fn every_endpoint_gets_all_attempts_before_giving_up() {
    // Given: two endpoints that always time out and two retries per endpoint
    let client = ScriptedClient::new();
    client.on("primary", vec![timeout()]);
    client.on("fallback", vec![timeout()]);
    let sleeper = RecordingSleeper::new();
    let fetcher = fetcher(client.clone(), sleeper.clone(), 2);

    // When: the fetch runs
    let error = fetcher
        .fetch(
            &endpoints(&["http://primary.test/q", "http://fallback.test/q"]),
            &BTreeMap::new(),
            Charset::Gbk,
        )
        .await
        .expect_err("all endpoints fail");

    // Then: exactly six requests went out, three per endpoint, in order
    let urls = client.urls();
    assert_eq!(urls.len(), 6);
    assert!(urls[..3].iter().all(|url| url.contains("primary")));
    assert!(urls[3..].iter().all(|url| url.contains("fallback")));

    // And: the error names the last endpoint and the final failure
    match error {
        FetchError::Exhausted {
            endpoint,
            attempts,
            source,
        } => {
            assert_eq!(endpoint, "http://fallback.test/q");
            assert_eq!(attempts, 6);
            assert_eq!(source.kind(), HttpErrorKind::Timeout);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // And: sleeps happen only between attempts on the same endpoint
    assert_eq!(sleeper.delays().len(), 4);
}

#[tokio::test]
async fn success_on_second_attempt_never_touches_the_fallback() {
    // Given: a primary that fails once, then answers
    let client = ScriptedClient::new();
    client.on("primary", vec![status(502), ok("var hq_str_x=\"\";")]);
    client.on("fallback", vec![ok("wrong host")]);
    let sleeper = RecordingSleeper::new();
    let fetcher = fetcher(client.clone(), sleeper.clone(), 2);

    // When: the fetch runs
    let text = fetcher
        .fetch(
            &endpoints(&["http://primary.test/q", "http://fallback.test/q"]),
            &BTreeMap::new(),
            Charset::Utf8,
        )
        .await
        .expect("second attempt succeeds");

    // Then: the primary body is returned after two requests and one sleep
    assert_eq!(text, "var hq_str_x=\"\";");
    assert_eq!(client.urls().len(), 2);
    assert!(client.urls().iter().all(|url| url.contains("primary")));
    assert_eq!(sleeper.delays().len(), 1);
}

#[tokio::test]
async fn exhausted_primary_falls_through_without_an_extra_sleep() {
    // Given: a dead primary and a healthy fallback
    let client = ScriptedClient::new();
    client.on("primary", vec![status(503)]);
    client.on("fallback", vec![ok("fine")]);
    let sleeper = RecordingSleeper::new();
    let fetcher = fetcher(client.clone(), sleeper.clone(), 2);

    // When: the fetch runs
    let text = fetcher
        .fetch(
            &endpoints(&["http://primary.test/q", "http://fallback.test/q"]),
            &BTreeMap::new(),
            Charset::Utf8,
        )
        .await
        .expect("fallback succeeds");

    // Then: three primary attempts, one fallback attempt, two sleeps
    assert_eq!(text, "fine");
    assert_eq!(client.urls().len(), 4);
    assert_eq!(sleeper.delays().len(), 2);
}

#[tokio::test]
async fn backoff_grows_exponentially_with_bounded_jitter() {
    // Given: a single endpoint that never answers and three retries
    let client = ScriptedClient::new();
    let sleeper = RecordingSleeper::new();
    let fetcher = fetcher(client, sleeper.clone(), 3);

    // When: the fetch gives up
    let _ = fetcher
        .fetch(&endpoints(&["http://nowhere.test"]), &BTreeMap::new(), Charset::Gbk)
        .await;

    // Then: delays are 1, 2 and 4 units of 500ms, each with under 30% jitter
    let delays = sleeper.delays();
    assert_eq!(delays.len(), 3);
    for (delay, units) in delays.iter().zip([1_u64, 2, 4]) {
        let base = Duration::from_millis(500 * units);
        assert!(*delay >= base, "{delay:?} below {base:?}");
        assert!(*delay < base.mul_f64(1.3), "{delay:?} above jitter bound");
    }
}

#[tokio::test]
async fn gbk_bodies_are_decoded_and_headers_forwarded() {
    // Given: a GBK-encoded quote body and provider headers
    let client = ScriptedClient::new();
    client.on("hq.test", vec![ok(gbk("var hq_str_sh600519=\"贵州茅台\";"))]);
    let sleeper = RecordingSleeper::new();
    let fetcher = fetcher(client.clone(), sleeper, 0);
    let mut headers = BTreeMap::new();
    headers.insert(String::from("Referer"), String::from("https://finance.sina.com.cn/"));

    // When: the fetch runs with the GBK charset
    let text = fetcher
        .fetch(&endpoints(&["http://hq.test/list=sh600519"]), &headers, Charset::Gbk)
        .await
        .expect("fetch succeeds");

    // Then: the Chinese name survives and the request carried header and timeout
    assert!(text.contains("贵州茅台"));
    let request = &client.requests()[0];
    assert_eq!(request.headers["referer"], "https://finance.sina.com.cn/");
    assert_eq!(request.timeout_ms, 1_000);
}

#[tokio::test]
async fn no_endpoints_is_its_own_error() {
    let fetcher = fetcher(ScriptedClient::new(), RecordingSleeper::new(), 2);

    let error = fetcher
        .fetch(&[], &BTreeMap::new(), Charset::Gbk)
        .await
        .expect_err("nothing to fetch");

    assert_eq!(error, FetchError::NoEndpoints);
}
