//! In-memory transport and sleeper fakes shared by the behaviour tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hqtick_core::{
    FetchPolicy, HttpClient, HttpError, HttpRequest, HttpResponse, ResilientFetcher, RetryConfig,
    Sleeper,
};

pub type Reply = Result<HttpResponse, HttpError>;

pub const MAOTAI_LINE: &str = "var hq_str_sh600519=\"贵州茅台,1500.00,1498.00,1510.50,1515.00,1495.00,1510.40,1510.50,2345600,3541234567.00,100,1510.40,200,1510.30,300,1510.20,400,1510.10,500,1510.00,50,1510.50,60,1510.60,70,1510.70,80,1510.80,90,1510.90,2024-09-13,15:00:03,00\";";

pub const TENCENT_LINE: &str = "var hq_str_hk00700=\"TENCENT,腾讯控股,380.000,378.200,385.600,377.000,384.800,6.600,1.745,384.600,384.800,7654321000.000,19876543,15.123,0.870,542.000,260.200,2024/09/13,16:08\";";

struct Route {
    needle: String,
    replies: VecDeque<Reply>,
    last: Reply,
}

/// Answers requests by URL substring; the last scripted reply of a route repeats.
///
/// Unmatched URLs fail with a connect error.
#[derive(Default)]
pub struct ScriptedClient {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, needle: &str, replies: Vec<Reply>) {
        let mut replies: VecDeque<Reply> = replies.into();
        let last = replies
            .back()
            .cloned()
            .unwrap_or_else(|| Err(HttpError::connect("no reply scripted")));
        if replies.len() == 1 {
            replies.clear();
        }
        self.routes
            .lock()
            .expect("routes lock")
            .push(Route {
                needle: needle.to_owned(),
                replies,
                last,
            });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.url).collect()
    }

    fn reply_for(&self, url: &str) -> Reply {
        let mut routes = self.routes.lock().expect("routes lock");
        match routes.iter_mut().find(|route| url.contains(&route.needle)) {
            Some(route) => route.replies.pop_front().unwrap_or_else(|| route.last.clone()),
            None => Err(HttpError::connect(format!("no route for {url}"))),
        }
    }
}

impl HttpClient for ScriptedClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let reply = self.reply_for(&request.url);
        self.requests.lock().expect("requests lock").push(request);
        Box::pin(async move { reply })
    }
}

/// Records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().expect("delays lock").clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        self.delays.lock().expect("delays lock").push(duration);
        Box::pin(async {})
    }
}

pub fn ok(body: impl Into<Vec<u8>>) -> Reply {
    Ok(HttpResponse::ok(body))
}

pub fn status(code: u16) -> Reply {
    Ok(HttpResponse::with_status(code, Vec::new()))
}

pub fn timeout() -> Reply {
    Err(HttpError::timeout("request timed out"))
}

pub fn gbk(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding_rs::GBK.encode(text);
    assert!(!had_errors, "fixture must be GBK-encodable");
    bytes.into_owned()
}

pub fn fetcher(
    client: Arc<ScriptedClient>,
    sleeper: Arc<RecordingSleeper>,
    max_retries: u32,
) -> ResilientFetcher {
    ResilientFetcher::new(
        client,
        FetchPolicy {
            timeout_ms: 1_000,
            retry: RetryConfig::exponential(max_retries),
        },
    )
    .with_sleeper(sleeper)
}

pub fn endpoints(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|url| url.to_string()).collect()
}
