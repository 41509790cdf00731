use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::apis::ollama::{self, ChatMessage, ChatRequest, GenerateRequest};
use crate::utilities::api_utils::describe_error;
use crate::utilities::stream_accumulator::{self, Accumulated};

pub const MODEL: &str = "deepseek-coder-v2";
pub const TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Generate,
    Chat,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Chat => "chat",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Generate => "Generate",
            Self::Chat => "Chat",
        }
    }

    pub fn payload(self) -> Payload<'static> {
        match self {
            Self::Generate => Payload::Generate(GenerateRequest {
                model: MODEL,
                prompt: Cow::Borrowed("Your prompt here"),
                stream: true,
            }),
            Self::Chat => Payload::Chat(ChatRequest {
                model: MODEL,
                messages: vec![ChatMessage {
                    role: "user",
                    content: Cow::Borrowed("Your message here"),
                }],
                stream: true,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Payload<'a> {
    Generate(GenerateRequest<'a>),
    Chat(ChatRequest<'a>),
}

#[derive(Debug)]
pub enum ProbeError {
    Url(url::ParseError),
    Reqwest(reqwest::Error),
}

impl From<url::ParseError> for ProbeError {
    fn from(value: url::ParseError) -> Self {
        Self::Url(value)
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(value: reqwest::Error) -> Self {
        Self::Reqwest(value.without_url())
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(err) => write!(f, "invalid endpoint URL: {err}"),
            Self::Reqwest(err) => f.write_str(&describe_error(err)),
        }
    }
}

impl std::error::Error for ProbeError {}

pub struct Probe {
    http_client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl Probe {
    pub fn new(base_url: Url, api_key: Option<String>) -> reqwest::Result<Self> {
        let http_client =
            Client::builder().connect_timeout(TIMEOUT).read_timeout(TIMEOUT).build()?;

        Ok(Self { http_client, base_url, api_key })
    }

    pub async fn run<I>(&self, endpoint: Endpoint, interrupt: I) -> Result<Accumulated, ProbeError>
    where
        I: Future<Output = ()>,
    {
        let url = self.base_url.join(endpoint.path())?;
        let api_key = self.api_key.as_deref();
        log::info!("testing the {} endpoint", endpoint.path());

        let payload = endpoint.payload();
        let mut interrupt = pin!(interrupt);

        let chunks = tokio::select! {
            chunks = ollama::stream_post(&self.http_client, url, api_key, &payload) => chunks?,
            () = &mut interrupt => {
                log::warn!("interrupted by user while waiting for the {} endpoint", endpoint.path());
                return Ok(Accumulated { interrupted: true, ..Accumulated::default() });
            }
        };

        Ok(stream_accumulator::accumulate(chunks, interrupt).await?)
    }

    /// Runs every endpoint in order, stopping after an interrupted one.
    pub async fn run_all<I, F>(&self, interrupt: I, mut on_result: F) -> usize
    where
        I: Future<Output = ()>,
        F: FnMut(Endpoint, &Result<Accumulated, ProbeError>),
    {
        let mut interrupt = pin!(interrupt);
        let mut completed = 0;

        for endpoint in [Endpoint::Generate, Endpoint::Chat] {
            let result = self.run(endpoint, interrupt.as_mut()).await;
            on_result(endpoint, &result);
            completed += 1;

            if result.as_ref().is_ok_and(|accumulated| accumulated.interrupted) {
                break;
            }
        }

        completed
    }
}

pub fn report(endpoint: Endpoint, result: &Result<Accumulated, ProbeError>) -> String {
    match result {
        Ok(accumulated) => format!("Full {} Response: {}", endpoint.label(), accumulated.text),
        Err(ProbeError::Reqwest(err)) if err.is_timeout() => "Request timed out".into(),
        Err(err) => format!("Error with {} endpoint: {err}", endpoint.path()),
    }
}
