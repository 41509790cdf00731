use std::borrow::Cow;

use bytes::Bytes;
use futures_util::Stream;
use serde::Serialize;
use url::Url;

pub const BASE_URL: &str = "http://localhost:11434/api/";

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: Cow<'a, str>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: Cow<'a, str>,
}

pub async fn stream_post<T: Serialize + ?Sized>(
    http_client: &reqwest::Client,
    url: Url,
    api_key: Option<&str>,
    body: &T,
) -> reqwest::Result<impl Stream<Item = reqwest::Result<Bytes>>> {
    let mut request = http_client.post(url).json(body);

    if let Some(api_key) = api_key {
        request = request.bearer_auth(api_key);
    }

    let response = request.send().await?.error_for_status()?;
    log::debug!("{} {}", response.status(), response.url().path());

    Ok(response.bytes_stream())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_request_bodies() {
        let generate = GenerateRequest {
            model: "deepseek-coder-v2",
            prompt: Cow::Borrowed("Your prompt here"),
            stream: true,
        };
        assert_eq!(
            serde_json::to_string(&generate).unwrap(),
            r#"{"model":"deepseek-coder-v2","prompt":"Your prompt here","stream":true}"#
        );

        let chat = ChatRequest {
            model: "deepseek-coder-v2",
            messages: vec![ChatMessage { role: "user", content: Cow::Borrowed("hi") }],
            stream: true,
        };
        assert_eq!(
            serde_json::to_string(&chat).unwrap(),
            r#"{"model":"deepseek-coder-v2","messages":[{"role":"user","content":"hi"}],"stream":true}"#
        );
    }

    #[test]
    fn test_base_url() {
        let base = Url::parse(BASE_URL).unwrap();

        assert_eq!(base.join("generate").unwrap().as_str(), "http://localhost:11434/api/generate");
        assert_eq!(base.join("chat").unwrap().as_str(), "http://localhost:11434/api/chat");
    }
}
