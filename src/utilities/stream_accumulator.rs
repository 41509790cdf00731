use std::future::Future;
use std::pin::pin;
use std::str;

use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;

use super::line_stream;

#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct StreamLine {
    #[serde(flatten)]
    pub chunk: StreamChunk,
    #[serde(default)]
    pub done: Option<Value>,
}

impl StreamLine {
    pub fn is_done(&self) -> bool {
        self.done.as_ref().is_some_and(truthy)
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(value) => *value,
        Value::Number(value) => value.as_f64().is_some_and(|value| value != 0.0),
        Value::String(value) => !value.is_empty(),
        Value::Array(value) => !value.is_empty(),
        Value::Object(value) => !value.is_empty(),
    }
}

// variants are tried in order, so `response` wins over `message`
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StreamChunk {
    Completion { response: String },
    Chat { message: ChatDelta },
    Other {},
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct ChatDelta {
    pub content: String,
}

impl StreamChunk {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Completion { response } => Some(response),
            Self::Chat { message } => Some(&message.content),
            Self::Other {} => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Done,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Accumulated {
    pub text: String,
    pub done: bool,
    pub interrupted: bool,
}

#[derive(Default)]
pub struct StreamAccumulator {
    text: String,
    done: bool,
}

impl StreamAccumulator {
    pub fn push_line(&mut self, line: &[u8]) -> LineOutcome {
        let Ok(line) = str::from_utf8(line) else {
            log::warn!("skipping line that is not valid UTF-8: {}", String::from_utf8_lossy(line));
            return LineOutcome::Continue;
        };

        if line.trim().is_empty() {
            return LineOutcome::Continue;
        }

        let parsed = match serde_json::from_str::<StreamLine>(line) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("error decoding JSON: {err}: {line}");
                return LineOutcome::Continue;
            }
        };

        log::debug!("chunk: {line}");

        if let Some(text) = parsed.chunk.text() {
            self.text.push_str(text);
        }

        if parsed.is_done() {
            self.done = true;
            LineOutcome::Done
        } else {
            LineOutcome::Continue
        }
    }

    pub fn finish(self, interrupted: bool) -> Accumulated {
        Accumulated { text: self.text, done: self.done, interrupted }
    }
}

pub async fn accumulate<S, B, E, I>(chunks: S, interrupt: I) -> Result<Accumulated, E>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    I: Future<Output = ()>,
{
    let mut lines = pin!(line_stream::lines(chunks));
    let mut interrupt = pin!(interrupt);
    let mut accumulator = StreamAccumulator::default();

    loop {
        tokio::select! {
            biased;

            line = lines.next() => {
                let Some(line) = line else {
                    break;
                };

                if accumulator.push_line(&line?) == LineOutcome::Done {
                    break;
                }
            }
            () = &mut interrupt => {
                log::warn!("interrupted by user");
                return Ok(accumulator.finish(true));
            }
        }
    }

    Ok(accumulator.finish(false))
}
