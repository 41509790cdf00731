use std::error::Error;

pub fn describe_error(err: &reqwest::Error) -> String {
    err.source().map_or_else(|| err.to_string(), |source| format!("{err}: {source}"))
}
