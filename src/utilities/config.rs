use std::env;
use std::fs::File;
use std::path::Path;

pub const OLLAMA_API_KEY: &str = "OLLAMA_API_KEY";
pub const GROQ_API_KEY: &str = "GROQ_API_KEY";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub ollama_api_key: Option<String>,
    pub groq_api_key: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self::from_dotenv(dotenvy::dotenv_iter())
    }

    pub fn load_from(path: &Path) -> Self {
        Self::from_dotenv(dotenvy::from_path_iter(path))
    }

    fn from_dotenv(file: dotenvy::Result<dotenvy::Iter<File>>) -> Self {
        let file = file.map_err(|err| report_dotenv_error(&err)).ok();

        Self::from_layers(file.into_iter().flatten().filter_map(dotenv_entry), |key| {
            env::var(key).ok()
        })
    }

    pub fn from_layers<I, F>(file: I, environment: F) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        for (key, value) in file {
            config.set(&key, value);
        }

        for key in [OLLAMA_API_KEY, GROQ_API_KEY] {
            if let Some(value) = environment(key) {
                config.set(key, value);
            }
        }

        log::debug!(
            "credentials: {OLLAMA_API_KEY} {}, {GROQ_API_KEY} {}",
            presence(config.ollama_api_key.as_deref()),
            presence(config.groq_api_key.as_deref())
        );

        config
    }

    pub fn ollama_api_key(&self) -> Option<&str> {
        self.ollama_api_key.as_deref()
    }

    pub fn credentials(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (OLLAMA_API_KEY, self.ollama_api_key.as_deref()),
            (GROQ_API_KEY, self.groq_api_key.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
    }

    fn set(&mut self, key: &str, value: String) {
        if value.is_empty() {
            return;
        }

        match key {
            OLLAMA_API_KEY => self.ollama_api_key = Some(value),
            GROQ_API_KEY => self.groq_api_key = Some(value),
            _ => (),
        }
    }
}

fn dotenv_entry(entry: dotenvy::Result<(String, String)>) -> Option<(String, String)> {
    entry.map_err(|err| log::warn!("skipping .env entry: {err}")).ok()
}

fn report_dotenv_error(err: &dotenvy::Error) {
    if err.not_found() {
        log::debug!("no .env file found");
    } else {
        log::warn!("failed to read .env file: {err}");
    }
}

const fn presence(value: Option<&str>) -> &'static str {
    if value.is_some() { "set" } else { "unset" }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    fn no_environment(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_file_layer() {
        let config = Config::from_layers(
            [
                (OLLAMA_API_KEY.into(), "file-ollama".into()),
                ("UNRELATED".into(), "ignored".into()),
            ],
            no_environment,
        );

        assert_eq!(
            config,
            Config { ollama_api_key: Some("file-ollama".into()), groq_api_key: None }
        );
    }

    #[test]
    fn test_environment_overrides_file() {
        let config = Config::from_layers(
            [
                (OLLAMA_API_KEY.into(), "file-ollama".into()),
                (GROQ_API_KEY.into(), "file-groq".into()),
            ],
            |key| (key == GROQ_API_KEY).then(|| "env-groq".into()),
        );

        assert_eq!(config.ollama_api_key(), Some("file-ollama"));
        assert_eq!(config.groq_api_key.as_deref(), Some("env-groq"));
    }

    #[test]
    fn test_absent_credentials_stay_unset() {
        let config = Config::from_layers([], no_environment);

        assert_eq!(config, Config::default());
        assert_eq!(config.credentials().count(), 0);
    }

    #[test]
    fn test_empty_value_is_unset() {
        let config = Config::from_layers([(GROQ_API_KEY.into(), String::new())], no_environment);

        assert_eq!(config.groq_api_key, None);
    }

    #[test]
    fn test_credentials() {
        let config = Config { ollama_api_key: None, groq_api_key: Some("gsk".into()) };

        assert_eq!(config.credentials().collect::<Vec<_>>(), vec![(GROQ_API_KEY, "gsk")]);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join(".env"));

        let from_environment = env::var(GROQ_API_KEY).ok().filter(|value| !value.is_empty());
        assert_eq!(config.groq_api_key, from_environment);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "# credentials\nGROQ_API_KEY=gsk-file\nOTHER=1\n").unwrap();

        let config = Config::load_from(&path);

        let from_environment = env::var(GROQ_API_KEY).ok().filter(|value| !value.is_empty());
        assert_eq!(config.groq_api_key, Some(from_environment.unwrap_or_else(|| "gsk-file".into())));

        let entries = dotenvy::from_path_iter(&path)
            .unwrap()
            .filter_map(dotenv_entry)
            .collect::<Vec<_>>();
        assert_eq!(
            entries,
            [(String::from(GROQ_API_KEY), String::from("gsk-file")), ("OTHER".into(), "1".into())]
        );
    }
}
