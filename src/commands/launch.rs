use std::fmt;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::str::FromStr;

use tokio::process::Command;

use crate::utilities::config::Config;

pub const DEFAULT_PROGRAM: &str = "aider";
pub const INVALID_MODEL_MESSAGE: &str = "Invalid model specified. Use 'ollama' or 'groq'.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSelector {
    Ollama,
    Groq,
}

impl ModelSelector {
    pub const fn model_id(self) -> &'static str {
        match self {
            Self::Ollama => "ollama/deepseek-coder-v2",
            Self::Groq => "groq/llama3-70b-8192",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidModel(pub String);

impl fmt::Display for InvalidModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid model {:?}", self.0)
    }
}

impl std::error::Error for InvalidModel {}

impl FromStr for ModelSelector {
    type Err = InvalidModel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ollama" => Ok(Self::Ollama),
            "groq" => Ok(Self::Groq),
            _ => Err(InvalidModel(value.into())),
        }
    }
}

pub struct Launcher {
    program: String,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Launcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn command(&self, model_id: &str, config: &Config) -> Command {
        let mut command = Command::new(&self.program);

        command
            .arg("--model")
            .arg(model_id)
            .envs(config.credentials())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        command
    }

    pub async fn launch(&self, selector: ModelSelector, config: &Config) -> io::Result<ExitStatus> {
        let model_id = selector.model_id();
        log::info!("starting {} --model {model_id}", self.program);

        let status = self.command(model_id, config).status().await?;

        if status.success() {
            log::info!("{} exited", self.program);
        } else {
            log::warn!("{} exited with {status}", self.program);
        }

        Ok(status)
    }

    /// Returns `None` without starting anything when `model` is not a known selector.
    pub async fn run(&self, model: &str, config: &Config) -> Option<io::Result<ExitStatus>> {
        match model.parse::<ModelSelector>() {
            Ok(selector) => Some(self.launch(selector, config).await),
            Err(err) => {
                log::debug!("{err}");
                println!("{INVALID_MODEL_MESSAGE}");
                None
            }
        }
    }
}
