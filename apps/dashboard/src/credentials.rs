use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use thiserror::Error;

pub const ALPHAVANTAGE_KEY_VAR: &str = "ALPHAVANTAGE_API_KEY";
pub const NEWSAPI_KEY_VAR: &str = "NEWSAPI_API_KEY";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("line {line} is missing")]
    MissingLine { line: usize },
    #[error("line {line} is not formatted as 'label: value'")]
    MissingSeparator { line: usize },
    #[error("line {line} has an empty value")]
    EmptyValue { line: usize },
    #[error("no {service} key: set ${var} or pass --credentials")]
    Missing {
        service: &'static str,
        var: &'static str,
    },
}

/// API keys for the two upstream services.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub alphavantage: String,
    pub newsapi: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("alphavantage", &"<redacted>")
            .field("newsapi", &"<redacted>")
            .finish()
    }
}

fn parse_line(line: Option<&str>, number: usize) -> Result<String, CredentialsError> {
    let line = line.ok_or(CredentialsError::MissingLine { line: number })?;
    let (_label, value) = line
        .split_once(':')
        .ok_or(CredentialsError::MissingSeparator { line: number })?;

    let value = value.trim();
    if value.is_empty() {
        return Err(CredentialsError::EmptyValue { line: number });
    }

    Ok(value.to_string())
}

fn env_key(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Credentials {
    /// Parses the key file: first line Alpha Vantage, second line NewsAPI, each
    /// `label: value`. Only the first `:` separates label from value.
    pub fn parse(contents: &str) -> Result<Self, CredentialsError> {
        let mut lines = contents.lines();

        Ok(Self {
            alphavantage: parse_line(lines.next(), 1)?,
            newsapi: parse_line(lines.next(), 2)?,
        })
    }

    /// Environment keys win over the file, key by key.
    pub fn resolve(
        alphavantage_env: Option<String>,
        newsapi_env: Option<String>,
        file: Option<Credentials>,
    ) -> Result<Self, CredentialsError> {
        let (file_alphavantage, file_newsapi) = match file {
            Some(Credentials {
                alphavantage,
                newsapi,
            }) => (Some(alphavantage), Some(newsapi)),
            None => (None, None),
        };

        let alphavantage = alphavantage_env
            .or(file_alphavantage)
            .ok_or(CredentialsError::Missing {
                service: "Alpha Vantage",
                var: ALPHAVANTAGE_KEY_VAR,
            })?;
        let newsapi = newsapi_env
            .or(file_newsapi)
            .ok_or(CredentialsError::Missing {
                service: "NewsAPI",
                var: NEWSAPI_KEY_VAR,
            })?;

        Ok(Self {
            alphavantage,
            newsapi,
        })
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).with_context(|| {
                    format!("Failed to read credentials file {}", path.display())
                })?;
                let parsed = Self::parse(&contents)
                    .with_context(|| format!("Invalid credentials file {}", path.display()))?;
                Some(parsed)
            }
            None => None,
        };

        let credentials =
            Self::resolve(env_key(ALPHAVANTAGE_KEY_VAR), env_key(NEWSAPI_KEY_VAR), file)?;

        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_two_labelled_lines() {
        let credentials = Credentials::parse("alpha_vantage: AV123 \nnews_api:  NA456\n").unwrap();

        assert_eq!(credentials.alphavantage, "AV123");
        assert_eq!(credentials.newsapi, "NA456");
    }

    #[test]
    fn value_may_contain_colons() {
        let credentials = Credentials::parse("alpha: a:b\nnews: c\n").unwrap();

        assert_eq!(credentials.alphavantage, "a:b");
    }

    #[test]
    fn missing_second_line() {
        assert_eq!(
            Credentials::parse("alpha: a\n"),
            Err(CredentialsError::MissingLine { line: 2 })
        );
    }

    #[test]
    fn line_without_separator() {
        assert_eq!(
            Credentials::parse("alpha a\nnews: b"),
            Err(CredentialsError::MissingSeparator { line: 1 })
        );
    }

    #[test]
    fn empty_value() {
        assert_eq!(
            Credentials::parse("alpha: a\nnews:   "),
            Err(CredentialsError::EmptyValue { line: 2 })
        );
    }

    #[test]
    fn environment_overrides_file_per_key() {
        let file = Credentials::parse("alpha: file-a\nnews: file-n").unwrap();

        let resolved = Credentials::resolve(Some("env-a".to_string()), None, Some(file)).unwrap();

        assert_eq!(resolved.alphavantage, "env-a");
        assert_eq!(resolved.newsapi, "file-n");
    }

    #[test]
    fn nothing_configured_names_the_missing_key() {
        assert_eq!(
            Credentials::resolve(Some("env-a".to_string()), None, None),
            Err(CredentialsError::Missing {
                service: "NewsAPI",
                var: NEWSAPI_KEY_VAR
            })
        );
    }

    #[test]
    fn parses_key_file_written_to_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha_vantage: k1").unwrap();
        writeln!(file, "news_api: k2").unwrap();

        let parsed = Credentials::parse(&fs::read_to_string(file.path()).unwrap()).unwrap();

        assert_eq!(parsed.alphavantage, "k1");
        assert_eq!(parsed.newsapi, "k2");
    }

    #[test]
    fn debug_output_hides_keys() {
        let credentials = Credentials::parse("a: secret-1\nb: secret-2").unwrap();

        let printed = format!("{credentials:?}");
        assert!(!printed.contains("secret"));
    }
}
