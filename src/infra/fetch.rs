use std::thread;
use std::time::Duration;
use thiserror::Error;

use crate::domain::Scope;

const BASE_URL: &str = "https://ivscc.gsfc.nasa.gov/sessions";

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);
const FETCH_RETRIES: u32 = 2;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request for {url} failed: {message}")]
    Transport { url: String, message: String },
}

/// One schedule page to load.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScheduleSource {
    pub url: String,
    pub intensive: bool,
}

pub fn schedule_sources(scope: Scope, year: i32) -> Vec<ScheduleSource> {
    let master = ScheduleSource {
        url: format!("{BASE_URL}/{year}/"),
        intensive: false,
    };
    let intensive = ScheduleSource {
        url: format!("{BASE_URL}/intensive/{year}/"),
        intensive: true,
    };
    match scope {
        Scope::Master => vec![master],
        Scope::Intensive => vec![intensive],
        Scope::Both => vec![master, intensive],
    }
}

pub fn make_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(FETCH_TIMEOUT))
        .build();
    config.into()
}

/// GET with bounded retries. Transport failures (timeouts, connection
/// errors) back off exponentially and retry; HTTP status errors do not.
pub fn fetch_page(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>, FetchError> {
    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 0;
    loop {
        match get_bytes(agent, url) {
            Ok(bytes) => return Ok(bytes),
            Err(error @ FetchError::Status { .. }) => return Err(error),
            Err(error) => {
                if attempt >= FETCH_RETRIES {
                    return Err(error);
                }
                attempt += 1;
                thread::sleep(backoff);
                backoff *= 2;
            }
        }
    }
}

fn get_bytes(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>, FetchError> {
    let mut body = agent
        .get(url)
        .header(
            "User-Agent",
            &format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        )
        .call()
        .map_err(|error| match error {
            ureq::Error::StatusCode(status) => FetchError::Status {
                status,
                url: url.to_string(),
            },
            other => FetchError::Transport {
                url: url.to_string(),
                message: other.to_string(),
            },
        })?
        .into_body();

    body.read_to_vec().map_err(|error| FetchError::Transport {
        url: url.to_string(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_follow_the_scope() {
        let both = schedule_sources(Scope::Both, 2025);
        assert_eq!(both.len(), 2);
        assert_eq!(both[0].url, "https://ivscc.gsfc.nasa.gov/sessions/2025/");
        assert!(!both[0].intensive);
        assert_eq!(
            both[1].url,
            "https://ivscc.gsfc.nasa.gov/sessions/intensive/2025/"
        );
        assert!(both[1].intensive);

        assert_eq!(schedule_sources(Scope::Master, 2025).len(), 1);
        let intensive = schedule_sources(Scope::Intensive, 2024);
        assert_eq!(intensive.len(), 1);
        assert!(intensive[0].url.contains("/intensive/2024/"));
    }
}
