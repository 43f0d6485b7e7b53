use std::time::Duration;

use bn_core::{Error, Result};
use tracing::debug;

// Some municipal CMS hosts reject requests with a default or empty agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Single-attempt page fetcher. One GET per call, bounded timeout,
/// no retries; any failure is surfaced to the caller.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{} returned {}", url, status)));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let url = serve_once("200 OK", "<html><body>news</body></html>");
        let fetcher = Fetcher::new().unwrap();
        let body = fetcher.fetch_page(&url).await.unwrap();
        assert_eq!(body, "<html><body>news</body></html>");
    }

    #[tokio::test]
    async fn test_fetch_page_non_200_is_fetch_error() {
        let url = serve_once("404 Not Found", "gone");
        let fetcher = Fetcher::new().unwrap();
        let err = fetcher.fetch_page(&url).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_page_connection_error() {
        // Bind then drop to get a port with nothing listening on it.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = Fetcher::new().unwrap();
        let err = fetcher
            .fetch_page(&format!("http://{}/news", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
