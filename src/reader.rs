use reqwest::Url;
use scraper::{Html, Selector};
use thiserror::Error;

const TEXT_WIDTH: usize = 100;

// Tried in order; the first one with any text wins.
const READABLE_SELECTORS: &[&str] = &["article", "main", "[role=main]", "body"];

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("error fetching page: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("invalid selector {0:?}")]
    Selector(&'static str),
}

/// What the reader could make of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// A readable region was found and converted to text.
    Readable { title: String, content: String },
    /// A readable region was found but text conversion failed; `content` is
    /// the region's HTML.
    Html { title: String, content: String },
    /// Nothing readable, `body` is the page as fetched.
    FullPage { body: String },
}

#[derive(Debug, Clone)]
pub struct PageReader {
    http: reqwest::Client,
}

impl PageReader {
    pub fn new(http: reqwest::Client) -> Self {
        PageReader { http }
    }

    pub async fn read(&self, url: &str) -> Result<PageContent, ReaderError> {
        let parsed = Url::parse(url).map_err(|e| ReaderError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        log::info!("reading page: {parsed}");

        let res = self.http.get(parsed).send().await?;
        let body = res.text().await?;
        extract(&body)
    }
}

fn selector(css: &'static str) -> Result<Selector, ReaderError> {
    Selector::parse(css).map_err(|_| ReaderError::Selector(css))
}

/// Pulls the title and the main region out of an HTML document.
pub fn extract(raw: &str) -> Result<PageContent, ReaderError> {
    let document = Html::parse_document(raw);

    let title = document
        .select(&selector("title")?)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    for css in READABLE_SELECTORS {
        let Some(region) = document.select(&selector(css)?).next() else {
            continue;
        };
        if region.text().all(|t| t.trim().is_empty()) {
            continue;
        }

        let html = region.html();
        return Ok(match html2text::from_read(html.as_bytes(), TEXT_WIDTH) {
            Ok(text) => PageContent::Readable {
                title,
                content: text.trim().to_string(),
            },
            Err(e) => {
                log::error!("error converting page to text, returning html: {e}");
                PageContent::Html {
                    title,
                    content: html,
                }
            }
        });
    }

    Ok(PageContent::FullPage {
        body: raw.to_string(),
    })
}
