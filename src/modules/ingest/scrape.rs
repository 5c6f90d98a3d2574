//! Manual article import: fetch an arbitrary URL and pull the article
//! body out of the HTML with a prioritized list of selector candidates.
//! The first candidate yielding more than 500 characters of text wins;
//! otherwise we fall back to the meta description.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// Content-body candidates, tried in order. Covers the markup of the
/// Vietnamese gaming news sites the cron also ingests.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "div.detail-content",
    "div.article-content",
    "div.post-content",
    "div.entry-content",
    "#main-content",
    ".content-detail",
];

const MIN_CONTENT_CHARS: usize = 500;

// Elements that never carry an end tag in HTML
const VOID_ELEMENTS: &[&str] = &[
    "meta", "img", "br", "hr", "input", "link", "source", "area", "base", "col", "embed",
    "track", "wbr",
];

#[derive(Debug, Default)]
pub struct ScrapedArticle {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub thumbnail: Option<String>,
}

pub async fn scrape_article(url: &str) -> Result<ScrapedArticle, String> {
    let client = reqwest::Client::new();
    let res = client
        .get(url)
        .header("User-Agent", "shopacc-news-bot/1.0")
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
        return Err(format!("Fetch error {}: {}", url, res.status()));
    }

    let html = res.text().await.map_err(|e| e.to_string())?;
    let article = extract_article(&html);
    if article.title.is_empty() && article.content.is_empty() {
        return Err("Không trích xuất được nội dung bài viết".to_string());
    }
    Ok(article)
}

struct Selector<'a> {
    tag: Option<&'a str>,
    id: Option<&'a str>,
    class: Option<&'a str>,
}

fn parse_selector(raw: &str) -> Selector<'_> {
    if let Some(id) = raw.strip_prefix('#') {
        Selector { tag: None, id: Some(id), class: None }
    } else if let Some(class) = raw.strip_prefix('.') {
        Selector { tag: None, id: None, class: Some(class) }
    } else if let Some((tag, class)) = raw.split_once('.') {
        Selector { tag: Some(tag), id: None, class: Some(class) }
    } else if let Some((tag, id)) = raw.split_once('#') {
        Selector { tag: Some(tag), id: Some(id), class: None }
    } else {
        Selector { tag: Some(raw), id: None, class: None }
    }
}

/// Best-effort extraction over possibly malformed HTML. Parse errors end
/// the walk with whatever was collected so far.
pub fn extract_article(html: &str) -> ScrapedArticle {
    let meta = extract_meta(html);

    let mut content = String::new();
    for raw in CONTENT_SELECTORS {
        let selector = parse_selector(raw);
        let text = collect_selector_text(html, &selector);
        if text.chars().count() > MIN_CONTENT_CHARS {
            content = text;
            break;
        }
    }
    if content.is_empty() {
        // Meta description fallback when no candidate produced a body
        content = meta.description.clone().unwrap_or_default();
    }

    let excerpt = meta.description.clone().or_else(|| {
        let stripped: String = content.chars().take(200).collect();
        (!stripped.is_empty()).then_some(stripped)
    });

    ScrapedArticle {
        title: meta.title,
        content,
        excerpt,
        thumbnail: meta.image,
    }
}

#[derive(Default)]
struct MetaInfo {
    title: String,
    description: Option<String>,
    image: Option<String>,
}

fn attr_value(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

fn extract_meta(html: &str) -> MetaInfo {
    let mut reader = Reader::from_str(html);
    reader.trim_text(true);
    reader.check_end_names(false);

    let mut info = MetaInfo::default();
    let mut in_title = false;

    let mut buf = Vec::new();
    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(ev) => ev,
            Err(_) => break, // tolerate malformed markup
        };
        match event {
            Event::Start(e) | Event::Empty(e) => {
                let qname = e.name();
                let name = std::str::from_utf8(qname.as_ref()).unwrap_or("");
                match name {
                    "title" => in_title = true,
                    "meta" => {
                        let key = attr_value(&e, b"name")
                            .or_else(|| attr_value(&e, b"property"))
                            .unwrap_or_default();
                        let value = attr_value(&e, b"content");
                        match key.as_str() {
                            "description" | "og:description" => {
                                if info.description.is_none() {
                                    info.description = value;
                                }
                            }
                            "og:image" => {
                                if info.image.is_none() {
                                    info.image = value;
                                }
                            }
                            "og:title" => {
                                if info.title.is_empty() {
                                    info.title = value.unwrap_or_default();
                                }
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(e) if in_title => {
                if info.title.is_empty() {
                    info.title = e.unescape().unwrap_or_default().to_string();
                }
                in_title = false;
            }
            Event::End(e) => {
                if e.name().as_ref() == b"title" {
                    in_title = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    info
}

/// Collect the text inside the first element matching the selector.
fn collect_selector_text(html: &str, selector: &Selector<'_>) -> String {
    let mut reader = Reader::from_str(html);
    reader.trim_text(true);
    reader.check_end_names(false);

    let mut text = String::new();
    let mut depth: i32 = 0;
    let mut inside = false;
    let mut done = false;

    let mut buf = Vec::new();
    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(ev) => ev,
            Err(_) => break,
        };
        match event {
            Event::Start(e) => {
                let qname = e.name();
                let name = std::str::from_utf8(qname.as_ref())
                    .unwrap_or("")
                    .to_lowercase();
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    // no end tag follows, keep depth untouched
                } else if inside {
                    depth += 1;
                } else if !done && matches_selector(&e, &name, selector) {
                    inside = true;
                    depth = 1;
                }
            }
            Event::Text(e) if inside => {
                let t = e.unescape().unwrap_or_default();
                if !t.trim().is_empty() {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(t.trim());
                }
            }
            Event::CData(e) if inside => {
                let t = String::from_utf8_lossy(&e.into_inner()).to_string();
                if !t.trim().is_empty() {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(t.trim());
                }
            }
            Event::End(e) => {
                let qname = e.name();
                let name = std::str::from_utf8(qname.as_ref())
                    .unwrap_or("")
                    .to_lowercase();
                if inside && !VOID_ELEMENTS.contains(&name.as_str()) {
                    depth -= 1;
                    if depth <= 0 {
                        inside = false;
                        done = true;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    text
}

fn matches_selector(
    e: &quick_xml::events::BytesStart<'_>,
    name: &str,
    selector: &Selector<'_>,
) -> bool {
    if let Some(tag) = selector.tag {
        if name != tag {
            return false;
        }
    }
    if let Some(id) = selector.id {
        if attr_value(e, b"id").as_deref() != Some(id) {
            return false;
        }
    }
    if let Some(class) = selector.class {
        let classes = attr_value(e, b"class").unwrap_or_default();
        if !classes.split_whitespace().any(|c| c == class) {
            return false;
        }
    }
    true
}

/// Strip HTML tags out of feed descriptions for excerpts.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
