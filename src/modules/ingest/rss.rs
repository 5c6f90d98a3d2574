//! RSS feed fetching and parsing for the news cron.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::{Deserialize, Serialize};

/// Gaming news feeds polled by the cron job. Overridable through the
/// RSS_FEEDS env var (comma-separated URLs) so tests can point the
/// ingester at a mock server.
pub const DEFAULT_FEEDS: &[&str] = &[
    "https://gamek.vn/rss/home.rss",
    "https://game8.vn/rss/tin-tuc.rss",
    "https://thanhnien.vn/rss/game.rss",
];

/// How many of the newest items are considered per feed run.
pub const ITEMS_PER_FEED: usize = 5;

pub fn feed_urls() -> Vec<String> {
    match std::env::var("RSS_FEEDS") {
        Ok(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Err(_) => DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub pub_date: Option<String>,
    pub thumbnail: Option<String>,
}

pub async fn fetch_feed(url: &str) -> Result<Vec<FeedItem>, String> {
    let client = reqwest::Client::new();
    let res = client
        .get(url)
        .header("User-Agent", "shopacc-news-bot/1.0")
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
        return Err(format!("Feed error {}: {}", url, res.status()));
    }

    let xml = res.text().await.map_err(|e| e.to_string())?;
    parse_rss(&xml)
}

/// Parse the <item> elements of an RSS 2.0 document. Thumbnails come
/// from <enclosure url=...> or <media:thumbnail url=...> when present.
pub fn parse_rss(xml: &str) -> Result<Vec<FeedItem>, String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = None;
    let mut description = None;
    let mut pub_date = None;
    let mut thumbnail = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let qname = e.name();
                let name = std::str::from_utf8(qname.as_ref()).unwrap_or("");
                if name == "item" {
                    in_item = true;
                    title.clear();
                    link = None;
                    description = None;
                    pub_date = None;
                    thumbnail = None;
                } else if in_item {
                    current_tag = name.to_string();
                }
            }
            Ok(Event::Empty(e)) if in_item => {
                let qname = e.name();
                let name = std::str::from_utf8(qname.as_ref()).unwrap_or("");
                if name == "enclosure" || name == "media:thumbnail" || name == "media:content" {
                    for a in e.attributes().flatten() {
                        if a.key.as_ref() == b"url" && thumbnail.is_none() {
                            thumbnail = Some(String::from_utf8_lossy(&a.value).to_string());
                        }
                    }
                }
            }
            Ok(Event::Text(e)) if in_item => {
                let text = e.unescape().unwrap_or_default().to_string();
                assign_field(
                    &current_tag,
                    text,
                    &mut title,
                    &mut link,
                    &mut description,
                    &mut pub_date,
                );
            }
            Ok(Event::CData(e)) if in_item => {
                let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                assign_field(
                    &current_tag,
                    text,
                    &mut title,
                    &mut link,
                    &mut description,
                    &mut pub_date,
                );
            }
            Ok(Event::End(e)) => {
                let qname = e.name();
                let name = std::str::from_utf8(qname.as_ref()).unwrap_or("");
                if name == "item" {
                    in_item = false;
                    if !title.is_empty() {
                        items.push(FeedItem {
                            title: title.clone(),
                            link: link.take(),
                            description: description.take(),
                            pub_date: pub_date.take(),
                            thumbnail: thumbnail.take(),
                        });
                    }
                } else {
                    current_tag.clear();
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML Parse Error: {}", e)),
            _ => (),
        }
        buf.clear();
    }

    Ok(items)
}

fn assign_field(
    tag: &str,
    text: String,
    title: &mut String,
    link: &mut Option<String>,
    description: &mut Option<String>,
    pub_date: &mut Option<String>,
) {
    match tag {
        "title" => *title = text,
        "link" => *link = Some(text),
        "description" => *description = Some(text),
        "pubDate" => *pub_date = Some(text),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>GameK</title>
    <item>
      <title><![CDATA[Free Fire ra mắt sự kiện mới]]></title>
      <link>https://gamek.vn/free-fire-su-kien.html</link>
      <description><![CDATA[Sự kiện tháng 8 của Free Fire.]]></description>
      <pubDate>Sat, 23 Aug 2026 08:00:00 +0700</pubDate>
      <enclosure url="https://cdn.gamek.vn/ff.jpg" type="image/jpeg"/>
    </item>
    <item>
      <title>Tin vắn buổi sáng</title>
      <link>https://gamek.vn/tin-van.html</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items_with_cdata_and_enclosure() {
        let items = parse_rss(SAMPLE).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Free Fire ra mắt sự kiện mới");
        assert_eq!(
            items[0].link.as_deref(),
            Some("https://gamek.vn/free-fire-su-kien.html")
        );
        assert_eq!(
            items[0].thumbnail.as_deref(),
            Some("https://cdn.gamek.vn/ff.jpg")
        );
        assert!(items[0].pub_date.is_some());
        assert_eq!(items[1].title, "Tin vắn buổi sáng");
        assert!(items[1].description.is_none());
    }
}
