//! RSS 2.0 feed of the latest posts.

use actix_web::{HttpRequest, HttpResponse, web};

use scribe_core::domain::Post;
use scribe_core::feed::LatestPostsFeed;

use crate::middleware::error::AppResult;
use crate::state::AppState;

const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// GET /blog/feed
pub async fn latest_posts_feed(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let items = state.feed.items().await?;
    let site = {
        let info = req.connection_info();
        format!("{}://{}", info.scheme(), info.host())
    };

    Ok(HttpResponse::Ok()
        .content_type(RSS_CONTENT_TYPE)
        .body(render_rss(&state.feed, &site, &items)))
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Serialize the channel and its items. Links are made absolute on `site`.
fn render_rss(feed: &LatestPostsFeed, site: &str, items: &[Post]) -> String {
    let channel = feed.channel();
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<rss version=\"2.0\">\n<channel>\n");

    xml.push_str(&format!(
        "  <title>{}</title>\n  <link>{}</link>\n  <description>{}</description>\n",
        xml_escape(&channel.title),
        xml_escape(&format!("{site}{}", channel.link)),
        xml_escape(&channel.description),
    ));
    if let Some(newest) = items.first() {
        xml.push_str(&format!(
            "  <lastBuildDate>{}</lastBuildDate>\n",
            feed.item_pubdate(newest).to_rfc2822()
        ));
    }

    for item in items {
        let link = xml_escape(&format!("{site}{}", feed.item_link(item)));
        xml.push_str(&format!(
            "  <item>\n    <title>{}</title>\n    <link>{link}</link>\n    \
             <description>{}</description>\n    <pubDate>{}</pubDate>\n    \
             <guid isPermaLink=\"true\">{link}</guid>\n  </item>\n",
            xml_escape(feed.item_title(item)),
            xml_escape(&feed.item_description(item)),
            feed.item_pubdate(item).to_rfc2822(),
        ));
    }

    xml.push_str("</channel>\n</rss>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_escape() {
        assert_eq!(
            xml_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&apos;s&lt;/a&gt;"
        );
    }
}
