use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};
use std::collections::HashMap;

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Renders an article body to HTML.
///
/// Image destinations found in `image_urls` are swapped for the mapped URL,
/// which is how uploaded image locations replace local paths.
pub fn render_html(body: &str, image_urls: &HashMap<String, String>) -> String {
    let parser = Parser::new_ext(body, options()).map(|event| match event {
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest_url = match image_urls.get(&*dest_url) {
                Some(url) => CowStr::from(url.clone()),
                None => dest_url,
            };
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            })
        }
        other => other,
    });

    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
