use maud::{DOCTYPE, Markup, html};

use crate::classify::ContentKind;
use crate::config::Page;
use crate::controller::MediaListState;
use crate::model::MediaRecord;

pub const LOAD_FAILED: &str = "Could not load the stored media.";

pub struct PageView<'a> {
    pub page: &'a Page,
    pub pages: &'a [Page],
    pub state: &'a MediaListState,
    pub banner: Option<usize>,
    pub load_failed: bool,
}

/// Link to a page with the given query parameters; empty values are left out.
pub fn page_href(page: &Page, params: &[(&str, &str)]) -> String {
    let path = match page.base() {
        "" => "/",
        base => base,
    };
    let query: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}

fn action(page: &Page, name: &str) -> String {
    format!("{}/{}", page.base(), name)
}

/// Whether a stored url may be rendered as a clickable link. Relative urls and
/// http(s) are fine; any other scheme (`javascript:`, `data:`) is not.
pub fn is_linkable(url: &str) -> bool {
    // browsers drop tabs and newlines inside urls before reading the scheme
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect();

    match cleaned.split_once(':') {
        Some((scheme, _))
            if !scheme.is_empty()
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
        {
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        }
        _ => true,
    }
}

pub fn next_banner(index: usize, len: usize) -> usize {
    (index + 1) % len
}

pub fn page(view: &PageView<'_>) -> Markup {
    let page = view.page;
    let state = view.state;
    let search = if page.search { state.search.as_str() } else { "" };

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (page.heading) }
                link rel="stylesheet" href="/static/style.css";
            }
            body {
                main.container {
                    @if view.pages.len() > 1 {
                        (nav(view.pages, page))
                    }
                    h1.title { (page.heading) }
                    (banner(view, search))

                    @if view.load_failed {
                        p.error { (LOAD_FAILED) }
                    }

                    @if let Some(src) = &state.displayed_image {
                        img.displayed src=(src) alt="Displayed Media";
                    }

                    form.add-form method="post" action=(action(page, "add")) {
                        input type="text" name="title" placeholder="Enter a title" value=(state.form.title);
                        input type="text" name="url" placeholder="Enter media URL" value=(state.form.url);
                        @if page.search {
                            input type="hidden" name="q" value=(search);
                        }
                        @if let Some(error) = &state.error {
                            p.error { (error) }
                        }
                        div.actions {
                            button type="submit" { "Add Media" }
                        }
                    }

                    @if page.search {
                        (search_form(page, search))
                    }

                    h2.subtitle { "Stored Media:" }
                    ul.media-list {
                        @for record in state.visible() {
                            li.media-item data-kind=(record.kind().as_str()) {
                                div.preview {
                                    (preview(page, &record, search))
                                    (delete_form(page, &record, search))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn nav(pages: &[Page], current: &Page) -> Markup {
    html! {
        nav.links {
            @for p in pages {
                a.link.current[p.path == current.path] href=(page_href(p, &[])) { (p.label()) }
            }
        }
    }
}

fn banner(view: &PageView<'_>, search: &str) -> Markup {
    let page = view.page;
    if page.banners.is_empty() {
        return html! {};
    }

    let index = view.banner.unwrap_or(0) % page.banners.len();
    let current = &page.banners[index];
    let next = next_banner(index, page.banners.len()).to_string();
    let next_href = page_href(page, &[("q", search), ("banner", &next)]);
    let label = page.banner_label.as_deref().unwrap_or("Gallery");

    html! {
        details.banner open[view.banner.is_some()] {
            summary { (label) }
            div.banner-body {
                @match &current.link {
                    Some(link) => {
                        a href=(link) target="_blank" rel="noopener noreferrer" {
                            img.banner-image src=(current.src) alt="Banner Image";
                        }
                    }
                    None => {
                        img.banner-image src=(current.src) alt="Banner Image";
                    }
                }
                @if page.banners.len() > 1 {
                    a.next href=(next_href) { "Next" }
                }
            }
        }
    }
}

fn search_form(page: &Page, search: &str) -> Markup {
    let href = page_href(page, &[]);

    html! {
        form.search method="get" action=(href) {
            input.search-input type="text" name="q" placeholder="Search by title..." value=(search);
            button type="submit" { "Search" }
            a.reset href=(href) { "Reset" }
        }
    }
}

fn preview(page: &Page, record: &MediaRecord, search: &str) -> Markup {
    match record.kind() {
        ContentKind::Image => {
            let id = record.id.to_string();
            let show_href = page_href(page, &[("q", search), ("show", &id)]);
            html! {
                a href=(show_href) {
                    img.preview-image src=(record.url) alt=(record.title);
                }
            }
        }
        ContentKind::Video => html! {
            div.video-container {
                video.preview-video controls {
                    source src=(record.url) type="video/mp4";
                    "Your browser does not support the video tag."
                }
            }
        },
        ContentKind::Webpage => html! {
            div.webpage-preview {
                p { (record.title) }
                @if is_linkable(&record.url) {
                    a.preview-link href=(record.url) target="_blank" rel="noopener noreferrer" { "Open Website" }
                } @else {
                    code.preview-url { (record.url) }
                }
            }
        },
    }
}

fn delete_form(page: &Page, record: &MediaRecord, search: &str) -> Markup {
    html! {
        form method="post" action=(action(page, "delete")) {
            input type="hidden" name="id" value=(record.id.to_string());
            @if page.search {
                input type="hidden" name="q" value=(search);
            }
            button.delete type="submit" { "Delete" }
        }
    }
}
