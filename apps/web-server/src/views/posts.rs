use std::fmt::Write;

use yatube_core::domain::{Page, PostEntry, Principal};
use yatube_core::services::{GroupFeed, PostDetail, PostForm, ProfileFeed};

use super::{escape, layout};
use crate::urls;

const DATE_FORMAT: &str = "%d %B %Y";

fn paragraphs(text: &str) -> String {
    text.lines()
        .map(escape)
        .collect::<Vec<_>>()
        .join("<br>\n")
}

/// One post as listed in a feed.
fn post_card(entry: &PostEntry, show_group: bool) -> String {
    let post = &entry.post;
    let mut card = String::from("<article class=\"post\">\n<ul>\n");
    let _ = writeln!(
        card,
        "<li>Author: <a href=\"{}\">{}</a></li>",
        escape(&urls::profile(&entry.author.username)),
        escape(&entry.author.username),
    );
    let _ = writeln!(card, "<li>Date: {}</li>", post.pub_date.format(DATE_FORMAT));
    card.push_str("</ul>\n");

    if let Some(image) = &post.image {
        let _ = writeln!(card, "<img src=\"/media/{}\" alt=\"\">", escape(image));
    }
    let _ = writeln!(card, "<p>{}</p>", paragraphs(&post.text));
    let _ = writeln!(
        card,
        "<a href=\"{}\">Details</a>",
        urls::post_detail(post.id)
    );
    if let Some(group) = entry.group.as_ref().filter(|_| show_group) {
        let _ = writeln!(
            card,
            "<a href=\"{}\">All posts of the group {}</a>",
            escape(&urls::group(&group.slug)),
            escape(&group.title),
        );
    }
    card.push_str("</article>");
    card
}

fn paginator<T>(page: &Page<T>) -> String {
    if page.num_pages <= 1 {
        return String::new();
    }

    let mut nav = String::from("<nav class=\"paginator\">");
    if let Some(previous) = page.previous_number() {
        let _ = write!(nav, "<a href=\"?page=1\">First</a> <a href=\"?page={previous}\">Previous</a> ");
    }
    let _ = write!(nav, "<span>Page {} of {}</span>", page.number, page.num_pages);
    if let Some(next) = page.next_number() {
        let _ = write!(
            nav,
            " <a href=\"?page={next}\">Next</a> <a href=\"?page={}\">Last</a>",
            page.num_pages
        );
    }
    nav.push_str("</nav>");
    nav
}

fn feed(page: &Page<PostEntry>, show_group: bool) -> String {
    let mut body = String::new();
    for entry in &page.items {
        body.push_str(&post_card(entry, show_group));
        body.push_str("\n<hr>\n");
    }
    body.push_str(&paginator(page));
    body
}

pub fn index_page(page: &Page<PostEntry>, viewer: Option<&Principal>) -> String {
    let body = format!("<h1>Latest updates</h1>\n{}", feed(page, true));
    layout("Yatube", viewer, &body)
}

pub fn group_page(group_feed: &GroupFeed, viewer: Option<&Principal>) -> String {
    let group = &group_feed.group;
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n{}",
        escape(&group.title),
        paragraphs(&group.description),
        feed(&group_feed.page, false),
    );
    layout(&format!("Posts of the group {}", group.title), viewer, &body)
}

pub fn profile_page(profile: &ProfileFeed, viewer: Option<&Principal>) -> String {
    let username = &profile.author.username;
    let body = format!(
        "<h1>All posts of {}</h1>\n<h3>Posts: {}</h3>\n{}",
        escape(username),
        profile.post_count(),
        feed(&profile.page, true),
    );
    layout(&format!("Profile of {username}"), viewer, &body)
}

pub fn detail_page(
    detail: &PostDetail,
    viewer: Option<&Principal>,
    preview_chars: usize,
) -> String {
    let entry = &detail.entry;
    let post = &entry.post;

    let mut body = String::from("<aside>\n<ul>\n");
    let _ = writeln!(body, "<li>Date: {}</li>", post.pub_date.format(DATE_FORMAT));
    if let Some(group) = &entry.group {
        let _ = writeln!(
            body,
            "<li>Group: <a href=\"{}\">{}</a></li>",
            escape(&urls::group(&group.slug)),
            escape(&group.title),
        );
    }
    let _ = writeln!(
        body,
        "<li>Author: <a href=\"{}\">{}</a></li>",
        escape(&urls::profile(&entry.author.username)),
        escape(&entry.author.username),
    );
    let _ = writeln!(body, "<li>Author's posts: {}</li>", detail.author_post_count);
    body.push_str("</ul>\n</aside>\n<article>\n");
    if let Some(image) = &post.image {
        let _ = writeln!(body, "<img src=\"/media/{}\" alt=\"\">", escape(image));
    }
    let _ = writeln!(body, "<p>{}</p>", paragraphs(&post.text));
    if viewer.is_some_and(|v| v.is_author_of(post.author_id)) {
        let _ = writeln!(body, "<a href=\"{}\">Edit post</a>", urls::post_edit(post.id));
    }
    body.push_str("</article>");

    layout(&format!("Post {}", post.preview(preview_chars)), viewer, &body)
}

fn field_errors(form: &PostForm, field: &str) -> String {
    form.errors
        .for_field(field)
        .map(|message| format!("<p class=\"error\">{}</p>\n", escape(message)))
        .collect()
}

pub fn post_form_page(form: &PostForm, viewer: Option<&Principal>) -> String {
    let (heading, action, button) = match form.editing {
        Some(post_id) => ("Edit post", urls::post_edit(post_id), "Save"),
        None => ("New post", urls::CREATE.to_string(), "Add"),
    };

    let selected = form.input.group.as_deref().unwrap_or("");
    let mut options = String::from("<option value=\"\">---------</option>\n");
    for group in &form.groups {
        let id = group.id.to_string();
        let _ = writeln!(
            options,
            "<option value=\"{id}\"{}>{}</option>",
            if id == selected { " selected" } else { "" },
            escape(&group.title),
        );
    }

    let body = format!(
        "<h1>{heading}</h1>\n<form method=\"post\" action=\"{}\">\n\
         <label for=\"id_text\">Text</label>\n{}<textarea name=\"text\" id=\"id_text\" required>{}</textarea>\n\
         <label for=\"id_group\">Group</label>\n{}<select name=\"group\" id=\"id_group\">\n{options}</select>\n\
         <button type=\"submit\">{button}</button>\n</form>",
        escape(&action),
        field_errors(form, "text"),
        escape(&form.input.text),
        field_errors(form, "group"),
    );
    layout(heading, viewer, &body)
}
