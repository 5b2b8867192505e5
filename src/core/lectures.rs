use crate::error::CourseraError;
use crate::http::{AuthHeaders, Session};
use crate::model::LectureRecord;
use crate::utils::text::ascii_clean;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

/// Marker class on the block element that opens a week of lectures. The
/// week's lecture list is the header's adjacent sibling element.
const WEEK_HEADER_SELECTOR: &str = ".course-item-list-header";

/// Marker class on lecture anchors, in both the grouped and the flat page
/// layouts.
const LECTURE_LINK_SELECTOR: &str = "a.lecture-link";

/// Which kind of listing page is being read. Decides how a fetch failure
/// is reported: a broken preview falls back to credentials upstream, a
/// broken authenticated listing is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Preview,
    Authenticated,
}

impl ListingKind {
    fn failure(self, reason: impl Into<String>) -> CourseraError {
        match self {
            ListingKind::Preview => CourseraError::PreviewUnavailable(reason.into()),
            ListingKind::Authenticated => CourseraError::ListingFailed(reason.into()),
        }
    }
}

/// One lecture link as it appears on the listing page, before the
/// per-lecture fetches fill in the video URL and size.
#[derive(Debug)]
struct LectureAnchor {
    week: String,
    name: String,
    duration: String,
    preview_url: String,
    resources: BTreeMap<String, String>,
}

impl LectureAnchor {
    fn into_record(self, video_url: String, size_bytes: String) -> LectureRecord {
        let (full_name, description) = if self.week.is_empty() {
            // flat scan: no week to compose with
            (self.name.clone(), self.name.clone())
        } else {
            let truncated: String = self.week.chars().take(13).collect();
            (
                format!("{} - {}", truncated, self.name),
                format!("{} : {}", self.week, self.name),
            )
        };
        LectureRecord {
            full_name,
            duration: self.duration,
            size_bytes,
            video_url,
            description,
            resources: self.resources,
        }
    }
}

/// Read a listing page (public preview or authenticated lecture index) and
/// return its lectures in page order. Week order and within-week anchor
/// order are the only ordering signal the platform exposes; the returned
/// vector preserves them exactly, and a record's index doubles as its
/// stable key downstream.
///
/// Any page fetch failure aborts the whole listing with no partial result.
/// The single tolerated lecture-level failure is a lecture page without a
/// video source, which drops that record with a warning.
pub async fn fetch_lectures(
    session: &mut Session,
    listing_url: &str,
    auth: AuthHeaders,
    kind: ListingKind,
) -> Result<Vec<LectureRecord>, CourseraError> {
    let page = session
        .get(listing_url, auth)
        .await
        .map_err(|err| kind.failure(err.to_string()))?;
    if !page.status.is_success() {
        return Err(kind.failure(format!("{} returned HTTP {}", listing_url, page.status)));
    }

    let anchors = scan_listing(&page.body);
    if anchors.is_empty() {
        log::warn!("no lecture links found at {}", listing_url);
    }

    let mut lectures = Vec::with_capacity(anchors.len());
    for anchor in anchors {
        match resolve_anchor(session, anchor, auth, kind).await {
            Ok(record) => lectures.push(record),
            Err(CourseraError::LectureParseIncomplete(name)) => {
                log::warn!("skipping lecture {:?}: no video source on its page", name);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(lectures)
}

/// Walk the listing DOM for lecture anchors.
///
/// Grouped layout first: every week header paired with the lecture list in
/// its next sibling element. Pages without week headers (the older layout,
/// and previews stripped down to a bare list) degrade to a flat scan of
/// every lecture anchor on the page. The two walks are never merged.
fn scan_listing(html: &str) -> Vec<LectureAnchor> {
    let document = Html::parse_document(html);
    let header_selector = Selector::parse(WEEK_HEADER_SELECTOR).unwrap();
    let link_selector = Selector::parse(LECTURE_LINK_SELECTOR).unwrap();

    let headers: Vec<ElementRef> = document.select(&header_selector).collect();
    let mut anchors = Vec::new();

    if headers.is_empty() {
        for link in document.select(&link_selector) {
            anchors.extend(lecture_anchor(link, ""));
        }
        return anchors;
    }

    for header in headers {
        let week = header.text().collect::<String>().trim().to_string();
        let Some(list) = header.next_siblings().find_map(ElementRef::wrap) else {
            continue;
        };
        for link in list.select(&link_selector) {
            anchors.extend(lecture_anchor(link, &week));
        }
    }
    anchors
}

fn lecture_anchor(link: ElementRef, week: &str) -> Option<LectureAnchor> {
    let Some(preview_url) = link.attr("data-modal-iframe") else {
        log::warn!("lecture link without data-modal-iframe, skipping");
        return None;
    };
    // titles tend to start with a stray newline in the source markup
    let text = link.text().collect::<String>().trim().to_string();
    let (name, duration) = split_duration(&text);
    Some(LectureAnchor {
        week: week.to_string(),
        name,
        duration,
        preview_url: preview_url.to_string(),
        resources: collect_resources(link),
    })
}

/// Split a trailing "(MM:SS)" or "[MM:SS]" off a lecture title. Anything
/// unparseable leaves the whole text as the name and an empty duration;
/// this never fails.
fn split_duration(text: &str) -> (String, String) {
    let name_re = Regex::new(r"(?s)^(.*)[(\[](\d+:\d+)[)\]]$").unwrap();
    match name_re.captures(text) {
        Some(caps) => (caps[1].trim().to_string(), caps[2].to_string()),
        None => (text.to_string(), String::new()),
    }
}

/// Downloadable extras sit in a secondary link list within the two
/// siblings after the lecture anchor. Titles and URLs are transliterated
/// to ASCII; downstream storage takes nothing wider.
fn collect_resources(link: ElementRef) -> BTreeMap<String, String> {
    let anchor_selector = Selector::parse("a").unwrap();
    let mut resources = BTreeMap::new();
    for sibling in link.next_siblings().filter_map(ElementRef::wrap).take(2) {
        for resource in sibling.select(&anchor_selector) {
            let Some(href) = resource.attr("href") else {
                continue;
            };
            let title = ascii_clean(resource.text().collect::<String>().trim());
            if title.is_empty() {
                continue;
            }
            resources.insert(title, ascii_clean(href));
        }
    }
    resources
}

/// Follow one anchor to its lecture page, pull the mp4 source out, and
/// probe the video's size with a HEAD request.
async fn resolve_anchor(
    session: &mut Session,
    anchor: LectureAnchor,
    auth: AuthHeaders,
    kind: ListingKind,
) -> Result<LectureRecord, CourseraError> {
    let page = session
        .get(&anchor.preview_url, auth)
        .await
        .map_err(|err| kind.failure(err.to_string()))?;
    if !page.status.is_success() {
        return Err(kind.failure(format!(
            "{} returned HTTP {}",
            anchor.preview_url, page.status
        )));
    }

    let Some(video_url) = extract_video_source(&page.body) else {
        return Err(CourseraError::LectureParseIncomplete(anchor.name));
    };

    let probe = session
        .head(&video_url)
        .await
        .map_err(|err| kind.failure(err.to_string()))?;
    let size_bytes = if probe.status.is_success() {
        probe.content_length().unwrap_or_default().to_string()
    } else {
        // the probe is advisory; an unhappy video host just means an
        // unknown size
        log::debug!("size probe for {} returned HTTP {}", video_url, probe.status);
        String::new()
    };

    Ok(anchor.into_record(video_url, size_bytes))
}

fn extract_video_source(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let source_selector = Selector::parse(r#"source[type="video/mp4"]"#).unwrap();
    document
        .select(&source_selector)
        .next()?
        .attr("src")
        .map(str::to_string)
}
