use crate::model::{Course, Instance, LectureRecord};
use chrono::{Datelike, Duration, TimeZone, Utc};
use rss::extension::itunes::{ITunesChannelExtensionBuilder, ITunesItemExtensionBuilder};
use rss::{Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, Item, ItemBuilder};

/// Build a podcast channel for one course offering.
///
/// Lecture listings carry no dates, so every item gets a synthesized
/// pubDate of January 1st (current year) plus its index in days: podcast
/// clients that sort by date then replay the course in lecture order.
pub fn course_feed(course: &Course, instance: &Instance, lectures: &[LectureRecord]) -> Channel {
    let year = Utc::now().year();
    let base = Utc.with_ymd_and_hms(year, 1, 1, 12, 0, 0).unwrap();

    let items: Vec<Item> = lectures
        .iter()
        .enumerate()
        .map(|(index, lecture)| {
            let pub_date = (base + Duration::days(index as i64)).to_rfc2822();
            let enclosure = EnclosureBuilder::default()
                .url(lecture.video_url.clone())
                .length(lecture.size_bytes.clone())
                .mime_type("video/mp4".to_string())
                .build();
            let itunes = ITunesItemExtensionBuilder::default()
                .author(course.instructor.clone())
                .duration((!lecture.duration.is_empty()).then(|| lecture.duration.clone()))
                .build();
            ItemBuilder::default()
                .title(lecture.full_name.clone())
                .description(lecture.description.clone())
                .enclosure(enclosure)
                .guid(
                    GuidBuilder::default()
                        .value(lecture.video_url.clone())
                        .permalink(false)
                        .build(),
                )
                .pub_date(pub_date)
                .itunes_ext(itunes)
                .build()
        })
        .collect();

    let itunes_channel = ITunesChannelExtensionBuilder::default()
        .author(course.instructor.clone())
        .summary(course.short_description.clone())
        .image(course.large_icon_url.clone())
        .build();

    ChannelBuilder::default()
        .title(course.display_name.clone())
        .link(instance.home_link.clone())
        .language("en-us".to_string())
        .description(course.short_description.clone())
        .itunes_ext(itunes_channel)
        .items(items)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::collections::BTreeMap;

    fn lecture(full_name: &str, duration: &str, size: &str) -> LectureRecord {
        LectureRecord {
            full_name: full_name.to_string(),
            duration: duration.to_string(),
            size_bytes: size.to_string(),
            video_url: format!("https://videos.example.org/{}.mp4", full_name),
            description: format!("Week 1 : {}", full_name),
            resources: BTreeMap::new(),
        }
    }

    fn fixture() -> (Course, Instance, Vec<LectureRecord>) {
        let instance = Instance {
            start_month: Some(4),
            start_day: Some(22),
            start_year: Some(2013),
            active: true,
            home_link: "https://class.example.org/ml-2013/".to_string(),
        };
        let course = Course {
            short_name: "ml".to_string(),
            display_name: "Machine Learning".to_string(),
            instructor: "Andrew Ng".to_string(),
            short_description: "Learn about machine learning.".to_string(),
            large_icon_url: "https://example.org/ml.png".to_string(),
            preview_link: None,
            instances: vec![instance.clone()],
        };
        let lectures = vec![lecture("Welcome", "7:32", "1000"), lecture("Basics", "", "")];
        (course, instance, lectures)
    }

    #[test]
    fn channel_carries_course_metadata() {
        let (course, instance, lectures) = fixture();
        let channel = course_feed(&course, &instance, &lectures);

        assert_eq!(channel.title(), "Machine Learning");
        assert_eq!(channel.link(), "https://class.example.org/ml-2013/");
        assert_eq!(channel.language(), Some("en-us"));
        let itunes = channel.itunes_ext().unwrap();
        assert_eq!(itunes.author(), Some("Andrew Ng"));
        assert_eq!(itunes.image(), Some("https://example.org/ml.png"));
    }

    #[test]
    fn items_keep_lecture_order_via_synthesized_dates() {
        let (course, instance, lectures) = fixture();
        let channel = course_feed(&course, &instance, &lectures);

        let items = channel.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title(), Some("Welcome"));

        let first = DateTime::parse_from_rfc2822(items[0].pub_date().unwrap()).unwrap();
        let second = DateTime::parse_from_rfc2822(items[1].pub_date().unwrap()).unwrap();
        assert!(first < second);
    }

    #[test]
    fn enclosure_and_guid_point_at_the_video() {
        let (course, instance, lectures) = fixture();
        let channel = course_feed(&course, &instance, &lectures);

        let item = &channel.items()[0];
        let enclosure = item.enclosure().unwrap();
        assert_eq!(enclosure.url(), "https://videos.example.org/Welcome.mp4");
        assert_eq!(enclosure.length(), "1000");
        assert_eq!(enclosure.mime_type(), "video/mp4");

        let guid = item.guid().unwrap();
        assert_eq!(guid.value(), "https://videos.example.org/Welcome.mp4");
        assert!(!guid.is_permalink());
    }

    #[test]
    fn empty_duration_leaves_itunes_duration_out() {
        let (course, instance, lectures) = fixture();
        let channel = course_feed(&course, &instance, &lectures);

        let items = channel.items();
        assert_eq!(items[0].itunes_ext().unwrap().duration(), Some("7:32"));
        assert_eq!(items[1].itunes_ext().unwrap().duration(), None);
    }

    #[test]
    fn feed_serializes_to_rss_xml() {
        let (course, instance, lectures) = fixture();
        let xml = course_feed(&course, &instance, &lectures).to_string();

        assert!(xml.contains("<rss"));
        assert!(xml.contains("<enclosure"));
        assert!(xml.contains("itunes:duration"));
    }
}
