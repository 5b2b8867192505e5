use crate::core::catalog::Catalog;
use crate::model::LectureRecord;

/// Render rows as plain text with every column padded to its widest cell.
/// Rows may be ragged; short rows just leave the trailing columns out.
pub fn texttable(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.len());
        }
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(index, cell)| format!("{:<width$}", cell, width = widths[index]))
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One row per course offering: index, short name, start, active flag,
/// class site, preview link. Courses without offerings still get a row so
/// the catalog lists completely.
pub fn course_table(catalog: &Catalog) -> String {
    let mut rows = Vec::new();
    for (index, course) in catalog.courses().iter().enumerate() {
        let preview = course.preview_link.clone().unwrap_or_default();
        if course.instances.is_empty() {
            rows.push(vec![
                index.to_string(),
                course.short_name.clone(),
                "None".to_string(),
                "INACTIVE".to_string(),
                "No-instance".to_string(),
                preview,
            ]);
            continue;
        }
        for instance in &course.instances {
            rows.push(vec![
                index.to_string(),
                course.short_name.clone(),
                instance.start_label(),
                instance.status_label().to_string(),
                instance.home_link.clone(),
                preview.clone(),
            ]);
        }
    }
    texttable(&rows)
}

pub fn lecture_table(lectures: &[LectureRecord]) -> String {
    let rows: Vec<Vec<String>> = lectures
        .iter()
        .map(|lecture| {
            vec![
                lecture.full_name.clone(),
                lecture.duration.clone(),
                lecture.size_bytes.clone(),
                lecture.video_url.clone(),
            ]
        })
        .collect();
    texttable(&rows)
}
