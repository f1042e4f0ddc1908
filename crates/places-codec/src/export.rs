//! Netscape bookmark file export.

use tracing::debug;

use places_core::{PlacesStore, Record, Result};

const HEADER: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
";

const FOOTER: &str = "</DL><p>\n";

fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(raw: &str) -> String {
    escape_text(raw).replace('"', "&quot;")
}

/// Serialize the bookmarked records of `records`, keeping their order.
///
/// Every entry ends with a newline; some browsers refuse files without one.
pub fn export_bookmarks(records: &[Record]) -> String {
    let mut out = String::from(HEADER);
    let mut count = 0usize;
    for record in records.iter().filter(|r| r.is_bookmarked) {
        out.push_str("    <DT><A HREF=\"");
        out.push_str(&escape_attr(&record.url));
        out.push_str("\" ADD_DATE=\"");
        out.push_str(&record.last_visit.div_euclid(1000).to_string());
        out.push('"');
        if !record.tags.is_empty() {
            out.push_str(" TAGS=\"");
            out.push_str(&escape_attr(&record.tags.join(",")));
            out.push('"');
        }
        out.push('>');
        out.push_str(&escape_text(record.display_title()));
        out.push_str("</A>\n");
        count += 1;
    }
    out.push_str(FOOTER);
    debug!(record_count = count, bytes = out.len(), "Bookmarks exported");
    out
}

/// Fetch every record from `store` and export the bookmarks.
pub async fn export_all(store: &dyn PlacesStore) -> Result<String> {
    let records = store.fetch_all().await?;
    Ok(export_bookmarks(&records))
}
