//! Catalog documents used by the tests.

#![allow(dead_code)]

pub const TITLES: [&str; 3] = ["Sunrise", "Sunset Blvd", "Moonlight"];

pub fn track_url(index: usize) -> String {
    format!("http://music.test/tracks/{}.mp3", index)
}

/// Catalog document with one record per title.
pub fn catalog_body(titles: &[&str]) -> String {
    let files: Vec<serde_json::Value> = titles
        .iter()
        .enumerate()
        .map(|(index, title)| {
            serde_json::json!({
                "name": title,
                "url": track_url(index),
                "size": index + 1,
            })
        })
        .collect();
    serde_json::json!({ "files": files }).to_string()
}
