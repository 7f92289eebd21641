use std::fs;
use std::path::PathBuf;

use rust_embed::Embed;

use crate::course::spec::CourseDoc;

#[derive(Embed)]
#[folder = "assets/courses/"]
struct CourseAssets;

/// One discoverable course: bundled with the binary or dropped by the user
/// into the data directory.
pub struct CourseEntry {
    pub id: String,
    pub title: String,
    pub doc: CourseDoc,
}

pub struct CourseLibrary {
    pub entries: Vec<CourseEntry>,
}

impl CourseLibrary {
    /// Bundled courses plus `data_dir()/qwertype/courses/*.json`.
    ///
    /// Documents that fail to parse are skipped; a broken third-party
    /// course file must never take the app down.
    pub fn discover() -> Self {
        let mut entries = Vec::new();

        for name in CourseAssets::iter() {
            let Some(file) = CourseAssets::get(&name) else {
                continue;
            };
            let Ok(json) = std::str::from_utf8(file.data.as_ref()) else {
                continue;
            };
            if let Some(entry) = Self::parse_entry(&name, json) {
                entries.push(entry);
            }
        }

        if let Some(dir) = Self::user_courses_dir()
            && let Ok(read) = fs::read_dir(&dir)
        {
            let mut paths: Vec<PathBuf> = read
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().and_then(|x| x.to_str()) == Some("json"))
                .collect();
            paths.sort();
            for path in paths {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string();
                if let Ok(json) = fs::read_to_string(&path)
                    && let Some(entry) = Self::parse_entry(&name, &json)
                {
                    entries.push(entry);
                }
            }
        }

        Self { entries }
    }

    /// Load a single course document from an explicit path (`--course`).
    pub fn load_file(path: &PathBuf) -> anyhow::Result<CourseEntry> {
        let json = fs::read_to_string(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("course.json");
        Self::parse_entry(name, &json)
            .ok_or_else(|| anyhow::anyhow!("not a valid course document: {}", path.display()))
    }

    fn parse_entry(file_name: &str, json: &str) -> Option<CourseEntry> {
        let doc = CourseDoc::from_json(json).ok()?;
        let stem = file_name.trim_end_matches(".json").to_string();
        let id = if doc.course.id.is_empty() {
            stem.clone()
        } else {
            doc.course.id.clone()
        };
        let title = if doc.course.title.is_empty() {
            stem
        } else {
            doc.course.title.clone()
        };
        Some(CourseEntry { id, title, doc })
    }

    fn user_courses_dir() -> Option<PathBuf> {
        Some(dirs::data_dir()?.join("qwertype").join("courses"))
    }
}
