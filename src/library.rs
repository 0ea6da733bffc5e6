use crate::block::{extract, script_lines};
use crate::config::{SceneSpec, ViewerConfig};
use crate::error::{Error, Result};
use crate::highlight::{highlight_options, FilterState};
use crate::parser::parse;
use crate::resolve::resolve_row;
use crate::types::{DialogueEntry, SceneView, ViewerOutput};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub trait ScriptSource {
    fn read_script(&self, filename: &str) -> Result<String>;
}

/// Reads scripts from `<root>/script/`.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ScriptSource for DirSource {
    fn read_script(&self, filename: &str) -> Result<String> {
        let path = self.root.join("script").join(filename);
        fs::read_to_string(&path).map_err(|source| Error::Io { path, source })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, filename: impl Into<String>, text: impl Into<String>) -> Self {
        self.files.insert(filename.into(), text.into());
        self
    }
}

impl FromIterator<(String, String)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl ScriptSource for MemorySource {
    fn read_script(&self, filename: &str) -> Result<String> {
        self.files
            .get(filename)
            .cloned()
            .ok_or_else(|| Error::MissingScript(filename.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub entries: Vec<DialogueEntry>,
}

impl Scene {
    pub fn label(&self) -> String {
        format!("Scene {}: {}", self.id, self.title)
    }
}

#[derive(Debug, Clone)]
pub struct SceneLibrary {
    config: ViewerConfig,
    scenes: Vec<Scene>,
}

impl SceneLibrary {
    pub fn load(config: ViewerConfig, source: &dyn ScriptSource) -> Result<Self> {
        let mut files: HashMap<String, String> = HashMap::new();
        let mut scenes = Vec::with_capacity(config.scenes().len());

        for spec in config.scenes() {
            if !files.contains_key(&spec.filename) {
                let text = source.read_script(&spec.filename)?;
                files.insert(spec.filename.clone(), text);
            }
            let text = &files[&spec.filename];
            scenes.push(load_scene(spec, text));
        }

        Ok(Self { config, scenes })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    pub fn render(&self, filter: &FilterState) -> Vec<SceneView> {
        self.scenes
            .iter()
            .map(|scene| SceneView {
                id: scene.id.clone(),
                title: scene.title.clone(),
                label: scene.label(),
                rows: scene
                    .entries
                    .iter()
                    .map(|entry| resolve_row(entry, &self.config, filter))
                    .collect(),
            })
            .collect()
    }

    pub fn view(&self, filter: &FilterState) -> ViewerOutput {
        ViewerOutput {
            options: highlight_options(&self.config),
            scenes: self.render(filter),
        }
    }
}

fn load_scene(spec: &SceneSpec, text: &str) -> Scene {
    let lines = script_lines(text);
    let block = extract(&lines, &spec.id);
    if block.is_empty() {
        warn!("scene {} has no block in {}", spec.id, spec.filename);
    }
    let entries = parse(&block);
    debug!("scene {}: {} entries", spec.id, entries.len());

    Scene {
        id: spec.id.clone(),
        title: spec.title.clone(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const CONFIG: &str = r##"{
        "scene": {
            "1": ["act1.txt", "Arrival"],
            "2": ["act1.txt", "Departure"],
            "3": ["act1.txt", "Missing"]
        },
        "member_map": { "amy": { "color": "#cc3366" } }
    }"##;

    const ACT1: &str = "*1\n[amy]\nHello\n**1\n*2\n[Everyone][color=#999999]\nBye\n**2\n";

    struct CountingSource {
        inner: MemorySource,
        reads: Cell<usize>,
    }

    impl ScriptSource for CountingSource {
        fn read_script(&self, filename: &str) -> Result<String> {
            self.reads.set(self.reads.get() + 1);
            self.inner.read_script(filename)
        }
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_load_reads_each_file_once() {
        init_logger();
        let source = CountingSource {
            inner: MemorySource::new().with_file("act1.txt", ACT1),
            reads: Cell::new(0),
        };
        let library = SceneLibrary::load(ViewerConfig::from_json(CONFIG).unwrap(), &source).unwrap();
        assert_eq!(source.reads.get(), 1);
        assert_eq!(library.scenes().len(), 3);
        assert_eq!(library.scene("1").unwrap().entries[0].text, "Hello");
        assert_eq!(library.scene("2").unwrap().entries[0].speaker_id, "Everyone");
    }

    #[test]
    fn test_missing_block_is_empty_scene() {
        init_logger();
        let source = MemorySource::new().with_file("act1.txt", ACT1);
        let library = SceneLibrary::load(ViewerConfig::from_json(CONFIG).unwrap(), &source).unwrap();
        let scene = library.scene("3").unwrap();
        assert!(scene.entries.is_empty());
        assert_eq!(scene.label(), "Scene 3: Missing");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        init_logger();
        let err = SceneLibrary::load(ViewerConfig::from_json(CONFIG).unwrap(), &MemorySource::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingScript(name) if name == "act1.txt"));

        let err = SceneLibrary::load(
            ViewerConfig::from_json(CONFIG).unwrap(),
            &DirSource::new("/nonexistent-scenescript-root"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_render_applies_filter() {
        init_logger();
        let source = MemorySource::new().with_file("act1.txt", ACT1);
        let library = SceneLibrary::load(ViewerConfig::from_json(CONFIG).unwrap(), &source).unwrap();

        let views = library.render(&FilterState::new());
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].label, "Scene 1: Arrival");
        assert!(views.iter().flat_map(|v| &v.rows).all(|r| !r.highlighted));

        let filter: FilterState = ["amy"].into_iter().collect();
        let views = library.render(&filter);
        assert!(views[0].rows[0].highlighted);
        assert_eq!(views[0].rows[0].color, "#cc3366");
        assert!(views[1].rows[0].highlighted);
        assert_eq!(views[1].rows[0].color, "#999999");
        assert!(views[2].rows.is_empty());
    }
}
