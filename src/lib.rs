#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
use pyo3::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod ast;
pub mod block;
pub mod config;
pub mod error;
pub mod highlight;
pub mod library;
pub mod parser;
pub mod resolve;
pub mod types;

pub use block::{extract, script_lines};
pub use config::{Member, SceneSpec, ViewerConfig};
pub use error::{Error, Result};
pub use highlight::{highlight_options, is_highlighted, FilterState};
pub use library::{DirSource, MemorySource, Scene, SceneLibrary, ScriptSource};
pub use parser::parse;
pub use types::{DialogueEntry, OverrideMap, OverrideValue, RowView, SceneView, ViewerOutput};

/// Extracts block `scene_id` from a whole script file and parses it.
pub fn parse_scene(text: &str, scene_id: &str) -> Vec<DialogueEntry> {
    let lines = script_lines(text);
    parse(&extract(&lines, scene_id))
}

/// Loads `<root>/config.json` and the scripts it names, then renders every scene.
pub fn render_dir(root: &std::path::Path, filter: &FilterState) -> Result<ViewerOutput> {
    let config_path = root.join("config.json");
    let text = std::fs::read_to_string(&config_path).map_err(|source| Error::Io {
        path: config_path,
        source,
    })?;
    let config = ViewerConfig::from_json(&text)?;
    let library = SceneLibrary::load(config, &DirSource::new(root))?;
    Ok(library.view(filter))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
#[pyo3(name = "parse_scene")]
fn parse_scene_py(text: String, scene_id: String) -> PyResult<String> {
    let entries = parse_scene(&text, &scene_id);

    serde_json::to_string_pretty(&entries)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
#[pyo3(name = "render_dir")]
fn render_dir_py(root: String, selected: Vec<String>) -> PyResult<String> {
    let filter: FilterState = selected.into_iter().collect();
    let output = render_dir(std::path::Path::new(&root), &filter)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))?;

    serde_json::to_string_pretty(&output)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn parse_scene_wasm(text: &str, scene_id: &str) -> Result<String, JsValue> {
    let entries = parse_scene(text, scene_id);

    serde_json::to_string_pretty(&entries).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `scripts_json` maps filename to file text; `selected_json` lists highlighted ids.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_library_wasm(
    config_json: &str,
    scripts_json: &str,
    selected_json: &str,
) -> Result<String, JsValue> {
    render_library_json(config_json, scripts_json, selected_json)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(any(target_arch = "wasm32", test))]
fn render_library_json(config_json: &str, scripts_json: &str, selected_json: &str) -> Result<String> {
    let config = ViewerConfig::from_json(config_json)?;
    let scripts: std::collections::HashMap<String, String> = serde_json::from_str(scripts_json)?;
    let selected: Vec<String> = serde_json::from_str(selected_json)?;

    let source: MemorySource = scripts.into_iter().collect();
    let filter: FilterState = selected.into_iter().collect();
    let library = SceneLibrary::load(config, &source)?;

    Ok(serde_json::to_string_pretty(&library.view(&filter))?)
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pymodule]
fn scenescript_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_scene_py, m)?)?;
    m.add_function(wrap_pyfunction!(render_dir_py, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn fixtures() -> &'static Path {
        Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
    }

    #[test]
    fn test_fixture_render() {
        let _ = env_logger::builder().is_test(true).try_init();
        let golden_path = fixtures().join("render.golden.json");
        let golden = fs::read_to_string(&golden_path).expect("Failed to read golden");

        let filter: FilterState = ["amy"].into_iter().collect();
        let output = render_dir(fixtures(), &filter).expect("Failed to render fixtures");

        let v_out = serde_json::to_value(&output).unwrap();
        let v_golden: serde_json::Value = serde_json::from_str(&golden).unwrap();

        if v_out != v_golden {
            let scenes_out = v_out["scenes"].as_array().unwrap();
            let scenes_golden = v_golden["scenes"].as_array().unwrap();

            for (a, b) in scenes_out.iter().zip(scenes_golden.iter()) {
                if a != b {
                    println!("Mismatch in scene {}", a["id"]);
                    println!("Got: {}", serde_json::to_string_pretty(a).unwrap());
                    println!("Exp: {}", serde_json::to_string_pretty(b).unwrap());
                    break;
                }
            }

            assert_eq!(v_out, v_golden, "Mismatch in fixture {}", golden_path.display());
        }
    }

    #[test]
    fn test_parse_scene() {
        let text = fs::read_to_string(fixtures().join("script/prologue.txt")).unwrap();
        let entries = parse_scene(&text, "1");
        let ids: Vec<&str> = entries.iter().map(|e| e.speaker_id.as_str()).collect();
        // the empty `[angel]` tag in scene 1 is dropped
        assert_eq!(ids, vec!["doctor", "amy", "doctor"]);
        assert!(parse_scene(&text, "4").is_empty());
    }

    #[test]
    fn test_render_library_json() {
        let config = r##"{ "scene": { "a": ["s.txt", "Only"] } }"##;
        let scripts = r##"{ "s.txt": "*a\n[Everyone]\nhi\n**a" }"##;

        let json = render_library_json(config, scripts, r#"["x"]"#).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["scenes"][0]["label"], "Scene a: Only");
        assert_eq!(v["scenes"][0]["rows"][0]["highlighted"], true);

        let err = render_library_json(config, "[]", "[]").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        let err = render_library_json(config, "{}", "[]").unwrap_err();
        assert!(matches!(err, Error::MissingScript(_)));
    }
}
