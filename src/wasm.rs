//! WASM bindings for the converter.
//!
//! Lets the Storyboarder renderer process convert projects in-process instead
//! of spawning a converter binary.

use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use crate::convert::{self, otio_to_storyboard, storyboard_to_timeline};
use crate::storyboard::StoryboardDocument;
use crate::ConvertError;

/// Serialize a value to JsValue with maps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: ConvertError| JsValue::from_str(&e.to_string()))
    };
}

/// Converts Storyboarder JSON text into `otio_json` text.
///
/// # Example (JavaScript)
/// ```js
/// const otio = exportStoryboard(fs.readFileSync(projectPath, 'utf8'));
/// ```
#[wasm_bindgen(js_name = exportStoryboard)]
pub fn export_storyboard(json: &str) -> Result<String, JsValue> {
    js_result!(convert::export_storyboard(json))
}

/// Converts an already-parsed Storyboarder project object into `otio_json` text.
///
/// # Example (JavaScript)
/// ```js
/// const otio = exportStoryboardObject(boardData);
/// ```
#[wasm_bindgen(js_name = exportStoryboardObject)]
pub fn export_storyboard_object(project: JsValue) -> Result<String, JsValue> {
    let document: StoryboardDocument = from_value(project)?;
    let timeline = js_result!(storyboard_to_timeline(&document))?;
    js_result!(timeline.write_to_string())
}

/// Converts `otio_json` text into a Storyboarder project object.
///
/// # Example (JavaScript)
/// ```js
/// const project = importTimeline(otioText);
/// console.log(project.boards.length);
/// ```
#[wasm_bindgen(js_name = importTimeline)]
pub fn import_timeline(otio: &str) -> Result<JsValue, JsValue> {
    let document = js_result!(otio_to_storyboard(otio))?;
    Ok(to_js_value(&document)?)
}
