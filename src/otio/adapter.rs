//! `otio_json` reading and writing.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use super::model::{schema_family, schema_of, Timeline};
use crate::error::{ConvertError, ConvertResult};

impl Timeline {
    /// Parses `otio_json` text.
    ///
    /// Accepts a bare timeline or a serializable collection, in which case the
    /// first timeline inside it is used.
    pub fn read_from_string(text: &str) -> ConvertResult<Timeline> {
        let value: Value = serde_json::from_str(text)?;
        let schema = schema_of(&value).to_string();

        match schema_family(&schema) {
            "Timeline" => Ok(serde_json::from_value(value)?),
            "SerializableCollection" => {
                let first = value
                    .get("children")
                    .and_then(Value::as_array)
                    .and_then(|children| {
                        children
                            .iter()
                            .find(|child| schema_family(schema_of(child)) == "Timeline")
                    })
                    .ok_or(ConvertError::EmptyCollection)?;
                log::debug!("Using first timeline of collection");
                Ok(serde_json::from_value(first.clone())?)
            }
            "" => Err(ConvertError::unsupported_schema("<missing OTIO_SCHEMA>")),
            _ => Err(ConvertError::unsupported_schema(schema)),
        }
    }

    /// Writes `otio_json` text with the 4-space indentation OTIO itself uses.
    pub fn write_to_string(&self) -> ConvertResult<String> {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        String::from_utf8(buffer).map_err(|e| ConvertError::serialization(e.to_string()))
    }
}
