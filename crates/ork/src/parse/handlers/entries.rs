//! Typed key/value entries of extension configurations and document
//! preferences.
//!
//! ```xml
//! <entry key="launches" type="integer">3</entry>
//! <entry key="angles" type="list"><entry type="number">0.5</entry></entry>
//! ```

use crate::Result;
use crate::parse::handler::{Built, ElementHandler, Open, unknown_element};
use crate::parse::{Attributes, LoadContext};
use crate::types::{ConfigValue, ExtensionConfig, Material};

use super::{boolean, number};

/// The value of one entry, `None` (with a warning) if unusable.
fn entry_value(cx: &mut LoadContext<'_>, attrs: &Attributes, content: &str, built: Built) -> Option<ConfigValue> {
    match attrs.get("type") {
        Some("boolean") => boolean(cx, content).map(ConfigValue::Bool),
        Some("integer") => match content.trim().parse::<i64>() {
            Ok(value) => Some(ConfigValue::Integer(value)),
            Err(_) => {
                cx.warn(format!("Illegal integer value '{content}', ignoring."));
                None
            }
        },
        Some("number" | "double") => number(cx, content).map(ConfigValue::Number),
        Some("string") => Some(ConfigValue::String(content.to_string())),
        Some("list") => match built {
            Built::List(values) => Some(ConfigValue::List(values)),
            _ => Some(ConfigValue::List(Vec::new())),
        },
        Some(other) => {
            cx.warn(format!("Unknown entry type '{other}', ignoring."));
            None
        }
        None => {
            cx.warn("Entry without a type, ignoring.");
            None
        }
    }
}

fn open_entry(attrs: &Attributes) -> Open {
    if attrs.get("type") == Some("list") {
        Open::Delegate(Box::<ListHandler>::default())
    } else {
        Open::PlainText
    }
}

/// Collects keyed entries on behalf of the handler owning them.
#[derive(Default)]
pub(crate) struct EntryReader {
    entries: ExtensionConfig,
}

impl EntryReader {
    pub fn open(&mut self, _cx: &mut LoadContext<'_>, attrs: &Attributes) -> Open {
        open_entry(attrs)
    }

    pub fn close(&mut self, cx: &mut LoadContext<'_>, attrs: &Attributes, content: &str, built: Built) {
        let Some(key) = attrs.get("key").filter(|k| !k.is_empty()) else {
            cx.warn("Entry without a key, ignoring.");
            return;
        };
        if let Some(value) = entry_value(cx, attrs, content, built) {
            self.entries.insert(key.to_string(), value);
        }
    }

    pub fn finish(self) -> ExtensionConfig {
        self.entries
    }
}

/// Unkeyed entries of a `type="list"` entry.
#[derive(Default)]
struct ListHandler {
    values: Vec<ConfigValue>,
}

impl ElementHandler for ListHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, attrs: &Attributes) -> Open {
        match element {
            "entry" | "pref" => open_entry(attrs),
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        _element: &str,
        attrs: &Attributes,
        content: &str,
        built: Built,
    ) -> Result<()> {
        if let Some(value) = entry_value(cx, attrs, content, built) {
            self.values.push(value);
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, _cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        Ok(Built::List(self.values))
    }
}

/// `<docmaterials>`: materials in their `TYPE|name|density` form.
#[derive(Default)]
pub(crate) struct DocMaterialsHandler {
    materials: Vec<Material>,
}

impl ElementHandler for DocMaterialsHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "material" | "mat" => Open::PlainText,
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        _element: &str,
        _attrs: &Attributes,
        content: &str,
        _built: Built,
    ) -> Result<()> {
        match Material::from_storable(content) {
            Some(material) => self.materials.push(material),
            None => cx.warn("Illegal material specification, ignoring."),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, _cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        Ok(Built::Materials(self.materials))
    }
}
