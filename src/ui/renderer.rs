//! Script-filter JSON rendering.
//!
//! Converts an [`Emission`] into the launcher's result document:
//!
//! ```json
//! {"items": [
//!   {"title": "Search Jira", "valid": false, "autocomplete": "search › ",
//!    "icon": {"path": "search.png"}},
//!   {"title": "PROJ-1 (In Progress)", "subtitle": "12m", "valid": false,
//!    "autocomplete": "in-progress › PROJ-1 › ",
//!    "mods": {"cmd": {"subtitle": "Stop progress without logging time",
//!                     "arg": "clearProgress PROJ-1", "valid": true}}}
//! ]}
//! ```

use crate::domain::error::Result;
use crate::ui::feedback::Emission;
use crate::ui::item::{Modifier, ModifierVariant, ResultItem};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Serialize)]
struct ScriptFilter<'a> {
    items: Vec<RenderedItem<'a>>,
}

#[derive(Serialize)]
struct RenderedItem<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arg: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    autocomplete: Option<&'a str>,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<Icon<'a>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    mods: BTreeMap<Modifier, RenderedMod<'a>>,
}

#[derive(Serialize)]
struct Icon<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct RenderedMod<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arg: Option<&'a str>,
    valid: bool,
}

impl<'a> From<&'a ModifierVariant> for RenderedMod<'a> {
    fn from(variant: &'a ModifierVariant) -> Self {
        Self {
            subtitle: variant.subtitle.as_deref(),
            arg: variant.command.as_deref(),
            valid: variant.selectable,
        }
    }
}

impl<'a> From<&'a ResultItem> for RenderedItem<'a> {
    fn from(item: &'a ResultItem) -> Self {
        Self {
            title: &item.title,
            subtitle: item.subtitle.as_deref(),
            arg: item.command.as_deref(),
            autocomplete: item.continuation.as_deref(),
            valid: item.selectable,
            icon: item.icon.as_deref().map(|path| Icon { path }),
            mods: item
                .modifiers
                .iter()
                .map(|(modifier, variant)| (*modifier, RenderedMod::from(variant)))
                .collect(),
        }
    }
}

/// Writes the emission as one JSON document followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn render(emission: &Emission, writer: &mut dyn Write) -> Result<()> {
    let document = ScriptFilter {
        items: emission.entries().into_iter().map(RenderedItem::from).collect(),
    };

    serde_json::to_writer(&mut *writer, &document)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::item::ModifierVariant;

    fn rendered(emission: &Emission) -> serde_json::Value {
        let mut out = Vec::new();
        render(emission, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn default_renders_first_then_items() {
        let emission = Emission {
            default: Some(ResultItem::drill("Search Jira", "search › ").with_icon("search.png")),
            items: vec![ResultItem::action("Login", "login")],
        };

        let json = rendered(&emission);
        let items = json["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["title"], "Search Jira");
        assert_eq!(items[0]["autocomplete"], "search › ");
        assert_eq!(items[0]["icon"]["path"], "search.png");
        assert_eq!(items[0]["valid"], false);
        assert_eq!(items[1]["arg"], "login");
        assert_eq!(items[1]["valid"], true);
        assert!(items[1].get("subtitle").is_none());
    }

    #[test]
    fn modifiers_render_under_their_key_names() {
        let item = ResultItem::drill("PROJ-1 (In Progress)", "in-progress › PROJ-1 › ")
            .with_modifier(Modifier::Cmd, ModifierVariant::action("Stop", "clearProgress PROJ-1"))
            .with_modifier(Modifier::Alt, ModifierVariant::action("Open", "openIssue PROJ-1"));
        let json = rendered(&Emission {
            default: None,
            items: vec![item],
        });

        let mods = &json["items"][0]["mods"];
        assert_eq!(mods["cmd"]["arg"], "clearProgress PROJ-1");
        assert_eq!(mods["alt"]["subtitle"], "Open");
        assert_eq!(mods["alt"]["valid"], true);
    }
}
