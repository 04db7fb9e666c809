//! Parse plugin state and action links out of raw admin-page HTML.
//!
//! This is the scraping core of the crate. Everything here is a pure
//! function from an HTML string to a structured record, decoupled from
//! network I/O so it can be tested against fixture markup. The functions
//! encode the admin pages' markup contract:
//!
//! - the plugin list lives under the element with id `the-list`, one direct
//!   child per installed plugin, the child's own id being the plugin name
//!   and an `active` class marking activation state;
//! - each row nests a `plugin-version-author-uri` element whose text reads
//!   `"Version <v> | By <author>"`;
//! - each row nests `activate` / `deactivate` sections containing an anchor
//!   with exactly that visible text and the action URL in its `href`;
//! - the upload form carries its one-time token in a hidden `_wpnonce`
//!   input.
//!
//! The contract is site-version-dependent and breaks if the markup changes;
//! breakage surfaces as [`Error::NotFound`].

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Id of the element containing one child per installed plugin.
const LIST_CONTAINER_ID: &str = "the-list";

/// Class of the element whose text carries the plugin version.
const VERSION_CLASS_SELECTOR: &str = ".plugin-version-author-uri";

/// Decorations around the version number in the version element's text.
const VERSION_PREFIX: &str = "Version ";
const VERSION_SUFFIX_MARKER: &str = " | By";

/// One installed plugin, as read off the listing page.
///
/// Ephemeral: rebuilt fresh on every listing call, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Unique identifier, taken from the row element's id attribute.
    pub name: String,
    /// Version string, when the row carries one.
    pub version: Option<String>,
    /// Whether the row carried the `active` class.
    pub active: bool,
}

/// A state-changing command the listing page exposes per plugin row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginAction {
    /// Turn an inactive plugin on.
    Activate,
    /// Turn an active plugin off.
    Deactivate,
}

impl PluginAction {
    /// Class of the row section holding this action's link.
    pub fn section_class(self) -> &'static str {
        match self {
            PluginAction::Activate => "activate",
            PluginAction::Deactivate => "deactivate",
        }
    }

    /// Exact visible text of this action's anchor.
    pub fn link_text(self) -> &'static str {
        match self {
            PluginAction::Activate => "Activate",
            PluginAction::Deactivate => "Deactivate",
        }
    }
}

// ── Plugin listing ──────────────────────────────────────────────────────────

/// Extract all plugin rows from the listing page.
///
/// A page with a list container but zero rows yields an empty vec. A page
/// without the container at all is a broken markup contract and yields
/// [`Error::NotFound`].
pub fn parse_plugin_list(html: &str) -> Result<Vec<Plugin>> {
    let document = Html::parse_document(html);
    let container = list_container(&document)?;

    let plugins = container
        .children()
        .filter_map(ElementRef::wrap)
        .filter_map(parse_plugin_row)
        .collect();

    Ok(plugins)
}

fn list_container(document: &Html) -> Result<ElementRef<'_>> {
    let sel = Selector::parse("#the-list").unwrap();
    document.select(&sel).next().ok_or_else(|| {
        Error::NotFound(format!(
            "cannot find plugin list container #{LIST_CONTAINER_ID}"
        ))
    })
}

fn parse_plugin_row(row: ElementRef<'_>) -> Option<Plugin> {
    // The row's own id is the plugin name; rows without one are decoration.
    let name = row.value().attr("id")?.to_string();
    let active = row.value().classes().any(|c| c == "active");

    let version_sel = Selector::parse(VERSION_CLASS_SELECTOR).unwrap();
    let version = row
        .select(&version_sel)
        .next()
        .and_then(|el| parse_version(&el.text().collect::<String>()));

    Some(Plugin {
        name,
        version,
        active,
    })
}

/// Trim the fixed decorations off the version element's text.
///
/// `"Version 3.2.1 | By Jane Doe"` becomes `"3.2.1"`. Text without the
/// `"Version "` prefix yields `None`.
fn parse_version(text: &str) -> Option<String> {
    let rest = text.trim().strip_prefix(VERSION_PREFIX)?;
    let version = match rest.find(VERSION_SUFFIX_MARKER) {
        Some(idx) => &rest[..idx],
        None => rest,
    };
    let version = version.trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

// ── Action links ────────────────────────────────────────────────────────────

/// Locate the action link for one plugin on the listing page.
///
/// Finds the row by id, then the section with the action's class, then an
/// anchor inside it whose visible text is exactly the action's label, and
/// returns that anchor's `href`. Each missing layer is a distinct
/// [`Error::NotFound`].
pub fn find_action_link(html: &str, plugin: &str, action: PluginAction) -> Result<String> {
    let document = Html::parse_document(html);
    let container = list_container(&document)?;

    // Row ids are arbitrary plugin names, so compare attributes directly
    // instead of interpolating them into a CSS selector.
    let row = container
        .children()
        .filter_map(ElementRef::wrap)
        .find(|row| row.value().attr("id") == Some(plugin))
        .ok_or_else(|| Error::NotFound(format!("cannot find plugin {plugin}")))?;

    let section_sel = match action {
        PluginAction::Activate => Selector::parse(".activate").unwrap(),
        PluginAction::Deactivate => Selector::parse(".deactivate").unwrap(),
    };
    let anchor_sel = Selector::parse("a[href]").unwrap();

    let href = row
        .select(&section_sel)
        .flat_map(|section| section.select(&anchor_sel))
        .find(|a| a.text().collect::<String>() == action.link_text())
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| {
            Error::NotFound(format!(
                "cannot find {} link for plugin {plugin}",
                action.section_class()
            ))
        })?;

    Ok(href.to_string())
}

// ── Upload form nonce ───────────────────────────────────────────────────────

/// Extract the one-time `_wpnonce` token from the plugin-upload form.
pub fn find_nonce(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse(r#"input[name="_wpnonce"]"#).unwrap();

    document
        .select(&sel)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
        .ok_or_else(|| Error::NotFound("cannot find upload nonce".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_page(rows: &str) -> String {
        format!(
            r#"<html><body>
            <table class="wp-list-table plugins">
            <tbody id="the-list">{rows}</tbody>
            </table>
            </body></html>"#
        )
    }

    const AKISMET_INACTIVE: &str = r#"
        <tr id="akismet" class="inactive">
            <td class="plugin-title"><strong>Akismet</strong>
                <div class="row-actions visible">
                    <span class="activate">
                        <a href="plugins.php?action=activate&amp;plugin=akismet">Activate</a>
                    </span>
                </div>
            </td>
            <td class="column-description">
                <div class="plugin-version-author-uri">Version 3.2.1 | By Jane Doe | Visit plugin site</div>
            </td>
        </tr>"#;

    const HELLO_ACTIVE: &str = r#"
        <tr id="hello-dolly" class="active">
            <td class="plugin-title"><strong>Hello Dolly</strong>
                <div class="row-actions visible">
                    <span class="deactivate">
                        <a href="plugins.php?action=deactivate&amp;plugin=hello-dolly">Deactivate</a>
                    </span>
                </div>
            </td>
            <td class="column-description">
                <div class="plugin-version-author-uri">Version 1.7.2 | By Matt Mullenweg</div>
            </td>
        </tr>"#;

    #[test]
    fn empty_list_yields_empty_vec() {
        let plugins = parse_plugin_list(&listing_page("")).expect("parse");
        assert!(plugins.is_empty());
    }

    #[test]
    fn missing_container_is_not_found() {
        let err = parse_plugin_list("<html><body><p>nothing here</p></body></html>");
        assert!(matches!(err, Err(Error::NotFound(_))));
    }

    #[test]
    fn rows_parse_into_name_version_and_state() {
        let html = listing_page(&format!("{AKISMET_INACTIVE}{HELLO_ACTIVE}"));
        let plugins = parse_plugin_list(&html).expect("parse");

        assert_eq!(plugins.len(), 2);

        assert_eq!(plugins[0].name, "akismet");
        assert_eq!(plugins[0].version.as_deref(), Some("3.2.1"));
        assert!(!plugins[0].active);

        assert_eq!(plugins[1].name, "hello-dolly");
        assert_eq!(plugins[1].version.as_deref(), Some("1.7.2"));
        assert!(plugins[1].active);
    }

    #[test]
    fn only_the_exact_active_class_counts_as_active() {
        // "inactive" contains "active" as a substring; class comparison must
        // be on whole class names.
        let html = listing_page(r#"<tr id="a" class="inactive"></tr><tr id="b" class="active"></tr>"#);
        let plugins = parse_plugin_list(&html).expect("parse");
        assert!(!plugins[0].active);
        assert!(plugins[1].active);
    }

    #[test]
    fn version_text_is_trimmed_of_decorations() {
        assert_eq!(
            parse_version("Version 3.2.1 | By Jane Doe"),
            Some("3.2.1".to_string())
        );
        assert_eq!(parse_version("Version 10.0"), Some("10.0".to_string()));
        assert_eq!(parse_version("By Jane Doe"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn rows_without_version_element_have_no_version() {
        let html = listing_page(r#"<tr id="bare" class="inactive"><td>no description cell</td></tr>"#);
        let plugins = parse_plugin_list(&html).expect("parse");
        assert_eq!(plugins[0].version, None);
    }

    #[test]
    fn activate_link_is_found_by_class_and_exact_text() {
        let html = listing_page(AKISMET_INACTIVE);
        let href = find_action_link(&html, "akismet", PluginAction::Activate).expect("href");
        assert_eq!(href, "plugins.php?action=activate&plugin=akismet");
    }

    #[test]
    fn deactivate_link_is_symmetric() {
        let html = listing_page(HELLO_ACTIVE);
        let href = find_action_link(&html, "hello-dolly", PluginAction::Deactivate).expect("href");
        assert_eq!(href, "plugins.php?action=deactivate&plugin=hello-dolly");
    }

    #[test]
    fn row_without_matching_link_text_is_not_found() {
        let row = r#"
            <tr id="akismet" class="inactive">
                <td><span class="activate">
                    <a href="plugins.php?action=activate&amp;plugin=akismet">Enable</a>
                </span></td>
            </tr>"#;
        let err = find_action_link(&listing_page(row), "akismet", PluginAction::Activate);
        match err {
            Err(Error::NotFound(msg)) => assert!(msg.contains("activate link")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn unknown_plugin_is_not_found() {
        let html = listing_page(AKISMET_INACTIVE);
        let err = find_action_link(&html, "missing-plugin", PluginAction::Activate);
        assert!(matches!(err, Err(Error::NotFound(_))));
    }

    #[test]
    fn nonce_is_read_from_hidden_input() {
        let html = r#"
            <form method="post" enctype="multipart/form-data" class="wp-upload-form"
                  action="update.php?action=upload-plugin">
                <input type="hidden" id="_wpnonce" name="_wpnonce" value="a51dcd3544" />
                <input type="file" id="pluginzip" name="pluginzip" />
                <input type="submit" name="install-plugin-submit" value="Install Now" />
            </form>"#;
        assert_eq!(find_nonce(html).expect("nonce"), "a51dcd3544");
    }

    #[test]
    fn page_without_nonce_input_is_not_found() {
        let err = find_nonce("<form><input type=\"file\" name=\"pluginzip\" /></form>");
        assert!(matches!(err, Err(Error::NotFound(_))));
    }
}
