//! Cached HTML page cleaning
//!
//! Fixture pages are stored after stripping everything that executes,
//! restyles or embeds: scripts, inline event handlers, stylesheets, inline
//! styles, meta tags, links, embedded objects, frames, forms and any
//! attribute outside the safe list. Tags the cleaner does not know about are
//! left alone unless the policy says otherwise.

use std::error::Error;
use std::fs;
use std::path::Path;

use lol_html::html_content::Element;
use lol_html::{doc_comments, element, HtmlRewriter, Settings};
use tracing::{debug, info};

use crate::error::{FixtureError, Result};

type HandlerResult = std::result::Result<(), Box<dyn Error + Send + Sync>>;

/// Attributes that may carry a script URL
const LINK_ATTRIBUTES: [&str; 5] = ["href", "src", "action", "formaction", "background"];

const SCRIPT_SCHEMES: [&str; 2] = ["javascript:", "vbscript:"];

/// Attributes kept when only safe attributes are allowed
const SAFE_ATTRIBUTES: &[&str] = &[
    "abbr", "accept", "accept-charset", "accesskey", "action", "align", "alt", "axis",
    "border", "cellpadding", "cellspacing", "char", "charoff", "charset", "checked", "cite",
    "class", "clear", "color", "cols", "colspan", "compact", "coords", "datetime", "dir",
    "disabled", "enctype", "for", "frame", "headers", "height", "href", "hreflang", "hspace",
    "id", "ismap", "label", "lang", "longdesc", "maxlength", "media", "method", "multiple",
    "name", "nohref", "noshade", "nowrap", "prompt", "readonly", "rel", "rev", "rows",
    "rowspan", "rules", "scope", "selected", "shape", "size", "span", "src", "start",
    "summary", "tabindex", "target", "title", "type", "usemap", "valign", "value", "vspace",
    "width",
];

/// Tag names treated as known markup when unknown tags are being removed
const KNOWN_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "address", "applet", "area", "article", "aside", "audio", "b",
    "base", "basefont", "bdi", "bdo", "big", "blink", "blockquote", "body", "br", "button",
    "canvas", "caption", "center", "cite", "code", "col", "colgroup", "data", "datalist", "dd",
    "del", "details", "dfn", "dialog", "dir", "div", "dl", "dt", "em", "embed", "fieldset",
    "figcaption", "figure", "font", "footer", "form", "frame", "frameset", "h1", "h2", "h3",
    "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input",
    "ins", "isindex", "kbd", "label", "layer", "legend", "li", "link", "main", "map", "mark",
    "marquee", "menu", "meta", "meter", "nav", "noframes", "noscript", "object", "ol",
    "optgroup", "option", "output", "p", "param", "picture", "pre", "progress", "q", "rp",
    "rt", "ruby", "s", "samp", "script", "section", "select", "small", "source", "span",
    "strike", "strong", "style", "sub", "summary", "sup", "svg", "table", "tbody", "td",
    "template", "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "tt", "u",
    "ul", "var", "video", "wbr",
];

/// Which kinds of markup the cleaner strips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanerPolicy {
    /// `<script>` elements, `on*` handler attributes and script URLs
    pub javascript: bool,
    /// `<style>` elements, stylesheet links and `style` attributes
    pub style: bool,
    /// `<meta>` elements
    pub meta: bool,
    /// HTML comments, including bogus comments such as processing instructions
    pub comments: bool,
    /// Every `<link>` element
    pub links: bool,
    /// `<applet>` with its content; `iframe`, `embed`, `layer`, `object` and `param` tags
    pub embedded: bool,
    /// `<frameset>` and `<frame>` elements
    pub frames: bool,
    /// Form controls with their content; `<form>` tags
    pub forms: bool,
    /// `<blink>` and `<marquee>` tags
    pub annoying_tags: bool,
    /// `head` and `title` tags; the `html` root becomes a bare `div`
    pub page_structure: bool,
    /// Drop attributes missing from the safe attribute list
    pub safe_attrs_only: bool,
    /// Unwrap tags missing from the known tag list, keeping their content
    pub remove_unknown_tags: bool,
}

impl CleanerPolicy {
    /// Policy used for the stored fixture pages: everything stripped, unknown tags kept
    pub fn fixture() -> Self {
        Self {
            javascript: true,
            style: true,
            meta: true,
            comments: true,
            links: true,
            embedded: true,
            frames: true,
            forms: true,
            annoying_tags: true,
            page_structure: true,
            safe_attrs_only: true,
            remove_unknown_tags: false,
        }
    }

    /// Elements removed together with their content
    fn kill_tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.javascript {
            tags.push("script");
        }
        if self.style {
            tags.push("style");
        }
        if self.links {
            tags.push("link");
        }
        if self.meta {
            tags.push("meta");
        }
        if self.embedded {
            tags.push("applet");
        }
        if self.frames {
            tags.extend(["frameset", "frame"]);
        }
        if self.forms {
            tags.extend(["button", "input", "select", "textarea"]);
        }
        tags
    }

    /// Tags dropped while their content is kept
    fn unwrap_tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.embedded {
            tags.extend(["iframe", "embed", "layer", "object", "param"]);
        }
        if self.forms {
            tags.push("form");
        }
        if self.annoying_tags {
            tags.extend(["blink", "marquee"]);
        }
        if self.page_structure {
            tags.extend(["head", "title"]);
        }
        tags
    }

    /// Stylesheets can carry script, so they go whenever links are otherwise kept
    fn removes_stylesheet_links(&self) -> bool {
        !self.links && (self.style || self.javascript)
    }
}

impl Default for CleanerPolicy {
    fn default() -> Self {
        Self::fixture()
    }
}

/// Clean an HTML document according to `policy`
pub fn clean_html(input: &[u8], policy: &CleanerPolicy) -> Result<Vec<u8>> {
    let policy = *policy;
    let kill_tags = policy.kill_tags();
    let unwrap_tags = policy.unwrap_tags();

    let element_handlers = vec![element!("*", move |el| {
        clean_element(el, &policy, &kill_tags, &unwrap_tags)
    })];

    let mut document_handlers = Vec::new();
    if policy.comments {
        document_handlers.push(doc_comments!(|c| {
            c.remove();
            Ok(())
        }));
    }

    let mut output = Vec::with_capacity(input.len());
    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: element_handlers,
            document_content_handlers: document_handlers,
            ..Settings::new()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter.write(input)?;
    rewriter.end()?;

    Ok(output)
}

/// Clean `source` and write the result to `destination`, replacing its contents.
///
/// Returns the number of bytes written.
pub fn clean_file(source: &Path, destination: &Path, policy: &CleanerPolicy) -> Result<usize> {
    let input = fs::read(source).map_err(|e| FixtureError::io(source, e))?;
    info!("Read {} bytes from {}", input.len(), source.display());

    let cleaned = clean_html(&input, policy)?;
    fs::write(destination, &cleaned).map_err(|e| FixtureError::io(destination, e))?;
    info!("Wrote {} bytes to {}", cleaned.len(), destination.display());

    Ok(cleaned.len())
}

fn clean_element(
    el: &mut Element<'_, '_>,
    policy: &CleanerPolicy,
    kill_tags: &[&str],
    unwrap_tags: &[&str],
) -> HandlerResult {
    let tag = el.tag_name();

    if kill_tags.contains(&tag.as_str())
        || (tag == "link" && policy.removes_stylesheet_links() && is_stylesheet_link(el))
    {
        debug!("Removing <{}>", tag);
        el.remove();
        return Ok(());
    }

    if policy.page_structure && tag == "html" {
        // the root cannot be unwrapped, so it is kept as an empty div
        el.set_tag_name("div")?;
        remove_attributes(el, |_| true);
    } else if unwrap_tags.contains(&tag.as_str())
        || (policy.remove_unknown_tags && !is_known_tag(&tag))
    {
        debug!("Unwrapping <{}>", tag);
        el.remove_and_keep_content();
    }

    if policy.safe_attrs_only {
        remove_attributes(el, |name| !SAFE_ATTRIBUTES.contains(&name));
    }
    if policy.javascript {
        strip_javascript(el)?;
    }
    if policy.style {
        el.remove_attribute("style");
    }
    Ok(())
}

fn remove_attributes<F>(el: &mut Element<'_, '_>, should_remove: F)
where
    F: Fn(&str) -> bool,
{
    let names: Vec<String> = el
        .attributes()
        .iter()
        .map(|attr| attr.name())
        .filter(|name| should_remove(&name.to_ascii_lowercase()))
        .collect();
    for name in &names {
        el.remove_attribute(name);
    }
}

fn strip_javascript(el: &mut Element<'_, '_>) -> HandlerResult {
    remove_attributes(el, |name| name.starts_with("on"));

    for name in LINK_ATTRIBUTES {
        if let Some(value) = el.get_attribute(name) {
            if is_script_url(&value) {
                el.set_attribute(name, "")?;
            }
        }
    }
    Ok(())
}

fn is_script_url(value: &str) -> bool {
    let value = value.trim_start().to_ascii_lowercase();
    SCRIPT_SCHEMES.iter().any(|scheme| value.starts_with(scheme))
}

fn is_stylesheet_link(el: &Element<'_, '_>) -> bool {
    el.get_attribute("rel")
        .map(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        })
        .unwrap_or(false)
}

fn is_known_tag(name: &str) -> bool {
    KNOWN_TAGS.contains(&name.to_ascii_lowercase().as_str())
}
