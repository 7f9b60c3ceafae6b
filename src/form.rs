use reqwest::{Method, Url};
use scraper::{ElementRef, Html};

use crate::parse::create_selector;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ControlKind {
    Text(String),
    Select {
        value: String,
        options: Vec<String>,
    },
    /// Radio group or checkbox list sharing one name: `(value, checked)` per member.
    List {
        options: Vec<(String, bool)>,
    },
    File,
}

#[derive(Debug, Clone)]
struct Control {
    name: String,
    kind: ControlKind,
}

/// What a form entry carries when submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// A file input with nothing picked. Only multipart bodies carry it.
    EmptyFile,
}

/// A form as a browser would submit it: target, method and the successful controls.
#[derive(Debug, Clone)]
pub struct HtmlForm {
    pub action: Url,
    pub method: Method,
    pub multipart: bool,
    controls: Vec<Control>,
}

impl HtmlForm {
    /// Reads the first `<form>` of a page. Relative actions resolve against `page_url`.
    pub fn first_in(html: &str, page_url: &Url) -> Result<Self> {
        let doc = Html::parse_document(html);
        let form_selector = create_selector("form")?;
        let form = doc
            .select(&form_selector)
            .next()
            .ok_or_else(|| Error::FormLayout(format!("no form on {page_url}")))?;

        let action = match form.value().attr("action").map(str::trim) {
            Some(action) if !action.is_empty() => page_url
                .join(action)
                .map_err(|e| Error::FormLayout(format!("bad form action {action:?}: {e}")))?,
            _ => page_url.clone(),
        };
        let method = match form.value().attr("method") {
            Some(m) if m.eq_ignore_ascii_case("post") => Method::POST,
            _ => Method::GET,
        };
        let multipart = form
            .value()
            .attr("enctype")
            .is_some_and(|e| e.eq_ignore_ascii_case("multipart/form-data"));

        Ok(Self {
            action,
            method,
            multipart,
            controls: collect_controls(form)?,
        })
    }

    /// Sets a text input or textarea.
    pub fn set_text(&mut self, name: &str, value: &str) -> Result<()> {
        self.controls
            .iter_mut()
            .find_map(|c| match &mut c.kind {
                ControlKind::Text(old) if c.name == name => Some(old),
                _ => None,
            })
            .map(|old| *old = value.to_string())
            .ok_or_else(|| Error::FormLayout(format!("no text field named {name:?}")))
    }

    /// Picks one option of a select, radio group or checkbox list; the option
    /// has to exist on the page. Other members of a group get unchecked.
    pub fn select_option(&mut self, name: &str, value: &str) -> Result<()> {
        let missing = || Error::FormLayout(format!("field {name:?} has no option {value:?}"));

        for control in self.controls.iter_mut().filter(|c| c.name == name) {
            match &mut control.kind {
                ControlKind::Select { value: chosen, options } => {
                    if !options.iter().any(|o| o == value) {
                        return Err(missing());
                    }
                    *chosen = value.to_string();
                    return Ok(());
                }
                ControlKind::List { options } => {
                    if !options.iter().any(|(o, _)| o == value) {
                        return Err(missing());
                    }
                    for (option, checked) in options.iter_mut() {
                        *checked = option == value;
                    }
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(Error::FormLayout(format!("no selection field named {name:?}")))
    }

    /// Every entry the form submits, in document order.
    pub fn entries(&self) -> Vec<(String, FieldValue)> {
        let mut entries = Vec::new();
        for control in &self.controls {
            let name = &control.name;
            match &control.kind {
                ControlKind::Text(value) | ControlKind::Select { value, .. } => {
                    entries.push((name.clone(), FieldValue::Text(value.clone())))
                }
                ControlKind::List { options } => entries.extend(
                    options
                        .iter()
                        .filter(|(_, checked)| *checked)
                        .map(|(value, _)| (name.clone(), FieldValue::Text(value.clone()))),
                ),
                ControlKind::File => entries.push((name.clone(), FieldValue::EmptyFile)),
            }
        }
        entries
    }

    /// Text name/value pairs in document order, as sent in urlencoded bodies and queries.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries()
            .into_iter()
            .filter_map(|(name, value)| match value {
                FieldValue::Text(value) => Some((name, value)),
                FieldValue::EmptyFile => None,
            })
            .collect()
    }
}

fn collect_controls(form: ElementRef) -> Result<Vec<Control>> {
    let control_selector = create_selector("input, textarea, select")?;
    let option_selector = create_selector("option")?;

    let mut controls: Vec<Control> = Vec::new();
    let mut has_submit = false;
    for el in form.select(&control_selector) {
        let attrs = el.value();
        let Some(name) = attrs.attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        if attrs.attr("disabled").is_some() {
            continue;
        }

        let kind = match attrs.name() {
            "textarea" => ControlKind::Text(el.text().collect()),
            "select" => {
                let options: Vec<(String, bool)> = el
                    .select(&option_selector)
                    .map(|o| {
                        let value = o
                            .value()
                            .attr("value")
                            .map(String::from)
                            .unwrap_or_else(|| o.text().collect::<String>().trim().to_string());
                        (value, o.value().attr("selected").is_some())
                    })
                    .collect();
                let value = options
                    .iter()
                    .find(|(_, selected)| *selected)
                    .or(options.first())
                    .map(|(v, _)| v.clone())
                    .unwrap_or_default();
                let options = options.into_iter().map(|(v, _)| v).collect();
                ControlKind::Select { value, options }
            }
            _ => {
                let value = attrs.attr("value").unwrap_or_default().to_string();
                match attrs.attr("type").unwrap_or("text").to_ascii_lowercase().as_str() {
                    "submit" => {
                        if has_submit {
                            continue;
                        }
                        has_submit = true;
                        ControlKind::Text(value)
                    }
                    "checkbox" | "radio" => {
                        let value = if value.is_empty() { "on".into() } else { value };
                        let member = (value, attrs.attr("checked").is_some());
                        let group = controls.iter_mut().find_map(|c| match &mut c.kind {
                            ControlKind::List { options } if c.name == name => Some(options),
                            _ => None,
                        });
                        match group {
                            Some(options) => {
                                options.push(member);
                                continue;
                            }
                            None => ControlKind::List {
                                options: vec![member],
                            },
                        }
                    }
                    "file" => ControlKind::File,
                    "reset" | "button" | "image" => continue,
                    _ => ControlKind::Text(value),
                }
            }
        };

        controls.push(Control {
            name: name.to_string(),
            kind,
        });
    }
    Ok(controls)
}
