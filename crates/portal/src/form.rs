//! Typed adapter over an HTML form.
//!
//! The portal is driven by filling named controls and posting them back, so
//! instead of poking at markup everywhere, a page's form is parsed once into
//! an [`HtmlForm`]: its action URL, method, the submittable field defaults,
//! and the inventory of control names that exist at all. Setting an unknown
//! control is a `Result`, not a panic — required controls turn that into a
//! structural error, optional ones into a per-field warning.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::PortalError;

#[derive(Debug, Clone)]
pub struct HtmlForm {
    name: String,
    action: Url,
    method: String,
    /// Fields submitted with the form, in document order.
    fields: Vec<(String, String)>,
    /// Every named control present in the markup, including checkboxes that
    /// are currently unchecked (absent from `fields` until set).
    controls: HashSet<String>,
}

impl HtmlForm {
    /// Finds the form named `name` in `html` and captures its submittable
    /// state. `page_url` anchors relative action URLs.
    pub fn parse(html: &str, name: &str, page_url: &Url) -> Option<HtmlForm> {
        let document = Html::parse_document(html);
        let form_sel = Selector::parse("form").unwrap();
        let form_el = document
            .select(&form_sel)
            .find(|el| el.value().attr("name") == Some(name))?;

        let action = form_el
            .value()
            .attr("action")
            .and_then(|a| page_url.join(a).ok())
            .unwrap_or_else(|| page_url.clone());
        let method = form_el
            .value()
            .attr("method")
            .unwrap_or("get")
            .to_lowercase();

        let mut form = HtmlForm {
            name: name.to_string(),
            action,
            method,
            fields: Vec::new(),
            controls: HashSet::new(),
        };
        form.collect_controls(form_el);
        Some(form)
    }

    fn collect_controls(&mut self, form_el: ElementRef<'_>) {
        let control_sel = Selector::parse("input, select, textarea").unwrap();
        for el in form_el.select(&control_sel) {
            let Some(name) = el.value().attr("name") else {
                continue;
            };
            self.controls.insert(name.to_string());

            match el.value().name() {
                "input" => {
                    let kind = el.value().attr("type").unwrap_or("text").to_lowercase();
                    match kind.as_str() {
                        // Unchecked boxes are known controls but submit nothing.
                        "checkbox" | "radio" => {
                            if el.value().attr("checked").is_some() {
                                let value = el.value().attr("value").unwrap_or("on");
                                self.fields.push((name.to_string(), value.to_string()));
                            }
                        }
                        // Buttons only submit when clicked; this protocol
                        // "clicks" via injected hidden fields instead.
                        "submit" | "button" | "image" | "reset" | "file" => {}
                        _ => {
                            let value = el.value().attr("value").unwrap_or("");
                            self.fields.push((name.to_string(), value.to_string()));
                        }
                    }
                }
                "select" => {
                    if let Some(value) = selected_option(el) {
                        self.fields.push((name.to_string(), value));
                    }
                }
                "textarea" => {
                    let value: String = el.text().collect();
                    self.fields.push((name.to_string(), value));
                }
                _ => {}
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> &Url {
        &self.action
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn has_control(&self, name: &str) -> bool {
        self.controls.contains(name)
    }

    /// Sets a control that must exist in the form.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), PortalError> {
        if !self.controls.contains(name) {
            return Err(PortalError::ControlMissing {
                control: name.to_string(),
            });
        }
        self.set_field(name, value);
        Ok(())
    }

    /// Ticks a checkbox-style control ("on").
    pub fn check(&mut self, name: &str) -> Result<(), PortalError> {
        self.set(name, "on")
    }

    /// Adds a field the markup never declared, mirroring a scripted link
    /// click that materializes hidden inputs at submit time.
    pub fn add_hidden(&mut self, name: &str, value: &str) {
        self.controls.insert(name.to_string());
        self.set_field(name, value);
    }

    fn set_field(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_string();
        } else {
            self.fields.push((name.to_string(), value.to_string()));
        }
    }

    /// The submittable (name, value) pairs in document order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn into_parts(self) -> (Url, String, Vec<(String, String)>) {
        (self.action, self.method, self.fields)
    }
}

/// Value a `<select>` submits by default: the first selected option, else
/// the first option, else nothing. An option without a `value` attribute
/// submits its text.
fn selected_option(select_el: ElementRef<'_>) -> Option<String> {
    let option_sel = Selector::parse("option").unwrap();
    let options: Vec<ElementRef<'_>> = select_el.select(&option_sel).collect();
    let chosen = options
        .iter()
        .find(|o| o.value().attr("selected").is_some())
        .or_else(|| options.first())?;
    Some(match chosen.value().attr("value") {
        Some(v) => v.to_string(),
        None => chosen.text().collect::<String>().trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://portal.test/rp_web/welcome.xhtml").unwrap()
    }

    const SEARCH_FORM: &str = r#"
        <html><body>
        <form name="form" method="post" action="erweitertesuche.xhtml">
            <input type="hidden" name="form" value="form" />
            <input type="hidden" name="javax.faces.ViewState" value="state-token" />
            <input type="text" name="form:schlagwoerter" value="" />
            <select name="form:schlagwortOptionen">
                <option value="1" selected="selected">all</option>
                <option value="2">min</option>
                <option value="3">exact</option>
            </select>
            <input type="checkbox" name="form:bundeslandBE" />
            <input type="checkbox" name="form:bundeslandHH" checked="checked" value="on" />
            <input type="submit" name="form:btnSuche" value="Find" />
        </form>
        </body></html>
    "#;

    #[test]
    fn missing_form_is_none() {
        assert!(HtmlForm::parse(SEARCH_FORM, "naviForm", &page_url()).is_none());
    }

    #[test]
    fn captures_action_method_and_defaults() {
        let form = HtmlForm::parse(SEARCH_FORM, "form", &page_url()).unwrap();
        assert_eq!(
            form.action().as_str(),
            "https://portal.test/rp_web/erweitertesuche.xhtml"
        );
        assert_eq!(form.method(), "post");
        // Hidden inputs and the selected option submit by default.
        assert!(
            form.fields()
                .contains(&("javax.faces.ViewState".into(), "state-token".into()))
        );
        assert!(
            form.fields()
                .contains(&("form:schlagwortOptionen".into(), "1".into()))
        );
        // Checked box submits, unchecked box does not.
        assert!(
            form.fields()
                .contains(&("form:bundeslandHH".into(), "on".into()))
        );
        assert!(!form.fields().iter().any(|(n, _)| n == "form:bundeslandBE"));
        // Submit buttons are not auto-submitted.
        assert!(!form.fields().iter().any(|(n, _)| n == "form:btnSuche"));
    }

    #[test]
    fn set_updates_known_controls() {
        let mut form = HtmlForm::parse(SEARCH_FORM, "form", &page_url()).unwrap();
        form.set("form:schlagwoerter", "Gasag AG").unwrap();
        form.set("form:schlagwortOptionen", "3").unwrap();
        assert!(
            form.fields()
                .contains(&("form:schlagwoerter".into(), "Gasag AG".into()))
        );
        assert!(
            form.fields()
                .contains(&("form:schlagwortOptionen".into(), "3".into()))
        );
    }

    #[test]
    fn unchecked_checkbox_is_settable() {
        let mut form = HtmlForm::parse(SEARCH_FORM, "form", &page_url()).unwrap();
        assert!(form.has_control("form:bundeslandBE"));
        form.check("form:bundeslandBE").unwrap();
        assert!(
            form.fields()
                .contains(&("form:bundeslandBE".into(), "on".into()))
        );
    }

    #[test]
    fn unknown_control_is_a_typed_error() {
        let mut form = HtmlForm::parse(SEARCH_FORM, "form", &page_url()).unwrap();
        let err = form.check("form:bundeslandXX").unwrap_err();
        match err {
            PortalError::ControlMissing { control } => {
                assert_eq!(control, "form:bundeslandXX");
            }
            other => panic!("expected ControlMissing, got {other:?}"),
        }
    }

    #[test]
    fn add_hidden_injects_undeclared_fields() {
        let mut form = HtmlForm::parse(SEARCH_FORM, "form", &page_url()).unwrap();
        form.add_hidden("target", "erweiterteSucheLink");
        assert!(
            form.fields()
                .contains(&("target".into(), "erweiterteSucheLink".into()))
        );
        // Injected controls become settable like any other.
        form.set("target", "other").unwrap();
        assert!(form.fields().contains(&("target".into(), "other".into())));
    }

    #[test]
    fn form_without_action_posts_back_to_the_page() {
        let html = r#"<form name="naviForm" method="post"><input type="hidden" name="x" value="1"/></form>"#;
        let form = HtmlForm::parse(html, "naviForm", &page_url()).unwrap();
        assert_eq!(form.action(), &page_url());
    }

    #[test]
    fn select_without_selected_option_submits_the_first() {
        let html = r#"
            <form name="f" method="post">
                <select name="choice">
                    <option value="a">A</option>
                    <option value="b">B</option>
                </select>
            </form>
        "#;
        let form = HtmlForm::parse(html, "f", &page_url()).unwrap();
        assert!(form.fields().contains(&("choice".into(), "a".into())));
    }
}
