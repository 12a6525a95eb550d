//! DOM text overlay
//!
//! Text commands are drawn as absolutely positioned elements over the
//! canvas, the same way the HUD is kept in the page rather than the GPU.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::renderer::{DrawCommand, DrawList, RenderError, TextAlign, TextBaseline};

/// One pooled text element and the style it currently shows
struct Label {
    element: HtmlElement,
    shown: String,
}

pub struct TextOverlay {
    document: Document,
    container: HtmlElement,
    labels: Vec<Label>,
}

fn overlay_err(e: wasm_bindgen::JsValue) -> RenderError {
    RenderError::Overlay(format!("{:?}", e))
}

fn css_color(c: [f32; 4]) -> String {
    format!(
        "rgba({}, {}, {}, {:.3})",
        (c[0] * 255.0).round() as u8,
        (c[1] * 255.0).round() as u8,
        (c[2] * 255.0).round() as u8,
        c[3]
    )
}

impl TextOverlay {
    /// Use `#text-overlay` if the page has one, otherwise create it
    pub fn new(document: &Document) -> Result<Self, RenderError> {
        let container: HtmlElement = match document.get_element_by_id("text-overlay") {
            Some(el) => el.dyn_into().map_err(|_| {
                RenderError::Overlay("#text-overlay is not an HTML element".into())
            })?,
            None => {
                let el: HtmlElement = document
                    .create_element("div")
                    .map_err(overlay_err)?
                    .dyn_into()
                    .map_err(|_| RenderError::Overlay("div is not an HTML element".into()))?;
                el.set_id("text-overlay");
                let style = el.style();
                for (name, value) in [
                    ("position", "fixed"),
                    ("left", "0"),
                    ("top", "0"),
                    ("width", "100%"),
                    ("height", "100%"),
                    ("pointer-events", "none"),
                    ("overflow", "hidden"),
                ] {
                    style.set_property(name, value).map_err(overlay_err)?;
                }
                document
                    .body()
                    .ok_or_else(|| RenderError::Overlay("no body".into()))?
                    .append_child(&el)
                    .map_err(overlay_err)?;
                el
            }
        };

        Ok(Self {
            document: document.clone(),
            container,
            labels: Vec::new(),
        })
    }

    fn label(&mut self, index: usize) -> Result<&mut Label, RenderError> {
        while self.labels.len() <= index {
            let element: HtmlElement = self
                .document
                .create_element("span")
                .map_err(overlay_err)?
                .dyn_into()
                .map_err(|_| RenderError::Overlay("span is not an HTML element".into()))?;
            self.container.append_child(&element).map_err(overlay_err)?;
            self.labels.push(Label {
                element,
                shown: String::new(),
            });
        }
        Ok(&mut self.labels[index])
    }

    /// Show the text commands of `list`, hide leftover labels
    pub fn render(&mut self, list: &DrawList) -> Result<(), RenderError> {
        let mut used = 0;
        for command in &list.commands {
            let DrawCommand::Text {
                text,
                pos,
                size,
                align,
                baseline,
                color,
            } = command
            else {
                continue;
            };

            let dx = match align {
                TextAlign::Left => "0",
                TextAlign::Center => "-50%",
            };
            let dy = match baseline {
                TextBaseline::Middle => "-50%",
                TextBaseline::Bottom => "-100%",
            };
            let css = format!(
                "position:absolute;left:{:.1}px;top:{:.1}px;font-size:{}px;\
                 color:{};white-space:pre;line-height:1;transform:translate({},{})",
                pos.x,
                pos.y,
                size,
                css_color(*color),
                dx,
                dy
            );
            let shown = format!("{}\u{0}{}", css, text);

            let label = self.label(used)?;
            if label.shown != shown {
                label.element.set_attribute("style", &css).map_err(overlay_err)?;
                label.element.set_text_content(Some(text));
                label.shown = shown;
            }
            used += 1;
        }

        for label in self.labels.iter_mut().skip(used) {
            if !label.shown.is_empty() {
                label
                    .element
                    .set_attribute("style", "display:none")
                    .map_err(overlay_err)?;
                label.shown.clear();
            }
        }
        Ok(())
    }
}
