use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event, EventTarget, HtmlButtonElement, HtmlElement};

use playmap_shared::popup::TOGGLE_ACTION;
use playmap_shared::toggle::{ButtonSurface, FavoriteButton};

pub const ITEM_ID_ATTR: &str = "data-playground-id";

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// Selector for every control bound to an item's favorite state.
pub fn favorite_button_selector() -> String {
    format!("[data-action=\"{TOGGLE_ACTION}\"][{ITEM_ID_ATTR}]")
}

/// A favorite control on the page. Usually a `<button>`, but any element
/// carrying the toggle action works; those get a `disabled` attribute instead.
#[derive(Clone)]
pub struct DomButton {
    el: HtmlElement,
}

impl DomButton {
    pub fn from_element(el: Element) -> Option<Self> {
        el.dyn_into::<HtmlElement>().ok().map(|el| Self { el })
    }
}

impl FavoriteButton for DomButton {
    fn item_id(&self) -> Option<String> {
        self.el
            .get_attribute(ITEM_ID_ATTR)
            .filter(|id| !id.trim().is_empty())
    }

    fn is_disabled(&self) -> bool {
        match self.el.dyn_ref::<HtmlButtonElement>() {
            Some(button) => button.disabled(),
            None => self.el.has_attribute("disabled"),
        }
    }

    fn set_disabled(&self, disabled: bool) {
        if let Some(button) = self.el.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if disabled {
            let _ = self.el.set_attribute("disabled", "");
        } else {
            let _ = self.el.remove_attribute("disabled");
        }
    }

    fn set_label(&self, label: &str) {
        self.el.set_text_content(Some(label));
    }
}

/// All favorite controls currently in the document, popups included.
pub struct DocumentButtons {
    document: Document,
    selector: String,
}

impl DocumentButtons {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            selector: favorite_button_selector(),
        }
    }
}

impl ButtonSurface for DocumentButtons {
    type Button = DomButton;

    fn favorite_buttons(&self) -> Vec<DomButton> {
        let Ok(nodes) = self.document.query_selector_all(&self.selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|idx| nodes.item(idx))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(DomButton::from_element)
            .collect()
    }
}

/// An event listener that is removed when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn Fn(Event)>,
}

impl Listener {
    pub fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl Fn(Event) + 'static,
    ) -> Result<Self, String> {
        let callback = Closure::<dyn Fn(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| format!("failed to listen for {event}: {e:?}"))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
