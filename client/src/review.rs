use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, FormData, HtmlElement, HtmlFormElement, HtmlInputElement};

use playmap_shared::popup::REVIEW_MODAL_SELECTOR;
use playmap_shared::review::{Review, ReviewForm, ReviewReply, ReviewTransport, ReviewView};
use playmap_shared::{ClientConfig, Endpoints, ReviewSubmission, ReviewTarget, TransportError};

use crate::bootstrap;
use crate::csrf::PageCsrf;
use crate::dom::Listener;
use crate::net::{StatusPolicy, post_form};
use crate::notify::PageNotifier;

const FORM_ID: &str = "reviewForm";
const TARGET_INPUT_ID: &str = "playgroundId";
const TITLE_SELECTOR: &str = ".modal-title";
const LIST_ID: &str = "review-list";
const EMPTY_MESSAGE_ID: &str = "no-reviews-message";

pub type PageReviews = ReviewSubmission<DomReviewView, DomReviewForm, HttpReviews, PageNotifier>;

pub struct DomReviewForm {
    form: HtmlFormElement,
    target: Option<HtmlInputElement>,
}

impl DomReviewForm {
    fn find(document: &Document) -> Option<Self> {
        let form = document
            .get_element_by_id(FORM_ID)?
            .dyn_into::<HtmlFormElement>()
            .ok()?;
        let target = document
            .get_element_by_id(TARGET_INPUT_ID)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        Some(Self { form, target })
    }
}

impl ReviewForm for DomReviewForm {
    fn item_id(&self) -> String {
        self.target.as_ref().map(|input| input.value()).unwrap_or_default()
    }

    fn set_item_id(&self, item_id: &str) {
        if let Some(input) = &self.target {
            input.set_value(item_id);
        }
    }

    /// Text entries of the form in document order. File inputs are skipped.
    fn fields(&self) -> Vec<(String, String)> {
        let Ok(data) = FormData::new_with_form(&self.form) else {
            return Vec::new();
        };
        let Ok(Some(entries)) = js_sys::try_iter(&data) else {
            return Vec::new();
        };
        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let pair = entry.dyn_into::<js_sys::Array>().ok()?;
                Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
            })
            .collect()
    }

    fn reset(&self) {
        self.form.reset();
    }
}

pub struct DomReviewView {
    document: Document,
    modal: Element,
}

impl DomReviewView {
    fn find(document: &Document) -> Option<Self> {
        let modal = document.query_selector(REVIEW_MODAL_SELECTOR).ok().flatten()?;
        Some(Self {
            document: document.clone(),
            modal,
        })
    }

    fn element(&self, tag: &str, class: &str) -> Option<Element> {
        let el = self.document.create_element(tag).ok()?;
        if !class.is_empty() {
            el.set_class_name(class);
        }
        Some(el)
    }

    fn review_item(&self, review: &Review) -> Option<Element> {
        let item = self.element("li", "list-group-item")?;

        let author = self.element("strong", "")?;
        author.set_text_content(Some(&review.user_account_name));
        item.append_child(&author).ok()?;
        item.append_child(&self.document.create_text_node(&format!(" {}", review.rating_caption())))
            .ok()?;
        item.append_child(&self.element("br", "")?.into()).ok()?;

        let body = self.element("p", "mt-2")?;
        for (idx, line) in review.content_lines().enumerate() {
            if idx > 0 {
                body.append_child(&self.element("br", "")?.into()).ok()?;
            }
            body.append_child(&self.document.create_text_node(line)).ok()?;
        }
        item.append_child(&body).ok()?;

        let posted = self.element("small", "text-muted d-block text-end")?;
        posted.set_text_content(Some(&review.posted_caption()));
        item.append_child(&posted).ok()?;
        Some(item)
    }
}

impl ReviewView for DomReviewView {
    fn set_heading(&self, heading: &str) {
        if let Ok(Some(title)) = self.modal.query_selector(TITLE_SELECTOR) {
            title.set_text_content(Some(heading));
        }
    }

    fn close(&self) {
        match bootstrap::Modal::get_or_create(&self.modal) {
            Ok(modal) => modal.hide(),
            Err(e) => web_sys::console::warn_1(&format!("review modal: {e:?}").into()),
        }
    }

    fn prepend_review(&self, review: &Review) {
        let Some(list) = self.document.get_element_by_id(LIST_ID) else {
            return;
        };
        if let Some(empty) = self.document.get_element_by_id(EMPTY_MESSAGE_ID) {
            empty.remove();
        }
        if let Some(item) = self.review_item(review) {
            let _ = list.prepend_with_node_1(&item);
        }
    }
}

pub struct HttpReviews {
    endpoints: Rc<Endpoints>,
    csrf: PageCsrf,
    timeout_ms: u32,
}

impl ReviewTransport for HttpReviews {
    fn csrf_token(&self) -> Option<String> {
        self.csrf.token()
    }

    async fn submit(&self, item_id: &str, body: String) -> Result<ReviewReply, TransportError> {
        let token = self.csrf.token();
        post_form(
            &self.endpoints.add_review(item_id),
            body,
            token.as_deref(),
            StatusPolicy::RequireOk,
            self.timeout_ms,
        )
        .await
    }
}

/// Read the opening control's target from a `show.bs.modal` event.
fn trigger_target(event: &Event) -> Option<ReviewTarget> {
    let related = js_sys::Reflect::get(event, &"relatedTarget".into()).ok()?;
    let trigger = related.dyn_into::<HtmlElement>().ok()?;
    let data = trigger.dataset();
    ReviewTarget::from_trigger(data.get("playgroundId"), data.get("playgroundName"))
}

/// Wire the review modal and form. A page with neither gets no listeners.
pub fn wire(
    document: &Document,
    config: &ClientConfig,
    endpoints: Rc<Endpoints>,
    notifier: PageNotifier,
) -> Result<Vec<Listener>, String> {
    let view = DomReviewView::find(document);
    let form = DomReviewForm::find(document);
    if view.is_none() && form.is_none() {
        return Ok(Vec::new());
    }
    let modal = view.as_ref().map(|view| view.modal.clone());
    let form_el = form.as_ref().map(|form| form.form.clone());

    let transport = HttpReviews {
        endpoints,
        csrf: PageCsrf::new(config.csrf_source),
        timeout_ms: config.request_timeout_ms(),
    };
    let reviews: Rc<PageReviews> = Rc::new(
        ReviewSubmission::new(view, form, transport, notifier).map_err(|e| e.to_string())?,
    );

    let mut listeners = Vec::with_capacity(3);
    if let Some(modal) = modal {
        let on_show = Rc::clone(&reviews);
        listeners.push(Listener::attach(&modal, "show.bs.modal", move |event| {
            on_show.open(trigger_target(&event).as_ref());
        })?);
        let on_hidden = Rc::clone(&reviews);
        listeners.push(Listener::attach(&modal, "hidden.bs.modal", move |_| {
            on_hidden.dismissed();
        })?);
    }
    if let Some(form_el) = form_el {
        listeners.push(Listener::attach(&form_el, "submit", move |event| {
            event.prevent_default();
            let reviews = Rc::clone(&reviews);
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = reviews.submit().await {
                    web_sys::console::warn_1(&format!("review submit: {e}").into());
                }
            });
        })?);
    }
    Ok(listeners)
}
