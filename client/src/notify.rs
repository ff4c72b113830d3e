use web_sys::{Document, Element};

use playmap_shared::Notice;
use playmap_shared::toggle::Notifier;

use crate::bootstrap;

const TOAST_ID: &str = "notificationToast";
const TOAST_BODY_ID: &str = "notificationToastBody";

#[derive(Clone)]
struct ToastSlot {
    element: Element,
    body: Element,
    toast: bootstrap::Toast,
}

/// Shows notices in the page toast, or as an alert when the page has none.
#[derive(Clone)]
pub struct PageNotifier {
    toast: Option<ToastSlot>,
}

impl PageNotifier {
    pub fn from_document(document: &Document) -> Self {
        let toast = (|| {
            let element = document.get_element_by_id(TOAST_ID)?;
            let body = document.get_element_by_id(TOAST_BODY_ID)?;
            let toast = bootstrap::Toast::get_or_create(&element).ok()?;
            Some(ToastSlot {
                element,
                body,
                toast,
            })
        })();
        Self { toast }
    }
}

impl Notifier for PageNotifier {
    fn notify(&self, notice: &Notice) {
        let message = notice.message();
        if let Some(slot) = &self.toast {
            slot.body.set_text_content(Some(message));
            let classes = slot.element.class_list();
            let _ = classes.toggle_with_force("bg-danger", notice.is_error());
            let _ = classes.toggle_with_force("text-white", notice.is_error());
            slot.toast.show();
            return;
        }
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
