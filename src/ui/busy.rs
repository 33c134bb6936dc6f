use std::cell::{Cell, RefCell};
use std::rc::Rc;

// ============================================================================
// Busy indicator: full-page overlay signaling an in-flight navigation
// ============================================================================

/// Contract of the page-wide overlay: a single visibility flag.
pub trait BusyIndicator {
    fn show(&self);
    fn hide(&self);
    fn is_visible(&self) -> bool;
}

impl<T: BusyIndicator + ?Sized> BusyIndicator for Rc<T> {
    fn show(&self) {
        (**self).show()
    }

    fn hide(&self) {
        (**self).hide()
    }

    fn is_visible(&self) -> bool {
        (**self).is_visible()
    }
}

/// The `#loader-overlay` element, toggled through its `show` marker class.
#[derive(Debug)]
pub struct LoaderOverlay {
    pub element_id: String,
    pub marker_class: String,
    visible: Cell<bool>,
}

impl LoaderOverlay {
    pub fn new(element_id: &str, marker_class: &str) -> Self {
        Self {
            element_id: element_id.to_string(),
            marker_class: marker_class.to_string(),
            visible: Cell::new(false),
        }
    }

    /// Classes the overlay element currently carries.
    pub fn classes(&self) -> Vec<String> {
        let mut classes = vec!["loader-overlay".to_string()];
        if self.visible.get() {
            classes.push(self.marker_class.clone());
        }
        classes
    }
}

impl Default for LoaderOverlay {
    fn default() -> Self {
        Self::new("loader-overlay", "show")
    }
}

impl BusyIndicator for LoaderOverlay {
    fn show(&self) {
        self.visible.set(true);
    }

    fn hide(&self) {
        self.visible.set(false);
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyCall {
    Show,
    Hide,
}

/// Test double that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingIndicator {
    calls: RefCell<Vec<BusyCall>>,
    visible: Cell<bool>,
}

impl RecordingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<BusyCall> {
        self.calls.borrow().clone()
    }

    pub fn show_count(&self) -> usize {
        self.calls.borrow().iter().filter(|c| **c == BusyCall::Show).count()
    }

    pub fn hide_count(&self) -> usize {
        self.calls.borrow().iter().filter(|c| **c == BusyCall::Hide).count()
    }

    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl BusyIndicator for RecordingIndicator {
    fn show(&self) {
        self.calls.borrow_mut().push(BusyCall::Show);
        self.visible.set(true);
    }

    fn hide(&self) {
        self.calls.borrow_mut().push(BusyCall::Hide);
        self.visible.set(false);
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }
}
