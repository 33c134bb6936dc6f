use crate::ui::busy::{BusyIndicator, LoaderOverlay};
use crate::ui::select::{EnhancedSelect, NoWidgets};

/// Page-wide helpers handed to the guard and the cache by reference.
pub struct Services {
    pub busy: Box<dyn BusyIndicator>,
    pub widgets: Box<dyn EnhancedSelect>,
    pub csrf_token: Option<String>,
}

impl Services {
    pub fn new(busy: Box<dyn BusyIndicator>, widgets: Box<dyn EnhancedSelect>) -> Self {
        Self {
            busy,
            widgets,
            csrf_token: None,
        }
    }

    pub fn with_csrf_token(mut self, token: Option<String>) -> Self {
        self.csrf_token = token;
        self
    }

    pub fn show_busy(&self) {
        self.busy.show();
    }

    pub fn hide_busy(&self) {
        self.busy.hide();
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new(Box::new(LoaderOverlay::default()), Box::new(NoWidgets))
    }
}
