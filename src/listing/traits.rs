/// A user-visible error toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub description: Option<String>,
}

impl Notification {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Consumer-provided notification sink. Fire-and-forget.
pub trait Notifier {
    fn error(&self, notification: Notification);
}

impl<F: Fn(Notification)> Notifier for F {
    fn error(&self, notification: Notification) {
        self(notification);
    }
}

/// Consumer-provided page correction.
///
/// Expected to navigate to `page` (e.g. rewrite the URL's `page` parameter)
/// which in turn triggers a refetch of a valid page.
pub trait PageNavigator {
    fn go_to_page(&self, page: u32);
}

impl<F: Fn(u32)> PageNavigator for F {
    fn go_to_page(&self, page: u32) {
        self(page);
    }
}
