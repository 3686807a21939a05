use kurbo::{Rect, Size};

use crate::layout::SizePolicy;
use crate::update::Update;

/// Identifies a widget type. The namespace should be the crate name and the
/// id the widget type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId {
    namespace: String,
    id: String,
}

impl WidgetId {
    /// Create a new widget id by a namespace and custom id.
    ///
    /// Example:
    /// ```
    /// let id = folderview_core::widget::WidgetId::new("my_crate", "MyWidget");
    /// assert_eq!(id.id(), "MyWidget");
    /// ```
    pub fn new(namespace: impl ToString, id: impl ToString) -> Self {
        Self {
            namespace: namespace.to_string(),
            id: id.to_string(),
        }
    }

    /// Returns the namespace of the widget id.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the actual widget id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// The base trait for widgets managed by a container.
///
/// Rendering is left to the embedding toolkit; a widget here only owns its
/// geometry, reports how it wants to be sized and processes pending work in
/// [Widget::update].
pub trait Widget {
    /// Return the widget id.
    fn widget_id(&self) -> WidgetId;

    /// Place the widget, in the coordinates of its parent.
    fn set_geometry(&mut self, rect: Rect);

    /// The rectangle the widget occupies in its parent.
    fn geometry(&self) -> Rect;

    /// The size the widget would like to have.
    fn size_hint(&self) -> Size;

    /// How the widget wants to grow.
    fn size_policy(&self) -> SizePolicy {
        SizePolicy::Preferred
    }

    /// Process pending work and report what needs refreshing.
    fn update(&mut self) -> Update {
        Update::empty()
    }
}
