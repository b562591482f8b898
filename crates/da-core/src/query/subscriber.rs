//! View subscriber trait

use super::ViewSnapshot;

/// Trait for components that render the current page of the query view
pub trait ViewSubscriber: Send + Sync {
    /// Called after every filter, sort, page or dataset change
    fn on_view_change(&self, view: &ViewSnapshot);
}
