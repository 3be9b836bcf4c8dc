use crate::id::{OptionId, PageId};

/// Alias for `Result<T, MenuError>`.
pub type MenuResult<T> = Result<T, MenuError>;

/// Structural errors: a menu graph referring to something that is not
/// registered. These point at how the host wired the menu, not at anything
/// the viewer did, so retrying never helps.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    /// A page id that is not registered in this menu.
    #[error("page not found: {0}")]
    PageNotFound(PageId),

    /// An option id that is not registered in this menu.
    #[error("option not found: {0}")]
    OptionNotFound(OptionId),
}
