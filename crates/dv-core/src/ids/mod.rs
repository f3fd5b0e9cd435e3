//! ID type wrappers for type safety.

mod id_macro;

use id_macro::define_id;

define_id! {
    /// Persisted file card identifier.
    pub struct CardId;

    /// Owning project identifier.
    pub struct ProjectId;

    /// One open full view of a file. A fresh id is minted every time a view opens,
    /// even for a path that was open before.
    pub struct ViewSessionId;
}
