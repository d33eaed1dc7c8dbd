// Components module - reusable UI building blocks
//
// Shell components are rendered around every tab:
// - Tab bar: app title, entity tabs, loading spinner
// - Status bar: record count, backend address, key hints
// - Logs strip: recent system log entries
// - Toasts: success/error notifications

pub mod formatters;
pub mod logs_strip;
pub mod status_bar;
pub mod tab_bar;
pub mod toast;

pub use toast::Toast;
