pub mod popup;

pub use popup::{PopupCallback, PopupController, PopupState};
