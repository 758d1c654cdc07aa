//! Headless engine behind the admin dashboard: adaptive motion plus the
//! layout editor with undo history and autosave.
//!
//! | Module | Role |
//! |--------|------|
//! | [`motion`] | Spring presets, variants, contextual selection, haptics, frame metrics |
//! | [`history`] | Bounded undo/redo stack with gesture buffering |
//! | [`layout`] | Layout model, editor, shortcuts, widget registry |
//! | [`save`] | Autosave status machine |
//! | [`net`] | Persistence API client and dashboard data poller |
//! | [`config`] | Environment configuration |

pub mod config;
pub mod history;
pub mod layout;
pub mod motion;
pub mod net;
pub mod save;
