//! # MillView UI
//!
//! GTK4 front end: a [`GtkViewportContainer`] that hosts visualization
//! sessions inside a `GLArea`, and the viewer application window.

pub mod gtk_app;
pub mod viewport;

pub use gtk_app::{run, ViewerOptions};
pub use viewport::{GtkSurface, GtkViewportContainer};

pub use glib::ExitCode;
