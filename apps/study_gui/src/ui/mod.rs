//! UI layer for the desktop study app: app shell, panels, and theme.

pub mod app;
pub mod panels;
pub mod theme;

pub use app::{StartupConfig, StudyGuiApp};
