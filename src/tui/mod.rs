pub mod app;
pub mod events;
pub mod labels;
pub mod theme;
pub mod widgets;
