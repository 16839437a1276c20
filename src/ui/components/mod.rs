pub mod debug_panel;
pub mod radar;
pub mod sidebar;
