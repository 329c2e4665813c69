use ratatui::style::Color;

pub const AMBER: Color = Color::Rgb(245, 158, 11);
pub const BLUE: Color = Color::Rgb(59, 130, 246);
pub const GREEN: Color = Color::Rgb(16, 185, 129);
pub const GREY: Color = Color::Rgb(107, 114, 128);
pub const PURPLE: Color = Color::Rgb(124, 58, 237);
pub const RED: Color = Color::Rgb(239, 68, 68);
pub const WHITE: Color = Color::Rgb(250, 250, 250);
