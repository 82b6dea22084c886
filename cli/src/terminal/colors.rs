use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const SSID: Color = Color::BrightCyan;
pub const SECURE: Color = Color::Green;
pub const INSECURE: Color = Color::Yellow;
pub const UNSUPPORTED: Color = Color::Red;
