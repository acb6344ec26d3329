use ratatui::style::Color;

// One semantic role per color, following the original terminal palette.
// Prefer adding roles here over scattering colors through the renderer.
pub const HEADER: Color = Color::Cyan;
pub const REMOVED: Color = Color::Yellow;
pub const INTENSIVE: Color = Color::Cyan;
pub const HIGHLIGHT: Color = Color::LightGreen;

pub const BAR_FG: Color = Color::Black;
pub const BAR_BG: Color = Color::White;

// Row colors keyed off the status column.
pub const RELEASED: Color = Color::Green;
pub const PROCESSING: Color = Color::Yellow;
pub const CANCELLED: Color = Color::Magenta;
pub const NO_STATUS: Color = Color::Blue;
